#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;
use prism_ast::Operand;
use prism_core::intrinsics::MAX_SLOTS;
use prism_core::{CallSite, Classify, LangVersion, Session, SessionOptions, combine};
use prism_parse::{TypeEnv, parse_operand, parse_type};
use serde::Serialize;

mod config;
mod logging;
mod report;

use logging::{LogFormat, LogLevel, LogOptions};
use report::{
    ClassifyReport, CombineReport, ConvertReport, ResolveReport, ResolvedCall, SequenceReport,
    SignatureLine,
};

#[derive(Parser, Debug)]
#[command(name = "prism", version, about = "Shader type conversions and intrinsic overload resolution")]
struct Cli {
    /// Config file. Defaults to the nearest `prism.toml` above the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Language version (2016, 2018, 2021). Overrides `prism.toml`.
    #[arg(long, global = true)]
    lang_version: Option<LangVersion>,

    /// Treat min16float and friends as distinct minimum-precision kinds.
    #[arg(long, global = true)]
    min_precision: Option<bool>,

    /// Make `half` a real 16-bit float.
    #[arg(long = "enable-16bit-types", global = true, default_value_t = false)]
    enable_16bit_types: bool,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Resolve a call to an intrinsic or method.
    Resolve {
        name: String,

        /// Argument types or constants, e.g. `float3`, `2`, `int(40000)`.
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,

        /// Receiver type for a method call, e.g. `Texture2D<float4>`.
        #[arg(long)]
        on: Option<String>,

        /// Explicit template argument, as in `buf.Load<float4>(...)`.
        #[arg(long)]
        template: Option<String>,
    },
    /// Check whether a value of one type converts to another.
    Convert {
        #[arg(allow_hyphen_values = true)]
        from: String,
        to: String,

        #[arg(long, default_value_t = false)]
        explicit: bool,
    },
    /// Common element kind of two types.
    Combine { left: String, right: String },
    /// Shape and element summary of a type.
    Classify { ty: String },
    /// List the overloads of a name.
    Signatures {
        name: String,

        #[arg(long)]
        on: Option<String>,

        /// Only overloads taking this many arguments.
        #[arg(long)]
        arity: Option<usize>,
    },
}

fn session_options(cli: &Cli, base: SessionOptions) -> SessionOptions {
    let mut opts = base;
    if let Some(v) = cli.lang_version {
        opts.lang_version = v;
    }
    if let Some(m) = cli.min_precision {
        opts.min_precision = m;
    }
    if cli.enable_16bit_types {
        opts.enable_16bit_types = true;
    }
    opts
}

fn emit<T: Serialize + Display>(report: &T, json: bool) -> miette::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report).into_diagnostic()?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn call_label(name: &str, args: &[String], on: Option<&str>) -> String {
    let args = args.join(", ");
    match on {
        Some(obj) => format!("{obj}.{name}({args})"),
        None => format!("{name}({args})"),
    }
}

fn run_resolve(
    session: &mut Session,
    env: &TypeEnv,
    name: &str,
    args: &[String],
    on: Option<&str>,
    template: Option<&str>,
    json: bool,
) -> miette::Result<()> {
    let operands = args
        .iter()
        .map(|a| parse_operand(a, env))
        .collect::<miette::Result<Vec<Operand>>>()?;
    let object = on.map(|t| parse_type(t, env)).transpose()?;
    let explicit = template.map(|t| parse_type(t, env)).transpose()?;

    let mut call = CallSite::new(name, &operands);
    if let Some(obj) = &object {
        call = call.on(obj);
    }
    if let Some(t) = &explicit {
        call = call.with_template(t);
    }

    let label = call_label(name, args, on);
    match session.resolve(&call) {
        Ok(resolution) => emit(
            &ResolveReport {
                call: label,
                ok: true,
                error: None,
                resolved: Some(ResolvedCall::new(&resolution)),
            },
            json,
        ),
        Err(err) => {
            if json {
                emit(
                    &ResolveReport {
                        call: label,
                        ok: false,
                        error: Some(err.to_string()),
                        resolved: None,
                    },
                    json,
                )?;
            }
            Err(err.into())
        }
    }
}

fn run_convert(
    session: &Session,
    env: &TypeEnv,
    from: &str,
    to: &str,
    explicit: bool,
    json: bool,
) -> miette::Result<()> {
    let source = parse_operand(from, env)?;
    let target = parse_type(to, env)?;
    let outcome = session.can_convert(&source, &target, explicit);
    let report = ConvertReport {
        from: source.ty.to_string(),
        to: target.to_string(),
        explicit,
        ok: outcome.is_ok(),
        sequence: outcome.as_ref().ok().map(SequenceReport::from),
        error: outcome.as_ref().err().map(ToString::to_string),
    };
    emit(&report, json)?;
    match outcome {
        Ok(_) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn run_signatures(
    session: &Session,
    env: &TypeEnv,
    name: &str,
    on: Option<&str>,
    arity: Option<usize>,
    json: bool,
) -> miette::Result<()> {
    let type_name = match on {
        Some(t) => {
            let ty = parse_type(t, env)?;
            match &*ty {
                prism_ast::TyKind::Object { kind, .. } => kind.name().to_string(),
                _ => ty.to_string(),
            }
        }
        None => String::new(),
    };

    let arities = match arity {
        Some(n) => n..=n,
        None => 0..=MAX_SLOTS,
    };
    let mut found = BTreeMap::new();
    for n in arities {
        for entry in session.signatures(&type_name, name, n) {
            found.entry(entry.id).or_insert_with(|| SignatureLine::from(entry));
        }
    }
    let lines: Vec<SignatureLine> = found.into_values().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&lines).into_diagnostic()?);
    } else if lines.is_empty() {
        println!("no overloads of `{name}`");
    } else {
        for line in &lines {
            println!("{line}");
        }
    }
    Ok(())
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let log = LogOptions::with_overrides(LogOptions::from_env(), cli.log_format, cli.log_level);
    logging::init_logging(log);

    let cwd = std::env::current_dir().into_diagnostic()?;
    let resolved = config::load_config(cli.config.as_deref(), &cwd)?;
    let options = session_options(&cli, resolved.session.clone());
    tracing::debug!(
        target: "prism",
        lang_version = %options.lang_version,
        min_precision = options.min_precision,
        enable_16bit_types = options.enable_16bit_types,
        config = ?resolved.config_path,
        "session configured"
    );
    let mut session = Session::new(options);
    let env = &resolved.env;

    match &cli.cmd {
        Cmd::Resolve {
            name,
            args,
            on,
            template,
        } => run_resolve(
            &mut session,
            env,
            name,
            args,
            on.as_deref(),
            template.as_deref(),
            cli.json,
        ),
        Cmd::Convert { from, to, explicit } => {
            run_convert(&session, env, from, to, *explicit, cli.json)
        }
        Cmd::Combine { left, right } => {
            let l = parse_type(left, env)?;
            let r = parse_type(right, env)?;
            let lk = session.classifier().element_kind(&l);
            let rk = session.classifier().element_kind(&r);
            let report = CombineReport {
                left: lk.to_string(),
                right: rk.to_string(),
                result: combine(lk, rk).map(|k| k.to_string()),
            };
            emit(&report, cli.json)
        }
        Cmd::Classify { ty } => {
            let parsed = parse_type(ty, env)?;
            let report = ClassifyReport::new(parsed.to_string(), &session.classify(&parsed));
            emit(&report, cli.json)
        }
        Cmd::Signatures { name, on, arity } => {
            run_signatures(&session, env, name, on.as_deref(), *arity, cli.json)
        }
    }
}
