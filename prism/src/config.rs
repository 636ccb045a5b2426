#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use prism_core::SessionOptions;
use prism_parse::{TypeEnv, parse_declarations};
use thiserror::Error;

pub const CONFIG_FILE: &str = "prism.toml";

#[derive(Debug, Error, Diagnostic)]
#[error("config error: {message}")]
#[diagnostic(code(prism::config))]
pub struct ConfigError {
    pub message: String,
}

/// Session options plus the user types every command can name.
#[derive(Debug, Default)]
pub struct ResolvedConfig {
    pub config_path: Option<PathBuf>,
    pub session: SessionOptions,
    pub env: TypeEnv,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    session: SessionOptions,

    #[serde(default)]
    types: Types,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Types {
    /// `struct`/`enum` declarations in type-spelling syntax.
    #[serde(default)]
    declarations: String,
}

/// Walks up from `start` looking for `prism.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut cur = if start.is_file() {
        start.parent()?.to_path_buf()
    } else {
        start.to_path_buf()
    };

    loop {
        let candidate = cur.join(CONFIG_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
        if !cur.pop() {
            return None;
        }
    }
}

/// Loads `explicit` if given, else the nearest `prism.toml` above `start`.
/// No file at all yields defaults.
pub fn load_config(explicit: Option<&Path>, start: &Path) -> Result<ResolvedConfig, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match find_config(start) {
            Some(p) => p,
            None => return Ok(ResolvedConfig::default()),
        },
    };

    let raw = fs::read_to_string(&path).map_err(|e| ConfigError {
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    let mut resolved = parse_config(&raw).map_err(|e| ConfigError {
        message: format!("{}: {}", path.display(), e.message),
    })?;
    tracing::debug!(target: "prism::config", path = %path.display(), "loaded config");
    resolved.config_path = Some(path);
    Ok(resolved)
}

pub fn parse_config(raw: &str) -> Result<ResolvedConfig, ConfigError> {
    let parsed: ConfigFile = toml::from_str(raw).map_err(|e| ConfigError {
        message: format!("failed to parse: {e}"),
    })?;

    let mut env = TypeEnv::new();
    if !parsed.types.declarations.trim().is_empty() {
        parse_declarations(&parsed.types.declarations, &mut env).map_err(|e| ConfigError {
            message: format!("bad [types] declarations: {e}"),
        })?;
    }

    Ok(ResolvedConfig {
        config_path: None,
        session: parsed.session,
        env,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::LangVersion;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.session, SessionOptions::default());
        assert!(cfg.env.lookup_struct("RayDesc").is_some());
    }

    #[test]
    fn session_table_and_declarations_are_read() {
        let cfg = parse_config(
            r#"
            [session]
            lang_version = 2018
            enable_16bit_types = true

            [types]
            declarations = "struct Light { float3 dir; float intensity; };"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.session.lang_version, LangVersion::V2018);
        assert!(cfg.session.enable_16bit_types);
        assert!(cfg.session.min_precision);
        assert_eq!(cfg.env.lookup_struct("Light").unwrap().fields.len(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config("[session]\nfast_math = true\n").unwrap_err();
        assert!(err.message.contains("fast_math"));
    }

    #[test]
    fn bad_declarations_are_reported() {
        let err = parse_config("[types]\ndeclarations = \"struct { }\"\n").unwrap_err();
        assert!(err.message.contains("[types]"));
    }
}
