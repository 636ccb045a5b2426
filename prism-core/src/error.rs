#![forbid(unsafe_code)]

use miette::Diagnostic;
use thiserror::Error;

use crate::matcher::BadArg;

/// A single `can_convert` query that failed outright.
#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
#[error(
    "no {} conversion from `{from}` to `{to}`",
    .explicit.then_some("explicit").unwrap_or("implicit")
)]
#[diagnostic(code(prism::convert))]
pub struct ConversionRejected {
    pub from: String,
    pub to: String,
    pub explicit: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Diagnostic)]
pub enum ResolveError {
    #[error(
        "no overload of `{name}` matches the arguments{}",
        .bad_arg.map(|b| format!(" (first mismatch: {b})")).unwrap_or_default()
    )]
    #[diagnostic(code(prism::resolve))]
    NoMatch { name: String, bad_arg: Option<BadArg> },

    #[error("no viable overload of `{name}`: argument conversions failed for every candidate")]
    #[diagnostic(code(prism::resolve))]
    NoViableCandidate { name: String },

    #[error("call to `{name}` is ambiguous between {tied} overloads")]
    #[diagnostic(
        code(prism::resolve),
        help("add an explicit cast so that one overload needs fewer conversions")
    )]
    Ambiguous { name: String, tied: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    ConversionRejected(#[from] ConversionRejected),
}
