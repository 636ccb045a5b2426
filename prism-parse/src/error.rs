#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use miette::Diagnostic;
use prism_ast::Span;
use thiserror::Error;

/// A type spelling or declaration block that could not be read.
#[derive(Debug, Error, Diagnostic)]
#[error("invalid type spelling: {message}")]
#[diagnostic(
    code(prism::parse),
    help("types are written like `float3`, `matrix<float, 2, 3>`, `Texture2D<float4>` or a declared struct name")
)]
#[allow(unused_assignments)]
pub struct ParseError {
    pub message: String,
    #[label("here")]
    pub span: Span,
}

impl ParseError {
    pub fn at(span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_carry_a_spelling_hint() {
        let err = ParseError::at(Span::from((0, 3)), "unknown type `flot`");
        assert_eq!(err.to_string(), "invalid type spelling: unknown type `flot`");
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("Texture2D<float4>"));
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("prism::parse"));
    }
}
