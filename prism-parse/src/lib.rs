#![forbid(unsafe_code)]

mod env;
mod error;
mod parser;

use miette::IntoDiagnostic;
use prism_ast::{Operand, Ty};
use prism_lex::Lexer;

pub use env::TypeEnv;
pub use error::ParseError;
pub use parser::Parser;

/// Parses a single type spelling such as `float4`, `const int[3]`, or
/// `Texture2D<float4>`.
pub fn parse_type(src: &str, env: &TypeEnv) -> miette::Result<Ty> {
    let tokens = Lexer::new(src).lex().into_diagnostic()?;
    let mut parser = Parser::new(&tokens);
    let ty = parser.parse_type(env).into_diagnostic()?;
    parser.expect_eof().into_diagnostic()?;
    Ok(ty)
}

/// Parses a call argument: a literal, a typed constant, or a type.
pub fn parse_operand(src: &str, env: &TypeEnv) -> miette::Result<Operand> {
    let tokens = Lexer::new(src).lex().into_diagnostic()?;
    let mut parser = Parser::new(&tokens);
    let op = parser.parse_operand(env).into_diagnostic()?;
    parser.expect_eof().into_diagnostic()?;
    Ok(op)
}

/// Adds `struct` and `enum` declarations from `src` to `env`.
pub fn parse_declarations(src: &str, env: &mut TypeEnv) -> miette::Result<()> {
    let tokens = Lexer::new(src).lex().into_diagnostic()?;
    let mut parser = Parser::new(&tokens);
    parser.parse_declarations(env).into_diagnostic()
}
