#![forbid(unsafe_code)]
#![allow(unused_assignments)]

use logos::Logos;
use miette::Diagnostic;
use prism_ast::{Span, span_between};
use thiserror::Error;

use crate::token::{Token, TokenKind};

#[derive(Debug, Error, Diagnostic)]
#[error("lex error: {message}")]
#[diagnostic(code(prism::lex))]
#[allow(unused_assignments)]
pub struct LexError {
    pub message: String,
    #[label]
    pub span: Span,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\f\r\n]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    #[token("const")]
    KwConst,
    #[token("struct")]
    KwStruct,
    #[token("enum")]
    KwEnum,
    #[token("class")]
    KwClass,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,

    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("&")]
    Amp,
    #[token("-")]
    Minus,
    #[token("$")]
    Dollar,

    #[regex(r"0x[0-9a-fA-F_]+", |lex| parse_int_prefixed(lex.slice(), 16))]
    #[regex(r"[0-9][0-9_]*", |lex| parse_int_decimal(lex.slice()))]
    Int(Option<u64>),

    #[regex(r"0x[0-9a-fA-F_]+[uU]", |lex| parse_uint(lex.slice()))]
    #[regex(r"[0-9][0-9_]*[uU]", |lex| parse_uint(lex.slice()))]
    Uint(Option<u64>),

    // `1.5`, `1.`, `.5`, `2e3`, with an optional `f`/`h`/`l` suffix.
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fFhHlL]?", |lex| parse_float(lex.slice()))]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fFhHlL]?", |lex| parse_float(lex.slice()))]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFhHlL]?", |lex| parse_float(lex.slice()))]
    Float(Option<f64>),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

fn parse_int_decimal(s: &str) -> Option<u64> {
    let digits = strip_underscores(s)?;
    digits.parse::<u64>().ok()
}

fn parse_int_prefixed(s: &str, radix: u32) -> Option<u64> {
    let rest = s.get(2..)?;
    let digits = strip_underscores(rest)?;
    u64::from_str_radix(&digits, radix).ok()
}

fn parse_uint(s: &str) -> Option<u64> {
    let body = &s[..s.len() - 1];
    if body.starts_with("0x") {
        parse_int_prefixed(body, 16)
    } else {
        parse_int_decimal(body)
    }
}

fn parse_float(s: &str) -> Option<f64> {
    let body = s.trim_end_matches(['f', 'F', 'h', 'H', 'l', 'L']);
    body.parse::<f64>().ok()
}

fn strip_underscores(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    if s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return None;
    }
    Some(s.replace('_', ""))
}

pub struct Lexer<'a> {
    src: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src }
    }

    pub fn lex(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut lex = RawToken::lexer(self.src);

        while let Some(raw) = lex.next() {
            let range = lex.span();
            let span = span_between(range.start, range.end);

            let kind = match raw {
                Ok(RawToken::KwConst) => TokenKind::KwConst,
                Ok(RawToken::KwStruct) => TokenKind::KwStruct,
                Ok(RawToken::KwEnum) => TokenKind::KwEnum,
                Ok(RawToken::KwClass) => TokenKind::KwClass,
                Ok(RawToken::KwTrue) => TokenKind::KwTrue,
                Ok(RawToken::KwFalse) => TokenKind::KwFalse,

                Ok(RawToken::Lt) => TokenKind::Lt,
                Ok(RawToken::Gt) => TokenKind::Gt,
                Ok(RawToken::LBracket) => TokenKind::LBracket,
                Ok(RawToken::RBracket) => TokenKind::RBracket,
                Ok(RawToken::LBrace) => TokenKind::LBrace,
                Ok(RawToken::RBrace) => TokenKind::RBrace,
                Ok(RawToken::LParen) => TokenKind::LParen,
                Ok(RawToken::RParen) => TokenKind::RParen,
                Ok(RawToken::Comma) => TokenKind::Comma,
                Ok(RawToken::Semi) => TokenKind::Semi,
                Ok(RawToken::Colon) => TokenKind::Colon,
                Ok(RawToken::Amp) => TokenKind::Amp,
                Ok(RawToken::Minus) => TokenKind::Minus,
                Ok(RawToken::Dollar) => TokenKind::Dollar,

                Ok(RawToken::Ident(s)) => TokenKind::Ident(s),
                Ok(RawToken::Int(Some(n))) => TokenKind::Int(n),
                Ok(RawToken::Uint(Some(n))) => TokenKind::Uint(n),
                Ok(RawToken::Float(Some(v))) => TokenKind::Float(v),
                Ok(RawToken::Int(None)) | Ok(RawToken::Uint(None)) => {
                    return Err(LexError {
                        message: "invalid integer literal".to_string(),
                        span,
                    });
                }
                Ok(RawToken::Float(None)) => {
                    return Err(LexError {
                        message: "invalid float literal".to_string(),
                        span,
                    });
                }
                Err(_) => {
                    return Err(LexError {
                        message: "unexpected token".to_string(),
                        span,
                    });
                }
            };

            tokens.push(Token { kind, span });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: span_between(self.src.len(), self.src.len()),
        });

        Ok(tokens)
    }
}
