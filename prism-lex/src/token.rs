#![forbid(unsafe_code)]

use prism_ast::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords
    KwConst,
    KwStruct,
    KwEnum,
    KwClass,
    KwTrue,
    KwFalse,

    // Punctuation
    Lt,
    Gt,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Semi,
    Colon,
    Amp,
    Minus,
    Dollar,

    Eof,

    // Literals / identifiers
    Ident(String),
    Int(u64),
    /// Integer literal carrying a `u`/`U` suffix.
    Uint(u64),
    Float(f64),
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::KwConst => "`const`".into(),
            TokenKind::KwStruct => "`struct`".into(),
            TokenKind::KwEnum => "`enum`".into(),
            TokenKind::KwClass => "`class`".into(),
            TokenKind::KwTrue => "`true`".into(),
            TokenKind::KwFalse => "`false`".into(),
            TokenKind::Lt => "`<`".into(),
            TokenKind::Gt => "`>`".into(),
            TokenKind::LBracket => "`[`".into(),
            TokenKind::RBracket => "`]`".into(),
            TokenKind::LBrace => "`{`".into(),
            TokenKind::RBrace => "`}`".into(),
            TokenKind::LParen => "`(`".into(),
            TokenKind::RParen => "`)`".into(),
            TokenKind::Comma => "`,`".into(),
            TokenKind::Semi => "`;`".into(),
            TokenKind::Colon => "`:`".into(),
            TokenKind::Amp => "`&`".into(),
            TokenKind::Minus => "`-`".into(),
            TokenKind::Dollar => "`$`".into(),
            TokenKind::Eof => "end of input".into(),
            TokenKind::Ident(s) => format!("identifier `{s}`"),
            TokenKind::Int(n) | TokenKind::Uint(n) => format!("integer `{n}`"),
            TokenKind::Float(v) => format!("float `{v}`"),
        }
    }
}
