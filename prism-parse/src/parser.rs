#![forbid(unsafe_code)]

use std::mem;

use prism_ast::{
    Builtin, Constant, Field, ObjectKind, Operand, Span, Ty, TyKind, span_between,
};
use prism_lex::{Token, TokenKind};

use crate::env::TypeEnv;
use crate::error::ParseError;

pub struct Parser<'a> {
    tokens: &'a [Token],
    idx: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, idx: 0 }
    }

    /// `const`? base (`[N]` | `[]`)* `&`?
    pub fn parse_type(&mut self, env: &TypeEnv) -> Result<Ty, ParseError> {
        let is_const = self.eat(TokenKind::KwConst);
        let mut ty = self.parse_base(env)?;
        ty = self.parse_array_suffixes(ty)?;
        if is_const {
            ty = TyKind::constant(ty);
        }
        if self.eat(TokenKind::Amp) {
            ty = TyKind::reference(ty);
        }
        Ok(ty)
    }

    /// A literal (`1`, `2u`, `-0.5`, `true`), a typed constant (`int(3)`), or
    /// a bare type.
    pub fn parse_operand(&mut self, env: &TypeEnv) -> Result<Operand, ParseError> {
        if let Some(op) = self.parse_literal()? {
            return Ok(op);
        }
        let ty = self.parse_type(env)?;
        if self.eat(TokenKind::LParen) {
            let span = self.peek_span();
            let Some(lit) = self.parse_literal()? else {
                return Err(ParseError::at(span, "expected a literal constant"));
            };
            self.expect(TokenKind::RParen)?;
            return Ok(Operand {
                ty,
                constant: lit.constant,
            });
        }
        Ok(Operand::new(ty))
    }

    /// `struct`/`enum` declarations until end of input.
    pub fn parse_declarations(&mut self, env: &mut TypeEnv) -> Result<(), ParseError> {
        loop {
            match self.peek_kind() {
                Some(TokenKind::KwStruct) => self.parse_struct(env)?,
                Some(TokenKind::KwEnum) => self.parse_enum(env)?,
                Some(TokenKind::Semi) => {
                    self.next();
                }
                Some(TokenKind::Eof) | None => return Ok(()),
                Some(other) => {
                    return Err(ParseError::at(
                        self.peek_span(),
                        format!("expected a declaration, found {}", other.describe()),
                    ));
                }
            }
        }
    }

    pub fn expect_eof(&mut self) -> Result<(), ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Eof) | None => Ok(()),
            Some(other) => Err(ParseError::at(
                self.peek_span(),
                format!("unexpected {} after type", other.describe()),
            )),
        }
    }

    fn parse_struct(&mut self, env: &mut TypeEnv) -> Result<(), ParseError> {
        self.expect(TokenKind::KwStruct)?;
        let (name, _) = self.expect_ident()?;
        let base = if self.eat(TokenKind::Colon) {
            let (base_name, span) = self.expect_ident()?;
            let Some(decl) = env.lookup_struct(&base_name) else {
                return Err(ParseError::at(span, format!("unknown base struct `{base_name}`")));
            };
            Some(decl.clone())
        } else {
            None
        };

        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let ty = self.parse_type(env)?;
            let (field, _) = self.expect_ident()?;
            let ty = self.parse_array_suffixes(ty)?;
            self.expect(TokenKind::Semi)?;
            fields.push(Field { name: field, ty });
        }
        self.expect(TokenKind::RBrace)?;
        self.eat(TokenKind::Semi);

        env.declare_struct(&name, base, fields);
        Ok(())
    }

    fn parse_enum(&mut self, env: &mut TypeEnv) -> Result<(), ParseError> {
        self.expect(TokenKind::KwEnum)?;
        let scoped = self.eat(TokenKind::KwClass) || self.eat(TokenKind::KwStruct);
        let (name, _) = self.expect_ident()?;
        if self.eat(TokenKind::LBrace) {
            while !self.at(TokenKind::RBrace) {
                self.expect_ident()?;
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBrace)?;
        }
        self.eat(TokenKind::Semi);
        env.declare_enum(&name, scoped);
        Ok(())
    }

    fn parse_literal(&mut self) -> Result<Option<Operand>, ParseError> {
        let negative = self.at(TokenKind::Minus);
        let offset = usize::from(negative);
        let op = match self.peek_kind_n(offset) {
            Some(TokenKind::Int(n)) => {
                let v = i128::from(*n);
                Operand::with_constant(
                    TyKind::scalar(Builtin::LiteralInt),
                    Constant::Int(if negative { -v } else { v }),
                )
            }
            Some(TokenKind::Uint(n)) if !negative => Operand::with_constant(
                TyKind::scalar(Builtin::Uint),
                Constant::Int(i128::from(*n)),
            ),
            Some(TokenKind::Float(v)) => Operand::with_constant(
                TyKind::scalar(Builtin::LiteralFloat),
                Constant::Float(if negative { -*v } else { *v }),
            ),
            Some(TokenKind::KwTrue) if !negative => {
                Operand::with_constant(TyKind::scalar(Builtin::Bool), Constant::Bool(true))
            }
            Some(TokenKind::KwFalse) if !negative => {
                Operand::with_constant(TyKind::scalar(Builtin::Bool), Constant::Bool(false))
            }
            _ if negative => {
                return Err(ParseError::at(
                    self.peek_span(),
                    "expected a numeric literal after `-`",
                ));
            }
            _ => return Ok(None),
        };
        self.idx += offset + 1;
        Ok(Some(op))
    }

    fn parse_base(&mut self, env: &TypeEnv) -> Result<Ty, ParseError> {
        if self.eat(TokenKind::Dollar) {
            let (name, _) = self.expect_ident()?;
            return Ok(TyKind::param(name));
        }

        let (name, span) = self.expect_ident()?;
        match name.as_str() {
            "void" => return Ok(TyKind::void()),
            "vector" => {
                self.expect(TokenKind::Lt)?;
                let elem = self.parse_type(env)?;
                self.expect(TokenKind::Comma)?;
                let len = self.expect_dim()?;
                self.expect(TokenKind::Gt)?;
                return Ok(TyKind::vector(elem, len));
            }
            "matrix" => {
                self.expect(TokenKind::Lt)?;
                let elem = self.parse_type(env)?;
                self.expect(TokenKind::Comma)?;
                let rows = self.expect_dim()?;
                self.expect(TokenKind::Comma)?;
                let cols = self.expect_dim()?;
                self.expect(TokenKind::Gt)?;
                return Ok(TyKind::matrix(elem, rows, cols));
            }
            _ => {}
        }

        if let Some(b) = Builtin::from_name(&name) {
            return Ok(TyKind::scalar(b));
        }
        if let Some(decl) = env.lookup_struct(&name) {
            return Ok(TyKind::structure(decl.clone()));
        }
        if let Some(decl) = env.lookup_enum(&name) {
            return Ok(TyKind::enumeration(decl.clone()));
        }
        if let Some(kind) = ObjectKind::from_name(&name) {
            let elem = if self.eat(TokenKind::Lt) {
                let elem = self.parse_type(env)?;
                // Sample counts and patch sizes do not affect the type model.
                while self.eat(TokenKind::Comma) {
                    self.expect(TokenKind::Int(0))?;
                }
                self.expect(TokenKind::Gt)?;
                Some(elem)
            } else {
                None
            };
            return Ok(TyKind::object(kind, elem));
        }
        if let Some(ty) = split_shorthand(&name) {
            return Ok(ty);
        }

        Err(ParseError::at(span, format!("unknown type `{name}`")))
    }

    fn parse_array_suffixes(&mut self, mut ty: Ty) -> Result<Ty, ParseError> {
        let mut dims = Vec::new();
        while self.eat(TokenKind::LBracket) {
            if self.eat(TokenKind::RBracket) {
                dims.push(None);
                continue;
            }
            let tok = self.expect_any()?;
            let TokenKind::Int(n) = tok.kind else {
                return Err(ParseError::at(
                    tok.span,
                    format!("expected array length, found {}", tok.kind.describe()),
                ));
            };
            let len = u32::try_from(n)
                .map_err(|_| ParseError::at(tok.span, "array length out of range"))?;
            self.expect(TokenKind::RBracket)?;
            dims.push(Some(len));
        }
        // `T[2][3]` is an array of two `T[3]`.
        for len in dims.into_iter().rev() {
            ty = TyKind::array(ty, len);
        }
        Ok(ty)
    }

    fn expect_dim(&mut self) -> Result<u8, ParseError> {
        let tok = self.expect(TokenKind::Int(0))?;
        match tok.kind {
            TokenKind::Int(n @ 1..=4) => Ok(n as u8),
            _ => Err(ParseError::at(
                tok.span,
                "vector and matrix dimensions must be between 1 and 4",
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        let tok = self.expect_any()?;
        match tok.kind {
            TokenKind::Ident(name) => Ok((name, tok.span)),
            other => Err(ParseError::at(
                tok.span,
                format!("expected identifier, found {}", other.describe()),
            )),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let tok = self.expect_any()?;
        if mem::discriminant(&tok.kind) == mem::discriminant(&expected) {
            Ok(tok)
        } else {
            Err(ParseError::at(
                tok.span,
                format!(
                    "expected {}, found {}",
                    expected_name(&expected),
                    tok.kind.describe()
                ),
            ))
        }
    }

    fn expect_any(&mut self) -> Result<Token, ParseError> {
        self.next()
            .ok_or_else(|| ParseError::at(span_between(0, 0), "unexpected end of input"))
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.idx += 1;
            true
        } else {
            false
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind()
            .is_some_and(|k| mem::discriminant(k) == mem::discriminant(&kind))
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.idx)?.clone();
        self.idx += 1;
        Some(tok)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.idx).map(|t| &t.kind)
    }

    fn peek_kind_n(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.idx + n).map(|t| &t.kind)
    }

    fn peek_span(&self) -> Span {
        self.tokens
            .get(self.idx)
            .map(|t| t.span)
            .unwrap_or_else(|| span_between(0, 0))
    }
}

fn expected_name(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Int(_) => "integer".to_string(),
        TokenKind::Ident(_) => "identifier".to_string(),
        other => other.describe(),
    }
}

/// Splits `float4` / `int3x2` style names into vector/matrix types.
fn split_shorthand(name: &str) -> Option<Ty> {
    let bytes = name.as_bytes();
    let dim = |b: u8| matches!(b, b'1'..=b'4').then(|| b - b'0');

    if bytes.len() > 3 && bytes[bytes.len() - 2] == b'x' {
        let rows = dim(bytes[bytes.len() - 3]);
        let cols = dim(bytes[bytes.len() - 1]);
        if let (Some(rows), Some(cols)) = (rows, cols) {
            let prefix = &name[..name.len() - 3];
            if let Some(b) = Builtin::from_name(prefix).filter(|b| spellable_element(*b)) {
                return Some(TyKind::matrix(TyKind::scalar(b), rows, cols));
            }
        }
    }

    let len = dim(*bytes.last()?)?;
    let prefix = &name[..name.len() - 1];
    let b = Builtin::from_name(prefix).filter(|b| spellable_element(*b))?;
    Some(TyKind::vector(TyKind::scalar(b), len))
}

fn spellable_element(b: Builtin) -> bool {
    !matches!(
        b,
        Builtin::LiteralInt | Builtin::LiteralFloat | Builtin::Char
    )
}
