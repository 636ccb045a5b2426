use std::fmt;
use std::rc::Rc;

use crate::ObjectKind;

/// Shared handle to a language type.
pub type Ty = Rc<TyKind>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TyKind {
    Void,
    Builtin(Builtin),
    Enum(Rc<EnumDecl>),
    Vector { elem: Ty, len: u8 },
    Matrix { elem: Ty, rows: u8, cols: u8 },
    /// `len == None` is an unsized array (`T[]`).
    Array { elem: Ty, len: Option<u32> },
    Struct(Rc<StructDecl>),
    Object { kind: ObjectKind, elem: Option<Ty> },
    Const(Ty),
    Reference(Ty),
    /// Uninstantiated template parameter; classifies as dependent.
    TemplateParam(String),
}

impl TyKind {
    pub fn void() -> Ty {
        Rc::new(TyKind::Void)
    }

    pub fn scalar(b: Builtin) -> Ty {
        Rc::new(TyKind::Builtin(b))
    }

    pub fn vector(elem: Ty, len: u8) -> Ty {
        Rc::new(TyKind::Vector { elem, len })
    }

    pub fn matrix(elem: Ty, rows: u8, cols: u8) -> Ty {
        Rc::new(TyKind::Matrix { elem, rows, cols })
    }

    pub fn array(elem: Ty, len: Option<u32>) -> Ty {
        Rc::new(TyKind::Array { elem, len })
    }

    pub fn object(kind: ObjectKind, elem: Option<Ty>) -> Ty {
        Rc::new(TyKind::Object { kind, elem })
    }

    pub fn structure(decl: Rc<StructDecl>) -> Ty {
        Rc::new(TyKind::Struct(decl))
    }

    pub fn enumeration(decl: Rc<EnumDecl>) -> Ty {
        Rc::new(TyKind::Enum(decl))
    }

    pub fn constant(inner: Ty) -> Ty {
        Rc::new(TyKind::Const(inner))
    }

    pub fn reference(inner: Ty) -> Ty {
        Rc::new(TyKind::Reference(inner))
    }

    pub fn param(name: impl Into<String>) -> Ty {
        Rc::new(TyKind::TemplateParam(name.into()))
    }
}

impl fmt::Display for TyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TyKind::Void => f.write_str("void"),
            TyKind::Builtin(b) => f.write_str(b.name()),
            TyKind::Enum(decl) => f.write_str(&decl.name),
            TyKind::Vector { elem, len } => match &**elem {
                TyKind::Builtin(b) => write!(f, "{}{len}", b.name()),
                other => write!(f, "vector<{other}, {len}>"),
            },
            TyKind::Matrix { elem, rows, cols } => match &**elem {
                TyKind::Builtin(b) => write!(f, "{}{rows}x{cols}", b.name()),
                other => write!(f, "matrix<{other}, {rows}, {cols}>"),
            },
            TyKind::Array { elem, len } => match len {
                Some(n) => write!(f, "{elem}[{n}]"),
                None => write!(f, "{elem}[]"),
            },
            TyKind::Struct(decl) => f.write_str(&decl.name),
            TyKind::Object { kind, elem } => match elem {
                Some(e) => write!(f, "{}<{e}>", kind.name()),
                None => f.write_str(kind.name()),
            },
            TyKind::Const(inner) => write!(f, "const {inner}"),
            TyKind::Reference(inner) => write!(f, "{inner}&"),
            TyKind::TemplateParam(name) => write!(f, "${name}"),
        }
    }
}

/// Scalar type spellings known to the language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Builtin {
    Bool,
    Char,
    LiteralInt,
    LiteralFloat,
    Half,
    Float,
    FloatPartialPrecision,
    Double,
    Float16,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int,
    Uint,
    Int64,
    Uint64,
    Min10Float,
    Min16Float,
    Min12Int,
    Min16Int,
    Min16Uint,
}

impl Builtin {
    pub const ALL: &'static [Builtin] = &[
        Builtin::Bool,
        Builtin::Char,
        Builtin::LiteralInt,
        Builtin::LiteralFloat,
        Builtin::Half,
        Builtin::Float,
        Builtin::FloatPartialPrecision,
        Builtin::Double,
        Builtin::Float16,
        Builtin::Int8,
        Builtin::Uint8,
        Builtin::Int16,
        Builtin::Uint16,
        Builtin::Int,
        Builtin::Uint,
        Builtin::Int64,
        Builtin::Uint64,
        Builtin::Min10Float,
        Builtin::Min16Float,
        Builtin::Min12Int,
        Builtin::Min16Int,
        Builtin::Min16Uint,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Bool => "bool",
            Builtin::Char => "char",
            Builtin::LiteralInt => "literal_int",
            Builtin::LiteralFloat => "literal_float",
            Builtin::Half => "half",
            Builtin::Float => "float",
            Builtin::FloatPartialPrecision => "float_pp",
            Builtin::Double => "double",
            Builtin::Float16 => "float16_t",
            Builtin::Int8 => "int8_t",
            Builtin::Uint8 => "uint8_t",
            Builtin::Int16 => "int16_t",
            Builtin::Uint16 => "uint16_t",
            Builtin::Int => "int",
            Builtin::Uint => "uint",
            Builtin::Int64 => "int64_t",
            Builtin::Uint64 => "uint64_t",
            Builtin::Min10Float => "min10float",
            Builtin::Min16Float => "min16float",
            Builtin::Min12Int => "min12int",
            Builtin::Min16Int => "min16int",
            Builtin::Min16Uint => "min16uint",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let alias = match name {
            "int32_t" => Some(Builtin::Int),
            "uint32_t" | "dword" => Some(Builtin::Uint),
            "float32_t" => Some(Builtin::Float),
            "float64_t" => Some(Builtin::Double),
            _ => None,
        };
        alias.or_else(|| Self::ALL.iter().copied().find(|b| b.name() == name))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

#[derive(Clone, Debug)]
pub struct EnumDecl {
    pub id: DeclId,
    pub name: String,
    /// `enum class` rather than plain `enum`.
    pub scoped: bool,
}

impl PartialEq for EnumDecl {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EnumDecl {}

impl std::hash::Hash for EnumDecl {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: Ty,
}

/// A struct declaration. Identity is the declaration id, not the layout.
#[derive(Clone, Debug)]
pub struct StructDecl {
    pub id: DeclId,
    pub name: String,
    pub base: Option<Rc<StructDecl>>,
    pub fields: Vec<Field>,
    /// Set for structs the language declares itself (e.g. `RayDesc`).
    pub builtin: Option<ObjectKind>,
}

impl StructDecl {
    pub fn is_derived_from(&self, other: &StructDecl) -> bool {
        let mut cur = self.base.as_deref();
        while let Some(b) = cur {
            if b.id == other.id {
                return true;
            }
            cur = b.base.as_deref();
        }
        false
    }
}

impl PartialEq for StructDecl {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StructDecl {}

impl std::hash::Hash for StructDecl {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Compile-time value of an argument expression, when known.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constant {
    Int(i128),
    Float(f64),
    Bool(bool),
}

/// A call argument: its type plus an optional folded constant.
#[derive(Clone, Debug, PartialEq)]
pub struct Operand {
    pub ty: Ty,
    pub constant: Option<Constant>,
}

impl Operand {
    pub fn new(ty: Ty) -> Self {
        Self { ty, constant: None }
    }

    pub fn with_constant(ty: Ty, constant: Constant) -> Self {
        Self {
            ty,
            constant: Some(constant),
        }
    }
}

impl From<Ty> for Operand {
    fn from(ty: Ty) -> Self {
        Operand::new(ty)
    }
}

/// Peels `const` and reference wrappers.
pub fn strip_qualifiers(ty: &Ty) -> &Ty {
    let mut cur = ty;
    loop {
        match &**cur {
            TyKind::Const(inner) | TyKind::Reference(inner) => cur = inner,
            _ => return cur,
        }
    }
}

pub fn is_const(ty: &Ty) -> bool {
    match &**ty {
        TyKind::Const(_) => true,
        TyKind::Reference(inner) => is_const(inner),
        _ => false,
    }
}
