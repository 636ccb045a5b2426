#![forbid(unsafe_code)]

use std::fmt;

use bitflags::bitflags;
use prism_ast::{Builtin, ObjectKind};

/// The element type of a scalar, vector, matrix, or object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Bool,
    LiteralFloat,
    Float16,
    Float32PartialPrecision,
    Float32,
    Float64,
    LiteralInt,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Min10Float,
    Min16Float,
    Min12Int,
    Min16Int,
    Min16Uint,
    Enum,
    EnumClass,
    Object(ObjectKind),

    // Table sentinels, never the kind of a real value.
    None,
    Unknown,
    NoCast,
    Dependent,
    Pointer,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KindFlags: u32 {
        const PRIMITIVE         = 1 << 0;
        const NUMERIC           = 1 << 1;
        const INTEGER           = 1 << 2;
        const FLOATING          = 1 << 3;
        const BOOLEAN           = 1 << 4;
        const UNSIGNED          = 1 << 5;
        const LITERAL           = 1 << 6;
        const MIN_PRECISION     = 1 << 7;
        const PARTIAL_PRECISION = 1 << 8;
        const ENUM              = 1 << 9;
        const OBJECT            = 1 << 10;
        const TEXTURE           = 1 << 11;
        const SAMPLER           = 1 << 12;
        const SAMPLER_CMP       = 1 << 13;
        const RBUFFER           = 1 << 14;
        const RWBUFFER          = 1 << 15;
        const STREAM            = 1 << 16;
        const PATCH             = 1 << 17;
        const STATE             = 1 << 18;
        const STRING            = 1 << 19;
    }
}

/// Storage class used to order kinds by width. `B0` marks kinds whose width
/// is decided by context (literals, bool, enums, objects).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BitClass {
    B0,
    B8,
    B10,
    B12,
    B16,
    B32,
    B64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KindProps {
    pub flags: KindFlags,
    pub bits: BitClass,
}

const fn p(flags: KindFlags, bits: BitClass) -> KindProps {
    KindProps { flags, bits }
}

const PRIM_NUM: KindFlags = KindFlags::PRIMITIVE.union(KindFlags::NUMERIC);
const FLOAT: KindFlags = PRIM_NUM.union(KindFlags::FLOATING);
const INT: KindFlags = PRIM_NUM.union(KindFlags::INTEGER);
const UINT: KindFlags = INT.union(KindFlags::UNSIGNED);
const MIN: KindFlags = KindFlags::MIN_PRECISION;

impl ElementKind {
    /// The scalar kinds, in table order.
    pub const SCALARS: &'static [ElementKind] = &[
        ElementKind::Bool,
        ElementKind::LiteralFloat,
        ElementKind::Float16,
        ElementKind::Float32PartialPrecision,
        ElementKind::Float32,
        ElementKind::Float64,
        ElementKind::LiteralInt,
        ElementKind::Int8,
        ElementKind::Uint8,
        ElementKind::Int16,
        ElementKind::Uint16,
        ElementKind::Int32,
        ElementKind::Uint32,
        ElementKind::Int64,
        ElementKind::Uint64,
        ElementKind::Min10Float,
        ElementKind::Min16Float,
        ElementKind::Min12Int,
        ElementKind::Min16Int,
        ElementKind::Min16Uint,
        ElementKind::Enum,
        ElementKind::EnumClass,
    ];

    /// Property record; `None` for the pseudo kinds.
    pub fn props(self) -> Option<KindProps> {
        use BitClass::*;
        let props = match self {
            ElementKind::Bool => p(INT.union(KindFlags::BOOLEAN), B0),
            ElementKind::LiteralFloat => p(FLOAT.union(KindFlags::LITERAL), B0),
            ElementKind::Float16 => p(FLOAT, B16),
            ElementKind::Float32PartialPrecision => {
                p(FLOAT.union(KindFlags::PARTIAL_PRECISION), B32)
            }
            ElementKind::Float32 => p(FLOAT, B32),
            ElementKind::Float64 => p(FLOAT, B64),
            ElementKind::LiteralInt => p(INT.union(KindFlags::LITERAL), B0),
            ElementKind::Int8 => p(INT, B8),
            ElementKind::Uint8 => p(UINT, B8),
            ElementKind::Int16 => p(INT, B16),
            ElementKind::Uint16 => p(UINT, B16),
            ElementKind::Int32 => p(INT, B32),
            ElementKind::Uint32 => p(UINT, B32),
            ElementKind::Int64 => p(INT, B64),
            ElementKind::Uint64 => p(UINT, B64),
            ElementKind::Min10Float => p(FLOAT.union(MIN), B10),
            ElementKind::Min16Float => p(FLOAT.union(MIN), B16),
            ElementKind::Min12Int => p(INT.union(MIN), B12),
            ElementKind::Min16Int => p(INT.union(MIN), B16),
            ElementKind::Min16Uint => p(UINT.union(MIN), B16),
            ElementKind::Enum | ElementKind::EnumClass => p(INT.union(KindFlags::ENUM), B0),
            ElementKind::Object(kind) => p(object_flags(kind), B0),
            ElementKind::None
            | ElementKind::Unknown
            | ElementKind::NoCast
            | ElementKind::Dependent
            | ElementKind::Pointer => return None,
        };
        Some(props)
    }

    fn flags(self) -> KindFlags {
        self.props().map_or(KindFlags::empty(), |p| p.flags)
    }

    pub fn bits(self) -> BitClass {
        self.props().map_or(BitClass::B0, |p| p.bits)
    }

    pub fn is_pseudo(self) -> bool {
        self.props().is_none()
    }

    pub fn is_primitive(self) -> bool {
        self.flags().contains(KindFlags::PRIMITIVE)
    }

    pub fn is_numeric(self) -> bool {
        self.flags().contains(KindFlags::NUMERIC)
    }

    /// Integral, including bool and enums.
    pub fn is_integral(self) -> bool {
        self.flags().contains(KindFlags::INTEGER)
    }

    pub fn is_float(self) -> bool {
        self.flags().contains(KindFlags::FLOATING)
    }

    pub fn is_bool(self) -> bool {
        self.flags().contains(KindFlags::BOOLEAN)
    }

    pub fn is_unsigned(self) -> bool {
        self.flags().contains(KindFlags::UNSIGNED)
    }

    pub fn is_literal(self) -> bool {
        self.flags().contains(KindFlags::LITERAL)
    }

    pub fn is_min_precision(self) -> bool {
        self.flags().contains(KindFlags::MIN_PRECISION)
    }

    pub fn is_enum(self) -> bool {
        self.flags().contains(KindFlags::ENUM)
    }

    pub fn is_object(self) -> bool {
        matches!(self, ElementKind::Object(_))
    }

    /// Sized integer: not bool, not an enum, not a literal.
    pub fn is_sized_int(self) -> bool {
        self.is_integral() && !self.is_bool() && !self.is_enum() && !self.is_literal()
    }

    /// Scalar builtin spelling for this kind, if it has one.
    pub fn to_builtin(self) -> Option<Builtin> {
        let b = match self {
            ElementKind::Bool => Builtin::Bool,
            ElementKind::LiteralFloat => Builtin::LiteralFloat,
            ElementKind::Float16 => Builtin::Float16,
            ElementKind::Float32PartialPrecision => Builtin::FloatPartialPrecision,
            ElementKind::Float32 => Builtin::Float,
            ElementKind::Float64 => Builtin::Double,
            ElementKind::LiteralInt => Builtin::LiteralInt,
            ElementKind::Int8 => Builtin::Int8,
            ElementKind::Uint8 => Builtin::Uint8,
            ElementKind::Int16 => Builtin::Int16,
            ElementKind::Uint16 => Builtin::Uint16,
            ElementKind::Int32 => Builtin::Int,
            ElementKind::Uint32 => Builtin::Uint,
            ElementKind::Int64 => Builtin::Int64,
            ElementKind::Uint64 => Builtin::Uint64,
            ElementKind::Min10Float => Builtin::Min10Float,
            ElementKind::Min16Float => Builtin::Min16Float,
            ElementKind::Min12Int => Builtin::Min12Int,
            ElementKind::Min16Int => Builtin::Min16Int,
            ElementKind::Min16Uint => Builtin::Min16Uint,
            _ => return None,
        };
        Some(b)
    }
}

fn object_flags(kind: ObjectKind) -> KindFlags {
    use ObjectKind as O;
    let category = match kind {
        O::String => KindFlags::STRING,
        O::Sampler | O::Sampler1D | O::Sampler2D | O::Sampler3D | O::SamplerCube => {
            KindFlags::SAMPLER
        }
        O::SamplerComparison => KindFlags::SAMPLER_CMP,
        O::Texture
        | O::Texture1D
        | O::Texture1DArray
        | O::Texture2D
        | O::Texture2DArray
        | O::Texture2DMS
        | O::Texture2DMSArray
        | O::Texture3D
        | O::TextureCube
        | O::TextureCubeArray => KindFlags::TEXTURE,
        O::RwTexture1D
        | O::RwTexture1DArray
        | O::RwTexture2D
        | O::RwTexture2DArray
        | O::RwTexture3D
        | O::RwBuffer
        | O::RwByteAddressBuffer
        | O::RwStructuredBuffer
        | O::AppendStructuredBuffer
        | O::ConsumeStructuredBuffer => KindFlags::RWBUFFER,
        O::Buffer
        | O::ByteAddressBuffer
        | O::StructuredBuffer
        | O::ConstantBuffer
        | O::TextureBuffer => KindFlags::RBUFFER,
        O::PointStream | O::LineStream | O::TriangleStream => KindFlags::STREAM,
        O::InputPatch | O::OutputPatch => KindFlags::PATCH,
        O::RasterizerState | O::DepthStencilState | O::BlendState | O::StateBlock => {
            KindFlags::STATE
        }
        O::Null
        | O::RayDesc
        | O::AccelerationStructure
        | O::RayQuery
        | O::UserDefinedType => KindFlags::empty(),
    };
    KindFlags::OBJECT | category
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(b) = self.to_builtin() {
            return f.write_str(b.name());
        }
        match self {
            ElementKind::Enum => f.write_str("enum"),
            ElementKind::EnumClass => f.write_str("enum class"),
            ElementKind::Object(kind) => f.write_str(kind.name()),
            ElementKind::None => f.write_str("<none>"),
            ElementKind::Unknown => f.write_str("<unknown>"),
            ElementKind::NoCast => f.write_str("<nocast>"),
            ElementKind::Dependent => f.write_str("<dependent>"),
            ElementKind::Pointer => f.write_str("<pointer>"),
            _ => write!(f, "{self:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_real_kind_has_props_and_pseudo_kinds_do_not() {
        for k in ElementKind::SCALARS {
            assert!(k.props().is_some(), "{k:?}");
        }
        for o in ObjectKind::ALL {
            assert!(ElementKind::Object(*o).props().is_some());
        }
        for k in [
            ElementKind::None,
            ElementKind::Unknown,
            ElementKind::NoCast,
            ElementKind::Dependent,
            ElementKind::Pointer,
        ] {
            assert!(k.is_pseudo());
        }
    }

    #[test]
    fn bit_classes_are_ordered() {
        assert!(ElementKind::Int8.bits() < ElementKind::Min10Float.bits());
        assert!(ElementKind::Min12Int.bits() < ElementKind::Min16Float.bits());
        assert_eq!(ElementKind::LiteralInt.bits(), BitClass::B0);
        assert_eq!(ElementKind::Uint64.bits(), BitClass::B64);
    }

    #[test]
    fn predicates_follow_flags() {
        assert!(ElementKind::Bool.is_integral());
        assert!(!ElementKind::Bool.is_sized_int());
        assert!(ElementKind::Min16Uint.is_unsigned());
        assert!(ElementKind::Min16Float.is_min_precision());
        assert!(ElementKind::Object(ObjectKind::Texture2D).is_object());
        assert!(!ElementKind::Object(ObjectKind::Texture2D).is_primitive());
    }
}
