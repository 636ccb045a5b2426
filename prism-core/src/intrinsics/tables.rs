#![forbid(unsafe_code)]

//! Built-in signature tables: global functions plus per-object methods.
//! Overloads of one name are kept adjacent; lookup relies on it.

use prism_ast::ObjectKind;

use super::{
    C, C2, ComponentRef, ComponentSetId, Dim, Intrinsic, IntrinsicFlags, LegalComponentSet,
    LegalShapeSet, ONE, R, SlotSpec, TemplateRef, Usage,
};
use crate::classify::ShapeKind;
use crate::kinds::ElementKind as K;

// Shape sets

pub const SHAPE_SCALAR: LegalShapeSet = LegalShapeSet {
    kinds: &[ShapeKind::Scalar],
};
pub const SHAPE_VECTOR: LegalShapeSet = LegalShapeSet {
    kinds: &[ShapeKind::Vector],
};
pub const SHAPE_MATRIX: LegalShapeSet = LegalShapeSet {
    kinds: &[ShapeKind::Matrix],
};
pub const SHAPE_ANY: LegalShapeSet = LegalShapeSet {
    kinds: &[ShapeKind::Scalar, ShapeKind::Vector, ShapeKind::Matrix],
};
pub const SHAPE_VOID: LegalShapeSet = LegalShapeSet {
    kinds: &[ShapeKind::Void],
};
pub const SHAPE_OBJECT: LegalShapeSet = LegalShapeSet {
    kinds: &[ShapeKind::Object],
};
pub const SHAPE_STRING: LegalShapeSet = LegalShapeSet {
    kinds: &[ShapeKind::String],
};

// Component sets

pub const COMP_VOID: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Void,
    kinds: &[K::None],
};
pub const COMP_BOOL: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Bool,
    kinds: &[K::Bool],
};
pub const COMP_INT: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Int,
    kinds: &[K::Int32],
};
pub const COMP_UINT: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Uint,
    kinds: &[K::Uint32],
};
pub const COMP_UINT_ONLY: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Uint,
    kinds: &[K::Uint32, K::NoCast],
};
pub const COMP_ANY_INT: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::AnyInt,
    kinds: &[
        K::Int32,
        K::Uint32,
        K::Int64,
        K::Uint64,
        K::Int16,
        K::Uint16,
        K::Min12Int,
        K::Min16Int,
        K::Min16Uint,
    ],
};
pub const COMP_ANY_INT32: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::AnyInt32,
    kinds: &[K::Int32, K::Uint32],
};
pub const COMP_FLOAT: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Float,
    kinds: &[K::Float32],
};
pub const COMP_ANY_FLOAT: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::AnyFloat,
    kinds: &[
        K::Float32,
        K::Float32PartialPrecision,
        K::Float16,
        K::Float64,
        K::Min10Float,
        K::Min16Float,
    ],
};
pub const COMP_FLOAT_LIKE: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::FloatLike,
    kinds: &[
        K::Float32,
        K::Float32PartialPrecision,
        K::Float16,
        K::Min10Float,
        K::Min16Float,
    ],
};
pub const COMP_DOUBLE_ONLY: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Double,
    kinds: &[K::Float64, K::NoCast],
};
pub const COMP_NUMERIC: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Numeric,
    kinds: &[
        K::Float32,
        K::Float32PartialPrecision,
        K::Float16,
        K::Float64,
        K::Min10Float,
        K::Min16Float,
        K::Int32,
        K::Uint32,
        K::Int64,
        K::Uint64,
        K::Int16,
        K::Uint16,
        K::Min12Int,
        K::Min16Int,
        K::Min16Uint,
    ],
};
pub const COMP_NUMERIC32: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Numeric32,
    kinds: &[K::Float32, K::Int32, K::Uint32],
};
pub const COMP_ANY: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Any,
    kinds: &[
        K::Float32,
        K::Float32PartialPrecision,
        K::Float16,
        K::Float64,
        K::Min10Float,
        K::Min16Float,
        K::Int32,
        K::Uint32,
        K::Int64,
        K::Uint64,
        K::Int16,
        K::Uint16,
        K::Min12Int,
        K::Min16Int,
        K::Min16Uint,
        K::Bool,
    ],
};
pub const COMP_SAMPLER: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::Sampler,
    kinds: &[K::Object(ObjectKind::Sampler), K::NoCast],
};
pub const COMP_SAMPLER_CMP: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::SamplerCmp,
    kinds: &[K::Object(ObjectKind::SamplerComparison), K::NoCast],
};
pub const COMP_STRING: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::String,
    kinds: &[K::Object(ObjectKind::String), K::NoCast],
};
pub const COMP_RAY_DESC: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::RayDesc,
    kinds: &[K::Object(ObjectKind::RayDesc), K::NoCast],
};
pub const COMP_ACCEL: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::AccelerationStructure,
    kinds: &[K::Object(ObjectKind::AccelerationStructure), K::NoCast],
};
pub const COMP_UDT: LegalComponentSet = LegalComponentSet {
    id: ComponentSetId::UserDefinedType,
    kinds: &[K::Object(ObjectKind::UserDefinedType), K::NoCast],
};

// Slot shorthands

const fn a(
    name: &'static str,
    template: u8,
    component: u8,
    shapes: &'static LegalShapeSet,
    components: &'static LegalComponentSet,
    rows: Dim,
    cols: Dim,
) -> SlotSpec {
    SlotSpec::new(
        name,
        TemplateRef::Slot(template),
        ComponentRef::Slot(component),
        shapes,
        components,
        rows,
        cols,
    )
}

const fn ret(
    template: u8,
    component: u8,
    shapes: &'static LegalShapeSet,
    components: &'static LegalComponentSet,
    rows: Dim,
    cols: Dim,
) -> SlotSpec {
    a("", template, component, shapes, components, rows, cols)
}

const fn out(s: SlotSpec) -> SlotSpec {
    s.with_usage(Usage::Out)
}

const fn inout(s: SlotSpec) -> SlotSpec {
    s.with_usage(Usage::InOut)
}

const fn scalar(name: &'static str, slot: u8, comps: &'static LegalComponentSet) -> SlotSpec {
    a(name, slot, slot, &SHAPE_SCALAR, comps, ONE, ONE)
}

const fn element(name: &'static str) -> SlotSpec {
    SlotSpec::new(
        name,
        TemplateRef::FromObjectElement,
        ComponentRef::FromObjectElement,
        &SHAPE_ANY,
        &COMP_ANY,
        ONE,
        ONE,
    )
}

const VOID_RET: SlotSpec = ret(0, 0, &SHAPE_VOID, &COMP_VOID, ONE, ONE);

const VARIADIC: SlotSpec = SlotSpec::new(
    "",
    TemplateRef::Variadic,
    ComponentRef::Slot(0),
    &SHAPE_ANY,
    &COMP_ANY,
    ONE,
    ONE,
);

const fn unary(comps: &'static LegalComponentSet) -> [SlotSpec; 2] {
    [
        ret(1, 1, &SHAPE_ANY, comps, R, C),
        a("x", 1, 1, &SHAPE_ANY, comps, R, C),
    ]
}

const fn binary(comps: &'static LegalComponentSet) -> [SlotSpec; 3] {
    [
        ret(1, 1, &SHAPE_ANY, comps, R, C),
        a("a", 1, 1, &SHAPE_ANY, comps, R, C),
        a("b", 1, 1, &SHAPE_ANY, comps, R, C),
    ]
}

const fn ternary(comps: &'static LegalComponentSet) -> [SlotSpec; 4] {
    [
        ret(1, 1, &SHAPE_ANY, comps, R, C),
        a("a", 1, 1, &SHAPE_ANY, comps, R, C),
        a("b", 1, 1, &SHAPE_ANY, comps, R, C),
        a("c", 1, 1, &SHAPE_ANY, comps, R, C),
    ]
}

/// Elementwise reinterpretation: result shares the argument's shape but
/// has its own element kind.
const fn reinterpret(
    result: &'static LegalComponentSet,
    input: &'static LegalComponentSet,
) -> [SlotSpec; 2] {
    [
        ret(1, 0, &SHAPE_ANY, result, R, C),
        a("x", 1, 1, &SHAPE_ANY, input, R, C),
    ]
}

/// Vector reduction to a scalar.
const fn reduce(comps: &'static LegalComponentSet) -> [SlotSpec; 2] {
    [
        ret(0, 1, &SHAPE_SCALAR, comps, ONE, ONE),
        a("x", 1, 1, &SHAPE_VECTOR, comps, ONE, C),
    ]
}

const fn pairwise_reduce(comps: &'static LegalComponentSet) -> [SlotSpec; 3] {
    [
        ret(0, 1, &SHAPE_SCALAR, comps, ONE, ONE),
        a("a", 1, 1, &SHAPE_VECTOR, comps, ONE, C),
        a("b", 1, 1, &SHAPE_VECTOR, comps, ONE, C),
    ]
}

// Global signatures

const FLOAT_UNARY: &[SlotSpec] = &unary(&COMP_FLOAT_LIKE);
const FLOAT_BINARY: &[SlotSpec] = &binary(&COMP_FLOAT_LIKE);
const FLOAT_TERNARY: &[SlotSpec] = &ternary(&COMP_FLOAT_LIKE);
const ANY_FLOAT_UNARY: &[SlotSpec] = &unary(&COMP_ANY_FLOAT);
const NUMERIC_UNARY: &[SlotSpec] = &unary(&COMP_NUMERIC);
const NUMERIC_BINARY: &[SlotSpec] = &binary(&COMP_NUMERIC);
const NUMERIC_TERNARY: &[SlotSpec] = &ternary(&COMP_NUMERIC);

const ALL_ANY: &[SlotSpec] = &[
    ret(0, 0, &SHAPE_SCALAR, &COMP_BOOL, ONE, ONE),
    a("x", 1, 1, &SHAPE_ANY, &COMP_ANY, R, C),
];
const AS_FLOAT: &[SlotSpec] = &reinterpret(&COMP_FLOAT, &COMP_NUMERIC32);
const AS_INT: &[SlotSpec] = &reinterpret(&COMP_INT, &COMP_NUMERIC32);
const AS_UINT: &[SlotSpec] = &reinterpret(&COMP_UINT, &COMP_NUMERIC32);
const COUNTBITS: &[SlotSpec] = &reinterpret(&COMP_UINT, &COMP_ANY_INT);
const F16_TO_F32: &[SlotSpec] = &reinterpret(&COMP_FLOAT, &COMP_UINT_ONLY);
const F32_TO_F16: &[SlotSpec] = &reinterpret(&COMP_UINT, &COMP_FLOAT);
const ISNAN: &[SlotSpec] = &reinterpret(&COMP_BOOL, &COMP_FLOAT_LIKE);
const SIGN: &[SlotSpec] = &reinterpret(&COMP_INT, &COMP_NUMERIC);

const CROSS: &[SlotSpec] = &[
    ret(1, 1, &SHAPE_VECTOR, &COMP_FLOAT_LIKE, ONE, Dim::Fixed(3)),
    a("a", 1, 1, &SHAPE_VECTOR, &COMP_FLOAT_LIKE, ONE, Dim::Fixed(3)),
    a("b", 1, 1, &SHAPE_VECTOR, &COMP_FLOAT_LIKE, ONE, Dim::Fixed(3)),
];
const DETERMINANT: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_SCALAR, &COMP_FLOAT_LIKE, ONE, ONE),
    a("m", 1, 1, &SHAPE_MATRIX, &COMP_FLOAT_LIKE, R, R),
];
const DISTANCE: &[SlotSpec] = &pairwise_reduce(&COMP_FLOAT_LIKE);
const DOT: &[SlotSpec] = &pairwise_reduce(&COMP_NUMERIC);
const FMA: &[SlotSpec] = &ternary(&COMP_DOUBLE_ONLY);
const LENGTH: &[SlotSpec] = &reduce(&COMP_FLOAT_LIKE);
const MODF: &[SlotSpec] = &[
    ret(1, 1, &SHAPE_ANY, &COMP_FLOAT_LIKE, R, C),
    a("x", 1, 1, &SHAPE_ANY, &COMP_FLOAT_LIKE, R, C),
    out(a("ip", 1, 1, &SHAPE_ANY, &COMP_FLOAT_LIKE, R, C)),
];
const NORMALIZE: &[SlotSpec] = &[
    ret(1, 1, &SHAPE_VECTOR, &COMP_FLOAT_LIKE, ONE, C),
    a("x", 1, 1, &SHAPE_VECTOR, &COMP_FLOAT_LIKE, ONE, C),
];
const PRINTF: &[SlotSpec] = &[
    VOID_RET,
    a("format", 1, 1, &SHAPE_STRING, &COMP_STRING, ONE, ONE),
    VARIADIC,
];
const REFLECT: &[SlotSpec] = &[
    ret(1, 1, &SHAPE_VECTOR, &COMP_FLOAT_LIKE, ONE, C),
    a("i", 1, 1, &SHAPE_VECTOR, &COMP_FLOAT_LIKE, ONE, C),
    a("n", 1, 1, &SHAPE_VECTOR, &COMP_FLOAT_LIKE, ONE, C),
];
const SATURATE: &[SlotSpec] = ANY_FLOAT_UNARY;
const SELECT: &[SlotSpec] = &[
    ret(1, 2, &SHAPE_ANY, &COMP_ANY, R, C),
    a("cond", 1, 1, &SHAPE_ANY, &COMP_BOOL, R, C),
    a("t", 1, 2, &SHAPE_ANY, &COMP_ANY, R, C),
    a("f", 1, 2, &SHAPE_ANY, &COMP_ANY, R, C),
];
const SINCOS: &[SlotSpec] = &[
    VOID_RET,
    a("x", 1, 1, &SHAPE_ANY, &COMP_FLOAT_LIKE, R, C),
    out(a("s", 1, 1, &SHAPE_ANY, &COMP_FLOAT_LIKE, R, C)),
    out(a("c", 1, 1, &SHAPE_ANY, &COMP_FLOAT_LIKE, R, C)),
];
const TRANSPOSE: &[SlotSpec] = &[
    ret(1, 1, &SHAPE_MATRIX, &COMP_ANY, C, R),
    a("m", 1, 1, &SHAPE_MATRIX, &COMP_ANY, R, C),
];

// mul: one overload per operand shape pairing.
const MUL_SS: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_SCALAR, &COMP_NUMERIC, ONE, ONE),
    a("a", 1, 1, &SHAPE_SCALAR, &COMP_NUMERIC, ONE, ONE),
    a("b", 2, 1, &SHAPE_SCALAR, &COMP_NUMERIC, ONE, ONE),
];
const MUL_SV: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, C),
    a("a", 1, 1, &SHAPE_SCALAR, &COMP_NUMERIC, ONE, ONE),
    a("b", 2, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, C),
];
const MUL_SM: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_MATRIX, &COMP_NUMERIC, R, C),
    a("a", 1, 1, &SHAPE_SCALAR, &COMP_NUMERIC, ONE, ONE),
    a("b", 2, 1, &SHAPE_MATRIX, &COMP_NUMERIC, R, C),
];
const MUL_VS: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, C),
    a("a", 1, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, C),
    a("b", 2, 1, &SHAPE_SCALAR, &COMP_NUMERIC, ONE, ONE),
];
const MUL_VV: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_SCALAR, &COMP_NUMERIC, ONE, ONE),
    a("a", 1, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, C),
    a("b", 2, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, C),
];
const MUL_VM: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, C),
    a("a", 1, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, R),
    a("b", 2, 1, &SHAPE_MATRIX, &COMP_NUMERIC, R, C),
];
const MUL_MS: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_MATRIX, &COMP_NUMERIC, R, C),
    a("a", 1, 1, &SHAPE_MATRIX, &COMP_NUMERIC, R, C),
    a("b", 2, 1, &SHAPE_SCALAR, &COMP_NUMERIC, ONE, ONE),
];
const MUL_MV: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, R),
    a("a", 1, 1, &SHAPE_MATRIX, &COMP_NUMERIC, R, C),
    a("b", 2, 1, &SHAPE_VECTOR, &COMP_NUMERIC, ONE, C),
];
const MUL_MM: &[SlotSpec] = &[
    ret(0, 1, &SHAPE_MATRIX, &COMP_NUMERIC, R, C2),
    a("a", 1, 1, &SHAPE_MATRIX, &COMP_NUMERIC, R, C),
    a("b", 2, 1, &SHAPE_MATRIX, &COMP_NUMERIC, C, C2),
];

const INTERLOCKED_ADD: &[SlotSpec] = &[
    VOID_RET,
    inout(a("dest", 1, 1, &SHAPE_SCALAR, &COMP_ANY_INT32, ONE, ONE)),
    a("value", 1, 1, &SHAPE_SCALAR, &COMP_ANY_INT32, ONE, ONE),
];
const INTERLOCKED_ADD_ORIGINAL: &[SlotSpec] = &[
    VOID_RET,
    inout(a("dest", 1, 1, &SHAPE_SCALAR, &COMP_ANY_INT32, ONE, ONE)),
    a("value", 1, 1, &SHAPE_SCALAR, &COMP_ANY_INT32, ONE, ONE),
    out(a("original", 1, 1, &SHAPE_SCALAR, &COMP_ANY_INT32, ONE, ONE)),
];

const TRACE_RAY: &[SlotSpec] = &[
    VOID_RET,
    a("AccelerationStructure", 1, 1, &SHAPE_OBJECT, &COMP_ACCEL, ONE, ONE),
    scalar("RayFlags", 2, &COMP_UINT),
    scalar("InstanceInclusionMask", 2, &COMP_UINT),
    scalar("RayContributionToHitGroupIndex", 2, &COMP_UINT),
    scalar("MultiplierForGeometryContributionToHitGroupIndex", 2, &COMP_UINT),
    scalar("MissShaderIndex", 2, &COMP_UINT),
    a("Ray", 7, 7, &SHAPE_OBJECT, &COMP_RAY_DESC, ONE, ONE),
    inout(a("Payload", 8, 8, &SHAPE_OBJECT, &COMP_UDT, ONE, ONE)),
];
const CALL_SHADER: &[SlotSpec] = &[
    VOID_RET,
    scalar("ShaderIndex", 1, &COMP_UINT),
    inout(a("Parameter", 2, 2, &SHAPE_OBJECT, &COMP_UDT, ONE, ONE)),
];
const REPORT_HIT: &[SlotSpec] = &[
    ret(0, 0, &SHAPE_SCALAR, &COMP_BOOL, ONE, ONE),
    scalar("THit", 1, &COMP_FLOAT),
    scalar("HitKind", 2, &COMP_UINT),
    a("Attributes", 3, 3, &SHAPE_OBJECT, &COMP_UDT, ONE, ONE),
];
const WAVE_READ_LANE_AT: &[SlotSpec] = &[
    ret(1, 1, &SHAPE_ANY, &COMP_ANY, R, C),
    a("expr", 1, 1, &SHAPE_ANY, &COMP_ANY, R, C),
    scalar("laneIndex", 2, &COMP_UINT),
];

const NONE: IntrinsicFlags = IntrinsicFlags::READ_NONE;
const WAVE: IntrinsicFlags = IntrinsicFlags::WAVE;
const RO: IntrinsicFlags = IntrinsicFlags::READ_ONLY;
const RW: IntrinsicFlags = IntrinsicFlags::empty();

static GLOBALS: &[Intrinsic] = &[
    Intrinsic::new("abs", 0, NONE, NUMERIC_UNARY),
    Intrinsic::new("all", 1, NONE, ALL_ANY),
    Intrinsic::new("any", 2, NONE, ALL_ANY),
    Intrinsic::new("asfloat", 3, NONE, AS_FLOAT),
    Intrinsic::new("asint", 4, NONE, AS_INT),
    Intrinsic::new("asuint", 5, NONE, AS_UINT),
    Intrinsic::new("ceil", 6, NONE, FLOAT_UNARY),
    Intrinsic::new("clamp", 7, NONE, NUMERIC_TERNARY),
    Intrinsic::new("cos", 8, NONE, FLOAT_UNARY),
    Intrinsic::new("countbits", 9, NONE, COUNTBITS),
    Intrinsic::new("cross", 10, NONE, CROSS),
    Intrinsic::new("degrees", 11, NONE, FLOAT_UNARY),
    Intrinsic::new("determinant", 12, NONE, DETERMINANT),
    Intrinsic::new("distance", 13, NONE, DISTANCE),
    Intrinsic::new("dot", 14, NONE, DOT),
    Intrinsic::new("exp", 15, NONE, FLOAT_UNARY),
    Intrinsic::new("f16tof32", 16, NONE, F16_TO_F32),
    Intrinsic::new("f32tof16", 17, NONE, F32_TO_F16),
    Intrinsic::new("floor", 18, NONE, FLOAT_UNARY),
    Intrinsic::new("fma", 19, NONE, FMA),
    Intrinsic::new("frac", 20, NONE, FLOAT_UNARY),
    Intrinsic::new("isnan", 21, NONE, ISNAN),
    Intrinsic::new("length", 22, NONE, LENGTH),
    Intrinsic::new("lerp", 23, NONE, FLOAT_TERNARY),
    Intrinsic::new("log", 24, NONE, FLOAT_UNARY),
    Intrinsic::new("mad", 25, NONE, NUMERIC_TERNARY),
    Intrinsic::new("max", 26, NONE, NUMERIC_BINARY),
    Intrinsic::new("min", 27, NONE, NUMERIC_BINARY),
    Intrinsic::new("modf", 28, NONE, MODF),
    Intrinsic::new("mul", 29, NONE, MUL_SS),
    Intrinsic::new("mul", 29, NONE, MUL_SV),
    Intrinsic::new("mul", 29, NONE, MUL_SM),
    Intrinsic::new("mul", 29, NONE, MUL_VS),
    Intrinsic::new("mul", 29, NONE, MUL_VV),
    Intrinsic::new("mul", 29, NONE, MUL_VM),
    Intrinsic::new("mul", 29, NONE, MUL_MS),
    Intrinsic::new("mul", 29, NONE, MUL_MV),
    Intrinsic::new("mul", 29, NONE, MUL_MM),
    Intrinsic::new("normalize", 30, NONE, NORMALIZE),
    Intrinsic::new("pow", 31, NONE, FLOAT_BINARY),
    Intrinsic::new("printf", 32, RW, PRINTF),
    Intrinsic::new("radians", 33, NONE, FLOAT_UNARY),
    Intrinsic::new("rcp", 34, NONE, ANY_FLOAT_UNARY),
    Intrinsic::new("reflect", 35, NONE, REFLECT),
    Intrinsic::new("round", 36, NONE, FLOAT_UNARY),
    Intrinsic::new("rsqrt", 37, NONE, FLOAT_UNARY),
    Intrinsic::new("saturate", 38, NONE, SATURATE),
    Intrinsic::new("select", 39, NONE, SELECT),
    Intrinsic::new("sign", 40, NONE, SIGN),
    Intrinsic::new("sin", 41, NONE, FLOAT_UNARY),
    Intrinsic::new("sincos", 42, NONE, SINCOS),
    Intrinsic::new("smoothstep", 43, NONE, FLOAT_TERNARY),
    Intrinsic::new("sqrt", 44, NONE, FLOAT_UNARY),
    Intrinsic::new("step", 45, NONE, FLOAT_BINARY),
    Intrinsic::new("tan", 46, NONE, FLOAT_UNARY),
    Intrinsic::new("transpose", 47, NONE, TRANSPOSE),
    Intrinsic::new("InterlockedAdd", 48, RW, INTERLOCKED_ADD),
    Intrinsic::new("InterlockedAdd", 48, RW, INTERLOCKED_ADD_ORIGINAL),
    Intrinsic::new("TraceRay", 49, RW, TRACE_RAY),
    Intrinsic::new("CallShader", 50, RW, CALL_SHADER),
    Intrinsic::new("ReportHit", 51, RW, REPORT_HIT),
    Intrinsic::new("WaveActiveSum", 52, WAVE, NUMERIC_UNARY),
    Intrinsic::new("WaveReadLaneAt", 53, WAVE, WAVE_READ_LANE_AT),
];

// Object methods

const ELEMENT_RET: SlotSpec = element("");

const TEX_SAMPLE: &[SlotSpec] = &[
    ELEMENT_RET,
    a("s", 1, 1, &SHAPE_OBJECT, &COMP_SAMPLER, ONE, ONE),
    a("location", 2, 2, &SHAPE_VECTOR, &COMP_FLOAT, ONE, Dim::Fixed(2)),
];
const TEX_SAMPLE_OFFSET: &[SlotSpec] = &[
    ELEMENT_RET,
    a("s", 1, 1, &SHAPE_OBJECT, &COMP_SAMPLER, ONE, ONE),
    a("location", 2, 2, &SHAPE_VECTOR, &COMP_FLOAT, ONE, Dim::Fixed(2)),
    a("offset", 3, 3, &SHAPE_VECTOR, &COMP_INT, ONE, Dim::Fixed(2)),
];
const TEX_SAMPLE_LEVEL: &[SlotSpec] = &[
    ELEMENT_RET,
    a("s", 1, 1, &SHAPE_OBJECT, &COMP_SAMPLER, ONE, ONE),
    a("location", 2, 2, &SHAPE_VECTOR, &COMP_FLOAT, ONE, Dim::Fixed(2)),
    scalar("lod", 3, &COMP_FLOAT),
];
const TEX_SAMPLE_CMP: &[SlotSpec] = &[
    ret(0, 0, &SHAPE_SCALAR, &COMP_FLOAT, ONE, ONE),
    a("s", 1, 1, &SHAPE_OBJECT, &COMP_SAMPLER_CMP, ONE, ONE),
    a("location", 2, 2, &SHAPE_VECTOR, &COMP_FLOAT, ONE, Dim::Fixed(2)),
    scalar("compareValue", 3, &COMP_FLOAT),
];
const TEX_LOAD: &[SlotSpec] = &[
    ELEMENT_RET,
    a("location", 1, 1, &SHAPE_VECTOR, &COMP_INT, ONE, Dim::Fixed(3)),
];
const TEX_DIMENSIONS: &[SlotSpec] = &[
    VOID_RET,
    out(scalar("width", 1, &COMP_UINT)),
    out(a("height", 1, 1, &SHAPE_SCALAR, &COMP_UINT, ONE, ONE)),
];
const TEX_DIMENSIONS_MIP: &[SlotSpec] = &[
    VOID_RET,
    scalar("mipLevel", 1, &COMP_UINT),
    out(scalar("width", 2, &COMP_UINT)),
    out(a("height", 2, 2, &SHAPE_SCALAR, &COMP_UINT, ONE, ONE)),
    out(a("levels", 2, 2, &SHAPE_SCALAR, &COMP_UINT, ONE, ONE)),
];
const RW_TEX_LOAD: &[SlotSpec] = &[
    ELEMENT_RET,
    a("location", 1, 1, &SHAPE_VECTOR, &COMP_INT, ONE, Dim::Fixed(2)),
];
const BUFFER_LOAD: &[SlotSpec] = &[ELEMENT_RET, scalar("location", 1, &COMP_INT)];
const BAB_LOAD: &[SlotSpec] = &[
    SlotSpec::new(
        "",
        TemplateRef::FromExplicitArg,
        ComponentRef::Slot(0),
        &SHAPE_ANY,
        &COMP_ANY,
        ONE,
        ONE,
    ),
    scalar("address", 1, &COMP_UINT),
];
const BAB_LOAD2: &[SlotSpec] = &[
    ret(0, 0, &SHAPE_VECTOR, &COMP_UINT, ONE, Dim::Fixed(2)),
    scalar("address", 1, &COMP_UINT),
];
const BAB_STORE: &[SlotSpec] = &[
    VOID_RET,
    scalar("address", 1, &COMP_UINT),
    SlotSpec::new(
        "value",
        TemplateRef::FromExplicitArg,
        ComponentRef::Slot(2),
        &SHAPE_ANY,
        &COMP_ANY,
        ONE,
        ONE,
    ),
];
const APPEND: &[SlotSpec] = &[VOID_RET, element("value")];
const CONSUME: &[SlotSpec] = &[ELEMENT_RET];

static TEXTURE2D_METHODS: &[Intrinsic] = &[
    Intrinsic::new("GetDimensions", 100, RO, TEX_DIMENSIONS),
    Intrinsic::new("GetDimensions", 100, RO, TEX_DIMENSIONS_MIP),
    Intrinsic::new("Load", 101, RO, TEX_LOAD),
    Intrinsic::new("Sample", 102, RO, TEX_SAMPLE),
    Intrinsic::new("Sample", 102, RO, TEX_SAMPLE_OFFSET),
    Intrinsic::new("SampleCmp", 103, RO, TEX_SAMPLE_CMP),
    Intrinsic::new("SampleLevel", 104, RO, TEX_SAMPLE_LEVEL),
];
static RW_TEXTURE2D_METHODS: &[Intrinsic] = &[
    Intrinsic::new("GetDimensions", 100, RO, TEX_DIMENSIONS),
    Intrinsic::new("Load", 101, RO, RW_TEX_LOAD),
];
static BUFFER_METHODS: &[Intrinsic] = &[Intrinsic::new("Load", 110, RO, BUFFER_LOAD)];
static BYTE_ADDRESS_BUFFER_METHODS: &[Intrinsic] = &[
    Intrinsic::new("Load", 120, RO, BAB_LOAD),
    Intrinsic::new("Load2", 121, RO, BAB_LOAD2),
];
static RW_BYTE_ADDRESS_BUFFER_METHODS: &[Intrinsic] = &[
    Intrinsic::new("Load", 120, RO, BAB_LOAD),
    Intrinsic::new("Load2", 121, RO, BAB_LOAD2),
    Intrinsic::new("Store", 122, RW, BAB_STORE),
];
static APPEND_METHODS: &[Intrinsic] = &[Intrinsic::new("Append", 130, RW, APPEND)];
static CONSUME_METHODS: &[Intrinsic] = &[Intrinsic::new("Consume", 131, RW, CONSUME)];

pub fn global_intrinsics() -> &'static [Intrinsic] {
    GLOBALS
}

/// Built-in table for `type_name`; `""` selects the global functions.
pub fn builtin_table(type_name: &str) -> &'static [Intrinsic] {
    if type_name.is_empty() {
        return GLOBALS;
    }
    let Some(kind) = ObjectKind::from_name(type_name) else {
        return &[];
    };
    match kind {
        ObjectKind::Texture2D => TEXTURE2D_METHODS,
        ObjectKind::RwTexture2D => RW_TEXTURE2D_METHODS,
        ObjectKind::Buffer
        | ObjectKind::RwBuffer
        | ObjectKind::StructuredBuffer
        | ObjectKind::RwStructuredBuffer => BUFFER_METHODS,
        ObjectKind::ByteAddressBuffer => BYTE_ADDRESS_BUFFER_METHODS,
        ObjectKind::RwByteAddressBuffer => RW_BYTE_ADDRESS_BUFFER_METHODS,
        ObjectKind::AppendStructuredBuffer => APPEND_METHODS,
        ObjectKind::ConsumeStructuredBuffer => CONSUME_METHODS,
        _ => &[],
    }
}
