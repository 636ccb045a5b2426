#![forbid(unsafe_code)]

//! Implicit and explicit conversions between value types.

use bitflags::bitflags;
use prism_ast::{Constant, ObjectKind, Operand, Ty, TyKind, strip_qualifiers};

use crate::classify::{Classify, ShapeKind, TypeDescriptor, leaf_count, leaves};
use crate::error::ConversionRejected;
use crate::kinds::{BitClass, ElementKind};
use crate::lattice::combine_object;
use crate::options::{LangVersion, SessionOptions};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Remarks: u8 {
        const IDENTICAL      = 1 << 0;
        const TO_VOID        = 1 << 1;
        const ELT_TRUNCATION = 1 << 2;
        const PRECISION_LOSS = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DimensionStep {
    Identity,
    /// One element broadcast to every component.
    Splat,
    /// Trailing components dropped.
    Truncate,
    /// One-element vector or matrix to scalar.
    ToScalar,
    /// Vector <-> matrix with the same component count.
    Linearize,
    /// Explicit growth; new components are zero.
    Extend,
    /// Aggregate compared leaf by leaf.
    Flat,
    DerivedToBase,
    /// Constant/texture buffer handle to its declared struct.
    ResultUnwrap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentStep {
    Identity,
    Boolean,
    IntegralPromotion,
    IntegralConversion,
    FloatingPromotion,
    FloatingConversion,
    FloatToInt,
    IntToFloat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConversionSequence {
    pub dimension: DimensionStep,
    pub component: ComponentStep,
    pub remarks: Remarks,
}

impl ConversionSequence {
    fn new(dimension: DimensionStep, component: ComponentStep, remarks: Remarks) -> Self {
        Self {
            dimension,
            component,
            remarks,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.dimension == DimensionStep::Identity && self.component == ComponentStep::Identity
    }
}

// Leaf comparisons give up on aggregates larger than this.
const MAX_FLAT_LEAVES: u64 = 4096;

pub struct ConversionEngine<'a> {
    classifier: &'a dyn Classify,
    options: &'a SessionOptions,
}

impl<'a> ConversionEngine<'a> {
    pub fn new(classifier: &'a dyn Classify, options: &'a SessionOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    pub fn can_convert(
        &self,
        source: &Operand,
        target: &Ty,
        explicit: bool,
    ) -> Result<ConversionSequence, ConversionRejected> {
        self.check(source, target, explicit)
            .ok_or_else(|| ConversionRejected {
                from: source.ty.to_string(),
                to: target.to_string(),
                explicit,
            })
    }

    pub fn can_convert_type(
        &self,
        source: &Ty,
        target: &Ty,
        explicit: bool,
    ) -> Result<ConversionSequence, ConversionRejected> {
        self.can_convert(&Operand::new(source.clone()), target, explicit)
    }

    fn check(&self, source: &Operand, target: &Ty, explicit: bool) -> Option<ConversionSequence> {
        let s_ty = strip_qualifiers(&source.ty);
        let t_ty = strip_qualifiers(target);

        if s_ty == t_ty {
            return Some(ConversionSequence::new(
                DimensionStep::Identity,
                ComponentStep::Identity,
                Remarks::IDENTICAL,
            ));
        }

        let s = self.classifier.classify(s_ty);
        let t = self.classifier.classify(t_ty);

        if s.shape == ShapeKind::Dependent || t.shape == ShapeKind::Dependent {
            return Some(ConversionSequence::new(
                DimensionStep::Identity,
                ComponentStep::Identity,
                Remarks::empty(),
            ));
        }

        match (s.shape == ShapeKind::Void, t.shape == ShapeKind::Void) {
            (true, true) => {
                return Some(ConversionSequence::new(
                    DimensionStep::Identity,
                    ComponentStep::Identity,
                    Remarks::TO_VOID,
                ));
            }
            (false, true) => {
                return explicit.then(|| {
                    ConversionSequence::new(
                        DimensionStep::Identity,
                        ComponentStep::Identity,
                        Remarks::TO_VOID,
                    )
                });
            }
            (true, false) => return None,
            (false, false) => {}
        }

        if t.shape == ShapeKind::Compound {
            if let TyKind::Object {
                kind: ObjectKind::ConstantBuffer | ObjectKind::TextureBuffer,
                elem,
            } = &**s_ty
            {
                let matches = elem.as_ref().is_some_and(|e| strip_qualifiers(e) == t_ty);
                return matches.then(|| {
                    ConversionSequence::new(
                        DimensionStep::ResultUnwrap,
                        ComponentStep::Identity,
                        Remarks::empty(),
                    )
                });
            }
        }

        if s.is_aggregate() || t.is_aggregate() {
            return self.convert_aggregate(source, s_ty, &s, t_ty, &t, explicit);
        }

        if s.shape == ShapeKind::Object || t.shape == ShapeKind::Object {
            return convert_object(&t, &s);
        }

        let mut remarks = Remarks::empty();
        let dimension = convert_dimensions(&t, &s, explicit, &mut remarks)?;
        let component = convert_component(t.element, s.element, source.constant, &mut remarks)?;
        Some(ConversionSequence::new(dimension, component, remarks))
    }

    fn convert_aggregate(
        &self,
        source: &Operand,
        s_ty: &Ty,
        s: &TypeDescriptor,
        t_ty: &Ty,
        t: &TypeDescriptor,
        explicit: bool,
    ) -> Option<ConversionSequence> {
        if !explicit && !(s.is_aggregate() && t.is_aggregate()) {
            return None;
        }

        if let (TyKind::Struct(sd), TyKind::Struct(td)) = (&**s_ty, &**t_ty) {
            if sd.id == td.id {
                return Some(ConversionSequence::new(
                    DimensionStep::Flat,
                    ComponentStep::Identity,
                    Remarks::empty(),
                ));
            }
            if sd.is_derived_from(td) {
                return Some(ConversionSequence::new(
                    DimensionStep::DerivedToBase,
                    ComponentStep::Identity,
                    Remarks::empty(),
                ));
            }
        }

        if explicit && !s.is_aggregate() && s.total_elements == 1 && splattable(s.element) {
            let target_leaves = self.leaf_kinds(t_ty)?;
            if target_leaves.iter().all(|k| k.is_numeric()) {
                return Some(ConversionSequence::new(
                    DimensionStep::Splat,
                    ComponentStep::Identity,
                    Remarks::empty(),
                ));
            }
        }

        if !explicit
            && self.options.lang_version >= LangVersion::V2021
            && (s.shape == ShapeKind::Compound || t.shape == ShapeKind::Compound)
        {
            return None;
        }

        let s_leaves = self.leaf_kinds(s_ty)?;
        let t_leaves = self.leaf_kinds(t_ty)?;

        if t_leaves.len() > s_leaves.len() && !(explicit && s.shape == ShapeKind::Scalar) {
            return None;
        }
        if !explicit && t_leaves.len() != s_leaves.len() {
            return None;
        }

        let mut remarks = Remarks::empty();
        let mut component = ComponentStep::Identity;
        for (i, &tk) in t_leaves.iter().enumerate() {
            let sk = if s.shape == ShapeKind::Scalar {
                s.element
            } else {
                s_leaves[i]
            };
            if tk == sk {
                continue;
            }
            if !explicit || tk.is_object() || sk.is_object() {
                return None;
            }
            let step = convert_component(tk, sk, source.constant, &mut remarks)?;
            if component == ComponentStep::Identity {
                component = step;
            }
        }
        if s_leaves.len() > t_leaves.len() {
            remarks |= Remarks::ELT_TRUNCATION;
        }

        Some(ConversionSequence::new(DimensionStep::Flat, component, remarks))
    }

    fn leaf_kinds(&self, ty: &Ty) -> Option<Vec<ElementKind>> {
        if leaf_count(ty) > MAX_FLAT_LEAVES {
            return None;
        }
        Some(
            leaves(ty, MAX_FLAT_LEAVES as usize)
                .iter()
                .map(|leaf| self.classifier.element_kind(leaf))
                .collect(),
        )
    }
}

/// Distinct object types only convert through the legacy state-object
/// rules; two instantiations of one object category never do.
fn convert_object(target: &TypeDescriptor, source: &TypeDescriptor) -> Option<ConversionSequence> {
    if target.shape != ShapeKind::Object || source.shape != ShapeKind::Object {
        return None;
    }
    if target.element == source.element {
        return None;
    }
    combine_object(target.element, source.element)?;
    Some(ConversionSequence::new(
        DimensionStep::Identity,
        ComponentStep::Identity,
        Remarks::empty(),
    ))
}

fn splattable(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Int32
            | ElementKind::Uint32
            | ElementKind::Float32
            | ElementKind::LiteralInt
            | ElementKind::LiteralFloat
    )
}

/// Shape half of a conversion between scalar/vector/matrix/string
/// descriptors.
pub fn convert_dimensions(
    target: &TypeDescriptor,
    source: &TypeDescriptor,
    explicit: bool,
    remarks: &mut Remarks,
) -> Option<DimensionStep> {
    let s_count = source.total_elements;
    let step = match target.shape {
        ShapeKind::Scalar => match source.shape {
            ShapeKind::Scalar => DimensionStep::Identity,
            ShapeKind::Vector | ShapeKind::Matrix if s_count > 1 => DimensionStep::Truncate,
            ShapeKind::Vector | ShapeKind::Matrix => DimensionStep::ToScalar,
            _ => return None,
        },
        ShapeKind::Vector => {
            let n = target.total_elements;
            match source.shape {
                ShapeKind::Scalar => DimensionStep::Splat,
                ShapeKind::Vector => resize(n, s_count, explicit)?,
                ShapeKind::Matrix => {
                    if s_count == 1 && n > 1 {
                        DimensionStep::Splat
                    } else if source.rows == 1 || source.cols == 1 {
                        resize(n, s_count, explicit)?
                    } else if n == s_count {
                        DimensionStep::Linearize
                    } else {
                        return None;
                    }
                }
                _ => return None,
            }
        }
        ShapeKind::Matrix => {
            let n = target.total_elements;
            match source.shape {
                ShapeKind::Scalar => DimensionStep::Splat,
                ShapeKind::Vector => {
                    if s_count == 1 && n > 1 {
                        DimensionStep::Splat
                    } else if target.rows == 1 || target.cols == 1 {
                        resize(n, s_count, explicit)?
                    } else if n == s_count {
                        DimensionStep::Linearize
                    } else {
                        return None;
                    }
                }
                ShapeKind::Matrix => {
                    if s_count == 1 && n > 1 {
                        DimensionStep::Splat
                    } else if target.rows <= source.rows && target.cols <= source.cols {
                        if n < s_count {
                            DimensionStep::Truncate
                        } else {
                            DimensionStep::Identity
                        }
                    } else if explicit {
                        DimensionStep::Extend
                    } else {
                        return None;
                    }
                }
                _ => return None,
            }
        }
        ShapeKind::String if source.shape == ShapeKind::String => DimensionStep::Identity,
        _ => return None,
    };

    if target.total_elements < s_count {
        *remarks |= Remarks::ELT_TRUNCATION;
    }
    Some(step)
}

fn resize(target: u64, source: u64, explicit: bool) -> Option<DimensionStep> {
    if target == source {
        Some(DimensionStep::Identity)
    } else if target < source {
        Some(DimensionStep::Truncate)
    } else if source == 1 {
        Some(DimensionStep::Splat)
    } else if explicit {
        Some(DimensionStep::Extend)
    } else {
        None
    }
}

/// Element half of a conversion. Sets `PRECISION_LOSS` when the target is
/// narrower, unless `constant` is known to fit.
pub fn convert_component(
    target: ElementKind,
    source: ElementKind,
    constant: Option<Constant>,
    remarks: &mut Remarks,
) -> Option<ComponentStep> {
    if matches!(target, ElementKind::Unknown | ElementKind::None)
        || matches!(source, ElementKind::Unknown | ElementKind::None)
    {
        return None;
    }
    if target == ElementKind::Dependent || source == ElementKind::Dependent {
        return Some(ComponentStep::Identity);
    }
    if target == source {
        return Some(ComponentStep::Identity);
    }
    if target.is_object() || source.is_object() || target.is_pseudo() || source.is_pseudo() {
        return None;
    }
    if target.is_bool() {
        return Some(ComponentStep::Boolean);
    }
    if target.is_enum() {
        return None;
    }

    let narrower = target.bits() != BitClass::B0 && target.bits() < source.bits();

    let step = if source.is_enum() || source.is_bool() {
        if target.is_float() {
            ComponentStep::IntToFloat
        } else {
            ComponentStep::IntegralConversion
        }
    } else if source.is_integral() {
        if target.is_float() {
            ComponentStep::IntToFloat
        } else if narrower {
            ComponentStep::IntegralConversion
        } else {
            ComponentStep::IntegralPromotion
        }
    } else if target.is_float() {
        if narrower {
            ComponentStep::FloatingConversion
        } else {
            ComponentStep::FloatingPromotion
        }
    } else {
        ComponentStep::FloatToInt
    };

    if narrower && !constant.is_some_and(|c| constant_fits(target, c)) {
        *remarks |= Remarks::PRECISION_LOSS;
    }
    Some(step)
}

/// Whether `value` is exactly representable as `kind`.
pub fn constant_fits(kind: ElementKind, value: Constant) -> bool {
    match value {
        Constant::Bool(_) => true,
        Constant::Int(v) => {
            if kind.is_float() {
                let limit: i128 = match kind.bits() {
                    BitClass::B64 => 1 << 53,
                    BitClass::B32 => 1 << 24,
                    _ => 1 << 11,
                };
                v.abs() <= limit
            } else {
                int_range(kind).is_some_and(|(lo, hi)| (lo..=hi).contains(&v))
            }
        }
        Constant::Float(x) => {
            if !x.is_finite() {
                return false;
            }
            if kind.is_float() {
                match kind.bits() {
                    BitClass::B64 => true,
                    BitClass::B32 => f64::from(x as f32) == x,
                    _ => fits_half(x),
                }
            } else {
                x.fract() == 0.0
                    && int_range(kind)
                        .is_some_and(|(lo, hi)| x >= lo as f64 && x <= hi as f64)
            }
        }
    }
}

fn int_range(kind: ElementKind) -> Option<(i128, i128)> {
    let range = match kind {
        ElementKind::Int8 => (i128::from(i8::MIN), i128::from(i8::MAX)),
        ElementKind::Uint8 => (0, i128::from(u8::MAX)),
        ElementKind::Int16 | ElementKind::Min16Int => {
            (i128::from(i16::MIN), i128::from(i16::MAX))
        }
        ElementKind::Uint16 | ElementKind::Min16Uint => (0, i128::from(u16::MAX)),
        ElementKind::Min12Int => (-2048, 2047),
        ElementKind::Int32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
        ElementKind::Uint32 => (0, i128::from(u32::MAX)),
        ElementKind::Int64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
        ElementKind::Uint64 => (0, i128::from(u64::MAX)),
        _ => return None,
    };
    Some(range)
}

// 11 significant bits, largest finite value 65504, subnormals down to 2^-24.
fn fits_half(x: f64) -> bool {
    if x == 0.0 {
        return true;
    }
    let a = x.abs();
    if a > 65504.0 {
        return false;
    }
    let exp = a.log2().floor().max(-14.0);
    let scaled = a / (exp - 10.0).exp2();
    scaled.fract() == 0.0
}
