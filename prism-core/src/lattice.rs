#![forbid(unsafe_code)]

//! Pairwise common-type computation over element kinds.

use prism_ast::ObjectKind;

use crate::kinds::{BitClass, ElementKind, KindFlags};

const PRECISION: KindFlags = KindFlags::MIN_PRECISION.union(KindFlags::PARTIAL_PRECISION);
const CONTEXT_SIZED: KindFlags = KindFlags::LITERAL.union(KindFlags::ENUM);

/// Common kind of two primitive kinds. Commutative; `None` for objects and
/// pseudo kinds.
pub fn combine_basic(a: ElementKind, b: ElementKind) -> Option<ElementKind> {
    let pa = a.props()?;
    let pb = b.props()?;
    if !pa.flags.contains(KindFlags::PRIMITIVE) || !pb.flags.contains(KindFlags::PRIMITIVE) {
        return None;
    }
    if a == b {
        return Some(a);
    }

    let both = pa.flags & pb.flags;
    let either = pa.flags | pb.flags;

    if either.contains(KindFlags::BOOLEAN) {
        return Some(ElementKind::Bool);
    }
    if both.contains(KindFlags::LITERAL) {
        return Some(if either.contains(KindFlags::FLOATING) {
            ElementKind::LiteralFloat
        } else {
            ElementKind::LiteralInt
        });
    }

    let mut flags = (both & (KindFlags::INTEGER | PRECISION)) | (either & KindFlags::FLOATING);
    if !flags.contains(KindFlags::FLOATING) {
        flags |= either & KindFlags::UNSIGNED;
    }
    if pa.flags.intersects(CONTEXT_SIZED) {
        flags |= pb.flags & PRECISION;
    }
    if pb.flags.intersects(CONTEXT_SIZED) {
        flags |= pa.flags & PRECISION;
    }

    let mut bits = pa.bits.max(pb.bits);
    if flags.contains(KindFlags::FLOATING) && !both.contains(KindFlags::FLOATING) {
        // int/float mix: the float side decides the result outright
        let float_side = if pa.flags.contains(KindFlags::FLOATING) { pa } else { pb };
        flags = float_side.flags - KindFlags::LITERAL;
        bits = float_side.bits;
    }
    if bits == BitClass::B0 {
        bits = BitClass::B32;
    }

    select_kind(flags, bits)
}

fn select_kind(flags: KindFlags, bits: BitClass) -> Option<ElementKind> {
    let float = flags.contains(KindFlags::FLOATING);
    let unsigned = flags.contains(KindFlags::UNSIGNED);
    let min = flags.contains(KindFlags::MIN_PRECISION);
    let partial = flags.contains(KindFlags::PARTIAL_PRECISION);

    let kind = match (float, bits) {
        (true, BitClass::B10) => ElementKind::Min10Float,
        (true, BitClass::B16) if min => ElementKind::Min16Float,
        (true, BitClass::B16) => ElementKind::Float16,
        (true, BitClass::B32) if partial => ElementKind::Float32PartialPrecision,
        (true, BitClass::B32) => ElementKind::Float32,
        (true, BitClass::B64) => ElementKind::Float64,
        (false, BitClass::B8) if unsigned => ElementKind::Uint8,
        (false, BitClass::B8) => ElementKind::Int8,
        (false, BitClass::B12) => ElementKind::Min12Int,
        (false, BitClass::B16) => match (min, unsigned) {
            (true, true) => ElementKind::Min16Uint,
            (true, false) => ElementKind::Min16Int,
            (false, true) => ElementKind::Uint16,
            (false, false) => ElementKind::Int16,
        },
        (false, BitClass::B32) if unsigned => ElementKind::Uint32,
        (false, BitClass::B32) => ElementKind::Int32,
        (false, BitClass::B64) if unsigned => ElementKind::Uint64,
        (false, BitClass::B64) => ElementKind::Int64,
        _ => return None,
    };
    Some(kind)
}

/// Whether an object of kind `source` may be used where `target` is
/// expected. Returns `target` on success. Not commutative.
pub fn combine_object(target: ElementKind, source: ElementKind) -> Option<ElementKind> {
    if target == source {
        return Some(target);
    }
    let (ElementKind::Object(t), ElementKind::Object(s)) = (target, source) else {
        return None;
    };
    if s == ObjectKind::Null {
        return Some(target);
    }

    let t_flags = target.props()?.flags;
    let s_flags = source.props()?.flags;
    let state_block = s == ObjectKind::StateBlock;

    let ok = match t {
        ObjectKind::RasterizerState | ObjectKind::DepthStencilState | ObjectKind::BlendState => {
            state_block
        }
        ObjectKind::SamplerComparison => state_block,
        _ if t_flags.intersects(KindFlags::TEXTURE | KindFlags::SAMPLER) => {
            state_block || s_flags.contains(KindFlags::SAMPLER)
        }
        _ => false,
    };
    ok.then_some(target)
}

/// Unifies two kinds the way overload matching does: objects combine in
/// either direction, everything else through [`combine_basic`].
pub fn combine(a: ElementKind, b: ElementKind) -> Option<ElementKind> {
    if a.is_object() || b.is_object() {
        combine_object(a, b).or_else(|| combine_object(b, a))
    } else {
        combine_basic(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ElementKind as K;

    #[test]
    fn int_and_float_combine_to_float() {
        assert_eq!(combine_basic(K::Int32, K::Float32), Some(K::Float32));
        assert_eq!(combine_basic(K::Float32, K::Int32), Some(K::Float32));
    }

    #[test]
    fn min_precision_float_side_wins_over_wider_int() {
        assert_eq!(combine_basic(K::Min16Float, K::Int32), Some(K::Min16Float));
        assert_eq!(combine_basic(K::Int64, K::Min10Float), Some(K::Min10Float));
    }

    #[test]
    fn literals_adopt_the_other_side() {
        assert_eq!(combine_basic(K::LiteralInt, K::LiteralFloat), Some(K::LiteralFloat));
        assert_eq!(combine_basic(K::LiteralInt, K::Min16Int), Some(K::Min16Int));
        assert_eq!(combine_basic(K::LiteralFloat, K::Int16), Some(K::Float32));
        assert_eq!(combine_basic(K::LiteralInt, K::Bool), Some(K::Int32));
        assert_eq!(
            combine_basic(K::LiteralFloat, K::Float32PartialPrecision),
            Some(K::Float32PartialPrecision)
        );
    }

    #[test]
    fn integer_results_take_unsigned_from_either_side() {
        assert_eq!(combine_basic(K::Int16, K::Uint32), Some(K::Uint32));
        assert_eq!(combine_basic(K::Min16Int, K::Min16Uint), Some(K::Min16Uint));
        assert_eq!(combine_basic(K::Int8, K::Uint8), Some(K::Uint8));
    }

    #[test]
    fn precision_flags_need_both_sides() {
        assert_eq!(combine_basic(K::Min16Float, K::Float32), Some(K::Float32));
        assert_eq!(combine_basic(K::Min16Float, K::Float16), Some(K::Float16));
        assert_eq!(combine_basic(K::Min10Float, K::Min16Float), Some(K::Min16Float));
    }

    #[test]
    fn bool_on_either_side_wins() {
        assert_eq!(combine_basic(K::Bool, K::Bool), Some(K::Bool));
        assert_eq!(combine_basic(K::Bool, K::Float16), Some(K::Bool));
        assert_eq!(combine_basic(K::Bool, K::Int32), Some(K::Bool));
        assert_eq!(combine_basic(K::Float32, K::Bool), Some(K::Bool));
        assert_eq!(combine_basic(K::LiteralInt, K::Bool), Some(K::Bool));
    }

    #[test]
    fn enums_widen_to_32_bits() {
        assert_eq!(combine_basic(K::Enum, K::EnumClass), Some(K::Int32));
    }

    #[test]
    fn objects_and_pseudo_kinds_do_not_combine_basically() {
        let tex = K::Object(ObjectKind::Texture2D);
        assert_eq!(combine_basic(tex, tex), None);
        assert_eq!(combine_basic(K::Unknown, K::Int32), None);
        assert_eq!(combine_basic(K::Dependent, K::Dependent), None);
    }

    #[test]
    fn legacy_state_objects_accept_state_blocks() {
        let state = K::Object(ObjectKind::StateBlock);
        let blend = K::Object(ObjectKind::BlendState);
        let sampler = K::Object(ObjectKind::Sampler);
        let cmp = K::Object(ObjectKind::SamplerComparison);
        let tex = K::Object(ObjectKind::Texture2D);
        let null = K::Object(ObjectKind::Null);

        assert_eq!(combine_object(blend, state), Some(blend));
        assert_eq!(combine_object(state, blend), None);
        assert_eq!(combine_object(tex, sampler), Some(tex));
        assert_eq!(combine_object(cmp, state), Some(cmp));
        assert_eq!(combine_object(cmp, sampler), None);
        assert_eq!(combine_object(tex, null), Some(tex));
        assert_eq!(combine(sampler, tex), Some(tex));
    }
}
