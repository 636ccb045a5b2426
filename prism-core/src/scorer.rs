#![forbid(unsafe_code)]

//! Conversion costs and best-candidate selection.

use prism_ast::{Ty, TyKind, strip_qualifiers};
use tracing::{debug, trace};

use crate::classify::{Classify, leaf_count, leaves};
use crate::convert::ConversionSequence;
use crate::kinds::ElementKind;
use crate::lattice::{combine_basic, combine_object};
use crate::matcher::ConcretizedSignature;

pub type Cost = u64;

// Leaf pairs examined per cast; longer types share the verdict of their
// prefix.
const MAX_SCORED_LEAVES: u64 = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Priority {
    SizeGrew = 0,
    TargetPromotion = 1,
    SourcePromotion = 2,
    TargetIntCast = 3,
    SourceIntCast = 4,
    TargetCast = 5,
    SourceCast = 6,
    SizeShrank = 7,
}

impl Priority {
    fn bit(self) -> Cost {
        1 << (2 + 7 * self as u32)
    }
}

/// How an argument reaches its parameter, and for out/inout parameters how
/// the result travels back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArgumentConversion {
    pub into_param: ConversionSequence,
    pub out_of_param: Option<ConversionSequence>,
}

impl ArgumentConversion {
    pub fn is_exact(&self) -> bool {
        use crate::convert::Remarks;
        self.into_param.remarks.contains(Remarks::IDENTICAL)
            && self
                .out_of_param
                .is_none_or(|s| s.remarks.contains(Remarks::IDENTICAL))
    }
}

/// A signature that matched structurally, with one conversion per argument.
/// `None` marks an argument that cannot reach its parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub signature: ConcretizedSignature,
    pub arguments: Vec<Ty>,
    pub conversions: Vec<Option<ArgumentConversion>>,
}

impl Candidate {
    pub fn is_viable(&self) -> bool {
        self.conversions.iter().all(Option::is_some)
    }

    /// Every argument binds without any conversion.
    pub fn is_exact(&self) -> bool {
        self.conversions
            .iter()
            .all(|c| c.as_ref().is_some_and(ArgumentConversion::is_exact))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success(usize),
    Ambiguous { tied: Vec<usize> },
    NoViable,
}

pub struct OverloadScorer<'a> {
    classifier: &'a dyn Classify,
}

impl<'a> OverloadScorer<'a> {
    pub fn new(classifier: &'a dyn Classify) -> Self {
        Self { classifier }
    }

    /// Cost of using a `source` value where `target` is expected. Zero for
    /// identical types; otherwise one bit per kind of adjustment, ordered so
    /// that casts outrank promotions and both outrank size changes.
    pub fn score_cast(&self, target: &Ty, source: &Ty) -> Cost {
        let target = strip_qualifiers(target);
        let source = strip_qualifiers(source);
        if target == source {
            return 0;
        }

        let t_total = leaf_count(target);
        let s_total = leaf_count(source);
        let mut k = t_total.min(s_total);
        if let (
            TyKind::Array { elem: te, len: Some(tl) },
            TyKind::Array { elem: se, len: Some(sl) },
        ) = (&**target, &**source)
        {
            if tl == sl {
                k = k.min(lcm(leaf_count(te), leaf_count(se)));
            }
        }
        let k = k.min(MAX_SCORED_LEAVES) as usize;

        let mut flags = [false; 8];
        let mut set = |p: Priority| flags[p as usize] = true;

        for (t_leaf, s_leaf) in leaves(target, k).iter().zip(leaves(source, k).iter()) {
            let tk = self.classifier.element_kind(t_leaf);
            let sk = self.classifier.element_kind(s_leaf);
            let combined = if tk.is_object() || sk.is_object() {
                // same category, different instantiation
                if tk == sk && strip_qualifiers(t_leaf) != strip_qualifiers(s_leaf) {
                    None
                } else {
                    combine_object(tk, sk)
                }
            } else {
                combine_basic(tk, sk)
            };
            let Some(combined) = combined else {
                set(Priority::TargetCast);
                set(Priority::SourceCast);
                continue;
            };
            if let Some(p) = adjustment(tk, combined, Side::Target) {
                set(p);
            }
            if let Some(p) = adjustment(sk, combined, Side::Source) {
                set(p);
            }
        }

        if s_total < t_total {
            set(Priority::SizeGrew);
        }
        if t_total < s_total {
            set(Priority::SizeShrank);
        }

        const ORDER: [Priority; 8] = [
            Priority::SizeGrew,
            Priority::TargetPromotion,
            Priority::SourcePromotion,
            Priority::TargetIntCast,
            Priority::SourceIntCast,
            Priority::TargetCast,
            Priority::SourceCast,
            Priority::SizeShrank,
        ];
        ORDER
            .iter()
            .filter(|p| flags[**p as usize])
            .fold(0, |acc, p| acc | p.bit())
    }

    /// Sum of every argument's cost, both directions for out/inout
    /// parameters. Non-viable candidates cost [`Cost::MAX`].
    pub fn score_candidate(&self, candidate: &Candidate) -> Cost {
        let mut total: Cost = 0;
        for ((conversion, param), arg) in candidate
            .conversions
            .iter()
            .zip(&candidate.signature.params)
            .zip(&candidate.arguments)
        {
            let Some(conversion) = conversion else {
                return Cost::MAX;
            };
            total = total.saturating_add(self.score_cast(param, arg));
            if conversion.out_of_param.is_some() {
                total = total.saturating_add(self.score_cast(arg, param));
            }
        }
        trace!(target: "prism::score", cost = total, ret = %candidate.signature.ret, "candidate scored");
        total
    }

    pub fn pick_best(&self, candidates: &[Candidate]) -> Outcome {
        pick_best_by(candidates, |c| self.score_candidate(c))
    }
}

/// Selects the cheapest viable candidate. A lone viable candidate wins
/// without being scored.
pub fn pick_best_by(candidates: &[Candidate], mut score: impl FnMut(&Candidate) -> Cost) -> Outcome {
    let viable: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_viable())
        .map(|(i, _)| i)
        .collect();

    match viable.as_slice() {
        [] => return Outcome::NoViable,
        [only] => return Outcome::Success(*only),
        _ => {}
    }

    let mut best = Cost::MAX;
    let mut tied = Vec::new();
    for i in viable {
        let cost = score(&candidates[i]);
        if cost < best {
            best = cost;
            tied.clear();
            tied.push(i);
        } else if cost == best {
            tied.push(i);
        }
    }

    debug!(target: "prism::score", best, tied = tied.len(), "picked best candidate");
    match tied.as_slice() {
        [] => Outcome::NoViable,
        [only] => Outcome::Success(*only),
        _ => Outcome::Ambiguous { tied },
    }
}

#[derive(Clone, Copy)]
enum Side {
    Target,
    Source,
}

fn adjustment(kind: ElementKind, combined: ElementKind, side: Side) -> Option<Priority> {
    let (promo, int_cast, cast) = match side {
        Side::Target => (
            Priority::TargetPromotion,
            Priority::TargetIntCast,
            Priority::TargetCast,
        ),
        Side::Source => (
            Priority::SourcePromotion,
            Priority::SourceIntCast,
            Priority::SourceCast,
        ),
    };
    if is_promotion(kind, combined) {
        Some(promo)
    } else if is_cast(kind, combined) {
        Some(cast)
    } else if is_int_cast(kind, combined) {
        Some(int_cast)
    } else {
        None
    }
}

/// Widening within one family: small floats to wider floats, small ints to
/// 32/64-bit ints, and min-precision kinds to their wider min-precision
/// sibling.
pub fn is_promotion(from: ElementKind, to: ElementKind) -> bool {
    use ElementKind as K;
    if from == to {
        return false;
    }
    match to {
        K::Float16 => matches!(from, K::Min10Float | K::Min16Float),
        K::Float32 => matches!(
            from,
            K::Float16 | K::Float32PartialPrecision | K::Min10Float | K::Min16Float
        ),
        K::Float64 => matches!(
            from,
            K::Float16 | K::Float32 | K::Float32PartialPrecision | K::Min10Float | K::Min16Float
        ),
        K::Min16Float => matches!(from, K::Min10Float),
        K::Int32 | K::Uint32 => matches!(
            from,
            K::Int8 | K::Uint8 | K::Int16 | K::Uint16 | K::Min12Int | K::Min16Int | K::Min16Uint
        ),
        K::Int64 | K::Uint64 => matches!(
            from,
            K::Int8
                | K::Uint8
                | K::Int16
                | K::Uint16
                | K::Int32
                | K::Uint32
                | K::Min12Int
                | K::Min16Int
                | K::Min16Uint
        ),
        K::Min16Int | K::Min16Uint => matches!(from, K::Min12Int),
        _ => false,
    }
}

fn is_sized_int_kind(k: ElementKind) -> bool {
    use ElementKind as K;
    matches!(
        k,
        K::Int8 | K::Uint8 | K::Int16 | K::Uint16 | K::Int32 | K::Uint32 | K::Int64 | K::Uint64
    )
}

fn is_sized_float_kind(k: ElementKind) -> bool {
    use ElementKind as K;
    matches!(
        k,
        K::Float16 | K::Float32 | K::Float32PartialPrecision | K::Float64
    )
}

/// A literal meeting a sized kind of its own family: not a real cast, but
/// still worse than an exact match.
fn literal_pairing(from: ElementKind, to: ElementKind) -> bool {
    use ElementKind as K;
    match (from, to) {
        (K::LiteralInt, k) | (k, K::LiteralInt) => is_sized_int_kind(k),
        (K::LiteralFloat, k) | (k, K::LiteralFloat) => is_sized_float_kind(k),
        _ => false,
    }
}

pub fn is_cast(from: ElementKind, to: ElementKind) -> bool {
    from != to && !literal_pairing(from, to)
}

pub fn is_int_cast(from: ElementKind, to: ElementKind) -> bool {
    from != to && literal_pairing(from, to)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    (a / gcd(a, b)).saturating_mul(b)
}
