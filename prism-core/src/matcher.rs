#![forbid(unsafe_code)]

//! Binds a call's argument types against one intrinsic signature.
//!
//! A single pass over the arguments fills three scratch tables: the shape
//! bound to each template slot, the element kind bound to each component
//! slot, and the smallest count seen for each tied dimension. A validation
//! pass then checks every binding against the slot's legal sets, and the
//! survivors are turned back into concrete types.

use std::fmt;

use prism_ast::{Builtin, ObjectKind, Ty, TyKind, is_const, strip_qualifiers};
use tracing::trace;

use crate::classify::{Classify, ShapeKind, TypeDescriptor};
use crate::intrinsics::{
    ComponentRef, ComponentSetId, Dim, Intrinsic, LegalComponentSet, MAX_SLOTS, SlotSpec,
    TIED_SLOTS, TemplateRef,
};
use crate::kinds::ElementKind;
use crate::lattice;
use crate::options::SessionOptions;

/// First position that failed to bind. Orders the return slot first, then
/// arguments left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BadArg {
    Return,
    /// Zero-based argument index.
    Argument(usize),
}

impl BadArg {
    fn at_slot(slot: usize) -> Self {
        match slot {
            0 => BadArg::Return,
            n => BadArg::Argument(n - 1),
        }
    }
}

impl fmt::Display for BadArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadArg::Return => f.write_str("return type"),
            BadArg::Argument(i) => write!(f, "argument {}", i + 1),
        }
    }
}

/// Concrete types for one signature: `params` has one entry per call
/// argument, variadic tail included.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConcretizedSignature {
    pub ret: Ty,
    pub params: Vec<Ty>,
}

impl ConcretizedSignature {
    /// Return type followed by the parameters.
    pub fn types(&self) -> Vec<Ty> {
        let mut out = Vec::with_capacity(self.params.len() + 1);
        out.push(self.ret.clone());
        out.extend(self.params.iter().cloned());
        out
    }
}

#[derive(Default)]
struct MatchState {
    templates: [Option<ShapeKind>; MAX_SLOTS],
    components: [Option<ElementKind>; MAX_SLOTS],
    /// First argument that bound each template and component slot.
    template_origin: [Option<BadArg>; MAX_SLOTS],
    component_origin: [Option<BadArg>; MAX_SLOTS],
    tied: [Option<u32>; TIED_SLOTS],
    bad: Option<BadArg>,
}

impl MatchState {
    fn flag(&mut self, at: BadArg, reason: &'static str) {
        trace!(target: "prism::match", %at, reason, "bad argument");
        self.bad = Some(self.bad.map_or(at, |prev| prev.min(at)));
    }

    fn tie(&mut self, dim: Dim, count: u32, at: BadArg) {
        match dim {
            Dim::Fixed(n) => {
                if count < u32::from(n) {
                    self.flag(at, "too few components");
                }
            }
            Dim::Tied(k) => {
                let Some(slot) = self.tied.get_mut(usize::from(k)) else {
                    self.flag(at, "tied dimension out of range");
                    return;
                };
                *slot = Some(slot.map_or(count, |prev| prev.min(count)));
            }
        }
    }

    fn resolve_dim(&self, dim: Dim) -> u32 {
        match dim {
            Dim::Fixed(n) => u32::from(n),
            Dim::Tied(k) => self
                .tied
                .get(usize::from(k))
                .copied()
                .flatten()
                .unwrap_or(1),
        }
    }
}

fn slot_ids_in_range(slot: &SlotSpec) -> bool {
    let template = match slot.template {
        TemplateRef::Slot(t) => usize::from(t) < MAX_SLOTS,
        _ => true,
    };
    let component = match slot.component {
        ComponentRef::Slot(c) => usize::from(c) < MAX_SLOTS,
        ComponentRef::FromObjectElement => true,
    };
    template && component
}

/// Literal kinds keep their own kind when the set allows it; otherwise they
/// become the set's first sized entry.
pub fn concretize_literal(kind: ElementKind, set: &LegalComponentSet) -> ElementKind {
    if !kind.is_literal() || set.contains(kind) {
        return kind;
    }
    set.legal()
        .iter()
        .copied()
        .find(|k| !k.is_literal())
        .unwrap_or_else(|| set.default_kind())
}

pub struct SignatureMatcher<'a> {
    classifier: &'a dyn Classify,
    options: &'a SessionOptions,
}

impl<'a> SignatureMatcher<'a> {
    pub fn new(classifier: &'a dyn Classify, options: &'a SessionOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    /// Binds `args` against `intrinsic`.
    ///
    /// `object_element` is the element type of the receiver for method
    /// calls; `explicit` is a `<T>` given at the call site.
    pub fn match_arguments(
        &self,
        intrinsic: &Intrinsic,
        object_element: Option<&Ty>,
        explicit: Option<&Ty>,
        args: &[Ty],
    ) -> Result<ConcretizedSignature, BadArg> {
        let slots: &[SlotSpec] = &intrinsic.args;
        let Some(ret_slot) = slots.first() else {
            return Err(BadArg::Return);
        };
        if slots.len() > MAX_SLOTS {
            return Err(BadArg::Return);
        }
        if let Some(i) = slots.iter().position(|s| !slot_ids_in_range(s)) {
            return Err(BadArg::at_slot(i));
        }

        let mut state = MatchState::default();
        let fixed = intrinsic.fixed_params();
        if args.len() < fixed {
            state.flag(BadArg::Argument(args.len()), "missing argument");
        } else if args.len() > fixed && !intrinsic.is_variadic() {
            state.flag(BadArg::Argument(fixed), "unexpected argument");
        }

        let mut arrays: Vec<Vec<Option<u32>>> = vec![Vec::new(); fixed];
        for (i, arg) in args.iter().enumerate().take(fixed) {
            let slot = &slots[i + 1];
            let at = BadArg::Argument(i);
            if slot.usage.writes_back() && is_const(arg) {
                state.flag(at, "const argument for an out parameter");
            }
            if let Some(dims) = self.bind_argument(&mut state, ret_slot, slot, arg, at) {
                arrays[i] = dims;
            }
        }

        self.validate(&mut state, slots);

        if let Some(bad) = state.bad {
            return Err(bad);
        }

        let mut params = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate().take(fixed) {
            let slot = &slots[i + 1];
            let at = BadArg::Argument(i);
            let mut ty = match slot.template {
                TemplateRef::FromObjectElement => object_element.cloned().ok_or(at)?,
                TemplateRef::FromExplicitArg => match explicit {
                    Some(t) => t.clone(),
                    None => self.sized_argument_type(arg),
                },
                TemplateRef::Variadic => arg.clone(),
                TemplateRef::Slot(_) => match slot.components.id {
                    ComponentSetId::RayDesc | ComponentSetId::UserDefinedType => {
                        strip_qualifiers(arg).clone()
                    }
                    _ => self.concretize(&state, slot, Some(arg)).ok_or(at)?,
                },
            };
            for len in arrays[i].iter().rev() {
                ty = TyKind::array(ty, *len);
            }
            if slot.usage.writes_back() {
                ty = TyKind::reference(ty);
            }
            params.push(ty);
        }
        params.extend(args.iter().skip(fixed).cloned());

        let ret = match ret_slot.template {
            TemplateRef::FromObjectElement => object_element.cloned().ok_or(BadArg::Return)?,
            TemplateRef::FromExplicitArg => explicit
                .cloned()
                .unwrap_or_else(|| TyKind::scalar(Builtin::Uint)),
            TemplateRef::Variadic => return Err(BadArg::Return),
            TemplateRef::Slot(t) => {
                let shape = state.templates[usize::from(t)];
                if matches!(shape, Some(ShapeKind::Object | ShapeKind::String)) {
                    self.object_return(slots, ret_slot, &params)
                        .ok_or(BadArg::Return)?
                } else {
                    self.concretize(&state, ret_slot, None)
                        .ok_or(BadArg::Return)?
                }
            }
        };

        Ok(ConcretizedSignature { ret, params })
    }

    /// Unifies one argument into the scratch tables. Returns the array
    /// nesting that was peeled off, if any.
    fn bind_argument(
        &self,
        state: &mut MatchState,
        ret_slot: &SlotSpec,
        slot: &SlotSpec,
        arg: &Ty,
        at: BadArg,
    ) -> Option<Vec<Option<u32>>> {
        let stripped = strip_qualifiers(arg);

        match slot.components.id {
            ComponentSetId::RayDesc => {
                let is_ray = matches!(
                    &**stripped,
                    TyKind::Struct(decl) if decl.builtin == Some(ObjectKind::RayDesc)
                );
                if !is_ray {
                    state.flag(at, "expected a RayDesc");
                }
                return None;
            }
            ComponentSetId::UserDefinedType => {
                if self.classifier.classify(stripped).shape != ShapeKind::Compound {
                    state.flag(at, "expected a user-defined struct");
                }
                return None;
            }
            _ => {}
        }

        let TemplateRef::Slot(t) = slot.template else {
            return None;
        };

        let mut dims = Vec::new();
        let mut inner = stripped;
        let mut desc = self.classifier.classify(inner);
        if desc.shape == ShapeKind::Array {
            if !slot.shapes.contains(ShapeKind::Array) {
                state.flag(at, "array argument");
                return None;
            }
            while let TyKind::Array { elem, len } = &**inner {
                dims.push(*len);
                inner = strip_qualifiers(elem);
            }
            desc = self.classifier.classify(inner);
        }

        match desc.shape {
            ShapeKind::Scalar
            | ShapeKind::Vector
            | ShapeKind::Matrix
            | ShapeKind::Object
            | ShapeKind::String => {}
            ShapeKind::Dependent => return Some(dims),
            ShapeKind::Void | ShapeKind::Array | ShapeKind::Compound => {
                state.flag(at, "argument shape not accepted here");
                return None;
            }
        }

        self.bind_shape(state, usize::from(t), desc.shape, at);

        if let ComponentRef::Slot(c) = slot.component {
            let mut kind = desc.element;
            let feeds_return = ret_slot.component == slot.component;
            if kind.is_literal() && (!feeds_return || slot.components.is_strict()) {
                kind = concretize_literal(kind, slot.components);
            }
            if slot.components.is_strict() && !slot.components.contains(kind) {
                state.flag(at, "element kind outside a strict set");
            } else {
                let c = usize::from(c);
                state.component_origin[c].get_or_insert(at);
                match state.components[c] {
                    None => state.components[c] = Some(kind),
                    Some(prev) => match lattice::combine(prev, kind) {
                        Some(k) => state.components[c] = Some(k),
                        None => state.flag(at, "element kinds do not combine"),
                    },
                }
            }
        }

        self.bind_dims(state, slot, &desc, at);
        Some(dims)
    }

    fn bind_shape(&self, state: &mut MatchState, t: usize, shape: ShapeKind, at: BadArg) {
        let bound = match (state.templates[t], shape) {
            (None, s) => s,
            (Some(ShapeKind::Scalar), s @ (ShapeKind::Vector | ShapeKind::Matrix)) => s,
            (Some(b @ (ShapeKind::Vector | ShapeKind::Matrix)), ShapeKind::Scalar) => b,
            (Some(b), s) if b == s => b,
            (Some(b), _) => {
                state.flag(at, "shape does not unify");
                b
            }
        };
        state.templates[t] = Some(bound);
        state.template_origin[t].get_or_insert(at);
    }

    fn bind_dims(&self, state: &mut MatchState, slot: &SlotSpec, desc: &TypeDescriptor, at: BadArg) {
        match desc.shape {
            ShapeKind::Vector => {
                state.tie(slot.rows, 1, at);
                state.tie(slot.cols, desc.cols, at);
            }
            ShapeKind::Matrix => {
                state.tie(slot.rows, desc.rows, at);
                state.tie(slot.cols, desc.cols, at);
            }
            _ => {}
        }
    }

    fn validate(&self, state: &mut MatchState, slots: &[SlotSpec]) {
        for (i, slot) in slots.iter().enumerate() {
            let at = BadArg::at_slot(i);
            if let TemplateRef::Slot(t) = slot.template {
                let t = usize::from(t);
                if let Some(bound) = state.templates[t] {
                    if !slot.shapes.contains(bound) {
                        let default = slot.shapes.default_shape();
                        state.templates[t] = Some(default);
                        let upgrade = bound == ShapeKind::Scalar
                            && matches!(default, ShapeKind::Vector | ShapeKind::Matrix);
                        if !upgrade {
                            let origin = state.template_origin[t].unwrap_or(at);
                            state.flag(origin, "shape outside the legal set");
                        }
                    }
                }
            }

            let ComponentRef::Slot(c) = slot.component else {
                continue;
            };
            let c = usize::from(c);
            let Some(kind) = state.components[c] else {
                continue;
            };
            if slot.components.contains(kind) {
                continue;
            }
            let set = slot.components;
            // literals feeding the return are sized here rather than rejected
            if kind.is_literal() {
                let sized = concretize_literal(kind, set);
                if set.contains(sized) {
                    state.components[c] = Some(sized);
                    continue;
                }
            }
            let origin = state.component_origin[c].unwrap_or(at);
            if kind.is_object() {
                let accepted = set
                    .legal()
                    .iter()
                    .find_map(|&legal| lattice::combine_object(legal, kind));
                if let Some(k) = accepted {
                    state.components[c] = Some(k);
                    continue;
                }
                state.components[c] = Some(set.default_kind());
                state.flag(origin, "object kind outside the legal set");
            } else {
                state.components[c] = Some(set.default_kind());
                state.flag(origin, "element kind outside the legal set");
            }
        }

        let Some(ret) = slots.first() else {
            return;
        };
        if let TemplateRef::Slot(t) = ret.template {
            let t = usize::from(t);
            state.templates[t].get_or_insert(ret.shapes.default_shape());
        }
        if let ComponentRef::Slot(c) = ret.component {
            let c = usize::from(c);
            if state.components[c].is_none() {
                let mut kind = ret.components.default_kind();
                if kind == ElementKind::Float16
                    && !ret.components.accepts_multiple()
                    && self.options.uses_min_precision()
                {
                    kind = ElementKind::Float32;
                }
                state.components[c] = Some(kind);
            }
        }
    }

    /// Builds the type for a template slot from its bindings. Object and
    /// string slots take the argument's own type.
    fn concretize(&self, state: &MatchState, slot: &SlotSpec, arg: Option<&Ty>) -> Option<Ty> {
        let TemplateRef::Slot(t) = slot.template else {
            return None;
        };
        let shape = state.templates[usize::from(t)].unwrap_or_else(|| slot.shapes.default_shape());
        let kind = match slot.component {
            ComponentRef::Slot(c) => state.components[usize::from(c)]
                .unwrap_or_else(|| slot.components.default_kind()),
            ComponentRef::FromObjectElement => slot.components.default_kind(),
        };

        let scalar = || kind.to_builtin().map(TyKind::scalar);
        let count = |dim: Dim| -> Option<u8> {
            let n = state.resolve_dim(dim);
            (1..=4).contains(&n).then_some(n as u8)
        };

        match shape {
            ShapeKind::Void => Some(TyKind::void()),
            ShapeKind::Scalar => scalar(),
            ShapeKind::Vector => Some(TyKind::vector(scalar()?, count(slot.cols)?)),
            ShapeKind::Matrix => Some(TyKind::matrix(
                scalar()?,
                count(slot.rows)?,
                count(slot.cols)?,
            )),
            ShapeKind::Object | ShapeKind::String => arg.map(|a| strip_qualifiers(a).clone()),
            // dependent arguments pass through untouched
            ShapeKind::Dependent => arg.cloned(),
            ShapeKind::Array | ShapeKind::Compound => None,
        }
    }

    /// An object-typed return is the parameter sharing its component slot.
    fn object_return(&self, slots: &[SlotSpec], ret: &SlotSpec, params: &[Ty]) -> Option<Ty> {
        slots
            .iter()
            .skip(1)
            .zip(params)
            .find(|(slot, _)| slot.component == ret.component)
            .map(|(_, ty)| strip_qualifiers(ty).clone())
    }

    /// Argument type with literal elements made concrete: `uint` for
    /// integer literals, `float` for floating ones.
    fn sized_argument_type(&self, arg: &Ty) -> Ty {
        let stripped = strip_qualifiers(arg);
        match self.classifier.element_kind(stripped) {
            ElementKind::LiteralInt => TyKind::scalar(Builtin::Uint),
            ElementKind::LiteralFloat => TyKind::scalar(Builtin::Float),
            _ => stripped.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::BuiltinClassifier;
    use crate::intrinsics::tables::{self, COMP_NUMERIC, SHAPE_ANY, SHAPE_SCALAR};
    use crate::intrinsics::{C, LegalShapeSet, ONE, R};
    use prism_ast::{DeclId, Field, StructDecl};
    use std::rc::Rc;

    fn global(name: &str) -> &'static Intrinsic {
        tables::global_intrinsics()
            .iter()
            .find(|i| i.name == name)
            .unwrap()
    }

    fn float() -> Ty {
        TyKind::scalar(Builtin::Float)
    }

    fn int() -> Ty {
        TyKind::scalar(Builtin::Int)
    }

    fn run(i: &Intrinsic, args: &[Ty]) -> Result<ConcretizedSignature, BadArg> {
        let opts = SessionOptions::default();
        let c = BuiltinClassifier::new(&opts);
        SignatureMatcher::new(&c, &opts).match_arguments(i, None, None, args)
    }

    fn point() -> Ty {
        TyKind::structure(Rc::new(StructDecl {
            id: DeclId(40),
            name: "Point".into(),
            base: None,
            fields: vec![Field {
                name: "x".into(),
                ty: float(),
            }],
            builtin: None,
        }))
    }

    #[test]
    fn shared_component_slot_combines_float_and_int() {
        let sig = run(global("max"), &[float(), int()]).unwrap();
        assert_eq!(sig.ret, float());
        assert_eq!(sig.params, vec![float(), float()]);
    }

    #[test]
    fn incompatible_second_argument_is_reported_at_index_one() {
        assert_eq!(run(global("max"), &[float(), point()]), Err(BadArg::Argument(1)));
        let tex = TyKind::object(ObjectKind::Texture2D, None);
        assert_eq!(run(global("max"), &[float(), tex]), Err(BadArg::Argument(1)));
    }

    #[test]
    fn earliest_bad_argument_wins() {
        let err = run(global("max"), &[point(), point()]).unwrap_err();
        assert_eq!(err, BadArg::Argument(0));
    }

    #[test]
    fn scalar_widens_to_vector_and_tied_dims_take_the_minimum() {
        let f3 = TyKind::vector(float(), 3);
        let f4 = TyKind::vector(float(), 4);
        let sig = run(global("lerp"), &[f4, f3.clone(), float()]).unwrap();
        assert_eq!(sig.ret, f3);
        assert_eq!(sig.params, vec![f3.clone(), f3.clone(), f3]);
    }

    #[test]
    fn vector_and_matrix_do_not_unify() {
        let v = TyKind::vector(float(), 4);
        let m = TyKind::matrix(float(), 2, 2);
        assert_eq!(run(global("max"), &[v, m]), Err(BadArg::Argument(1)));
    }

    #[test]
    fn unconstrained_return_component_uses_the_set_default() {
        let sig = run(global("all"), &[TyKind::vector(float(), 3)]).unwrap();
        assert_eq!(sig.ret, TyKind::scalar(Builtin::Bool));
    }

    #[test]
    fn literals_not_feeding_the_return_are_concretized() {
        let lit = TyKind::scalar(Builtin::LiteralInt);
        let sig = run(global("asfloat"), &[lit]).unwrap();
        assert_eq!(sig.params, vec![float()]);
        assert_eq!(sig.ret, float());
    }

    #[test]
    fn strict_sets_reject_other_kinds_but_accept_literals() {
        let f16 = global("f16tof32");
        assert_eq!(run(f16, &[float()]), Err(BadArg::Argument(0)));
        let sig = run(f16, &[TyKind::scalar(Builtin::LiteralInt)]).unwrap();
        assert_eq!(sig.params, vec![TyKind::scalar(Builtin::Uint)]);
    }

    #[test]
    fn kinds_outside_the_legal_set_are_flagged() {
        assert_eq!(run(global("sin"), &[int()]), Err(BadArg::Argument(0)));
        assert_eq!(
            run(global("lerp"), &[int(), int(), int()]),
            Err(BadArg::Argument(0))
        );
        assert!(run(global("lerp"), &[float(), float(), int()]).is_ok());

        const ONE_FLOAT: &[SlotSpec] = &[
            SlotSpec::new("", TemplateRef::Slot(0), ComponentRef::Slot(0), &SHAPE_ANY, &tables::COMP_FLOAT, R, C),
            SlotSpec::new("x", TemplateRef::Slot(0), ComponentRef::Slot(0), &SHAPE_ANY, &tables::COMP_FLOAT, R, C),
        ];
        let i = Intrinsic::new("f", 0, Default::default(), ONE_FLOAT);
        assert_eq!(run(&i, &[int()]), Err(BadArg::Argument(0)));
        assert_eq!(run(&i, &[float()]).unwrap().params, vec![float()]);
    }

    #[test]
    fn literals_feeding_the_return_take_the_first_sized_kind() {
        let lit = TyKind::scalar(Builtin::LiteralInt);
        let sig = run(global("sin"), &[lit.clone()]).unwrap();
        assert_eq!(sig.ret, float());
        let sig = run(global("max"), &[lit.clone(), lit]).unwrap();
        assert_eq!(sig.params, vec![float(), float()]);
    }

    #[test]
    fn out_parameters_become_references_and_reject_const() {
        let sig = run(global("sincos"), &[float(), float(), float()]).unwrap();
        assert_eq!(sig.ret, TyKind::void());
        assert_eq!(sig.params[1], TyKind::reference(float()));
        let err = run(global("sincos"), &[float(), TyKind::constant(float()), float()]);
        assert_eq!(err, Err(BadArg::Argument(1)));
    }

    #[test]
    fn arity_mismatch_flags_the_first_missing_or_extra_argument() {
        assert_eq!(run(global("max"), &[float()]), Err(BadArg::Argument(1)));
        assert_eq!(
            run(global("abs"), &[float(), float()]),
            Err(BadArg::Argument(1))
        );
    }

    #[test]
    fn matrix_product_ties_inner_dimension() {
        let a = TyKind::matrix(float(), 2, 3);
        let b = TyKind::matrix(float(), 3, 4);
        let mm = tables::global_intrinsics()
            .iter()
            .filter(|i| i.name == "mul")
            .last()
            .unwrap();
        let sig = run(mm, &[a.clone(), b.clone()]).unwrap();
        assert_eq!(sig.ret, TyKind::matrix(float(), 2, 4));
        assert_eq!(sig.params, vec![a, b]);
    }

    #[test]
    fn variadic_tail_passes_through() {
        let fmt = TyKind::array(TyKind::scalar(Builtin::Char), Some(4));
        let extra = vec![fmt.clone(), TyKind::vector(int(), 2), point()];
        let sig = run(global("printf"), &extra).unwrap();
        assert_eq!(sig.params, extra);
        assert_eq!(sig.ret, TyKind::void());
    }

    #[test]
    fn method_return_follows_the_object_element() {
        let opts = SessionOptions::default();
        let c = BuiltinClassifier::new(&opts);
        let m = SignatureMatcher::new(&c, &opts);
        let sample = tables::builtin_table("Texture2D")
            .iter()
            .find(|i| i.name == "Sample")
            .unwrap();
        let elem = TyKind::vector(float(), 2);
        let sampler = TyKind::object(ObjectKind::Sampler, None);
        let sig = m
            .match_arguments(sample, Some(&elem), None, &[sampler.clone(), elem.clone()])
            .unwrap();
        assert_eq!(sig.ret, elem);
        assert_eq!(sig.params[0], sampler);

        let cmp = TyKind::object(ObjectKind::SamplerComparison, None);
        assert_eq!(
            m.match_arguments(sample, Some(&elem), None, &[cmp, elem.clone()]),
            Err(BadArg::Argument(0))
        );
    }

    #[test]
    fn explicit_template_argument_drives_templated_loads() {
        let opts = SessionOptions::default();
        let c = BuiltinClassifier::new(&opts);
        let m = SignatureMatcher::new(&c, &opts);
        let load = tables::builtin_table("ByteAddressBuffer")
            .iter()
            .find(|i| i.name == "Load")
            .unwrap();
        let addr = [TyKind::scalar(Builtin::LiteralInt)];
        let f4 = TyKind::vector(float(), 4);
        let sig = m.match_arguments(load, None, Some(&f4), &addr).unwrap();
        assert_eq!(sig.ret, f4);
        let sig = m.match_arguments(load, None, None, &addr).unwrap();
        assert_eq!(sig.ret, TyKind::scalar(Builtin::Uint));
    }

    const SHAPE_ANY_OR_ARRAY: LegalShapeSet = LegalShapeSet {
        kinds: &[
            ShapeKind::Scalar,
            ShapeKind::Vector,
            ShapeKind::Matrix,
            ShapeKind::Array,
        ],
    };
    const ARRAY_COPY: &[SlotSpec] = &[
        SlotSpec::new(
            "",
            TemplateRef::Slot(0),
            ComponentRef::Slot(0),
            &SHAPE_SCALAR,
            &tables::COMP_BOOL,
            ONE,
            ONE,
        ),
        SlotSpec::new(
            "values",
            TemplateRef::Slot(1),
            ComponentRef::Slot(1),
            &SHAPE_ANY_OR_ARRAY,
            &COMP_NUMERIC,
            R,
            C,
        ),
    ];

    #[test]
    fn array_arguments_are_rewrapped_when_allowed() {
        let i = Intrinsic::new("check", 0, Default::default(), ARRAY_COPY);
        let arr = TyKind::array(TyKind::vector(int(), 2), Some(3));
        let sig = run(&i, &[arr.clone()]).unwrap();
        assert_eq!(sig.params, vec![arr.clone()]);
        assert_eq!(sig.ret, TyKind::scalar(Builtin::Bool));

        assert_eq!(run(global("abs"), &[arr]), Err(BadArg::Argument(0)));
    }

    #[test]
    fn float16_return_default_is_widened_under_min_precision() {
        const F16_ONLY: crate::intrinsics::LegalComponentSet = crate::intrinsics::LegalComponentSet {
            id: ComponentSetId::Float,
            kinds: &[ElementKind::Float16],
        };
        const HALF_RET: &[SlotSpec] = &[SlotSpec::new(
            "",
            TemplateRef::Slot(0),
            ComponentRef::Slot(0),
            &SHAPE_ANY,
            &F16_ONLY,
            ONE,
            ONE,
        )];
        let i = Intrinsic::new("h", 0, Default::default(), HALF_RET);
        let sig = run(&i, &[]).unwrap();
        assert_eq!(sig.ret, float());

        const HALF_FIRST: crate::intrinsics::LegalComponentSet = crate::intrinsics::LegalComponentSet {
            id: ComponentSetId::AnyFloat,
            kinds: &[ElementKind::Float16, ElementKind::Float32],
        };
        const HALF_FIRST_RET: &[SlotSpec] = &[SlotSpec::new(
            "",
            TemplateRef::Slot(0),
            ComponentRef::Slot(0),
            &SHAPE_ANY,
            &HALF_FIRST,
            ONE,
            ONE,
        )];
        let multi = Intrinsic::new("h2", 0, Default::default(), HALF_FIRST_RET);
        let sig = run(&multi, &[]).unwrap();
        assert_eq!(sig.ret, TyKind::scalar(Builtin::Float16));

        let opts = SessionOptions {
            enable_16bit_types: true,
            ..SessionOptions::default()
        };
        let c = BuiltinClassifier::new(&opts);
        let sig = SignatureMatcher::new(&c, &opts)
            .match_arguments(&i, None, None, &[])
            .unwrap();
        assert_eq!(sig.ret, TyKind::scalar(Builtin::Float16));
    }
}
