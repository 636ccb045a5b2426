#![forbid(unsafe_code)]

//! Declarative intrinsic signatures.
//!
//! Each [`Intrinsic`] lists its slots with the return value first. A slot
//! names the template (shape) slot and component (element kind) slot it
//! shares with other arguments, plus the legal sets those bindings are
//! checked against.

mod catalog;
pub mod tables;

use std::borrow::Cow;

use bitflags::bitflags;

use crate::classify::ShapeKind;
use crate::kinds::ElementKind;

pub use catalog::{
    CatalogEntry, CatalogSource, ExternalCatalog, SignatureCatalogIterator, SignatureId,
    TableCatalog,
};

/// Slots tracked per match attempt, return included.
pub const MAX_SLOTS: usize = 12;
/// Dimension slots shared between arguments (`R`, `C`, `R2`, `C2`).
pub const TIED_SLOTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Usage {
    In,
    Out,
    InOut,
    Ref,
}

impl Usage {
    pub fn writes_back(self) -> bool {
        matches!(self, Usage::Out | Usage::InOut)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateRef {
    Slot(u8),
    /// The element type of the object the method is called on.
    FromObjectElement,
    /// The `<T>` given at the call site (`buf.Load<float4>(0)`).
    FromExplicitArg,
    /// Remaining arguments pass through unconstrained.
    Variadic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentRef {
    Slot(u8),
    FromObjectElement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dim {
    Fixed(u8),
    Tied(u8),
}

pub const ONE: Dim = Dim::Fixed(1);
pub const R: Dim = Dim::Tied(0);
pub const C: Dim = Dim::Tied(1);
pub const R2: Dim = Dim::Tied(2);
pub const C2: Dim = Dim::Tied(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegalShapeSet {
    pub kinds: &'static [ShapeKind],
}

impl LegalShapeSet {
    pub fn default_shape(&self) -> ShapeKind {
        self.kinds.first().copied().unwrap_or(ShapeKind::Void)
    }

    pub fn contains(&self, shape: ShapeKind) -> bool {
        self.kinds.contains(&shape)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentSetId {
    Void,
    Bool,
    Int,
    Uint,
    AnyInt,
    AnyInt32,
    Float,
    AnyFloat,
    FloatLike,
    Double,
    Numeric,
    Numeric32,
    Any,
    Sampler,
    SamplerCmp,
    String,
    RayDesc,
    AccelerationStructure,
    UserDefinedType,
}

/// Ordered element kinds; index 0 is the default. A trailing
/// [`ElementKind::NoCast`] makes the set strict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegalComponentSet {
    pub id: ComponentSetId,
    pub kinds: &'static [ElementKind],
}

impl LegalComponentSet {
    pub fn is_strict(&self) -> bool {
        self.kinds.last() == Some(&ElementKind::NoCast)
    }

    /// The set without its strictness marker.
    pub fn legal(&self) -> &'static [ElementKind] {
        match self.kinds.split_last() {
            Some((ElementKind::NoCast, rest)) => rest,
            _ => self.kinds,
        }
    }

    pub fn default_kind(&self) -> ElementKind {
        self.legal().first().copied().unwrap_or(ElementKind::None)
    }

    pub fn contains(&self, kind: ElementKind) -> bool {
        self.legal().contains(&kind)
    }

    /// "Any int" style sets as opposed to "exactly this kind".
    pub fn accepts_multiple(&self) -> bool {
        self.legal().len() > 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: &'static str,
    pub usage: Usage,
    pub template: TemplateRef,
    pub component: ComponentRef,
    pub shapes: &'static LegalShapeSet,
    pub components: &'static LegalComponentSet,
    pub rows: Dim,
    pub cols: Dim,
}

impl SlotSpec {
    pub const fn new(
        name: &'static str,
        template: TemplateRef,
        component: ComponentRef,
        shapes: &'static LegalShapeSet,
        components: &'static LegalComponentSet,
        rows: Dim,
        cols: Dim,
    ) -> Self {
        Self {
            name,
            usage: Usage::In,
            template,
            component,
            shapes,
            components,
            rows,
            cols,
        }
    }

    pub const fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct IntrinsicFlags: u8 {
        const READ_NONE = 1 << 0;
        const READ_ONLY = 1 << 1;
        const WAVE      = 1 << 2;
    }
}

/// One overload of a built-in operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intrinsic {
    pub name: Cow<'static, str>,
    pub opcode: u32,
    pub static_member: bool,
    pub flags: IntrinsicFlags,
    /// `args[0]` is the return slot.
    pub args: Cow<'static, [SlotSpec]>,
}

impl Intrinsic {
    pub const fn new(
        name: &'static str,
        opcode: u32,
        flags: IntrinsicFlags,
        args: &'static [SlotSpec],
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            opcode,
            static_member: false,
            flags,
            args: Cow::Borrowed(args),
        }
    }

    pub fn is_variadic(&self) -> bool {
        self.args
            .last()
            .is_some_and(|s| s.template == TemplateRef::Variadic)
    }

    /// Declared parameters, excluding the return slot and a variadic tail.
    pub fn fixed_params(&self) -> usize {
        let n = self.args.len().saturating_sub(1);
        if self.is_variadic() { n.saturating_sub(1) } else { n }
    }

    pub fn accepts_arity(&self, arity: usize) -> bool {
        if self.is_variadic() {
            arity >= self.fixed_params()
        } else {
            arity == self.fixed_params()
        }
    }

    /// Renders the declaration, e.g. `numeric<c> abs(numeric<c> x)`.
    pub fn describe(&self) -> String {
        let slot = |s: &SlotSpec| -> String {
            let usage = match s.usage {
                Usage::In => "",
                Usage::Out => "out ",
                Usage::InOut => "inout ",
                Usage::Ref => "ref ",
            };
            let ty = match s.template {
                TemplateRef::Variadic => return "...".to_string(),
                TemplateRef::FromObjectElement => "<element>".to_string(),
                TemplateRef::FromExplicitArg => "<T>".to_string(),
                TemplateRef::Slot(_) if s.shapes.default_shape() == ShapeKind::Void => {
                    "void".to_string()
                }
                TemplateRef::Slot(_) => {
                    let shapes: Vec<String> =
                        s.shapes.kinds.iter().map(|k| format!("{k:?}").to_lowercase()).collect();
                    format!("{:?}<{}>", s.components.id, shapes.join("|")).to_lowercase()
                }
            };
            format!("{usage}{ty}")
        };

        let ret = self.args.first().map(slot).unwrap_or_else(|| "void".to_string());
        let params: Vec<String> = self
            .args
            .iter()
            .skip(1)
            .map(|s| {
                let ty = slot(s);
                if s.name.is_empty() || ty == "..." {
                    ty
                } else {
                    format!("{ty} {}", s.name)
                }
            })
            .collect();
        format!("{ret} {}({})", self.name, params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tables::{COMP_FLOAT, COMP_UINT_ONLY};

    #[test]
    fn strict_sets_hide_their_marker() {
        assert!(COMP_UINT_ONLY.is_strict());
        assert_eq!(COMP_UINT_ONLY.legal(), &[ElementKind::Uint32]);
        assert!(!COMP_UINT_ONLY.accepts_multiple());
        assert!(!COMP_FLOAT.is_strict());
        assert_eq!(COMP_FLOAT.default_kind(), ElementKind::Float32);
    }

    #[test]
    fn variadic_arity() {
        let printf = tables::global_intrinsics()
            .iter()
            .find(|i| i.name == "printf")
            .unwrap();
        assert!(printf.is_variadic());
        assert_eq!(printf.fixed_params(), 1);
        assert!(printf.accepts_arity(1));
        assert!(printf.accepts_arity(5));
        assert!(!printf.accepts_arity(0));
    }
}
