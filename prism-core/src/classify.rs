#![forbid(unsafe_code)]

use prism_ast::{Builtin, ObjectKind, Ty, TyKind, strip_qualifiers};

use crate::kinds::ElementKind;
use crate::options::SessionOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Void,
    Scalar,
    Vector,
    Matrix,
    Array,
    Object,
    Compound,
    String,
    Dependent,
}

/// Structural summary of a type.
///
/// Arrays report the rows/cols of their innermost element; `total_elements`
/// counts scalar leaves (a `float2[3]` has six).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub shape: ShapeKind,
    pub element: ElementKind,
    pub rows: u32,
    pub cols: u32,
    pub total_elements: u64,
}

impl TypeDescriptor {
    fn unit(shape: ShapeKind, element: ElementKind) -> Self {
        Self {
            shape,
            element,
            rows: 1,
            cols: 1,
            total_elements: 1,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.shape, ShapeKind::Array | ShapeKind::Compound)
    }

    pub fn is_numeric_shape(&self) -> bool {
        matches!(
            self.shape,
            ShapeKind::Scalar | ShapeKind::Vector | ShapeKind::Matrix
        )
    }
}

/// Maps language types onto descriptors. Hosts with their own type
/// representation implement this; everything downstream goes through it.
pub trait Classify {
    fn classify(&self, ty: &Ty) -> TypeDescriptor;

    /// Bottom scalar or object kind, drilling through vectors, matrices,
    /// and arrays.
    fn element_kind(&self, ty: &Ty) -> ElementKind {
        self.classify(ty).element
    }
}

#[derive(Clone, Debug, Default)]
pub struct BuiltinClassifier {
    sixteen_bit: bool,
}

impl BuiltinClassifier {
    pub fn new(options: &SessionOptions) -> Self {
        Self {
            sixteen_bit: options.enable_16bit_types,
        }
    }

    pub fn builtin_kind(&self, b: Builtin) -> ElementKind {
        match b {
            Builtin::Bool => ElementKind::Bool,
            Builtin::Char | Builtin::Int8 => ElementKind::Int8,
            Builtin::LiteralInt => ElementKind::LiteralInt,
            Builtin::LiteralFloat => ElementKind::LiteralFloat,
            Builtin::Half if self.sixteen_bit => ElementKind::Float16,
            Builtin::Half | Builtin::Float => ElementKind::Float32,
            Builtin::FloatPartialPrecision => ElementKind::Float32PartialPrecision,
            Builtin::Double => ElementKind::Float64,
            Builtin::Float16 => ElementKind::Float16,
            Builtin::Uint8 => ElementKind::Uint8,
            Builtin::Int16 => ElementKind::Int16,
            Builtin::Uint16 => ElementKind::Uint16,
            Builtin::Int => ElementKind::Int32,
            Builtin::Uint => ElementKind::Uint32,
            Builtin::Int64 => ElementKind::Int64,
            Builtin::Uint64 => ElementKind::Uint64,
            Builtin::Min10Float => ElementKind::Min10Float,
            Builtin::Min16Float => ElementKind::Min16Float,
            Builtin::Min12Int => ElementKind::Min12Int,
            Builtin::Min16Int => ElementKind::Min16Int,
            Builtin::Min16Uint => ElementKind::Min16Uint,
        }
    }
}

impl Classify for BuiltinClassifier {
    fn classify(&self, ty: &Ty) -> TypeDescriptor {
        match &**strip_qualifiers(ty) {
            TyKind::Void => TypeDescriptor {
                shape: ShapeKind::Void,
                element: ElementKind::None,
                rows: 0,
                cols: 0,
                total_elements: 0,
            },
            TyKind::Array { elem, len } => {
                if let (TyKind::Builtin(Builtin::Char), Some(_)) = (&**strip_qualifiers(elem), len) {
                    return TypeDescriptor::unit(
                        ShapeKind::String,
                        ElementKind::Object(ObjectKind::String),
                    );
                }
                let inner = self.classify(elem);
                TypeDescriptor {
                    shape: ShapeKind::Array,
                    element: inner.element,
                    rows: inner.rows,
                    cols: inner.cols,
                    total_elements: inner
                        .total_elements
                        .saturating_mul(u64::from(len.unwrap_or(0))),
                }
            }
            TyKind::Vector { elem, len } => TypeDescriptor {
                shape: ShapeKind::Vector,
                element: self.element_kind(elem),
                rows: 1,
                cols: u32::from(*len),
                total_elements: u64::from(*len),
            },
            TyKind::Matrix { elem, rows, cols } => TypeDescriptor {
                shape: ShapeKind::Matrix,
                element: self.element_kind(elem),
                rows: u32::from(*rows),
                cols: u32::from(*cols),
                total_elements: u64::from(*rows) * u64::from(*cols),
            },
            TyKind::Object { kind, .. } if *kind == ObjectKind::String => {
                TypeDescriptor::unit(ShapeKind::String, ElementKind::Object(ObjectKind::String))
            }
            TyKind::Object { kind, .. } => {
                TypeDescriptor::unit(ShapeKind::Object, ElementKind::Object(*kind))
            }
            TyKind::Struct(_) => TypeDescriptor {
                shape: ShapeKind::Compound,
                element: ElementKind::Unknown,
                rows: 1,
                cols: 1,
                total_elements: leaf_count(ty),
            },
            TyKind::Builtin(b) => TypeDescriptor::unit(ShapeKind::Scalar, self.builtin_kind(*b)),
            TyKind::Enum(decl) => TypeDescriptor::unit(
                ShapeKind::Scalar,
                if decl.scoped {
                    ElementKind::EnumClass
                } else {
                    ElementKind::Enum
                },
            ),
            TyKind::TemplateParam(_) => {
                TypeDescriptor::unit(ShapeKind::Dependent, ElementKind::Dependent)
            }
            // strip_qualifiers never returns these
            TyKind::Const(_) | TyKind::Reference(_) => {
                TypeDescriptor::unit(ShapeKind::Dependent, ElementKind::Unknown)
            }
        }
    }
}

/// Number of scalar/object leaves in `ty`. Unsized arrays count as empty.
pub fn leaf_count(ty: &Ty) -> u64 {
    match &**strip_qualifiers(ty) {
        TyKind::Void => 0,
        TyKind::Vector { len, .. } => u64::from(*len),
        TyKind::Matrix { rows, cols, .. } => u64::from(*rows) * u64::from(*cols),
        TyKind::Array { elem, len } => {
            leaf_count(elem).saturating_mul(u64::from(len.unwrap_or(0)))
        }
        TyKind::Struct(decl) => {
            let own = decl
                .fields
                .iter()
                .fold(0u64, |acc, f| acc.saturating_add(leaf_count(&f.ty)));
            let base = decl
                .base
                .as_ref()
                .map_or(0, |b| leaf_count(&TyKind::structure(b.clone())));
            own.saturating_add(base)
        }
        _ => 1,
    }
}

/// Flattens `ty` into scalar/object leaf types, depth first: struct fields
/// in order, then the base struct. Stops after `limit` leaves.
pub fn leaves(ty: &Ty, limit: usize) -> Vec<Ty> {
    let mut out = Vec::new();
    push_leaves(ty, limit, &mut out);
    out
}

fn push_leaves(ty: &Ty, limit: usize, out: &mut Vec<Ty>) {
    if out.len() >= limit {
        return;
    }
    let ty = strip_qualifiers(ty);
    match &**ty {
        TyKind::Void => {}
        TyKind::Vector { elem, len } => {
            for _ in 0..*len {
                push_leaves(elem, limit, out);
            }
        }
        TyKind::Matrix { elem, rows, cols } => {
            for _ in 0..u32::from(*rows) * u32::from(*cols) {
                push_leaves(elem, limit, out);
            }
        }
        TyKind::Array { elem, len } => {
            for _ in 0..len.unwrap_or(0) {
                if out.len() >= limit {
                    break;
                }
                push_leaves(elem, limit, out);
            }
        }
        TyKind::Struct(decl) => {
            for field in &decl.fields {
                push_leaves(&field.ty, limit, out);
            }
            if let Some(base) = &decl.base {
                push_leaves(&TyKind::structure(base.clone()), limit, out);
            }
        }
        _ => out.push(ty.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use prism_ast::{DeclId, Field, StructDecl};

    fn float() -> Ty {
        TyKind::scalar(Builtin::Float)
    }

    #[test]
    fn qualifiers_are_stripped_before_classifying() {
        let c = BuiltinClassifier::default();
        let t = TyKind::reference(TyKind::constant(TyKind::vector(float(), 3)));
        let d = c.classify(&t);
        assert_eq!(d.shape, ShapeKind::Vector);
        assert_eq!(d.element, ElementKind::Float32);
        assert_eq!((d.rows, d.cols, d.total_elements), (1, 3, 3));
    }

    #[test]
    fn half_depends_on_sixteen_bit_mode() {
        let half = TyKind::scalar(Builtin::Half);
        let plain = BuiltinClassifier::new(&SessionOptions::default());
        assert_eq!(plain.element_kind(&half), ElementKind::Float32);
        let native = BuiltinClassifier::new(&SessionOptions {
            enable_16bit_types: true,
            ..SessionOptions::default()
        });
        assert_eq!(native.element_kind(&half), ElementKind::Float16);
    }

    #[test]
    fn char_arrays_are_strings_and_other_arrays_recurse() {
        let c = BuiltinClassifier::default();
        let s = TyKind::array(TyKind::scalar(Builtin::Char), Some(6));
        assert_eq!(c.classify(&s).shape, ShapeKind::String);

        let a = TyKind::array(TyKind::vector(float(), 2), Some(3));
        let d = c.classify(&a);
        assert_eq!(d.shape, ShapeKind::Array);
        assert_eq!(d.element, ElementKind::Float32);
        assert_eq!((d.cols, d.total_elements), (2, 6));
    }

    #[test]
    fn template_parameters_are_dependent() {
        let c = BuiltinClassifier::default();
        let d = c.classify(&TyKind::param("T"));
        assert_eq!(d.shape, ShapeKind::Dependent);
        assert_eq!(d.element, ElementKind::Dependent);
    }

    #[test]
    fn struct_leaves_list_fields_before_base() {
        let base = Rc::new(StructDecl {
            id: DeclId(1),
            name: "Base".into(),
            base: None,
            fields: vec![Field {
                name: "b".into(),
                ty: TyKind::scalar(Builtin::Int),
            }],
            builtin: None,
        });
        let derived = Rc::new(StructDecl {
            id: DeclId(2),
            name: "Derived".into(),
            base: Some(base),
            fields: vec![Field {
                name: "v".into(),
                ty: TyKind::vector(float(), 2),
            }],
            builtin: None,
        });
        let ty = TyKind::structure(derived);
        let names: Vec<String> = leaves(&ty, 16).iter().map(|t| t.to_string()).collect();
        assert_eq!(names, ["float", "float", "int"]);
        assert_eq!(leaf_count(&ty), 3);
        assert_eq!(leaves(&ty, 2).len(), 2);

        let d = BuiltinClassifier::default().classify(&ty);
        assert_eq!(d.shape, ShapeKind::Compound);
        assert_eq!(d.total_elements, 3);
    }
}
