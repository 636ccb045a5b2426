#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::rc::Rc;

use prism_ast::{Builtin, DeclId, EnumDecl, Field, ObjectKind, StructDecl, TyKind};

/// Named struct and enum declarations visible to the type parser.
#[derive(Clone, Debug)]
pub struct TypeEnv {
    structs: BTreeMap<String, Rc<StructDecl>>,
    enums: BTreeMap<String, Rc<EnumDecl>>,
    next_id: u32,
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnv {
    /// An environment holding the language-provided `RayDesc` struct.
    pub fn new() -> Self {
        let mut env = Self {
            structs: BTreeMap::new(),
            enums: BTreeMap::new(),
            next_id: 0,
        };
        let float = TyKind::scalar(Builtin::Float);
        let float3 = TyKind::vector(float.clone(), 3);
        let fields = vec![
            Field {
                name: "Origin".into(),
                ty: float3.clone(),
            },
            Field {
                name: "TMin".into(),
                ty: float.clone(),
            },
            Field {
                name: "Direction".into(),
                ty: float3,
            },
            Field {
                name: "TMax".into(),
                ty: float,
            },
        ];
        env.insert_struct("RayDesc", None, fields, Some(ObjectKind::RayDesc));
        env
    }

    pub fn fresh_id(&mut self) -> DeclId {
        let id = DeclId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn declare_struct(
        &mut self,
        name: &str,
        base: Option<Rc<StructDecl>>,
        fields: Vec<Field>,
    ) -> Rc<StructDecl> {
        self.insert_struct(name, base, fields, None)
    }

    fn insert_struct(
        &mut self,
        name: &str,
        base: Option<Rc<StructDecl>>,
        fields: Vec<Field>,
        builtin: Option<ObjectKind>,
    ) -> Rc<StructDecl> {
        let decl = Rc::new(StructDecl {
            id: self.fresh_id(),
            name: name.to_string(),
            base,
            fields,
            builtin,
        });
        self.structs.insert(name.to_string(), decl.clone());
        decl
    }

    pub fn declare_enum(&mut self, name: &str, scoped: bool) -> Rc<EnumDecl> {
        let decl = Rc::new(EnumDecl {
            id: self.fresh_id(),
            name: name.to_string(),
            scoped,
        });
        self.enums.insert(name.to_string(), decl.clone());
        decl
    }

    pub fn lookup_struct(&self, name: &str) -> Option<&Rc<StructDecl>> {
        self.structs.get(name)
    }

    pub fn lookup_enum(&self, name: &str) -> Option<&Rc<EnumDecl>> {
        self.enums.get(name)
    }

    pub fn structs(&self) -> impl Iterator<Item = &Rc<StructDecl>> {
        self.structs.values()
    }
}
