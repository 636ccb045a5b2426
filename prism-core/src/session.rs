#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::rc::Rc;

use prism_ast::{Operand, Ty};
use tracing::trace;

use crate::classify::{BuiltinClassifier, Classify, TypeDescriptor};
use crate::convert::{ConversionEngine, ConversionSequence};
use crate::error::ConversionRejected;
use crate::intrinsics::{ExternalCatalog, Intrinsic, SignatureCatalogIterator, SignatureId};
use crate::matcher::ConcretizedSignature;
use crate::options::SessionOptions;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub signature: SignatureId,
    /// Return type first.
    pub types: Vec<Ty>,
}

/// One materialized overload: an intrinsic at concrete types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntrinsicInstance {
    pub id: u32,
    pub name: String,
    pub opcode: u32,
    pub ret: Ty,
    pub params: Vec<Ty>,
}

/// At most one [`IntrinsicInstance`] per signature and concrete types.
#[derive(Debug, Default)]
pub struct InstantiationCache {
    entries: HashMap<InstanceKey, Rc<IntrinsicInstance>>,
    hits: u64,
    misses: u64,
}

impl InstantiationCache {
    pub fn get_or_insert(
        &mut self,
        signature: SignatureId,
        intrinsic: &Intrinsic,
        concrete: &ConcretizedSignature,
    ) -> Rc<IntrinsicInstance> {
        let key = InstanceKey {
            signature,
            types: concrete.types(),
        };
        if let Some(found) = self.entries.get(&key) {
            self.hits += 1;
            trace!(target: "prism::cache", name = %intrinsic.name, id = found.id, "hit");
            return found.clone();
        }

        self.misses += 1;
        let instance = Rc::new(IntrinsicInstance {
            id: self.entries.len() as u32,
            name: intrinsic.name.to_string(),
            opcode: intrinsic.opcode,
            ret: concrete.ret.clone(),
            params: concrete.params.clone(),
        });
        trace!(target: "prism::cache", name = %intrinsic.name, id = instance.id, "miss");
        self.entries.insert(key, instance.clone());
        instance
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// Per-compilation state: options, the classifier, registered catalogs and
/// the instantiation cache. Single-threaded.
pub struct Session {
    pub(crate) options: SessionOptions,
    pub(crate) classifier: Box<dyn Classify>,
    pub(crate) catalogs: Vec<Box<dyn ExternalCatalog>>,
    pub(crate) cache: InstantiationCache,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        let classifier = Box::new(BuiltinClassifier::new(&options));
        Self::with_classifier(options, classifier)
    }

    /// A session that classifies types through a host-provided classifier.
    pub fn with_classifier(options: SessionOptions, classifier: Box<dyn Classify>) -> Self {
        Self {
            options,
            classifier,
            catalogs: Vec::new(),
            cache: InstantiationCache::default(),
        }
    }

    /// Appends a catalog; catalogs are consulted after the built-in tables,
    /// in registration order.
    pub fn register_catalog(&mut self, catalog: Box<dyn ExternalCatalog>) {
        trace!(target: "prism::resolve", catalog = catalog.name(), "registered catalog");
        self.catalogs.push(catalog);
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn classifier(&self) -> &dyn Classify {
        self.classifier.as_ref()
    }

    pub fn cache(&self) -> &InstantiationCache {
        &self.cache
    }

    pub fn classify(&self, ty: &Ty) -> TypeDescriptor {
        self.classifier.classify(ty)
    }

    pub fn conversions(&self) -> ConversionEngine<'_> {
        ConversionEngine::new(self.classifier.as_ref(), &self.options)
    }

    pub fn can_convert(
        &self,
        source: &Operand,
        target: &Ty,
        explicit: bool,
    ) -> Result<ConversionSequence, ConversionRejected> {
        self.conversions().can_convert(source, target, explicit)
    }

    /// Overloads of `name` on `type_name` (`""` for globals) taking `arity`
    /// arguments.
    pub fn signatures(
        &self,
        type_name: &str,
        name: &str,
        arity: usize,
    ) -> SignatureCatalogIterator<'_> {
        SignatureCatalogIterator::new(type_name, name, arity, &self.catalogs)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrinsics::{CatalogSource, tables};
    use prism_ast::{Builtin, TyKind};

    #[test]
    fn cache_returns_the_same_instance_for_equal_keys() {
        let mut cache = InstantiationCache::default();
        let abs = &tables::global_intrinsics()[0];
        let id = SignatureId {
            source: CatalogSource::Builtin(""),
            index: 0,
        };
        let f = TyKind::scalar(Builtin::Float);
        let sig = ConcretizedSignature {
            ret: f.clone(),
            params: vec![f.clone()],
        };
        let a = cache.get_or_insert(id, abs, &sig);
        let b = cache.get_or_insert(id, abs, &sig);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!((cache.hits(), cache.misses(), cache.len()), (1, 1, 1));

        let i = TyKind::scalar(Builtin::Int);
        let other = ConcretizedSignature {
            ret: i.clone(),
            params: vec![i],
        };
        let c = cache.get_or_insert(id, abs, &other);
        assert_ne!(a.id, c.id);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn session_lists_signatures_across_catalogs() {
        let session = Session::default();
        assert_eq!(session.signatures("", "mul", 2).count(), 9);
        assert_eq!(session.signatures("Texture2D", "Load", 1).count(), 1);
    }
}
