#![forbid(unsafe_code)]

mod error;
mod resolve;
mod session;
pub mod classify;
pub mod convert;
pub mod intrinsics;
pub mod kinds;
pub mod lattice;
pub mod matcher;
pub mod options;
pub mod scorer;

pub use classify::{BuiltinClassifier, Classify, ShapeKind, TypeDescriptor};
pub use convert::{ComponentStep, ConversionEngine, ConversionSequence, DimensionStep, Remarks};
pub use error::{ConversionRejected, ResolveError};
pub use intrinsics::{ExternalCatalog, Intrinsic, SignatureCatalogIterator, SignatureId, TableCatalog};
pub use kinds::{BitClass, ElementKind, KindFlags};
pub use lattice::{combine, combine_basic, combine_object};
pub use matcher::{BadArg, ConcretizedSignature, SignatureMatcher};
pub use options::{LangVersion, SessionOptions};
pub use resolve::{CallSite, Resolution, Resolver};
pub use scorer::{ArgumentConversion, Candidate, Cost, Outcome, OverloadScorer};
pub use session::{InstanceKey, InstantiationCache, IntrinsicInstance, Session};
