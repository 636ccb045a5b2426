#![forbid(unsafe_code)]

//! Call resolution: catalog lookup, matching, conversion checks, scoring
//! and instantiation.

use std::rc::Rc;

use prism_ast::{Builtin, Operand, Ty, TyKind, strip_qualifiers};
use tracing::debug;

use crate::classify::Classify;
use crate::convert::ConversionEngine;
use crate::error::ResolveError;
use crate::intrinsics::{
    CatalogEntry, ExternalCatalog, SignatureCatalogIterator, SignatureId, TemplateRef,
};
use crate::matcher::{BadArg, SignatureMatcher};
use crate::options::SessionOptions;
use crate::scorer::{ArgumentConversion, Candidate, Cost, Outcome, OverloadScorer};
use crate::session::{InstantiationCache, IntrinsicInstance, Session};

/// A call expression as seen by the resolver.
#[derive(Clone, Copy, Debug)]
pub struct CallSite<'a> {
    pub name: &'a str,
    pub args: &'a [Operand],
    /// Receiver type for method calls.
    pub object: Option<&'a Ty>,
    pub explicit_template_arg: Option<&'a Ty>,
}

impl<'a> CallSite<'a> {
    pub fn new(name: &'a str, args: &'a [Operand]) -> Self {
        Self {
            name,
            args,
            object: None,
            explicit_template_arg: None,
        }
    }

    pub fn on(mut self, object: &'a Ty) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_template(mut self, ty: &'a Ty) -> Self {
        self.explicit_template_arg = Some(ty);
        self
    }
}

#[derive(Clone, Debug)]
pub struct Resolution {
    pub instance: Rc<IntrinsicInstance>,
    pub signature: SignatureId,
    pub conversions: Vec<ArgumentConversion>,
    pub cost: Cost,
    pub candidates_considered: usize,
}

/// Borrowed view of the session pieces resolution reads.
pub struct Resolver<'s> {
    options: &'s SessionOptions,
    classifier: &'s dyn Classify,
    catalogs: &'s [Box<dyn ExternalCatalog>],
}

impl<'s> Resolver<'s> {
    pub fn new(
        options: &'s SessionOptions,
        classifier: &'s dyn Classify,
        catalogs: &'s [Box<dyn ExternalCatalog>],
    ) -> Self {
        Self {
            options,
            classifier,
            catalogs,
        }
    }

    /// Every overload that binds structurally, paired with its catalog
    /// entry. Fails with [`ResolveError::NoMatch`] when none does.
    pub fn candidates(
        &self,
        call: &CallSite<'_>,
    ) -> Result<Vec<(CatalogEntry<'s>, Candidate)>, ResolveError> {
        let type_name = call.object.map(receiver_name).unwrap_or_default();
        let element = call.object.and_then(object_element);
        let arg_types: Vec<Ty> = call.args.iter().map(|a| a.ty.clone()).collect();

        let matcher = SignatureMatcher::new(self.classifier, self.options);
        let engine = ConversionEngine::new(self.classifier, self.options);

        let mut first_bad: Option<BadArg> = None;
        let mut out = Vec::new();
        let catalog =
            SignatureCatalogIterator::new(&type_name, call.name, call.args.len(), self.catalogs);
        for entry in catalog {
            let signature = match matcher.match_arguments(
                entry.intrinsic,
                element.as_ref(),
                call.explicit_template_arg,
                &arg_types,
            ) {
                Ok(sig) => sig,
                Err(bad) => {
                    debug!(
                        target: "prism::resolve",
                        overload = %entry.intrinsic.describe(),
                        %bad,
                        "overload rejected"
                    );
                    first_bad.get_or_insert(bad);
                    continue;
                }
            };

            let conversions = call
                .args
                .iter()
                .zip(&signature.params)
                .enumerate()
                .map(|(i, (arg, param))| {
                    let writes_back = entry
                        .intrinsic
                        .args
                        .get(i + 1)
                        .is_some_and(|s| s.template != TemplateRef::Variadic && s.usage.writes_back());
                    let into_param = engine.can_convert(arg, param, false).ok()?;
                    let out_of_param = if writes_back {
                        Some(engine.can_convert_type(param, &arg.ty, false).ok()?)
                    } else {
                        None
                    };
                    Some(ArgumentConversion {
                        into_param,
                        out_of_param,
                    })
                })
                .collect();

            out.push((
                entry,
                Candidate {
                    signature,
                    arguments: arg_types.clone(),
                    conversions,
                },
            ));
        }

        if out.is_empty() {
            return Err(ResolveError::NoMatch {
                name: call.name.to_string(),
                bad_arg: first_bad,
            });
        }
        Ok(out)
    }

    pub fn resolve(
        &self,
        call: &CallSite<'_>,
        cache: &mut InstantiationCache,
    ) -> Result<Resolution, ResolveError> {
        let found = self.candidates(call)?;
        let considered = found.len();
        let (entries, candidates): (Vec<_>, Vec<_>) = found.into_iter().unzip();

        let scorer = OverloadScorer::new(self.classifier);
        let exact: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_exact())
            .map(|(i, _)| i)
            .collect();
        let outcome = match exact.as_slice() {
            [only] => Outcome::Success(*only),
            _ => scorer.pick_best(&candidates),
        };

        let index = match outcome {
            Outcome::Success(i) => i,
            Outcome::Ambiguous { tied } => {
                debug!(target: "prism::resolve", name = call.name, tied = tied.len(), "ambiguous call");
                return Err(ResolveError::Ambiguous {
                    name: call.name.to_string(),
                    tied: tied.len(),
                });
            }
            Outcome::NoViable => {
                return Err(ResolveError::NoViableCandidate {
                    name: call.name.to_string(),
                });
            }
        };

        let entry = entries[index];
        let candidate = &candidates[index];
        let cost = scorer.score_candidate(candidate);
        let instance = cache.get_or_insert(entry.id, entry.intrinsic, &candidate.signature);
        debug!(
            target: "prism::resolve",
            name = call.name,
            overload = %entry.intrinsic.describe(),
            cost,
            considered,
            "resolved call"
        );

        Ok(Resolution {
            instance,
            signature: entry.id,
            conversions: candidate.conversions.iter().flatten().copied().collect(),
            cost,
            candidates_considered: considered,
        })
    }
}

impl Session {
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.options, self.classifier.as_ref(), &self.catalogs)
    }

    /// Resolves `call` and materializes the chosen overload through the
    /// session cache.
    pub fn resolve(&mut self, call: &CallSite<'_>) -> Result<Resolution, ResolveError> {
        let Session {
            options,
            classifier,
            catalogs,
            cache,
        } = self;
        Resolver::new(options, classifier.as_ref(), catalogs).resolve(call, cache)
    }
}

fn receiver_name(object: &Ty) -> String {
    match &**strip_qualifiers(object) {
        TyKind::Object { kind, .. } => kind.name().to_string(),
        TyKind::Struct(decl) => decl.name.clone(),
        other => other.to_string(),
    }
}

/// Element type a method call sees; textures and typed buffers without one
/// hold `float4`.
fn object_element(object: &Ty) -> Option<Ty> {
    match &**strip_qualifiers(object) {
        TyKind::Object {
            elem: Some(elem), ..
        } => Some(elem.clone()),
        TyKind::Object { kind, elem: None } if kind.defaults_to_float4() => {
            Some(TyKind::vector(TyKind::scalar(Builtin::Float), 4))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_ast::ObjectKind;

    fn f(n: u8) -> Ty {
        let s = TyKind::scalar(Builtin::Float);
        if n == 1 { s } else { TyKind::vector(s, n) }
    }

    #[test]
    fn exact_overload_wins_over_upgraded_shapes() {
        let mut session = Session::default();
        let args = [Operand::new(f(1)), Operand::new(f(1))];
        let r = session.resolve(&CallSite::new("mul", &args)).unwrap();
        assert_eq!(r.instance.ret, f(1));
        assert_eq!(r.cost, 0);
        assert_eq!(r.candidates_considered, 9);
    }

    #[test]
    fn equal_cost_overloads_are_ambiguous() {
        let mut session = Session::default();
        let args = [Operand::new(TyKind::scalar(Builtin::Int)), Operand::new(f(1))];
        let err = session.resolve(&CallSite::new("mul", &args)).unwrap_err();
        assert!(matches!(err, ResolveError::Ambiguous { ref name, tied } if name == "mul" && tied > 1));
        assert_eq!(session.cache().len(), 0);
    }

    #[test]
    fn textures_default_their_element() {
        let mut session = Session::default();
        let tex = TyKind::object(ObjectKind::Texture2D, None);
        let loc = TyKind::vector(TyKind::scalar(Builtin::Int), 3);
        let args = [Operand::new(loc)];
        let r = session
            .resolve(&CallSite::new("Load", &args).on(&tex))
            .unwrap();
        assert_eq!(r.instance.ret, f(4));
    }

    #[test]
    fn repeated_calls_share_one_instance() {
        let mut session = Session::default();
        let args = [Operand::new(f(3))];
        let a = session.resolve(&CallSite::new("normalize", &args)).unwrap();
        let b = session.resolve(&CallSite::new("normalize", &args)).unwrap();
        assert!(Rc::ptr_eq(&a.instance, &b.instance));
        assert_eq!(session.cache().hits(), 1);
    }
}
