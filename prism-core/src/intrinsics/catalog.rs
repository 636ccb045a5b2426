#![forbid(unsafe_code)]

use prism_ast::ObjectKind;
use tracing::warn;

use super::Intrinsic;
use super::tables::builtin_table;

/// A table of intrinsics supplied by the host after start-up.
///
/// `cookie` is a resume position owned by the caller: it starts at zero for
/// a given `(type_name, call_name)` and the catalog advances it past every
/// entry it returns.
pub trait ExternalCatalog {
    fn name(&self) -> &str;

    fn lookup(&self, type_name: &str, call_name: &str, cookie: &mut usize)
    -> Option<&Intrinsic>;
}

/// An [`ExternalCatalog`] backed by a plain list of entries.
#[derive(Clone, Debug, Default)]
pub struct TableCatalog {
    name: String,
    type_name: String,
    entries: Vec<Intrinsic>,
}

impl TableCatalog {
    /// `type_name` is `""` for free functions.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: Intrinsic) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn push(&mut self, entry: Intrinsic) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ExternalCatalog for TableCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, type_name: &str, call_name: &str, cookie: &mut usize) -> Option<&Intrinsic> {
        if type_name != self.type_name {
            return None;
        }
        let start = (*cookie).min(self.entries.len());
        let (offset, entry) = self.entries[start..]
            .iter()
            .enumerate()
            .find(|(_, e)| e.name == call_name)?;
        *cookie = start + offset + 1;
        Some(entry)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CatalogSource {
    /// Built-in table, keyed by the object spelling (`""` for globals).
    Builtin(&'static str),
    /// Registered catalog, by registration order.
    External(usize),
}

/// Stable identity of one overload within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureId {
    pub source: CatalogSource,
    pub index: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct CatalogEntry<'a> {
    pub id: SignatureId,
    pub intrinsic: &'a Intrinsic,
}

/// Overloads of one name that accept a given argument count.
///
/// Walks the contiguous run in the built-in table first, then asks each
/// registered catalog in turn, one lookup per step.
pub struct SignatureCatalogIterator<'a> {
    type_name: String,
    call_name: String,
    arity: usize,
    builtin_key: &'static str,
    builtin: &'static [Intrinsic],
    builtin_pos: usize,
    externals: &'a [Box<dyn ExternalCatalog>],
    external: usize,
    cookie: usize,
}

impl<'a> SignatureCatalogIterator<'a> {
    pub fn new(
        type_name: &str,
        call_name: &str,
        arity: usize,
        externals: &'a [Box<dyn ExternalCatalog>],
    ) -> Self {
        let builtin = builtin_table(type_name);
        let builtin_pos = builtin
            .iter()
            .position(|i| i.name == call_name)
            .unwrap_or(builtin.len());
        let builtin_key = ObjectKind::from_name(type_name).map_or("", ObjectKind::name);
        Self {
            type_name: type_name.to_string(),
            call_name: call_name.to_string(),
            arity,
            builtin_key,
            builtin,
            builtin_pos,
            externals,
            external: 0,
            cookie: 0,
        }
    }

    fn next_builtin(&mut self) -> Option<CatalogEntry<'a>> {
        while let Some(entry) = self.builtin.get(self.builtin_pos) {
            if entry.name != self.call_name.as_str() {
                self.builtin_pos = self.builtin.len();
                break;
            }
            let index = self.builtin_pos;
            self.builtin_pos += 1;
            if entry.accepts_arity(self.arity) {
                return Some(CatalogEntry {
                    id: SignatureId {
                        source: CatalogSource::Builtin(self.builtin_key),
                        index,
                    },
                    intrinsic: entry,
                });
            }
        }
        None
    }
}

impl<'a> Iterator for SignatureCatalogIterator<'a> {
    type Item = CatalogEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.next_builtin() {
            return Some(entry);
        }

        let externals = self.externals;
        while let Some(catalog) = externals.get(self.external) {
            let before = self.cookie;
            match catalog.lookup(&self.type_name, &self.call_name, &mut self.cookie) {
                Some(_) if self.cookie <= before => {
                    warn!(
                        target: "prism::resolve",
                        catalog = catalog.name(),
                        "external catalog did not advance its cookie; skipping"
                    );
                    self.external += 1;
                    self.cookie = 0;
                }
                Some(entry) if entry.accepts_arity(self.arity) => {
                    return Some(CatalogEntry {
                        id: SignatureId {
                            source: CatalogSource::External(self.external),
                            index: self.cookie,
                        },
                        intrinsic: entry,
                    });
                }
                Some(_) => {}
                None => {
                    self.external += 1;
                    self.cookie = 0;
                }
            }
        }
        None
    }
}
