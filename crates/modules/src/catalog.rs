use crate::{BoxV1, BoxV2, BoxV3};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use upbox_core::contract::validate;
use upbox_core::{Error, Implementation, ImplementationId, Result};

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    let mut catalog = Catalog::new();
    let builtins: [(&str, Arc<dyn Implementation>); 3] = [
        ("box-v1", Arc::new(BoxV1) as Arc<dyn Implementation>),
        ("box-v2", Arc::new(BoxV2) as Arc<dyn Implementation>),
        ("box-v3", Arc::new(BoxV3) as Arc<dyn Implementation>),
    ];
    for (name, module) in builtins {
        catalog.entries.insert(name.to_string(), module);
    }
    catalog
});

/// Named set of implementations available for deployment and upgrade
///
/// Lookups by name serve the CLI and executor; lookups by
/// [`ImplementationId`] serve snapshot restore.
#[derive(Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, Arc<dyn Implementation>>,
}

impl Catalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in Box versions: `box-v1`, `box-v2`, `box-v3`
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Register an implementation under `name`
    ///
    /// Fails if the name or the implementation id is already taken, or if
    /// the implementation's declarations are malformed.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        implementation: Arc<dyn Implementation>,
    ) -> Result<()> {
        let name = name.into();
        let id = implementation.id();
        validate(&id, &implementation.layout(), &implementation.operations())?;
        if self.entries.contains_key(&name) {
            return Err(Error::invalid_argument(format!(
                "catalog name '{}' is already registered",
                name
            )));
        }
        if self.resolve(&id).is_some() {
            return Err(Error::invalid_argument(format!(
                "implementation {} is already registered",
                id
            )));
        }
        self.entries.insert(name, implementation);
        Ok(())
    }

    /// Implementation registered under `name`
    pub fn get(&self, name: &str) -> Option<Arc<dyn Implementation>> {
        self.entries.get(name).cloned()
    }

    /// Implementation with the given id
    pub fn resolve(&self, id: &ImplementationId) -> Option<Arc<dyn Implementation>> {
        self.entries.values().find(|m| &m.id() == id).cloned()
    }

    /// Catalog name of an implementation id
    pub fn name_of(&self, id: &ImplementationId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, m)| &m.id() == id)
            .map(|(name, _)| name.as_str())
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Number of registered implementations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, m)| (name, m.id())))
            .finish()
    }
}
