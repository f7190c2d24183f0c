//! Class-name enumeration
//!
//! Top-level member discovery needs to know which file facades exist. The
//! enumeration is a collaborator: it may be expensive, partial, or empty,
//! and the engine copes with all three.

use std::sync::Arc;

use reflex_model::{TypeInfo, TypeRegistry};
use tracing::trace;

/// Source of loadable class names
pub trait ClassNameSource: Send + Sync {
    /// All known fully-qualified class names
    fn load_class_names(&self) -> Vec<String>;

    /// Class names accepted by `filter`
    fn load_matching(&self, filter: &dyn Fn(&str) -> bool) -> Vec<String> {
        self.load_class_names().into_iter().filter(|n| filter(n)).collect()
    }
}

/// Enumerates the file facades of a registry
#[derive(Debug, Clone)]
pub struct RegistryClassNames {
    registry: Arc<TypeRegistry>,
}

impl RegistryClassNames {
    /// Enumerate facades registered in `registry`
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl ClassNameSource for RegistryClassNames {
    fn load_class_names(&self) -> Vec<String> {
        self.registry.file_facades().iter().map(|t| t.name.clone()).collect()
    }
}

/// Fixed list of class names
#[derive(Debug, Clone, Default)]
pub struct StaticClassNames(pub Vec<String>);

impl StaticClassNames {
    /// Build from any list of names
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl ClassNameSource for StaticClassNames {
    fn load_class_names(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// File facades named by `source` that the registry knows about
///
/// Names that are unknown or not facades are skipped.
pub fn file_facades(registry: &TypeRegistry, source: &dyn ClassNameSource) -> Vec<Arc<TypeInfo>> {
    source
        .load_class_names()
        .into_iter()
        .filter_map(|name| match registry.get_by_name(&name) {
            Some(ty) if ty.is_file_facade() => Some(ty),
            _ => {
                trace!(name = %name, "skipping non-facade class name");
                None
            }
        })
        .collect()
}
