//! Type registry
//!
//! The registry is the metadata collaborator the engine reflects over. It
//! is populated through [`TypeBuilder`] and shared read-mostly behind an
//! `Arc`; registration takes a short write lock.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::builder::TypeBuilder;
use crate::error::RegistryError;
use crate::ty::{TypeId, TypeInfo, TypeKind, BUILTIN_TYPE_NAMES};

#[derive(Default)]
struct RegistryInner {
    /// Types indexed by id
    types: Vec<Arc<TypeInfo>>,
    /// Fully-qualified name to id
    by_name: FxHashMap<String, TypeId>,
}

/// Registry of all known types
pub struct TypeRegistry {
    inner: RwLock<RegistryInner>,
}

impl TypeRegistry {
    /// Create a registry holding only the builtin types
    pub fn new() -> Self {
        let mut inner = RegistryInner::default();
        for (index, name) in BUILTIN_TYPE_NAMES.iter().enumerate() {
            let id = TypeId::from_index(index as u32);
            inner.types.push(Arc::new(TypeInfo::new(id, name.to_string(), TypeKind::Builtin)));
            inner.by_name.insert(name.to_string(), id);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Register a type, returning its id
    pub fn register(&self, builder: TypeBuilder) -> Result<TypeId, RegistryError> {
        let mut inner = self.inner.write();
        if inner.by_name.contains_key(builder.name()) {
            return Err(RegistryError::DuplicateType(builder.name().to_string()));
        }

        let parent = match builder.parent_id() {
            Some(parent_id) => Some(
                inner
                    .types
                    .get(parent_id.index())
                    .cloned()
                    .ok_or(RegistryError::UnknownType(parent_id.raw()))?,
            ),
            None => None,
        };
        if let Some(companion) = builder.companion_id() {
            if companion.index() >= inner.types.len() {
                return Err(RegistryError::UnknownType(companion.raw()));
            }
        }

        let id = TypeId::from_index(inner.types.len() as u32);
        let info = builder.build(id, parent.as_deref())?;
        inner.by_name.insert(info.name.clone(), id);
        inner.types.push(Arc::new(info));
        Ok(id)
    }

    /// Get type by id
    pub fn get(&self, id: TypeId) -> Option<Arc<TypeInfo>> {
        self.inner.read().types.get(id.index()).cloned()
    }

    /// Get type by fully-qualified name
    pub fn get_by_name(&self, name: &str) -> Option<Arc<TypeInfo>> {
        let inner = self.inner.read();
        let id = inner.by_name.get(name)?;
        inner.types.get(id.index()).cloned()
    }

    /// Id for a fully-qualified name
    pub fn id_of(&self, name: &str) -> Option<TypeId> {
        self.inner.read().by_name.get(name).copied()
    }

    /// Fully-qualified name for an id (`#<index>` when unknown)
    pub fn type_name(&self, id: TypeId) -> String {
        self.inner
            .read()
            .types
            .get(id.index())
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("#{}", id.index()))
    }

    /// Number of registered types (builtins included)
    pub fn len(&self) -> usize {
        self.inner.read().types.len()
    }

    /// Check if only builtins are registered
    pub fn is_empty(&self) -> bool {
        self.len() <= TypeId::BUILTIN_COUNT
    }

    /// All registered types in id order
    pub fn all(&self) -> Vec<Arc<TypeInfo>> {
        self.inner.read().types.clone()
    }

    /// All fully-qualified type names in id order
    pub fn type_names(&self) -> Vec<String> {
        self.inner.read().types.iter().map(|t| t.name.clone()).collect()
    }

    /// File facade types
    pub fn file_facades(&self) -> Vec<Arc<TypeInfo>> {
        self.inner
            .read()
            .types
            .iter()
            .filter(|t| t.is_file_facade())
            .cloned()
            .collect()
    }

    /// Companion type of `id`
    pub fn companion_of(&self, id: TypeId) -> Option<Arc<TypeInfo>> {
        let companion = self.get(id)?.companion?;
        self.get(companion)
    }

    /// Check if a type carries managed-compiler metadata
    pub fn is_managed(&self, id: TypeId) -> bool {
        self.get(id).is_some_and(|t| t.managed)
    }

    /// Get the class hierarchy (inheritance chain) for a type
    ///
    /// Returns types from the given type up to the root.
    /// The first element is the type itself, the last is the root ancestor.
    pub fn hierarchy(&self, id: TypeId) -> Vec<Arc<TypeInfo>> {
        let inner = self.inner.read();
        let mut hierarchy = Vec::new();
        let mut current = Some(id);

        while let Some(id) = current {
            match inner.types.get(id.index()) {
                Some(ty) => {
                    hierarchy.push(ty.clone());
                    current = ty.parent;
                }
                None => break,
            }
        }

        hierarchy
    }

    /// Check if `sub` is `sup` or inherits from it
    pub fn is_subclass_of(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }

        let inner = self.inner.read();
        let mut current = sub;
        while let Some(ty) = inner.types.get(current.index()) {
            match ty.parent {
                Some(parent) if parent == sup => return true,
                Some(parent) => current = parent,
                None => break,
            }
        }

        false
    }

    /// Check if a value of type `from` can be used where `to` is expected
    pub fn is_assignable(&self, from: TypeId, to: TypeId) -> bool {
        to == TypeId::ANY || self.is_subclass_of(from, to)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry").field("types", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_preregistered() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.id_of("string"), Some(TypeId::STRING));
        assert_eq!(registry.type_name(TypeId::ANY), "any");
        assert_eq!(registry.type_name(TypeId::from_index(99)), "#99");
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let registry = TypeRegistry::new();
        registry.register(TypeBuilder::class("a.A")).unwrap();
        assert_eq!(
            registry.register(TypeBuilder::class("a.A")),
            Err(RegistryError::DuplicateType("a.A".to_string()))
        );
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let registry = TypeRegistry::new();
        let result = registry.register(TypeBuilder::class("a.A").extends(TypeId::from_index(42)));
        assert_eq!(result, Err(RegistryError::UnknownType(42)));
    }

    #[test]
    fn test_hierarchy_and_assignability() {
        let registry = TypeRegistry::new();
        let base = registry.register(TypeBuilder::class("a.Base")).unwrap();
        let mid = registry.register(TypeBuilder::class("a.Mid").extends(base)).unwrap();
        let leaf = registry.register(TypeBuilder::class("a.Leaf").extends(mid)).unwrap();
        let other = registry.register(TypeBuilder::class("a.Other")).unwrap();

        let names: Vec<_> = registry.hierarchy(leaf).iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["a.Leaf", "a.Mid", "a.Base"]);

        assert!(registry.is_subclass_of(leaf, base));
        assert!(!registry.is_subclass_of(base, leaf));
        assert!(registry.is_assignable(leaf, mid));
        assert!(registry.is_assignable(other, TypeId::ANY));
        assert!(!registry.is_assignable(other, base));
        assert!(!registry.is_assignable(TypeId::INT, TypeId::STRING));
    }

    #[test]
    fn test_file_facades_and_companions() {
        let registry = TypeRegistry::new();
        let companion = registry.register(TypeBuilder::companion("a.Host.Companion")).unwrap();
        let host = registry
            .register(TypeBuilder::class("a.Host").managed().with_companion(companion))
            .unwrap();
        registry.register(TypeBuilder::file_facade("a.HostKt")).unwrap();

        assert_eq!(registry.companion_of(host).map(|c| c.id), Some(companion));
        assert!(registry.is_managed(host));
        let facades = registry.file_facades();
        assert_eq!(facades.len(), 1);
        assert_eq!(facades[0].name, "a.HostKt");
    }
}
