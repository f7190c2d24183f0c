//! Lazy, short-circuiting walks over resolution candidates

use std::sync::Arc;

use reflex_model::{FunctionInfo, PropertyInfo, TypeId, TypeInfo, TypeRegistry};

use crate::predicate::Predicate;
use crate::predicates::ManagedMemberInfo;
use crate::scan::{self, ClassNameSource};

/// Walk candidates, stopping as soon as the visitor says so
pub trait Traverser {
    /// Candidate type
    type Item: ?Sized + 'static;

    /// Visit candidates in order until `visit` returns true
    ///
    /// Returns whether the walk was stopped early.
    fn traverse_until(&self, visit: &mut dyn FnMut(&Arc<Self::Item>) -> bool) -> bool;

    /// First `Some` produced by `f`
    fn first_of<T>(&self, mut f: impl FnMut(&Arc<Self::Item>) -> Option<T>) -> Option<T> {
        let mut found = None;
        self.traverse_until(&mut |item| {
            found = f(item);
            found.is_some()
        });
        found
    }

    /// Like [`Traverser::first_of`], failing with `err` when nothing matches
    fn traverse_first_of<T, E>(
        &self,
        f: impl FnMut(&Arc<Self::Item>) -> Option<T>,
        err: impl FnOnce() -> E,
    ) -> Result<T, E> {
        self.first_of(f).ok_or_else(err)
    }

    /// First candidate satisfying `predicate`
    fn find(&self, predicate: &Predicate<Self::Item>) -> Option<Arc<Self::Item>> {
        self.first_of(|item| predicate.test(item).then(|| item.clone()))
    }

    /// Every candidate satisfying `predicate`, in visit order
    fn collect(&self, predicate: &Predicate<Self::Item>) -> Vec<Arc<Self::Item>> {
        let mut out = Vec::new();
        self.traverse_until(&mut |item| {
            if predicate.test(item) {
                out.push(item.clone());
            }
            false
        });
        out
    }
}

/// The type itself, then its superclass chain
#[derive(Debug, Clone, Copy)]
pub struct HierarchyTraverser<'a> {
    registry: &'a TypeRegistry,
    start: TypeId,
}

impl<'a> HierarchyTraverser<'a> {
    /// Walk from `start` to the root
    pub fn new(registry: &'a TypeRegistry, start: TypeId) -> Self {
        Self { registry, start }
    }

    /// Flatten to the members each type declares
    pub fn members<T: ?Sized + 'static>(self, select: fn(&TypeInfo) -> &[Arc<T>]) -> HierarchyMembers<'a, T> {
        HierarchyMembers { types: self, select }
    }
}

impl Traverser for HierarchyTraverser<'_> {
    type Item = TypeInfo;

    fn traverse_until(&self, visit: &mut dyn FnMut(&Arc<TypeInfo>) -> bool) -> bool {
        let mut current = Some(self.start);
        while let Some(id) = current {
            let Some(ty) = self.registry.get(id) else {
                break;
            };
            if visit(&ty) {
                return true;
            }
            current = ty.parent;
        }
        false
    }
}

/// Declared members of each type in a hierarchy, leaf first
pub struct HierarchyMembers<'a, T: ?Sized> {
    types: HierarchyTraverser<'a>,
    select: fn(&TypeInfo) -> &[Arc<T>],
}

impl<T: ?Sized + 'static> Traverser for HierarchyMembers<'_, T> {
    type Item = T;

    fn traverse_until(&self, visit: &mut dyn FnMut(&Arc<T>) -> bool) -> bool {
        let select = self.select;
        self.types
            .traverse_until(&mut |ty| select(ty).iter().any(|member| visit(member)))
    }
}

/// Where a managed member was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Declared on the type or a superclass
    Declared,
    /// Declared on the type's companion
    Companion,
    /// Declared at file level
    TopLevel,
}

/// Managed members by provenance: declared, then companion, then top-level
///
/// Top-level candidates come from file facades named by the
/// [`ClassNameSource`]. A facade in the target's package contributes all of
/// its members; a facade elsewhere contributes only extensions whose
/// receiver accepts the target type.
pub struct ProvenanceTraverser<'a, T: ManagedMemberInfo> {
    registry: &'a TypeRegistry,
    target: TypeId,
    class_names: &'a dyn ClassNameSource,
    select: fn(&TypeInfo) -> &[Arc<T>],
}

impl<'a, T: ManagedMemberInfo> ProvenanceTraverser<'a, T> {
    /// Traverse members chosen by `select`
    pub fn new(
        registry: &'a TypeRegistry,
        target: TypeId,
        class_names: &'a dyn ClassNameSource,
        select: fn(&TypeInfo) -> &[Arc<T>],
    ) -> Self {
        Self {
            registry,
            target,
            class_names,
            select,
        }
    }

    /// Visit members with their provenance
    pub fn traverse_with_provenance(&self, visit: &mut dyn FnMut(Provenance, &Arc<T>) -> bool) -> bool {
        let select = self.select;

        let declared = HierarchyTraverser::new(self.registry, self.target).members(select);
        if declared.traverse_until(&mut |m| visit(Provenance::Declared, m)) {
            return true;
        }

        if let Some(companion) = self.registry.companion_of(self.target) {
            if select(&companion).iter().any(|m| visit(Provenance::Companion, m)) {
                return true;
            }
        }

        let Some(target) = self.registry.get(self.target) else {
            return false;
        };
        let package = target.package();
        for facade in scan::file_facades(self.registry, self.class_names) {
            let same_package = facade.package() == package;
            for member in select(&facade) {
                let applies = match member.extension_receiver() {
                    Some(receiver) => self.registry.is_assignable(self.target, receiver),
                    None => same_package,
                };
                if applies && visit(Provenance::TopLevel, member) {
                    return true;
                }
            }
        }
        false
    }
}

impl<T: ManagedMemberInfo> Traverser for ProvenanceTraverser<'_, T> {
    type Item = T;

    fn traverse_until(&self, visit: &mut dyn FnMut(&Arc<T>) -> bool) -> bool {
        self.traverse_with_provenance(&mut |_, m| visit(m))
    }
}

/// Managed functions of a type by provenance
pub fn functions<'a>(
    registry: &'a TypeRegistry,
    target: TypeId,
    class_names: &'a dyn ClassNameSource,
) -> ProvenanceTraverser<'a, FunctionInfo> {
    ProvenanceTraverser::new(registry, target, class_names, |t| t.functions.as_slice())
}

/// Managed properties of a type by provenance
pub fn properties<'a>(
    registry: &'a TypeRegistry,
    target: TypeId,
    class_names: &'a dyn ClassNameSource,
) -> ProvenanceTraverser<'a, PropertyInfo> {
    ProvenanceTraverser::new(registry, target, class_names, |t| t.properties.as_slice())
}
