//! Managed property predicates

use std::sync::Arc;

use reflex_model::{OwningScope, PropertyInfo, TypeId, TypeRegistry};

use crate::predicate::Predicate;

super::common_predicates!(PropertyInfo);

/// Declared `const val`
pub fn is_const() -> Predicate<PropertyInfo> {
    Predicate::new(|p: &PropertyInfo| p.is_const)
}

/// Declared `lateinit var`
pub fn is_lateinit() -> Predicate<PropertyInfo> {
    Predicate::new(|p: &PropertyInfo| p.is_lateinit)
}

/// Read-only (`val`)
pub fn is_val() -> Predicate<PropertyInfo> {
    Predicate::new(|p: &PropertyInfo| !p.is_mutable)
}

/// Mutable (`var`)
pub fn is_var() -> Predicate<PropertyInfo> {
    Predicate::new(|p: &PropertyInfo| p.is_mutable)
}

/// Declared as an extension of `receiver`
pub fn extension_of(receiver: TypeId) -> Predicate<PropertyInfo> {
    super::managed(move |ext, _| ext == Some(receiver))
}

/// Declared with any extension receiver
pub fn is_extension() -> Predicate<PropertyInfo> {
    super::managed(|ext, _| ext.is_some())
}

/// Lives in `scope`
pub fn scope(scope: OwningScope) -> Predicate<PropertyInfo> {
    super::managed(move |_, s| s == scope)
}

/// Value type is exactly `ty`
pub fn value_type(ty: TypeId) -> Predicate<PropertyInfo> {
    Predicate::new(move |p: &PropertyInfo| p.ty == ty)
}

/// Value is usable where `ty` is expected
pub fn value_type_assignable_to(registry: Arc<TypeRegistry>, ty: TypeId) -> Predicate<PropertyInfo> {
    Predicate::new(move |p: &PropertyInfo| registry.is_assignable(p.ty, ty))
}
