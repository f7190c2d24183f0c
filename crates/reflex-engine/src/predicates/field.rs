//! Field predicates

use std::sync::Arc;

use reflex_model::{FieldInfo, Modifiers, TypeId, TypeRegistry};

use crate::predicate::Predicate;

super::common_predicates!(FieldInfo);

/// Declared `volatile`
pub fn is_volatile() -> Predicate<FieldInfo> {
    has_modifiers(Modifiers::VOLATILE)
}

/// Declared `transient`
pub fn is_transient() -> Predicate<FieldInfo> {
    has_modifiers(Modifiers::TRANSIENT)
}

/// Compiler-generated
pub fn is_synthetic() -> Predicate<FieldInfo> {
    has_modifiers(Modifiers::SYNTHETIC)
}

/// Value type is exactly `ty`
pub fn value_type(ty: TypeId) -> Predicate<FieldInfo> {
    Predicate::new(move |f: &FieldInfo| f.ty == ty)
}

/// Field can hold a value of type `ty`
pub fn accepts(registry: Arc<TypeRegistry>, ty: TypeId) -> Predicate<FieldInfo> {
    Predicate::new(move |f: &FieldInfo| registry.is_assignable(ty, f.ty))
}

/// Field value is usable where `ty` is expected
pub fn value_type_assignable_to(registry: Arc<TypeRegistry>, ty: TypeId) -> Predicate<FieldInfo> {
    Predicate::new(move |f: &FieldInfo| registry.is_assignable(f.ty, ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflex_model::{FieldDef, TypeBuilder};

    fn fields() -> (Arc<TypeRegistry>, Vec<Arc<FieldInfo>>) {
        let registry = Arc::new(TypeRegistry::new());
        let id = registry
            .register(
                TypeBuilder::class("a.Fields")
                    .field(FieldDef::new("LIMIT", TypeId::INT).modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL))
                    .field(FieldDef::new("name", TypeId::STRING).modifiers(Modifiers::PRIVATE))
                    .field(FieldDef::new("flag", TypeId::BOOL).modifiers(Modifiers::VOLATILE)),
            )
            .unwrap();
        let info = registry.get(id).unwrap();
        (registry, info.fields.clone())
    }

    #[test]
    fn test_modifier_checks() {
        let (_, fields) = fields();
        let constant = is_static() & is_final() & is_public();
        assert!(constant.test(&fields[0]));
        assert!(!constant.test(&fields[1]));
        assert!(is_private().test(&fields[1]));
        assert!(is_package().test(&fields[2]));
        assert!(is_volatile().test(&fields[2]));
        assert!(!is_transient().test(&fields[2]));
    }

    #[test]
    fn test_type_checks() {
        let (registry, fields) = fields();
        assert!(value_type(TypeId::STRING).test(&fields[1]));
        assert!(value_type_assignable_to(registry.clone(), TypeId::ANY).test(&fields[1]));
        assert!(!accepts(registry, TypeId::INT).test(&fields[1]));
    }

    #[test]
    fn test_name_checks() {
        let (_, fields) = fields();
        assert!(name_equals("name").test(&fields[1]));
        assert!(name_starts_with("LI").test(&fields[0]));
        assert!(name_matches(regex::Regex::new("^[A-Z]+$").unwrap()).test(&fields[0]));
        assert!(!name_matches(regex::Regex::new("^[A-Z]+$").unwrap()).test(&fields[1]));
    }

    #[test]
    fn test_make_accessible_side_effect() {
        let (_, fields) = fields();
        assert!(!fields[1].is_accessible());
        let p = is_private() & make_accessible();
        assert!(p.test(&fields[1]));
        assert!(fields[1].is_accessible());
        // Short-circuit leaves the non-matching field alone
        assert!(!p.test(&fields[2]));
        assert!(!fields[2].is_accessible());
    }
}
