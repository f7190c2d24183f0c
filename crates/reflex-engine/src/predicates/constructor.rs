//! Constructor predicates

use reflex_model::{ConstructorInfo, Modifiers};

use crate::predicate::Predicate;

super::common_predicates!(ConstructorInfo);
super::callable_predicates!(ConstructorInfo);

/// Compiler-generated
pub fn is_synthetic() -> Predicate<ConstructorInfo> {
    has_modifiers(Modifiers::SYNTHETIC)
}
