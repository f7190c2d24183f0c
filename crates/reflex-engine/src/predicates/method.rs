//! Method predicates

use reflex_model::{MethodInfo, Modifiers};

use crate::predicate::Predicate;

super::common_predicates!(MethodInfo);
super::callable_predicates!(MethodInfo);

/// Declared `synchronized`
pub fn is_synchronized() -> Predicate<MethodInfo> {
    has_modifiers(Modifiers::SYNCHRONIZED)
}

/// Declared `native`
pub fn is_native() -> Predicate<MethodInfo> {
    has_modifiers(Modifiers::NATIVE)
}

/// Declared `abstract`
pub fn is_abstract() -> Predicate<MethodInfo> {
    has_modifiers(Modifiers::ABSTRACT)
}

/// Compiler-generated
pub fn is_synthetic() -> Predicate<MethodInfo> {
    has_modifiers(Modifiers::SYNTHETIC)
}
