//! Managed function predicates

use reflex_model::{FunctionInfo, OwningScope, TypeId};

use crate::predicate::Predicate;

super::common_predicates!(FunctionInfo);
super::callable_predicates!(FunctionInfo);

/// Declared as an extension of `receiver`
pub fn extension_of(receiver: TypeId) -> Predicate<FunctionInfo> {
    super::managed(move |ext, _| ext == Some(receiver))
}

/// Declared with any extension receiver
pub fn is_extension() -> Predicate<FunctionInfo> {
    super::managed(|ext, _| ext.is_some())
}

/// Lives in `scope`
pub fn scope(scope: OwningScope) -> Predicate<FunctionInfo> {
    super::managed(move |_, s| s == scope)
}

/// Declared `infix`
pub fn is_infix() -> Predicate<FunctionInfo> {
    Predicate::new(|f: &FunctionInfo| f.flags.infix)
}

/// Declared `operator`
pub fn is_operator() -> Predicate<FunctionInfo> {
    Predicate::new(|f: &FunctionInfo| f.flags.operator)
}

/// Declared `suspend`
pub fn is_suspend() -> Predicate<FunctionInfo> {
    Predicate::new(|f: &FunctionInfo| f.flags.suspend)
}

/// Declared `inline`
pub fn is_inline() -> Predicate<FunctionInfo> {
    Predicate::new(|f: &FunctionInfo| f.flags.inline)
}
