//! Checks on parameters and return types

use std::sync::Arc;

use reflex_model::{TypeId, TypeRegistry};

use super::CallableInfo;
use crate::predicate::Predicate;

/// Exactly `count` value parameters
pub fn parameter_count<M: CallableInfo>(count: usize) -> Predicate<M> {
    Predicate::new(move |m: &M| m.parameter_types().len() == count)
}

/// Value parameter types equal `types` positionally
pub fn parameter_types<M: CallableInfo>(types: &[TypeId]) -> Predicate<M> {
    let types = types.to_vec();
    Predicate::new(move |m: &M| m.parameter_types() == types)
}

/// Same arity, and each formal accepts the corresponding type
pub fn parameters_assignable_from<M: CallableInfo>(registry: Arc<TypeRegistry>, types: &[TypeId]) -> Predicate<M> {
    let types = types.to_vec();
    Predicate::new(move |m: &M| all_assignable(&registry, &m.parameter_types(), &types))
}

/// Returns exactly `ty`
pub fn return_type<M: CallableInfo>(ty: TypeId) -> Predicate<M> {
    Predicate::new(move |m: &M| m.result_type() == ty)
}

/// Return value is usable where `ty` is expected
pub fn return_type_assignable_to<M: CallableInfo>(registry: Arc<TypeRegistry>, ty: TypeId) -> Predicate<M> {
    Predicate::new(move |m: &M| registry.is_assignable(m.result_type(), ty))
}

/// Positional assignability with exact arity
///
/// An `any` argument type stands for a null argument and matches every formal.
pub(crate) fn all_assignable(registry: &TypeRegistry, formals: &[TypeId], actuals: &[TypeId]) -> bool {
    formals.len() == actuals.len()
        && formals
            .iter()
            .zip(actuals)
            .all(|(formal, actual)| *actual == TypeId::ANY || registry.is_assignable(*actual, *formal))
}
