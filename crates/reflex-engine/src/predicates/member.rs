//! Predicates over [`Member`] of any kind
//!
//! Checks that do not apply to a member's kind evaluate to `false`: asking
//! whether a constructor is `infix` is not an error.

use std::sync::Arc;

use reflex_model::{Modifiers, OwningScope, TypeId, TypeRegistry};

use super::{CallableInfo, ManagedMemberInfo};
use crate::member::{Member, MemberKind};
use crate::predicate::Predicate;

super::common_predicates!(Member);

/// Member is of `kind`
pub fn kind(kind: MemberKind) -> Predicate<Member> {
    Predicate::new(move |m: &Member| m.kind() == kind)
}

/// Declared `volatile`
pub fn is_volatile() -> Predicate<Member> {
    has_modifiers(Modifiers::VOLATILE)
}

/// Declared `transient`
pub fn is_transient() -> Predicate<Member> {
    has_modifiers(Modifiers::TRANSIENT)
}

/// Declared `synchronized`
pub fn is_synchronized() -> Predicate<Member> {
    has_modifiers(Modifiers::SYNCHRONIZED)
}

/// Declared `native`
pub fn is_native() -> Predicate<Member> {
    has_modifiers(Modifiers::NATIVE)
}

/// Declared `abstract`
pub fn is_abstract() -> Predicate<Member> {
    has_modifiers(Modifiers::ABSTRACT)
}

/// Compiler-generated
pub fn is_synthetic() -> Predicate<Member> {
    has_modifiers(Modifiers::SYNTHETIC)
}

fn callable(test: impl Fn(&dyn CallableInfo) -> bool + Send + Sync + 'static) -> Predicate<Member> {
    Predicate::new(move |m: &Member| match m {
        Member::Method(x) => test(&**x),
        Member::Constructor(x) => test(&**x),
        Member::Function(x) => test(&**x),
        Member::Field(_) | Member::Property(_) => false,
    })
}

fn managed(test: impl Fn(&dyn ManagedMemberInfo) -> bool + Send + Sync + 'static) -> Predicate<Member> {
    Predicate::new(move |m: &Member| match m {
        Member::Function(x) => test(&**x),
        Member::Property(x) => test(&**x),
        _ => false,
    })
}

/// Exactly `count` value parameters (callables only)
pub fn parameter_count(count: usize) -> Predicate<Member> {
    callable(move |c| c.parameter_types().len() == count)
}

/// Value parameter types equal `types` (callables only)
pub fn parameter_types(types: &[TypeId]) -> Predicate<Member> {
    let types = types.to_vec();
    callable(move |c| c.parameter_types() == types)
}

/// Each value parameter accepts the corresponding type (callables only)
pub fn parameters_assignable_from(registry: Arc<TypeRegistry>, types: &[TypeId]) -> Predicate<Member> {
    let types = types.to_vec();
    callable(move |c| super::callable::all_assignable(&registry, &c.parameter_types(), &types))
}

/// Returns exactly `ty` (callables only)
pub fn return_type(ty: TypeId) -> Predicate<Member> {
    callable(move |c| c.result_type() == ty)
}

/// Value type of a field or property is exactly `ty`
pub fn value_type(ty: TypeId) -> Predicate<Member> {
    Predicate::new(move |m: &Member| match m {
        Member::Field(f) => f.ty == ty,
        Member::Property(p) => p.ty == ty,
        _ => false,
    })
}

/// Declared as an extension of `receiver` (managed members only)
pub fn extension_of(receiver: TypeId) -> Predicate<Member> {
    managed(move |m| m.extension_receiver() == Some(receiver))
}

/// Lives in `scope` (managed members only)
pub fn scope(scope: OwningScope) -> Predicate<Member> {
    managed(move |m| m.owning_scope() == scope)
}

fn function_flag(test: impl Fn(&reflex_model::FunctionFlags) -> bool + Send + Sync + 'static) -> Predicate<Member> {
    Predicate::new(move |m: &Member| m.as_function().is_some_and(|f| test(&f.flags)))
}

/// Declared `infix` (functions only)
pub fn is_infix() -> Predicate<Member> {
    function_flag(|f| f.infix)
}

/// Declared `operator` (functions only)
pub fn is_operator() -> Predicate<Member> {
    function_flag(|f| f.operator)
}

/// Declared `suspend` (functions only)
pub fn is_suspend() -> Predicate<Member> {
    function_flag(|f| f.suspend)
}

/// Declared `inline` (functions only)
pub fn is_inline() -> Predicate<Member> {
    function_flag(|f| f.inline)
}

/// Declared `const val` (properties only)
pub fn is_const() -> Predicate<Member> {
    Predicate::new(|m: &Member| m.as_property().is_some_and(|p| p.is_const))
}

/// Declared `lateinit var` (properties only)
pub fn is_lateinit() -> Predicate<Member> {
    Predicate::new(|m: &Member| m.as_property().is_some_and(|p| p.is_lateinit))
}

/// Read-only property (properties only)
pub fn is_val() -> Predicate<Member> {
    Predicate::new(|m: &Member| m.as_property().is_some_and(|p| !p.is_mutable))
}

/// Mutable property (properties only)
pub fn is_var() -> Predicate<Member> {
    Predicate::new(|m: &Member| m.as_property().is_some_and(|p| p.is_mutable))
}
