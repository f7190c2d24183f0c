//! Checks applicable to every member kind

use regex::Regex;
use reflex_model::{Modifiers, TypeId, Visibility};

use super::MemberInfo;
use crate::predicate::Predicate;

/// Name equals `name`
pub fn name_equals<M: MemberInfo>(name: impl Into<String>) -> Predicate<M> {
    let name = name.into();
    Predicate::new(move |m: &M| m.member_name() == name)
}

/// Name starts with `prefix`
pub fn name_starts_with<M: MemberInfo>(prefix: impl Into<String>) -> Predicate<M> {
    let prefix = prefix.into();
    Predicate::new(move |m: &M| m.member_name().starts_with(&prefix))
}

/// Name matches `pattern` anywhere; anchor the pattern for a full match
pub fn name_matches<M: MemberInfo>(pattern: Regex) -> Predicate<M> {
    Predicate::new(move |m: &M| pattern.is_match(m.member_name()))
}

fn visibility<M: MemberInfo>(visibility: Visibility) -> Predicate<M> {
    Predicate::new(move |m: &M| m.member_modifiers().visibility() == visibility)
}

/// Declared `public`
pub fn is_public<M: MemberInfo>() -> Predicate<M> {
    visibility(Visibility::Public)
}

/// Declared `protected`
pub fn is_protected<M: MemberInfo>() -> Predicate<M> {
    visibility(Visibility::Protected)
}

/// Declared `private`
pub fn is_private<M: MemberInfo>() -> Predicate<M> {
    visibility(Visibility::Private)
}

/// No visibility modifier
pub fn is_package<M: MemberInfo>() -> Predicate<M> {
    visibility(Visibility::Package)
}

/// Carries every modifier in `modifiers`
pub fn has_modifiers<M: MemberInfo>(modifiers: Modifiers) -> Predicate<M> {
    Predicate::new(move |m: &M| m.member_modifiers().contains(modifiers))
}

/// Declared `static`
pub fn is_static<M: MemberInfo>() -> Predicate<M> {
    has_modifiers(Modifiers::STATIC)
}

/// Declared `final`
pub fn is_final<M: MemberInfo>() -> Predicate<M> {
    has_modifiers(Modifiers::FINAL)
}

/// Annotated with `name`
pub fn has_annotation<M: MemberInfo>(name: impl Into<String>) -> Predicate<M> {
    let name = name.into();
    Predicate::new(move |m: &M| m.member_annotations().iter().any(|a| a.name == name))
}

/// Declared by `ty`
pub fn declared_by<M: MemberInfo>(ty: TypeId) -> Predicate<M> {
    Predicate::new(move |m: &M| m.member_declaring_type() == ty)
}

/// Grants access and evaluates true
///
/// The one non-pure predicate: every member it is tested against becomes
/// accessible for the rest of the process. Put it last in a conjunction so
/// only members that passed the other checks are touched.
pub fn make_accessible<M: MemberInfo>() -> Predicate<M> {
    Predicate::new(|m: &M| {
        m.grant_access();
        true
    })
}
