//! Predicate builders per member category
//!
//! Each submodule exposes factory functions returning a [`Predicate`] over
//! one descriptor type:
//!
//! ```ignore
//! use reflex_engine::predicates::method;
//!
//! let getter = method::name_starts_with("get") & method::parameter_count(0) & !method::is_static();
//! ```
//!
//! Checks shared by several categories are written once in [`common`] and
//! [`callable`] against the [`MemberInfo`] / [`CallableInfo`] traits, then
//! stamped into each category module.

use reflex_model::{
    Annotation, ConstructorInfo, FieldInfo, FunctionInfo, MethodInfo, Modifiers, OwningScope, PropertyInfo,
    TypeId,
};

use crate::member::Member;
use crate::predicate::Predicate;

/// Structural view shared by every member kind
pub trait MemberInfo: Send + Sync + 'static {
    /// Simple name
    fn member_name(&self) -> &str;
    /// Modifier set
    fn member_modifiers(&self) -> Modifiers;
    /// Annotations
    fn member_annotations(&self) -> &[Annotation];
    /// Declaring type
    fn member_declaring_type(&self) -> TypeId;
    /// Set the accessible flag
    fn grant_access(&self);
}

/// Members with parameters and a result
pub trait CallableInfo: MemberInfo {
    /// Value parameter types, receivers excluded
    fn parameter_types(&self) -> Vec<TypeId>;
    /// Return type (the constructed type for constructors)
    fn result_type(&self) -> TypeId;
}

/// Members of the managed model
pub trait ManagedMemberInfo: MemberInfo {
    /// Extension receiver type
    fn extension_receiver(&self) -> Option<TypeId>;
    /// Owning scope
    fn owning_scope(&self) -> OwningScope;
}

macro_rules! impl_member_info {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MemberInfo for $ty {
                fn member_name(&self) -> &str {
                    &self.name
                }
                fn member_modifiers(&self) -> Modifiers {
                    self.modifiers
                }
                fn member_annotations(&self) -> &[Annotation] {
                    &self.annotations
                }
                fn member_declaring_type(&self) -> TypeId {
                    self.declaring_type
                }
                fn grant_access(&self) {
                    self.make_accessible();
                }
            }
        )*
    };
}

impl_member_info!(FieldInfo, MethodInfo, PropertyInfo, FunctionInfo);

impl MemberInfo for ConstructorInfo {
    fn member_name(&self) -> &str {
        reflex_model::members::CONSTRUCTOR_NAME
    }
    fn member_modifiers(&self) -> Modifiers {
        self.modifiers
    }
    fn member_annotations(&self) -> &[Annotation] {
        &self.annotations
    }
    fn member_declaring_type(&self) -> TypeId {
        self.declaring_type
    }
    fn grant_access(&self) {
        self.make_accessible();
    }
}

impl CallableInfo for MethodInfo {
    fn parameter_types(&self) -> Vec<TypeId> {
        self.param_types()
    }
    fn result_type(&self) -> TypeId {
        self.return_type
    }
}

impl CallableInfo for ConstructorInfo {
    fn parameter_types(&self) -> Vec<TypeId> {
        self.param_types()
    }
    fn result_type(&self) -> TypeId {
        self.declaring_type
    }
}

impl CallableInfo for FunctionInfo {
    fn parameter_types(&self) -> Vec<TypeId> {
        self.value_param_types()
    }
    fn result_type(&self) -> TypeId {
        self.return_type
    }
}

impl ManagedMemberInfo for FunctionInfo {
    fn extension_receiver(&self) -> Option<TypeId> {
        self.extension_receiver
    }
    fn owning_scope(&self) -> OwningScope {
        self.scope
    }
}

impl ManagedMemberInfo for PropertyInfo {
    fn extension_receiver(&self) -> Option<TypeId> {
        self.extension_receiver
    }
    fn owning_scope(&self) -> OwningScope {
        self.scope
    }
}

impl MemberInfo for Member {
    fn member_name(&self) -> &str {
        self.name()
    }
    fn member_modifiers(&self) -> Modifiers {
        self.modifiers()
    }
    fn member_annotations(&self) -> &[Annotation] {
        self.annotations()
    }
    fn member_declaring_type(&self) -> TypeId {
        self.declaring_type()
    }
    fn grant_access(&self) {
        self.make_accessible();
    }
}

/// Stamp the shared checks into a category module for one descriptor type
macro_rules! common_predicates {
    ($ty:ty) => {
        /// Name equals `name`
        pub fn name_equals(name: impl Into<String>) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::name_equals(name)
        }

        /// Name starts with `prefix`
        pub fn name_starts_with(prefix: impl Into<String>) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::name_starts_with(prefix)
        }

        /// Name matches the regular expression
        pub fn name_matches(pattern: regex::Regex) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::name_matches(pattern)
        }

        /// Declared `public`
        pub fn is_public() -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::is_public()
        }

        /// Declared `protected`
        pub fn is_protected() -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::is_protected()
        }

        /// Declared `private`
        pub fn is_private() -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::is_private()
        }

        /// Package visibility (no visibility modifier)
        pub fn is_package() -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::is_package()
        }

        /// Declared `static`
        pub fn is_static() -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::is_static()
        }

        /// Declared `final`
        pub fn is_final() -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::is_final()
        }

        /// Carries every modifier in `modifiers`
        pub fn has_modifiers(modifiers: reflex_model::Modifiers) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::has_modifiers(modifiers)
        }

        /// Annotated with `name`
        pub fn has_annotation(name: impl Into<String>) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::has_annotation(name)
        }

        /// Declared by `ty`
        pub fn declared_by(ty: reflex_model::TypeId) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::declared_by(ty)
        }

        /// Grants access to the member and evaluates true
        ///
        /// Not pure: testing a member mutates its accessible flag.
        pub fn make_accessible() -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::common::make_accessible()
        }
    };
}

/// Stamp the parameter/return checks into a callable category module
macro_rules! callable_predicates {
    ($ty:ty) => {
        /// Exactly `count` value parameters
        pub fn parameter_count(count: usize) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::callable::parameter_count(count)
        }

        /// Value parameter types equal `types` positionally
        pub fn parameter_types(types: &[reflex_model::TypeId]) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::callable::parameter_types(types)
        }

        /// Each value parameter accepts the corresponding type
        pub fn parameters_assignable_from(
            registry: std::sync::Arc<reflex_model::TypeRegistry>,
            types: &[reflex_model::TypeId],
        ) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::callable::parameters_assignable_from(registry, types)
        }

        /// Returns exactly `ty`
        pub fn return_type(ty: reflex_model::TypeId) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::callable::return_type(ty)
        }

        /// Return value is usable where `ty` is expected
        pub fn return_type_assignable_to(
            registry: std::sync::Arc<reflex_model::TypeRegistry>,
            ty: reflex_model::TypeId,
        ) -> $crate::predicate::Predicate<$ty> {
            $crate::predicates::callable::return_type_assignable_to(registry, ty)
        }
    };
}

pub(crate) use callable_predicates;
pub(crate) use common_predicates;

pub mod callable;
pub mod common;
pub mod constructor;
pub mod field;
pub mod function;
pub mod member;
pub mod method;
pub mod property;

/// Predicate over a member's extension receiver and owning scope
pub(crate) fn managed<M: ManagedMemberInfo>(
    test: impl Fn(Option<TypeId>, OwningScope) -> bool + Send + Sync + 'static,
) -> Predicate<M> {
    Predicate::new(move |m: &M| test(m.extension_receiver(), m.owning_scope()))
}
