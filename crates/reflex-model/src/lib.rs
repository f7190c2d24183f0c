//! Reflex Runtime Model
//!
//! This crate provides the object model and member metadata that the
//! resolution engine reflects over:
//! - Dynamic values and heap objects
//! - Type descriptors with a single-superclass hierarchy
//! - Native members (fields, methods, constructors)
//! - Managed members (properties, functions) with extension receivers,
//!   companion scoping and file-level declarations
//! - A shared type registry populated through [`TypeBuilder`]

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod builder;
pub mod error;
pub mod members;
pub mod modifiers;
pub mod registry;
pub mod ty;
pub mod value;

pub use builder::{ConstructorDef, FieldDef, FunctionDef, MethodDef, PropertyDef, TypeBuilder};
pub use error::{InvokeError, InvokeResult, RegistryError};
pub use members::{
    Annotation, ConstructorInfo, ConstructorInit, FieldInfo, FunctionFlags, FunctionInfo,
    MethodInfo, NativeBody, OwningScope, ParameterInfo, PropertyAccessor, PropertyInfo,
};
pub use modifiers::{Modifiers, Visibility};
pub use registry::TypeRegistry;
pub use ty::{TypeId, TypeInfo, TypeKind};
pub use value::{Object, ObjectRef, Value};
