//! Cache keys
//!
//! Keys look like `method:com.acme.User#save(string, int)`. Field and
//! property keys carry no parameter list because a name identifies at most
//! one field (or property) per type.

use std::fmt::Write;

use reflex_model::{TypeId, TypeRegistry};

/// What a cache key resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Native field by name
    Field,
    /// Managed property by name
    Property,
    /// Native method by exact parameter types
    Method,
    /// Native method by argument types
    MethodArgs,
    /// Native constructor by exact parameter types
    Constructor,
    /// Native constructor by argument types
    ConstructorArgs,
    /// Managed constructor by argument types
    ManagedConstructorArgs,
    /// Method or constructor by exact parameter types
    Executable,
    /// Method or constructor by argument types
    ExecutableArgs,
    /// Managed function by exact parameter types
    Function,
    /// Managed function by argument types
    FunctionArgs,
}

impl KeyKind {
    /// Tag used as the key prefix
    pub fn tag(self) -> &'static str {
        match self {
            KeyKind::Field => "field",
            KeyKind::Property => "property",
            KeyKind::Method => "method",
            KeyKind::MethodArgs => "method-args",
            KeyKind::Constructor => "constructor",
            KeyKind::ConstructorArgs => "constructor-args",
            KeyKind::ManagedConstructorArgs => "managed-constructor-args",
            KeyKind::Executable => "executable",
            KeyKind::ExecutableArgs => "executable-args",
            KeyKind::Function => "function",
            KeyKind::FunctionArgs => "function-args",
        }
    }

    /// Whether keys of this kind carry a parameter list
    pub fn has_params(self) -> bool {
        !matches!(self, KeyKind::Field | KeyKind::Property)
    }
}

/// Render `name(a, b)` using registry type names
pub fn signature(registry: &TypeRegistry, name: &str, params: &[TypeId]) -> String {
    let mut out = String::with_capacity(name.len() + 2 + params.len() * 8);
    out.push_str(name);
    out.push('(');
    for (i, ty) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&registry.type_name(*ty));
    }
    out.push(')');
    out
}

/// Build a cache key
pub fn cache_key(
    registry: &TypeRegistry,
    kind: KeyKind,
    type_name: &str,
    name: &str,
    params: &[TypeId],
) -> String {
    let mut key = String::with_capacity(kind.tag().len() + type_name.len() + name.len() + 8);
    let _ = write!(key, "{}:{}#", kind.tag(), type_name);
    if kind.has_params() {
        key.push_str(&signature(registry, name, params));
    } else {
        key.push_str(name);
    }
    key
}
