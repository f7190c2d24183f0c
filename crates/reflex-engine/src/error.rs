//! Error types for member resolution and dispatch

use reflex_model::InvokeError;

/// Result type for resolution and invocation
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Resolution and invocation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    /// No field with the requested name along the hierarchy
    #[error("Field '{name}' not found in {type_name}")]
    FieldNotFound {
        /// Target type name
        type_name: String,
        /// Requested field name
        name: String,
    },

    /// No method with the requested signature
    #[error("Method {signature} not found in {type_name}")]
    MethodNotFound {
        /// Target type name
        type_name: String,
        /// Attempted signature
        signature: String,
    },

    /// No constructor with the requested signature
    #[error("Constructor {signature} not found in {type_name}")]
    ConstructorNotFound {
        /// Target type name
        type_name: String,
        /// Attempted signature
        signature: String,
    },

    /// No managed function with the requested signature
    #[error("Function {signature} not found in {type_name}")]
    FunctionNotFound {
        /// Target type name
        type_name: String,
        /// Attempted signature
        signature: String,
    },

    /// No managed property (or any member, for dynamic lookups) with the name
    #[error("Property '{name}' not found in {type_name}")]
    PropertyNotFound {
        /// Target type name
        type_name: String,
        /// Requested name
        name: String,
    },

    /// Several overloads match in strict mode
    #[error("Ambiguous call {signature} in {type_name}: {candidates} candidates match")]
    Ambiguous {
        /// Target type name
        type_name: String,
        /// Attempted signature
        signature: String,
        /// Number of matching candidates
        candidates: usize,
    },

    /// The type is on the engine's restricted list
    #[error("Reflection on {0} is restricted")]
    RestrictedType(String),

    /// Type id is not registered
    #[error("Unknown type id: {0}")]
    UnknownType(u32),

    /// Final field could not be written by any fallback
    #[error("Cannot write final field {field}: {reason}")]
    FinalFieldWrite {
        /// Field description
        field: String,
        /// Why the last fallback failed
        reason: String,
    },

    /// The resolved member failed when called
    #[error("Invocation of {member} failed: {source}")]
    Invocation {
        /// Member description
        member: String,
        /// Underlying failure
        #[source]
        source: InvokeError,
    },

    /// Direct member access failed
    #[error(transparent)]
    Access(#[from] InvokeError),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ReflectError {
    /// Check if this is one of the not-found variants
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ReflectError::FieldNotFound { .. }
                | ReflectError::MethodNotFound { .. }
                | ReflectError::ConstructorNotFound { .. }
                | ReflectError::FunctionNotFound { .. }
                | ReflectError::PropertyNotFound { .. }
        )
    }
}
