//! Error types for the Reflex runtime model

/// Result type for member access and invocation
pub type InvokeResult<T> = Result<T, InvokeError>;

/// Failures raised while reading, writing or calling a member
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvokeError {
    /// Member is not public and has not been made accessible
    #[error("Illegal access to {member}")]
    IllegalAccess {
        /// Member description
        member: String,
    },

    /// Plain write to a final field
    #[error("Cannot assign final field {field}")]
    FinalField {
        /// Field description
        field: String,
    },

    /// Wrong number of arguments
    #[error("Wrong argument count for {member}: expected {expected}, got {got}")]
    ArgumentCount {
        /// Member description
        member: String,
        /// Expected argument count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Argument of the wrong shape
    #[error("Illegal argument for {member}: {reason}")]
    IllegalArgument {
        /// Member description
        member: String,
        /// What was wrong
        reason: String,
    },

    /// A receiver was required but the value is not an object
    #[error("Receiver for {member} must be an object, got {got}")]
    NotAnObject {
        /// Member description
        member: String,
        /// Debug rendering of the supplied value
        got: String,
    },

    /// Late-initialized property read before assignment
    #[error("Property {property} has not been initialized")]
    UninitializedProperty {
        /// Property description
        property: String,
    },

    /// Setter requested on a read-only property
    #[error("Property {property} is read-only")]
    ReadOnly {
        /// Property description
        property: String,
    },

    /// The member body itself failed
    #[error("{0}")]
    Thrown(String),
}

impl From<String> for InvokeError {
    fn from(s: String) -> Self {
        InvokeError::Thrown(s)
    }
}

impl From<&str> for InvokeError {
    fn from(s: &str) -> Self {
        InvokeError::Thrown(s.to_string())
    }
}

/// Errors raised while registering types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// A type with the same fully-qualified name already exists
    #[error("Type already registered: {0}")]
    DuplicateType(String),

    /// Referenced type id does not exist
    #[error("Unknown type id: {0}")]
    UnknownType(u32),

    /// Property backing field is not declared on the type
    #[error("Property {property} of {type_name} refers to missing field {field}")]
    MissingBackingField {
        /// Declaring type name
        type_name: String,
        /// Property name
        property: String,
        /// Backing field name
        field: String,
    },
}
