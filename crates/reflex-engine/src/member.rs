//! Resolved member references
//!
//! A [`Member`] is what the resolution engine hands back: one declaration
//! from either member model. Equality is identity; two `Member`s are equal
//! only when they point at the same descriptor.

use std::fmt;
use std::sync::Arc;

use reflex_model::{
    Annotation, ConstructorInfo, FieldInfo, FunctionInfo, MethodInfo, Modifiers, PropertyInfo, TypeId,
};

/// Member category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Native field
    Field,
    /// Native method
    Method,
    /// Constructor
    Constructor,
    /// Managed property
    Property,
    /// Managed function
    Function,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberKind::Field => "field",
            MemberKind::Method => "method",
            MemberKind::Constructor => "constructor",
            MemberKind::Property => "property",
            MemberKind::Function => "function",
        };
        f.write_str(s)
    }
}

/// A resolved member of either model
#[derive(Debug, Clone)]
pub enum Member {
    /// Native field
    Field(Arc<FieldInfo>),
    /// Native method
    Method(Arc<MethodInfo>),
    /// Constructor
    Constructor(Arc<ConstructorInfo>),
    /// Managed property (getter or setter chosen at dispatch)
    Property(Arc<PropertyInfo>),
    /// Managed function
    Function(Arc<FunctionInfo>),
}

impl Member {
    /// Member category
    pub fn kind(&self) -> MemberKind {
        match self {
            Member::Field(_) => MemberKind::Field,
            Member::Method(_) => MemberKind::Method,
            Member::Constructor(_) => MemberKind::Constructor,
            Member::Property(_) => MemberKind::Property,
            Member::Function(_) => MemberKind::Function,
        }
    }

    /// Simple name; constructors report `<init>`
    pub fn name(&self) -> &str {
        match self {
            Member::Field(f) => &f.name,
            Member::Method(m) => &m.name,
            Member::Constructor(_) => reflex_model::members::CONSTRUCTOR_NAME,
            Member::Property(p) => &p.name,
            Member::Function(f) => &f.name,
        }
    }

    /// Declaring type
    pub fn declaring_type(&self) -> TypeId {
        match self {
            Member::Field(f) => f.declaring_type,
            Member::Method(m) => m.declaring_type,
            Member::Constructor(c) => c.declaring_type,
            Member::Property(p) => p.declaring_type,
            Member::Function(f) => f.declaring_type,
        }
    }

    /// `Type.name`
    pub fn describe(&self) -> String {
        match self {
            Member::Field(f) => f.describe(),
            Member::Method(m) => m.describe(),
            Member::Constructor(c) => c.describe(),
            Member::Property(p) => p.describe(),
            Member::Function(f) => f.describe(),
        }
    }

    /// Modifiers
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Member::Field(f) => f.modifiers,
            Member::Method(m) => m.modifiers,
            Member::Constructor(c) => c.modifiers,
            Member::Property(p) => p.modifiers,
            Member::Function(f) => f.modifiers,
        }
    }

    /// Annotations
    pub fn annotations(&self) -> &[Annotation] {
        match self {
            Member::Field(f) => &f.annotations,
            Member::Method(m) => &m.annotations,
            Member::Constructor(c) => &c.annotations,
            Member::Property(p) => &p.annotations,
            Member::Function(f) => &f.annotations,
        }
    }

    /// Whether calls and accesses pass the visibility check
    pub fn is_accessible(&self) -> bool {
        match self {
            Member::Field(f) => f.is_accessible(),
            Member::Method(m) => m.is_accessible(),
            Member::Constructor(c) => c.is_accessible(),
            Member::Property(p) => p.is_accessible(),
            Member::Function(f) => f.is_accessible(),
        }
    }

    /// Grant access regardless of visibility
    pub fn make_accessible(&self) {
        match self {
            Member::Field(f) => f.make_accessible(),
            Member::Method(m) => m.make_accessible(),
            Member::Constructor(c) => c.make_accessible(),
            Member::Property(p) => p.make_accessible(),
            Member::Function(f) => f.make_accessible(),
        }
    }

    /// Field descriptor, if this is a field
    pub fn as_field(&self) -> Option<&Arc<FieldInfo>> {
        match self {
            Member::Field(f) => Some(f),
            _ => None,
        }
    }

    /// Method descriptor, if this is a method
    pub fn as_method(&self) -> Option<&Arc<MethodInfo>> {
        match self {
            Member::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Constructor descriptor, if this is a constructor
    pub fn as_constructor(&self) -> Option<&Arc<ConstructorInfo>> {
        match self {
            Member::Constructor(c) => Some(c),
            _ => None,
        }
    }

    /// Property descriptor, if this is a property
    pub fn as_property(&self) -> Option<&Arc<PropertyInfo>> {
        match self {
            Member::Property(p) => Some(p),
            _ => None,
        }
    }

    /// Function descriptor, if this is a function
    pub fn as_function(&self) -> Option<&Arc<FunctionInfo>> {
        match self {
            Member::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Unwrap a field
    ///
    /// # Panics
    ///
    /// Panics if the member is of another kind. Cache keys carry the kind,
    /// so a mismatch here means a key was built for the wrong category.
    pub fn into_field(self) -> Arc<FieldInfo> {
        match self {
            Member::Field(f) => f,
            other => panic!("expected field, found {} {}", other.kind(), other.describe()),
        }
    }

    /// Unwrap a method
    ///
    /// # Panics
    ///
    /// Panics if the member is of another kind.
    pub fn into_method(self) -> Arc<MethodInfo> {
        match self {
            Member::Method(m) => m,
            other => panic!("expected method, found {} {}", other.kind(), other.describe()),
        }
    }

    /// Unwrap a constructor
    ///
    /// # Panics
    ///
    /// Panics if the member is of another kind.
    pub fn into_constructor(self) -> Arc<ConstructorInfo> {
        match self {
            Member::Constructor(c) => c,
            other => panic!("expected constructor, found {} {}", other.kind(), other.describe()),
        }
    }

    /// Unwrap a property
    ///
    /// # Panics
    ///
    /// Panics if the member is of another kind.
    pub fn into_property(self) -> Arc<PropertyInfo> {
        match self {
            Member::Property(p) => p,
            other => panic!("expected property, found {} {}", other.kind(), other.describe()),
        }
    }

    /// Unwrap a function
    ///
    /// # Panics
    ///
    /// Panics if the member is of another kind.
    pub fn into_function(self) -> Arc<FunctionInfo> {
        match self {
            Member::Function(f) => f,
            other => panic!("expected function, found {} {}", other.kind(), other.describe()),
        }
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Member::Field(a), Member::Field(b)) => Arc::ptr_eq(a, b),
            (Member::Method(a), Member::Method(b)) => Arc::ptr_eq(a, b),
            (Member::Constructor(a), Member::Constructor(b)) => Arc::ptr_eq(a, b),
            (Member::Property(a), Member::Property(b)) => Arc::ptr_eq(a, b),
            (Member::Function(a), Member::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Member {}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.describe())
    }
}

impl From<Arc<FieldInfo>> for Member {
    fn from(f: Arc<FieldInfo>) -> Self {
        Member::Field(f)
    }
}

impl From<Arc<MethodInfo>> for Member {
    fn from(m: Arc<MethodInfo>) -> Self {
        Member::Method(m)
    }
}

impl From<Arc<ConstructorInfo>> for Member {
    fn from(c: Arc<ConstructorInfo>) -> Self {
        Member::Constructor(c)
    }
}

impl From<Arc<PropertyInfo>> for Member {
    fn from(p: Arc<PropertyInfo>) -> Self {
        Member::Property(p)
    }
}

impl From<Arc<FunctionInfo>> for Member {
    fn from(f: Arc<FunctionInfo>) -> Self {
        Member::Function(f)
    }
}
