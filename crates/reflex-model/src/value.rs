//! Dynamic values and heap objects

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::ty::TypeId;

/// Shared handle to a heap object
pub type ObjectRef = Arc<Object>;

/// Object instance (heap-allocated)
///
/// Field slots are laid out parent-first, so a subclass instance can be
/// read through any field declared along its superclass chain.
pub struct Object {
    /// Class ID (index into the type registry)
    class_id: TypeId,
    /// Field values
    fields: RwLock<Vec<Value>>,
}

impl Object {
    /// Create a new object with null fields
    pub fn new(class_id: TypeId, field_count: usize) -> Self {
        Self {
            class_id,
            fields: RwLock::new(vec![Value::Null; field_count]),
        }
    }

    /// Create a new object with the given initial field values
    pub fn with_fields(class_id: TypeId, fields: Vec<Value>) -> Self {
        Self {
            class_id,
            fields: RwLock::new(fields),
        }
    }

    /// Class of this object
    pub fn class_id(&self) -> TypeId {
        self.class_id
    }

    /// Get a field value by index
    pub fn get_field(&self, index: usize) -> Option<Value> {
        self.fields.read().get(index).cloned()
    }

    /// Set a field value by index
    pub fn set_field(&self, index: usize, value: Value) -> Result<(), String> {
        let mut fields = self.fields.write();
        let count = fields.len();
        match fields.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(format!(
                "Field index {} out of bounds (object has {} fields)",
                index, count
            )),
        }
    }

    /// Get number of fields
    pub fn field_count(&self) -> usize {
        self.fields.read().len()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class_id", &self.class_id)
            .field("fields", &*self.fields.read())
            .finish()
    }
}

/// Runtime value
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Result of a call that returns nothing
    Unit,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Immutable string
    Str(Arc<str>),
    /// Heap object
    Object(ObjectRef),
}

impl Value {
    /// Create a null value
    pub fn null() -> Self {
        Value::Null
    }

    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Runtime type of this value
    ///
    /// `Null` reports the top type `any` so it never rules out a candidate.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Null => TypeId::ANY,
            Value::Unit => TypeId::UNIT,
            Value::Bool(_) => TypeId::BOOL,
            Value::Int(_) => TypeId::INT,
            Value::Float(_) => TypeId::FLOAT,
            Value::Str(_) => TypeId::STRING,
            Value::Object(o) => o.class_id(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            // Objects compare by identity
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Unit => f.write_str("unit"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Object(o) => write!(f, "<object of type #{}>", o.class_id().index()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => write!(f, "{:?}", other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}
