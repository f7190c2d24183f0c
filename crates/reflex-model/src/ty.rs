//! Type descriptors

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::members::{
    Annotation, ConstructorInfo, FieldInfo, FunctionInfo, MethodInfo, PropertyInfo,
};
use crate::modifiers::Modifiers;
use crate::value::{Object, ObjectRef, Value};

/// Dense type identifier (index into the type registry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// Top object type; every type is assignable to it
    pub const ANY: Self = Self(0);
    /// Type of `Value::Unit`
    pub const UNIT: Self = Self(1);
    /// Type of `Value::Bool`
    pub const BOOL: Self = Self(2);
    /// Type of `Value::Int`
    pub const INT: Self = Self(3);
    /// Type of `Value::Float`
    pub const FLOAT: Self = Self(4);
    /// Type of `Value::Str`
    pub const STRING: Self = Self(5);

    /// Number of pre-registered builtin types
    pub const BUILTIN_COUNT: usize = 6;

    /// Create from a registry index
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Registry index
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw id
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is one of the builtin types
    pub const fn is_builtin(self) -> bool {
        (self.0 as usize) < Self::BUILTIN_COUNT
    }
}

/// Names of the builtin types, in id order
pub const BUILTIN_TYPE_NAMES: [&str; TypeId::BUILTIN_COUNT] =
    ["any", "unit", "bool", "int", "float", "string"];

/// Kind of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Builtin primitive or the top type
    Builtin,
    /// Ordinary class
    Class,
    /// Companion object of another class (singleton)
    Companion,
    /// Synthetic container for file-level declarations
    FileFacade,
}

/// Runtime type descriptor
///
/// Holds both member models: the native one (fields, methods,
/// constructors) and the managed one (properties, functions).
pub struct TypeInfo {
    /// Type ID
    pub id: TypeId,
    /// Fully-qualified name
    pub name: String,
    /// Type kind
    pub kind: TypeKind,
    /// Superclass (None for root classes)
    pub parent: Option<TypeId>,
    /// Whether the type carries managed-compiler metadata
    pub managed: bool,
    /// Companion object type
    pub companion: Option<TypeId>,
    /// Type modifiers
    pub modifiers: Modifiers,
    /// Type annotations
    pub annotations: Vec<Annotation>,
    /// Initial instance field values, inherited slots first
    pub instance_defaults: Vec<Value>,
    /// Declared fields
    pub fields: Vec<Arc<FieldInfo>>,
    /// Declared methods, in declaration order
    pub methods: Vec<Arc<MethodInfo>>,
    /// Declared constructors
    pub constructors: Vec<Arc<ConstructorInfo>>,
    /// Declared managed properties
    pub properties: Vec<Arc<PropertyInfo>>,
    /// Declared managed functions
    pub functions: Vec<Arc<FunctionInfo>>,
    /// Singleton instance for companion types
    singleton: OnceCell<ObjectRef>,
}

impl TypeInfo {
    /// Create a bare type descriptor without members
    pub fn new(id: TypeId, name: String, kind: TypeKind) -> Self {
        Self {
            id,
            name,
            kind,
            parent: None,
            managed: false,
            companion: None,
            modifiers: Modifiers::PUBLIC,
            annotations: Vec::new(),
            instance_defaults: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            properties: Vec::new(),
            functions: Vec::new(),
            singleton: OnceCell::new(),
        }
    }

    /// Name without the package prefix
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Package prefix (empty for the default package)
    pub fn package(&self) -> &str {
        match self.name.rfind('.') {
            Some(pos) => &self.name[..pos],
            None => "",
        }
    }

    /// Number of instance field slots, including inherited ones
    pub fn instance_field_count(&self) -> usize {
        self.instance_defaults.len()
    }

    /// Check if this is a companion type
    pub fn is_companion(&self) -> bool {
        self.kind == TypeKind::Companion
    }

    /// Check if this is a file facade
    pub fn is_file_facade(&self) -> bool {
        self.kind == TypeKind::FileFacade
    }

    /// Allocate a fresh instance with default field values
    pub fn allocate(&self) -> ObjectRef {
        Arc::new(Object::with_fields(self.id, self.instance_defaults.clone()))
    }

    /// Singleton instance (companion types only)
    pub fn singleton(&self) -> Option<ObjectRef> {
        if !self.is_companion() {
            return None;
        }
        Some(self.singleton.get_or_init(|| self.allocate()).clone())
    }

    /// Declared field by name
    pub fn declared_field(&self, name: &str) -> Option<&Arc<FieldInfo>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared property by name
    pub fn declared_property(&self, name: &str) -> Option<&Arc<PropertyInfo>> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Declared methods with the given name, in declaration order
    pub fn declared_methods_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<MethodInfo>> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Declared functions with the given name, in declaration order
    pub fn declared_functions_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<FunctionInfo>> + 'a {
        self.functions.iter().filter(move |f| f.name == name)
    }

    /// Check for a type annotation
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }
}

impl std::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInfo")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("managed", &self.managed)
            .field("companion", &self.companion)
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .field("constructors", &self.constructors.len())
            .field("properties", &self.properties.len())
            .field("functions", &self.functions.len())
            .finish()
    }
}
