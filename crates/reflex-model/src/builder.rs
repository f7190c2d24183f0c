//! Type Builder
//!
//! Fluent definitions for registering types with the [`TypeRegistry`].
//!
//! ```ignore
//! let registry = TypeRegistry::new();
//! let user = registry.register(
//!     TypeBuilder::class("com.acme.User")
//!         .field(FieldDef::new("name", TypeId::STRING).modifiers(Modifiers::PRIVATE))
//!         .method(MethodDef::new("greet", |_| Ok(Value::from("hi"))).returns(TypeId::STRING)),
//! )?;
//! ```
//!
//! [`TypeRegistry`]: crate::registry::TypeRegistry

use std::sync::Arc;

use crate::error::{InvokeResult, RegistryError};
use crate::members::{
    Annotation, ConstructorInfo, ConstructorInit, FieldInfo, FunctionFlags, FunctionInfo,
    MethodInfo, NativeBody, OwningScope, ParameterInfo, PropertyAccessor, PropertyInfo,
};
use crate::modifiers::Modifiers;
use crate::ty::{TypeId, TypeInfo, TypeKind};
use crate::value::{ObjectRef, Value};

fn parameters(params: Vec<(String, TypeId)>) -> Vec<ParameterInfo> {
    params
        .into_iter()
        .enumerate()
        .map(|(index, (name, ty))| ParameterInfo { name, ty, index })
        .collect()
}

/// Definition for a field
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Value type
    pub ty: TypeId,
    /// Modifiers (`STATIC` selects static storage)
    pub modifiers: Modifiers,
    /// Annotations
    pub annotations: Vec<Annotation>,
    /// Initial value
    pub initial: Value,
}

impl FieldDef {
    /// Create a package-visible instance field
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::NONE,
            annotations: Vec::new(),
            initial: Value::Null,
        }
    }

    /// Set modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add an annotation
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Set the initial value
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = value.into();
        self
    }
}

/// Definition for a method
#[derive(Clone)]
pub struct MethodDef {
    name: String,
    params: Vec<(String, TypeId)>,
    return_type: TypeId,
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
    body: NativeBody,
}

impl MethodDef {
    /// Create a public method; instance bodies receive the receiver as `args[0]`
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> InvokeResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: TypeId::UNIT,
            modifiers: Modifiers::PUBLIC,
            annotations: Vec::new(),
            body: Arc::new(body),
        }
    }

    /// Add a parameter
    pub fn param(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.params.push((name.into(), ty));
        self
    }

    /// Set return type
    pub fn returns(mut self, ty: TypeId) -> Self {
        self.return_type = ty;
        self
    }

    /// Set modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add an annotation
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Definition for a constructor
#[derive(Clone)]
pub struct ConstructorDef {
    params: Vec<(String, TypeId)>,
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
    init: ConstructorInit,
}

impl ConstructorDef {
    /// Create a public constructor with an initializer
    pub fn new<F>(init: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> InvokeResult<()> + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            modifiers: Modifiers::PUBLIC,
            annotations: Vec::new(),
            init: Arc::new(init),
        }
    }

    /// Public no-argument constructor leaving field defaults in place
    pub fn empty() -> Self {
        Self::new(|_, _| Ok(()))
    }

    /// Add a parameter
    pub fn param(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.params.push((name.into(), ty));
        self
    }

    /// Set modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add an annotation
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Clone)]
enum PropertySource {
    Field(String),
    Custom {
        getter: NativeBody,
        setter: Option<NativeBody>,
    },
}

/// Definition for a managed property
#[derive(Clone)]
pub struct PropertyDef {
    name: String,
    ty: Option<TypeId>,
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
    extension_receiver: Option<TypeId>,
    static_scope: bool,
    is_const: bool,
    is_lateinit: bool,
    is_mutable: bool,
    source: PropertySource,
}

impl PropertyDef {
    fn with_source(name: String, ty: Option<TypeId>, source: PropertySource) -> Self {
        Self {
            name,
            ty,
            modifiers: Modifiers::PUBLIC,
            annotations: Vec::new(),
            extension_receiver: None,
            static_scope: false,
            is_const: false,
            is_lateinit: false,
            is_mutable: false,
            source,
        }
    }

    /// Property backed by a field declared on the same type
    pub fn backed(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::with_source(name.into(), None, PropertySource::Field(field.into()))
    }

    /// Property with a custom getter; receivers are passed first
    pub fn computed<F>(name: impl Into<String>, ty: TypeId, getter: F) -> Self
    where
        F: Fn(&[Value]) -> InvokeResult<Value> + Send + Sync + 'static,
    {
        Self::with_source(
            name.into(),
            Some(ty),
            PropertySource::Custom {
                getter: Arc::new(getter),
                setter: None,
            },
        )
    }

    /// Custom setter (computed properties); marks the property `var`
    pub fn setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&[Value]) -> InvokeResult<Value> + Send + Sync + 'static,
    {
        if let PropertySource::Custom { setter: slot, .. } = &mut self.source {
            *slot = Some(Arc::new(setter));
            self.is_mutable = true;
        }
        self
    }

    /// Mark as `var`
    pub fn mutable(mut self) -> Self {
        self.is_mutable = true;
        self
    }

    /// Mark as `lateinit var`
    pub fn lateinit(mut self) -> Self {
        self.is_lateinit = true;
        self.is_mutable = true;
        self
    }

    /// Mark as `const val`
    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self.is_mutable = false;
        self
    }

    /// Declare as an extension of `receiver`
    pub fn extension_of(mut self, receiver: TypeId) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    /// Place in the static/companion scope of a plain class
    pub fn static_scope(mut self) -> Self {
        self.static_scope = true;
        self
    }

    /// Set modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add an annotation
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Definition for a managed function
#[derive(Clone)]
pub struct FunctionDef {
    name: String,
    params: Vec<(String, TypeId)>,
    return_type: TypeId,
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
    extension_receiver: Option<TypeId>,
    static_scope: bool,
    flags: FunctionFlags,
    body: NativeBody,
}

impl FunctionDef {
    /// Create a public function; the body receives receivers first
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> InvokeResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: TypeId::UNIT,
            modifiers: Modifiers::PUBLIC,
            annotations: Vec::new(),
            extension_receiver: None,
            static_scope: false,
            flags: FunctionFlags::default(),
            body: Arc::new(body),
        }
    }

    /// Add a value parameter
    pub fn param(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.params.push((name.into(), ty));
        self
    }

    /// Set return type
    pub fn returns(mut self, ty: TypeId) -> Self {
        self.return_type = ty;
        self
    }

    /// Declare as an extension of `receiver`
    pub fn extension_of(mut self, receiver: TypeId) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    /// Place in the static scope of a plain class (no dispatch receiver)
    pub fn static_scope(mut self) -> Self {
        self.static_scope = true;
        self
    }

    /// Mark as `infix`
    pub fn infix(mut self) -> Self {
        self.flags.infix = true;
        self
    }

    /// Mark as `operator`
    pub fn operator(mut self) -> Self {
        self.flags.operator = true;
        self
    }

    /// Mark as `suspend`
    pub fn suspend(mut self) -> Self {
        self.flags.suspend = true;
        self
    }

    /// Mark as `inline`
    pub fn inline(mut self) -> Self {
        self.flags.inline = true;
        self
    }

    /// Set modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add an annotation
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Builder for a complete type definition
#[derive(Clone)]
pub struct TypeBuilder {
    name: String,
    kind: TypeKind,
    parent: Option<TypeId>,
    managed: bool,
    companion: Option<TypeId>,
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
    constructors: Vec<ConstructorDef>,
    properties: Vec<PropertyDef>,
    functions: Vec<FunctionDef>,
}

impl TypeBuilder {
    fn with_kind(name: String, kind: TypeKind, managed: bool) -> Self {
        Self {
            name,
            kind,
            parent: None,
            managed,
            companion: None,
            modifiers: Modifiers::PUBLIC,
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            properties: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Ordinary class
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name.into(), TypeKind::Class, false)
    }

    /// Companion object; its fields live in static storage
    pub fn companion(name: impl Into<String>) -> Self {
        Self::with_kind(name.into(), TypeKind::Companion, true)
    }

    /// File facade holding top-level declarations
    pub fn file_facade(name: impl Into<String>) -> Self {
        Self::with_kind(name.into(), TypeKind::FileFacade, true)
    }

    /// Fully-qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Superclass, if any
    pub fn parent_id(&self) -> Option<TypeId> {
        self.parent
    }

    /// Companion type, if any
    pub fn companion_id(&self) -> Option<TypeId> {
        self.companion
    }

    /// Set the superclass
    pub fn extends(mut self, parent: TypeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Mark as carrying managed-compiler metadata
    pub fn managed(mut self) -> Self {
        self.managed = true;
        self
    }

    /// Attach a companion object type
    pub fn with_companion(mut self, companion: TypeId) -> Self {
        self.companion = Some(companion);
        self
    }

    /// Set type modifiers
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add a type annotation
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Add a field
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a method
    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a constructor
    pub fn constructor(mut self, constructor: ConstructorDef) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Add a managed property
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a managed function
    pub fn function(mut self, function: FunctionDef) -> Self {
        self.functions.push(function);
        self
    }

    fn default_scope(&self) -> OwningScope {
        match self.kind {
            TypeKind::Companion => OwningScope::Companion,
            TypeKind::FileFacade => OwningScope::TopLevel,
            TypeKind::Class | TypeKind::Builtin => OwningScope::Instance,
        }
    }

    /// Build the descriptor; instance slots continue after the parent's
    pub(crate) fn build(self, id: TypeId, parent: Option<&TypeInfo>) -> Result<TypeInfo, RegistryError> {
        let default_scope = self.default_scope();
        let statics_only = matches!(self.kind, TypeKind::Companion | TypeKind::FileFacade);

        let mut info = TypeInfo::new(id, self.name, self.kind);
        info.parent = self.parent;
        info.managed = self.managed;
        info.companion = self.companion;
        info.modifiers = self.modifiers;
        info.annotations = self.annotations;
        info.instance_defaults = parent.map(|p| p.instance_defaults.clone()).unwrap_or_default();

        for def in self.fields {
            let field = if statics_only || def.modifiers.is_static() {
                FieldInfo::new_static(
                    def.name,
                    id,
                    info.name.clone(),
                    def.ty,
                    def.modifiers,
                    def.annotations,
                    def.initial,
                )
            } else {
                let slot = info.instance_defaults.len();
                info.instance_defaults.push(def.initial);
                FieldInfo::instance(
                    def.name,
                    id,
                    info.name.clone(),
                    def.ty,
                    def.modifiers,
                    def.annotations,
                    slot,
                )
            };
            info.fields.push(Arc::new(field));
        }

        for def in self.methods {
            info.methods.push(Arc::new(MethodInfo::new(
                def.name,
                id,
                info.name.clone(),
                parameters(def.params),
                def.return_type,
                def.modifiers,
                def.annotations,
                def.body,
            )));
        }

        for def in self.constructors {
            info.constructors.push(Arc::new(ConstructorInfo::new(
                id,
                info.name.clone(),
                parameters(def.params),
                def.modifiers,
                def.annotations,
                info.instance_defaults.clone(),
                def.init,
            )));
        }

        for def in self.properties {
            let scope = if def.static_scope { OwningScope::Companion } else { default_scope };
            let (ty, accessor) = match def.source {
                PropertySource::Field(field_name) => {
                    let field = info.declared_field(&field_name).cloned().ok_or_else(|| {
                        RegistryError::MissingBackingField {
                            type_name: info.name.clone(),
                            property: def.name.clone(),
                            field: field_name.clone(),
                        }
                    })?;
                    (def.ty.unwrap_or(field.ty), PropertyAccessor::Backing(field))
                }
                PropertySource::Custom { getter, setter } => (
                    def.ty.unwrap_or(TypeId::ANY),
                    PropertyAccessor::Custom { getter, setter },
                ),
            };
            info.properties.push(Arc::new(PropertyInfo::new(
                def.name,
                id,
                info.name.clone(),
                ty,
                def.modifiers,
                def.annotations,
                def.extension_receiver,
                scope,
                def.is_const,
                def.is_lateinit,
                def.is_mutable,
                accessor,
            )));
        }

        for def in self.functions {
            let scope = if def.static_scope { OwningScope::Companion } else { default_scope };
            // Companion members dispatch on the singleton; static-scope
            // members of a plain class have no dispatch receiver.
            let dispatch_receiver = match (scope, self.kind) {
                (OwningScope::Instance, _) => Some(id),
                (OwningScope::Companion, TypeKind::Companion) => Some(id),
                (OwningScope::Companion, _) | (OwningScope::TopLevel, _) => None,
            };
            info.functions.push(Arc::new(FunctionInfo::new(
                def.name,
                id,
                info.name.clone(),
                parameters(def.params),
                def.return_type,
                def.modifiers,
                def.annotations,
                dispatch_receiver,
                def.extension_receiver,
                scope,
                def.flags,
                def.body,
            )));
        }

        Ok(info)
    }
}
