//! Member descriptors for both member models
//!
//! Native model: [`FieldInfo`], [`MethodInfo`], [`ConstructorInfo`].
//! Managed model: [`PropertyInfo`], [`FunctionInfo`].
//!
//! Descriptors are immutable once registered, with one exception: the
//! accessible flag. It only ever goes from `false` to `true`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{InvokeError, InvokeResult};
use crate::modifiers::Modifiers;
use crate::ty::TypeId;
use crate::value::{Object, ObjectRef, Value};

/// Symbolic name under which constructors are requested
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Callable body; receives the full argument list, receivers first
pub type NativeBody = Arc<dyn Fn(&[Value]) -> InvokeResult<Value> + Send + Sync>;

/// Constructor initializer; runs against a freshly allocated object
pub type ConstructorInit = Arc<dyn Fn(&ObjectRef, &[Value]) -> InvokeResult<()> + Send + Sync>;

/// Annotation attached to a type or member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Annotation type name
    pub name: String,
    /// Annotation arguments
    pub args: Vec<String>,
}

impl Annotation {
    /// Create an annotation without arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Parameter information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: TypeId,
    /// Position in the value parameter list
    pub index: usize,
}

/// Where a managed member lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwningScope {
    /// Plain member of the declaring type
    Instance,
    /// Member of the companion object or static scope
    Companion,
    /// File/module level declaration
    TopLevel,
}

/// Flags specific to managed functions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionFlags {
    /// `infix`
    pub infix: bool,
    /// `operator`
    pub operator: bool,
    /// `suspend`
    pub suspend: bool,
    /// `inline`
    pub inline: bool,
}

/// Monotonic accessibility override
#[derive(Debug, Default)]
struct AccessFlag(AtomicBool);

impl AccessFlag {
    fn grant(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn granted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

fn check_access(
    modifiers: Modifiers,
    flag: &AccessFlag,
    member: impl FnOnce() -> String,
) -> InvokeResult<()> {
    if modifiers.is_public() || flag.granted() {
        Ok(())
    } else {
        Err(InvokeError::IllegalAccess { member: member() })
    }
}

fn check_arity(expected: usize, args: &[Value], member: impl FnOnce() -> String) -> InvokeResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(InvokeError::ArgumentCount {
            member: member(),
            expected,
            got: args.len(),
        })
    }
}

fn receiver_object<'a>(
    receiver: Option<&'a Value>,
    member: impl FnOnce() -> String,
) -> InvokeResult<&'a ObjectRef> {
    match receiver {
        Some(Value::Object(obj)) => Ok(obj),
        other => Err(InvokeError::NotAnObject {
            member: member(),
            got: format!("{:?}", other.cloned().unwrap_or_default()),
        }),
    }
}

fn param_types(params: &[ParameterInfo]) -> Vec<TypeId> {
    params.iter().map(|p| p.ty).collect()
}

// ============================================================================
// Fields
// ============================================================================

enum FieldStorage {
    /// Slot index into the receiver's field vector
    Instance(usize),
    /// Static value cell
    Static(RwLock<Value>),
}

/// Field information (native model)
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Declaring type
    pub declaring_type: TypeId,
    /// Declaring type's fully-qualified name
    pub declaring_name: String,
    /// Value type
    pub ty: TypeId,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Annotations
    pub annotations: Vec<Annotation>,
    storage: FieldStorage,
    access: AccessFlag,
}

impl FieldInfo {
    /// Create an instance field stored at `slot`
    pub fn instance(
        name: String,
        declaring_type: TypeId,
        declaring_name: String,
        ty: TypeId,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        slot: usize,
    ) -> Self {
        Self {
            name,
            declaring_type,
            declaring_name,
            ty,
            modifiers: modifiers.difference(Modifiers::STATIC),
            annotations,
            storage: FieldStorage::Instance(slot),
            access: AccessFlag::default(),
        }
    }

    /// Create a static field holding `initial`
    pub fn new_static(
        name: String,
        declaring_type: TypeId,
        declaring_name: String,
        ty: TypeId,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        initial: Value,
    ) -> Self {
        Self {
            name,
            declaring_type,
            declaring_name,
            ty,
            modifiers: modifiers | Modifiers::STATIC,
            annotations,
            storage: FieldStorage::Static(RwLock::new(initial)),
            access: AccessFlag::default(),
        }
    }

    /// `Type.name`
    pub fn describe(&self) -> String {
        format!("{}.{}", self.declaring_name, self.name)
    }

    /// Check if the field is static
    pub fn is_static(&self) -> bool {
        matches!(self.storage, FieldStorage::Static(_))
    }

    /// Check if the field is final
    pub fn is_final(&self) -> bool {
        self.modifiers.is_final()
    }

    /// Instance slot (None for static fields)
    pub fn slot(&self) -> Option<usize> {
        match self.storage {
            FieldStorage::Instance(slot) => Some(slot),
            FieldStorage::Static(_) => None,
        }
    }

    /// Static value cell (None for instance fields)
    pub fn static_cell(&self) -> Option<&RwLock<Value>> {
        match &self.storage {
            FieldStorage::Static(cell) => Some(cell),
            FieldStorage::Instance(_) => None,
        }
    }

    /// Whether reads and writes pass the visibility check
    pub fn is_accessible(&self) -> bool {
        self.modifiers.is_public() || self.access.granted()
    }

    /// Grant access regardless of visibility; never revoked
    pub fn make_accessible(&self) {
        self.access.grant();
    }

    /// Write the field, enforcing visibility but not finality
    ///
    /// Only instance fields can be written this way; static finals still
    /// report [`InvokeError::FinalField`]. Nothing is changed on the
    /// descriptor, so concurrent [`FieldInfo::set`] calls keep refusing.
    pub fn set_ignoring_final(&self, receiver: Option<&Value>, value: Value) -> InvokeResult<()> {
        check_access(self.modifiers, &self.access, || self.describe())?;
        if self.is_final() && self.is_static() {
            return Err(InvokeError::FinalField {
                field: self.describe(),
            });
        }
        self.write_unchecked(receiver, value)
    }

    /// Read the field, enforcing visibility
    pub fn get(&self, receiver: Option<&Value>) -> InvokeResult<Value> {
        check_access(self.modifiers, &self.access, || self.describe())?;
        self.read_unchecked(receiver)
    }

    /// Write the field, enforcing visibility and finality
    pub fn set(&self, receiver: Option<&Value>, value: Value) -> InvokeResult<()> {
        check_access(self.modifiers, &self.access, || self.describe())?;
        if self.is_final() {
            return Err(InvokeError::FinalField {
                field: self.describe(),
            });
        }
        self.write_unchecked(receiver, value)
    }

    /// Read the storage directly, skipping visibility checks
    pub fn read_unchecked(&self, receiver: Option<&Value>) -> InvokeResult<Value> {
        match &self.storage {
            FieldStorage::Static(cell) => Ok(cell.read().clone()),
            FieldStorage::Instance(slot) => {
                let obj = receiver_object(receiver, || self.describe())?;
                obj.get_field(*slot).ok_or_else(|| self.missing_slot(obj))
            }
        }
    }

    /// Write the storage directly, skipping visibility and final checks
    pub fn write_unchecked(&self, receiver: Option<&Value>, value: Value) -> InvokeResult<()> {
        match &self.storage {
            FieldStorage::Static(cell) => {
                *cell.write() = value;
                Ok(())
            }
            FieldStorage::Instance(slot) => {
                let obj = receiver_object(receiver, || self.describe())?;
                obj.set_field(*slot, value).map_err(|_| self.missing_slot(obj))
            }
        }
    }

    fn missing_slot(&self, obj: &Object) -> InvokeError {
        InvokeError::IllegalArgument {
            member: self.describe(),
            reason: format!(
                "receiver of type #{} has no field slot for this field",
                obj.class_id().index()
            ),
        }
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("declaring_name", &self.declaring_name)
            .field("ty", &self.ty)
            .field("modifiers", &self.modifiers)
            .field("slot", &self.slot())
            .finish()
    }
}

// ============================================================================
// Methods and constructors
// ============================================================================

/// Method information (native model)
pub struct MethodInfo {
    /// Method name
    pub name: String,
    /// Declaring type
    pub declaring_type: TypeId,
    /// Declaring type's fully-qualified name
    pub declaring_name: String,
    /// Parameters (receiver excluded)
    pub parameters: Vec<ParameterInfo>,
    /// Return type
    pub return_type: TypeId,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Annotations
    pub annotations: Vec<Annotation>,
    body: NativeBody,
    access: AccessFlag,
}

impl MethodInfo {
    /// Create a method descriptor
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        declaring_type: TypeId,
        declaring_name: String,
        parameters: Vec<ParameterInfo>,
        return_type: TypeId,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        body: NativeBody,
    ) -> Self {
        Self {
            name,
            declaring_type,
            declaring_name,
            parameters,
            return_type,
            modifiers,
            annotations,
            body,
            access: AccessFlag::default(),
        }
    }

    /// `Type.name`
    pub fn describe(&self) -> String {
        format!("{}.{}", self.declaring_name, self.name)
    }

    /// Parameter types in order
    pub fn param_types(&self) -> Vec<TypeId> {
        param_types(&self.parameters)
    }

    /// Check if the method is static
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static()
    }

    /// Number of arguments `invoke` expects (receiver included)
    pub fn arity(&self) -> usize {
        self.parameters.len() + usize::from(!self.is_static())
    }

    /// Whether calls pass the visibility check
    pub fn is_accessible(&self) -> bool {
        self.modifiers.is_public() || self.access.granted()
    }

    /// Grant access regardless of visibility; never revoked
    pub fn make_accessible(&self) {
        self.access.grant();
    }

    /// Call the method; instance methods take the receiver as `args[0]`
    pub fn invoke(&self, args: &[Value]) -> InvokeResult<Value> {
        check_access(self.modifiers, &self.access, || self.describe())?;
        check_arity(self.arity(), args, || self.describe())?;
        if !self.is_static() {
            receiver_object(args.first(), || self.describe())?;
        }
        (self.body)(args)
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("declaring_name", &self.declaring_name)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}

/// Constructor information
pub struct ConstructorInfo {
    /// Constructed type
    pub declaring_type: TypeId,
    /// Constructed type's fully-qualified name
    pub declaring_name: String,
    /// Parameters
    pub parameters: Vec<ParameterInfo>,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Annotations
    pub annotations: Vec<Annotation>,
    /// Field values of a fresh instance before the initializer runs
    template: Vec<Value>,
    init: ConstructorInit,
    access: AccessFlag,
}

impl ConstructorInfo {
    /// Create a constructor descriptor
    pub fn new(
        declaring_type: TypeId,
        declaring_name: String,
        parameters: Vec<ParameterInfo>,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        template: Vec<Value>,
        init: ConstructorInit,
    ) -> Self {
        Self {
            declaring_type,
            declaring_name,
            parameters,
            modifiers,
            annotations,
            template,
            init,
            access: AccessFlag::default(),
        }
    }

    /// `Type.<init>`
    pub fn describe(&self) -> String {
        format!("{}.{}", self.declaring_name, CONSTRUCTOR_NAME)
    }

    /// Parameter types in order
    pub fn param_types(&self) -> Vec<TypeId> {
        param_types(&self.parameters)
    }

    /// Whether calls pass the visibility check
    pub fn is_accessible(&self) -> bool {
        self.modifiers.is_public() || self.access.granted()
    }

    /// Grant access regardless of visibility; never revoked
    pub fn make_accessible(&self) {
        self.access.grant();
    }

    /// Allocate a new instance and run the initializer
    pub fn new_instance(&self, args: &[Value]) -> InvokeResult<ObjectRef> {
        check_access(self.modifiers, &self.access, || self.describe())?;
        check_arity(self.parameters.len(), args, || self.describe())?;
        let obj = Arc::new(Object::with_fields(self.declaring_type, self.template.clone()));
        (self.init)(&obj, args)?;
        Ok(obj)
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("declaring_name", &self.declaring_name)
            .field("parameters", &self.parameters)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}

// ============================================================================
// Managed properties and functions
// ============================================================================

/// How a property reads and writes its value
#[derive(Clone)]
pub enum PropertyAccessor {
    /// Backed by a declared field
    Backing(Arc<FieldInfo>),
    /// Custom accessor bodies; receivers are passed first
    Custom {
        /// Getter body
        getter: NativeBody,
        /// Setter body (None for read-only properties)
        setter: Option<NativeBody>,
    },
}

/// Property information (managed model)
pub struct PropertyInfo {
    /// Property name
    pub name: String,
    /// Declaring type (facade type for top-level properties)
    pub declaring_type: TypeId,
    /// Declaring type's fully-qualified name
    pub declaring_name: String,
    /// Value type
    pub ty: TypeId,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Annotations
    pub annotations: Vec<Annotation>,
    /// Extension receiver type
    pub extension_receiver: Option<TypeId>,
    /// Owning scope
    pub scope: OwningScope,
    /// `const val`
    pub is_const: bool,
    /// `lateinit var`
    pub is_lateinit: bool,
    /// `var` (as opposed to `val`)
    pub is_mutable: bool,
    /// Accessor implementation
    pub accessor: PropertyAccessor,
    access: AccessFlag,
}

impl PropertyInfo {
    /// Create a property descriptor
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        declaring_type: TypeId,
        declaring_name: String,
        ty: TypeId,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        extension_receiver: Option<TypeId>,
        scope: OwningScope,
        is_const: bool,
        is_lateinit: bool,
        is_mutable: bool,
        accessor: PropertyAccessor,
    ) -> Self {
        Self {
            name,
            declaring_type,
            declaring_name,
            ty,
            modifiers,
            annotations,
            extension_receiver,
            scope,
            is_const,
            is_lateinit,
            is_mutable,
            accessor,
            access: AccessFlag::default(),
        }
    }

    /// `Type.name`
    pub fn describe(&self) -> String {
        format!("{}.{}", self.declaring_name, self.name)
    }

    /// Number of receivers the getter takes
    pub fn receiver_count(&self) -> usize {
        usize::from(self.scope == OwningScope::Instance) + usize::from(self.extension_receiver.is_some())
    }

    /// Whether accessors pass the visibility check
    pub fn is_accessible(&self) -> bool {
        self.modifiers.is_public() || self.access.granted()
    }

    /// Grant access regardless of visibility; never revoked
    pub fn make_accessible(&self) {
        self.access.grant();
        if let PropertyAccessor::Backing(field) = &self.accessor {
            field.make_accessible();
        }
    }

    /// Call the getter; `receivers` holds dispatch then extension receiver
    pub fn get(&self, receivers: &[Value]) -> InvokeResult<Value> {
        check_access(self.modifiers, &self.access, || self.describe())?;
        check_arity(self.receiver_count(), receivers, || self.describe())?;
        let value = match &self.accessor {
            PropertyAccessor::Backing(field) => {
                let receiver = if field.is_static() { None } else { receivers.first() };
                field.read_unchecked(receiver)?
            }
            PropertyAccessor::Custom { getter, .. } => getter(receivers)?,
        };
        if self.is_lateinit && value.is_null() {
            return Err(InvokeError::UninitializedProperty {
                property: self.describe(),
            });
        }
        Ok(value)
    }

    /// Call the setter; `args` holds the receivers followed by the value
    pub fn set(&self, args: &[Value]) -> InvokeResult<()> {
        check_access(self.modifiers, &self.access, || self.describe())?;
        if !self.is_mutable || self.is_const {
            return Err(InvokeError::ReadOnly {
                property: self.describe(),
            });
        }
        check_arity(self.receiver_count() + 1, args, || self.describe())?;
        let Some((value, receivers)) = args.split_last() else {
            return Err(InvokeError::ArgumentCount {
                member: self.describe(),
                expected: 1,
                got: 0,
            });
        };
        match &self.accessor {
            PropertyAccessor::Backing(field) => {
                let receiver = if field.is_static() { None } else { receivers.first() };
                field.write_unchecked(receiver, value.clone())
            }
            PropertyAccessor::Custom {
                setter: Some(setter),
                ..
            } => setter(args).map(|_| ()),
            PropertyAccessor::Custom { setter: None, .. } => Err(InvokeError::ReadOnly {
                property: self.describe(),
            }),
        }
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("declaring_name", &self.declaring_name)
            .field("ty", &self.ty)
            .field("scope", &self.scope)
            .field("extension_receiver", &self.extension_receiver)
            .field("is_mutable", &self.is_mutable)
            .finish()
    }
}

/// Function information (managed model)
pub struct FunctionInfo {
    /// Function name
    pub name: String,
    /// Declaring type (facade type for top-level functions)
    pub declaring_type: TypeId,
    /// Declaring type's fully-qualified name
    pub declaring_name: String,
    /// Value parameters (receivers excluded)
    pub parameters: Vec<ParameterInfo>,
    /// Return type
    pub return_type: TypeId,
    /// Modifiers
    pub modifiers: Modifiers,
    /// Annotations
    pub annotations: Vec<Annotation>,
    /// Dispatch receiver type (declaring class or companion)
    pub dispatch_receiver: Option<TypeId>,
    /// Extension receiver type
    pub extension_receiver: Option<TypeId>,
    /// Owning scope
    pub scope: OwningScope,
    /// Managed-only flags
    pub flags: FunctionFlags,
    body: NativeBody,
    access: AccessFlag,
}

impl FunctionInfo {
    /// Create a function descriptor
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        declaring_type: TypeId,
        declaring_name: String,
        parameters: Vec<ParameterInfo>,
        return_type: TypeId,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        dispatch_receiver: Option<TypeId>,
        extension_receiver: Option<TypeId>,
        scope: OwningScope,
        flags: FunctionFlags,
        body: NativeBody,
    ) -> Self {
        Self {
            name,
            declaring_type,
            declaring_name,
            parameters,
            return_type,
            modifiers,
            annotations,
            dispatch_receiver,
            extension_receiver,
            scope,
            flags,
            body,
            access: AccessFlag::default(),
        }
    }

    /// `Type.name`
    pub fn describe(&self) -> String {
        format!("{}.{}", self.declaring_name, self.name)
    }

    /// Value parameter types in order
    pub fn value_param_types(&self) -> Vec<TypeId> {
        param_types(&self.parameters)
    }

    /// Receiver types, dispatch receiver first
    pub fn receiver_types(&self) -> Vec<TypeId> {
        self.dispatch_receiver
            .into_iter()
            .chain(self.extension_receiver)
            .collect()
    }

    /// Number of arguments `call` expects (receivers included)
    pub fn arity(&self) -> usize {
        self.parameters.len()
            + usize::from(self.dispatch_receiver.is_some())
            + usize::from(self.extension_receiver.is_some())
    }

    /// Whether calls pass the visibility check
    pub fn is_accessible(&self) -> bool {
        self.modifiers.is_public() || self.access.granted()
    }

    /// Grant access regardless of visibility; never revoked
    pub fn make_accessible(&self) {
        self.access.grant();
    }

    /// Call with the full argument list (receivers first)
    pub fn call(&self, args: &[Value]) -> InvokeResult<Value> {
        check_access(self.modifiers, &self.access, || self.describe())?;
        check_arity(self.arity(), args, || self.describe())?;
        (self.body)(args)
    }
}

impl fmt::Debug for FunctionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionInfo")
            .field("name", &self.name)
            .field("declaring_name", &self.declaring_name)
            .field("parameters", &self.parameters)
            .field("dispatch_receiver", &self.dispatch_receiver)
            .field("extension_receiver", &self.extension_receiver)
            .field("scope", &self.scope)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(i: u32) -> TypeId {
        TypeId::from_index(i)
    }

    fn private_field(slot: usize) -> FieldInfo {
        FieldInfo::instance(
            "secret".to_string(),
            t(6),
            "a.T".to_string(),
            TypeId::STRING,
            Modifiers::PRIVATE,
            Vec::new(),
            slot,
        )
    }

    #[test]
    fn test_private_field_requires_access() {
        let field = private_field(0);
        let obj = Value::Object(Arc::new(Object::new(t(6), 1)));

        assert!(matches!(field.get(Some(&obj)), Err(InvokeError::IllegalAccess { .. })));
        field.make_accessible();
        field.set(Some(&obj), Value::from("x")).unwrap();
        assert_eq!(field.get(Some(&obj)).unwrap(), Value::from("x"));
    }

    #[test]
    fn test_final_field_set_ignoring_final() {
        let field = FieldInfo::instance(
            "id".to_string(),
            t(6),
            "a.T".to_string(),
            TypeId::INT,
            Modifiers::PUBLIC | Modifiers::FINAL,
            Vec::new(),
            0,
        );
        let obj = Value::Object(Arc::new(Object::new(t(6), 1)));

        assert!(matches!(field.set(Some(&obj), Value::from(1)), Err(InvokeError::FinalField { .. })));
        field.set_ignoring_final(Some(&obj), Value::from(1)).unwrap();
        assert!(field.set(Some(&obj), Value::from(2)).is_err());
        assert_eq!(field.get(Some(&obj)).unwrap(), Value::from(1));
    }

    #[test]
    fn test_static_final_refuses_set_ignoring_final() {
        let field = FieldInfo::new_static(
            "LIMIT".to_string(),
            t(6),
            "a.T".to_string(),
            TypeId::INT,
            Modifiers::PUBLIC | Modifiers::FINAL,
            Vec::new(),
            Value::from(10),
        );
        assert!(field.is_static());
        assert!(matches!(
            field.set_ignoring_final(None, Value::from(12)),
            Err(InvokeError::FinalField { .. })
        ));
        assert_eq!(field.get(None).unwrap(), Value::from(10));
        field.write_unchecked(None, Value::from(11)).unwrap();
        assert_eq!(field.get(None).unwrap(), Value::from(11));
    }

    #[test]
    fn test_instance_field_needs_object_receiver() {
        let field = private_field(0);
        field.make_accessible();
        assert!(matches!(field.get(None), Err(InvokeError::NotAnObject { .. })));
        assert!(matches!(
            field.get(Some(&Value::from(3))),
            Err(InvokeError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_method_arity_and_receiver() {
        let body: NativeBody = Arc::new(|args: &[Value]| Ok(Value::from(args.len() as i64)));
        let method = MethodInfo::new(
            "count".to_string(),
            t(6),
            "a.T".to_string(),
            vec![ParameterInfo {
                name: "x".to_string(),
                ty: TypeId::INT,
                index: 0,
            }],
            TypeId::INT,
            Modifiers::PUBLIC,
            Vec::new(),
            body,
        );
        let obj = Value::Object(Arc::new(Object::new(t(6), 0)));

        assert_eq!(method.arity(), 2);
        assert_eq!(method.invoke(&[obj, Value::from(1)]).unwrap(), Value::from(2));
        assert!(matches!(method.invoke(&[Value::from(1)]), Err(InvokeError::ArgumentCount { .. })));
        assert!(matches!(
            method.invoke(&[Value::from(1), Value::from(1)]),
            Err(InvokeError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_readonly_property() {
        let getter: NativeBody = Arc::new(|_: &[Value]| Ok(Value::from(7)));
        let prop = PropertyInfo::new(
            "seven".to_string(),
            t(6),
            "a.T".to_string(),
            TypeId::INT,
            Modifiers::PUBLIC,
            Vec::new(),
            None,
            OwningScope::Companion,
            false,
            false,
            false,
            PropertyAccessor::Custom { getter, setter: None },
        );
        assert_eq!(prop.receiver_count(), 0);
        assert_eq!(prop.get(&[]).unwrap(), Value::from(7));
        assert!(matches!(prop.set(&[Value::from(1)]), Err(InvokeError::ReadOnly { .. })));
    }

    #[test]
    fn test_function_receivers() {
        let body: NativeBody = Arc::new(|args: &[Value]| Ok(args[1].clone()));
        let func = FunctionInfo::new(
            "ext".to_string(),
            t(7),
            "a.UtilsKt".to_string(),
            Vec::new(),
            TypeId::ANY,
            Modifiers::PUBLIC,
            Vec::new(),
            Some(t(6)),
            Some(TypeId::STRING),
            OwningScope::Instance,
            FunctionFlags::default(),
            body,
        );
        assert_eq!(func.receiver_types(), vec![t(6), TypeId::STRING]);
        assert_eq!(func.arity(), 2);
        assert_eq!(func.call(&[Value::Null, Value::from("s")]).unwrap(), Value::from("s"));
    }
}
