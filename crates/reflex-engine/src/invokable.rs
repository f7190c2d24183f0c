//! Uniform invocation over any resolved member

use std::sync::Arc;

use reflex_model::{
    FieldInfo, FunctionInfo, InvokeError, InvokeResult, MethodInfo, OwningScope, PropertyInfo, TypeId,
    TypeRegistry, Value,
};
use tracing::debug;

use crate::error::{ReflectError, ReflectResult};
use crate::member::Member;
use crate::patch::{self, FieldPatcher};

/// A resolved member behind one call interface
///
/// Argument conventions for [`Invokable::invoke`]:
///
/// | member | arguments |
/// |---|---|
/// | constructor | constructor arguments |
/// | static method | method arguments |
/// | instance method | receiver, then method arguments |
/// | instance field | `[receiver]` reads, `[receiver, value]` writes |
/// | static field | `[]` reads, `[value]` or `[_, value]` writes |
/// | property | receivers read, receivers + value writes |
/// | function | receivers, then value arguments |
///
/// [`Invokable::bind`] builds those lists from an optional receiver.
#[derive(Clone)]
pub struct Invokable {
    member: Member,
    registry: Arc<TypeRegistry>,
    patcher: Arc<dyn FieldPatcher>,
}

impl Invokable {
    /// Wrap a member
    pub fn new(member: Member, registry: Arc<TypeRegistry>, patcher: Arc<dyn FieldPatcher>) -> Self {
        Self {
            member,
            registry,
            patcher,
        }
    }

    /// The wrapped member
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// `kind Type.name`
    pub fn describe(&self) -> String {
        self.member.to_string()
    }

    /// Invoke with a full argument list
    pub fn invoke(&self, args: &[Value]) -> ReflectResult<Value> {
        let result = match &self.member {
            Member::Constructor(c) => c.new_instance(args).map(Value::Object),
            Member::Method(m) => self.invoke_method(m, args),
            Member::Field(f) => return self.access_field(f, args),
            Member::Property(p) => self.access_property(p, args),
            Member::Function(f) => self.call_function(f, args),
        };
        result.map_err(|source| self.wrap(source))
    }

    /// Invoke, collapsing every failure to `None`
    pub fn invoke_or_none(&self, args: &[Value]) -> Option<Value> {
        self.invoke(args).ok()
    }

    /// Invoke with `receiver` placed where the member expects it
    pub fn bind(&self, receiver: Option<&Value>, args: &[Value]) -> ReflectResult<Value> {
        let full = self.bound_args(receiver, args)?;
        self.invoke(&full)
    }

    fn bound_args(&self, receiver: Option<&Value>, args: &[Value]) -> ReflectResult<Vec<Value>> {
        let mut full = Vec::with_capacity(args.len() + 2);
        let push_receiver = |full: &mut Vec<Value>| -> ReflectResult<()> {
            let value = receiver.cloned().ok_or_else(|| {
                self.wrap(InvokeError::IllegalArgument {
                    member: self.member.describe(),
                    reason: "an instance receiver is required".to_string(),
                })
            })?;
            full.push(value);
            Ok(())
        };

        match &self.member {
            Member::Constructor(_) => {}
            Member::Method(m) if !m.is_static() => push_receiver(&mut full)?,
            Member::Method(_) => {}
            Member::Field(f) if !f.is_static() => push_receiver(&mut full)?,
            Member::Field(_) => {}
            Member::Property(p) => {
                for _ in 0..p.receiver_count() {
                    push_receiver(&mut full)?;
                }
            }
            Member::Function(f) => {
                if let Some(dispatch) = f.dispatch_receiver {
                    match self.registry.get(dispatch).and_then(|t| t.singleton()) {
                        Some(singleton) => full.push(Value::Object(singleton)),
                        None => push_receiver(&mut full)?,
                    }
                }
                if f.extension_receiver.is_some() {
                    push_receiver(&mut full)?;
                }
            }
        }

        full.extend_from_slice(args);
        Ok(full)
    }

    fn wrap(&self, source: InvokeError) -> ReflectError {
        ReflectError::Invocation {
            member: self.member.describe(),
            source,
        }
    }

    /// Reject object receivers that are not instances of `expected`
    fn check_receiver(&self, receiver: Option<&Value>, expected: TypeId, member: &str) -> InvokeResult<()> {
        match receiver {
            Some(Value::Object(obj)) if !self.registry.is_subclass_of(obj.class_id(), expected) => {
                Err(InvokeError::IllegalArgument {
                    member: member.to_string(),
                    reason: format!(
                        "receiver of type {} is not a {}",
                        self.registry.type_name(obj.class_id()),
                        self.registry.type_name(expected)
                    ),
                })
            }
            _ => Ok(()),
        }
    }

    fn check_extension_receiver(&self, receiver: Option<&Value>, expected: TypeId, member: &str) -> InvokeResult<()> {
        match receiver {
            Some(value) if !value.is_null() && !self.registry.is_assignable(value.type_id(), expected) => {
                Err(InvokeError::IllegalArgument {
                    member: member.to_string(),
                    reason: format!(
                        "extension receiver of type {} is not a {}",
                        self.registry.type_name(value.type_id()),
                        self.registry.type_name(expected)
                    ),
                })
            }
            _ => Ok(()),
        }
    }

    fn invoke_method(&self, method: &MethodInfo, args: &[Value]) -> InvokeResult<Value> {
        if !method.is_static() {
            self.check_receiver(args.first(), method.declaring_type, &method.describe())?;
        }
        method.invoke(args)
    }

    fn access_field(&self, field: &FieldInfo, args: &[Value]) -> ReflectResult<Value> {
        let write = |receiver: Option<&Value>, value: &Value| {
            patch::write_field(field, self.patcher.as_ref(), receiver, value.clone())
                .map(|_| Value::Unit)
                .map_err(|e| match e {
                    ReflectError::Access(source) => self.wrap(source),
                    other => other,
                })
        };

        if field.is_static() {
            return match args {
                [] => field.get(None).map_err(|e| self.wrap(e)),
                [value] | [_, value] => write(None, value),
                _ => Err(self.field_arity_error("[] to read, [value] or [receiver, value] to write", args.len())),
            };
        }

        if let Err(e) = self.check_receiver(args.first(), field.declaring_type, &field.describe()) {
            return Err(self.wrap(e));
        }
        match args {
            [receiver] => field.get(Some(receiver)).map_err(|e| self.wrap(e)),
            [receiver, value] => write(Some(receiver), value),
            _ => Err(self.field_arity_error("[receiver] to read, [receiver, value] to write", args.len())),
        }
    }

    fn access_property(&self, property: &PropertyInfo, args: &[Value]) -> InvokeResult<Value> {
        if property.scope == OwningScope::Instance {
            self.check_receiver(args.first(), property.declaring_type, &property.describe())?;
        }
        let count = property.receiver_count();
        if args.len() == count {
            property.get(args)
        } else if args.len() == count + 1 {
            property.set(args).map(|_| Value::Unit)
        } else {
            Err(InvokeError::ArgumentCount {
                member: property.describe(),
                expected: count + 1,
                got: args.len(),
            })
        }
    }

    fn call_function(&self, function: &FunctionInfo, args: &[Value]) -> InvokeResult<Value> {
        let mut receivers = args.iter();
        if let Some(dispatch) = function.dispatch_receiver {
            let is_companion = self.registry.get(dispatch).is_some_and(|t| t.is_companion());
            if !is_companion {
                self.check_receiver(receivers.next(), dispatch, &function.describe())?;
            } else {
                receivers.next();
            }
        }
        if let Some(ext) = function.extension_receiver {
            self.check_extension_receiver(receivers.next(), ext, &function.describe())?;
        }

        match function.call(args) {
            Err(InvokeError::ArgumentCount { .. }) if function.scope == OwningScope::Companion => {
                let singleton = function
                    .dispatch_receiver
                    .and_then(|d| self.registry.get(d))
                    .and_then(|t| t.singleton());
                let Some(singleton) = singleton else {
                    return function.call(args);
                };
                debug!(function = %function.describe(), "retrying with companion singleton");
                let mut with_singleton = Vec::with_capacity(args.len() + 1);
                with_singleton.push(Value::Object(singleton));
                with_singleton.extend_from_slice(args);
                function.call(&with_singleton)
            }
            other => other,
        }
    }

    fn field_arity_error(&self, accepted: &str, got: usize) -> ReflectError {
        self.wrap(InvokeError::IllegalArgument {
            member: self.member.describe(),
            reason: format!("field takes {accepted}, got {got} arguments"),
        })
    }
}

impl std::fmt::Debug for Invokable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invokable").field("member", &self.member).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::SlotPatcher;
    use reflex_model::{
        ConstructorDef, FieldDef, FunctionDef, MethodDef, Modifiers, PropertyDef, TypeBuilder,
    };

    struct World {
        registry: Arc<TypeRegistry>,
        counter: TypeId,
        companion: TypeId,
    }

    fn world() -> World {
        let registry = Arc::new(TypeRegistry::new());
        let companion = registry
            .register(
                TypeBuilder::companion("a.Counter.Companion")
                    .function(FunctionDef::new("zero", |_| Ok(Value::from(0))).returns(TypeId::INT)),
            )
            .unwrap();
        let counter = registry
            .register(
                TypeBuilder::class("a.Counter")
                    .managed()
                    .with_companion(companion)
                    .field(FieldDef::new("count", TypeId::INT).modifiers(Modifiers::PRIVATE).initial(0))
                    .field(FieldDef::new("TOTAL", TypeId::INT).modifiers(Modifiers::PUBLIC | Modifiers::STATIC).initial(0))
                    .constructor(
                        ConstructorDef::new(|obj, args| {
                            obj.set_field(0, args[0].clone())?;
                            Ok(())
                        })
                        .param("start", TypeId::INT),
                    )
                    .method(
                        MethodDef::new("add", |args| {
                            let obj = args[0].as_object().ok_or("receiver")?;
                            let current = obj.get_field(0).and_then(|v| v.as_int()).unwrap_or(0);
                            let by = args[1].as_int().ok_or("by")?;
                            obj.set_field(0, Value::from(current + by))?;
                            Ok(Value::from(current + by))
                        })
                        .param("by", TypeId::INT)
                        .returns(TypeId::INT),
                    )
                    .property(PropertyDef::backed("count", "count").mutable()),
            )
            .unwrap();
        World {
            registry,
            counter,
            companion,
        }
    }

    fn invokable(w: &World, member: Member) -> Invokable {
        Invokable::new(member, w.registry.clone(), Arc::new(SlotPatcher))
    }

    #[test]
    fn test_constructor_then_method() {
        let w = world();
        let info = w.registry.get(w.counter).unwrap();
        let ctor = invokable(&w, Member::Constructor(info.constructors[0].clone()));
        let obj = ctor.invoke(&[Value::from(5)]).unwrap();

        let add = invokable(&w, Member::Method(info.methods[0].clone()));
        assert_eq!(add.invoke(&[obj.clone(), Value::from(2)]).unwrap(), Value::from(7));
        assert_eq!(add.bind(Some(&obj), &[Value::from(1)]).unwrap(), Value::from(8));
    }

    #[test]
    fn test_field_get_set() {
        let w = world();
        let info = w.registry.get(w.counter).unwrap();
        let obj = Value::Object(info.allocate());
        let count = info.declared_field("count").unwrap().clone();
        count.make_accessible();
        let field = invokable(&w, Member::Field(count));

        assert_eq!(field.invoke(&[obj.clone(), Value::from(3)]).unwrap(), Value::Unit);
        assert_eq!(field.invoke(&[obj.clone()]).unwrap(), Value::from(3));
        assert!(field.invoke(&[]).is_err());

        let total = invokable(&w, Member::Field(info.declared_field("TOTAL").unwrap().clone()));
        total.invoke(&[Value::from(9)]).unwrap();
        assert_eq!(total.invoke(&[]).unwrap(), Value::from(9));
        total.invoke(&[obj.clone(), Value::from(10)]).unwrap();
        assert_eq!(total.bind(Some(&obj), &[]).unwrap(), Value::from(10));
    }

    #[test]
    fn test_property_getter_setter_by_arity() {
        let w = world();
        let info = w.registry.get(w.counter).unwrap();
        let obj = Value::Object(info.allocate());
        let prop = invokable(&w, Member::Property(info.properties[0].clone()));

        prop.invoke(&[obj.clone(), Value::from(4)]).unwrap();
        assert_eq!(prop.invoke(&[obj.clone()]).unwrap(), Value::from(4));
        assert!(matches!(
            prop.invoke(&[obj.clone(), Value::from(1), Value::from(2)]),
            Err(ReflectError::Invocation { .. })
        ));
    }

    #[test]
    fn test_companion_function_retries_with_singleton() {
        let w = world();
        let companion = w.registry.get(w.companion).unwrap();
        let zero = invokable(&w, Member::Function(companion.functions[0].clone()));

        assert_eq!(zero.invoke(&[]).unwrap(), Value::from(0));
        assert_eq!(zero.bind(None, &[]).unwrap(), Value::from(0));
    }

    #[test]
    fn test_wrong_receiver_type() {
        let w = world();
        let info = w.registry.get(w.counter).unwrap();
        let other = w.registry.get(w.companion).unwrap().singleton().unwrap();
        let add = invokable(&w, Member::Method(info.methods[0].clone()));

        let err = add.invoke(&[Value::Object(other), Value::from(1)]).unwrap_err();
        assert!(matches!(
            err,
            ReflectError::Invocation {
                source: InvokeError::IllegalArgument { .. },
                ..
            }
        ));
        assert!(add.invoke_or_none(&[Value::from(1)]).is_none());
    }

    #[test]
    fn test_instance_member_needs_receiver_when_bound() {
        let w = world();
        let info = w.registry.get(w.counter).unwrap();
        let add = invokable(&w, Member::Method(info.methods[0].clone()));
        assert!(add.bind(None, &[Value::from(1)]).is_err());
    }

    #[test]
    fn test_field_arity_names_accepted_shapes() {
        let w = world();
        let info = w.registry.get(w.counter).unwrap();
        let obj = Value::Object(info.allocate());
        let total = invokable(&w, Member::Field(info.declared_field("TOTAL").unwrap().clone()));

        match total.invoke(&[obj.clone(), Value::from(1), Value::from(2)]) {
            Err(ReflectError::Invocation {
                source: InvokeError::IllegalArgument { reason, .. },
                ..
            }) => assert_eq!(reason, "field takes [] to read, [value] or [receiver, value] to write, got 3 arguments"),
            other => panic!("unexpected {other:?}"),
        }

        let count = info.declared_field("count").unwrap().clone();
        count.make_accessible();
        let count = invokable(&w, Member::Field(count));
        match count.invoke(&[]) {
            Err(ReflectError::Invocation {
                source: InvokeError::IllegalArgument { reason, .. },
                ..
            }) => assert!(reason.starts_with("field takes [receiver] to read")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
