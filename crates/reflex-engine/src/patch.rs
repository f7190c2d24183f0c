//! Final-field write fallback
//!
//! Writing a `final` instance field retries without the final check; the
//! descriptor itself is never changed. Static finals refuse that write, so
//! the last resort is a [`FieldPatcher`] that writes the storage directly.

use reflex_model::{FieldInfo, InvokeError, ObjectRef, Value};
use tracing::warn;

use crate::error::{ReflectError, ReflectResult};

/// Raw storage writer used when a final field refuses a normal write
pub trait FieldPatcher: Send + Sync {
    /// Storage offset of an instance field
    fn object_field_offset(&self, field: &FieldInfo) -> Option<usize>;

    /// Storage offset of a static field within its static cell
    fn static_field_offset(&self, field: &FieldInfo) -> Option<usize>;

    /// Write an instance field slot
    fn put_object_volatile(&self, target: &ObjectRef, offset: usize, value: Value) -> Result<(), String>;

    /// Write a static field
    fn put_static_volatile(&self, field: &FieldInfo, offset: usize, value: Value) -> Result<(), String>;
}

/// Writes object slots and static cells directly
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotPatcher;

impl FieldPatcher for SlotPatcher {
    fn object_field_offset(&self, field: &FieldInfo) -> Option<usize> {
        field.slot()
    }

    fn static_field_offset(&self, field: &FieldInfo) -> Option<usize> {
        field.static_cell().map(|_| 0)
    }

    fn put_object_volatile(&self, target: &ObjectRef, offset: usize, value: Value) -> Result<(), String> {
        target.set_field(offset, value)
    }

    fn put_static_volatile(&self, field: &FieldInfo, offset: usize, value: Value) -> Result<(), String> {
        if offset != 0 {
            return Err(format!("invalid static offset {} for {}", offset, field.describe()));
        }
        let cell = field
            .static_cell()
            .ok_or_else(|| format!("{} is not static", field.describe()))?;
        *cell.write() = value;
        Ok(())
    }
}

/// Refuses every patch; final statics stay unwritable
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyPatcher;

impl FieldPatcher for DenyPatcher {
    fn object_field_offset(&self, _field: &FieldInfo) -> Option<usize> {
        None
    }

    fn static_field_offset(&self, _field: &FieldInfo) -> Option<usize> {
        None
    }

    fn put_object_volatile(&self, _target: &ObjectRef, _offset: usize, _value: Value) -> Result<(), String> {
        Err("field patching is disabled".to_string())
    }

    fn put_static_volatile(&self, _field: &FieldInfo, _offset: usize, _value: Value) -> Result<(), String> {
        Err("field patching is disabled".to_string())
    }
}

/// Write a field, falling back for `final` fields
///
/// Non-final failures (access, receiver shape) are returned as
/// [`ReflectError::Access`]. A final field that no fallback can write yields
/// [`ReflectError::FinalFieldWrite`].
pub fn write_field(
    field: &FieldInfo,
    patcher: &dyn FieldPatcher,
    receiver: Option<&Value>,
    value: Value,
) -> ReflectResult<()> {
    match field.set(receiver, value.clone()) {
        Ok(()) => return Ok(()),
        Err(InvokeError::FinalField { .. }) => {}
        Err(e) => return Err(e.into()),
    }

    match field.set_ignoring_final(receiver, value.clone()) {
        Ok(()) => return Ok(()),
        Err(InvokeError::FinalField { .. }) => {}
        Err(e) => return Err(e.into()),
    }

    warn!(field = %field.describe(), "final field refused write; patching storage");
    patch(field, patcher, receiver, value).map_err(|reason| ReflectError::FinalFieldWrite {
        field: field.describe(),
        reason,
    })
}

fn patch(field: &FieldInfo, patcher: &dyn FieldPatcher, receiver: Option<&Value>, value: Value) -> Result<(), String> {
    if field.is_static() {
        let offset = patcher
            .static_field_offset(field)
            .ok_or_else(|| "no static field offset".to_string())?;
        patcher.put_static_volatile(field, offset, value)
    } else {
        let target = receiver
            .and_then(Value::as_object)
            .ok_or_else(|| "receiver is not an object".to_string())?;
        let offset = patcher
            .object_field_offset(field)
            .ok_or_else(|| "no object field offset".to_string())?;
        patcher.put_object_volatile(target, offset, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use reflex_model::{FieldDef, Modifiers, TypeBuilder, TypeId, TypeRegistry};

    fn setup() -> (TypeRegistry, TypeId) {
        let registry = TypeRegistry::new();
        let id = registry
            .register(
                TypeBuilder::class("a.Consts")
                    .field(
                        FieldDef::new("MAX", TypeId::INT)
                            .modifiers(Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL)
                            .initial(10),
                    )
                    .field(FieldDef::new("id", TypeId::INT).modifiers(Modifiers::PRIVATE | Modifiers::FINAL).initial(1))
                    .field(FieldDef::new("name", TypeId::STRING).modifiers(Modifiers::PRIVATE)),
            )
            .unwrap();
        (registry, id)
    }

    #[test]
    fn test_instance_final_write() {
        let (registry, id) = setup();
        let info = registry.get(id).unwrap();
        let field = info.declared_field("id").unwrap();
        field.make_accessible();
        let obj = Value::Object(info.allocate());

        write_field(field, &DenyPatcher, Some(&obj), Value::from(2)).unwrap();
        assert_eq!(field.get(Some(&obj)).unwrap(), Value::from(2));
        // Plain writes are still refused
        assert!(matches!(field.set(Some(&obj), Value::from(3)), Err(InvokeError::FinalField { .. })));
    }

    #[test]
    fn test_static_final_needs_patcher() {
        let (registry, id) = setup();
        let info = registry.get(id).unwrap();
        let field = info.declared_field("MAX").unwrap();
        field.make_accessible();

        let err = write_field(field, &DenyPatcher, None, Value::from(20)).unwrap_err();
        assert!(matches!(err, ReflectError::FinalFieldWrite { .. }));
        assert_eq!(field.get(None).unwrap(), Value::from(10));

        write_field(field, &SlotPatcher, None, Value::from(20)).unwrap();
        assert_eq!(field.get(None).unwrap(), Value::from(20));
    }

    #[test]
    fn test_access_errors_pass_through() {
        let (registry, id) = setup();
        let info = registry.get(id).unwrap();
        let field = info.declared_field("name").unwrap();
        let obj = Value::Object(info.allocate());

        let err = write_field(field, &SlotPatcher, Some(&obj), Value::from("x")).unwrap_err();
        assert!(matches!(err, ReflectError::Access(InvokeError::IllegalAccess { .. })));
    }

    #[test]
    fn test_concurrent_final_writes_keep_final_check() {
        let (registry, id) = setup();
        let info = registry.get(id).unwrap();
        let field = Arc::clone(info.declared_field("id").unwrap());
        field.make_accessible();
        let obj = Value::Object(info.allocate());

        let writers: Vec<_> = (0..7i64)
            .map(|n| {
                let field = Arc::clone(&field);
                let obj = obj.clone();
                thread::spawn(move || {
                    (0..2_000i64)
                        .filter(|i| write_field(&field, &DenyPatcher, Some(&obj), Value::from(n * 10_000 + *i)).is_err())
                        .count()
                })
            })
            .collect();
        let plain = {
            let field = Arc::clone(&field);
            let obj = obj.clone();
            thread::spawn(move || {
                (0..2_000i64)
                    .filter(|i| field.set(Some(&obj), Value::from(*i)).is_ok())
                    .count()
            })
        };

        let failed: usize = writers.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(failed, 0);
        assert_eq!(plain.join().unwrap(), 0);
    }
}
