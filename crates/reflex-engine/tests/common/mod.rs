//! Shared fixtures for the integration suites

#![allow(dead_code)]

use std::sync::{Arc, Weak};

use reflex_model::{
    Annotation, ConstructorDef, FieldDef, FunctionDef, InvokeResult, MethodDef, Modifiers, PropertyDef,
    TypeBuilder, TypeId, TypeRegistry, Value,
};

pub const TEST_CLASS: &str = "reflex.test.ReflectionTestClass";
pub const USER: &str = "reflex.test.User";
pub const ACCOUNT: &str = "reflex.test.Account";
pub const ACCOUNT_COMPANION: &str = "reflex.test.Account.Companion";

/// Every fixture type registered in one registry
pub struct Fixture {
    pub registry: Arc<TypeRegistry>,
    pub test_class: TypeId,
    pub user: TypeId,
    pub admin: TypeId,
    pub account: TypeId,
    pub account_companion: TypeId,
}

impl Fixture {
    pub fn new() -> Self {
        let registry = Arc::new(TypeRegistry::new());
        let test_class = register_test_class(&registry);
        let (user, admin) = register_users(&registry);
        let (account, account_companion) = register_accounts(&registry);
        Self {
            registry,
            test_class,
            user,
            admin,
            account,
            account_companion,
        }
    }
}

fn read_static(registry: &Weak<TypeRegistry>, ty: &str, field: &str) -> InvokeResult<Value> {
    let registry = registry.upgrade().ok_or("registry dropped")?;
    let info = registry.get_by_name(ty).ok_or("type not registered")?;
    let field = info.declared_field(field).ok_or("field not declared")?;
    field.read_unchecked(None)
}

fn write_static(registry: &Weak<TypeRegistry>, ty: &str, field: &str, value: Value) -> InvokeResult<()> {
    let registry = registry.upgrade().ok_or("registry dropped")?;
    let info = registry.get_by_name(ty).ok_or("type not registered")?;
    let field = info.declared_field(field).ok_or("field not declared")?;
    field.write_unchecked(None, value)
}

fn slot(args: &[Value], index: usize) -> InvokeResult<Value> {
    let obj = args.first().and_then(Value::as_object).ok_or("receiver is not an object")?;
    obj.get_field(index).ok_or_else(|| "missing slot".into())
}

fn set_slot(args: &[Value], index: usize, value: Value) -> InvokeResult<()> {
    let obj = args.first().and_then(Value::as_object).ok_or("receiver is not an object")?;
    Ok(obj.set_field(index, value)?)
}

/// Mirror of a plain class with one field per modifier combination
///
/// Instance slots: `finalField` 0, `instanceField` 1, `volatileField` 2.
fn register_test_class(registry: &Arc<TypeRegistry>) -> TypeId {
    let weak = Arc::downgrade(registry);
    let (get_static, set_static, get_static_final) = (weak.clone(), weak.clone(), weak);

    registry
        .register(
            TypeBuilder::class(TEST_CLASS)
                .annotate(Annotation::new("Suppress").with_arg("detekt.all"))
                .field(
                    FieldDef::new("STATIC_FINAL_FIELD", TypeId::STRING)
                        .modifiers(Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL)
                        .initial("staticFinalField"),
                )
                .field(
                    FieldDef::new("staticField", TypeId::STRING)
                        .modifiers(Modifiers::PRIVATE | Modifiers::STATIC)
                        .initial("staticField"),
                )
                .field(FieldDef::new("finalField", TypeId::STRING).modifiers(Modifiers::PRIVATE | Modifiers::FINAL))
                .field(FieldDef::new("instanceField", TypeId::STRING).modifiers(Modifiers::PRIVATE))
                .field(FieldDef::new("volatileField", TypeId::STRING).modifiers(Modifiers::PRIVATE | Modifiers::VOLATILE))
                .constructor(
                    ConstructorDef::new(|obj, args| {
                        obj.set_field(0, args[0].clone())?;
                        obj.set_field(1, args[1].clone())?;
                        obj.set_field(2, Value::from("volatileField"))?;
                        Ok(())
                    })
                    .param("finalField", TypeId::STRING)
                    .param("instanceField", TypeId::STRING),
                )
                .method(
                    MethodDef::new("getStaticField", move |_| read_static(&get_static, TEST_CLASS, "staticField"))
                        .returns(TypeId::STRING)
                        .modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
                )
                .method(
                    MethodDef::new("setStaticField", move |args| {
                        write_static(&set_static, TEST_CLASS, "staticField", args[0].clone())?;
                        Ok(Value::Unit)
                    })
                    .param("staticField", TypeId::STRING)
                    .modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
                )
                .method(
                    MethodDef::new("getStaticFinalField", move |_| {
                        read_static(&get_static_final, TEST_CLASS, "STATIC_FINAL_FIELD")
                    })
                    .returns(TypeId::STRING)
                    .modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
                )
                .method(MethodDef::new("getInstanceField", |args| slot(args, 1)).returns(TypeId::STRING))
                .method(
                    MethodDef::new("setInstanceField", |args| {
                        set_slot(args, 1, args[1].clone())?;
                        Ok(Value::Unit)
                    })
                    .param("instanceField", TypeId::STRING),
                )
                .method(MethodDef::new("getFinalField", |args| slot(args, 0)).returns(TypeId::STRING))
                .method(MethodDef::new("getVolatileField", |args| slot(args, 2)).returns(TypeId::STRING))
                .method(
                    MethodDef::new("setVolatileField", |args| {
                        set_slot(args, 2, args[1].clone())?;
                        Ok(Value::Unit)
                    })
                    .param("volatileField", TypeId::STRING),
                )
                .method(MethodDef::new("overloadedMethod", |_| Ok(Value::Unit)))
                .method(
                    MethodDef::new("overloadedMethod", |args| {
                        Ok(Value::string(format!("overloadedMethod() called with: arg = [{}]", args[1])))
                    })
                    .param("arg", TypeId::STRING)
                    .returns(TypeId::STRING),
                ),
        )
        .unwrap()
}

/// `User` holds a private `ssn`; `Admin` overrides `describe`
fn register_users(registry: &Arc<TypeRegistry>) -> (TypeId, TypeId) {
    let user = registry
        .register(
            TypeBuilder::class(USER)
                .field(
                    FieldDef::new("ssn", TypeId::STRING)
                        .modifiers(Modifiers::PRIVATE)
                        .initial("123-45-6789"),
                )
                .field(FieldDef::new("name", TypeId::STRING).modifiers(Modifiers::PUBLIC).initial("anon"))
                .constructor(ConstructorDef::empty())
                .method(
                    MethodDef::new("getPrivateInfo", |args| {
                        let ssn = slot(args, 0)?;
                        Ok(Value::string(format!("SSN: {}", ssn)))
                    })
                    .returns(TypeId::STRING),
                )
                .method(MethodDef::new("describe", |_| Ok(Value::from("user"))).returns(TypeId::STRING))
                .method(
                    MethodDef::new("secret", |_| Ok(Value::from("hidden")))
                        .returns(TypeId::STRING)
                        .modifiers(Modifiers::PRIVATE),
                ),
        )
        .unwrap();

    let admin = registry
        .register(
            TypeBuilder::class("reflex.test.Admin")
                .extends(user)
                .field(FieldDef::new("level", TypeId::INT).initial(9))
                .constructor(ConstructorDef::empty())
                .method(MethodDef::new("describe", |_| Ok(Value::from("admin"))).returns(TypeId::STRING)),
        )
        .unwrap();

    (user, admin)
}

/// A managed class with a companion, plus two file facades
///
/// Account slots: `balance` 0, `owner` 1, `nickname` 2.
fn register_accounts(registry: &Arc<TypeRegistry>) -> (TypeId, TypeId) {
    let companion = registry
        .register(
            TypeBuilder::companion(ACCOUNT_COMPANION)
                .field(FieldDef::new("count", TypeId::INT).modifiers(Modifiers::PRIVATE).initial(0))
                .property(PropertyDef::backed("count", "count").mutable())
                .property(PropertyDef::computed("MAX_BALANCE", TypeId::INT, |_| Ok(Value::from(1_000))).constant())
                .function(
                    FunctionDef::new("create", |args| Ok(Value::string(format!("created:{}", args[1]))))
                        .param("owner", TypeId::STRING)
                        .returns(TypeId::STRING),
                ),
        )
        .unwrap();

    let account = registry
        .register(
            TypeBuilder::class(ACCOUNT)
                .managed()
                .with_companion(companion)
                .field(FieldDef::new("balance", TypeId::INT).modifiers(Modifiers::PRIVATE).initial(0))
                .field(FieldDef::new("owner", TypeId::STRING).modifiers(Modifiers::PRIVATE | Modifiers::FINAL))
                .field(FieldDef::new("nickname", TypeId::STRING).modifiers(Modifiers::PRIVATE))
                .property(PropertyDef::backed("balance", "balance").mutable())
                .property(PropertyDef::backed("owner", "owner"))
                .property(PropertyDef::backed("nickname", "nickname").lateinit())
                .constructor(
                    ConstructorDef::new(|obj, args| {
                        obj.set_field(1, args[0].clone())?;
                        Ok(())
                    })
                    .param("owner", TypeId::STRING),
                )
                .constructor(
                    ConstructorDef::new(|obj, args| {
                        obj.set_field(1, Value::string(format!("masked:{}", args[0])))?;
                        Ok(())
                    })
                    .param("owner", TypeId::ANY)
                    .modifiers(Modifiers::PUBLIC | Modifiers::SYNTHETIC),
                )
                .function(
                    FunctionDef::new("deposit", |args| {
                        let current = slot(args, 0)?.as_int().unwrap_or(0);
                        let amount = args[1].as_int().ok_or("amount must be an int")?;
                        set_slot(args, 0, Value::from(current + amount))?;
                        Ok(Value::from(current + amount))
                    })
                    .param("amount", TypeId::INT)
                    .returns(TypeId::INT),
                )
                .function(
                    FunctionDef::new("transfer", |args| Ok(args[2].clone()))
                        .param("to", TypeId::ANY)
                        .param("amount", TypeId::INT)
                        .returns(TypeId::INT)
                        .modifiers(Modifiers::PRIVATE),
                ),
        )
        .unwrap();

    registry
        .register(
            TypeBuilder::file_facade("reflex.test.AccountKt")
                .function(
                    FunctionDef::new("formatted", |args| {
                        let owner = slot(args, 1)?;
                        Ok(Value::string(format!("Account({})", owner)))
                    })
                    .extension_of(account)
                    .returns(TypeId::STRING),
                )
                .function(
                    FunctionDef::new("double", |args| Ok(Value::from(args[0].as_int().unwrap_or(0) * 2)))
                        .param("x", TypeId::INT)
                        .returns(TypeId::INT)
                        .inline(),
                )
                .property(PropertyDef::computed("DEFAULT_OWNER", TypeId::STRING, |_| Ok(Value::from("bank"))).constant()),
        )
        .unwrap();

    registry
        .register(
            TypeBuilder::file_facade("reflex.other.StringsKt")
                .function(
                    FunctionDef::new("shout", |args| Ok(Value::string(args[0].to_string().to_uppercase())))
                        .extension_of(TypeId::STRING)
                        .returns(TypeId::STRING),
                )
                .function(FunctionDef::new("unrelated", |_| Ok(Value::Unit))),
        )
        .unwrap();

    (account, companion)
}

/// Allocate a `ReflectionTestClass` through its public constructor
pub fn new_test_instance(fixture: &Fixture, final_field: &str, instance_field: &str) -> Value {
    let info = fixture.registry.get(fixture.test_class).unwrap();
    let obj = info.constructors[0]
        .new_instance(&[Value::from(final_field), Value::from(instance_field)])
        .unwrap();
    Value::Object(obj)
}
