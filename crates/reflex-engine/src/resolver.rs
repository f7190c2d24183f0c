//! Member resolution engine
//!
//! [`Reflex`] turns a symbolic request (type, name, argument shapes) into one
//! [`Member`]. Four strategies are layered:
//!
//! 1. Accessible lookup by name and exact parameter types
//!    ([`Reflex::field`], [`Reflex::method`], [`Reflex::constructor`],
//!    [`Reflex::executable`]).
//! 2. Executable lookup by argument values ([`Reflex::method_for_args`],
//!    [`Reflex::constructor_for_args`], [`Reflex::executable_for_args`]).
//! 3. Managed lookup ([`Reflex::property`], [`Reflex::function`],
//!    [`Reflex::function_for_args`]).
//! 4. Unified resolution by name and arguments ([`Reflex::invokable`]).
//!
//! Every successful resolution is made accessible and memoized. The engine
//! never invalidates cache entries itself; members registered after a
//! resolution are not seen until the entry expires.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reflex_model::members::CONSTRUCTOR_NAME;
use reflex_model::{
    ConstructorInfo, FieldInfo, FunctionInfo, MethodInfo, Modifiers, OwningScope, PropertyInfo, TypeId, TypeInfo,
    TypeRegistry, Value,
};
use tracing::{debug, error, trace};

use crate::cache::MemberCache;
use crate::config::EngineConfig;
use crate::error::{ReflectError, ReflectResult};
use crate::invokable::Invokable;
use crate::key::{cache_key, signature, KeyKind};
use crate::member::Member;
use crate::patch::{self, FieldPatcher, SlotPatcher};
use crate::predicate::Predicate;
use crate::predicates::callable::all_assignable;
use crate::predicates::{field, function, method, property};
use crate::scan::{ClassNameSource, RegistryClassNames};
use crate::traverser::{self, HierarchyTraverser, Traverser};

/// Snapshot of resolution counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    /// Requests answered from the cache
    pub cache_hits: u64,
    /// Requests that had to resolve
    pub cache_misses: u64,
    /// Hierarchy or provenance walks started
    pub walks: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    walks: AtomicU64,
}

/// Receiver side of a dynamic invocation
#[derive(Debug, Clone)]
pub enum Target {
    /// An instance; its runtime type is searched and it becomes the receiver
    Instance(Value),
    /// A type; only static, companion and top-level members can run
    Type(TypeId),
}

impl Target {
    /// Type searched for members
    pub fn type_id(&self) -> TypeId {
        match self {
            Target::Instance(value) => value.type_id(),
            Target::Type(ty) => *ty,
        }
    }

    fn receiver(&self) -> Option<&Value> {
        match self {
            Target::Instance(value) => Some(value),
            Target::Type(_) => None,
        }
    }
}

impl From<Value> for Target {
    fn from(value: Value) -> Self {
        Target::Instance(value)
    }
}

impl From<TypeId> for Target {
    fn from(ty: TypeId) -> Self {
        Target::Type(ty)
    }
}

/// The resolution engine
pub struct Reflex {
    registry: Arc<TypeRegistry>,
    cache: MemberCache,
    config: EngineConfig,
    class_names: Arc<dyn ClassNameSource>,
    patcher: Arc<dyn FieldPatcher>,
    counters: Counters,
}

impl Reflex {
    /// Engine with default configuration
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    /// Engine with the given configuration
    ///
    /// Top-level discovery enumerates the registry's file facades and final
    /// fields are patched through their slots; replace either with
    /// [`Reflex::with_class_names`] / [`Reflex::with_patcher`].
    pub fn with_config(registry: Arc<TypeRegistry>, config: EngineConfig) -> Self {
        let cache = MemberCache::with_limits(config.cache.ttl(), config.cache.max_size);
        Self {
            class_names: Arc::new(RegistryClassNames::new(registry.clone())),
            patcher: Arc::new(SlotPatcher),
            registry,
            cache,
            config,
            counters: Counters::default(),
        }
    }

    /// Use another class-name source for top-level discovery
    pub fn with_class_names(mut self, source: Arc<dyn ClassNameSource>) -> Self {
        self.class_names = source;
        self
    }

    /// Use another final-field patcher
    pub fn with_patcher(mut self, patcher: Arc<dyn FieldPatcher>) -> Self {
        self.patcher = patcher;
        self
    }

    /// The metadata registry
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// The resolution cache
    pub fn cache(&self) -> &MemberCache {
        &self.cache
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolution counters
    pub fn stats(&self) -> ResolutionStats {
        ResolutionStats {
            cache_hits: self.counters.hits.load(Ordering::Relaxed),
            cache_misses: self.counters.misses.load(Ordering::Relaxed),
            walks: self.counters.walks.load(Ordering::Relaxed),
        }
    }

    /// Set the cache time-to-live
    pub fn set_ttl(&self, ttl: Duration) -> &Self {
        self.cache.set_ttl(ttl);
        self
    }

    /// Set the cache capacity
    pub fn set_max_size(&self, max_size: usize) -> &Self {
        self.cache.set_max_size(max_size);
        self
    }

    /// Sweep the cache and stop its background thread
    pub fn shutdown(&self) {
        self.cache.shutdown();
    }

    /// `ty` followed by its superclasses
    pub fn hierarchy(&self, ty: TypeId) -> ReflectResult<Vec<Arc<TypeInfo>>> {
        self.type_info(ty)?;
        Ok(self.registry.hierarchy(ty))
    }

    // ------------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------------

    fn type_info(&self, ty: TypeId) -> ReflectResult<Arc<TypeInfo>> {
        let info = self.registry.get(ty).ok_or(ReflectError::UnknownType(ty.raw()))?;
        if self.config.is_restricted(&info.name) {
            error!(type_name = %info.name, "refusing to reflect on restricted type");
            return Err(ReflectError::RestrictedType(info.name.clone()));
        }
        Ok(info)
    }

    fn walk(&self, ty: TypeId) -> HierarchyTraverser<'_> {
        self.counters.walks.fetch_add(1, Ordering::Relaxed);
        HierarchyTraverser::new(&self.registry, ty)
    }

    fn functions_of(&self, ty: TypeId) -> traverser::ProvenanceTraverser<'_, FunctionInfo> {
        self.counters.walks.fetch_add(1, Ordering::Relaxed);
        traverser::functions(&self.registry, ty, self.class_names.as_ref())
    }

    fn properties_of(&self, ty: TypeId) -> traverser::ProvenanceTraverser<'_, PropertyInfo> {
        self.counters.walks.fetch_add(1, Ordering::Relaxed);
        traverser::properties(&self.registry, ty, self.class_names.as_ref())
    }

    /// Cached resolution; concurrent misses agree on the first stored member
    fn memoize(&self, key: String, resolve: impl FnOnce() -> ReflectResult<Member>) -> ReflectResult<Member> {
        if let Some(member) = self.cache.get(&key) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "resolution cache hit");
            return Ok(member);
        }
        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        let resolved = resolve()?;
        resolved.make_accessible();
        let member = self.cache.put_if_absent(key.clone(), resolved.clone()).unwrap_or(resolved);
        if self.config.debug {
            debug!(key = %key, member = %member, "resolved");
        } else {
            trace!(key = %key, member = %member, "resolved");
        }
        Ok(member)
    }

    fn arg_types(args: &[Value]) -> Vec<TypeId> {
        args.iter().map(Value::type_id).collect()
    }

    fn key(&self, kind: KeyKind, info: &TypeInfo, name: &str, params: &[TypeId]) -> String {
        cache_key(&self.registry, kind, &info.name, name, params)
    }

    /// First match on the nearest type that has one
    ///
    /// In strict mode more than one match on that type is an error.
    fn pick<T: ?Sized>(
        &self,
        matches: Vec<Arc<T>>,
        info: &TypeInfo,
        name: &str,
        types: &[TypeId],
    ) -> ReflectResult<Option<Arc<T>>> {
        if self.config.strict_overloads && matches.len() > 1 {
            return Err(ReflectError::Ambiguous {
                type_name: info.name.clone(),
                signature: signature(&self.registry, name, types),
                candidates: matches.len(),
            });
        }
        Ok(matches.into_iter().next())
    }

    fn method_not_found(&self, info: &TypeInfo, name: &str, params: &[TypeId]) -> ReflectError {
        ReflectError::MethodNotFound {
            type_name: info.name.clone(),
            signature: signature(&self.registry, name, params),
        }
    }

    fn constructor_not_found(&self, info: &TypeInfo, params: &[TypeId]) -> ReflectError {
        ReflectError::ConstructorNotFound {
            type_name: info.name.clone(),
            signature: signature(&self.registry, CONSTRUCTOR_NAME, params),
        }
    }

    fn function_not_found(&self, info: &TypeInfo, name: &str, params: &[TypeId]) -> ReflectError {
        ReflectError::FunctionNotFound {
            type_name: info.name.clone(),
            signature: signature(&self.registry, name, params),
        }
    }

    // ------------------------------------------------------------------------
    // Accessible lookup by exact parameter types
    // ------------------------------------------------------------------------

    /// Field by name, searching superclasses
    pub fn field(&self, ty: TypeId, name: &str) -> ReflectResult<Arc<FieldInfo>> {
        let info = self.type_info(ty)?;
        let key = self.key(KeyKind::Field, &info, name, &[]);
        let member = self.memoize(key, || {
            self.walk(ty)
                .members(|t| t.fields.as_slice())
                .find(&field::name_equals(name))
                .map(Member::Field)
                .ok_or_else(|| ReflectError::FieldNotFound {
                    type_name: info.name.clone(),
                    name: name.to_string(),
                })
        })?;
        Ok(member.into_field())
    }

    /// Method by name and exact parameter types, searching superclasses
    pub fn method(&self, ty: TypeId, name: &str, params: &[TypeId]) -> ReflectResult<Arc<MethodInfo>> {
        let info = self.type_info(ty)?;
        let key = self.key(KeyKind::Method, &info, name, params);
        let member = self.memoize(key, || {
            let wanted = method::name_equals(name) & method::parameter_types(params);
            self.walk(ty)
                .members(|t| t.methods.as_slice())
                .find(&wanted)
                .map(Member::Method)
                .ok_or_else(|| self.method_not_found(&info, name, params))
        })?;
        Ok(member.into_method())
    }

    /// Constructor by exact parameter types; constructors are not inherited
    pub fn constructor(&self, ty: TypeId, params: &[TypeId]) -> ReflectResult<Arc<ConstructorInfo>> {
        let info = self.type_info(ty)?;
        let key = self.key(KeyKind::Constructor, &info, CONSTRUCTOR_NAME, params);
        let member = self.memoize(key, || {
            info.constructors
                .iter()
                .find(|c| c.param_types() == params)
                .cloned()
                .map(Member::Constructor)
                .ok_or_else(|| self.constructor_not_found(&info, params))
        })?;
        Ok(member.into_constructor())
    }

    /// Method, or constructor when `name` is `<init>`
    pub fn executable(&self, ty: TypeId, name: &str, params: &[TypeId]) -> ReflectResult<Member> {
        let info = self.type_info(ty)?;
        let key = self.key(KeyKind::Executable, &info, name, params);
        self.memoize(key, || {
            if name == CONSTRUCTOR_NAME {
                self.constructor(ty, params).map(Member::Constructor)
            } else {
                self.method(ty, name, params).map(Member::Method)
            }
        })
    }

    // ------------------------------------------------------------------------
    // Executable lookup by argument values
    // ------------------------------------------------------------------------

    /// Method whose parameters accept `args`, searching superclasses
    ///
    /// Null arguments match any parameter type. Overloads on one type are
    /// tried in declaration order.
    pub fn method_for_args(&self, ty: TypeId, name: &str, args: &[Value]) -> ReflectResult<Arc<MethodInfo>> {
        let info = self.type_info(ty)?;
        let types = Self::arg_types(args);
        let key = self.key(KeyKind::MethodArgs, &info, name, &types);
        let member = self.memoize(key, || {
            let mut result = Ok(None);
            self.walk(ty).traverse_until(&mut |t| {
                let matches: Vec<_> = t
                    .declared_methods_named(name)
                    .filter(|m| all_assignable(&self.registry, &m.param_types(), &types))
                    .cloned()
                    .collect();
                if matches.is_empty() {
                    return false;
                }
                result = self.pick(matches, &info, name, &types);
                true
            });
            result?
                .map(Member::Method)
                .ok_or_else(|| self.method_not_found(&info, name, &types))
        })?;
        Ok(member.into_method())
    }

    /// Constructor whose parameters accept `args`
    pub fn constructor_for_args(&self, ty: TypeId, args: &[Value]) -> ReflectResult<Arc<ConstructorInfo>> {
        let info = self.type_info(ty)?;
        let types = Self::arg_types(args);
        let key = self.key(KeyKind::ConstructorArgs, &info, CONSTRUCTOR_NAME, &types);
        let member = self.memoize(key, || {
            let matches = self.constructors_accepting(&info, &types, Modifiers::NONE);
            self.pick(matches, &info, CONSTRUCTOR_NAME, &types)?
                .map(Member::Constructor)
                .ok_or_else(|| self.constructor_not_found(&info, &types))
        })?;
        Ok(member.into_constructor())
    }

    /// Method or constructor (for `<init>`) whose parameters accept `args`
    pub fn executable_for_args(&self, ty: TypeId, name: &str, args: &[Value]) -> ReflectResult<Member> {
        let info = self.type_info(ty)?;
        let types = Self::arg_types(args);
        let key = self.key(KeyKind::ExecutableArgs, &info, name, &types);
        self.memoize(key, || {
            if name == CONSTRUCTOR_NAME {
                self.constructor_for_args(ty, args).map(Member::Constructor)
            } else {
                self.method_for_args(ty, name, args).map(Member::Method)
            }
        })
    }

    fn constructors_accepting(
        &self,
        info: &TypeInfo,
        types: &[TypeId],
        excluded: Modifiers,
    ) -> Vec<Arc<ConstructorInfo>> {
        info.constructors
            .iter()
            .filter(|c| excluded == Modifiers::NONE || !c.modifiers.contains(excluded))
            .filter(|c| all_assignable(&self.registry, &c.param_types(), types))
            .cloned()
            .collect()
    }

    // ------------------------------------------------------------------------
    // Managed lookup
    // ------------------------------------------------------------------------

    /// Managed property by name
    ///
    /// Instance properties along the hierarchy win over static, companion and
    /// top-level ones.
    pub fn property(&self, ty: TypeId, name: &str) -> ReflectResult<Arc<PropertyInfo>> {
        let info = self.type_info(ty)?;
        let key = self.key(KeyKind::Property, &info, name, &[]);
        let member = self.memoize(key, || {
            let named = property::name_equals(name);
            let instance = named.and(&property::scope(OwningScope::Instance));
            let found = self
                .walk(ty)
                .members(|t| t.properties.as_slice())
                .find(&instance)
                .or_else(|| self.properties_of(ty).find(&named.and(&instance.not())));
            found.map(Member::Property).ok_or_else(|| ReflectError::PropertyNotFound {
                type_name: info.name.clone(),
                name: name.to_string(),
            })
        })?;
        Ok(member.into_property())
    }

    /// Managed function by name and exact value-parameter types
    ///
    /// When no function matches, the leading one or two types are retried as
    /// receiver context (dispatch and extension receiver). A request named
    /// `<init>` or after the type itself finally falls back to a constructor.
    pub fn function(&self, ty: TypeId, name: &str, types: &[TypeId]) -> ReflectResult<Member> {
        let info = self.type_info(ty)?;
        let key = self.key(KeyKind::Function, &info, name, types);
        self.memoize(key, || {
            let exact = function::name_equals(name) & function::parameter_types(types);
            if let Some(found) = self.functions_of(ty).find(&exact) {
                return Ok(Member::Function(found));
            }

            for split in 1..=types.len().min(2) {
                let (context, rest) = types.split_at(split);
                let registry = self.registry.clone();
                let context = context.to_vec();
                let with_receivers = function::name_equals(name)
                    & function::parameter_types(rest)
                    & Predicate::new(move |f: &FunctionInfo| all_assignable(&registry, &f.receiver_types(), &context));
                if let Some(found) = self.functions_of(ty).find(&with_receivers) {
                    debug!(function = %found.describe(), receivers = split, "matched with receiver context");
                    return Ok(Member::Function(found));
                }
            }

            if name == CONSTRUCTOR_NAME || name == info.simple_name() {
                if let Some(ctor) = info.constructors.iter().find(|c| c.param_types() == types) {
                    return Ok(Member::Constructor(ctor.clone()));
                }
            }

            Err(self.function_not_found(&info, name, types))
        })
    }

    /// Managed function whose value parameters accept `args`
    ///
    /// Extension functions qualify only when their receiver accepts `ty`.
    pub fn function_for_args(&self, ty: TypeId, name: &str, args: &[Value]) -> ReflectResult<Arc<FunctionInfo>> {
        let info = self.type_info(ty)?;
        let types = Self::arg_types(args);
        let key = self.key(KeyKind::FunctionArgs, &info, name, &types);
        let member = self.memoize(key, || {
            let registry = self.registry.clone();
            let arg_types = types.clone();
            let accepts = Predicate::new(move |f: &FunctionInfo| {
                all_assignable(&registry, &f.value_param_types(), &arg_types)
                    && f.extension_receiver.map_or(true, |ext| registry.is_assignable(ty, ext))
            });
            let matches = self.functions_of(ty).collect(&(function::name_equals(name) & accepts));
            self.pick(matches, &info, name, &types)?
                .map(Member::Function)
                .ok_or_else(|| self.function_not_found(&info, name, &types))
        })?;
        Ok(member.into_function())
    }

    /// Constructor of a managed type whose parameters accept `args`
    ///
    /// Synthetic constructors (default-argument bridges) are skipped.
    pub fn managed_constructor_for_args(&self, ty: TypeId, args: &[Value]) -> ReflectResult<Arc<ConstructorInfo>> {
        let info = self.type_info(ty)?;
        let types = Self::arg_types(args);
        let key = self.key(KeyKind::ManagedConstructorArgs, &info, CONSTRUCTOR_NAME, &types);
        let member = self.memoize(key, || {
            if !info.managed {
                return Err(self.constructor_not_found(&info, &types));
            }
            let matches = self.constructors_accepting(&info, &types, Modifiers::SYNTHETIC);
            self.pick(matches, &info, CONSTRUCTOR_NAME, &types)?
                .map(Member::Constructor)
                .ok_or_else(|| self.constructor_not_found(&info, &types))
        })?;
        Ok(member.into_constructor())
    }

    // ------------------------------------------------------------------------
    // Unified resolution and dynamic invocation
    // ------------------------------------------------------------------------

    /// Resolve whatever `name` denotes on `ty` for a call with `args`
    ///
    /// - `<init>`: managed constructor, then native constructor.
    /// - With arguments: managed function then native executable for managed
    ///   types; the reverse otherwise.
    /// - Without arguments: property, function, field, executable for managed
    ///   types; field, executable, property, function otherwise.
    pub fn invokable(&self, ty: TypeId, name: &str, args: &[Value]) -> ReflectResult<Invokable> {
        let info = self.type_info(ty)?;
        let member = self.resolve_invokable(&info, name, args)?;
        Ok(Invokable::new(member, self.registry.clone(), self.patcher.clone()))
    }

    fn resolve_invokable(&self, info: &TypeInfo, name: &str, args: &[Value]) -> ReflectResult<Member> {
        let order = Lookup::order(name == CONSTRUCTOR_NAME, !args.is_empty(), info.managed);
        let mut first_miss = None;
        for &lookup in order {
            match self.lookup(lookup, info.id, name, args) {
                Ok(member) => return Ok(member),
                Err(e) if e.is_not_found() => {
                    first_miss.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }

        if args.is_empty() && name != CONSTRUCTOR_NAME {
            return Err(ReflectError::PropertyNotFound {
                type_name: info.name.clone(),
                name: name.to_string(),
            });
        }
        Err(first_miss.unwrap_or_else(|| self.function_not_found(info, name, &Self::arg_types(args))))
    }

    fn lookup(&self, lookup: Lookup, ty: TypeId, name: &str, args: &[Value]) -> ReflectResult<Member> {
        match lookup {
            Lookup::ManagedConstructor => self.managed_constructor_for_args(ty, args).map(Member::Constructor),
            Lookup::NativeConstructor => self.constructor_for_args(ty, args).map(Member::Constructor),
            Lookup::Function => self.function_for_args(ty, name, args).map(Member::Function),
            Lookup::Executable => self.executable_for_args(ty, name, args),
            Lookup::Property => self.property(ty, name).map(Member::Property),
            Lookup::Field => self.field(ty, name).map(Member::Field),
        }
    }

    /// Resolve `name` against `target` and call it with `args`
    ///
    /// An instance target supplies the receiver; a type target only reaches
    /// static, companion and top-level members.
    pub fn invoke(&self, target: impl Into<Target>, name: &str, args: &[Value]) -> ReflectResult<Value> {
        let target = target.into();
        let invokable = self.invokable(target.type_id(), name, args)?;
        invokable.bind(target.receiver(), args)
    }

    /// [`Reflex::invoke`], collapsing every failure to `None`
    pub fn invoke_or_none(&self, target: impl Into<Target>, name: &str, args: &[Value]) -> Option<Value> {
        self.invoke(target, name, args).ok()
    }

    /// Construct an instance of `ty` from `args`
    pub fn new_instance(&self, ty: TypeId, args: &[Value]) -> ReflectResult<Value> {
        self.invoke(Target::Type(ty), CONSTRUCTOR_NAME, args)
    }

    // ------------------------------------------------------------------------
    // Field and property access
    // ------------------------------------------------------------------------

    /// Read a field of `target` (static fields ignore the receiver)
    pub fn get_field_value(&self, target: &Value, name: &str) -> ReflectResult<Value> {
        let field = self.field(target.type_id(), name)?;
        Ok(field.get(Some(target))?)
    }

    /// [`Reflex::get_field_value`], collapsing every failure to `None`
    pub fn get_field_value_or_none(&self, target: &Value, name: &str) -> Option<Value> {
        self.get_field_value(target, name).ok()
    }

    /// Read a static field
    pub fn get_static_field_value(&self, ty: TypeId, name: &str) -> ReflectResult<Value> {
        let field = self.field(ty, name)?;
        Ok(field.get(None)?)
    }

    /// Write a field of `target`, falling back for final fields
    pub fn set_field_value(&self, target: &Value, name: &str, value: Value) -> ReflectResult<()> {
        let field = self.field(target.type_id(), name)?;
        patch::write_field(&field, self.patcher.as_ref(), Some(target), value)
    }

    /// Write a static field, falling back for final fields
    pub fn set_static_field_value(&self, ty: TypeId, name: &str, value: Value) -> ReflectResult<()> {
        let field = self.field(ty, name)?;
        patch::write_field(&field, self.patcher.as_ref(), None, value)
    }

    /// [`Reflex::set_field_value`], reporting success instead of the error
    pub fn try_set_field_value(&self, target: &Value, name: &str, value: Value) -> bool {
        self.set_field_value(target, name, value).is_ok()
    }

    /// Read a managed property of `target`
    pub fn get_property_value(&self, target: &Value, name: &str) -> ReflectResult<Value> {
        let property = self.property(target.type_id(), name)?;
        let receivers = vec![target.clone(); property.receiver_count()];
        Ok(property.get(&receivers)?)
    }

    /// [`Reflex::get_property_value`], collapsing every failure to `None`
    pub fn get_property_value_or_none(&self, target: &Value, name: &str) -> Option<Value> {
        self.get_property_value(target, name).ok()
    }

    /// Read a companion or top-level property
    pub fn get_static_property_value(&self, ty: TypeId, name: &str) -> ReflectResult<Value> {
        let property = self.property(ty, name)?;
        Ok(property.get(&[])?)
    }

    /// Write a managed property of `target`
    pub fn set_property_value(&self, target: &Value, name: &str, value: Value) -> ReflectResult<()> {
        let property = self.property(target.type_id(), name)?;
        let mut args = vec![target.clone(); property.receiver_count()];
        args.push(value);
        Ok(property.set(&args)?)
    }

    /// Write a companion or top-level property
    pub fn set_static_property_value(&self, ty: TypeId, name: &str, value: Value) -> ReflectResult<()> {
        let property = self.property(ty, name)?;
        Ok(property.set(&[value])?)
    }

    /// [`Reflex::set_property_value`], reporting success instead of the error
    pub fn try_set_property_value(&self, target: &Value, name: &str, value: Value) -> bool {
        self.set_property_value(target, name, value).is_ok()
    }

    // ------------------------------------------------------------------------
    // Structural queries
    // ------------------------------------------------------------------------

    /// First field along the hierarchy matching `predicate`
    pub fn find_field(&self, ty: TypeId, predicate: &Predicate<FieldInfo>) -> ReflectResult<Option<Arc<FieldInfo>>> {
        self.type_info(ty)?;
        Ok(self.walk(ty).members(|t| t.fields.as_slice()).find(predicate))
    }

    /// Every field along the hierarchy matching `predicate`
    pub fn collect_fields(&self, ty: TypeId, predicate: &Predicate<FieldInfo>) -> ReflectResult<Vec<Arc<FieldInfo>>> {
        self.type_info(ty)?;
        Ok(self.walk(ty).members(|t| t.fields.as_slice()).collect(predicate))
    }

    /// First method along the hierarchy matching `predicate`
    pub fn find_method(
        &self,
        ty: TypeId,
        predicate: &Predicate<MethodInfo>,
    ) -> ReflectResult<Option<Arc<MethodInfo>>> {
        self.type_info(ty)?;
        Ok(self.walk(ty).members(|t| t.methods.as_slice()).find(predicate))
    }

    /// Every method along the hierarchy matching `predicate`
    pub fn collect_methods(
        &self,
        ty: TypeId,
        predicate: &Predicate<MethodInfo>,
    ) -> ReflectResult<Vec<Arc<MethodInfo>>> {
        self.type_info(ty)?;
        Ok(self.walk(ty).members(|t| t.methods.as_slice()).collect(predicate))
    }

    /// First constructor of `ty` matching `predicate`
    pub fn find_constructor(
        &self,
        ty: TypeId,
        predicate: &Predicate<ConstructorInfo>,
    ) -> ReflectResult<Option<Arc<ConstructorInfo>>> {
        let info = self.type_info(ty)?;
        Ok(info.constructors.iter().find(|c| predicate.test(c)).cloned())
    }

    /// Every constructor of `ty` matching `predicate`
    pub fn collect_constructors(
        &self,
        ty: TypeId,
        predicate: &Predicate<ConstructorInfo>,
    ) -> ReflectResult<Vec<Arc<ConstructorInfo>>> {
        let info = self.type_info(ty)?;
        Ok(info.constructors.iter().filter(|c| predicate.test(c)).cloned().collect())
    }

    /// First managed function (declared, companion, top-level) matching `predicate`
    pub fn find_function(
        &self,
        ty: TypeId,
        predicate: &Predicate<FunctionInfo>,
    ) -> ReflectResult<Option<Arc<FunctionInfo>>> {
        self.type_info(ty)?;
        Ok(self.functions_of(ty).find(predicate))
    }

    /// Every managed function (declared, companion, top-level) matching `predicate`
    pub fn collect_functions(
        &self,
        ty: TypeId,
        predicate: &Predicate<FunctionInfo>,
    ) -> ReflectResult<Vec<Arc<FunctionInfo>>> {
        self.type_info(ty)?;
        Ok(self.functions_of(ty).collect(predicate))
    }

    /// First managed property (declared, companion, top-level) matching `predicate`
    pub fn find_property(
        &self,
        ty: TypeId,
        predicate: &Predicate<PropertyInfo>,
    ) -> ReflectResult<Option<Arc<PropertyInfo>>> {
        self.type_info(ty)?;
        Ok(self.properties_of(ty).find(predicate))
    }

    /// Every managed property (declared, companion, top-level) matching `predicate`
    pub fn collect_properties(
        &self,
        ty: TypeId,
        predicate: &Predicate<PropertyInfo>,
    ) -> ReflectResult<Vec<Arc<PropertyInfo>>> {
        self.type_info(ty)?;
        Ok(self.properties_of(ty).collect(predicate))
    }
}

impl std::fmt::Debug for Reflex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reflex")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

/// One step of [`Reflex::invokable`] resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    ManagedConstructor,
    NativeConstructor,
    Function,
    Executable,
    Property,
    Field,
}

impl Lookup {
    fn order(constructor: bool, has_args: bool, managed: bool) -> &'static [Lookup] {
        use Lookup::*;
        match (constructor, has_args, managed) {
            (true, _, _) => &[ManagedConstructor, NativeConstructor],
            (false, true, true) => &[Function, Executable],
            (false, true, false) => &[Executable, Function],
            (false, false, true) => &[Property, Function, Field, Executable],
            (false, false, false) => &[Field, Executable, Property, Function],
        }
    }
}
