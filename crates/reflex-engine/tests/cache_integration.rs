//! Integration tests for resolution caching and engine configuration

mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{new_test_instance, Fixture};
use reflex_engine::predicates::member;
use reflex_engine::{EngineConfig, Member, MemberKind, Predicate, Reflex, TtlCache};
use reflex_model::{TypeId, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Memoization
// ============================================================================

#[test]
fn test_repeated_resolution_hits_cache() {
    init_tracing();
    let fixture = Fixture::new();
    let reflex = Reflex::new(fixture.registry.clone());

    let first = reflex.field(fixture.test_class, "instanceField").unwrap();
    let walks = reflex.stats().walks;
    let second = reflex.field(fixture.test_class, "instanceField").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    let stats = reflex.stats();
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.walks, walks);
}

#[test]
fn test_cache_keys_distinguish_member_kinds() {
    let fixture = Fixture::new();
    let reflex = Reflex::new(fixture.registry.clone());

    let field = reflex.field(fixture.account, "balance").unwrap();
    let property = reflex.property(fixture.account, "balance").unwrap();
    assert_eq!(field.name, property.name);

    let keys = reflex.cache().keys();
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().any(|k| k.starts_with("field:")));
    assert!(keys.iter().any(|k| k.starts_with("property:")));
}

#[test]
fn test_overloads_cached_separately() {
    let fixture = Fixture::new();
    let reflex = Reflex::new(fixture.registry.clone());

    let none = reflex.method(fixture.test_class, "overloadedMethod", &[]).unwrap();
    let one = reflex
        .method(fixture.test_class, "overloadedMethod", &[TypeId::STRING])
        .unwrap();
    assert!(!Arc::ptr_eq(&none, &one));
    assert_eq!(reflex.cache().len(), 2);
}

#[test]
fn test_failures_are_not_cached() {
    let fixture = Fixture::new();
    let reflex = Reflex::new(fixture.registry.clone());

    assert!(reflex.field(fixture.test_class, "missing").is_err());
    assert!(reflex.field(fixture.test_class, "missing").is_err());
    assert!(reflex.cache().is_empty());
    assert_eq!(reflex.stats().cache_misses, 2);
}

#[test]
fn test_reads_agree_with_direct_access_after_caching() {
    let fixture = Fixture::new();
    let reflex = Reflex::new(fixture.registry.clone());
    let obj = new_test_instance(&fixture, "f", "i");

    for _ in 0..3 {
        assert_eq!(reflex.get_field_value(&obj, "instanceField").unwrap(), Value::from("i"));
    }
    assert_eq!(reflex.stats().cache_hits, 2);
}

#[test]
fn test_concurrent_resolution_agrees() {
    let fixture = Fixture::new();
    let reflex = Arc::new(Reflex::new(fixture.registry.clone()));
    let test_class = fixture.test_class;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let reflex = Arc::clone(&reflex);
            thread::spawn(move || reflex.method(test_class, "getStaticField", &[]).unwrap())
        })
        .collect();
    let resolved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let cached = reflex.method(test_class, "getStaticField", &[]).unwrap();
    for method in &resolved {
        assert!(Arc::ptr_eq(method, &cached));
    }
    assert_eq!(reflex.cache().len(), 1);
}

// ============================================================================
// Expiry and capacity
// ============================================================================

#[test]
fn test_ttl_expiry_through_engine() {
    let fixture = Fixture::new();
    let reflex = Reflex::new(fixture.registry.clone());
    reflex.set_ttl(Duration::from_millis(100));

    reflex.field(fixture.test_class, "staticField").unwrap();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(reflex.cache().cleanup(), 0);
    assert_eq!(reflex.cache().len(), 1);

    thread::sleep(Duration::from_millis(150));
    assert_eq!(reflex.cache().cleanup(), 1);
    assert!(reflex.cache().is_empty());

    // Resolution still works after expiry
    reflex.field(fixture.test_class, "staticField").unwrap();
    assert_eq!(reflex.stats().cache_misses, 2);
}

#[test]
fn test_capacity_of_one_keeps_newest() {
    let fixture = Fixture::new();
    let config = EngineConfig::default().with_max_size(1);
    let reflex = Reflex::with_config(fixture.registry.clone(), config);

    reflex.field(fixture.test_class, "staticField").unwrap();
    reflex.field(fixture.test_class, "finalField").unwrap();

    let keys = reflex.cache().keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].ends_with("#finalField"));
}

#[test]
fn test_ttl_cache_standalone() {
    let cache: TtlCache<String> = TtlCache::with_limits(Duration::from_millis(100), 10);
    cache.put("key1", "value1".to_string());

    thread::sleep(Duration::from_millis(20));
    assert_eq!(cache.get("key1"), Some("value1".to_string()));

    thread::sleep(Duration::from_millis(150));
    cache.cleanup();
    assert_eq!(cache.get("key1"), None);

    cache.shutdown();
    assert!(!cache.is_running());
}

#[test]
fn test_shutdown_clears_expired_entries() {
    let fixture = Fixture::new();
    let reflex = Reflex::new(fixture.registry.clone());
    reflex.set_ttl(Duration::from_millis(10));

    reflex.field(fixture.test_class, "staticField").unwrap();
    thread::sleep(Duration::from_millis(30));
    reflex.shutdown();
    assert!(reflex.cache().is_empty());
    assert!(!reflex.cache().is_running());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_engine_from_toml() {
    let config = EngineConfig::from_toml_str(
        r#"
        debug = true
        strict_overloads = true
        restricted_types = ["reflex.Reflex", "reflex.test.User"]

        [cache]
        ttl_ms = 250
        max_size = 3
        "#,
    )
    .unwrap();

    let fixture = Fixture::new();
    let reflex = Reflex::with_config(fixture.registry.clone(), config);
    assert_eq!(reflex.cache().ttl(), Duration::from_millis(250));
    assert_eq!(reflex.cache().max_size(), 3);
    assert!(reflex.config().debug);
    assert!(reflex.field(fixture.user, "ssn").is_err());
    assert!(reflex.field(fixture.test_class, "staticField").is_ok());
}

// ============================================================================
// Predicates over resolved members
// ============================================================================

#[test]
fn test_member_predicates_over_cached_members() {
    let fixture = Fixture::new();
    let reflex = Reflex::new(fixture.registry.clone());

    let members: Vec<Member> = vec![
        Member::Field(reflex.field(fixture.test_class, "volatileField").unwrap()),
        Member::Method(reflex.method(fixture.test_class, "getStaticField", &[]).unwrap()),
        Member::Property(reflex.property(fixture.account, "nickname").unwrap()),
        reflex.function(fixture.account, "deposit", &[TypeId::INT]).unwrap(),
    ];

    let count = |p: &Predicate<Member>| members.iter().filter(|m| p.test(m)).count();

    assert_eq!(count(&member::is_volatile()), 1);
    assert_eq!(count(&member::is_static()), 1);
    assert_eq!(count(&member::is_lateinit()), 1);
    assert_eq!(count(&member::parameter_types(&[TypeId::INT])), 1);
    assert_eq!(count(&member::kind(MemberKind::Function)), 1);

    // Tautology and contradiction hold for every member
    let static_members = member::is_static();
    assert_eq!(count(&(static_members.clone() | !static_members.clone())), members.len());
    assert_eq!(count(&(static_members.clone() & !static_members)), 0);
}
