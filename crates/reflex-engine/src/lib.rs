//! Reflex Engine
//!
//! Declarative member resolution over the [`reflex_model`] object model:
//! - Composable predicates and per-category predicate builders
//! - Lazy traversal of type hierarchies and managed-member provenances
//! - A TTL- and size-bounded concurrent resolution cache
//! - The resolution engine ([`Reflex`]) and uniform dispatch ([`Invokable`])
//!
//! ```ignore
//! let reflex = Reflex::new(registry.clone());
//! let user = reflex.new_instance(user_type, &[])?;
//! reflex.set_field_value(&user, "ssn", Value::from("000-00-0000"))?;
//! let info = reflex.invoke(user.clone(), "getPrivateInfo", &[])?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cache;
pub mod config;
pub mod error;
pub mod invokable;
pub mod key;
pub mod member;
pub mod patch;
pub mod predicate;
pub mod predicates;
pub mod resolver;
pub mod scan;
pub mod traverser;

pub use cache::{MemberCache, TtlCache, DEFAULT_MAX_SIZE, DEFAULT_TTL};
pub use config::{CacheConfig, EngineConfig};
pub use error::{ReflectError, ReflectResult};
pub use invokable::Invokable;
pub use member::{Member, MemberKind};
pub use patch::{DenyPatcher, FieldPatcher, SlotPatcher};
pub use predicate::Predicate;
pub use resolver::{Reflex, ResolutionStats, Target};
pub use scan::{ClassNameSource, RegistryClassNames, StaticClassNames};
pub use traverser::{HierarchyTraverser, Provenance, ProvenanceTraverser, Traverser};
