//! Schema Registry
//!
//! Process-wide lookup table from schema id to schema. The shared instance is
//! created on first call to [`schemas`] and lives for the rest of the process.
//!
//! Registering never checks for an existing entry: a second schema with the
//! same id silently replaces the first. Use
//! [`SchemaRegistry::register_if_absent`] when the first registration must win.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::RegistryConfig;
use crate::schema::Schema;

static SCHEMA_REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// Return the registry that holds all registered schemas
///
/// The first call creates it; concurrent first callers wait for that one
/// initialization and every caller receives the same instance.
pub fn schemas() -> &'static SchemaRegistry {
    SCHEMA_REGISTRY.get_or_init(|| {
        debug!("initializing process schema registry");
        SchemaRegistry::new()
    })
}

/// Create the process-wide registry with the given settings
///
/// Only the first initialization wins. Returns `false` if the registry already
/// exists, either from an earlier call or because [`schemas`] ran first; the
/// existing registry keeps its settings.
pub fn init_schemas(config: RegistryConfig) -> bool {
    let mut initialized = false;
    SCHEMA_REGISTRY.get_or_init(|| {
        debug!(log_overwrites = config.log_overwrites, "initializing process schema registry");
        initialized = true;
        SchemaRegistry::with_config(config)
    });
    initialized
}

/// Map from schema id to shared schema
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    db: RwLock<HashMap<String, Arc<Schema>>>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create an empty registry, independent of the process-wide one
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            db: RwLock::default(),
            config,
        }
    }

    /// Settings this registry was created with
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Relate the schema with its id, replacing any schema already under that id
    pub fn register(&self, schema: impl Into<Arc<Schema>>) {
        let schema = schema.into();
        let id = schema.id().to_string();
        let previous = self.db.write().insert(id.clone(), Arc::clone(&schema));

        match previous {
            Some(old) if self.config.log_overwrites && !Arc::ptr_eq(&old, &schema) => {
                match (old.checksum(), schema.checksum()) {
                    (Ok(old_sum), Ok(new_sum)) if old_sum == new_sum => {
                        trace!(schema_id = %id, "schema re-registered with identical content")
                    }
                    (Ok(old_sum), Ok(new_sum)) => debug!(
                        schema_id = %id,
                        old = old_sum.short(),
                        new = new_sum.short(),
                        "schema overwritten with different content"
                    ),
                    _ => debug!(schema_id = %id, "schema overwritten, checksum unavailable"),
                }
            }
            Some(_) => trace!(schema_id = %id, "schema re-registered"),
            None => debug!(schema_id = %id, attributes = schema.attributes().len(), "schema registered"),
        }
    }

    /// Register only if no schema is related to the id yet
    ///
    /// Returns whether the schema was inserted.
    pub fn register_if_absent(&self, schema: impl Into<Arc<Schema>>) -> bool {
        let schema = schema.into();
        let mut db = self.db.write();
        if db.contains_key(schema.id()) {
            trace!(schema_id = schema.id(), "schema already registered, keeping existing");
            return false;
        }
        debug!(schema_id = schema.id(), attributes = schema.attributes().len(), "schema registered");
        db.insert(schema.id().to_string(), schema);
        true
    }

    /// Get the schema related to the id, if any
    pub fn get(&self, schema_id: &str) -> Option<Arc<Schema>> {
        let found = self.db.read().get(schema_id).cloned();
        trace!(schema_id, found = found.is_some(), "schema lookup");
        found
    }

    pub fn contains(&self, schema_id: &str) -> bool {
        self.db.read().contains_key(schema_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{Attribute, AttributeType};
    use tracing_test::traced_test;

    fn schema(id: &str, name: &str) -> Schema {
        Schema::new(id, name, "", vec![Attribute::new("value", AttributeType::String)])
    }

    #[test]
    fn test_get_registered() {
        let registry = SchemaRegistry::new();
        registry.register(schema("user-v1", "User"));

        let found = registry.get("user-v1").unwrap();
        assert_eq!(found.name(), "User");
        assert!(registry.contains("user-v1"));
    }

    #[test]
    fn test_get_missing() {
        let registry = SchemaRegistry::new();
        registry.register(schema("user-v1", "User"));
        assert!(registry.get("nonexistent-id").is_none());
        assert!(!registry.contains("nonexistent-id"));
    }

    #[test]
    #[traced_test]
    fn test_overwrite() {
        let registry = SchemaRegistry::new();
        registry.register(schema("dup", "First"));
        registry.register(schema("dup", "Second"));
        assert_eq!(registry.get("dup").unwrap().name(), "Second");
        assert!(logs_contain("schema overwritten with different content"));
    }

    #[test]
    #[traced_test]
    fn test_identical_overwrite_is_quiet() {
        let registry = SchemaRegistry::new();
        registry.register(schema("same", "Same"));
        registry.register(schema("same", "Same"));
        assert_eq!(registry.get("same").unwrap().name(), "Same");
        assert!(logs_contain("schema re-registered with identical content"));
        assert!(!logs_contain("schema overwritten"));
    }

    #[test]
    #[traced_test]
    fn test_overwrite_without_logging() {
        let registry = SchemaRegistry::with_config(RegistryConfig { log_overwrites: false });
        assert!(!registry.config().log_overwrites);
        registry.register(schema("dup", "First"));
        registry.register(schema("dup", "Second"));
        assert_eq!(registry.get("dup").unwrap().name(), "Second");
        assert!(!logs_contain("schema overwritten"));
    }

    #[test]
    fn test_init_after_access_keeps_existing() {
        let registry = schemas();
        assert!(!init_schemas(RegistryConfig { log_overwrites: false }));
        assert!(std::ptr::eq(registry, schemas()));
        assert!(schemas().config().log_overwrites);
    }

    #[test]
    fn test_register_if_absent() {
        let registry = SchemaRegistry::new();
        assert!(registry.register_if_absent(schema("dup", "First")));
        assert!(!registry.register_if_absent(schema("dup", "Second")));
        assert_eq!(registry.get("dup").unwrap().name(), "First");
    }

    #[test]
    fn test_shares_registered_instance() {
        let registry = SchemaRegistry::new();
        let shared = Arc::new(schema("shared", "Shared"));
        registry.register(Arc::clone(&shared));

        let found = registry.get("shared").unwrap();
        assert!(Arc::ptr_eq(&found, &shared));

        registry.register(Arc::clone(&shared));
        assert!(Arc::ptr_eq(&registry.get("shared").unwrap(), &shared));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = SchemaRegistry::new();
        let b = SchemaRegistry::new();
        a.register(schema("only-a", "A"));
        assert!(b.get("only-a").is_none());
    }

    #[test]
    fn test_process_registry_identity() {
        let first = schemas() as *const SchemaRegistry;
        let handles: Vec<usize> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..8)
                .map(|_| s.spawn(|| schemas() as *const SchemaRegistry as usize))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });
        assert!(handles.iter().all(|&h| h == first as usize));
    }

    #[test]
    fn test_concurrent_register_and_get() {
        let registry = SchemaRegistry::new();
        std::thread::scope(|s| {
            for worker in 0..4 {
                let registry = &registry;
                s.spawn(move || {
                    for i in 0..50 {
                        let id = format!("schema-{worker}-{i}");
                        registry.register(schema(&id, "Concurrent"));
                        assert_eq!(registry.get(&id).unwrap().id(), id);
                    }
                });
            }
        });
        assert!(registry.contains("schema-3-49"));
    }
}
