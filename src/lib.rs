//! Attribute Schemas
//!
//! Named, identified collections of typed attributes, with a JSON codec and a
//! process-wide registry keyed by schema id.
//!
//! ## Features
//!
//! - **Ordered Attributes**: attribute order survives encode/decode round-trips
//! - **JSON Codec**: `id`, `name`, `description`, `attributes` on the wire
//! - **Process Registry**: created once on first access, safe to share across threads
//! - **Content Checksums**: SHA256 fingerprints of the canonical encoding
//!
//! ## Usage
//!
//! ```
//! use attribute_schemas::{schemas, Attribute, AttributeType, Schema};
//!
//! let user = Schema::builder("user-v1")
//!     .name("User")
//!     .description("user profile")
//!     .attribute(Attribute::new("userName", AttributeType::String).required())
//!     .build();
//!
//! schemas().register(user);
//!
//! let found = schemas().get("user-v1").expect("registered above");
//! found.for_each_attribute(|attr| println!("{}", attr.name));
//! assert!(schemas().get("user-v2").is_none());
//! ```

pub mod attribute;
pub mod checksum;
pub mod config;
pub mod error;
pub mod registry;
pub mod schema;

pub use attribute::{Attribute, AttributeType, Mutability, Returned, Uniqueness};
pub use checksum::Checksum;
pub use config::{DecodeConfig, RegistryConfig, SchemaConfig};
pub use error::{Result, SchemaError};
pub use registry::{init_schemas, schemas, SchemaRegistry};
pub use schema::{Schema, SchemaBuilder, SCHEMA_FIELDS};
