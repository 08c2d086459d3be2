//! Message schema model and registry for the LangNet record codec.
//!
//! A schema describes message types as ordered sets of typed, tagged fields,
//! plus closed enum types. Definitions are collected with [`MessageBuilder`]
//! and [`EnumBuilder`], checked once by [`RegistryBuilder::build`], and then
//! served read-only by the resulting [`Registry`] handle.
//!
//! # Example
//!
//! ```
//! use langnet_schema::{FieldDescriptor, MessageBuilder, Registry, ScalarKind};
//!
//! let registry = Registry::builder()
//!     .message(
//!         MessageBuilder::new("demo.Point")
//!             .field(FieldDescriptor::new("x", 1, ScalarKind::SInt32))
//!             .field(FieldDescriptor::new("y", 2, ScalarKind::SInt32)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let point = registry.resolve("demo.Point").unwrap();
//! assert_eq!(point.field_by_tag(2).unwrap().name, "y");
//! assert!(registry.resolve("demo.Line").is_err());
//! ```

pub mod builder;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod kind;
pub mod langnet;
pub mod naming;
pub mod registry;

pub use builder::{EnumBuilder, MessageBuilder};
pub use constants::{MAX_TAG, RESERVED_TAGS};
pub use descriptor::{DefaultValue, EnumSchema, EnumValue, FieldDescriptor, MessageSchema};
pub use error::SchemaError;
pub use kind::{FieldType, Label, ScalarKind, WireKind};
pub use naming::to_json_name;
pub use registry::{Registry, RegistryBuilder};
