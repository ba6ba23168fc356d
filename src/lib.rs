//! Resource Schema Converter
//!
//! Converts resource definitions in a service model into provisioning
//! resource schemas: JSON documents describing typed resources with
//! identifiers, property mutability constraints, and per-property JSON
//! schemas.
//!
//! The conversion derives each resource's property table from its
//! identifiers and lifecycle operations (whether a member is read-only,
//! create-only, write-only, or fully mutable follows from where it appears),
//! then assembles the document through a pipeline of mapper stages.
//!
//! # Example
//!
//! ```
//! use resource_schema::{load_model_str, ConverterConfig, ResourceSchemaConverter};
//!
//! let model = load_model_str(r##"{
//!     "shapes": {
//!         "example.media#MediaService": {
//!             "type": "service",
//!             "resources": ["example.media#Track"]
//!         },
//!         "example.media#Track": {
//!             "type": "resource",
//!             "identifiers": { "trackId": "example.media#TrackId" },
//!             "read": "example.media#GetTrack",
//!             "traits": {
//!                 "provision#resource": { "name": "Track" },
//!                 "api#documentation": "An audio track."
//!             }
//!         },
//!         "example.media#GetTrack": {
//!             "type": "operation",
//!             "input": "example.media#GetTrackRequest",
//!             "output": "example.media#GetTrackResponse"
//!         },
//!         "example.media#GetTrackRequest": {
//!             "type": "structure",
//!             "members": { "trackId": { "target": "example.media#TrackId" } }
//!         },
//!         "example.media#GetTrackResponse": {
//!             "type": "structure",
//!             "members": { "title": { "target": "example.media#Title" } }
//!         },
//!         "example.media#TrackId": { "type": "string" },
//!         "example.media#Title": { "type": "string" }
//!     }
//! }"##).unwrap();
//!
//! let config: ConverterConfig = serde_json::from_value(serde_json::json!({
//!     "organizationName": "Example",
//!     "service": "example.media#MediaService"
//! })).unwrap();
//!
//! let schemas = ResourceSchemaConverter::new(config).convert(&model).unwrap();
//! assert_eq!(schemas[0].type_name(), "Example::MediaService::Track");
//! assert_eq!(schemas[0].primary_identifier(), ["/properties/TrackId"]);
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod index;
pub mod json_schema;
pub mod loader;
pub mod mappers;
pub mod model;
pub mod schema;
pub mod traits;

pub use config::{ConverterConfig, DEFINITIONS_POINTER};
pub use converter::{file_name_for_type, Context, ResourceSchemaConverter};
pub use error::ConvertError;
pub use index::{ConstraintSet, ConstraintType, ResourceIndex, ResourcePropertyDefinition};
pub use json_schema::{JsonSchemaConverter, SchemaDocument};
pub use loader::{load_config, load_model, load_model_str};
pub use mappers::{core_mappers, SchemaMapper};
pub use model::{Model, ShapeId};
pub use schema::{Handler, Property, ResourceSchema, ResourceSchemaBuilder};
