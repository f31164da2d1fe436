//! Schema model and configuration for schemadot.
//!
//! # Module Structure
//!
//! - [`kind`]: Entity kinds and their fixed order
//! - [`schema`]: Entities, field layouts and field definitions
//! - [`provider`]: The `SchemaProvider` trait the diagram engine reads through
//! - [`memory`]: A provider backed by a JSON/TOML schema snapshot
//! - [`config`]: Selection, diagram options, render options and settings

pub mod config;
pub mod kind;
pub mod memory;
pub mod provider;
pub mod schema;

pub use config::{
    CustomNode, DiagramOptions, HandleSelection, RenderOptions, SelectionConfig, Settings,
};
pub use kind::EntityKind;
pub use memory::{InMemorySchema, SchemaSnapshot, SnapshotLayout};
pub use provider::SchemaProvider;
pub use schema::{
    AssetField, BlockType, Entity, Field, FieldKind, FieldLayout, FieldTab, LayoutId, LayoutRef,
    MatrixField, PlainField, ProductField, RelationField, RelationTarget, SourceList, Sources,
    source_target,
};

pub use schemadot_error::{Error, ErrorKind, Result};
