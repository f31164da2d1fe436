//! Schema provider backed by an in-memory snapshot.
//!
//! A snapshot is the platform's schema exported to JSON or TOML. The CLI renders
//! diagrams from snapshots; tests build them programmatically.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use schemadot_error::{Error, ErrorKind, Result};

use crate::kind::EntityKind;
use crate::provider::SchemaProvider;
use crate::schema::{Entity, FieldLayout, LayoutId};

/// Serialized form of a schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub layouts: Vec<SnapshotLayout>,
    /// Enabled optional modules, e.g. `commerce`.
    #[serde(default)]
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotLayout {
    pub id: LayoutId,
    #[serde(flatten)]
    pub layout: FieldLayout,
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySchema {
    entities: Vec<Entity>,
    layouts: HashMap<LayoutId, FieldLayout>,
    modules: HashSet<String>,
}

impl InMemorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: SchemaSnapshot) -> Self {
        let mut schema = Self::new();
        for entity in snapshot.entities {
            schema.add_entity(entity);
        }
        for entry in snapshot.layouts {
            schema.add_layout(entry.id, entry.layout);
        }
        schema.modules.extend(snapshot.modules);
        schema
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let snapshot: SchemaSnapshot = serde_json::from_str(text).map_err(|err| {
            Error::new(ErrorKind::DeserializationFailed, "invalid schema snapshot JSON")
                .with_operation("memory::from_json_str")
                .set_source(err)
        })?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let snapshot: SchemaSnapshot = toml::from_str(text).map_err(|err| {
            Error::new(ErrorKind::DeserializationFailed, "invalid schema snapshot TOML")
                .with_operation("memory::from_toml_str")
                .set_source(err)
        })?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a snapshot file; `.toml` files are read as TOML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| Error::from(err).with_context("path", path.display().to_string()))?;
        let loaded = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            _ => Self::from_json_str(&text),
        };
        let schema = loaded.map_err(|err| err.with_context("path", path.display().to_string()))?;
        debug!(
            path = %path.display(),
            entities = schema.entities.len(),
            layouts = schema.layouts.len(),
            "schema snapshot loaded"
        );
        Ok(schema)
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn add_layout(&mut self, id: LayoutId, layout: FieldLayout) {
        self.layouts.insert(id, layout);
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.add_entity(entity);
        self
    }

    pub fn with_layout(mut self, id: LayoutId, layout: FieldLayout) -> Self {
        self.add_layout(id, layout);
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.modules.insert(module.into());
        self
    }

    /// Export the current contents as a snapshot (layouts sorted by id).
    pub fn to_snapshot(&self) -> SchemaSnapshot {
        let mut layouts: Vec<SnapshotLayout> = self
            .layouts
            .iter()
            .map(|(id, layout)| SnapshotLayout {
                id: *id,
                layout: layout.clone(),
            })
            .collect();
        layouts.sort_by_key(|entry| entry.id);

        let mut modules: Vec<String> = self.modules.iter().cloned().collect();
        modules.sort();

        SchemaSnapshot {
            entities: self.entities.clone(),
            layouts,
            modules,
        }
    }
}

impl SchemaProvider for InMemorySchema {
    fn list_all(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        Ok(self
            .entities
            .iter()
            .filter(|entity| entity.kind == kind)
            .cloned()
            .collect())
    }

    fn get_by_handle(&self, kind: EntityKind, handle: &str) -> Result<Option<Entity>> {
        Ok(self
            .entities
            .iter()
            .find(|entity| entity.kind == kind && entity.handle == handle)
            .cloned())
    }

    fn field_layout(&self, id: LayoutId) -> Result<Option<FieldLayout>> {
        Ok(self.layouts.get(&id).cloned())
    }

    fn is_module_enabled(&self, module: &str) -> bool {
        self.modules.contains(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldTab, LayoutRef};

    fn sample() -> InMemorySchema {
        InMemorySchema::new()
            .with_entity(
                Entity::new(EntityKind::Section, "s-news", "news", "News")
                    .with_layout(LayoutRef::labelled("Article", LayoutId(1))),
            )
            .with_entity(Entity::new(EntityKind::UserGroup, "g-ed", "editors", "Editors"))
            .with_layout(
                LayoutId(1),
                FieldLayout {
                    tabs: vec![FieldTab {
                        name: "Content".to_string(),
                        fields: vec![Field::plain("title", "Title")],
                    }],
                },
            )
    }

    #[test]
    fn test_lookup_by_kind_and_handle() {
        let schema = sample();
        assert_eq!(schema.list_all(EntityKind::Section).unwrap().len(), 1);
        assert!(schema.list_all(EntityKind::TagGroup).unwrap().is_empty());
        assert!(
            schema
                .get_by_handle(EntityKind::UserGroup, "editors")
                .unwrap()
                .is_some()
        );
        // Handles are scoped to their kind.
        assert!(
            schema
                .get_by_handle(EntityKind::Section, "editors")
                .unwrap()
                .is_none()
        );
        assert!(schema.field_layout(LayoutId(1)).unwrap().is_some());
        assert!(schema.field_layout(LayoutId(2)).unwrap().is_none());
    }

    #[test]
    fn test_module_gating() {
        let schema = sample();
        assert!(!schema.is_kind_available(EntityKind::ProductType));
        assert!(schema.is_kind_available(EntityKind::Section));

        let schema = schema.with_module("commerce");
        assert!(schema.is_kind_available(EntityKind::ProductType));
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let schema = sample();
        let json = serde_json::to_string(&schema.to_snapshot()).unwrap();
        let reloaded = InMemorySchema::from_json_str(&json).unwrap();
        assert_eq!(reloaded.to_snapshot().entities, schema.to_snapshot().entities);
        assert!(reloaded.field_layout(LayoutId(1)).unwrap().is_some());
    }

    #[test]
    fn test_load_toml_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.toml");
        fs::write(
            &path,
            r#"
            modules = ["commerce"]

            [[entities]]
            uid = "s-news"
            handle = "news"
            name = "News"
            kind = "section"
            type = "channel"
            layouts = [{ label = "Article", layoutId = 1 }]

            [[layouts]]
            id = 1

            [[layouts.tabs]]
            name = "Content"
            fields = [
                { handle = "title", name = "Title", type = "plain" },
                { handle = "related", name = "Related", type = "relation", target = "entries", sources = "*" },
            ]
            "#,
        )
        .unwrap();

        let schema = InMemorySchema::from_path(&path).unwrap();
        assert!(schema.is_module_enabled("commerce"));
        let news = schema.get_by_handle(EntityKind::Section, "news").unwrap().unwrap();
        assert_eq!(news.category_row(), "CHANNEL");
        let layout = schema.field_layout(LayoutId(1)).unwrap().unwrap();
        let handles: Vec<_> = layout.fields().map(|f| f.handle.as_str()).collect();
        assert_eq!(handles, vec!["title", "related"]);
        assert!(layout.fields().nth(1).unwrap().is_relation());
    }

    #[test]
    fn test_missing_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = InMemorySchema::from_path(dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }

    #[test]
    fn test_invalid_json_is_deserialization_error() {
        let err = InMemorySchema::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
    }
}
