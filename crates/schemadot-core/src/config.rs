//! Selection and rendering configuration.
//!
//! Keys are camelCase and flags accept `0`/`1` as well as booleans, matching
//! the settings files the content platform writes.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use schemadot_error::{Error, ErrorKind, Result};

use crate::kind::EntityKind;

// ============================================================================
// Handle selection
// ============================================================================

/// Which entities of one kind to include: the wildcard `"*"` or explicit handles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSelection", into = "RawSelection")]
pub enum HandleSelection {
    #[default]
    All,
    Handles(Vec<String>),
}

impl HandleSelection {
    pub fn none() -> Self {
        HandleSelection::Handles(Vec::new())
    }

    pub fn handles<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HandleSelection::Handles(handles.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, HandleSelection::All)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawSelection {
    Wildcard(String),
    Handles(Vec<String>),
}

impl TryFrom<RawSelection> for HandleSelection {
    type Error = String;

    fn try_from(raw: RawSelection) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSelection::Wildcard(value) if value == "*" => Ok(HandleSelection::All),
            RawSelection::Wildcard(value) => Err(format!(
                "expected an array of handles or the string \"*\", got \"{value}\""
            )),
            RawSelection::Handles(handles) => Ok(HandleSelection::Handles(handles)),
        }
    }
}

impl From<HandleSelection> for RawSelection {
    fn from(selection: HandleSelection) -> Self {
        match selection {
            HandleSelection::All => RawSelection::Wildcard("*".to_string()),
            HandleSelection::Handles(handles) => RawSelection::Handles(handles),
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Boolean switches controlling what the diagram contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagramOptions {
    #[serde(deserialize_with = "flag")]
    pub include_fields: bool,
    #[serde(deserialize_with = "flag")]
    pub include_only_relation_fields: bool,
    #[serde(deserialize_with = "flag")]
    pub expand_matrix_blocks: bool,
    #[serde(deserialize_with = "flag")]
    pub include_author: bool,
    #[serde(deserialize_with = "flag")]
    pub include_custom_nodes: bool,
    #[serde(deserialize_with = "flag")]
    pub include_custom_links: bool,
    /// Fail on selection handles the provider does not know instead of skipping them.
    #[serde(deserialize_with = "flag")]
    pub strict_handles: bool,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            include_fields: true,
            include_only_relation_fields: false,
            expand_matrix_blocks: true,
            include_author: false,
            include_custom_nodes: true,
            include_custom_links: true,
            strict_handles: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Int(value) => Ok(value != 0),
    }
}

/// Diagram-wide directives passed verbatim to the graph document header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Layout direction, e.g. `LR` or `TB`.
    pub rank_dir: String,
    /// Edge routing style, e.g. `splines`, `ortho`, `polyline`.
    pub splines: String,
    pub title: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            rank_dir: "LR".to_string(),
            splines: "splines".to_string(),
            title: "Site Diagram".to_string(),
        }
    }
}

// ============================================================================
// Selection configuration
// ============================================================================

/// User-declared node that does not come from the schema (e.g. a database table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomNode {
    pub name: String,
    /// Unique handle, also used as the node identity.
    pub handle: String,
    /// Free-form category label, e.g. `DATABASE TABLE`.
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Which schema entities to draw and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionConfig {
    pub sections: HandleSelection,
    pub categories: HandleSelection,
    pub user_groups: HandleSelection,
    pub globals: HandleSelection,
    pub tags: HandleSelection,
    pub volumes: HandleSelection,
    pub products: HandleSelection,
    /// Section (or custom node) handle to the user group handles that author it.
    pub author_map: BTreeMap<String, Vec<String>>,
    pub custom_nodes: Vec<CustomNode>,
    /// Link expressions of the form `element[:field] -> target`.
    pub custom_links: Vec<String>,
    pub options: DiagramOptions,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            sections: HandleSelection::All,
            categories: HandleSelection::All,
            user_groups: HandleSelection::All,
            globals: HandleSelection::All,
            tags: HandleSelection::All,
            volumes: HandleSelection::All,
            products: HandleSelection::none(),
            author_map: BTreeMap::new(),
            custom_nodes: Vec::new(),
            custom_links: Vec::new(),
            options: DiagramOptions::default(),
        }
    }
}

impl SelectionConfig {
    /// A selection that includes nothing; add kinds with [`with`](Self::with).
    pub fn empty() -> Self {
        Self {
            sections: HandleSelection::none(),
            categories: HandleSelection::none(),
            user_groups: HandleSelection::none(),
            globals: HandleSelection::none(),
            tags: HandleSelection::none(),
            volumes: HandleSelection::none(),
            products: HandleSelection::none(),
            ..Self::default()
        }
    }

    pub fn selection(&self, kind: EntityKind) -> &HandleSelection {
        match kind {
            EntityKind::Section => &self.sections,
            EntityKind::CategoryGroup => &self.categories,
            EntityKind::UserGroup => &self.user_groups,
            EntityKind::GlobalSet => &self.globals,
            EntityKind::TagGroup => &self.tags,
            EntityKind::Volume => &self.volumes,
            EntityKind::ProductType => &self.products,
        }
    }

    pub fn selection_mut(&mut self, kind: EntityKind) -> &mut HandleSelection {
        match kind {
            EntityKind::Section => &mut self.sections,
            EntityKind::CategoryGroup => &mut self.categories,
            EntityKind::UserGroup => &mut self.user_groups,
            EntityKind::GlobalSet => &mut self.globals,
            EntityKind::TagGroup => &mut self.tags,
            EntityKind::Volume => &mut self.volumes,
            EntityKind::ProductType => &mut self.products,
        }
    }

    pub fn with(mut self, kind: EntityKind, selection: HandleSelection) -> Self {
        *self.selection_mut(kind) = selection;
        self
    }

    pub fn with_options(mut self, options: DiagramOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_author<I, S>(mut self, handle: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.author_map
            .insert(handle.into(), groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_custom_node(mut self, node: CustomNode) -> Self {
        self.custom_nodes.push(node);
        self
    }

    pub fn with_custom_link(mut self, link: impl Into<String>) -> Self {
        self.custom_links.push(link.into());
        self
    }

    /// Author group handles for an entity handle; empty when unmapped.
    pub fn authors_of(&self, handle: &str) -> &[String] {
        self.author_map
            .get(handle)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for node in &self.custom_nodes {
            if node.handle.is_empty() {
                return Err(Error::config_invalid("custom node handle must not be empty")
                    .with_operation("config::validate")
                    .with_context("name", node.name.clone()));
            }
            if !seen.insert(node.handle.as_str()) {
                return Err(Error::config_invalid(format!(
                    "custom node handle '{}' is declared more than once",
                    node.handle
                ))
                .with_operation("config::validate")
                .with_context("handle", node.handle.clone()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Caller-supplied defaults: the selection used when none is given, the default
/// render options, and named predefined selections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(flatten)]
    pub selection: SelectionConfig,
    pub dot_options: RenderOptions,
    pub doc_groups: BTreeMap<String, SelectionConfig>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text).map_err(|err| {
            Error::new(ErrorKind::ConfigInvalid, err.message().to_string())
                .with_operation("config::from_toml_str")
                .set_source(err)
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text).map_err(|err| {
            Error::new(ErrorKind::ConfigInvalid, err.to_string())
                .with_operation("config::from_json_str")
                .set_source(err)
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings; `.json` files are read as JSON, anything else as TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| Error::from(err).with_context("path", path.display().to_string()))?;
        let loaded = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        };
        loaded.map_err(|err| err.with_context("path", path.display().to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.selection.validate()?;
        for (name, group) in &self.doc_groups {
            group
                .validate()
                .map_err(|err| err.with_context("doc_group", name.clone()))?;
        }
        Ok(())
    }

    /// A named predefined selection.
    pub fn doc_group(&self, name: &str) -> Result<&SelectionConfig> {
        self.doc_groups
            .get(name)
            .ok_or_else(|| Error::handle_not_found("doc group", name))
    }
}
