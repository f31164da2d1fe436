//! Schema model: entities, field layouts and field definitions.
//!
//! These are plain data types as returned by a [`SchemaProvider`](crate::SchemaProvider).
//! They serialize with camelCase keys so a schema snapshot can be exported from the
//! content platform and read back without translation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::EntityKind;

/// Identifier of a field layout inside the schema provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(pub u64);

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One concrete schema object: a section, category group, user group, global set,
/// tag group, asset volume or product type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Stable unique identifier, used as node identity.
    pub uid: String,
    pub handle: String,
    pub name: String,
    pub kind: EntityKind,
    /// Kind-specific discriminator, e.g. `channel` / `structure` / `single` for sections.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    /// Field layouts reachable from this entity, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layouts: Vec<LayoutRef>,
}

impl Entity {
    pub fn new(
        kind: EntityKind,
        uid: impl Into<String>,
        handle: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            handle: handle.into(),
            name: name.into(),
            kind,
            discriminator: None,
            layouts: Vec::new(),
        }
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }

    pub fn with_layout(mut self, layout: LayoutRef) -> Self {
        self.layouts.push(layout);
        self
    }

    /// Text of the category row under the node header.
    ///
    /// Sections show their own type upper-cased; every other kind shows its
    /// literal category label.
    pub fn category_row(&self) -> String {
        if self.kind.uses_own_discriminator()
            && let Some(discriminator) = self.discriminator.as_deref()
        {
            return discriminator.to_uppercase();
        }
        self.kind.category_label().to_string()
    }

    /// Relation source token that points at this entity, e.g. `section:<uid>`.
    pub fn source_token(&self) -> Option<String> {
        self.kind
            .source_prefix()
            .map(|prefix| format!("{prefix}:{}", self.uid))
    }
}

/// Reference from an entity to one of its field layouts.
///
/// A labelled reference is a sub-type layout (an entry type of a section); the
/// label is rendered as a separator row before its fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<LayoutId>,
}

impl LayoutRef {
    pub fn new(layout_id: LayoutId) -> Self {
        Self {
            label: None,
            layout_id: Some(layout_id),
        }
    }

    pub fn labelled(label: impl Into<String>, layout_id: LayoutId) -> Self {
        Self {
            label: Some(label.into()),
            layout_id: Some(layout_id),
        }
    }
}

/// Ordered sequence of tabs, each an ordered sequence of fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldLayout {
    #[serde(default)]
    pub tabs: Vec<FieldTab>,
}

impl FieldLayout {
    /// All fields across all tabs, in tab order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.tabs.iter().flat_map(|tab| tab.fields.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.iter().all(|tab| tab.fields.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldTab {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A field definition attached to a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub handle: String,
    /// Human display name, rendered greyed out next to the handle.
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    pub fn plain(handle: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            name: name.into(),
            kind: FieldKind::Plain(PlainField::default()),
        }
    }

    pub fn new(handle: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            handle: handle.into(),
            name: name.into(),
            kind,
        }
    }

    /// Whether this field can produce relation edges.
    pub fn is_relation(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Relation(_) | FieldKind::Assets(_) | FieldKind::Products(_)
        )
    }
}

/// Closed set of field kinds the diagram engine distinguishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    /// Reference to entries, categories, tags or users.
    Relation(RelationField),
    /// Reference to assets in storage volumes.
    Assets(AssetField),
    /// Reference to commerce products.
    Products(ProductField),
    /// Repeatable block field owning nested block types.
    Matrix(MatrixField),
    /// Anything without relation semantics.
    Plain(PlainField),
}

/// What a relation field points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationTarget {
    Entries,
    Categories,
    Tags,
    Users,
}

impl RelationTarget {
    /// Entity kind whose selected members a wildcard source expands to.
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            RelationTarget::Entries => EntityKind::Section,
            RelationTarget::Categories => EntityKind::CategoryGroup,
            RelationTarget::Tags => EntityKind::TagGroup,
            RelationTarget::Users => EntityKind::UserGroup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationField {
    pub target: RelationTarget,
    #[serde(flatten)]
    pub sources: Sources,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetField {
    #[serde(flatten)]
    pub sources: Sources,
    #[serde(default)]
    pub use_single_folder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_upload_location_source: Option<String>,
}

impl AssetField {
    /// The single upload location, when the field is restricted to one folder.
    pub fn single_location(&self) -> Option<&str> {
        if !self.use_single_folder {
            return None;
        }
        self.single_upload_location_source
            .as_deref()
            .filter(|source| !source.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductField {
    #[serde(flatten)]
    pub sources: Sources,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixField {
    #[serde(default)]
    pub block_types: Vec<BlockType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockType {
    pub handle: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<LayoutId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainField {
    /// Platform field type, kept for round-tripping snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
}

/// Source configuration shared by every relation-kind field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sources {
    #[serde(default = "default_allow_multiple_sources")]
    pub allow_multiple_sources: bool,
    /// Used when multiple sources are not allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Used when multiple sources are allowed.
    #[serde(default)]
    pub sources: SourceList,
}

fn default_allow_multiple_sources() -> bool {
    true
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            allow_multiple_sources: true,
            source: None,
            sources: SourceList::default(),
        }
    }
}

impl Sources {
    /// Single-source configuration.
    pub fn single(source: impl Into<String>) -> Self {
        Self {
            allow_multiple_sources: false,
            source: Some(source.into()),
            sources: SourceList::default(),
        }
    }

    /// Multi-source configuration.
    pub fn multiple(sources: SourceList) -> Self {
        Self {
            allow_multiple_sources: true,
            source: None,
            sources,
        }
    }
}

/// Allowed sources of a multi-source relation field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSourceList", into = "RawSourceList")]
pub enum SourceList {
    /// Every selected entity of the applicable kind.
    All,
    /// One explicit source, stored as a scalar by the platform.
    One(String),
    Many(Vec<String>),
}

impl Default for SourceList {
    fn default() -> Self {
        SourceList::Many(Vec::new())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawSourceList {
    One(String),
    Many(Vec<String>),
}

impl From<RawSourceList> for SourceList {
    fn from(raw: RawSourceList) -> Self {
        match raw {
            RawSourceList::One(value) if value == "*" => SourceList::All,
            RawSourceList::One(value) if value.is_empty() => SourceList::Many(Vec::new()),
            RawSourceList::One(value) => SourceList::One(value),
            RawSourceList::Many(values) => SourceList::Many(values),
        }
    }
}

impl From<SourceList> for RawSourceList {
    fn from(list: SourceList) -> Self {
        match list {
            SourceList::All => RawSourceList::One("*".to_string()),
            SourceList::One(value) => RawSourceList::One(value),
            SourceList::Many(values) => RawSourceList::Many(values),
        }
    }
}

/// Target identifier of a source token such as `section:<uid>`.
pub fn source_target(token: &str) -> Option<&str> {
    token
        .split_once(':')
        .map(|(_, target)| target)
        .filter(|target| !target.is_empty())
}
