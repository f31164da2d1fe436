use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// The kinds of schema entity that can appear in a diagram.
///
/// Declaration order is the fixed kind order: nodes are emitted grouped by kind
/// in this order, and relation sources are matched against kinds in this order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Section,
    CategoryGroup,
    UserGroup,
    GlobalSet,
    TagGroup,
    Volume,
    ProductType,
}

impl EntityKind {
    /// All kinds in the fixed kind order.
    pub fn all() -> impl Iterator<Item = EntityKind> {
        EntityKind::iter()
    }

    /// Key used for this kind in a selection configuration.
    pub fn config_key(&self) -> &'static str {
        match self {
            EntityKind::Section => "sections",
            EntityKind::CategoryGroup => "categories",
            EntityKind::UserGroup => "userGroups",
            EntityKind::GlobalSet => "globals",
            EntityKind::TagGroup => "tags",
            EntityKind::Volume => "volumes",
            EntityKind::ProductType => "products",
        }
    }

    /// Literal category row for kinds that do not carry their own discriminator.
    pub fn category_label(&self) -> &'static str {
        match self {
            EntityKind::Section => "SECTION",
            EntityKind::CategoryGroup => "CATEGORY GROUP",
            EntityKind::UserGroup => "USER GROUP",
            EntityKind::GlobalSet => "GLOBAL",
            EntityKind::TagGroup => "TAG GROUP",
            EntityKind::Volume => "ASSET VOLUME",
            EntityKind::ProductType => "PRODUCT TYPE",
        }
    }

    /// Prefix of relation source tokens that point at this kind, e.g. `section:<uid>`.
    ///
    /// Global sets can never be a relation source.
    pub fn source_prefix(&self) -> Option<&'static str> {
        match self {
            EntityKind::Section => Some("section"),
            EntityKind::CategoryGroup | EntityKind::UserGroup | EntityKind::TagGroup => {
                Some("group")
            }
            EntityKind::Volume => Some("volume"),
            EntityKind::ProductType => Some("productType"),
            EntityKind::GlobalSet => None,
        }
    }

    /// Optional platform module that must be enabled before this kind is queried.
    pub fn required_module(&self) -> Option<&'static str> {
        match self {
            EntityKind::ProductType => Some("commerce"),
            _ => None,
        }
    }

    /// Whether the category row uses the entity's own discriminator, upper-cased.
    pub fn uses_own_discriminator(&self) -> bool {
        matches!(self, EntityKind::Section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_kind_order() {
        let keys: Vec<_> = EntityKind::all().map(|k| k.config_key()).collect();
        assert_eq!(
            keys,
            vec![
                "sections",
                "categories",
                "userGroups",
                "globals",
                "tags",
                "volumes",
                "products"
            ]
        );
    }

    #[test]
    fn test_source_prefixes() {
        assert_eq!(EntityKind::Section.source_prefix(), Some("section"));
        assert_eq!(EntityKind::TagGroup.source_prefix(), Some("group"));
        assert_eq!(EntityKind::ProductType.source_prefix(), Some("productType"));
        assert_eq!(EntityKind::GlobalSet.source_prefix(), None);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "category_group".parse::<EntityKind>().ok(),
            Some(EntityKind::CategoryGroup)
        );
        assert_eq!(EntityKind::UserGroup.to_string(), "user_group");
    }
}
