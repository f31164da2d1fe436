//! Relation resolution: from a field's configured sources to graph edges.

use tracing::debug;

use schemadot_core::{EntityKind, FieldKind, SourceList, Sources, source_target};

use crate::graph::Edge;
use crate::selection::Universe;

/// Turns relation sources into edges, keeping only targets in the current selection.
pub struct RelationResolver<'a> {
    universe: &'a Universe,
}

impl<'a> RelationResolver<'a> {
    pub fn new(universe: &'a Universe) -> Self {
        Self { universe }
    }

    /// Effective source set of a relation-kind configuration.
    ///
    /// `kind` is the entity kind a wildcard expands to.
    pub fn source_set(&self, sources: &Sources, kind: EntityKind) -> Vec<String> {
        if !sources.allow_multiple_sources {
            return sources.source.iter().cloned().collect();
        }
        match &sources.sources {
            SourceList::All => self
                .universe
                .entities(kind)
                .iter()
                .filter_map(|entity| entity.source_token())
                .collect(),
            SourceList::One(source) => vec![source.clone()],
            SourceList::Many(list) => list.clone(),
        }
    }

    /// Sources of a field, dispatched on its kind. Non-relation kinds have none.
    pub fn field_sources(&self, kind: &FieldKind) -> Vec<String> {
        match kind {
            FieldKind::Relation(relation) => {
                self.source_set(&relation.sources, relation.target.entity_kind())
            }
            FieldKind::Assets(assets) => match assets.single_location() {
                Some(location) => vec![location.to_string()],
                None => self.source_set(&assets.sources, EntityKind::Volume),
            },
            FieldKind::Products(products) => {
                self.source_set(&products.sources, EntityKind::ProductType)
            }
            FieldKind::Matrix(_) | FieldKind::Plain(_) => Vec::new(),
        }
    }

    /// One edge from `owner:port` to the source's target, if the source is selected.
    pub fn resolve_link(&self, source: &str, owner: &str, port: &str) -> Option<Edge> {
        if !self.universe.contains_source(source) {
            debug!(source, owner, port, "relation target outside selection, dropped");
            return None;
        }
        let target = source_target(source)?;
        Some(Edge::from_port(owner, port, target))
    }

    /// All edges of a field owned by `owner` and addressed by `port`.
    pub fn field_edges(&self, kind: &FieldKind, owner: &str, port: &str) -> Vec<Edge> {
        self.field_sources(kind)
            .iter()
            .filter_map(|source| self.resolve_link(source, owner, port))
            .collect()
    }

    /// Authorship edges from `owner`'s author row to every listed, selected user group.
    pub fn author_edges(
        &self,
        owner: &str,
        groups: &[String],
        compass: Option<&'static str>,
    ) -> Vec<Edge> {
        groups
            .iter()
            .filter_map(|handle| self.universe.user_group(handle))
            .map(|group| {
                let edge = Edge::from_port(owner, "author", group.uid.clone());
                match compass {
                    Some(compass) => edge.with_compass(compass),
                    None => edge,
                }
            })
            .collect()
    }
}
