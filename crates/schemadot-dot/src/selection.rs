//! Resolution of a selection configuration against the schema provider.

use std::collections::HashSet;

use tracing::{debug, warn};

use schemadot_core::{Entity, EntityKind, HandleSelection, SchemaProvider, SelectionConfig};
use schemadot_error::{Error, ErrorKind, Result};

/// The selected entities of one generation run, per kind, in fixed kind order.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    groups: Vec<(EntityKind, Vec<Entity>)>,
}

impl Universe {
    /// Query the provider once per kind.
    ///
    /// Unknown handles are skipped (or rejected when `strictHandles` is set).
    /// Repeated handles and repeated uids resolve to a single entity.
    #[tracing::instrument(skip_all)]
    pub fn resolve<P>(provider: &P, config: &SelectionConfig) -> Result<Self>
    where
        P: SchemaProvider + ?Sized,
    {
        let strict = config.options.strict_handles;
        let mut groups = Vec::new();

        for kind in EntityKind::all() {
            let selection = config.selection(kind);
            if !provider.is_kind_available(kind) {
                if strict && matches!(selection, HandleSelection::Handles(h) if !h.is_empty()) {
                    return Err(Error::new(
                        ErrorKind::ModuleDisabled,
                        format!("{kind} entities need a module that is not enabled"),
                    )
                    .with_operation("selection::resolve")
                    .with_context("kind", kind.to_string()));
                }
                debug!(%kind, "kind unavailable, skipping");
                groups.push((kind, Vec::new()));
                continue;
            }

            let entities = match selection {
                HandleSelection::All => provider
                    .list_all(kind)
                    .map_err(|err| err.with_operation("selection::resolve"))?,
                HandleSelection::Handles(handles) => {
                    let mut found = Vec::with_capacity(handles.len());
                    for handle in handles {
                        match provider
                            .get_by_handle(kind, handle)
                            .map_err(|err| err.with_operation("selection::resolve"))?
                        {
                            Some(entity) => found.push(entity),
                            None if strict => {
                                return Err(Error::handle_not_found(kind.to_string(), handle.as_str())
                                    .with_operation("selection::resolve"));
                            }
                            None => warn!(%kind, handle = %handle, "unknown handle, skipping"),
                        }
                    }
                    found
                }
            };

            groups.push((kind, entities));
        }

        let mut universe = Self { groups };
        universe.dedup();
        Ok(universe)
    }

    pub fn from_groups(groups: Vec<(EntityKind, Vec<Entity>)>) -> Self {
        let mut universe = Self { groups };
        universe.dedup();
        universe
    }

    fn dedup(&mut self) {
        let mut seen = HashSet::new();
        for (kind, entities) in &mut self.groups {
            entities.retain(|entity| {
                let first = seen.insert(entity.uid.clone());
                if !first {
                    debug!(%kind, uid = %entity.uid, "duplicate entity dropped");
                }
                first
            });
        }
    }

    /// Selected entities of one kind.
    pub fn entities(&self, kind: EntityKind) -> &[Entity] {
        self.groups
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, entities)| entities.as_slice())
            .unwrap_or_default()
    }

    /// All selected entities in fixed kind order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.groups.iter().flat_map(|(_, entities)| entities.iter())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, entities)| entities.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a relation source token names a selected entity.
    ///
    /// Kinds are checked in fixed order and the first match wins.
    pub fn contains_source(&self, token: &str) -> bool {
        self.iter()
            .any(|entity| entity.source_token().as_deref() == Some(token))
    }

    /// Whether a selected entity already uses `uid` as its node identity.
    pub fn contains_uid(&self, uid: &str) -> bool {
        self.iter().any(|entity| entity.uid == uid)
    }

    /// First selected entity with the given handle, searching kinds in fixed order.
    pub fn find_by_handle(&self, handle: &str) -> Option<&Entity> {
        self.iter().find(|entity| entity.handle == handle)
    }

    /// Selected user group with the given handle.
    pub fn user_group(&self, handle: &str) -> Option<&Entity> {
        self.entities(EntityKind::UserGroup)
            .iter()
            .find(|group| group.handle == handle)
    }
}
