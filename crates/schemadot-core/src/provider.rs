//! The seam between the diagram engine and the content platform.

use schemadot_error::Result;

use crate::kind::EntityKind;
use crate::schema::{Entity, FieldLayout, LayoutId};

/// Read-only access to the platform's schema metadata.
///
/// The engine performs one read pass per generation run and never mutates
/// anything through this trait. Any `Err` returned here is terminal for the run,
/// except `ErrorKind::LayoutNotFound` from [`field_layout`](Self::field_layout),
/// which the engine treats as an empty layout.
pub trait SchemaProvider {
    /// Every entity of the given kind, in the platform's natural order.
    fn list_all(&self, kind: EntityKind) -> Result<Vec<Entity>>;

    /// The entity of the given kind with the given handle, if it exists.
    fn get_by_handle(&self, kind: EntityKind, handle: &str) -> Result<Option<Entity>>;

    /// Resolve a field layout by id.
    fn field_layout(&self, id: LayoutId) -> Result<Option<FieldLayout>>;

    /// Whether an optional platform module (e.g. `commerce`) is active.
    fn is_module_enabled(&self, module: &str) -> bool;

    /// Whether entities of `kind` may be queried at all.
    fn is_kind_available(&self, kind: EntityKind) -> bool {
        kind.required_module()
            .is_none_or(|module| self.is_module_enabled(module))
    }
}

impl<P: SchemaProvider + ?Sized> SchemaProvider for &P {
    fn list_all(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        (**self).list_all(kind)
    }

    fn get_by_handle(&self, kind: EntityKind, handle: &str) -> Result<Option<Entity>> {
        (**self).get_by_handle(kind, handle)
    }

    fn field_layout(&self, id: LayoutId) -> Result<Option<FieldLayout>> {
        (**self).field_layout(id)
    }

    fn is_module_enabled(&self, module: &str) -> bool {
        (**self).is_module_enabled(module)
    }
}
