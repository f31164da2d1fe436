//! Field rendering: one field definition into label rows and edges, recursing
//! into the block types of repeatable block fields.

use tracing::debug;

use schemadot_core::{
    DiagramOptions, Field, FieldKind, FieldLayout, LayoutId, MatrixField, SchemaProvider,
};
use schemadot_error::{ErrorKind, Result};

use crate::graph::Edge;
use crate::label::{Row, Sides};
use crate::relation::RelationResolver;

/// Rows and edges accumulated for one node.
#[derive(Debug, Default)]
pub struct Accumulator {
    pub rows: Vec<Row>,
    pub edges: Vec<Edge>,
}

/// Where a field sits inside its owning node.
#[derive(Debug, Clone, Copy)]
pub struct FieldPosition<'a> {
    /// Nesting depth; 0 for fields directly on a tab.
    pub depth: usize,
    /// Port of the enclosing block field, prefixed to this field's port.
    pub parent_port: Option<&'a str>,
    /// Whether this field's rows close the node's border.
    pub closes: bool,
}

impl FieldPosition<'_> {
    pub fn top_level(closes: bool) -> Self {
        Self {
            depth: 0,
            parent_port: None,
            closes,
        }
    }
}

pub struct FieldRenderer<'a, P: SchemaProvider + ?Sized> {
    provider: &'a P,
    options: &'a DiagramOptions,
    resolver: &'a RelationResolver<'a>,
}

impl<'a, P: SchemaProvider + ?Sized> FieldRenderer<'a, P> {
    pub fn new(
        provider: &'a P,
        options: &'a DiagramOptions,
        resolver: &'a RelationResolver<'a>,
    ) -> Self {
        Self {
            provider,
            options,
            resolver,
        }
    }

    /// Resolve a layout; a missing id or unknown layout yields an empty layout.
    pub fn load_layout(&self, id: Option<LayoutId>) -> Result<FieldLayout> {
        let Some(id) = id else {
            return Ok(FieldLayout::default());
        };
        match self.provider.field_layout(id) {
            Ok(Some(layout)) => Ok(layout),
            Ok(None) => {
                debug!(%id, "field layout not found, using empty layout");
                Ok(FieldLayout::default())
            }
            Err(err) if err.kind() == ErrorKind::LayoutNotFound => {
                debug!(%id, error = %err, "field layout not found, using empty layout");
                Ok(FieldLayout::default())
            }
            Err(err) => Err(err.with_operation("field::load_layout")),
        }
    }

    /// Render the fields of one tab, closing the border after the last one.
    pub fn render_fields(&self, fields: &[Field], owner: &str, acc: &mut Accumulator) -> Result<()> {
        for (index, field) in fields.iter().enumerate() {
            let closes = index + 1 == fields.len();
            self.render_field(field, FieldPosition::top_level(closes), owner, acc)?;
        }
        Ok(())
    }

    /// Render one field and, for expanded block fields, everything nested in it.
    pub fn render_field(
        &self,
        field: &Field,
        position: FieldPosition<'_>,
        owner: &str,
        acc: &mut Accumulator,
    ) -> Result<()> {
        let port = match position.parent_port {
            Some(parent) => format!("{parent}{}", field.handle),
            None => field.handle.clone(),
        };
        let relation_only = self.options.include_only_relation_fields;

        if field.is_relation() {
            acc.edges
                .extend(self.resolver.field_edges(&field.kind, owner, &port));
            let sides = if relation_only {
                Sides::Closed
            } else {
                Sides::closed_if(position.closes)
            };
            acc.rows.push(field_row(field, &port, position.depth, sides));
            return Ok(());
        }

        match &field.kind {
            FieldKind::Matrix(matrix) if self.options.expand_matrix_blocks => {
                if !relation_only {
                    acc.rows
                        .push(field_row(field, &port, position.depth, Sides::Open));
                }
                self.render_blocks(matrix, &port, position, owner, acc)
            }
            _ => {
                if !relation_only {
                    acc.rows.push(field_row(
                        field,
                        &port,
                        position.depth,
                        Sides::closed_if(position.closes),
                    ));
                }
                Ok(())
            }
        }
    }

    fn render_blocks(
        &self,
        matrix: &MatrixField,
        port: &str,
        position: FieldPosition<'_>,
        owner: &str,
        acc: &mut Accumulator,
    ) -> Result<()> {
        for (index, block_type) in matrix.block_types.iter().enumerate() {
            let last_block = index + 1 == matrix.block_types.len();
            if !self.options.include_only_relation_fields {
                acc.rows.push(Row::Block(block_type.name.clone()));
            }

            let layout = self.load_layout(block_type.layout_id)?;
            let fields: Vec<&Field> = layout.fields().collect();
            for (i, nested) in fields.iter().enumerate() {
                let nested_position = FieldPosition {
                    depth: position.depth + 1,
                    parent_port: Some(port),
                    closes: position.closes && last_block && i + 1 == fields.len(),
                };
                self.render_field(nested, nested_position, owner, acc)?;
            }
        }
        Ok(())
    }
}

fn field_row(field: &Field, port: &str, depth: usize, sides: Sides) -> Row {
    Row::Field {
        port: port.to_string(),
        handle: field.handle.clone(),
        name: field.name.clone(),
        depth,
        sides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadot_core::{
        BlockType, Entity, EntityKind, FieldTab, InMemorySchema, RelationField,
        RelationTarget, SourceList, Sources,
    };

    use schemadot_error::Error;

    use crate::selection::Universe;

    fn blocks_field() -> Field {
        Field::new(
            "blocks",
            "Blocks",
            FieldKind::Matrix(MatrixField {
                block_types: vec![
                    BlockType {
                        handle: "text".to_string(),
                        name: "Text".to_string(),
                        layout_id: Some(LayoutId(10)),
                    },
                    BlockType {
                        handle: "gallery".to_string(),
                        name: "Gallery".to_string(),
                        layout_id: Some(LayoutId(11)),
                    },
                ],
            }),
        )
    }

    fn schema() -> InMemorySchema {
        let related = Field::new(
            "link",
            "Link",
            FieldKind::Relation(RelationField {
                target: RelationTarget::Entries,
                sources: Sources::multiple(SourceList::All),
            }),
        );
        InMemorySchema::new()
            .with_layout(
                LayoutId(10),
                FieldLayout {
                    tabs: vec![FieldTab {
                        name: "Block".to_string(),
                        fields: vec![Field::plain("copy", "Copy"), related],
                    }],
                },
            )
            .with_layout(
                LayoutId(11),
                FieldLayout {
                    tabs: vec![FieldTab {
                        name: "Block".to_string(),
                        fields: vec![Field::plain("images", "Images")],
                    }],
                },
            )
    }

    fn universe() -> Universe {
        Universe::from_groups(vec![(
            EntityKind::Section,
            vec![Entity::new(EntityKind::Section, "s1", "news", "News")],
        )])
    }

    fn render(options: DiagramOptions, closes: bool) -> Accumulator {
        let schema = schema();
        let universe = universe();
        let resolver = RelationResolver::new(&universe);
        let renderer = FieldRenderer::new(&schema, &options, &resolver);
        let mut acc = Accumulator::default();
        renderer
            .render_field(&blocks_field(), FieldPosition::top_level(closes), "s1", &mut acc)
            .unwrap();
        acc
    }

    fn sides_of(rows: &[Row]) -> Vec<(Option<&str>, Option<Sides>)> {
        rows.iter().map(|row| (row.port(), row.sides())).collect()
    }

    #[test]
    fn test_expanded_blocks() {
        let acc = render(DiagramOptions::default(), true);
        assert_eq!(
            sides_of(&acc.rows),
            vec![
                (Some("blocks"), Some(Sides::Open)),
                (None, Some(Sides::Open)),
                (Some("blockscopy"), Some(Sides::Open)),
                (Some("blockslink"), Some(Sides::Open)),
                (None, Some(Sides::Open)),
                (Some("blocksimages"), Some(Sides::Closed)),
            ]
        );
        assert_eq!(acc.rows.iter().filter(|r| r.is_separator()).count(), 2);
        assert_eq!(acc.edges, vec![Edge::from_port("s1", "blockslink", "s1")]);
    }

    #[test]
    fn test_nested_rows_stay_open_when_block_field_is_not_last() {
        let acc = render(DiagramOptions::default(), false);
        assert!(acc.rows.iter().all(|row| row.sides() != Some(Sides::Closed)));
    }

    #[test]
    fn test_collapsed_blocks() {
        let options = DiagramOptions {
            expand_matrix_blocks: false,
            ..DiagramOptions::default()
        };
        let acc = render(options, true);
        assert_eq!(sides_of(&acc.rows), vec![(Some("blocks"), Some(Sides::Closed))]);
        assert!(acc.edges.is_empty());
    }

    #[test]
    fn test_relation_only_keeps_nested_relations() {
        let options = DiagramOptions {
            include_only_relation_fields: true,
            ..DiagramOptions::default()
        };
        let acc = render(options, false);
        assert_eq!(sides_of(&acc.rows), vec![(Some("blockslink"), Some(Sides::Closed))]);
        assert_eq!(acc.edges.len(), 1);
    }

    struct BrokenLayouts;

    impl SchemaProvider for BrokenLayouts {
        fn list_all(&self, _kind: EntityKind) -> Result<Vec<Entity>> {
            Ok(Vec::new())
        }

        fn get_by_handle(&self, _kind: EntityKind, _handle: &str) -> Result<Option<Entity>> {
            Ok(None)
        }

        fn field_layout(&self, id: LayoutId) -> Result<Option<FieldLayout>> {
            if id == LayoutId(10) {
                Err(Error::layout_not_found(id.to_string()))
            } else {
                Err(Error::provider_unavailable("database is down"))
            }
        }

        fn is_module_enabled(&self, _module: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_layout_failures() {
        let universe = universe();
        let resolver = RelationResolver::new(&universe);
        let options = DiagramOptions::default();
        let renderer = FieldRenderer::new(&BrokenLayouts, &options, &resolver);

        assert!(renderer.load_layout(None).unwrap().is_empty());
        assert!(renderer.load_layout(Some(LayoutId(10))).unwrap().is_empty());
        let err = renderer.load_layout(Some(LayoutId(11))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);
        assert_eq!(err.operation(), "field::load_layout");
    }
}
