//! Entity rendering: one resolved schema entity into one graph node.

use tracing::debug;

use schemadot_core::{Entity, Result, SchemaProvider, SelectionConfig};

use crate::field::{Accumulator, FieldRenderer};
use crate::graph::Edge;
use crate::label::{Node, Row};
use crate::relation::RelationResolver;

/// Authorship edges from entity nodes leave the east side of the author row.
const AUTHOR_COMPASS: &str = "e";

pub struct EntityRenderer<'a, P: SchemaProvider + ?Sized> {
    config: &'a SelectionConfig,
    resolver: &'a RelationResolver<'a>,
    fields: FieldRenderer<'a, P>,
}

impl<'a, P: SchemaProvider + ?Sized> EntityRenderer<'a, P> {
    pub fn new(
        provider: &'a P,
        config: &'a SelectionConfig,
        resolver: &'a RelationResolver<'a>,
    ) -> Self {
        Self {
            config,
            resolver,
            fields: FieldRenderer::new(provider, &config.options, resolver),
        }
    }

    /// Build the node for `entity`, appending the edges it generates to `edges`.
    pub fn render(&self, entity: &Entity, edges: &mut Vec<Edge>) -> Result<Node> {
        let options = &self.config.options;
        let mut node = Node::new(&entity.uid, &entity.name, entity.category_row());
        let mut acc = Accumulator::default();

        let authors = self.config.authors_of(&entity.handle);
        if options.include_author && !authors.is_empty() {
            acc.rows.push(Row::Author);
            acc.edges.extend(
                self.resolver
                    .author_edges(&entity.uid, authors, Some(AUTHOR_COMPASS)),
            );
        }

        if options.include_fields {
            let relation_only = options.include_only_relation_fields;
            for layout_ref in &entity.layouts {
                if let Some(label) = &layout_ref.label
                    && !relation_only
                {
                    acc.rows.push(Row::SubType(label.clone()));
                }
                let layout = self.fields.load_layout(layout_ref.layout_id)?;
                for tab in &layout.tabs {
                    if !relation_only {
                        acc.rows.push(Row::Tab(tab.name.clone()));
                    }
                    self.fields.render_fields(&tab.fields, &entity.uid, &mut acc)?;
                }
            }
        }

        debug!(
            kind = %entity.kind,
            handle = %entity.handle,
            rows = acc.rows.len(),
            edges = acc.edges.len(),
            "entity rendered"
        );
        node.rows.extend(acc.rows);
        edges.extend(acc.edges);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadot_core::{
        DiagramOptions, EntityKind, Field, FieldLayout, FieldTab, InMemorySchema, LayoutId,
        LayoutRef,
    };

    use crate::selection::Universe;

    fn news() -> Entity {
        Entity::new(EntityKind::Section, "s1", "news", "News")
            .with_discriminator("channel")
            .with_layout(LayoutRef::labelled("Article", LayoutId(1)))
            .with_layout(LayoutRef::labelled("Missing", LayoutId(99)))
    }

    fn schema() -> InMemorySchema {
        InMemorySchema::new().with_layout(
            LayoutId(1),
            FieldLayout {
                tabs: vec![
                    FieldTab {
                        name: "Content".to_string(),
                        fields: vec![Field::plain("title", "Title"), Field::plain("body", "Body")],
                    },
                    FieldTab {
                        name: "Meta".to_string(),
                        fields: vec![Field::plain("summary", "Summary")],
                    },
                ],
            },
        )
    }

    fn universe() -> Universe {
        Universe::from_groups(vec![
            (EntityKind::Section, vec![news()]),
            (
                EntityKind::UserGroup,
                vec![Entity::new(EntityKind::UserGroup, "g1", "editors", "Editors")],
            ),
        ])
    }

    fn render(config: &SelectionConfig) -> (Node, Vec<Edge>) {
        let schema = schema();
        let universe = universe();
        let resolver = RelationResolver::new(&universe);
        let renderer = EntityRenderer::new(&schema, config, &resolver);
        let mut edges = Vec::new();
        let node = renderer.render(&news(), &mut edges).unwrap();
        (node, edges)
    }

    #[test]
    fn test_rows_in_layout_order() {
        let (node, edges) = render(&SelectionConfig::default());
        assert_eq!(node.id, "s1");
        assert_eq!(node.rows[0], Row::Title("News".to_string()));
        assert_eq!(node.rows[1], Row::Category("CHANNEL".to_string()));
        assert_eq!(node.rows[2], Row::SubType("Article".to_string()));
        assert_eq!(node.rows[3], Row::Tab("Content".to_string()));
        let ports: Vec<_> = node.rows.iter().filter_map(Row::port).collect();
        assert_eq!(ports, vec!["title", "body", "summary"]);
        // The unresolvable layout still gets its separator but no fields.
        assert_eq!(node.rows.last(), Some(&Row::SubType("Missing".to_string())));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_author_row_and_edge() {
        let config = SelectionConfig::default()
            .with_author("news", ["editors", "writers"])
            .with_options(DiagramOptions {
                include_author: true,
                include_fields: false,
                ..DiagramOptions::default()
            });
        let (node, edges) = render(&config);
        assert_eq!(node.rows.len(), 3);
        assert_eq!(node.rows[2], Row::Author);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].port.as_deref(), Some("author"));
        assert_eq!(edges[0].compass, Some("e"));
        assert_eq!(edges[0].to, "g1");
    }

    #[test]
    fn test_author_map_ignored_when_disabled() {
        let config = SelectionConfig::default().with_author("news", ["editors"]);
        let (node, edges) = render(&config);
        assert!(!node.has_port("author"));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_relation_only_drops_separators() {
        let config = SelectionConfig::default().with_options(DiagramOptions {
            include_only_relation_fields: true,
            ..DiagramOptions::default()
        });
        let (node, _) = render(&config);
        assert_eq!(node.rows.len(), 2);
        assert!(!node.rows.iter().any(Row::is_separator));
    }
}
