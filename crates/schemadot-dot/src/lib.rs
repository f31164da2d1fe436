//! Diagram generation engine producing DOT format output.
//!
//! This crate turns a selection of content platform schema entities into an
//! entity relationship diagram. Each entity becomes one HTML-table node, each
//! relation field becomes edges leaving the field's port.
//!
//! # Module Structure
//!
//! - [`dot`]: DOT format utilities and helpers
//! - [`label`]: Label rows and HTML table labels
//! - [`graph`]: Nodes, edges and document serialization
//! - [`selection`]: Resolving a selection against the schema provider
//! - [`relation`]: Relation sources to edges
//! - [`field`]: Field rows, including expanded block fields
//! - [`entity`]: Entity nodes
//! - [`custom`]: Custom nodes and custom link expressions

pub mod custom;
pub mod dot;
pub mod entity;
pub mod field;
pub mod graph;
pub mod label;
pub mod relation;
pub mod selection;

use tracing::info;

use schemadot_core::{RenderOptions, Result, SchemaProvider, SelectionConfig, Settings};

pub use custom::{CustomLink, CustomMerger};
pub use dot::DotBuilder;
pub use entity::EntityRenderer;
pub use graph::{Edge, Graph};
pub use label::{Node, Row, Sides};
pub use relation::RelationResolver;
pub use selection::Universe;

// ============================================================================
// Public API
// ============================================================================

/// Generates diagrams from one schema provider.
///
/// Holds no state between runs; every call builds its own accumulators.
pub struct DiagramGenerator<'p, P: SchemaProvider + ?Sized> {
    provider: &'p P,
    settings: Settings,
}

impl<'p, P: SchemaProvider + ?Sized> DiagramGenerator<'p, P> {
    /// Create a generator whose fallbacks come from `settings`.
    pub fn new(provider: &'p P, settings: Settings) -> Self {
        Self { provider, settings }
    }

    pub fn with_defaults(provider: &'p P) -> Self {
        Self::new(provider, Settings::default())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve the selection and build every node and edge.
    pub fn build_graph(&self, config: &SelectionConfig) -> Result<Graph> {
        let universe = Universe::resolve(self.provider, config)
            .map_err(|err| err.with_operation("generator::build_graph"))?;
        let resolver = RelationResolver::new(&universe);
        let renderer = EntityRenderer::new(self.provider, config, &resolver);

        let mut graph = Graph::default();
        for entity in universe.iter() {
            let node = renderer
                .render(entity, &mut graph.edges)
                .map_err(|err| err.with_operation("generator::build_graph"))?;
            graph.nodes.push(node);
        }

        let merger = CustomMerger::new(config, &universe, &resolver);
        for custom in merger.active_nodes() {
            let node = merger.render_node(custom, &mut graph.edges);
            graph.nodes.push(node);
        }
        graph.link_edges = merger.link_edges();

        info!(
            entities = universe.len(),
            nodes = graph.nodes.len(),
            edges = graph.edge_count(),
            "diagram built"
        );
        Ok(graph)
    }

    /// Generate the DOT document.
    ///
    /// `None` falls back to the settings' selection and render options.
    #[tracing::instrument(skip_all)]
    pub fn generate(
        &self,
        config: Option<&SelectionConfig>,
        render: Option<&RenderOptions>,
    ) -> Result<String> {
        let config = config.unwrap_or(&self.settings.selection);
        let render = render.unwrap_or(&self.settings.dot_options);
        let graph = self.build_graph(config)?;
        Ok(graph.render(render))
    }
}

/// Generate a DOT document with built-in defaults for anything not supplied.
pub fn render_diagram<P>(
    provider: &P,
    config: Option<&SelectionConfig>,
    render: Option<&RenderOptions>,
) -> Result<String>
where
    P: SchemaProvider + ?Sized,
{
    DiagramGenerator::with_defaults(provider).generate(config, render)
}
