//! Custom nodes and custom link expressions declared in the selection.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use schemadot_core::{CustomNode, SelectionConfig};

use crate::graph::Edge;
use crate::label::{Node, Row, Sides};
use crate::relation::RelationResolver;
use crate::selection::Universe;

/// `element[:field] -> target`, whitespace allowed around every token.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:\s]+?)\s*(?::\s*([^:\s]+?))?\s*->\s*([^\s]+)\s*$")
        .expect("custom link pattern is valid")
});

/// A parsed custom link expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomLink {
    pub element: String,
    pub field: Option<String>,
    pub target: String,
}

impl CustomLink {
    /// Parse `element[:field] -> target`; `None` when either side is missing.
    pub fn parse(expr: &str) -> Option<Self> {
        if expr.matches("->").count() != 1 {
            return None;
        }
        let caps = LINK_PATTERN.captures(expr)?;
        Some(Self {
            element: caps.get(1)?.as_str().to_string(),
            field: caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .filter(|field| !field.is_empty()),
            target: caps.get(3)?.as_str().to_string(),
        })
    }
}

/// Builds custom nodes and resolves custom links against the selection.
pub struct CustomMerger<'a> {
    config: &'a SelectionConfig,
    universe: &'a Universe,
    resolver: &'a RelationResolver<'a>,
    nodes: Vec<&'a CustomNode>,
}

impl<'a> CustomMerger<'a> {
    pub fn new(
        config: &'a SelectionConfig,
        universe: &'a Universe,
        resolver: &'a RelationResolver<'a>,
    ) -> Self {
        let nodes = if config.options.include_custom_nodes {
            valid_nodes(&config.custom_nodes, universe)
        } else {
            Vec::new()
        };
        Self {
            config,
            universe,
            resolver,
            nodes,
        }
    }

    /// Custom nodes that take part in this run, in declaration order.
    pub fn active_nodes(&self) -> &[&'a CustomNode] {
        &self.nodes
    }

    /// Render one custom node with the same row rules as entity nodes.
    pub fn render_node(&self, custom: &CustomNode, edges: &mut Vec<Edge>) -> Node {
        let options = &self.config.options;
        let mut node = Node::new(&custom.handle, &custom.name, &custom.category);

        let authors = self.config.authors_of(&custom.handle);
        if options.include_author && !authors.is_empty() {
            node.push(Row::Author);
            edges.extend(self.resolver.author_edges(&custom.handle, authors, None));
        }

        if options.include_fields {
            for (index, name) in custom.fields.iter().enumerate() {
                node.push(Row::CustomField {
                    name: name.clone(),
                    sides: Sides::closed_if(index + 1 == custom.fields.len()),
                });
            }
        }
        node
    }

    /// Identity of a handle: selected entities in fixed kind order, then custom nodes.
    pub fn identity_of(&self, handle: &str) -> Option<&'a str> {
        if let Some(entity) = self.universe.find_by_handle(handle) {
            return Some(entity.uid.as_str());
        }
        self.nodes
            .iter()
            .find(|node| node.handle == handle)
            .map(|node| node.handle.as_str())
    }

    /// Edges for every well-formed, resolvable link expression.
    pub fn link_edges(&self) -> Vec<Edge> {
        if !self.config.options.include_custom_links {
            return Vec::new();
        }
        self.config
            .custom_links
            .iter()
            .filter_map(|expr| self.resolve_link(expr))
            .collect()
    }

    fn resolve_link(&self, expr: &str) -> Option<Edge> {
        let Some(link) = CustomLink::parse(expr) else {
            warn!(link = expr, "malformed custom link, skipping");
            return None;
        };
        let from = self.identity_of(&link.element);
        let to = self.identity_of(&link.target);
        match (from, to, link.field) {
            (Some(from), Some(to), Some(field)) => Some(Edge::from_port(from, field, to)),
            _ => {
                warn!(link = expr, "custom link does not resolve, skipping");
                None
            }
        }
    }
}

/// Drop nodes with an empty handle, a repeated handle (first wins) or a handle
/// already used as the identity of a selected entity.
fn valid_nodes<'a>(nodes: &'a [CustomNode], universe: &Universe) -> Vec<&'a CustomNode> {
    let mut seen = HashSet::new();
    nodes
        .iter()
        .filter(|node| {
            if node.handle.is_empty() {
                warn!(name = %node.name, "custom node without handle, skipping");
                false
            } else if universe.contains_uid(&node.handle) {
                warn!(handle = %node.handle, "custom node handle is an entity identity, skipping");
                false
            } else if !seen.insert(node.handle.as_str()) {
                warn!(handle = %node.handle, "duplicate custom node handle, skipping");
                false
            } else {
                true
            }
        })
        .collect()
}
