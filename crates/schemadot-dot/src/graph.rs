//! The accumulated node/edge set and its serialization to DOT.

use schemadot_core::RenderOptions;

use crate::dot::DotBuilder;
use crate::label::Node;

const FONT: &str = "Helvetica,Arial,sans-serif";

/// A directed edge from a node (optionally one of its ports) to another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub port: Option<String>,
    /// Compass point on the port, e.g. `e` to leave from the east side.
    pub compass: Option<&'static str>,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            port: None,
            compass: None,
            to: to.into(),
        }
    }

    pub fn from_port(from: impl Into<String>, port: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            port: Some(port.into()),
            compass: None,
            to: to.into(),
        }
    }

    pub fn with_compass(mut self, compass: &'static str) -> Self {
        self.compass = Some(compass);
        self
    }

}

/// Everything one generation run produced, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    /// Entity nodes grouped by kind in the fixed kind order, then custom nodes.
    pub nodes: Vec<Node>,
    /// Edges in the order they were generated while building nodes.
    pub edges: Vec<Edge>,
    /// Edges from custom link expressions, emitted last.
    pub link_edges: Vec<Edge>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// All edges in output order.
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().chain(self.link_edges.iter())
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len() + self.link_edges.len()
    }

    /// Serialize to a DOT document.
    ///
    /// The title, direction and routing style are written verbatim.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut dot = DotBuilder::new(&options.title);
        dot.attr("rankdir", &options.rank_dir)
            .graph_style(&[
                ("fontname", FONT),
                ("fontsize", "24"),
                ("label", &options.title),
                ("splines", &options.splines),
                ("ranksep", "1.5"),
                ("overlap", "false"),
                ("nodesep", "1.5"),
            ])
            .node_style(&[("shape", "plaintext"), ("fontname", FONT)]);

        for node in &self.nodes {
            dot.html_node(&node.id, &node.label());
        }
        for edge in self.all_edges() {
            dot.edge(&edge.from, edge.port.as_deref(), edge.compass, &edge.to);
        }
        dot.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_ports() {
        let edge = Edge::from_port("a", "author", "b").with_compass("e");
        assert_eq!(edge.port.as_deref(), Some("author"));
        assert_eq!(edge.compass, Some("e"));
        assert_eq!(Edge::new("a", "b").port, None);

        let graph = Graph {
            nodes: Vec::new(),
            edges: vec![edge, Edge::new("b", "a")],
            link_edges: Vec::new(),
        };
        let output = graph.render(&RenderOptions::default());
        assert!(output.contains("  \"a\":\"author\":e -> \"b\";\n"));
        assert!(output.contains("  \"b\" -> \"a\";\n"));
    }

    #[test]
    fn test_render_empty_graph_header() {
        let options = RenderOptions {
            rank_dir: "TB".to_string(),
            splines: "ortho".to_string(),
            title: "Blog".to_string(),
        };
        let output = Graph::default().render(&options);
        assert_eq!(
            output,
            concat!(
                "digraph \"Blog\" {\n",
                "  rankdir=TB;\n",
                "  graph [fontname=\"Helvetica,Arial,sans-serif\", fontsize=\"24\", label=\"Blog\", splines=\"ortho\", ranksep=\"1.5\", overlap=\"false\", nodesep=\"1.5\"];\n",
                "  node [shape=\"plaintext\", fontname=\"Helvetica,Arial,sans-serif\"];\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_link_edges_follow_node_edges() {
        let graph = Graph {
            nodes: vec![Node::new("a", "A", "X"), Node::new("b", "B", "Y")],
            edges: vec![Edge::from_port("a", "rel", "b")],
            link_edges: vec![Edge::from_port("b", "back", "a")],
        };
        let output = graph.render(&RenderOptions::default());
        let first = output.find("\"a\":\"rel\" -> \"b\";").unwrap();
        let second = output.find("\"b\":\"back\" -> \"a\";").unwrap();
        assert!(first < second);
        assert!(output.find("\"b\" [label=").unwrap() < first);
        assert_eq!(graph.edge_count(), 2);
    }
}
