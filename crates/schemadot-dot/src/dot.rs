//! DOT format utilities for graph rendering.

use std::fmt::Write;

/// Escape text for use inside an HTML-like label.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a node identity for use inside a double-quoted DOT id.
pub fn escape_id(input: &str) -> String {
    input.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// A DOT graph builder for constructing valid DOT output.
pub struct DotBuilder {
    output: String,
    indent: usize,
}

impl DotBuilder {
    /// Create a new directed graph. The name is written verbatim.
    pub fn new(name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "digraph \"{name}\" {{");
        Self { output, indent: 1 }
    }

    /// Add a bare graph attribute statement, e.g. `rankdir=LR;`.
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{key}={value};");
        self
    }

    /// Add graph-wide defaults.
    pub fn graph_style(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        self.defaults("graph", attrs)
    }

    /// Add node defaults.
    pub fn node_style(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        self.defaults("node", attrs)
    }

    fn defaults(&mut self, target: &str, attrs: &[(&str, &str)]) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{target} [");
        for (i, (key, value)) in attrs.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            let _ = write!(self.output, "{key}=\"{value}\"");
        }
        self.output.push_str("];\n");
        self
    }

    /// Add a node whose label is an HTML-like table.
    pub fn html_node(&mut self, id: &str, label: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "\"{}\" [label=<{}>];", escape_id(id), label);
        self
    }

    /// Add an edge leaving from an optional port and compass point of the source node.
    pub fn edge(
        &mut self,
        from: &str,
        port: Option<&str>,
        compass: Option<&str>,
        to: &str,
    ) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "\"{}\"", escape_id(from));
        if let Some(port) = port {
            let _ = write!(self.output, ":\"{}\"", escape_id(port));
        }
        if let Some(compass) = compass {
            let _ = write!(self.output, ":{compass}");
        }
        let _ = writeln!(self.output, " -> \"{}\";", escape_id(to));
        self
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("News & <Events>"), "News &amp; &lt;Events&gt;");
        assert_eq!(escape_html("it's \"ok\""), "it&#039;s &quot;ok&quot;");
    }

    #[test]
    fn test_escape_id() {
        assert_eq!(escape_id(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn test_edge_port_is_quoted() {
        let mut dot = DotBuilder::new("G");
        dot.edge("a", Some("r&d links"), None, "b")
            .edge("a", Some(r#"say"hi"#), Some("e"), "b");
        let output = dot.build();
        assert!(output.contains("  \"a\":\"r&d links\" -> \"b\";\n"));
        assert!(output.contains(r#"  "a":"say\"hi":e -> "b";"#));
    }

    #[test]
    fn test_builder_statements() {
        let mut dot = DotBuilder::new("Site Diagram");
        dot.attr("rankdir", "LR")
            .node_style(&[("shape", "plaintext")])
            .html_node("n1", "<table></table>")
            .edge("n1", Some("author"), Some("e"), "n2")
            .edge("n2", None, None, "n1");
        let output = dot.build();

        assert_eq!(
            output,
            "digraph \"Site Diagram\" {\n  rankdir=LR;\n  node [shape=\"plaintext\"];\n  \"n1\" [label=<<table></table>>];\n  \"n1\":\"author\":e -> \"n2\";\n  \"n2\" -> \"n1\";\n}\n"
        );
    }
}
