//! Node labels: the rows of the HTML-like table drawn for every node.

use std::fmt::Write;

use crate::dot::escape_html;

const TABLE_OPEN: &str = r#"<table border="0" cellborder="1" cellspacing="0" cellpadding="4">"#;
const TABLE_CLOSE: &str = "</table>";
const NESTING_MARKER: &str = "&rarr; ";

/// Which cell borders a field row draws.
///
/// Field rows leave the bottom open so consecutive rows read as one box; the
/// last row of a run closes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sides {
    /// Left and right only.
    Open,
    /// Left, right and bottom.
    Closed,
}

impl Sides {
    pub fn closed_if(last: bool) -> Self {
        if last { Sides::Closed } else { Sides::Open }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sides::Open => "lr",
            Sides::Closed => "lrb",
        }
    }
}

/// One row of a node label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Bold display name at the top of the node.
    Title(String),
    /// Category discriminator under the title.
    Category(String),
    /// Authorship row, the attachment point of authorship edges.
    Author,
    /// Separator before the fields of one sub-type (entry type).
    SubType(String),
    /// Separator before the fields of one tab.
    Tab(String),
    /// Separator before the nested fields of one block type.
    Block(String),
    /// A schema field: handle plus greyed-out display name.
    Field {
        port: String,
        handle: String,
        name: String,
        depth: usize,
        sides: Sides,
    },
    /// A custom node field: the name only.
    CustomField { name: String, sides: Sides },
}

impl Row {
    /// Port this row can be addressed by from edges.
    pub fn port(&self) -> Option<&str> {
        match self {
            Row::Author => Some("author"),
            Row::Field { port, .. } => Some(port),
            Row::CustomField { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn sides(&self) -> Option<Sides> {
        match self {
            Row::Field { sides, .. } | Row::CustomField { sides, .. } => Some(*sides),
            Row::Block(_) => Some(Sides::Open),
            _ => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Row::SubType(_) | Row::Tab(_) | Row::Block(_))
    }

    fn write_html(&self, out: &mut String) {
        let _ = match self {
            Row::Title(name) => write!(
                out,
                r#"<tr><td align="center"><b>{}</b></td></tr>"#,
                escape_html(name)
            ),
            Row::Category(label) => write!(
                out,
                r#"<tr><td align="left">{}</td></tr>"#,
                escape_html(label)
            ),
            Row::Author => write!(
                out,
                r#"<tr><td align="left" port="author"><font point-size="12">Author</font></td></tr>"#
            ),
            Row::SubType(name) => write!(
                out,
                r##"<tr><td align="left" bgcolor="#bebebe"><font point-size="10">ENTRY TYPE: {}</font></td></tr>"##,
                escape_html(name)
            ),
            Row::Tab(name) => write!(
                out,
                r##"<tr><td align="left" bgcolor="#ebebeb"><font point-size="10">TAB: {}</font></td></tr>"##,
                escape_html(name)
            ),
            Row::Block(name) => write!(
                out,
                r##"<tr><td align="left" sides="lr"><font color="#7f7f7f" point-size="10">BLOCK: {}</font></td></tr>"##,
                escape_html(name)
            ),
            Row::Field {
                port,
                handle,
                name,
                depth,
                sides,
            } => write!(
                out,
                r##"<tr><td align="left" sides="{}" port="{}"><font point-size="12">{}{}</font> <font color="#7f7f7f" point-size="10">{}</font></td></tr>"##,
                sides.as_str(),
                port,
                NESTING_MARKER.repeat(*depth),
                handle,
                escape_html(name)
            ),
            Row::CustomField { name, sides } => write!(
                out,
                r#"<tr><td align="left" sides="{}" port="{}"><font point-size="12">{}</font></td></tr>"#,
                sides.as_str(),
                escape_html(name),
                escape_html(name)
            ),
        };
    }
}

/// One graph node: its identity plus the rows of its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub rows: Vec<Row>,
}

impl Node {
    /// A node with the title and category rows already in place.
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rows: vec![Row::Title(title.into()), Row::Category(category.into())],
        }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn has_port(&self, port: &str) -> bool {
        self.rows.iter().any(|row| row.port() == Some(port))
    }

    /// Rows describing fields (schema or custom).
    pub fn field_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows
            .iter()
            .filter(|row| matches!(row, Row::Field { .. } | Row::CustomField { .. }))
    }

    /// Render the HTML-like table label.
    pub fn label(&self) -> String {
        let mut out = String::with_capacity(64 + self.rows.len() * 120);
        out.push(' ');
        out.push_str(TABLE_OPEN);
        for row in &self.rows {
            row.write_html(&mut out);
        }
        out.push_str(TABLE_CLOSE);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_rows_escape_names() {
        let node = Node::new("u1", "News & Events", "CHANNEL");
        let label = node.label();
        assert!(label.starts_with(" <table border=\"0\""));
        assert!(label.contains("<b>News &amp; Events</b>"));
        assert!(label.contains(r#"<td align="left">CHANNEL</td>"#));
        assert!(label.ends_with("</table>"));
    }

    #[test]
    fn test_nested_field_row() {
        let row = Row::Field {
            port: "blocksimage".to_string(),
            handle: "image".to_string(),
            name: "Image".to_string(),
            depth: 1,
            sides: Sides::Closed,
        };
        let mut out = String::new();
        row.write_html(&mut out);
        assert_eq!(
            out,
            r##"<tr><td align="left" sides="lrb" port="blocksimage"><font point-size="12">&rarr; image</font> <font color="#7f7f7f" point-size="10">Image</font></td></tr>"##
        );
        assert_eq!(row.port(), Some("blocksimage"));
    }

    #[test]
    fn test_ports() {
        let mut node = Node::new("orders", "Orders", "DATABASE TABLE");
        node.push(Row::Author);
        node.push(Row::CustomField {
            name: "customer_id".to_string(),
            sides: Sides::Closed,
        });
        assert!(node.has_port("author"));
        assert!(node.has_port("customer_id"));
        assert!(!node.has_port("missing"));
        assert_eq!(node.field_rows().count(), 1);
    }
}
