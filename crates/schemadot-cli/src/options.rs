//! Command-line overrides applied on top of the loaded settings.

use clap::Args;

use schemadot_core::{DiagramOptions, RenderOptions};

/// Switches that override the selection's diagram options.
///
/// A switch that is not given leaves the configured value alone.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionOverrides {
    /// Draw only relation fields, without tab and sub-type separators.
    #[arg(long = "relations-only")]
    pub relations_only: bool,

    /// Draw entity headers only.
    #[arg(long = "no-fields")]
    pub no_fields: bool,

    /// Do not expand the block types of matrix fields.
    #[arg(long = "no-matrix")]
    pub no_matrix: bool,

    /// Draw authorship rows and edges from the author map.
    #[arg(long)]
    pub author: bool,

    /// Fail when a selected handle does not exist.
    #[arg(long = "strict-handles")]
    pub strict_handles: bool,
}

impl OptionOverrides {
    pub fn apply(&self, options: &mut DiagramOptions) {
        if self.relations_only {
            options.include_only_relation_fields = true;
        }
        if self.no_fields {
            options.include_fields = false;
        }
        if self.no_matrix {
            options.expand_matrix_blocks = false;
        }
        if self.author {
            options.include_author = true;
        }
        if self.strict_handles {
            options.strict_handles = true;
        }
    }
}

/// Document header overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderOverrides {
    /// Diagram title.
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Layout direction (LR, TB, RL, BT).
    #[arg(long = "rank-dir", value_name = "DIR")]
    pub rank_dir: Option<String>,

    /// Edge routing style (splines, ortho, polyline, ...).
    #[arg(long, value_name = "STYLE")]
    pub splines: Option<String>,
}

impl RenderOverrides {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn apply(&self, render: &mut RenderOptions) {
        if let Some(title) = &self.title {
            render.title = title.clone();
        }
        if let Some(rank_dir) = &self.rank_dir {
            render.rank_dir = rank_dir.clone();
        }
        if let Some(splines) = &self.splines {
            render.splines = splines.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_switches_keep_configured_values() {
        let mut options = DiagramOptions {
            include_author: true,
            expand_matrix_blocks: false,
            ..DiagramOptions::default()
        };
        OptionOverrides::default().apply(&mut options);
        assert!(options.include_author);
        assert!(!options.expand_matrix_blocks);

        let overrides = OptionOverrides {
            relations_only: true,
            no_fields: true,
            ..OptionOverrides::default()
        };
        overrides.apply(&mut options);
        assert!(options.include_only_relation_fields);
        assert!(!options.include_fields);
    }

    #[test]
    fn test_render_overrides() {
        let mut render = RenderOptions::default();
        let overrides = RenderOverrides {
            rank_dir: Some("TB".to_string()),
            ..RenderOverrides::default()
        }
        .with_title("Blog");
        overrides.apply(&mut render);
        assert_eq!(render.title, "Blog");
        assert_eq!(render.rank_dir, "TB");
        assert_eq!(render.splines, "splines");
    }
}
