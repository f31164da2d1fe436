//! schemadot command-line interface.
//!
pub mod options;

use std::path::PathBuf;

use tracing::info;

use schemadot_core::{InMemorySchema, RenderOptions, SelectionConfig, Settings};
use schemadot_dot::DiagramGenerator;
use schemadot_error::{Error, ErrorKind, Result};

pub use options::{OptionOverrides, RenderOverrides};

/// Options for running schemadot.
#[derive(Debug, Clone, Default)]
pub struct SchemadotOptions {
    /// Schema snapshot (JSON or TOML); only `print_settings` runs without one.
    pub schema: Option<PathBuf>,
    /// Settings file; built-in defaults when absent.
    pub config: Option<PathBuf>,
    /// Named selection from the settings' doc groups.
    pub group: Option<String>,
    pub overrides: OptionOverrides,
    pub render: RenderOverrides,
    /// Print the effective settings as JSON instead of generating a diagram.
    pub print_settings: bool,
}

pub fn load_settings(opts: &SchemadotOptions) -> Result<Settings> {
    match &opts.config {
        Some(path) => {
            let settings = Settings::from_path(path)?;
            info!(path = %path.display(), groups = settings.doc_groups.len(), "settings loaded");
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

/// The selection to draw: the named doc group or the settings' own, with overrides applied.
pub fn effective_selection(settings: &Settings, opts: &SchemadotOptions) -> Result<SelectionConfig> {
    let mut selection = match &opts.group {
        Some(name) => settings.doc_group(name)?.clone(),
        None => settings.selection.clone(),
    };
    opts.overrides.apply(&mut selection.options);
    Ok(selection)
}

pub fn effective_render(settings: &Settings, opts: &SchemadotOptions) -> RenderOptions {
    let mut render = settings.dot_options.clone();
    opts.render.apply(&mut render);
    render
}

/// Main entry point
pub fn run_main(opts: &SchemadotOptions) -> Result<String> {
    let settings = load_settings(opts)?;
    let selection = effective_selection(&settings, opts)?;
    let render = effective_render(&settings, opts);

    if opts.print_settings {
        let effective = Settings {
            selection,
            dot_options: render,
            doc_groups: settings.doc_groups,
        };
        return serde_json::to_string_pretty(&effective).map_err(|err| {
            Error::new(ErrorKind::SerializationFailed, "cannot serialize settings")
                .with_operation("cli::run_main")
                .set_source(err)
        });
    }

    let Some(path) = &opts.schema else {
        return Err(
            Error::config_invalid("no schema snapshot given").with_operation("cli::run_main")
        );
    };
    let schema = InMemorySchema::from_path(path)?;
    let generator = DiagramGenerator::new(&schema, settings);
    generator.generate(Some(&selection), Some(&render))
}
