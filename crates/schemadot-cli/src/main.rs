use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use schemadot::options::{OptionOverrides, RenderOverrides};
use schemadot::{SchemadotOptions, run_main};

#[derive(Parser, Debug)]
#[command(
    name = "schemadot",
    about = "schemadot: entity relationship diagrams of a content schema",
    version
)]
pub struct Cli {
    /// Schema snapshot to read (JSON, or TOML with a .toml extension)
    #[arg(
        short = 's',
        long,
        value_name = "FILE",
        required_unless_present = "print_settings"
    )]
    schema: Option<PathBuf>,

    /// Settings file with the default selection and doc groups (TOML, or JSON with a .json extension)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Draw a named doc group from the settings instead of the default selection
    #[arg(short = 'g', long, value_name = "NAME")]
    group: Option<String>,

    #[command(flatten)]
    overrides: OptionOverrides,

    #[command(flatten)]
    render: RenderOverrides,

    /// Print the effective settings as JSON and exit
    #[arg(long = "print-settings", default_value_t = false)]
    print_settings: bool,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: Cli) -> anyhow::Result<()> {
    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = SchemadotOptions {
        schema: args.schema,
        config: args.config,
        group: args.group,
        overrides: args.overrides,
        render: args.render,
        print_settings: args.print_settings,
    };

    let output = run_main(&opts).map_err(|err| {
        tracing::error!(error = %err, "generation failed");
        err
    })?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => print!("{output}"),
    }
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    run(args)
}
