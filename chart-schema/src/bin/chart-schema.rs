/// CLI: generates the values schema of every configured flavor.
///
/// Usage:
///   chart-schema                       # uses ./chart-schema.toml if present
///   CHART_SCHEMA_CONFIG=path chart-schema
///   RUST_LOG=debug chart-schema        # log every reflected definition and rule
use anyhow::Context;
use chart_schema::config::{self, CONFIG_ENV};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    if std::env::args()
        .skip(1)
        .any(|arg| arg == "--help" || arg == "-h")
    {
        eprintln!("Usage: chart-schema");
        eprintln!("  Writes values.schema.json for each flavor in chart-schema.toml");
        eprintln!("  and prints every document to stdout.");
        eprintln!("  Set {CONFIG_ENV} to use a config file outside the working directory.");
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().context("resolve working directory")?;
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            config::load_config(&path)
                .with_context(|| format!("load config file {}", path.display()))?
        }
        None => config::load_or_default(&cwd).context("load config")?,
    };

    // Each document goes to stdout too; file paths are logged on stderr
    for entry in chart_schema::pipeline::run(&config, &cwd)? {
        print!("{}", entry.document);
    }
    Ok(())
}
