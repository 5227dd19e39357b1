/// Orchestration: reflect, patch, render and write, one flavor at a time.
use crate::config::Config;
use crate::flavor::Flavor;
use crate::output::{render, write_all};
use crate::patch::patch;
use crate::schema::Document;
use crate::Error;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

/// One generated flavor: the rendered document and where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub flavor: &'static str,
    pub document: String,
    pub paths: Vec<PathBuf>,
}

/// Reflect a fresh draft for `flavor` and apply its rules.
pub fn build(flavor: &Flavor) -> Result<Document, Error> {
    let draft = flavor.reflect()?;
    Ok(patch(draft, flavor.rules)?)
}

/// The rendered document for `flavor`.
pub fn generate(flavor: &Flavor) -> Result<String, Error> {
    Ok(render(&build(flavor)?)?)
}

/// Generate every configured flavor and write it to its destinations.
/// A flavor is rendered in full before any of its files is touched; the
/// first error aborts the run.
pub fn run(config: &Config, cwd: &Path) -> Result<Vec<Written>, Error> {
    let root = config.root_dir(cwd);
    let mut written = Vec::new();
    for target in config.targets()? {
        let _span = info_span!("flavor", name = target.flavor.name).entered();
        let text = generate(target.flavor)?;
        let paths: Vec<PathBuf> = target.destinations.iter().map(|p| root.join(p)).collect();
        write_all(&text, &paths)?;
        info!(files = paths.len(), "flavor done");
        written.push(Written {
            flavor: target.flavor.name,
            document: text,
            paths,
        });
    }
    Ok(written)
}
