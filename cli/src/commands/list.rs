use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use geoview_core::{config::GeoViewConfig, source::listing::ListingOptions, GeoSourceResolver};

use super::source_error::IntoSourceError;

/// List the GeoJSON files below a directory
#[derive(Args, Debug)]
pub struct ListArgs {
    /// The directory to list. Defaults to `GEOVIEW_ROOT` or the configured
    /// root.
    #[arg(name = "ROOT")]
    pub(super) root: Option<PathBuf>,

    /// Do not descend more than this many directory levels
    #[arg(long)]
    pub(super) max_depth: Option<usize>,

    /// Read configuration from this file
    #[arg(long)]
    pub(super) config: Option<PathBuf>,
}

/// Run the `list` command
pub fn run_list(args: ListArgs) -> Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => GeoViewConfig::load(args.config.as_deref())?
            .root
            .context("No root directory given or configured")?,
    };

    let resolver = GeoSourceResolver::new()?.with_listing_options(ListingOptions {
        max_depth: args.max_depth,
    });
    let candidates = resolver
        .list_candidates(&root)
        .map_err(|e| e.into_source_error())?;

    if candidates.is_empty() {
        eprintln!("No .geojson files found under {}", root.display());
    }
    for c in &candidates {
        println!("{}", c.display());
    }

    Ok(())
}
