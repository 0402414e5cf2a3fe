use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Result};
use clap::Args;
use geoview_core::{
    cache::CachedResolver,
    config::GeoViewConfig,
    presets::OutlookPreset,
    source::{http::ReqwestClient, GeoSourceResolver},
    SourceConfig,
};

/// Arguments selecting the document to load. Anything not given here falls
/// back to the environment and the configuration file.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// A URL or the path of a GeoJSON file
    #[arg(name = "SOURCE")]
    pub(super) source: Option<String>,

    /// Fetch the document from this URL
    #[arg(long, conflicts_with_all = ["preset", "file", "path"])]
    pub(super) url: Option<String>,

    /// Fetch a convective outlook preset (see `geoview presets`)
    #[arg(long, conflicts_with_all = ["file", "path"])]
    pub(super) preset: Option<OutlookPreset>,

    /// Root directory of a file volume
    #[arg(long)]
    pub(super) root: Option<PathBuf>,

    /// Path of the file to load, relative to `--root`
    #[arg(long, requires = "root", conflicts_with = "file")]
    pub(super) path: Option<PathBuf>,

    /// Load a single file
    #[arg(long)]
    pub(super) file: Option<PathBuf>,

    /// Timeout of remote fetches (e.g. `15s`)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub(super) timeout: Option<Duration>,

    /// Read configuration from this file instead of
    /// `$HOME/.config/geoview/config.toml`
    #[arg(long)]
    pub(super) config: Option<PathBuf>,
}

impl SourceArgs {
    /// Load the configuration and determine the source to resolve
    pub fn into_config(self) -> Result<(GeoViewConfig, SourceConfig)> {
        let mut config = GeoViewConfig::load(self.config.as_deref())?;
        if let Some(timeout) = self.timeout {
            config.http_timeout = timeout;
        }
        if let Some(root) = &self.root {
            config.root = Some(root.clone());
        }

        let source = match (self.source, self.url, self.preset, self.root, self.path, self.file) {
            (Some(s), None, None, _, None, None) => {
                if s.starts_with("http://") || s.starts_with("https://") {
                    SourceConfig::remote(s)
                } else {
                    SourceConfig::file(s)
                }
            }
            (None, Some(url), None, _, None, None) => SourceConfig::remote(url),
            (None, None, Some(preset), _, None, None) => preset.source(),
            (None, None, None, Some(root), Some(path), None) => SourceConfig::directory(root, path),
            (None, None, None, _, None, Some(file)) => SourceConfig::file(file),
            (None, None, None, _, None, None) => config.source.clone(),
            _ => bail!("Please specify only one source"),
        };

        Ok((config, source))
    }
}

/// Create a memoizing resolver according to `config`
pub fn build_resolver(config: &GeoViewConfig) -> Result<CachedResolver<GeoSourceResolver>> {
    let client = ReqwestClient::with_timeout(config.http_timeout)?;
    let resolver = GeoSourceResolver::with_client(client);
    Ok(match config.cache_ttl {
        Some(ttl) => CachedResolver::with_ttl(resolver, ttl),
        None => CachedResolver::new(resolver),
    })
}
