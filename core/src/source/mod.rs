//! Resolves GeoJSON documents from remote URLs, directory listings and
//! single files.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument};

use crate::{document::Document, error::GeoViewError};

pub mod http;
pub mod listing;

use http::{HttpClient, ReqwestClient};
use listing::ListingOptions;

/// Describes where the bytes of a document come from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceConfig {
    /// Fetch the document with an HTTP GET request
    Remote { url: String },

    /// A directory of candidate files. Resolving loads
    /// `default_relative_path` below `root`.
    DirectoryListing {
        root: PathBuf,
        default_relative_path: PathBuf,
    },

    /// Read a single file
    DirectFile { path: PathBuf },
}

impl SourceConfig {
    pub fn remote(url: impl Into<String>) -> Self {
        SourceConfig::Remote { url: url.into() }
    }

    pub fn directory(root: impl Into<PathBuf>, default_relative_path: impl Into<PathBuf>) -> Self {
        SourceConfig::DirectoryListing {
            root: root.into(),
            default_relative_path: default_relative_path.into(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        SourceConfig::DirectFile { path: path.into() }
    }

    /// The resolved input: the URL, or the full path of the file to load.
    /// Two configs with the same key resolve to the same document.
    pub fn cache_key(&self) -> String {
        match self {
            SourceConfig::Remote { url } => url.clone(),
            SourceConfig::DirectoryListing {
                root,
                default_relative_path,
            } => root.join(default_relative_path).display().to_string(),
            SourceConfig::DirectFile { path } => path.display().to_string(),
        }
    }
}

impl fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceConfig::Remote { url } => write!(f, "remote `{url}'"),
            SourceConfig::DirectoryListing { .. } | SourceConfig::DirectFile { .. } => {
                write!(f, "file `{}'", self.cache_key())
            }
        }
    }
}

/// Anything that can turn a [`SourceConfig`] into a [`Document`]
pub trait Resolve {
    fn resolve(&self, config: &SourceConfig) -> Result<Document, GeoViewError>;
}

/// Resolves documents over HTTP or from the local filesystem
#[derive(Debug, Clone)]
pub struct GeoSourceResolver<C = ReqwestClient> {
    client: C,
    listing: ListingOptions,
}

impl GeoSourceResolver<ReqwestClient> {
    /// Creates a resolver with a reqwest client using the default timeout
    pub fn new() -> Result<Self, GeoViewError> {
        Ok(Self::with_client(ReqwestClient::new()?))
    }
}

impl<C: HttpClient> GeoSourceResolver<C> {
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            listing: ListingOptions::default(),
        }
    }

    #[must_use]
    pub fn with_listing_options(self, listing: ListingOptions) -> Self {
        Self { listing, ..self }
    }

    /// Fetch and parse a remote document
    #[instrument(level = "debug", skip(self))]
    pub fn fetch(&self, url: &str) -> Result<Document, GeoViewError> {
        let body = self.client.get(url)?;
        debug!(bytes = body.len(), "fetched document");
        Document::from_slice(&body, url)
    }

    /// List candidate files below `root`. See [`listing::list_candidates_with`].
    pub fn list_candidates(&self, root: &Path) -> Result<Vec<PathBuf>, GeoViewError> {
        listing::list_candidates_with(root, &self.listing)
    }

    /// Load the file at `relative` below `root`
    pub fn load_file(&self, root: &Path, relative: &Path) -> Result<Document, GeoViewError> {
        self.load_path(&root.join(relative))
    }

    /// Load and parse a single file
    #[instrument(level = "debug", skip(self))]
    pub fn load_path(&self, path: &Path) -> Result<Document, GeoViewError> {
        load_path(path)
    }
}

impl<C: HttpClient> Resolve for GeoSourceResolver<C> {
    fn resolve(&self, config: &SourceConfig) -> Result<Document, GeoViewError> {
        match config {
            SourceConfig::Remote { url } => self.fetch(url),
            SourceConfig::DirectoryListing {
                root,
                default_relative_path,
            } => self.load_file(root, default_relative_path),
            SourceConfig::DirectFile { path } => self.load_path(path),
        }
    }
}

fn load_path(path: &Path) -> Result<Document, GeoViewError> {
    let source_name = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => GeoViewError::unavailable(&source_name, "file not found"),
        _ => GeoViewError::unavailable(&source_name, e),
    })?;
    debug!(bytes = bytes.len(), "read document");
    Document::from_slice(&bytes, &source_name)
}
