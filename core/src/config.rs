//! Configuration from a TOML file with environment variable fallbacks.
//!
//! Environment variables take precedence over the configuration file.
//! Command-line arguments are layered on top by the caller.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::{
    presets::DEFAULT_OUTLOOK_URL,
    source::{http::DEFAULT_TIMEOUT, SourceConfig},
    view::{CoordinateValidation, ViewOptions, ZoomStrategy},
};

/// location of the config file, relative to $HOME
const CONFIG_PATH: &str = ".config/geoview/config.toml";

pub const URL_ENV: &str = "GEOVIEW_URL";
/// honoured for compatibility with existing dashboard deployments
pub const SPC_URL_ENV: &str = "SPC_GEOJSON_URL";
pub const ROOT_ENV: &str = "GEOVIEW_ROOT";
pub const PATH_ENV: &str = "GEOVIEW_PATH";
pub const FILE_ENV: &str = "GEOVIEW_FILE";
pub const TIMEOUT_ENV: &str = "GEOVIEW_HTTP_TIMEOUT";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    source: SourceSection,
    view: ViewSection,
    http: HttpSection,
    cache: CacheSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SourceSection {
    url: Option<String>,
    root: Option<PathBuf>,
    path: Option<PathBuf>,
    file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ViewSection {
    preset: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    default_zoom: Option<f64>,
    zoom: Option<f64>,
    fit_bounds: bool,
    min_zoom: Option<f64>,
    max_zoom: Option<f64>,
    validate: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HttpSection {
    timeout: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CacheSection {
    ttl: Option<String>,
}

/// Final configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GeoViewConfig {
    /// The source to resolve when none is given explicitly
    pub source: SourceConfig,
    /// Root directory offered for listing candidates, if configured
    pub root: Option<PathBuf>,
    pub view: ViewOptions,
    /// Like `view`, but with the `world` preset in place of the configured
    /// one. Zoom and validation settings still apply.
    pub world_view: ViewOptions,
    pub http_timeout: Duration,
    /// Time-to-live of cached documents. [`None`] caches forever.
    pub cache_ttl: Option<Duration>,
}

impl Default for GeoViewConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::remote(DEFAULT_OUTLOOK_URL),
            root: None,
            view: ViewOptions::default(),
            world_view: ViewOptions::world(),
            http_timeout: DEFAULT_TIMEOUT,
            cache_ttl: None,
        }
    }
}

impl GeoViewConfig {
    /// Load the configuration from `path`, or from
    /// `$HOME/.config/geoview/config.toml` if no path is given, and apply
    /// environment variable fallbacks.
    ///
    /// # Errors
    /// This function errors, if:
    /// - an explicitly given file cannot be read (a missing default file is
    ///   not an error)
    /// - the file or an environment variable is malformed
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let contents = match path {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("unable to read configuration file at {:?}", path))?,
            ),
            None => default_config_path()
                .filter(|p| p.is_file())
                .map(|p| {
                    std::fs::read_to_string(&p)
                        .with_context(|| format!("unable to read configuration file at {:?}", p))
                })
                .transpose()?,
        };
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build the configuration from the contents of a configuration file and
    /// an environment lookup function
    pub fn from_sources(
        file: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let file: FileConfig = match file {
            Some(contents) => toml::from_str(contents).context("configuration malformed")?,
            None => FileConfig::default(),
        };

        let mut config = GeoViewConfig {
            view: file.view.to_options()?,
            world_view: file.view.apply_zoom(ViewOptions::world()),
            ..Default::default()
        };

        // the root is shared by both layers, so a relative path from one
        // layer can refer to a root from the other
        let s = &file.source;
        config.root = env(ROOT_ENV).map(PathBuf::from).or_else(|| s.root.clone());

        if let Some(source) = source_from(
            s.url.clone(),
            config.root.clone(),
            s.path.clone(),
            s.file.clone(),
        )? {
            config.source = source;
        }

        if let Some(source) = source_from(
            env(URL_ENV).or_else(|| env(SPC_URL_ENV)),
            config.root.clone(),
            env(PATH_ENV).map(PathBuf::from),
            env(FILE_ENV).map(PathBuf::from),
        )? {
            config.source = source;
        }

        if let Some(timeout) = env(TIMEOUT_ENV).or(file.http.timeout) {
            config.http_timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("invalid HTTP timeout `{timeout}'"))?;
        }
        if let Some(ttl) = file.cache.ttl {
            config.cache_ttl = Some(
                humantime::parse_duration(&ttl)
                    .with_context(|| format!("invalid cache time-to-live `{ttl}'"))?,
            );
        }

        Ok(config)
    }
}

/// Pick a source out of the given settings. A direct file wins over a
/// directory, which wins over a URL. A directory needs both a root and a
/// relative path; a root on its own is only used for listing.
fn source_from(
    url: Option<String>,
    root: Option<PathBuf>,
    path: Option<PathBuf>,
    file: Option<PathBuf>,
) -> anyhow::Result<Option<SourceConfig>> {
    if let Some(file) = file {
        return Ok(Some(SourceConfig::file(file)));
    }
    match (root, path) {
        (Some(root), Some(path)) => return Ok(Some(SourceConfig::directory(root, path))),
        (None, Some(path)) => bail!("relative path {:?} configured without a root", path),
        _ => {}
    }
    Ok(url.map(SourceConfig::remote))
}

impl ViewSection {
    fn to_options(&self) -> anyhow::Result<ViewOptions> {
        let mut options = match self.preset.as_deref() {
            None | Some("conus") => ViewOptions::conus(),
            Some("world") => ViewOptions::world(),
            Some(other) => bail!("unknown view preset: {}", other),
        };
        if let Some(latitude) = self.latitude {
            options.default_latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            options.default_longitude = longitude;
        }
        if let Some(default_zoom) = self.default_zoom {
            options.default_zoom = default_zoom;
        }
        Ok(self.apply_zoom(options))
    }

    /// Apply the zoom and validation settings, which are independent of the
    /// preset
    fn apply_zoom(&self, mut options: ViewOptions) -> ViewOptions {
        if self.fit_bounds {
            options.zoom = ZoomStrategy::FitBounds {
                min_zoom: self.min_zoom.unwrap_or(1.0),
                max_zoom: self.max_zoom.unwrap_or(12.0),
            };
        } else if let Some(zoom) = self.zoom {
            options.zoom = ZoomStrategy::Fixed(zoom);
        }
        if self.validate {
            options.validation = CoordinateValidation::Wgs84;
        }
        options
    }
}

fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rustc_hash::FxHashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: FxHashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = GeoViewConfig::from_sources(None, env(&[])).unwrap();
        assert_eq!(config, GeoViewConfig::default());
        assert_eq!(config.source, SourceConfig::remote(DEFAULT_OUTLOOK_URL));
        assert_eq!(config.http_timeout, Duration::from_secs(15));
    }

    #[test]
    fn file() {
        let config = GeoViewConfig::from_sources(
            Some(
                r#"
                [source]
                root = "/Volumes/main/default/geo"
                path = "outlooks/day1.geojson"

                [view]
                preset = "world"
                zoom = 6

                [http]
                timeout = "30s"

                [cache]
                ttl = "10m"
                "#,
            ),
            env(&[]),
        )
        .unwrap();

        assert_eq!(
            config.source,
            SourceConfig::directory("/Volumes/main/default/geo", "outlooks/day1.geojson")
        );
        assert_eq!(config.root, Some(PathBuf::from("/Volumes/main/default/geo")));
        assert_eq!(config.view.default_latitude, 0.0);
        assert_eq!(config.view.zoom, ZoomStrategy::Fixed(6.0));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(600)));
    }

    #[test]
    fn env_overrides_file() {
        let config = GeoViewConfig::from_sources(
            Some("[source]\nurl = \"https://example.com/a.geojson\"\n"),
            env(&[(SPC_URL_ENV, "https://example.com/b.geojson")]),
        )
        .unwrap();
        assert_eq!(config.source, SourceConfig::remote("https://example.com/b.geojson"));

        let config = GeoViewConfig::from_sources(
            None,
            env(&[
                (URL_ENV, "https://example.com/c.geojson"),
                (SPC_URL_ENV, "https://example.com/b.geojson"),
            ]),
        )
        .unwrap();
        assert_eq!(config.source, SourceConfig::remote("https://example.com/c.geojson"));
    }

    #[test]
    fn file_wins_over_url() {
        let config = GeoViewConfig::from_sources(
            None,
            env(&[
                (URL_ENV, "https://example.com/c.geojson"),
                (FILE_ENV, "/data/x.geojson"),
            ]),
        )
        .unwrap();
        assert_eq!(config.source, SourceConfig::file("/data/x.geojson"));
    }

    #[test]
    fn fit_bounds_and_validation() {
        let config = GeoViewConfig::from_sources(
            Some("[view]\nfit_bounds = true\nmax_zoom = 8\nvalidate = true\n"),
            env(&[]),
        )
        .unwrap();
        assert_eq!(
            config.view.zoom,
            ZoomStrategy::FitBounds {
                min_zoom: 1.0,
                max_zoom: 8.0
            }
        );
        assert_eq!(config.view.validation, CoordinateValidation::Wgs84);

        assert_eq!(config.world_view.default_latitude, 0.0);
        assert_eq!(config.world_view.default_zoom, 1.0);
        assert_eq!(config.world_view.zoom, config.view.zoom);
        assert_eq!(config.world_view.validation, CoordinateValidation::Wgs84);
    }

    #[test]
    fn world_view_keeps_world_zoom_unless_configured() {
        let config =
            GeoViewConfig::from_sources(Some("[view]
latitude = 45
"), env(&[])).unwrap();
        assert_eq!(config.view.default_latitude, 45.0);
        assert_eq!(config.world_view, ViewOptions::world());
    }

    #[test]
    fn root_and_path_from_different_layers() {
        let config = GeoViewConfig::from_sources(
            Some("[source]
root = \"/data\"
"),
            env(&[(PATH_ENV, "a.geojson")]),
        )
        .unwrap();
        assert_eq!(config.source, SourceConfig::directory("/data", "a.geojson"));
        assert_eq!(config.root, Some(PathBuf::from("/data")));

        let config = GeoViewConfig::from_sources(
            Some("[source]
path = \"b.geojson\"
"),
            env(&[(ROOT_ENV, "/volume")]),
        )
        .unwrap();
        assert_eq!(config.source, SourceConfig::directory("/volume", "b.geojson"));

        // a whole source from the environment still beats one from the file
        let config = GeoViewConfig::from_sources(
            Some("[source]
root = \"/data\"
path = \"b.geojson\"
"),
            env(&[(URL_ENV, "https://example.com/c.geojson")]),
        )
        .unwrap();
        assert_eq!(config.source, SourceConfig::remote("https://example.com/c.geojson"));
    }

    #[test]
    fn malformed() {
        assert!(GeoViewConfig::from_sources(Some("[source"), env(&[])).is_err());
        assert!(GeoViewConfig::from_sources(Some("[view]\npreset = \"mars\""), env(&[])).is_err());
        assert!(GeoViewConfig::from_sources(Some("[unknown]\n"), env(&[])).is_err());
        assert!(GeoViewConfig::from_sources(None, env(&[(TIMEOUT_ENV, "soon")])).is_err());
        assert!(GeoViewConfig::from_sources(None, env(&[(PATH_ENV, "a.geojson")])).is_err());
    }

    #[test]
    fn missing_explicit_file() {
        let err = GeoViewConfig::load(Some(Path::new("/does/not/exist.toml"))).unwrap_err();
        assert!(err.to_string().contains("unable to read configuration file"));
    }
}
