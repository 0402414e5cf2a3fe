use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::Args;
use geoview_core::{
    compute_view,
    config::GeoViewConfig,
    view::{CoordinateValidation, ZoomStrategy},
    FeatureFilter, Resolve, ViewOptions,
};
use humantime::format_duration;
use serde_json::json;
use tracing::debug;

use super::{
    source_args::{build_resolver, SourceArgs},
    source_error::IntoSourceError,
};

/// Load a GeoJSON document and compute the initial map view
#[derive(Args, Debug)]
pub struct ViewArgs {
    #[command(flatten)]
    pub(super) source: SourceArgs,

    /// Only keep features whose property has one of the given values
    /// (e.g. `LABEL=SLGT,ENH`)
    #[arg(long, value_parser = parse_filter)]
    pub(super) filter: Option<FeatureFilter>,

    #[command(flatten)]
    pub(super) view: ViewFlags,

    /// Print the view and the document as JSON
    #[arg(long)]
    pub(super) json: bool,
}

/// Flags adjusting the configured view options
#[derive(Args, Debug)]
pub struct ViewFlags {
    /// Center on (0, 0) at zoom 1 instead of the contiguous United States.
    /// Configured zoom and validation settings still apply.
    #[arg(long)]
    pub(super) world: bool,

    /// Fixed zoom level of the view
    #[arg(long, conflicts_with = "fit")]
    pub(super) zoom: Option<f64>,

    /// Derive the zoom level from the extent of all positions
    #[arg(long)]
    pub(super) fit: bool,

    /// Reject positions outside the WGS84 value ranges
    #[arg(long)]
    pub(super) strict: bool,
}

/// Parse a `KEY=VALUE[,VALUE...]` feature filter
pub(super) fn parse_filter(s: &str) -> Result<FeatureFilter> {
    let (key, values) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE[,VALUE...], got `{s}'"))?;
    if key.is_empty() {
        return Err(anyhow!("filter key must not be empty"));
    }
    Ok(FeatureFilter::new(
        key,
        values.split(',').filter(|v| !v.is_empty()),
    ))
}

impl ViewFlags {
    /// Layer the flags over the configured view options
    fn view_options(&self, config: &GeoViewConfig) -> ViewOptions {
        let mut options = if self.world {
            config.world_view
        } else {
            config.view
        };
        if self.fit {
            options = options.with_zoom(ZoomStrategy::FitBounds {
                min_zoom: 1.0,
                max_zoom: 12.0,
            });
        } else if let Some(zoom) = self.zoom {
            options = options.with_zoom(ZoomStrategy::Fixed(zoom));
        }
        if self.strict {
            options = options.with_validation(CoordinateValidation::Wgs84);
        }
        options
    }
}

/// Run the `view` command
pub fn run_view(args: ViewArgs) -> Result<()> {
    let (config, source) = args.source.into_config()?;
    let options = args.view.view_options(&config);

    debug!(%source, ?options, "computing view");
    let start = Instant::now();
    let resolver = build_resolver(&config)?;
    let document = resolver
        .resolve(&source)
        .map_err(|e| e.into_source_error())?;
    let document = match &args.filter {
        Some(filter) => document.filter_features(filter),
        None => document,
    };
    let view = compute_view(&document, &options).map_err(|e| e.into_source_error())?;

    if args.json {
        let out = json!({
            "source": source.cache_key(),
            "view": view,
            "data": document.as_value(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("source:    {source}");
        if let Some(filter) = &args.filter {
            println!("filter:    {filter}");
        }
        println!("features:  {}", document.feature_count());
        println!("latitude:  {}", view.latitude);
        println!("longitude: {}", view.longitude);
        println!("zoom:      {}", view.zoom);
    }

    eprintln!(
        "Computed view in {}",
        format_duration(Duration::from_millis(start.elapsed().as_millis() as u64))
    );

    Ok(())
}
