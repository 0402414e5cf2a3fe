use anyhow::Result;
use clap::Args;
use geoview_core::{FeatureFilter, Resolve};

use super::{
    source_args::{build_resolver, SourceArgs},
    source_error::IntoSourceError,
    view::parse_filter,
};

/// Print the features of a GeoJSON document as a table
#[derive(Args, Debug)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub(super) source: SourceArgs,

    /// Properties used as the feature label, in order of preference
    #[arg(long, value_delimiter = ',', default_value = "LABEL,name")]
    pub(super) label: Vec<String>,

    /// Only keep features whose property has one of the given values
    #[arg(long, value_parser = parse_filter)]
    pub(super) filter: Option<FeatureFilter>,
}

/// Run the `features` command
pub fn run_features(args: FeaturesArgs) -> Result<()> {
    let (config, source) = args.source.into_config()?;
    let resolver = build_resolver(&config)?;
    let mut document = resolver
        .resolve(&source)
        .map_err(|e| e.into_source_error())?;
    if let Some(filter) = &args.filter {
        document = document.filter_features(filter);
    }

    println!("{:>5}  {:<18}  LABEL", "#", "GEOMETRY");
    for (i, feature) in document.features().enumerate() {
        println!(
            "{:>5}  {:<18}  {}",
            i,
            feature.geometry_type().unwrap_or("-"),
            feature.label(&args.label).unwrap_or_default()
        );
    }
    eprintln!("{} features", document.feature_count());

    Ok(())
}
