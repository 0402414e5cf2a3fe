use std::str::FromStr;

use anyhow::anyhow;

use crate::source::SourceConfig;

/// The outlook fetched when nothing else is configured
pub const DEFAULT_OUTLOOK_URL: &str =
    "https://www.spc.noaa.gov/products/outlook/day1otlk_cat.nolyr.geojson";

const OUTLOOK_BASE_URL: &str = "https://www.spc.noaa.gov/products/outlook";

/// Convective outlooks published as GeoJSON by the NOAA Storm Prediction
/// Center
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum OutlookPreset {
    #[default]
    Day1Categorical,
    Day1Tornado,
    Day1Wind,
    Day1Hail,
    Day2Categorical,
    Day3Categorical,
}

impl OutlookPreset {
    pub fn all() -> &'static [OutlookPreset] {
        use OutlookPreset::*;
        &[
            Day1Categorical,
            Day1Tornado,
            Day1Wind,
            Day1Hail,
            Day2Categorical,
            Day3Categorical,
        ]
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            OutlookPreset::Day1Categorical => "Day 1 Categorical (nolyr)",
            OutlookPreset::Day1Tornado => "Day 1 Tornado (nolyr)",
            OutlookPreset::Day1Wind => "Day 1 Wind (nolyr)",
            OutlookPreset::Day1Hail => "Day 1 Hail (nolyr)",
            OutlookPreset::Day2Categorical => "Day 2 Categorical (nolyr)",
            OutlookPreset::Day3Categorical => "Day 3 Categorical (nolyr)",
        }
    }

    /// Short name accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            OutlookPreset::Day1Categorical => "day1-cat",
            OutlookPreset::Day1Tornado => "day1-torn",
            OutlookPreset::Day1Wind => "day1-wind",
            OutlookPreset::Day1Hail => "day1-hail",
            OutlookPreset::Day2Categorical => "day2-cat",
            OutlookPreset::Day3Categorical => "day3-cat",
        }
    }

    pub fn url(&self) -> String {
        let file = match self {
            OutlookPreset::Day1Categorical => "day1otlk_cat",
            OutlookPreset::Day1Tornado => "day1otlk_torn",
            OutlookPreset::Day1Wind => "day1otlk_wind",
            OutlookPreset::Day1Hail => "day1otlk_hail",
            OutlookPreset::Day2Categorical => "day2otlk_cat",
            OutlookPreset::Day3Categorical => "day3otlk_cat",
        };
        format!("{OUTLOOK_BASE_URL}/{file}.nolyr.geojson")
    }

    /// Find the preset publishing the given URL
    pub fn from_url(url: &str) -> Option<OutlookPreset> {
        Self::all().iter().copied().find(|p| p.url() == url)
    }

    pub fn source(&self) -> SourceConfig {
        SourceConfig::remote(self.url())
    }
}

impl FromStr for OutlookPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| anyhow!("unknown outlook preset: {}", s))
    }
}
