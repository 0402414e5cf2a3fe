//! Computes the initial map view for a document.
//!
//! The center of the view is the arithmetic mean of every position found in
//! the geometries of a document. The zoom level is either fixed by the
//! caller or derived from the extent of all positions.

use geo::Rect;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{document::Document, error::GeoViewError, util::bounds::BoundsBuilder};

pub mod coordinates;

use coordinates::CoordinateWalker;

/// The initial center and zoom level of a map
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

/// How the zoom level of a computed view is determined
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ZoomStrategy {
    /// Always use the given zoom level
    Fixed(f64),

    /// Derive the zoom level from the bounding box of all positions so the
    /// whole extent fits, clamped to the given range
    FitBounds { min_zoom: f64, max_zoom: f64 },
}

/// Whether positions are checked against the WGS84 value ranges
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CoordinateValidation {
    /// Average everything, including out-of-range values
    #[default]
    Permissive,

    /// Reject longitudes outside [-180, 180] and latitudes outside [-90, 90]
    Wgs84,
}

/// Parameters for [`compute_view`]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewOptions {
    /// Latitude used when the document has no positions
    pub default_latitude: f64,
    /// Longitude used when the document has no positions
    pub default_longitude: f64,
    /// Zoom level used when the document has no positions
    pub default_zoom: f64,
    pub zoom: ZoomStrategy,
    pub validation: CoordinateValidation,
}

impl ViewOptions {
    /// The contiguous United States, suitable for weather outlooks
    pub fn conus() -> Self {
        Self {
            default_latitude: 39.5,
            default_longitude: -98.35,
            default_zoom: 3.0,
            zoom: ZoomStrategy::Fixed(4.0),
            validation: CoordinateValidation::Permissive,
        }
    }

    /// The whole world, centered on (0, 0)
    pub fn world() -> Self {
        Self {
            default_latitude: 0.0,
            default_longitude: 0.0,
            default_zoom: 1.0,
            zoom: ZoomStrategy::Fixed(1.0),
            validation: CoordinateValidation::Permissive,
        }
    }

    #[must_use]
    pub fn with_zoom(self, zoom: ZoomStrategy) -> Self {
        Self { zoom, ..self }
    }

    #[must_use]
    pub fn with_validation(self, validation: CoordinateValidation) -> Self {
        Self { validation, ..self }
    }

    fn fallback(&self) -> ViewState {
        ViewState {
            latitude: self.default_latitude,
            longitude: self.default_longitude,
            zoom: self.default_zoom,
        }
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::conus()
    }
}

/// Compute the view for `document`.
///
/// Features without a geometry or without `coordinates` are skipped. If the
/// document contains no positions at all, the defaults from `options` are
/// returned.
///
/// # Errors
/// Returns [`GeoViewError::MalformedGeometry`] if a `coordinates` member has
/// an unexpected shape, or if a position is out of range and
/// [`CoordinateValidation::Wgs84`] is requested.
pub fn compute_view(document: &Document, options: &ViewOptions) -> Result<ViewState, GeoViewError> {
    let mut sum_lon = 0.0;
    let mut sum_lat = 0.0;
    let mut samples = 0usize;
    let mut bounds = BoundsBuilder::new();

    for (i, feature) in document.features().enumerate() {
        let Some(coordinates) = feature.coordinates() else {
            continue;
        };
        for position in CoordinateWalker::new(coordinates, i) {
            let (lon, lat) = position?;
            if options.validation == CoordinateValidation::Wgs84 {
                validate_wgs84(i, lon, lat)?;
            }
            sum_lon += lon;
            sum_lat += lat;
            samples += 1;
            bounds.add_point(lon, lat);
        }
    }

    trace!(samples, "collected positions");

    let Some(rect) = bounds.build() else {
        return Ok(options.fallback());
    };

    let n = samples as f64;
    let zoom = match options.zoom {
        ZoomStrategy::Fixed(zoom) => zoom,
        ZoomStrategy::FitBounds { min_zoom, max_zoom } => fit_zoom(&rect, min_zoom, max_zoom),
    };

    Ok(ViewState {
        latitude: sum_lat / n,
        longitude: sum_lon / n,
        zoom,
    })
}

/// Compute the bounding box of all positions in `document`, or [`None`] if
/// it has none
pub fn bounds(document: &Document) -> Result<Option<Rect>, GeoViewError> {
    let mut bounds = BoundsBuilder::new();
    for (i, feature) in document.features().enumerate() {
        if let Some(coordinates) = feature.coordinates() {
            for position in CoordinateWalker::new(coordinates, i) {
                let (lon, lat) = position?;
                bounds.add_point(lon, lat);
            }
        }
    }
    Ok(bounds.build())
}

/// Web-Mercator style zoom level at which `rect` fits into one tile. Each
/// zoom level halves the visible span, starting with 360 degrees of
/// longitude and 180 degrees of latitude at level 0.
fn fit_zoom(rect: &Rect, min_zoom: f64, max_zoom: f64) -> f64 {
    let lon_zoom = (360.0 / rect.width()).log2();
    let lat_zoom = (180.0 / rect.height()).log2();
    lon_zoom.min(lat_zoom).clamp(min_zoom, max_zoom)
}

fn validate_wgs84(feature: usize, lon: f64, lat: f64) -> Result<(), GeoViewError> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(GeoViewError::malformed_geometry(
            feature,
            format!("longitude {lon} is out of range"),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeoViewError::malformed_geometry(
            feature,
            format!("latitude {lat} is out of range"),
        ));
    }
    Ok(())
}
