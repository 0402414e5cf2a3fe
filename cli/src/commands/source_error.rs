use geoview_core::{ErrorKind, GeoViewError};
use thiserror::Error;
use yansi::{Condition, Paint};

/// An error that happened while loading a document or computing its view,
/// formatted for the user
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{0}")]
    Display(String),
}

/// Convert a [`GeoViewError`] into a [`SourceError`]
pub trait IntoSourceError {
    fn into_source_error(self) -> SourceError;
}

fn hint(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::SourceUnavailable => {
            "This may mean outbound internet access is blocked, the remote service is \
            temporarily unavailable, or the file does not exist."
        }
        ErrorKind::MalformedDocument => {
            "The data was received but is not a GeoJSON feature collection."
        }
        ErrorKind::MalformedGeometry => {
            "A feature's `coordinates' do not consist of [longitude, latitude] positions."
        }
    }
}

impl IntoSourceError for GeoViewError {
    fn into_source_error(self) -> SourceError {
        let kind = self.kind();
        let title = match kind {
            ErrorKind::SourceUnavailable => "Error fetching GeoJSON",
            ErrorKind::MalformedDocument => "Error parsing GeoJSON",
            ErrorKind::MalformedGeometry => "Error computing the map view",
        };
        SourceError::Display(
            format!(
                "{}\n\n{}\n\n{} {}",
                title.red().bold(),
                hint(kind),
                "Details:".bold(),
                self
            )
            .whenever(Condition::from(|| {
                Condition::stderr_is_tty() && Condition::clicolor() && Condition::no_color()
            }))
            .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_are_kept() {
        let err = GeoViewError::SourceUnavailable {
            source_name: "https://www.spc.noaa.gov/x.geojson".to_string(),
            cause: "HTTP 503 Service Unavailable".to_string(),
        };
        let SourceError::Display(msg) = err.into_source_error();
        assert!(msg.contains("Error fetching GeoJSON"));
        assert!(msg.contains("HTTP 503 Service Unavailable"));
    }
}
