use thiserror::Error;

/// Errors produced while resolving a GeoJSON source or computing a view.
///
/// All variants are recoverable. Callers are expected to catch them and
/// display a message instead of aborting.
#[derive(Error, Debug)]
pub enum GeoViewError {
    /// The bytes could not be obtained (file not found, connection refused,
    /// timeout, non-success HTTP status, ...)
    #[error("source `{source_name}' is unavailable: {cause}")]
    SourceUnavailable { source_name: String, cause: String },

    /// The bytes were obtained but are not valid JSON or do not have the
    /// shape of a feature collection
    #[error("source `{source_name}' does not contain a valid GeoJSON document: {cause}")]
    MalformedDocument { source_name: String, cause: String },

    /// A `coordinates` member of a feature's geometry has an unexpected shape
    #[error("malformed geometry in feature {feature}: {reason}")]
    MalformedGeometry { feature: usize, reason: String },
}

/// The kind of a [`GeoViewError`] without its payload
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    SourceUnavailable,
    MalformedDocument,
    MalformedGeometry,
}

impl GeoViewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeoViewError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            GeoViewError::MalformedDocument { .. } => ErrorKind::MalformedDocument,
            GeoViewError::MalformedGeometry { .. } => ErrorKind::MalformedGeometry,
        }
    }

    pub(crate) fn unavailable(source_name: impl Into<String>, cause: impl ToString) -> Self {
        GeoViewError::SourceUnavailable {
            source_name: source_name.into(),
            cause: cause.to_string(),
        }
    }

    pub(crate) fn malformed_document(source_name: impl Into<String>, cause: impl ToString) -> Self {
        GeoViewError::MalformedDocument {
            source_name: source_name.into(),
            cause: cause.to_string(),
        }
    }

    pub(crate) fn malformed_geometry(feature: usize, reason: impl Into<String>) -> Self {
        GeoViewError::MalformedGeometry {
            feature,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::SourceUnavailable => "source unavailable",
            ErrorKind::MalformedDocument => "malformed document",
            ErrorKind::MalformedGeometry => "malformed geometry",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let e = GeoViewError::unavailable("http://example.com", "HTTP 503");
        assert_eq!(e.kind(), ErrorKind::SourceUnavailable);
        assert!(e.to_string().contains("HTTP 503"));

        let e = GeoViewError::malformed_document("a.geojson", "expected value");
        assert_eq!(e.kind(), ErrorKind::MalformedDocument);

        let e = GeoViewError::malformed_geometry(2, "leaf is a string");
        assert_eq!(e.kind(), ErrorKind::MalformedGeometry);
        assert_eq!(
            e.to_string(),
            "malformed geometry in feature 2: leaf is a string"
        );
    }
}
