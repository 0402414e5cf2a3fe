pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod presets;
pub mod source;
pub mod util;
pub mod view;

pub use document::{Document, Feature, FeatureFilter};
pub use error::{ErrorKind, GeoViewError};
pub use source::{GeoSourceResolver, Resolve, SourceConfig};
pub use view::{compute_view, ViewOptions, ViewState};
