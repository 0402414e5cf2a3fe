pub mod features;
pub mod list;
pub mod presets;
pub mod source_args;
pub mod source_error;
pub mod view;
