pub mod json;

pub use json::{ExportError, export_group_to_path, import_group};
