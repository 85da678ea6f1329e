//! Export of the colored planet to image files.

mod equirect;

pub use equirect::{ExportError, export_equirect_png};
