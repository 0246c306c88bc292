//! apoc-export library
//!
//! Converts objects from Apocalypse archives to Wavefront OBJ text, or lists
//! the records they are stored in. Used by the `apoc-obj` command.

pub mod config;
pub mod convert;
pub mod materials;
pub mod obj;
pub mod process;

pub use config::ExportConfig;
pub use convert::{
    ConversionSummary, ConvertOptions, Mode, ObjectSummary, OutputOptions, Selection, convert,
};
pub use obj::PolygonSplit;
pub use process::{RunOptions, batch_output_path, process_batch, process_file};
