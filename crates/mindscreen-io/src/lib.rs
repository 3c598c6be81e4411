//! File I/O for the mindscreen pipeline: the CSV dataset, JSON artifacts
//! and report output.

mod artifact;
mod dataset_reader;
mod domain;
mod error;
mod writer;

pub use artifact::{load_model, load_preprocessing, load_record};
pub use dataset_reader::DatasetReader;
pub use domain::{ReportKind, ReportName};
pub use error::IoError;
pub use writer::ReportWriter;
