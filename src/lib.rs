pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::{etl::EtlEngine, pipeline::CsvPipeline};
pub use domain::model::{BatchResult, BatchSummary, ClassificationOutcome, Record, Table};
pub use domain::services::{batch, classifier, email, identifier, phone};
pub use utils::error::{EtlError, Result};
