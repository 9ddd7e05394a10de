pub mod etl;
pub mod pipeline;
pub mod report;
pub mod table;

pub use crate::domain::model::{BatchResult, BatchSummary, Record, Table};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
