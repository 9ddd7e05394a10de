pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_DELIMITER: &str = ";";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "padron-etl")]
#[command(about = "Validate DNI/NIE/CIF, email and phone columns of a ';'-separated user export")]
pub struct CliConfig {
    /// Input CSV file
    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Prefix added to every output file name
    #[arg(long)]
    pub run_id: Option<String>,

    /// Do not append a timestamp to output file names
    #[arg(long)]
    pub no_timestamp: bool,

    /// Also pack every output file into this zip archive
    #[arg(long)]
    pub bundle: Option<String>,

    /// Write the run summary as JSON next to the CSV outputs
    #[arg(long)]
    pub summary_json: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn delimiter(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b';')
    }

    fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    fn timestamped(&self) -> bool {
        !self.no_timestamp
    }

    fn summary_json(&self) -> bool {
        self.summary_json
    }

    fn bundle_filename(&self) -> Option<&str> {
        self.bundle.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extensions("input", std::slice::from_ref(&self.input), &["csv"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_delimiter("delimiter", &self.delimiter)?;

        if let Some(run_id) = &self.run_id {
            validation::validate_non_empty_string("run_id", run_id)?;
        }
        if let Some(bundle) = &self.bundle {
            validation::validate_file_extensions("bundle", std::slice::from_ref(bundle), &["zip"])?;
        }
        Ok(())
    }
}
