use crate::config::DEFAULT_DELIMITER;
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub run_id: Option<String>,
    pub timestamped: Option<bool>,
    pub summary_json: Option<bool>,
    pub bundle: Option<BundleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INPUT_DIR})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extensions(
            "input.path",
            std::slice::from_ref(&self.input.path),
            &["csv"],
        )?;
        if let Some(delimiter) = &self.input.delimiter {
            validation::validate_delimiter("input.delimiter", delimiter)?;
        }
        validation::validate_path("output.path", &self.output.path)?;

        if let Some(bundle) = self.output.bundle.as_ref().filter(|b| b.enabled) {
            let filename =
                validation::validate_required_field("output.bundle.filename", &bundle.filename)?;
            validation::validate_file_extensions(
                "output.bundle.filename",
                std::slice::from_ref(filename),
                &["zip"],
            )?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn delimiter(&self) -> u8 {
        self.input
            .delimiter
            .as_deref()
            .unwrap_or(DEFAULT_DELIMITER)
            .as_bytes()
            .first()
            .copied()
            .unwrap_or(b';')
    }

    fn run_id(&self) -> Option<&str> {
        self.output.run_id.as_deref()
    }

    fn timestamped(&self) -> bool {
        self.output.timestamped.unwrap_or(true)
    }

    fn summary_json(&self) -> bool {
        self.output.summary_json.unwrap_or(false)
    }

    fn bundle_filename(&self) -> Option<&str> {
        self.output
            .bundle
            .as_ref()
            .filter(|b| b.enabled)
            .and_then(|b| b.filename.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
