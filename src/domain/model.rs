use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const DNI_FIELD: &str = "dni";
pub const EMAIL_FIELD: &str = "email";
pub const PHONE_FIELD: &str = "telefono";
pub const OLD_USER_FIELD: &str = "old_user";
pub const INVALID_REASON_FIELD: &str = "motivo_invalido";
pub const WARNING_REASON_FIELD: &str = "motivo_warning";
pub const EMAIL_ORIGINAL_FIELD: &str = "email_original";

/// 輸入表頭至少要有的欄位
pub const REQUIRED_COLUMNS: [&str; 3] = [DNI_FIELD, EMAIL_FIELD, PHONE_FIELD];

/// 沒有名稱的欄位在讀取時會被命名為 `Unnamed: N`，輸出前全部移除
pub const UNNAMED_MARKER: &str = "Unnamed";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing fields read as empty strings.
    pub fn get(&self, field: &str) -> &str {
        self.data.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.data.insert(field.to_string(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 解析後的輸入表：表頭順序 + 每列資料
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub reason: String,
}

impl ValidationVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: String::new(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailVerdict {
    pub is_valid: bool,
    pub reason: String,
    pub normalized: String,
    pub original: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationOutcome {
    Valid,
    /// Valid record whose email failed; the record is also copied to the warning output.
    ValidWithWarning {
        reason: String,
        email_original: String,
    },
    Invalid {
        reason: String,
    },
}

impl ClassificationOutcome {
    pub fn is_valid(&self) -> bool {
        !matches!(self, ClassificationOutcome::Invalid { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ClassificationOutcome::Valid => None,
            ClassificationOutcome::ValidWithWarning { reason, .. }
            | ClassificationOutcome::Invalid { reason } => Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Valid,
    Invalid,
    Warning,
}

impl OutputKind {
    pub const ALL: [OutputKind; 3] = [OutputKind::Valid, OutputKind::Invalid, OutputKind::Warning];

    pub fn file_stem(&self) -> &'static str {
        match self {
            OutputKind::Valid => "usuarios_validos",
            OutputKind::Invalid => "usuarios_invalidos",
            OutputKind::Warning => "usuarios_advertencias",
        }
    }

    /// 各輸出在原始欄位之後附加的欄位
    pub fn annotation_columns(&self) -> &'static [&'static str] {
        match self {
            OutputKind::Valid => &[OLD_USER_FIELD],
            OutputKind::Invalid => &[OLD_USER_FIELD, INVALID_REASON_FIELD],
            OutputKind::Warning => &[OLD_USER_FIELD, EMAIL_ORIGINAL_FIELD, WARNING_REASON_FIELD],
        }
    }
}

/// Frequency table of rejection reasons, keyed by the exact reason string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasonCounts {
    counts: BTreeMap<String, usize>,
}

impl ReasonCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, reason: &str) {
        *self.counts.entry(reason.to_string()).or_insert(0) += 1;
    }

    /// 依鍵值相加，與合併順序無關
    pub fn merge(&mut self, other: &ReasonCounts) {
        for (reason, count) in &other.counts {
            *self.counts.entry(reason.clone()).or_insert(0) += count;
        }
    }

    pub fn get(&self, reason: &str) -> usize {
        self.counts.get(reason).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Descending by count; ties ordered by reason text.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(reason, count)| (reason.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<'a> FromIterator<&'a str> for ReasonCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counts = ReasonCounts::new();
        for reason in iter {
            counts.add(reason);
        }
        counts
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Source header, in input order, before any filtering.
    pub columns: Vec<String>,
    pub total_records: usize,
    pub valid: Vec<Record>,
    pub invalid: Vec<Record>,
    pub warnings: Vec<Record>,
    pub invalid_reasons: ReasonCounts,
    pub warning_reasons: ReasonCounts,
}

impl BatchResult {
    pub fn records(&self, kind: OutputKind) -> &[Record] {
        match kind {
            OutputKind::Valid => &self.valid,
            OutputKind::Invalid => &self.invalid,
            OutputKind::Warning => &self.warnings,
        }
    }
}

/// 提供給呼叫端（CLI、報表）的彙總結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub warning_records: usize,
    pub valid_file: Option<String>,
    pub invalid_file: Option<String>,
    pub warning_file: Option<String>,
    pub columns: Vec<String>,
    pub invalid_reasons: ReasonCounts,
    pub warning_reasons: ReasonCounts,
}

impl BatchSummary {
    pub fn from_result(result: &BatchResult) -> Self {
        Self {
            total_records: result.total_records,
            valid_records: result.valid.len(),
            invalid_records: result.invalid.len(),
            warning_records: result.warnings.len(),
            valid_file: None,
            invalid_file: None,
            warning_file: None,
            columns: result.columns.clone(),
            invalid_reasons: result.invalid_reasons.clone(),
            warning_reasons: result.warning_reasons.clone(),
        }
    }

    pub fn set_file(&mut self, kind: OutputKind, file_name: String) {
        let slot = match kind {
            OutputKind::Valid => &mut self.valid_file,
            OutputKind::Invalid => &mut self.invalid_file,
            OutputKind::Warning => &mut self.warning_file,
        };
        *slot = Some(file_name);
    }

    pub fn file(&self, kind: OutputKind) -> Option<&str> {
        match kind {
            OutputKind::Valid => self.valid_file.as_deref(),
            OutputKind::Invalid => self.invalid_file.as_deref(),
            OutputKind::Warning => self.warning_file.as_deref(),
        }
    }
}
