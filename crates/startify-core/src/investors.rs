use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BUILTIN_INVESTORS: &str = include_str!("../config/investors.yaml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorProfile {
    pub name: String,
    pub firm: String,
    pub focus: Vec<String>,
    pub stage: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub portfolio: Vec<String>,
}

impl InvestorProfile {
    /// Case-insensitive membership test against the focus list.
    #[must_use]
    pub fn focuses_on(&self, area: &str) -> bool {
        self.focus.iter().any(|f| f.eq_ignore_ascii_case(area))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvestorsFile {
    pub investors: Vec<InvestorProfile>,
}

/// The ten-investor pool compiled into the binary.
///
/// # Errors
///
/// Returns `ConfigError` only if the embedded YAML is malformed.
pub fn builtin_investor_pool() -> Result<InvestorsFile, ConfigError> {
    parse_investors(BUILTIN_INVESTORS)
}

/// Load and validate an investor pool from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_investor_pool(path: &Path) -> Result<InvestorsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvestorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_investors(&content)
}

fn parse_investors(content: &str) -> Result<InvestorsFile, ConfigError> {
    let file: InvestorsFile =
        serde_yaml::from_str(content).map_err(ConfigError::InvestorsFileParse)?;
    validate_investors(&file)?;
    Ok(file)
}

fn validate_investors(file: &InvestorsFile) -> Result<(), ConfigError> {
    if file.investors.is_empty() {
        return Err(ConfigError::Validation(
            "investor pool must contain at least one investor".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    for investor in &file.investors {
        if investor.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "investor name must be non-empty".to_string(),
            ));
        }

        if investor.focus.iter().all(|f| f.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "investor '{}' must list at least one focus area",
                investor.name
            )));
        }

        if !seen_names.insert(investor.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate investor name: '{}'",
                investor.name
            )));
        }
    }

    Ok(())
}
