//! Detector configuration.

use crate::error::{CompatError, Result};
use crate::findings::{ChangeType, FindingCategory};
use serde::{Deserialize, Serialize};

/// What to do with a type reference that changed and cannot be resolved in
/// its own snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedTypePolicy {
    /// Drop the finding.
    Ignore,
    /// Report it as MINOR so gates notice without failing.
    #[default]
    Minor,
    /// Report it as MAJOR: unverifiable input fails the gate.
    Major,
}

impl UnresolvedTypePolicy {
    pub fn change_type(&self) -> Option<ChangeType> {
        match self {
            UnresolvedTypePolicy::Ignore => None,
            UnresolvedTypePolicy::Minor => Some(ChangeType::Minor),
            UnresolvedTypePolicy::Major => Some(ChangeType::Major),
        }
    }
}

impl std::str::FromStr for UnresolvedTypePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(UnresolvedTypePolicy::Ignore),
            "minor" => Ok(UnresolvedTypePolicy::Minor),
            "major" => Ok(UnresolvedTypePolicy::Major),
            _ => Err(format!("Unknown unresolved type policy: {s}")),
        }
    }
}

/// Configuration for one detection run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Package prefixes of the API under check. When set, only files whose
    /// package starts with one of them are compared; the others still take
    /// part in type resolution.
    pub package_prefixes: Vec<String>,
    /// Severity of TYPE_REFERENCE_UNRESOLVED findings
    pub unresolved_types: UnresolvedTypePolicy,
    /// Categories dropped from the result
    pub ignore_categories: Vec<FindingCategory>,
}

impl DetectorConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CompatError::io(path, e))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from YAML string; settings live under `detector:`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct ConfigFile {
            detector: Option<DetectorConfig>,
        }

        let config_file: ConfigFile = serde_yaml::from_str(yaml)?;
        Ok(config_file.detector.unwrap_or_default())
    }

    /// Whether files of `package` are part of the API under check.
    pub fn includes_package(&self, package: &str) -> bool {
        let package = package.trim_start_matches('.');
        self.package_prefixes.is_empty()
            || self
                .package_prefixes
                .iter()
                .any(|prefix| package.starts_with(prefix.trim_start_matches('.')))
    }
}
