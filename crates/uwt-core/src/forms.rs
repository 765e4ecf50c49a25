use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Form codes the collector walks when no catalog file is present.
///
/// Order is significant: collection runs visit forms in exactly this order,
/// which keeps run logs and request pacing deterministic.
const BUILTIN_FORMS: &[&str] = &[
    "I-102", "I-129", "I-129CW", "I-129F", "I-130", "I-131", "I-140", "I-212", "I-360", "I-407",
    "I-485", "I-526", "I-539", "I-600", "I-600A", "I-601", "I-601A", "I-612", "I-730", "I-751",
    "I-765", "I-765V", "I-800", "I-800A", "I-817", "I-821", "I-821D", "I-824", "I-829", "I-90",
    "I-914", "I-918", "I-929", "N-400", "N-565", "N-600", "N-600K",
];

/// The ordered set of form codes a collection run covers.
///
/// Handed to the collector as a value so tests and one-off runs can use a
/// reduced catalog instead of the full production list.
#[derive(Debug, Clone, Deserialize)]
pub struct FormCatalog {
    pub forms: Vec<String>,
}

impl FormCatalog {
    /// The fixed catalog shipped with the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            forms: BUILTIN_FORMS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Load and validate a catalog from a YAML file with a top-level
    /// `forms:` list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;

        let catalog: FormCatalog = serde_yaml::from_str(&content)?;
        validate_catalog(&catalog)?;
        Ok(catalog)
    }

    /// Load the catalog from `path`, falling back to the built-in catalog
    /// when the file does not exist. A file that exists but fails to parse
    /// or validate is still an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an existing but unreadable or invalid file.
    pub fn load_or_builtin(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::builtin())
        }
    }

    #[must_use]
    pub fn contains(&self, form_code: &str) -> bool {
        self.forms.iter().any(|f| f == form_code)
    }
}

fn validate_catalog(catalog: &FormCatalog) -> Result<(), ConfigError> {
    if catalog.forms.is_empty() {
        return Err(ConfigError::Validation(
            "form catalog must list at least one form".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for form in &catalog.forms {
        if form.trim().is_empty() {
            return Err(ConfigError::Validation(
                "form code must be non-empty".to_string(),
            ));
        }
        if !seen.insert(form.to_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate form code: '{form}'"
            )));
        }
    }

    Ok(())
}
