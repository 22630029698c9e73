//! Compiler options, loaded from the `[compile]` table of a TOML file.

use serde::Deserialize;

use crate::error::{CompileError, CompileResult};

/// Options controlling a compilation run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompileOptions {
    /// Run stack-depth analysis and write `max-stack`/`max-locals`.
    /// When off, every compiled method is left stale.
    pub compute_maxs: bool,

    /// Prefix of canonical label identifiers (default: "L")
    pub label_prefix: String,
}

#[derive(Debug, Default, Deserialize)]
struct OptionsFile {
    #[serde(default)]
    compile: CompileOptions,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            compute_maxs: true,
            label_prefix: "L".to_string(),
        }
    }
}

impl CompileOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from TOML; a missing `[compile]` table gives the defaults.
    pub fn from_toml(content: &str) -> CompileResult<Self> {
        let file: OptionsFile = toml::from_str(content).map_err(|e| CompileError::Config {
            message: e.to_string(),
        })?;
        if file.compile.label_prefix.is_empty() {
            return Err(CompileError::Config {
                message: "label-prefix cannot be empty".to_string(),
            });
        }
        Ok(file.compile)
    }

    pub fn with_compute_maxs(mut self, compute_maxs: bool) -> Self {
        self.compute_maxs = compute_maxs;
        self
    }

    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompileOptions::new();
        assert!(options.compute_maxs);
        assert_eq!(options.label_prefix, "L");
    }

    #[test]
    fn test_missing_table() {
        let options = CompileOptions::from_toml("[package]\nname = \"app\"\n").unwrap();
        assert_eq!(options, CompileOptions::default());
    }

    #[test]
    fn test_partial_table() {
        let options = CompileOptions::from_toml("[compile]\ncompute-maxs = false\n").unwrap();
        assert!(!options.compute_maxs);
        assert_eq!(options.label_prefix, "L");
    }

    #[test]
    fn test_label_prefix() {
        let options = CompileOptions::from_toml("[compile]\nlabel-prefix = \"lbl\"\n").unwrap();
        assert_eq!(options.label_prefix, "lbl");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            CompileOptions::from_toml("[compile]\ncompute-maxs = \"yes\"\n"),
            Err(CompileError::Config { .. })
        ));
        assert!(matches!(
            CompileOptions::from_toml("[compile]\nlabel-prefix = \"\"\n"),
            Err(CompileError::Config { .. })
        ));
    }
}
