use crate::core::io::pdb::ResidueSelection;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MIN_TOTAL: u64 = 500;
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000_000;

const ALL_RESIDUES_KEYWORD: &str = "all";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    pub min_total: u64,
    pub max_iterations: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_total: DEFAULT_MIN_TOTAL,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Default)]
pub struct SolverConfigBuilder {
    min_total: Option<u64>,
    max_iterations: Option<u64>,
}

impl SolverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_total(mut self, total: u64) -> Self {
        self.min_total = Some(total);
        self
    }
    pub fn max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn build(self) -> Result<SolverConfig, ConfigError> {
        let min_total = self
            .min_total
            .ok_or(ConfigError::MissingParameter("min_total"))?;
        let max_iterations = self
            .max_iterations
            .ok_or(ConfigError::MissingParameter("max_iterations"))?;
        if min_total == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "min_total",
                reason: "must be at least 1".to_string(),
            });
        }
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(SolverConfig {
            min_total,
            max_iterations,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateConfig {
    pub residues: ResidueSelection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlendConfig {
    pub solver: SolverConfig,
    pub annotate: AnnotateConfig,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSolverConfig {
    #[serde(rename = "min-total")]
    min_total: Option<u64>,
    #[serde(rename = "max-iterations")]
    max_iterations: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum PartialResidueSelection {
    Keyword(String),
    Names(Vec<String>),
}

impl TryFrom<PartialResidueSelection> for ResidueSelection {
    type Error = ConfigError;

    fn try_from(p: PartialResidueSelection) -> Result<Self, Self::Error> {
        match p {
            PartialResidueSelection::Keyword(keyword)
                if keyword.eq_ignore_ascii_case(ALL_RESIDUES_KEYWORD) =>
            {
                Ok(ResidueSelection::All)
            }
            PartialResidueSelection::Keyword(other) => Err(ConfigError::InvalidValue {
                parameter: "residues",
                reason: format!(
                    "expected '{}' or a list of residue names, found '{}'",
                    ALL_RESIDUES_KEYWORD, other
                ),
            }),
            PartialResidueSelection::Names(names) => Ok(ResidueSelection::named(names)),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAnnotateConfig {
    residues: Option<PartialResidueSelection>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialBlendConfig {
    solver: Option<PartialSolverConfig>,
    annotate: Option<PartialAnnotateConfig>,
}

impl PartialBlendConfig {
    fn into_config(self) -> Result<BlendConfig, ConfigError> {
        let defaults = SolverConfig::default();
        let solver = self.solver.unwrap_or_default();
        let solver = SolverConfigBuilder::new()
            .min_total(solver.min_total.unwrap_or(defaults.min_total))
            .max_iterations(solver.max_iterations.unwrap_or(defaults.max_iterations))
            .build()?;

        let residues = match self.annotate.and_then(|a| a.residues) {
            Some(selection) => selection.try_into()?,
            None => ResidueSelection::All,
        };

        Ok(BlendConfig {
            solver,
            annotate: AnnotateConfig { residues },
        })
    }
}

impl BlendConfig {
    /// Loads a TOML configuration file. Absent sections and keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigLoadError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigLoadError> {
        let partial: PartialBlendConfig =
            toml::from_str(content).map_err(|e| ConfigLoadError::Toml {
                path: origin.to_string(),
                source: e,
            })?;
        Ok(partial.into_config()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn solver_config_default_matches_documented_values() {
        let config = SolverConfig::default();
        assert_eq!(config.min_total, 500);
        assert_eq!(config.max_iterations, 10_000_000);
    }

    #[test]
    fn builder_builds_complete_config() {
        let config = SolverConfigBuilder::new()
            .min_total(1000)
            .max_iterations(42)
            .build()
            .unwrap();
        assert_eq!(
            config,
            SolverConfig {
                min_total: 1000,
                max_iterations: 42
            }
        );
    }

    #[test]
    fn builder_reports_missing_parameters() {
        let err = SolverConfigBuilder::new().max_iterations(10).build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("min_total"));

        let err = SolverConfigBuilder::new().min_total(10).build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("max_iterations"));
    }

    #[test]
    fn builder_rejects_zero_values() {
        let err = SolverConfigBuilder::new()
            .min_total(0)
            .max_iterations(10)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                parameter: "min_total",
                ..
            }
        ));

        let err = SolverConfigBuilder::new()
            .min_total(10)
            .max_iterations(0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                parameter: "max_iterations",
                ..
            }
        ));
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = BlendConfig::from_toml_str("").unwrap();
        assert_eq!(config, BlendConfig::default());
        assert_eq!(config.annotate.residues, ResidueSelection::All);
    }

    #[test]
    fn full_document_overrides_every_value() {
        let config = BlendConfig::from_toml_str(
            r#"
            [solver]
            min-total = 2000
            max-iterations = 5000

            [annotate]
            residues = ["WAT", "TFE"]
            "#,
        )
        .unwrap();
        assert_eq!(config.solver.min_total, 2000);
        assert_eq!(config.solver.max_iterations, 5000);
        assert_eq!(
            config.annotate.residues,
            ResidueSelection::named(["TFE", "WAT"])
        );
    }

    #[test]
    fn residues_keyword_all_is_case_insensitive() {
        let config = BlendConfig::from_toml_str(
            r#"
            [annotate]
            residues = "ALL"
            "#,
        )
        .unwrap();
        assert_eq!(config.annotate.residues, ResidueSelection::All);
    }

    #[test]
    fn unknown_residues_keyword_is_rejected() {
        let err = BlendConfig::from_toml_str(
            r#"
            [annotate]
            residues = "none"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Invalid(ConfigError::InvalidValue {
                parameter: "residues",
                ..
            })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = BlendConfig::from_toml_str(
            r#"
            [solver]
            tolerance = 0.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Toml { .. }));
    }

    #[test]
    fn zero_min_total_in_file_is_rejected() {
        let err = BlendConfig::from_toml_str(
            r#"
            [solver]
            min-total = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));
    }

    #[test]
    fn load_reads_config_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("blendrc.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(
            file,
            r#"
            [solver]
            min-total = 750
            "#
        )
        .unwrap();

        let config = BlendConfig::load(&file_path).unwrap();
        assert_eq!(config.solver.min_total, 750);
        assert_eq!(config.solver.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn load_reports_missing_file_with_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing.toml");
        let err = BlendConfig::load(&file_path).unwrap_err();
        match err {
            ConfigLoadError::Io { path, .. } => assert!(path.ends_with("missing.toml")),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
