// Configuration loading and validation (config/moodlens.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the configuration file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "moodlens.toml";

/// Service root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

/// Function-key presets are bound to F1..F9.
pub const MAX_PRESETS: usize = 9;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub examples: ExamplesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Root of the classification API, without a trailing path.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Initial slider position, in [0, 1].
    pub default_threshold: f64,
    /// How far one Up/Down keypress moves the slider.
    #[serde(default = "default_threshold_step")]
    pub threshold_step: f64,
}

fn default_threshold_step() -> f64 {
    0.05
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamplesConfig {
    /// Example texts loadable with F1..F9.
    #[serde(default)]
    pub presets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service: ServiceConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            analysis: AnalysisConfig {
                default_threshold: 0.5,
                threshold_step: default_threshold_step(),
            },
            examples: ExamplesConfig::default(),
        }
    }
}

impl Config {
    /// Apply command-line overrides and re-validate.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        threshold: Option<f64>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = base_url {
            self.service.base_url = url;
        }
        if let Some(t) = threshold {
            self.analysis.default_threshold = t;
        }
        validate(&self)?;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/moodlens.toml` relative to `base_dir`.
///
/// Does not seed defaults; prefer [`load_config`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Copy files from `defaults/` into `config/` when they are missing there.
/// Returns the files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, seeding
/// `config/` from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = config.service.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "service.base_url".into(),
            message: format!("must start with http:// or https://, got `{url}`"),
        });
    }

    let threshold = config.analysis.default_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::ValidationError {
            field: "analysis.default_threshold".into(),
            message: format!("must be between 0.0 and 1.0 inclusive, got {threshold}"),
        });
    }

    let step = config.analysis.threshold_step;
    if !(step > 0.0 && step <= 1.0) {
        return Err(ConfigError::ValidationError {
            field: "analysis.threshold_step".into(),
            message: format!("must be in (0.0, 1.0], got {step}"),
        });
    }

    let presets = &config.examples.presets;
    if presets.len() > MAX_PRESETS {
        return Err(ConfigError::ValidationError {
            field: "examples.presets".into(),
            message: format!("at most {MAX_PRESETS} presets, got {}", presets.len()),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Fresh scratch directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("moodlens_config_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_config(base: &Path, contents: &str) {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), contents).unwrap();
    }

    const VALID: &str = r#"
[service]
base_url = "http://localhost:5001"

[analysis]
default_threshold = 0.5
threshold_step = 0.05

[examples]
presets = ["I am so happy and excited!", "This is terrible, I'm furious."]
"#;

    #[test]
    fn load_valid_config() {
        let dir = scratch_dir("valid");
        write_config(&dir, VALID);

        let config = load_config_from(&dir).expect("should load valid config");
        assert_eq!(config.service.base_url, "http://localhost:5001");
        assert!((config.analysis.default_threshold - 0.5).abs() < f64::EPSILON);
        assert!((config.analysis.threshold_step - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.examples.presets.len(), 2);
    }

    #[test]
    fn examples_section_is_optional() {
        let dir = scratch_dir("no_examples");
        write_config(
            &dir,
            "[service]\nbase_url = \"http://127.0.0.1:9000\"\n\n[analysis]\ndefault_threshold = 0.3\n",
        );

        let config = load_config_from(&dir).unwrap();
        assert!(config.examples.presets.is_empty());
        assert!((config.analysis.threshold_step - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn shipped_defaults_are_valid() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let text = fs::read_to_string(root.join("defaults").join(CONFIG_FILE))
            .expect("defaults/moodlens.toml should exist");
        let config: Config = toml::from_str(&text).unwrap();
        validate(&config).unwrap();
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
        assert!(!config.examples.presets.is_empty());
    }

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.service.base_url, "http://localhost:5001");
        assert!((config.analysis.default_threshold - 0.5).abs() < f64::EPSILON);
        validate(&config).unwrap();
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let dir = scratch_dir("bad_threshold");
        write_config(&dir, &VALID.replace("default_threshold = 0.5", "default_threshold = 1.5"));

        match load_config_from(&dir) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "analysis.default_threshold");
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_step() {
        let dir = scratch_dir("zero_step");
        write_config(&dir, &VALID.replace("threshold_step = 0.05", "threshold_step = 0.0"));

        match load_config_from(&dir) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "analysis.threshold_step");
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_http_base_url() {
        let dir = scratch_dir("bad_url");
        write_config(&dir, &VALID.replace("http://localhost:5001", "localhost:5001"));

        match load_config_from(&dir) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "service.base_url");
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_too_many_presets() {
        let dir = scratch_dir("many_presets");
        let presets: Vec<String> = (0..10).map(|i| format!("\"text {i}\"")).collect();
        let contents = format!(
            "[service]\nbase_url = \"http://localhost:5001\"\n[analysis]\ndefault_threshold = 0.5\n[examples]\npresets = [{}]\n",
            presets.join(", ")
        );
        write_config(&dir, &contents);

        assert!(matches!(
            load_config_from(&dir),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn file_not_found_when_missing() {
        let dir = scratch_dir("missing");
        match load_config_from(&dir) {
            Err(ConfigError::FileNotFound { path }) => {
                assert!(path.ends_with(CONFIG_FILE));
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let dir = scratch_dir("invalid_toml");
        write_config(&dir, "[service\nbase_url = ");

        assert!(matches!(
            load_config_from(&dir),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn overrides_replace_and_revalidate() {
        let config = Config::default()
            .with_overrides(Some("https://emotions.example.com".into()), Some(0.25))
            .unwrap();
        assert_eq!(config.service.base_url, "https://emotions.example.com");
        assert!((config.analysis.default_threshold - 0.25).abs() < f64::EPSILON);

        assert!(Config::default().with_overrides(None, Some(-0.1)).is_err());
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let dir = scratch_dir("copy_defaults");
        fs::create_dir_all(dir.join("defaults")).unwrap();
        fs::write(dir.join("defaults").join(CONFIG_FILE), VALID).unwrap();

        let copied = ensure_config_files(&dir).unwrap();
        assert_eq!(copied.len(), 1);
        assert!(dir.join("config").join(CONFIG_FILE).exists());

        // Second run leaves the existing file alone.
        let copied = ensure_config_files(&dir).unwrap();
        assert!(copied.is_empty());
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let dir = scratch_dir("no_dirs");
        assert!(matches!(
            ensure_config_files(&dir),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
    }
}
