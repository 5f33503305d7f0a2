//! Configuration system for RepCoach
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (REPCOACH_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::lexicon::{Lexicon, MatchMode};

/// Main coach configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Logging configuration
    pub logging: LoggingSettings,

    /// Where session records are kept
    pub storage: StorageSettings,

    /// Persona catalog source
    pub catalog: CatalogSettings,

    /// Live conversation settings
    pub conversation: ConversationSettings,

    /// Phrase lists and matching rule
    pub lexicon: LexiconSettings,

    /// Transcript evaluation settings
    pub evaluation: EvaluationSettings,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// Storage path settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding one JSON file per session
    pub transcript_dir: String,
}

/// Persona catalog settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory of persona TOML files replacing the bundled set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_dir: Option<String>,
}

/// Conversation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationSettings {
    /// Simulated seconds each turn consumes
    pub turn_seconds: u64,
}

/// Lexicon overrides. Unset lists keep the built-in vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconSettings {
    /// substring or whole-word
    pub match_mode: MatchMode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hype: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_cues: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_words: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monologue_word_limit: Option<usize>,
}

/// Evaluation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Maximum highlights reported per transcript
    pub highlight_limit: usize,
}

// ─────────────────────────────────────────────────────────────────
// Default implementations
// ─────────────────────────────────────────────────────────────────

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            transcript_dir: "~/.repcoach/sessions".to_string(),
        }
    }
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self { turn_seconds: 30 }
    }
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self { highlight_limit: 6 }
    }
}

impl LexiconSettings {
    /// Built-in lexicon with this section's overrides applied.
    pub fn to_lexicon(&self) -> Lexicon {
        let mut lexicon = Lexicon {
            match_mode: self.match_mode,
            ..Lexicon::default()
        };
        let overrides = [
            (&self.hype, &mut lexicon.hype),
            (&self.evidence, &mut lexicon.evidence),
            (&self.repetition, &mut lexicon.repetition),
            (&self.pressure_cues, &mut lexicon.pressure_cues),
            (&self.patient_words, &mut lexicon.patient_words),
        ];
        for (custom, target) in overrides {
            if let Some(list) = custom {
                *target = list.clone();
            }
        }
        if let Some(limit) = self.monologue_word_limit {
            lexicon.monologue_word_limit = limit;
        }
        lexicon.normalized()
    }

    fn lists(&self) -> [(&'static str, &Option<Vec<String>>); 5] {
        [
            ("lexicon.hype", &self.hype),
            ("lexicon.evidence", &self.evidence),
            ("lexicon.repetition", &self.repetition),
            ("lexicon.pressure_cues", &self.pressure_cues),
            ("lexicon.patient_words", &self.patient_words),
        ]
    }
}

impl CoachConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            config = Self::from_file(&path)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Parse one TOML file without overrides or validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::IoRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e.message()),
            source: Some(e),
        })
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            PathBuf::from("repcoach.toml"),
            PathBuf::from("config.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("repcoach").join("config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".repcoach").join("config.toml"))
                .unwrap_or_default(),
            // System config (Linux)
            PathBuf::from("/etc/repcoach/config.toml"),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Logging settings
        if let Ok(val) = std::env::var("REPCOACH_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("REPCOACH_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("REPCOACH_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        // Storage and catalog
        if let Ok(val) = std::env::var("REPCOACH_TRANSCRIPT_DIR") {
            self.storage.transcript_dir = val;
        }
        if let Ok(val) = std::env::var("REPCOACH_PERSONA_DIR") {
            self.catalog.persona_dir = Some(val);
        }

        // Conversation and scoring
        if let Ok(val) = std::env::var("REPCOACH_TURN_SECONDS") {
            if let Ok(n) = val.parse() {
                self.conversation.turn_seconds = n;
            }
        }
        if let Ok(val) = std::env::var("REPCOACH_MATCH_MODE") {
            if let Ok(mode) = val.parse() {
                self.lexicon.match_mode = mode;
            }
        }
        if let Ok(val) = std::env::var("REPCOACH_HIGHLIGHT_LIMIT") {
            if let Ok(n) = val.parse() {
                self.evaluation.highlight_limit = n;
            }
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.storage.transcript_dir = expand_path(&self.storage.transcript_dir);
        if let Some(ref dir) = self.catalog.persona_dir {
            self.catalog.persona_dir = Some(expand_path(dir));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        if self.storage.transcript_dir.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "storage.transcript_dir",
                "transcript_dir cannot be empty",
            ));
        }

        if self.conversation.turn_seconds == 0 {
            return Err(Error::config_field_invalid(
                "conversation.turn_seconds",
                "turn_seconds must be greater than zero",
            ));
        }

        if self.evaluation.highlight_limit == 0 {
            return Err(Error::config_field_invalid(
                "evaluation.highlight_limit",
                "highlight_limit must be greater than zero",
            ));
        }

        for (field, list) in self.lexicon.lists() {
            if let Some(list) = list {
                if list.is_empty() || list.iter().any(|p| p.trim().is_empty()) {
                    return Err(Error::config_field_invalid(
                        field,
                        format!("{} must list at least one non-empty phrase", field),
                    ));
                }
            }
        }

        if self.lexicon.monologue_word_limit == Some(0) {
            return Err(Error::config_field_invalid(
                "lexicon.monologue_word_limit",
                "monologue_word_limit must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Get the transcript directory as a PathBuf
    pub fn transcript_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.transcript_dir)
    }

    /// Get the persona directory override, if any
    pub fn persona_dir(&self) -> Option<PathBuf> {
        self.catalog.persona_dir.as_ref().map(PathBuf::from)
    }

    /// The lexicon both engines and the evaluator should use
    pub fn lexicon(&self) -> Lexicon {
        self.lexicon.to_lexicon()
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Default location written by `config init`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".repcoach")
        .join("config.toml")
}

/// Initialize a new configuration file, returning where it was written
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(default_config_path);

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::IoWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|source| Error::IoWrite {
        path: config_path.clone(),
        source,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
pub fn generate_default_config() -> String {
    r#"# RepCoach Configuration

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.repcoach/logs/repcoach.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

[storage]
# One JSON file per conversation session
transcript_dir = "~/.repcoach/sessions"

[catalog]
# Directory of persona TOML files; replaces the bundled personas when set
# persona_dir = "~/.repcoach/personas"

[conversation]
# Simulated seconds each representative turn consumes
turn_seconds = 30

[lexicon]
# How phrases are matched: "substring" or "whole-word"
match_mode = "substring"

# Replace a built-in phrase list (all lists are matched case-insensitively)
# hype = ["best", "revolutionary", "amazing", "unbelievable", "game-changing"]
# repetition = ["as i said", "like i mentioned", "again", "repeating"]
# pressure_cues = ["quick", "time", "brief", "short"]
# patient_words = ["patient", "safety", "concern", "understand"]

# Utterances longer than this many words count as a monologue
# monologue_word_limit = 25

[evaluation]
# Maximum highlights reported per transcript
highlight_limit = 6
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = CoachConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.conversation.turn_seconds, 30);
        assert_eq!(config.evaluation.highlight_limit, 6);
        assert_eq!(config.lexicon.match_mode, MatchMode::Substring);
        assert!(config.catalog.persona_dir.is_none());
    }

    #[test]
    fn test_env_override() {
        env::set_var("REPCOACH_TURN_SECONDS", "45");
        env::set_var("REPCOACH_MATCH_MODE", "whole-word");
        env::set_var("REPCOACH_HIGHLIGHT_LIMIT", "not-a-number");

        let mut config = CoachConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.conversation.turn_seconds, 45);
        assert_eq!(config.lexicon.match_mode, MatchMode::WholeWord);
        assert_eq!(config.evaluation.highlight_limit, 6);

        env::remove_var("REPCOACH_TURN_SECONDS");
        env::remove_var("REPCOACH_MATCH_MODE");
        env::remove_var("REPCOACH_HIGHLIGHT_LIMIT");
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = CoachConfig::default();
        config.logging.level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigValidation);
    }

    #[test]
    fn test_validation_zero_values() {
        let mut config = CoachConfig::default();
        config.conversation.turn_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = CoachConfig::default();
        config.evaluation.highlight_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_override_list() {
        let mut config = CoachConfig::default();
        config.lexicon.hype = Some(vec![]);
        assert!(config.validate().is_err());

        config.lexicon.hype = Some(vec!["Stellar".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(CoachConfig::default().validate().is_ok());
    }

    #[test]
    fn test_lexicon_overrides_apply() {
        let settings = LexiconSettings {
            match_mode: MatchMode::WholeWord,
            hype: Some(vec!["Stellar".to_string()]),
            monologue_word_limit: Some(10),
            ..LexiconSettings::default()
        };
        let lexicon = settings.to_lexicon();
        assert_eq!(lexicon.hype, vec!["stellar"]);
        assert_eq!(lexicon.match_mode, MatchMode::WholeWord);
        assert_eq!(lexicon.monologue_word_limit, 10);
        assert_eq!(lexicon.evidence, Lexicon::default().evidence);
        assert!(lexicon.is_hype("A STELLAR result"));
    }

    #[test]
    fn test_path_expansion() {
        let mut config = CoachConfig::default();
        config.storage.transcript_dir = "~/test/sessions".to_string();
        config.expand_paths();
        assert!(!config.storage.transcript_dir.contains('~'));
    }

    #[test]
    fn test_generated_default_parses_and_validates() {
        let config: CoachConfig = toml::from_str(&generate_default_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.conversation.turn_seconds, 30);
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
[logging]
level = "debug"

[storage]
transcript_dir = "/tmp/repcoach/sessions"

[catalog]
persona_dir = "/tmp/repcoach/personas"

[lexicon]
match_mode = "whole-word"
repetition = ["once more"]

[evaluation]
highlight_limit = 3
"#;
        let config: CoachConfig = toml::from_str(config_str).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.transcript_dir(), PathBuf::from("/tmp/repcoach/sessions"));
        assert_eq!(config.persona_dir(), Some(PathBuf::from("/tmp/repcoach/personas")));
        assert_eq!(config.lexicon.match_mode, MatchMode::WholeWord);
        assert_eq!(config.lexicon().repetition, vec!["once more"]);
        assert_eq!(config.evaluation.highlight_limit, 3);
        assert_eq!(config.conversation.turn_seconds, 30);
    }

    #[test]
    fn test_explicit_missing_file() {
        let err = CoachConfig::load(Some("/definitely/not/here.toml")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path_str = path.to_str().unwrap();

        assert_eq!(init_config(Some(path_str), false).unwrap(), path);
        assert!(init_config(Some(path_str), false).is_err());
        assert!(init_config(Some(path_str), true).is_ok());
    }
}
