use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{clog_debug, Result};

/// Directory under the project root that holds hook state.
pub const CLAUDE_DIR: &str = ".claude";

/// Toggleable hook features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Feature {
    /// A/B/C option prompts for complex questions
    Choices,
    /// Mandatory tests after code changes
    Tests,
    /// Task decomposition and parallel grouping
    Parallel,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Choices, Feature::Tests, Feature::Parallel];

    /// Name of the legacy marker file whose presence enables the feature.
    pub fn marker_file(&self) -> &'static str {
        match self {
            Feature::Choices => "choices_enabled",
            Feature::Tests => "tests_enabled",
            Feature::Parallel => "parallel_enabled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feature::Choices => "Multiple choice system",
            Feature::Tests => "Automatic testing",
            Feature::Parallel => "Parallel task execution",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub choices: bool,
    #[serde(default)]
    pub tests: bool,
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Report directory, relative to the project root unless absolute.
    pub dir: Option<String>,
}

/// A user-supplied rule, compiled and appended after the built-in table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command_rules: Vec<RuleSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensitive_paths: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

impl Config {
    pub fn claude_dir(root: &Path) -> PathBuf {
        root.join(CLAUDE_DIR)
    }

    pub fn config_path(root: &Path) -> PathBuf {
        Self::claude_dir(root).join("claudook.toml")
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);
        clog_debug!("Config::load path={}", path.display());
        let mut config: Self = if path.exists() {
            toml::from_str(&fs::read_to_string(&path)?)?
        } else {
            clog_debug!("Config file not found, using defaults");
            Self::default()
        };

        // Older installs toggle features with marker files.
        for feature in Feature::ALL {
            if Self::claude_dir(root).join(feature.marker_file()).exists() {
                config.set_feature(feature, true);
            }
        }

        clog_debug!("Config loaded: features={:?}", config.features);
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let dir = Self::claude_dir(root);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        let path = Self::config_path(root);
        fs::write(&path, toml::to_string_pretty(self)?)?;
        clog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Choices => self.features.choices,
            Feature::Tests => self.features.tests,
            Feature::Parallel => self.features.parallel,
        }
    }

    pub fn set_feature(&mut self, feature: Feature, enabled: bool) {
        match feature {
            Feature::Choices => self.features.choices = enabled,
            Feature::Tests => self.features.tests = enabled,
            Feature::Parallel => self.features.parallel = enabled,
        }
    }

    pub fn tasks_dir(&self, root: &Path) -> PathBuf {
        match &self.tasks.dir {
            Some(dir) if Path::new(dir).is_absolute() => PathBuf::from(dir),
            Some(dir) => root.join(dir),
            None => Self::claude_dir(root).join("tasks"),
        }
    }
}

/// Load, flip one feature, and persist.
///
/// Disabling also removes the legacy marker file, otherwise the next
/// load would turn the feature back on.
pub fn toggle_feature(root: &Path, feature: Feature, enabled: bool) -> Result<Config> {
    let mut config = Config::load(root)?;
    config.set_feature(feature, enabled);
    config.save(root)?;

    if !enabled {
        let marker = Config::claude_dir(root).join(feature.marker_file());
        if marker.exists() {
            fs::remove_file(&marker)?;
        }
    }
    Ok(config)
}
