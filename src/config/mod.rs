use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;

use crate::domain::field::{DisplayMode, EditMode, FormContext};

/// Message used by the required rule when nothing else is configured
pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";

/// Upper bound on render/commit passes per update
pub const DEFAULT_MAX_SETTLE_PASSES: u32 = 8;

/// Form-session settings
///
/// Loaded from an optional `formbind.{toml,json,yaml,...}` file layered under
/// `FORMBIND_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormSettings {
    /// Localized text reported by the required rule
    #[serde(default = "default_required_message")]
    pub required_message: String,
    /// Whether computed errors are displayed from the start
    #[serde(default)]
    pub show_validation: bool,
    #[serde(default)]
    pub edit_mode: EditMode,
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Maximum render/commit passes one update may take to settle
    #[serde(default = "default_max_settle_passes")]
    pub max_settle_passes: u32,
}

fn default_required_message() -> String {
    DEFAULT_REQUIRED_MESSAGE.to_string()
}

fn default_max_settle_passes() -> u32 {
    DEFAULT_MAX_SETTLE_PASSES
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            required_message: default_required_message(),
            show_validation: false,
            edit_mode: EditMode::default(),
            display_mode: DisplayMode::default(),
            max_settle_passes: default_max_settle_passes(),
        }
    }
}

impl FormSettings {
    /// Load `formbind.*` from the working directory plus the environment
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Load `<root>/formbind.*` plus the environment
    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        Self::load(File::from(Path::new(root).join("formbind")).required(false))
    }

    /// Load one explicit file (its extension selects the format) plus the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        Self::load(File::from(path.as_ref()).required(true))
    }

    fn load<S>(file: S) -> Result<Self, anyhow::Error>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let s = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("FORMBIND"))
            .set_default("required_message", DEFAULT_REQUIRED_MESSAGE)?
            .set_default("max_settle_passes", i64::from(DEFAULT_MAX_SETTLE_PASSES))?
            .build()?;

        let settings: FormSettings = s.try_deserialize()?;

        validator::ConfigValidator::validate(&settings).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;

        tracing::debug!(?settings, "form settings loaded");
        Ok(settings)
    }

    /// Render-phase context derived from these settings
    pub fn context(&self) -> FormContext {
        FormContext {
            show_validation: self.show_validation,
            edit_mode: self.edit_mode,
            display_mode: self.display_mode,
            required_message: self.required_message.clone(),
        }
    }
}
