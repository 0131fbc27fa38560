use std::{env, path::PathBuf};

use color_eyre::Result;
use contact_form::FormSchema;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::debug;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

/// Terminal loop settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Ticks per second.
    pub tick_rate: f64,
    /// Frames per second.
    pub frame_rate: f64,
    pub mouse: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate: 4.0,
            frame_rate: 30.0,
            mouse: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Replaces the built-in contact schema when present.
    #[serde(default)]
    pub form: Option<FormSchema>,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            debug!(dir = %config_dir.display(), "no configuration file found, using defaults");
        }

        builder = builder.add_source(
            config::Environment::with_prefix(PROJECT_NAME.as_str())
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// The schema the form is built from.
    pub fn schema(&self) -> FormSchema {
        self.form.clone().unwrap_or_else(FormSchema::contact)
    }

    /// Effective schema rendered as TOML or pretty JSON.
    pub fn schema_text(&self, as_toml: bool) -> Result<String> {
        let schema = self.schema();
        let text = if as_toml {
            toml::to_string_pretty(&schema)?
        } else {
            serde_json::to_string_pretty(&schema)?
        };
        Ok(text)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "contact", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn from_toml(text: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .expect("build")
            .try_deserialize()
            .expect("deserialize")
    }

    #[test]
    fn empty_source_uses_defaults() {
        let cfg = from_toml("");
        assert_eq!(cfg.ui, UiConfig::default());
        assert!(cfg.form.is_none());
        assert_eq!(cfg.schema(), FormSchema::contact());
    }

    #[test]
    fn ui_section_overrides_defaults() {
        let cfg = from_toml(
            r#"
            [ui]
            tick_rate = 10.0
            mouse = false
            "#,
        );
        assert_eq!(cfg.ui.tick_rate, 10.0);
        assert_eq!(cfg.ui.frame_rate, 30.0);
        assert!(!cfg.ui.mouse);
    }

    #[test]
    fn form_section_replaces_contact_schema() {
        let cfg = from_toml(
            r#"
            [form]
            title = "Feedback"

            [[form.fields]]
            name = "comment"
            kind = "multiline"
            rules = [{ rule = "min_length", min = 10 }]
            "#,
        );
        let schema = cfg.schema();
        assert_eq!(schema.title, "Feedback");
        assert_eq!(schema.field_count(), 1);
        assert!(schema.build().expect("builds").contains("comment"));
    }

    #[test]
    fn schema_text_renders_json() {
        let cfg = Config::default();
        let json = cfg.schema_text(false).expect("json");
        assert!(json.contains("\"title\": \"Contact\""));
    }
}
