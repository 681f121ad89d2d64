use std::path::PathBuf;

use crate::config_file::ConfigFile;
use crate::error::ConfigError;
use crate::schema::Section;
use crate::types::GateSettings;

/// Entry point for building a yamlfig config file handle.
pub struct Yamlfig;

impl Yamlfig {
    pub fn builder<C: Section>() -> YamlfigBuilder<C> {
        YamlfigBuilder::new()
    }
}

/// Builder for a [`ConfigFile`].
///
/// The file location comes from one of two places:
///
/// - **Explicit**: [`path()`](Self::path) names the file directly and wins.
/// - **Platform**: [`app_name()`](Self::app_name) places the file in the
///   platform config directory for that app, e.g. `~/.config/myapp/myapp.yml`
///   on Linux.
pub struct YamlfigBuilder<C: Section> {
    path: Option<PathBuf>,
    app_name: Option<String>,
    file_name: Option<String>,
    gate: GateSettings,
    instance: Option<C>,
}

impl<C: Section> YamlfigBuilder<C> {
    fn new() -> Self {
        Self {
            path: None,
            app_name: None,
            file_name: None,
            gate: GateSettings::default(),
            instance: None,
        }
    }

    /// Use this exact file. Takes precedence over [`app_name`](Self::app_name).
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the application name. Derives `file_name` → `"{app_name}.yml"`
    /// inside the platform config directory.
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the config file name (default: `"{app_name}.yml"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Rate limits for queued loads and saves.
    pub fn gate(mut self, settings: GateSettings) -> Self {
        self.gate = settings;
        self
    }

    /// Start from this instance instead of `C::default()`.
    pub fn instance(mut self, instance: C) -> Self {
        self.instance = Some(instance);
        self
    }

    fn effective_app_name(&self) -> Result<&str, ConfigError> {
        self.app_name.as_deref().ok_or(ConfigError::PathRequired)
    }

    fn effective_file_name(&self) -> Result<String, ConfigError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        let app = self.effective_app_name()?;
        Ok(format!("{app}.yml"))
    }

    fn effective_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let app = self.effective_app_name()?;
        let file_name = self.effective_file_name()?;
        let proj = directories::ProjectDirs::from("", "", app)
            .ok_or_else(|| ConfigError::NoPlatformDir(app.to_string()))?;
        Ok(proj.config_dir().join(file_name))
    }

    /// Resolve the file location and create the handle. Nothing is read or
    /// written yet.
    pub fn build(self) -> Result<ConfigFile<C>, ConfigError> {
        let path = self.effective_path()?;
        let instance = self.instance.unwrap_or_default();
        Ok(ConfigFile::new(path, instance, self.gate))
    }
}
