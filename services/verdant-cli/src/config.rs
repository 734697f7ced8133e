//! CLI configuration: YAML file, then environment overrides.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use export::settings::{DEFAULT_CRS, DEFAULT_FOLDER, DEFAULT_MAX_PIXELS, DEFAULT_SCALE};
use export::ExportSettings;
use pipeline::inspector::INSPECTOR_MAX_PIXELS;
use pipeline::WorkflowSettings;
use platform::PlatformConfig;

/// Where export jobs are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportBackend {
    /// Straight to the platform's export endpoint.
    #[default]
    Platform,
    /// Onto the Redis stream drained by export workers.
    Queue,
}

impl std::str::FromStr for ExportBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "platform" => Ok(ExportBackend::Platform),
            "queue" => Ok(ExportBackend::Queue),
            other => bail!("unknown export backend '{}' (expected platform or queue)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub backend: ExportBackend,
    pub redis_url: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            backend: ExportBackend::Platform,
            redis_url: "redis://localhost:6379".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdantConfig {
    pub default_scale: f64,
    pub default_folder: String,
    pub years: Vec<i32>,
    pub crs: String,
    pub max_pixels: f64,
    pub inspector_max_pixels: f64,
    pub thumbnail_factor: f64,
    pub thumbnail_min_scale: f64,
    /// Drop scenes whose cloudy-pixel percentage is at or above this.
    pub max_cloud_cover: Option<f64>,
    pub platform: PlatformConfig,
    pub export: ExportConfig,
}

impl Default for VerdantConfig {
    fn default() -> Self {
        Self {
            default_scale: DEFAULT_SCALE,
            default_folder: DEFAULT_FOLDER.to_string(),
            years: vec![2018, 2019, 2020],
            crs: DEFAULT_CRS.to_string(),
            max_pixels: DEFAULT_MAX_PIXELS,
            inspector_max_pixels: INSPECTOR_MAX_PIXELS,
            thumbnail_factor: 4.0,
            thumbnail_min_scale: 30.0,
            max_cloud_cover: None,
            platform: PlatformConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl VerdantConfig {
    /// Load from a YAML file, or defaults when no path is given, then
    /// apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.platform.apply_env();

        if let Ok(val) = env::var("VERDANT_EXPORT_BACKEND") {
            self.export.backend = val.parse()?;
        }

        if let Ok(val) = env::var("REDIS_URL") {
            self.export.redis_url = val;
        }

        if let Ok(val) = env::var("VERDANT_DEFAULT_SCALE") {
            self.default_scale = val
                .parse()
                .with_context(|| format!("VERDANT_DEFAULT_SCALE is not a number: {}", val))?;
        }

        if let Ok(val) = env::var("VERDANT_DEFAULT_FOLDER") {
            self.default_folder = val;
        }

        if let Ok(val) = env::var("VERDANT_MAX_CLOUD_COVER") {
            self.max_cloud_cover = Some(
                val.parse()
                    .with_context(|| format!("VERDANT_MAX_CLOUD_COVER is not a number: {}", val))?,
            );
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_scale <= 0.0 {
            bail!("default_scale must be > 0");
        }

        if self.thumbnail_min_scale <= 0.0 {
            bail!("thumbnail_min_scale must be > 0");
        }

        if self.thumbnail_factor < 1.0 {
            bail!("thumbnail_factor must be >= 1");
        }

        if self.years.is_empty() {
            bail!("at least one year must be configured");
        }

        if self.default_folder.trim().is_empty() {
            bail!("default_folder must not be empty");
        }

        if let Some(cover) = self.max_cloud_cover {
            if !(0.0..=100.0).contains(&cover) {
                bail!("max_cloud_cover must be within 0-100, got {}", cover);
            }
        }

        self.platform.validate().map_err(anyhow::Error::msg)?;

        Ok(())
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            scale: self.default_scale,
            folder: self.default_folder.clone(),
            crs: self.crs.clone(),
            max_pixels: self.max_pixels,
            thumbnail_factor: self.thumbnail_factor,
            thumbnail_min_scale: self.thumbnail_min_scale,
        }
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            years: self.years.clone(),
            export: self.export_settings(),
            max_cloud_cover: self.max_cloud_cover,
            inspector_max_pixels: self.inspector_max_pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_yaml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = VerdantConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.export_settings(), ExportSettings::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let file = write_yaml(
            r#"
default_scale: 250
years: [2019, 2020]
platform:
  endpoint: https://compute.example.org
  token: secret
export:
  backend: queue
"#,
        );

        let config = VerdantConfig::from_yaml(file.path()).unwrap();
        assert_eq!(config.default_scale, 250.0);
        assert_eq!(config.years, vec![2019, 2020]);
        assert_eq!(config.default_folder, "GEE_Exports");
        assert_eq!(config.platform.token.as_deref(), Some("secret"));
        assert_eq!(config.platform.timeout_secs, 60);
        assert_eq!(config.export.backend, ExportBackend::Queue);
        assert_eq!(config.export.redis_url, "redis://localhost:6379");
        assert_eq!(config.workflow_settings().export.scale, 250.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = VerdantConfig::default();
        config.default_scale = 0.0;
        assert!(config.validate().is_err());

        let mut config = VerdantConfig::default();
        config.years.clear();
        assert!(config.validate().is_err());

        let mut config = VerdantConfig::default();
        config.thumbnail_factor = 0.5;
        assert!(config.validate().is_err());

        let mut config = VerdantConfig::default();
        config.max_cloud_cover = Some(120.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let file = write_yaml("years: [2019,");
        assert!(VerdantConfig::from_yaml(file.path()).is_err());
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("Queue".parse::<ExportBackend>().unwrap(), ExportBackend::Queue);
        assert!("s3".parse::<ExportBackend>().is_err());
    }
}
