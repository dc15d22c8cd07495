use serde::Deserialize;

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::PlateError;
use crate::text::MAX_CANDIDATE_LEN;

/// Tunables of the harness. Every field has a default, so a config file only
/// needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Smallest height / width ratio still considered plate shaped
    pub min_ratio: f64,
    /// Largest height / width ratio still considered plate shaped
    pub max_ratio: f64,
    pub max_candidate_len: usize,
    /// Outline thickness in pixels
    pub pen_width: u32,
    pub good_color: [u8; 3],
    pub bad_color: [u8; 3],
    /// Image file extensions picked up when walking a directory
    pub extensions: Vec<String>,
    pub detector_timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            min_ratio: 0.2,
            max_ratio: 0.5,
            max_candidate_len: MAX_CANDIDATE_LEN,
            pen_width: 5,
            good_color: [255, 0, 0],
            bad_color: [0, 0, 255],
            extensions: ["jpg", "jpeg", "png", "bmp", "gif"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            detector_timeout_secs: 30,
        }
    }
}

impl HarnessConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, PlateError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlateError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), PlateError> {
        if !(self.min_ratio <= self.max_ratio) {
            return Err(PlateError::config(format!(
                "min_ratio {} is above max_ratio {}",
                self.min_ratio, self.max_ratio
            )));
        }
        if self.max_candidate_len == 0 {
            return Err(PlateError::config("max_candidate_len must be at least 1"));
        }
        Ok(())
    }

    pub fn detector_timeout(&self) -> Duration {
        Duration::from_secs(self.detector_timeout_secs)
    }
}

#[cfg(test)]
mod test {
    use super::HarnessConfig;

    use std::error::Error;

    #[test]
    fn empty_file_gives_defaults() -> Result<(), Box<dyn Error>> {
        let config = HarnessConfig::from_toml_str("")?;
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.max_candidate_len, 8);
        assert_eq!(config.pen_width, 5);
        Ok(())
    }

    #[test]
    fn partial_override() -> Result<(), Box<dyn Error>> {
        let config = HarnessConfig::from_toml_str("max_ratio = 0.6\nextensions = [\"png\"]\n")?;
        assert_eq!(config.max_ratio, 0.6);
        assert_eq!(config.min_ratio, 0.2);
        assert_eq!(config.extensions, vec!["png".to_string()]);
        Ok(())
    }

    #[test]
    fn inverted_ratio_band_is_rejected() {
        assert!(HarnessConfig::from_toml_str("min_ratio = 0.7").is_err());
        assert!(HarnessConfig::from_toml_str("max_candidate_len = 0").is_err());
        assert!(HarnessConfig::from_toml_str("pen_width = \"thick\"").is_err());
    }
}
