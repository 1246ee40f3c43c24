use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Analysis configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// Every section and key is optional and falls back to its default.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub reference: RefConfig,
    pub plot: PlotConfig,
}

/// Reference distribution the raw intensities are standardized against.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefConfig {
    /// Mean of the baseline intensity population.
    pub mean: f64,
    /// Standard deviation of the baseline intensity population.
    pub std_dev: f64,
}

impl Default for RefConfig {
    fn default() -> Self {
        Self {
            mean: 293.0,
            std_dev: 70.0,
        }
    }
}

/// Rendering parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Radius of each scatter point in pixels.
    pub point_size: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            point_size: 3,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Replace the reference statistics with the given values, where present.
    pub fn override_reference(&mut self, mean: Option<f64>, std_dev: Option<f64>) -> Result<()> {
        if let Some(mean) = mean {
            self.reference.mean = mean;
        }
        if let Some(std_dev) = std_dev {
            self.reference.std_dev = std_dev;
        }
        self.validate().context("failed to validate config")
    }

    pub fn validate(&self) -> Result<()> {
        let RefConfig { mean, std_dev } = self.reference;
        if !mean.is_finite() {
            bail!("invalid reference mean: must be finite, but is {mean}");
        }
        if !std_dev.is_finite() || std_dev <= 0.0 {
            bail!("invalid reference standard deviation: must be finite and positive, but is {std_dev}");
        }

        check_num(self.plot.width, 64..=8192).context("invalid plot width")?;
        check_num(self.plot.height, 64..=8192).context("invalid plot height")?;
        check_num(self.plot.point_size, 1..=32).context("invalid point size")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reference.mean, 293.0);
        assert_eq!(config.reference.std_dev, 70.0);
        config.validate().unwrap();
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: Config = toml::from_str("[reference]\nstd_dev = 50.0\n").unwrap();
        assert_eq!(config.reference.mean, 293.0);
        assert_eq!(config.reference.std_dev, 50.0);
        assert_eq!(config.plot, PlotConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("[reference]\nmedian = 1.0\n").is_err());
    }

    #[test]
    fn zero_std_dev_is_rejected() {
        let mut config = Config::default();
        assert!(config.override_reference(None, Some(0.0)).is_err());
        assert!(config.override_reference(None, Some(f64::NAN)).is_err());
    }

    #[test]
    fn overrides_replace_reference() {
        let mut config = Config::default();
        config.override_reference(Some(0.0), Some(1.0)).unwrap();
        assert_eq!(config.reference.mean, 0.0);
        assert_eq!(config.reference.std_dev, 1.0);
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let mut config = Config::default();
        config.plot.width = 10;
        assert!(config.validate().is_err());
    }
}
