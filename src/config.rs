use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Presentation configuration.
///
/// Loaded from a TOML file and validated before use.
/// Every field is optional; see [`Config::from_file`] for loading.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Currency formatting of amounts.
    pub currency: CurrencyConfig,
    /// Comparison chart settings.
    pub chart: ChartConfig,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrencyConfig {
    /// Currency symbol placed before the amount.
    pub symbol: String,
    /// Put a space between the symbol and the amount.
    pub space_after_symbol: bool,
    pub decimal_separator: String,
    pub thousands_separator: String,
    /// Number of decimal places.
    pub decimals: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: "R$".to_string(),
            space_after_symbol: true,
            decimal_separator: ",".to_string(),
            thousands_separator: ".".to_string(),
            decimals: 2,
        }
    }
}

/// Chart drawing backend.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Ascii,
    Svg,
    /// No chart capability; a visible error is shown instead.
    #[serde(rename = "none")]
    Disabled,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Backend override; by default text output draws ASCII and HTML draws SVG.
    pub backend: Option<BackendKind>,
    /// Width in characters of the longest ASCII bar.
    pub width: usize,
    /// SVG width in pixels.
    pub svg_width: u32,
    /// SVG height in pixels.
    pub svg_height: u32,
    /// Fill colors of the two datasets.
    pub colors: [String; 2],
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            backend: None,
            width: 40,
            svg_width: 960,
            svg_height: 420,
            colors: [
                "rgba(0, 123, 255, 0.7)".to_string(),
                "rgba(40, 167, 69, 0.7)".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded. Missing fields take their default values.
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let text = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.currency
            .validate()
            .context("invalid currency settings")?;

        check_num(self.chart.width, 10..=400).context("invalid chart width")?;
        check_num(self.chart.svg_width, 200..=4000).context("invalid svg width")?;
        check_num(self.chart.svg_height, 100..=2000).context("invalid svg height")?;
        if self.chart.colors.iter().any(|color| color.trim().is_empty()) {
            bail!("chart colors must not be empty");
        }

        Ok(())
    }
}

impl CurrencyConfig {
    fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            bail!("currency symbol must not be empty");
        }
        if self.decimal_separator.is_empty() {
            bail!("decimal separator must not be empty");
        }
        if self.decimal_separator == self.thousands_separator {
            bail!(
                "decimal and thousands separators must differ, but both are {:?}",
                self.decimal_separator
            );
        }
        check_num(self.decimals, 0..=6).context("invalid number of decimals")?;
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
