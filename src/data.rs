//! Reference revenue data for one month, from two sources.

use crate::model::{InvalidInput, Series};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

const REFERENCE_JSON: &str = include_str!("../data/reference.json");

/// Pair of named sources to be summarized and compared.
#[derive(Debug, Deserialize)]
pub struct Dataset {
    pub sources: [Source; 2],
}

/// Named source holding a raw, possibly absent, series.
#[derive(Debug, Deserialize)]
pub struct Source {
    /// Name shown on the stat block.
    pub name: String,
    /// Legend label of the chart.
    pub label: String,
    #[serde(default)]
    pub series: Option<Value>,
}

impl Dataset {
    /// Load the built-in reference dataset.
    pub fn reference() -> Result<Self> {
        Self::from_json(REFERENCE_JSON).context("failed to load reference dataset")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to deserialize dataset")
    }
}

impl Source {
    pub fn to_series(&self) -> Result<Series, InvalidInput> {
        Series::from_value(&self.name, self.series.as_ref())
    }
}
