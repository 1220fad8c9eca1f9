//! Series and summary data types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Reason a series cannot be summarized.
#[derive(Debug, Error)]
pub enum InvalidInput {
    #[error("series is missing")]
    Missing,

    #[error("series is not a sequence")]
    NotSequence,

    #[error("series is empty")]
    Empty,

    #[error("malformed observation at index {idx}")]
    MalformedObservation {
        idx: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Daily observation of a series.
///
/// The value is kept raw and only coerced to a number when it is aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Day of the month (1-based).
    #[serde(alias = "dia")]
    pub day: u32,

    /// Raw amount recorded for the day.
    #[serde(alias = "valor", default)]
    pub value: Value,
}

/// Named, ordered sequence of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub obs: Vec<Observation>,
}

impl Series {
    pub fn new(name: impl Into<String>, obs: Vec<Observation>) -> Self {
        Self {
            name: name.into(),
            obs,
        }
    }

    /// Build a [`Series`] from a raw, possibly absent, JSON value.
    ///
    /// # Errors
    /// Returns [`InvalidInput`] if the value is absent, is not an array,
    /// or contains an element that is not an observation.
    pub fn from_value(name: impl Into<String>, value: Option<&Value>) -> Result<Self, InvalidInput> {
        let value = value.ok_or(InvalidInput::Missing)?;
        let items = value.as_array().ok_or(InvalidInput::NotSequence)?;

        let obs = items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                Observation::deserialize(item)
                    .map_err(|source| InvalidInput::MalformedObservation { idx, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(name, obs))
    }

    pub fn is_empty(&self) -> bool {
        self.obs.is_empty()
    }
}

/// Value of a series together with the day it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub value: f64,
    pub day: u32,
}

impl Extremum {
    /// Starting point of a running maximum.
    pub fn lowest() -> Self {
        Self {
            value: f64::NEG_INFINITY,
            day: 0,
        }
    }

    /// Undefined minimum, used when no qualifying observation exists.
    pub fn undefined() -> Self {
        Self {
            value: f64::INFINITY,
            day: 0,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.day == 0 && self.value.is_infinite()
    }
}

/// Aggregate statistics of a [`Series`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Name of the summarized series.
    pub source_name: String,

    /// Sum of all values, zeros included.
    pub total: f64,

    /// Total divided by the number of positive days (zero if there are none).
    pub average: f64,

    /// Greatest value; the earliest day wins ties.
    pub max: Extremum,

    /// Smallest strictly positive value; the earliest day wins ties.
    pub min_positive: Extremum,

    /// Number of days whose value is not strictly positive.
    pub zero_days: usize,

    /// Number of days whose value is strictly positive.
    pub positive_days: usize,
}
