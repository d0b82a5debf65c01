use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Policy governing how many of the filtered entities become final targets.
///
/// `Fixed`, `FixedPercent` and `RandomMaxPercent` read their numeric argument
/// from [`TargetSpec::value`](crate::TargetSpec::value); `One` and `All`
/// ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Pick exactly one entity uniformly at random.
    One,
    /// Keep every filtered entity.
    All,
    /// Pick `value` entities, capped at the pool size.
    Fixed,
    /// Pick `floor(len × value / 100)` entities; `value` must be in (0, 100].
    FixedPercent,
    /// Draw a percentage uniformly from `[0, value]`, then pick that share;
    /// `value` must be in (0, 100].
    RandomMaxPercent,
}

impl Default for SelectionMode {
    fn default() -> Self {
        SelectionMode::One
    }
}

impl FromStr for SelectionMode {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one" | "" => Ok(SelectionMode::One),
            "all" => Ok(SelectionMode::All),
            "fixed" => Ok(SelectionMode::Fixed),
            "fixed-percent" => Ok(SelectionMode::FixedPercent),
            "random-max-percent" => Ok(SelectionMode::RandomMaxPercent),
            other => Err(ModelError::UnknownMode(other.to_string())),
        }
    }
}
