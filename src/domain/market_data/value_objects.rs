use derive_more::{Constructor, Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - milliseconds since the Unix epoch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Constructor, Display,
    Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn from_millis(value: u64) -> Self {
        Self(value)
    }

    /// Shift back by whole days, saturating at the epoch.
    pub fn days_before(&self, days: u64) -> Self {
        Self(self.0.saturating_sub(days.saturating_mul(crate::time_utils::MS_PER_DAY)))
    }
}

/// Trailing window of history requested by the chart.
///
/// The string form is the upstream `days` parameter.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum TimeRange {
    #[strum(serialize = "1")]
    #[serde(rename = "1")]
    OneDay,

    #[default]
    #[strum(serialize = "7")]
    #[serde(rename = "7")]
    SevenDays,

    #[strum(serialize = "30")]
    #[serde(rename = "30")]
    ThirtyDays,
}

impl TimeRange {
    pub fn days(&self) -> u32 {
        match self {
            Self::OneDay => 1,
            Self::SevenDays => 7,
            Self::ThirtyDays => 30,
        }
    }

    /// Caption of the range selector button.
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::OneDay => "24h",
            Self::SevenDays => "7d",
            Self::ThirtyDays => "30d",
        }
    }

    pub fn is_intraday(&self) -> bool {
        matches!(self, Self::OneDay)
    }

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            1 => Some(Self::OneDay),
            7 => Some(Self::SevenDays),
            30 => Some(Self::ThirtyDays),
            _ => None,
        }
    }
}
