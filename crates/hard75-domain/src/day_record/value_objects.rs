use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar day in local time, rendered as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        NaiveDate::parse_from_str(s.trim(), DAY_KEY_FORMAT)
            .map(Self)
            .map_err(|_| {
                DomainError::InvalidInput(format!(
                    "Invalid day key '{}', expected YYYY-MM-DD",
                    s
                ))
            })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The calendar day before this one
    pub fn previous(&self) -> Self {
        Self(self.0 - Duration::days(1))
    }

    /// Whole calendar days from `self` to `later`
    pub fn days_until(&self, later: &DayKey) -> i64 {
        (later.0 - self.0).num_days()
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DayKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.to_string()
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Glasses of water, 400 ml each, held in `0..=20` (8 L hard cap)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "u8")]
pub struct WaterCups(u8);

impl WaterCups {
    pub const MAX: u8 = 20;
    pub const TARGET: u8 = 10;
    pub const ML_PER_CUP: u32 = 400;

    /// Clamp an arbitrary count into range
    pub fn new(cups: i64) -> Self {
        Self(cups.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self::new(self.0 as i64 + 1)
    }

    pub fn decrement(self) -> Self {
        Self::new(self.0 as i64 - 1)
    }

    /// Cups still missing to reach the daily target
    pub fn shortfall(&self) -> u8 {
        Self::TARGET.saturating_sub(self.0)
    }

    pub fn millilitres(&self) -> u32 {
        self.0 as u32 * Self::ML_PER_CUP
    }
}

impl From<f64> for WaterCups {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Self::new(value.trunc() as i64)
        } else {
            Self::default()
        }
    }
}

impl From<WaterCups> for u8 {
    fn from(cups: WaterCups) -> Self {
        cups.0
    }
}

impl fmt::Display for WaterCups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The five yes/no requirements on the daily form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Habit {
    Workout1,
    Workout2,
    Diet,
    Photo,
    Reading,
}

impl Habit {
    /// Form order, which is also the order violations are reported in
    pub const ALL: [Habit; 5] = [
        Habit::Workout1,
        Habit::Workout2,
        Habit::Diet,
        Habit::Photo,
        Habit::Reading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Habit::Workout1 => "workout1",
            Habit::Workout2 => "workout2",
            Habit::Diet => "diet",
            Habit::Photo => "photo",
            Habit::Reading => "reading",
        }
    }
}

impl fmt::Display for Habit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Habit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "workout1" | "workout-1" | "w1" => Ok(Habit::Workout1),
            "workout2" | "workout-2" | "w2" => Ok(Habit::Workout2),
            "diet" => Ok(Habit::Diet),
            "photo" => Ok(Habit::Photo),
            "reading" | "read" => Ok(Habit::Reading),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown habit '{}'",
                other
            ))),
        }
    }
}

/// The day's form answers as currently entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAnswers {
    #[serde(default)]
    pub workout1: bool,
    #[serde(default)]
    pub workout2: bool,
    #[serde(default)]
    pub diet: bool,
    #[serde(default)]
    pub photo: bool,
    #[serde(default)]
    pub reading: bool,
    #[serde(default)]
    pub water_cups: WaterCups,
}

impl DayAnswers {
    pub fn is_checked(&self, habit: Habit) -> bool {
        match habit {
            Habit::Workout1 => self.workout1,
            Habit::Workout2 => self.workout2,
            Habit::Diet => self.diet,
            Habit::Photo => self.photo,
            Habit::Reading => self.reading,
        }
    }

    pub fn set_checked(&mut self, habit: Habit, checked: bool) {
        let slot = match habit {
            Habit::Workout1 => &mut self.workout1,
            Habit::Workout2 => &mut self.workout2,
            Habit::Diet => &mut self.diet,
            Habit::Photo => &mut self.photo,
            Habit::Reading => &mut self.reading,
        };
        *slot = checked;
    }
}
