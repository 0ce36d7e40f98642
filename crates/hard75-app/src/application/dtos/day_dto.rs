use serde::{Deserialize, Serialize};

use hard75_domain::day_record::{DayAnswers, DayKey, WaterCups};

/// Which data the view was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    NotSubmitted,
    Submitted,
    Incomplete,
}

impl SubmissionState {
    pub fn badge(&self) -> &'static str {
        match self {
            SubmissionState::NotSubmitted => "Not submitted yet",
            SubmissionState::Submitted => "Submitted",
            SubmissionState::Incomplete => "Incomplete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayStatusDto {
    pub date: String, // YYYY-MM-DD
    pub state: SubmissionState,
    pub saved_at: Option<String>, // local HH:MM:SS
    pub source: DataSource,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryDto {
    pub date: String,
    pub complete: bool,
}

/// Today's form as currently entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDto {
    pub date: String,
    pub workout1: bool,
    pub workout2: bool,
    pub diet: bool,
    pub photo: bool,
    pub reading: bool,
    pub water_cups: u8,
    pub water_ml: u32,
    pub water_target: u8,
}

impl FormDto {
    pub fn new(date: DayKey, answers: &DayAnswers) -> Self {
        Self {
            date: date.to_string(),
            workout1: answers.workout1,
            workout2: answers.workout2,
            diet: answers.diet,
            photo: answers.photo,
            reading: answers.reading,
            water_cups: answers.water_cups.value(),
            water_ml: answers.water_cups.millilitres(),
            water_target: WaterCups::TARGET,
        }
    }
}
