use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::value_objects::{DayAnswers, DayKey, WaterCups};
use crate::shared::DomainError;
use crate::validation::RequirementCheck;

/// One day's entry for one namespace.
///
/// `complete` is only ever set through [`DayRecord::submit`], which runs the
/// requirement check first. Autosaved partial forms go through
/// [`DayRecord::autosave`] and stay incomplete unless they still pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    date: DayKey,
    #[serde(flatten)]
    answers: DayAnswers,
    #[serde(default)]
    complete: bool,
    saved_at: DateTime<FixedOffset>,
}

impl DayRecord {
    /// Build a completed record, rejecting answers that miss any requirement
    pub fn submit(
        date: DayKey,
        answers: DayAnswers,
        saved_at: DateTime<FixedOffset>,
    ) -> Result<Self, DomainError> {
        let check = RequirementCheck::run(&answers);
        if !check.passed() {
            return Err(DomainError::Validation(check.messages().join(" ")));
        }

        Ok(Self {
            date,
            answers,
            complete: true,
            saved_at,
        })
    }

    /// Record the form as it stands.
    ///
    /// A previously completed day stays complete only while the answers still
    /// satisfy every requirement.
    pub fn autosave(
        date: DayKey,
        answers: DayAnswers,
        previous: Option<&DayRecord>,
        saved_at: DateTime<FixedOffset>,
    ) -> Self {
        let was_complete = previous.is_some_and(|p| p.complete);
        let complete = was_complete && RequirementCheck::run(&answers).passed();

        Self {
            date,
            answers,
            complete,
            saved_at,
        }
    }

    /// Re-key a record loaded from storage; the map key is authoritative
    pub fn with_date(mut self, date: DayKey) -> Self {
        self.date = date;
        self
    }

    // Getters
    pub fn date(&self) -> DayKey {
        self.date
    }

    pub fn answers(&self) -> &DayAnswers {
        &self.answers
    }

    pub fn water_cups(&self) -> WaterCups {
        self.answers.water_cups
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn saved_at(&self) -> DateTime<FixedOffset> {
        self.saved_at
    }
}
