use serde::{Deserialize, Serialize};
use std::fmt;

use crate::day_record::{DayAnswers, Habit, WaterCups};

/// One unmet daily requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    NotChecked { habit: Habit },
    WaterShort { shortfall: u8 },
}

impl Violation {
    pub fn message(&self) -> String {
        match self {
            Violation::NotChecked { habit } => match habit {
                Habit::Workout1 => "Workout 1 is not completed.".to_string(),
                Habit::Workout2 => "Workout 2 is not completed.".to_string(),
                Habit::Diet => "Diet requirement is not met.".to_string(),
                Habit::Photo => "Progress photo not taken.".to_string(),
                Habit::Reading => "Reading (10+ pages) not completed.".to_string(),
            },
            Violation::WaterShort { shortfall } => format!(
                "Water intake is short by {} cup(s) of {}ml.",
                shortfall,
                WaterCups::ML_PER_CUP
            ),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Outcome of checking a day's answers against the fixed requirements
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequirementCheck {
    violations: Vec<Violation>,
}

impl RequirementCheck {
    /// Violations come out in form order: the five habits, then water.
    pub fn run(answers: &DayAnswers) -> Self {
        let mut violations: Vec<Violation> = Habit::ALL
            .iter()
            .filter(|habit| !answers.is_checked(**habit))
            .map(|habit| Violation::NotChecked { habit: *habit })
            .collect();

        let shortfall = answers.water_cups.shortfall();
        if shortfall > 0 {
            violations.push(Violation::WaterShort { shortfall });
        }

        Self { violations }
    }

    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(cups: i64) -> DayAnswers {
        DayAnswers {
            workout1: true,
            workout2: true,
            diet: true,
            photo: true,
            reading: true,
            water_cups: WaterCups::new(cups),
        }
    }

    #[test]
    fn test_everything_done_passes() {
        let check = RequirementCheck::run(&answers(10));
        assert!(check.passed());
        assert!(check.messages().is_empty());
    }

    #[test]
    fn test_water_short_reports_exact_shortfall() {
        let check = RequirementCheck::run(&answers(7));
        assert_eq!(check.violations(), &[Violation::WaterShort { shortfall: 3 }]);
        assert_eq!(
            check.messages(),
            vec!["Water intake is short by 3 cup(s) of 400ml.".to_string()]
        );
    }

    #[test]
    fn test_blank_form_reports_in_fixed_order() {
        let check = RequirementCheck::run(&DayAnswers::default());
        assert_eq!(
            check.messages(),
            vec![
                "Workout 1 is not completed.",
                "Workout 2 is not completed.",
                "Diet requirement is not met.",
                "Progress photo not taken.",
                "Reading (10+ pages) not completed.",
                "Water intake is short by 10 cup(s) of 400ml.",
            ]
        );
    }

    #[test]
    fn test_extra_water_is_fine() {
        assert!(RequirementCheck::run(&answers(20)).passed());
    }

    #[test]
    fn test_single_missing_habit() {
        let mut a = answers(10);
        a.photo = false;
        let check = RequirementCheck::run(&a);
        assert_eq!(
            check.violations(),
            &[Violation::NotChecked {
                habit: Habit::Photo
            }]
        );
    }
}
