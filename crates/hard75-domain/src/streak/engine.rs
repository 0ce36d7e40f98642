use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::day_record::DayKey;

/// Streak numbers derived from one namespace's completed days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Run of complete days ending today (0 if today is not complete)
    pub current: u32,
    /// All-time longest: stored ratchet, data and current combined
    pub longest: u32,
    pub longest_from_data: u32,
    /// Value held in durable storage before this computation
    pub stored_longest: u32,
    pub total_complete_days: u32,
    pub last_complete_day: Option<DayKey>,
}

impl StreakSummary {
    /// Whether `longest` should replace the stored ratchet value
    pub fn raises_stored_longest(&self) -> bool {
        self.longest > self.stored_longest
    }
}

pub struct StreakEngine;

impl StreakEngine {
    /// Collect the days that count toward streaks. Incomplete days are dropped
    /// and so break runs the same way a missing day does.
    pub fn complete_days<I>(days: I) -> BTreeSet<DayKey>
    where
        I: IntoIterator<Item = (DayKey, bool)>,
    {
        days.into_iter()
            .filter_map(|(day, complete)| complete.then_some(day))
            .collect()
    }

    /// Walk back from `today` one calendar day at a time until a gap
    pub fn current_streak(complete: &BTreeSet<DayKey>, today: DayKey) -> u32 {
        let mut streak = 0u32;
        let mut cursor = today;
        while complete.contains(&cursor) {
            streak += 1;
            cursor = cursor.previous();
        }
        streak
    }

    /// Longest run of consecutive calendar days anywhere in the data
    pub fn longest_from_data(complete: &BTreeSet<DayKey>) -> u32 {
        let mut longest = 0u32;
        let mut run = 0u32;
        let mut prev: Option<DayKey> = None;

        for day in complete {
            run = match prev {
                Some(p) if p.days_until(day) == 1 => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            prev = Some(*day);
        }

        longest
    }

    pub fn compute(
        complete: &BTreeSet<DayKey>,
        today: DayKey,
        stored_longest: u32,
    ) -> StreakSummary {
        let current = Self::current_streak(complete, today);
        let longest_from_data = Self::longest_from_data(complete);
        let longest = stored_longest.max(longest_from_data).max(current);

        debug!(
            "[streak] computed today={} current={} from_data={} stored={} longest={}",
            today, current, longest_from_data, stored_longest, longest
        );

        StreakSummary {
            current,
            longest,
            longest_from_data,
            stored_longest,
            total_complete_days: complete.len() as u32,
            last_complete_day: complete.iter().next_back().copied(),
        }
    }
}
