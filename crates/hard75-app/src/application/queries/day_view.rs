use chrono::{DateTime, Local};
use std::collections::{BTreeMap, BTreeSet};

use hard75_domain::day_record::{DayKey, DayRecord};
use hard75_domain::remote_log::RemoteLogEntry;
use hard75_domain::streak::StreakEngine;

use crate::application::dtos::{DataSource, LogEntryDto, SubmissionState, TodayStatusDto};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewDay {
    complete: bool,
    saved_at: Option<DateTime<Local>>,
}

/// Read model over whichever day data is authoritative right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    source: DataSource,
    days: BTreeMap<DayKey, ViewDay>,
}

impl DayView {
    pub fn from_local(records: &BTreeMap<DayKey, DayRecord>) -> Self {
        let days = records
            .iter()
            .map(|(date, record)| {
                (
                    *date,
                    ViewDay {
                        complete: record.is_complete(),
                        saved_at: Some(record.saved_at().with_timezone(&Local)),
                    },
                )
            })
            .collect();

        Self {
            source: DataSource::Local,
            days,
        }
    }

    pub fn from_remote(entries: &[RemoteLogEntry]) -> Self {
        let days = entries
            .iter()
            .map(|entry| {
                (
                    entry.date,
                    ViewDay {
                        complete: entry.complete,
                        saved_at: entry.saved_at.map(|t| t.with_timezone(&Local)),
                    },
                )
            })
            .collect();

        Self {
            source: DataSource::Remote,
            days,
        }
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    /// Dates whose record is marked complete
    pub fn complete_set(&self) -> BTreeSet<DayKey> {
        StreakEngine::complete_days(self.days.iter().map(|(date, day)| (*date, day.complete)))
    }

    pub fn status(&self, today: DayKey) -> TodayStatusDto {
        let (state, saved_at, message) = match self.days.get(&today) {
            None => (
                SubmissionState::NotSubmitted,
                None,
                format!("You haven’t submitted progress for {} yet.", today),
            ),
            Some(day) if day.complete => {
                let time = day.saved_at.map(|t| t.format("%H:%M:%S").to_string());
                let message = match &time {
                    Some(time) => format!("All activities recorded for {} at {}.", today, time),
                    None => format!("All activities recorded for {}.", today),
                };
                (SubmissionState::Submitted, time, message)
            }
            Some(day) => (
                SubmissionState::Incomplete,
                day.saved_at.map(|t| t.format("%H:%M:%S").to_string()),
                format!(
                    "There’s an incomplete attempt saved for {}. Consider resetting and re-saving.",
                    today
                ),
            ),
        };

        TodayStatusDto {
            date: today.to_string(),
            state,
            saved_at,
            source: self.source,
            message,
        }
    }

    /// Every known day, newest first
    pub fn log(&self) -> Vec<LogEntryDto> {
        self.days
            .iter()
            .rev()
            .map(|(date, day)| LogEntryDto {
                date: date.to_string(),
                complete: day.complete,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};
    use hard75_domain::day_record::{DayAnswers, WaterCups};

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    fn full() -> DayAnswers {
        DayAnswers {
            workout1: true,
            workout2: true,
            diet: true,
            photo: true,
            reading: true,
            water_cups: WaterCups::new(10),
        }
    }

    fn local_records() -> BTreeMap<DayKey, DayRecord> {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 4, 2, 19, 0, 0)
            .unwrap();
        let mut records = BTreeMap::new();
        records.insert(
            day("2025-04-01"),
            DayRecord::submit(day("2025-04-01"), full(), at).unwrap(),
        );
        records.insert(
            day("2025-04-02"),
            DayRecord::autosave(day("2025-04-02"), DayAnswers::default(), None, at),
        );
        records
    }

    #[test]
    fn test_local_view_status_and_log() {
        let view = DayView::from_local(&local_records());
        assert_eq!(view.source(), DataSource::Local);
        assert_eq!(
            view.complete_set().into_iter().collect::<Vec<_>>(),
            vec![day("2025-04-01")]
        );

        let status = view.status(day("2025-04-02"));
        assert_eq!(status.state, SubmissionState::Incomplete);
        assert!(status.message.contains("incomplete attempt saved for 2025-04-02"));

        let status = view.status(day("2025-04-01"));
        assert_eq!(status.state, SubmissionState::Submitted);
        assert!(status.saved_at.is_some());

        let status = view.status(day("2025-04-03"));
        assert_eq!(status.state, SubmissionState::NotSubmitted);
        assert_eq!(
            status.message,
            "You haven’t submitted progress for 2025-04-03 yet."
        );

        let log = view.log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].date, "2025-04-02");
        assert!(!log[0].complete);
        assert!(log[1].complete);
    }

    #[test]
    fn test_remote_view_with_pending_timestamp() {
        let entries = vec![
            RemoteLogEntry {
                date: day("2025-04-02"),
                complete: true,
                saved_at: None,
            },
            RemoteLogEntry {
                date: day("2025-04-01"),
                complete: true,
                saved_at: Some(Utc.with_ymd_and_hms(2025, 4, 1, 18, 0, 0).unwrap()),
            },
        ];
        let view = DayView::from_remote(&entries);

        assert_eq!(view.source(), DataSource::Remote);
        assert_eq!(view.complete_set().len(), 2);

        let status = view.status(day("2025-04-02"));
        assert_eq!(status.state, SubmissionState::Submitted);
        assert_eq!(status.saved_at, None);
        assert_eq!(status.message, "All activities recorded for 2025-04-02.");
        assert_eq!(status.source, DataSource::Remote);
    }
}
