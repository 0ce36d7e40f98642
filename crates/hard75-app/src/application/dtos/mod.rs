mod day_dto;
mod notice_dto;
mod streak_dto;

pub use day_dto::{DataSource, FormDto, LogEntryDto, SubmissionState, TodayStatusDto};
pub use notice_dto::{MessageKind, NoticeDto};
pub use streak_dto::StreakDto;
