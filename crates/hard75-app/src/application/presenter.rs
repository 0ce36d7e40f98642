use chrono::{DateTime, Local};

use super::dtos::{FormDto, LogEntryDto, NoticeDto, StreakDto, TodayStatusDto};

/// Rendering surface driven by the controller.
///
/// Implementations only draw; they never call back into the tracker.
pub trait Presenter: Send + Sync {
    fn render_date(&self, now: DateTime<Local>);

    /// Label of the signed-in user, `None` for guest
    fn render_user(&self, label: Option<&str>);

    fn render_status(&self, status: &TodayStatusDto);

    fn render_streaks(&self, streaks: &StreakDto);

    fn render_form(&self, form: &FormDto);

    /// Newest first
    fn render_log(&self, entries: &[LogEntryDto]);

    fn show_message(&self, notice: &NoticeDto);

    /// Wipe everything rendered for the previous user
    fn reset_view(&self);

    /// A full render pass just finished
    fn end_frame(&self) {}
}
