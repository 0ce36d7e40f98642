use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use hard75_domain::day_record::Habit;

use crate::application::dtos::{FormDto, LogEntryDto, NoticeDto, StreakDto, TodayStatusDto};
use crate::application::Presenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// What a buffered presenter prints on `flush`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputView {
    Full,
    LogOnly,
}

#[derive(Debug, Clone, Default, Serialize)]
struct Frame {
    date: Option<String>,
    user: Option<String>,
    status: Option<TodayStatusDto>,
    streaks: Option<StreakDto>,
    form: Option<FormDto>,
    log: Vec<LogEntryDto>,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    #[serde(flatten)]
    frame: &'a Frame,
    messages: &'a [NoticeDto],
}

/// One line per event in live JSON mode
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum LiveLine<'a> {
    Frame(&'a Frame),
    Message(&'a NoticeDto),
}

/// `Presenter` for a terminal.
///
/// Live mode (`watch`) prints every finished frame and every message as it
/// happens. Buffered mode keeps only the latest frame plus all messages and
/// prints them once on `flush`.
pub struct TerminalPresenter {
    format: OutputFormat,
    live: bool,
    frame: Mutex<Frame>,
    messages: Mutex<Vec<NoticeDto>>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalPresenter {
    pub fn stdout(format: OutputFormat, live: bool) -> Self {
        Self::with_writer(format, live, Box::new(std::io::stdout()))
    }

    pub fn with_writer(format: OutputFormat, live: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            format,
            live,
            frame: Mutex::new(Frame::default()),
            messages: Mutex::new(Vec::new()),
            out: Mutex::new(out),
        }
    }

    /// Print what a buffered presenter collected
    pub fn flush(&self, view: OutputView) {
        let frame = lock(&self.frame).clone();
        let messages = std::mem::take(&mut *lock(&self.messages));

        let text = match (self.format, view) {
            (OutputFormat::Json, OutputView::Full) => to_json_pretty(&Snapshot {
                frame: &frame,
                messages: &messages,
            }),
            (OutputFormat::Json, OutputView::LogOnly) => to_json_pretty(&frame.log),
            (OutputFormat::Text, OutputView::Full) => {
                let mut text = format_frame(&frame);
                for notice in &messages {
                    text.push_str(&format_notice(notice));
                }
                text
            }
            (OutputFormat::Text, OutputView::LogOnly) => format_log(&frame.log),
        };
        self.write(&text);
    }

    fn update(&self, apply: impl FnOnce(&mut Frame)) {
        apply(&mut lock(&self.frame));
    }

    fn write(&self, text: &str) {
        let mut out = lock(&self.out);
        // A closed stdout is not worth failing a render over
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl Presenter for TerminalPresenter {
    fn render_date(&self, now: DateTime<Local>) {
        self.update(|f| f.date = Some(now.format("%A, %b %-d, %Y").to_string()));
    }

    fn render_user(&self, label: Option<&str>) {
        self.update(|f| f.user = label.map(str::to_string));
    }

    fn render_status(&self, status: &TodayStatusDto) {
        self.update(|f| f.status = Some(status.clone()));
    }

    fn render_streaks(&self, streaks: &StreakDto) {
        self.update(|f| f.streaks = Some(streaks.clone()));
    }

    fn render_form(&self, form: &FormDto) {
        self.update(|f| f.form = Some(form.clone()));
    }

    fn render_log(&self, entries: &[LogEntryDto]) {
        self.update(|f| f.log = entries.to_vec());
    }

    fn show_message(&self, notice: &NoticeDto) {
        if !self.live {
            lock(&self.messages).push(notice.clone());
            return;
        }
        let text = match self.format {
            OutputFormat::Json => to_json_line(&LiveLine::Message(notice)),
            OutputFormat::Text => format_notice(notice),
        };
        self.write(&text);
    }

    fn reset_view(&self) {
        *lock(&self.frame) = Frame::default();
        if self.live && self.format == OutputFormat::Text {
            self.write("\n---\n");
        }
    }

    fn end_frame(&self) {
        if !self.live {
            return;
        }
        let frame = lock(&self.frame).clone();
        let text = match self.format {
            OutputFormat::Json => to_json_line(&LiveLine::Frame(&frame)),
            OutputFormat::Text => format!("\n{}", format_frame(&frame)),
        };
        self.write(&text);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    format!("{}\n", serde_json::to_string_pretty(value).unwrap_or_default())
}

fn to_json_line<T: Serialize + ?Sized>(value: &T) -> String {
    format!("{}\n", serde_json::to_string(value).unwrap_or_default())
}

fn habit_label(habit: Habit) -> &'static str {
    match habit {
        Habit::Workout1 => "Workout 1",
        Habit::Workout2 => "Workout 2",
        Habit::Diet => "Diet",
        Habit::Photo => "Progress photo",
        Habit::Reading => "Reading (10+ pages)",
    }
}

fn format_notice(notice: &NoticeDto) -> String {
    format!("{}: {}\n", notice.kind.label(), notice.text)
}

fn format_log(log: &[LogEntryDto]) -> String {
    if log.is_empty() {
        return "  (no entries yet)\n".to_string();
    }
    log.iter()
        .map(|entry| {
            format!(
                "  {}  {}\n",
                entry.date,
                if entry.complete { "Complete" } else { "Incomplete" }
            )
        })
        .collect()
}

fn format_frame(frame: &Frame) -> String {
    let mut text = String::new();

    if let Some(date) = &frame.date {
        text.push_str(&format!("{}\n", date));
    }
    if let Some(user) = &frame.user {
        text.push_str(&format!("Signed in as {}\n", user));
    }
    if let Some(status) = &frame.status {
        text.push_str(&format!("[{}] {}\n", status.state.badge(), status.message));
    }
    if let Some(streaks) = &frame.streaks {
        text.push_str(&format!(
            "Current streak: {}   Longest streak: {}\n",
            streaks.current_streak, streaks.longest_streak
        ));
    }
    if let Some(form) = &frame.form {
        text.push_str(&format!("\nToday ({}):\n", form.date));
        let checked = [
            form.workout1,
            form.workout2,
            form.diet,
            form.photo,
            form.reading,
        ];
        for (habit, done) in Habit::ALL.iter().zip(checked) {
            text.push_str(&format!(
                "  [{}] {}\n",
                if done { "x" } else { " " },
                habit_label(*habit)
            ));
        }
        text.push_str(&format!(
            "  Water: {}/{} cups ({} ml)\n",
            form.water_cups, form.water_target, form.water_ml
        ));
    }

    text.push_str("\nLog:\n");
    text.push_str(&format_log(&frame.log));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dtos::{DataSource, SubmissionState};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn status() -> TodayStatusDto {
        TodayStatusDto {
            date: "2025-04-02".to_string(),
            state: SubmissionState::NotSubmitted,
            saved_at: None,
            source: DataSource::Local,
            message: "You haven’t submitted progress for 2025-04-02 yet.".to_string(),
        }
    }

    fn log() -> Vec<LogEntryDto> {
        vec![
            LogEntryDto {
                date: "2025-04-02".to_string(),
                complete: false,
            },
            LogEntryDto {
                date: "2025-04-01".to_string(),
                complete: true,
            },
        ]
    }

    #[test]
    fn test_buffered_text_prints_latest_frame_and_messages_once() {
        let buffer = Buffer::default();
        let presenter =
            TerminalPresenter::with_writer(OutputFormat::Text, false, Box::new(buffer.clone()));

        presenter.render_status(&status());
        presenter.render_log(&log());
        presenter.end_frame();
        presenter.show_message(&NoticeDto::success("Logged in successfully."));
        assert_eq!(buffer.text(), "");

        presenter.flush(OutputView::Full);
        let text = buffer.text();
        assert!(text.contains("[Not submitted yet] You haven’t submitted progress"));
        assert!(text.contains("  2025-04-02  Incomplete\n  2025-04-01  Complete\n"));
        assert!(text.ends_with("SUCCESS: Logged in successfully.\n"));
    }

    #[test]
    fn test_log_only_json() {
        let buffer = Buffer::default();
        let presenter =
            TerminalPresenter::with_writer(OutputFormat::Json, false, Box::new(buffer.clone()));
        presenter.render_log(&log());

        presenter.flush(OutputView::LogOnly);
        let json: serde_json::Value = serde_json::from_str(&buffer.text()).unwrap();
        assert_eq!(json[0]["date"], "2025-04-02");
        assert_eq!(json[1]["complete"], true);
    }

    #[test]
    fn test_live_mode_prints_each_frame_and_message() {
        let buffer = Buffer::default();
        let presenter =
            TerminalPresenter::with_writer(OutputFormat::Json, true, Box::new(buffer.clone()));

        presenter.render_status(&status());
        presenter.end_frame();
        presenter.show_message(&NoticeDto::info("Signed out."));

        let text = buffer.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let frame: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(frame["frame"]["status"]["state"], "not_submitted");
        let message: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(message["message"]["kind"], "info");
    }

    #[test]
    fn test_reset_view_clears_frame() {
        let buffer = Buffer::default();
        let presenter =
            TerminalPresenter::with_writer(OutputFormat::Text, false, Box::new(buffer.clone()));
        presenter.render_user(Some("Alice"));
        presenter.render_log(&log());
        presenter.reset_view();

        presenter.flush(OutputView::Full);
        let text = buffer.text();
        assert!(!text.contains("Alice"));
        assert!(text.contains("(no entries yet)"));
    }
}
