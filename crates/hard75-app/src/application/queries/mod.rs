mod day_view;
mod streak_queries;

pub use day_view::DayView;
pub use streak_queries::StreakQueries;
