mod aggregate;
mod value_objects;

#[cfg(test)]
mod aggregate_test;
#[cfg(test)]
mod value_objects_test;

pub use aggregate::DayRecord;
pub use value_objects::{DayAnswers, DayKey, Habit, WaterCups};
