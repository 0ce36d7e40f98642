#[cfg(test)]
mod tests {
    use super::super::value_objects::*;
    use chrono::NaiveDate;

    #[test]
    fn test_day_key_parse_and_display() {
        let key = DayKey::parse("2025-03-09").unwrap();
        assert_eq!(key.date(), NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert_eq!(key.to_string(), "2025-03-09");
    }

    #[test]
    fn test_day_key_rejects_garbage() {
        assert!(DayKey::parse("09/03/2025").is_err());
        assert!(DayKey::parse("").is_err());
        assert!(DayKey::parse("2025-02-30").is_err());
    }

    #[test]
    fn test_day_key_neighbours_cross_month_and_year() {
        let key = DayKey::parse("2025-01-01").unwrap();
        assert_eq!(key.previous().to_string(), "2024-12-31");
        assert_eq!(key.previous().days_until(&key), 1);
    }

    #[test]
    fn test_day_key_serializes_as_string() {
        let key = DayKey::parse("2025-06-01").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2025-06-01\"");
        let back: DayKey = serde_json::from_str("\"2025-06-01\"").unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_water_increment_clamps_at_max() {
        let mut cups = WaterCups::new(18);
        for _ in 0..10 {
            cups = cups.increment();
        }
        assert_eq!(cups.value(), 20);
        assert_eq!(cups.millilitres(), 8000);
    }

    #[test]
    fn test_water_decrement_clamps_at_zero() {
        let mut cups = WaterCups::new(2);
        for _ in 0..10 {
            cups = cups.decrement();
        }
        assert_eq!(cups.value(), 0);
    }

    #[test]
    fn test_water_new_clamps_out_of_range() {
        assert_eq!(WaterCups::new(-4).value(), 0);
        assert_eq!(WaterCups::new(99).value(), 20);
        assert_eq!(WaterCups::new(7).shortfall(), 3);
        assert_eq!(WaterCups::new(12).shortfall(), 0);
    }

    #[test]
    fn test_water_deserialize_is_lenient() {
        let cups: WaterCups = serde_json::from_str("35").unwrap();
        assert_eq!(cups.value(), 20);
        let cups: WaterCups = serde_json::from_str("4.0").unwrap();
        assert_eq!(cups.value(), 4);
    }

    #[test]
    fn test_habit_from_str() {
        assert_eq!("workout1".parse::<Habit>().unwrap(), Habit::Workout1);
        assert_eq!("W2".parse::<Habit>().unwrap(), Habit::Workout2);
        assert_eq!("Reading".parse::<Habit>().unwrap(), Habit::Reading);
        assert!("yoga".parse::<Habit>().is_err());
    }

    #[test]
    fn test_answers_set_and_get() {
        let mut answers = DayAnswers::default();
        answers.set_checked(Habit::Photo, true);
        assert!(answers.is_checked(Habit::Photo));
        assert!(!answers.is_checked(Habit::Diet));
        answers.set_checked(Habit::Photo, false);
        assert!(!answers.is_checked(Habit::Photo));
    }
}
