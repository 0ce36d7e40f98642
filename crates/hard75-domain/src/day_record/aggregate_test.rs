#[cfg(test)]
mod tests {
    use super::super::*;
    use chrono::{DateTime, FixedOffset};

    fn saved_at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-05-01T20:15:00+02:00").unwrap()
    }

    fn full_answers() -> DayAnswers {
        DayAnswers {
            workout1: true,
            workout2: true,
            diet: true,
            photo: true,
            reading: true,
            water_cups: WaterCups::new(10),
        }
    }

    fn day() -> DayKey {
        DayKey::parse("2025-05-01").unwrap()
    }

    #[test]
    fn test_submit_complete_answers() {
        let record = DayRecord::submit(day(), full_answers(), saved_at()).unwrap();
        assert!(record.is_complete());
        assert_eq!(record.date(), day());
        assert_eq!(record.water_cups().value(), 10);
    }

    #[test]
    fn test_submit_rejects_incomplete_answers() {
        let mut answers = full_answers();
        answers.diet = false;
        let err = DayRecord::submit(day(), answers, saved_at()).unwrap_err();
        assert!(err.to_string().contains("Diet requirement is not met."));
    }

    #[test]
    fn test_autosave_partial_is_incomplete() {
        let mut answers = DayAnswers::default();
        answers.workout1 = true;
        let record = DayRecord::autosave(day(), answers, None, saved_at());
        assert!(!record.is_complete());
    }

    #[test]
    fn test_autosave_never_promotes_to_complete() {
        let record = DayRecord::autosave(day(), full_answers(), None, saved_at());
        assert!(!record.is_complete());
    }

    #[test]
    fn test_autosave_keeps_complete_while_answers_still_pass() {
        let submitted = DayRecord::submit(day(), full_answers(), saved_at()).unwrap();
        let mut answers = full_answers();
        answers.water_cups = WaterCups::new(12);
        let record = DayRecord::autosave(day(), answers, Some(&submitted), saved_at());
        assert!(record.is_complete());

        answers.reading = false;
        let record = DayRecord::autosave(day(), answers, Some(&submitted), saved_at());
        assert!(!record.is_complete());
    }

    #[test]
    fn test_serialized_shape_is_camel_case() {
        let record = DayRecord::submit(day(), full_answers(), saved_at()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2025-05-01");
        assert_eq!(json["waterCups"], 10);
        assert_eq!(json["complete"], true);
        assert_eq!(json["workout1"], true);
        assert!(json["savedAt"].as_str().unwrap().starts_with("2025-05-01T20:15:00"));
    }

    #[test]
    fn test_deserialize_fills_missing_flags() {
        let json = r#"{"date":"2025-05-01","workout1":true,"savedAt":"2025-05-01T18:00:00.000Z"}"#;
        let record: DayRecord = serde_json::from_str(json).unwrap();
        assert!(record.answers().workout1);
        assert!(!record.answers().diet);
        assert_eq!(record.water_cups().value(), 0);
        assert!(!record.is_complete());
    }
}
