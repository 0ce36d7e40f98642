use serde::{Deserialize, Serialize};

use hard75_domain::namespace::Namespace;
use hard75_domain::streak::StreakSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakDto {
    pub namespace: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_complete_days: u32,
    pub last_complete_date: Option<String>, // YYYY-MM-DD
}

impl StreakDto {
    pub fn from_summary(namespace: &Namespace, summary: &StreakSummary) -> Self {
        Self {
            namespace: namespace.to_string(),
            current_streak: summary.current,
            longest_streak: summary.longest,
            total_complete_days: summary.total_complete_days,
            last_complete_date: summary.last_complete_day.map(|d| d.to_string()),
        }
    }
}
