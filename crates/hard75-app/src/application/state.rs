use hard75_domain::day_record::{DayAnswers, DayKey};
use hard75_domain::identity::Identity;
use hard75_domain::remote_log::TaggedRemoteLog;

/// Everything the controller mutates between events
#[derive(Debug, Clone)]
pub struct TrackerState {
    /// Day the form belongs to; compared against the clock on rollover checks
    pub form_date: DayKey,
    pub form: DayAnswers,
    pub identity: Option<Identity>,
    /// Last accepted remote snapshot, tagged with its namespace
    pub remote: Option<TaggedRemoteLog>,
}

impl TrackerState {
    pub fn new(today: DayKey) -> Self {
        Self {
            form_date: today,
            form: DayAnswers::default(),
            identity: None,
            remote: None,
        }
    }

    pub fn reset_form(&mut self, date: DayKey) {
        self.form_date = date;
        self.form = DayAnswers::default();
    }
}
