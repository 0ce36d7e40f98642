use hard75_domain::day_record::Habit;
use hard75_domain::identity::Identity;
use hard75_domain::remote_log::TaggedRemoteLog;

/// Everything the tracker reacts to. The controller consumes these one at a
/// time; background tasks only ever send them.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Identity provider reported a user, or nobody
    AuthChanged(Option<Identity>),
    FormEdited(FormEdit),
    Submit,
    ResetToday,
    /// Periodic tick; acts only when the local date moved on
    RolloverCheck,
    RemoteLogUpdated(TaggedRemoteLog),
    /// Interactive sign-in with the details the user entered
    SignInRequested(Identity),
    SignOutRequested,
    /// Re-render; a day rollover is still caught up first
    Refresh,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEdit {
    Check(Habit, bool),
    WaterIncrement,
    WaterDecrement,
    WaterSet(i64),
}
