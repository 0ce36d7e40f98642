use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use hard75_domain::day_record::{DayKey, DayRecord, WaterCups};
use hard75_domain::identity::Identity;
use hard75_domain::namespace::Namespace;
use hard75_domain::remote_log::{RemoteLogEntry, TaggedRemoteLog};
use hard75_domain::shared::Clock;
use hard75_domain::validation::RequirementCheck;

use super::dtos::{FormDto, NoticeDto};
use super::events::{AppEvent, FormEdit};
use super::presenter::Presenter;
use super::queries::{DayView, StreakQueries};
use super::services::{NamespaceResolver, RecordStore, SessionService, SyncBridge};
use super::state::TrackerState;

pub const SUBMIT_OK: &str = "Nice! All activities complete and your progress for today was saved.";
pub const SUBMIT_REJECTED: &str = "Progress was not saved because:";
pub const RESET_DONE: &str = "Today was reset. You can submit again when everything is complete.";
pub const SIGNED_IN: &str = "Logged in successfully.";
pub const SIGNED_OUT: &str = "Signed out.";

/// Collaborators the controller is wired with
pub struct TrackerDeps {
    pub store: Arc<RecordStore>,
    pub sessions: Arc<SessionService>,
    pub sync: SyncBridge,
    pub presenter: Arc<dyn Presenter>,
    pub clock: Arc<dyn Clock>,
}

/// Owns all tracker state and reacts to one `AppEvent` at a time.
///
/// Every handler ends in a full re-render. Remote snapshots are only used
/// while their tag matches the active namespace and live subscription.
pub struct TrackerController {
    store: Arc<RecordStore>,
    sessions: Arc<SessionService>,
    resolver: NamespaceResolver,
    streaks: StreakQueries,
    sync: SyncBridge,
    presenter: Arc<dyn Presenter>,
    clock: Arc<dyn Clock>,
    events: mpsc::Sender<AppEvent>,
    state: TrackerState,
}

impl TrackerController {
    /// `events` is the sender side of the channel later passed to `run`
    pub fn new(deps: TrackerDeps, events: mpsc::Sender<AppEvent>) -> Self {
        let today = DayKey::new(deps.clock.today());
        Self {
            resolver: NamespaceResolver::new(deps.store.clone()),
            streaks: StreakQueries::new(deps.store.clone()),
            store: deps.store,
            sessions: deps.sessions,
            sync: deps.sync,
            presenter: deps.presenter,
            clock: deps.clock,
            events,
            state: TrackerState::new(today),
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn current_namespace(&self) -> Namespace {
        self.resolver.current_namespace()
    }

    /// First paint: apply the identity the provider reported at launch and
    /// surface why sync is off, once
    pub async fn start(&mut self, identity: Option<Identity>) {
        self.on_auth_changed(identity).await;
        if let Some(reason) = self.sync.take_disabled_reason() {
            self.presenter.show_message(&NoticeDto::error(reason));
        }
    }

    /// Consume events until `Shutdown`
    pub async fn run(&mut self, mut events: mpsc::Receiver<AppEvent>) {
        while let Some(event) = events.recv().await {
            if !self.handle(event).await {
                break;
            }
        }
        self.shutdown().await;
    }

    /// Drop the live feed and wait for queued remote writes
    pub async fn shutdown(&mut self) {
        self.sync.cancel();
        self.sync.flush().await;
        info!("[app] tracker stopped");
    }

    /// Handle queued events until the live subscription has delivered a
    /// snapshot for the active namespace, or `wait` runs out
    pub async fn await_remote(&mut self, events: &mut mpsc::Receiver<AppEvent>, wait: Duration) {
        if self.sync.active_subscription().is_none() {
            return;
        }

        let deadline = tokio::time::Instant::now() + wait;
        while !self.has_live_remote() {
            match tokio::time::timeout_at(deadline, events.recv()).await {
                Ok(Some(event)) => {
                    if !self.handle(event).await {
                        return;
                    }
                }
                Ok(None) => return,
                Err(_) => {
                    debug!("[sync] no remote snapshot within {:?}", wait);
                    return;
                }
            }
        }
    }

    /// Returns `false` once the loop should stop
    pub async fn handle(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::AuthChanged(identity) => self.on_auth_changed(identity).await,
            AppEvent::FormEdited(edit) => self.on_form_edited(edit).await,
            AppEvent::Submit => self.on_submit().await,
            AppEvent::ResetToday => self.on_reset_today().await,
            AppEvent::RolloverCheck => self.on_rollover_check().await,
            AppEvent::RemoteLogUpdated(log) => self.on_remote_log(log).await,
            AppEvent::SignInRequested(claim) => self.on_sign_in(claim).await,
            AppEvent::SignOutRequested => self.on_sign_out().await,
            AppEvent::Refresh => self.on_refresh().await,
            AppEvent::Shutdown => return false,
        }
        true
    }

    async fn on_auth_changed(&mut self, identity: Option<Identity>) {
        let transition = self.resolver.resolve(identity.as_ref()).await;
        self.state.identity = identity;

        if transition.changes_namespace() {
            self.state.remote = None;
            match &self.state.identity {
                Some(identity) => {
                    self.sync.subscribe_log(identity, self.events.clone());
                }
                None => self.sync.cancel(),
            }
            self.load_form().await;
        }

        if transition.is_real_sign_out() {
            self.presenter.reset_view();
        }

        self.render().await;

        if transition.is_real_sign_out() {
            self.presenter.show_message(&NoticeDto::info(SIGNED_OUT));
        } else if transition.announces_sign_in() {
            self.presenter.show_message(&NoticeDto::success(SIGNED_IN));
        }
    }

    async fn on_form_edited(&mut self, edit: FormEdit) {
        self.catch_up_rollover();
        let form = &mut self.state.form;
        match edit {
            FormEdit::Check(habit, checked) => form.set_checked(habit, checked),
            FormEdit::WaterIncrement => form.water_cups = form.water_cups.increment(),
            FormEdit::WaterDecrement => form.water_cups = form.water_cups.decrement(),
            FormEdit::WaterSet(cups) => form.water_cups = WaterCups::new(cups),
        }

        self.autosave().await;
        self.render().await;
    }

    /// Persist the form as a partial; only a lost completion is mirrored
    async fn autosave(&mut self) {
        let namespace = self.resolver.current_namespace();
        let date = self.state.form_date;
        let previous = self.store.get_day(&namespace, date).await;
        let record = DayRecord::autosave(
            date,
            self.state.form,
            previous.as_ref(),
            self.clock.now().fixed_offset(),
        );

        let lost_completion =
            previous.as_ref().is_some_and(DayRecord::is_complete) && !record.is_complete();

        if let Err(e) = self.store.save_day(&namespace, date, record).await {
            warn!("[store] autosave failed ns={}: {}", namespace, e);
            return;
        }

        if lost_completion {
            self.sync
                .write_today_log(self.state.identity.as_ref(), date, false);
            self.patch_remote(date, Some(false));
        }
    }

    async fn on_submit(&mut self) {
        self.catch_up_rollover();
        let check = RequirementCheck::run(&self.state.form);
        if !check.passed() {
            let reasons: Vec<String> = check
                .messages()
                .into_iter()
                .map(|m| format!("- {}", m))
                .collect();
            info!("[app] submission rejected ({} reasons)", reasons.len());
            self.presenter.show_message(&NoticeDto::error(format!(
                "{}\n{}",
                SUBMIT_REJECTED,
                reasons.join("\n")
            )));
            return;
        }

        let namespace = self.resolver.current_namespace();
        let date = self.state.form_date;
        match DayRecord::submit(date, self.state.form, self.clock.now().fixed_offset()) {
            Ok(record) => {
                if let Err(e) = self.store.save_day(&namespace, date, record).await {
                    warn!("[store] save failed ns={} date={}: {}", namespace, date, e);
                }
            }
            Err(e) => {
                warn!("[app] submission rejected: {}", e);
                return;
            }
        }

        info!("[app] day submitted ns={} date={}", namespace, date);
        self.sync
            .write_today_log(self.state.identity.as_ref(), date, true);
        self.patch_remote(date, Some(true));

        self.render().await;
        self.presenter.show_message(&NoticeDto::success(SUBMIT_OK));
    }

    async fn on_reset_today(&mut self) {
        self.catch_up_rollover();
        let namespace = self.resolver.current_namespace();
        let date = self.state.form_date;

        if let Err(e) = self.store.remove_day(&namespace, date).await {
            warn!("[store] reset failed ns={} date={}: {}", namespace, date, e);
        }
        self.sync
            .delete_today_log(self.state.identity.as_ref(), date);
        self.patch_remote(date, None);
        self.state.reset_form(date);

        info!("[app] day reset ns={} date={}", namespace, date);
        self.render().await;
        self.presenter.show_message(&NoticeDto::info(RESET_DONE));
    }

    async fn on_rollover_check(&mut self) {
        if self.catch_up_rollover() {
            self.render().await;
        }
    }

    async fn on_refresh(&mut self) {
        self.catch_up_rollover();
        self.render().await;
    }

    /// Reset the form when the local date moved past the form's day
    fn catch_up_rollover(&mut self) -> bool {
        let today = self.today();
        if today == self.state.form_date {
            return false;
        }

        info!(
            "[rollover] day changed {} -> {}, resetting form",
            self.state.form_date, today
        );
        self.state.reset_form(today);
        true
    }

    async fn on_remote_log(&mut self, log: TaggedRemoteLog) {
        let namespace = self.resolver.current_namespace();
        if !self.sync.accepts(&log, &namespace) {
            debug!(
                "[sync] discarding snapshot for ns={} subscription={} (active ns={})",
                log.namespace, log.subscription, namespace
            );
            return;
        }

        debug!(
            "[sync] snapshot ns={} entries={}",
            log.namespace,
            log.entries.len()
        );
        self.state.remote = Some(log);
        self.render().await;
    }

    async fn on_sign_in(&mut self, claim: Identity) {
        let report = self.sessions.sign_in(&claim).await;
        for notice in &report.notices {
            self.presenter.show_message(notice);
        }
        if let Some(identity) = report.identity {
            self.on_auth_changed(Some(identity)).await;
        }
    }

    async fn on_sign_out(&mut self) {
        match self.sessions.sign_out().await {
            Some(notice) => self.presenter.show_message(&notice),
            None => self.on_auth_changed(None).await,
        }
    }

    async fn load_form(&mut self) {
        let today = self.today();
        let namespace = self.resolver.current_namespace();
        let form = self
            .store
            .get_day(&namespace, today)
            .await
            .map(|record| *record.answers())
            .unwrap_or_default();

        self.state.form_date = today;
        self.state.form = form;
    }

    /// Apply a local write to the cached snapshot until the feed confirms it
    fn patch_remote(&mut self, date: DayKey, complete: Option<bool>) {
        let namespace = self.resolver.current_namespace();
        if !self.has_live_remote() {
            return;
        }
        let Some(log) = self.state.remote.as_mut() else {
            return;
        };

        log.entries.retain(|e| e.date != date);
        if let Some(complete) = complete {
            log.entries.push(RemoteLogEntry {
                date,
                complete,
                saved_at: None,
            });
            log.entries.sort_by(|a, b| b.date.cmp(&a.date));
        }
        debug!("[sync] patched cached snapshot ns={} date={}", namespace, date);
    }

    fn has_live_remote(&self) -> bool {
        let namespace = self.resolver.current_namespace();
        self.state
            .remote
            .as_ref()
            .is_some_and(|log| self.sync.accepts(log, &namespace))
    }

    /// Remote data when a live snapshot for the active namespace has
    /// entries, otherwise the local cache
    async fn active_view(&self, namespace: &Namespace) -> DayView {
        match &self.state.remote {
            Some(log) if self.sync.accepts(log, namespace) && !log.entries.is_empty() => {
                DayView::from_remote(&log.entries)
            }
            _ => DayView::from_local(&self.store.get_all(namespace).await),
        }
    }

    pub async fn render(&self) {
        let now = self.clock.now();
        let today = DayKey::new(now.date_naive());
        let namespace = self.resolver.current_namespace();
        let view = self.active_view(&namespace).await;

        self.presenter.render_date(now);
        self.presenter
            .render_user(self.state.identity.as_ref().map(Identity::label));
        self.presenter.render_status(&view.status(today));
        self.presenter.render_streaks(
            &self
                .streaks
                .get_streak_stats(&namespace, &view, today)
                .await,
        );
        self.presenter
            .render_form(&FormDto::new(self.state.form_date, &self.state.form));
        self.presenter.render_log(&view.log());
        self.presenter.end_frame();
    }

    fn today(&self) -> DayKey {
        DayKey::new(self.clock.today())
    }
}
