//! Self-check view lifecycle
//!
//! A view owns its snapshot, busy flag and the single task that fetches
//! and polls. Mounting spawns the task; dropping the view marks it closed
//! and aborts the task, so no result is ever published after teardown.

use super::{
    Action, ActionOutcome, PollScheduler, Presentation, StatusSnapshot, present, run_action,
};
use crate::api::{AdminClient, AdminTransport, ApiError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors returned by view operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Another operation is already in progress")]
    Busy,

    #[error("The view has been closed")]
    Closed,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Everything the view currently knows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub snapshot: Option<StatusSnapshot>,
    pub busy: bool,
    pub error: Option<ApiError>,
}

impl ViewState {
    pub fn presentation(&self) -> Presentation {
        let error = self.error.as_ref().map(ToString::to_string);
        present(self.snapshot.as_ref(), self.busy, error.as_deref())
    }
}

enum Command {
    Run {
        action: Action,
        reply: oneshot::Sender<Result<ActionOutcome, ApiError>>,
    },
    Refresh {
        reply: oneshot::Sender<Result<StatusSnapshot, ApiError>>,
    },
}

enum Event {
    Command(Command),
    Tick,
}

/// Handle to a mounted self-check view
pub struct SelfCheckView {
    commands: mpsc::Sender<Command>,
    state: Arc<watch::Sender<ViewState>>,
    closed: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SelfCheckView {
    /// Mount the view: fetch once immediately, then poll while running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount<T: AdminTransport>(client: Arc<AdminClient<T>>, interval: Duration) -> Self {
        let (commands, receiver) = mpsc::channel(8);
        let state = Arc::new(watch::Sender::new(ViewState::default()));
        let closed = Arc::new(AtomicBool::new(false));

        let driver = Driver {
            client,
            scheduler: PollScheduler::new(interval),
            commands: receiver,
            state: Arc::clone(&state),
            closed: Arc::clone(&closed),
        };
        let task = tokio::spawn(driver.run());

        Self {
            commands,
            state,
            closed,
            task,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Run an action unless one is already in flight.
    ///
    /// The busy flag is claimed before the request is dispatched and is
    /// released on every exit path, including the future being dropped
    /// while the command is still waiting for queue space. Once queued, the
    /// driver owns the flag.
    pub async fn run(&self, action: Action) -> Result<ActionOutcome, ViewError> {
        let claim = BusyClaim::acquire(&self.state).ok_or(ViewError::Busy)?;

        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Run { action, reply })
            .await
            .map_err(|_| ViewError::Closed)?;
        claim.hand_off();

        match response.await {
            Ok(result) => result.map_err(ViewError::from),
            Err(_) => {
                self.release();
                Err(ViewError::Closed)
            }
        }
    }

    /// Fetch the status now (user-initiated retry)
    pub async fn refresh(&self) -> Result<StatusSnapshot, ViewError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Refresh { reply })
            .await
            .map_err(|_| ViewError::Closed)?;
        response
            .await
            .map_err(|_| ViewError::Closed)?
            .map_err(ViewError::from)
    }

    /// Tear the view down, cancelling any pending poll
    pub fn close(self) {}

    fn release(&self) {
        self.state.send_modify(|state| state.busy = false);
    }
}

impl Drop for SelfCheckView {
    fn drop(&mut self) {
        // Set under the state lock: a driver publish either landed before
        // this or sees the flag.
        self.state.send_if_modified(|_| {
            self.closed.store(true, Ordering::Release);
            false
        });
        self.task.abort();
    }
}

/// Busy flag held by a caller until its command is queued
struct BusyClaim<'a> {
    state: &'a watch::Sender<ViewState>,
    held: bool,
}

impl<'a> BusyClaim<'a> {
    fn acquire(state: &'a watch::Sender<ViewState>) -> Option<Self> {
        let claimed = state.send_if_modified(|state| {
            if state.busy {
                return false;
            }
            state.busy = true;
            true
        });
        claimed.then_some(Self { state, held: true })
    }

    /// The driver clears the flag from here on
    fn hand_off(mut self) {
        self.held = false;
    }
}

impl Drop for BusyClaim<'_> {
    fn drop(&mut self) {
        if self.held {
            self.state.send_modify(|state| state.busy = false);
        }
    }
}

struct Driver<T> {
    client: Arc<AdminClient<T>>,
    scheduler: PollScheduler,
    commands: mpsc::Receiver<Command>,
    state: Arc<watch::Sender<ViewState>>,
    closed: Arc<AtomicBool>,
}

impl<T: AdminTransport> Driver<T> {
    async fn run(mut self) {
        let _ = self.refresh().await;

        loop {
            let event = tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => Event::Command(command),
                    None => break,
                },
                () = self.scheduler.due() => Event::Tick,
            };

            match event {
                Event::Tick => {
                    debug!("Poll interval elapsed");
                    let _ = self.refresh().await;
                }
                Event::Command(Command::Refresh { reply }) => {
                    let result = self.refresh().await;
                    let _ = reply.send(result);
                }
                Event::Command(Command::Run { action, reply }) => {
                    let result = self.run_action(action).await;
                    let _ = reply.send(result);
                }
            }
        }
        debug!("Self-check view driver stopped");
    }

    async fn refresh(&mut self) -> Result<StatusSnapshot, ApiError> {
        let result = self.client.fetch_self_check_status().await;
        self.apply(&result);
        result
    }

    async fn run_action(&mut self, action: Action) -> Result<ActionOutcome, ApiError> {
        self.scheduler.disarm();
        self.publish(|state| state.error = None);

        let result = run_action(&self.client, &action).await;
        match &result {
            Ok(outcome) => self.apply(&outcome.refreshed),
            Err(e) => {
                warn!(error = %e, "Action failed");
                self.publish(|state| state.error = Some(e.clone()));
                self.rearm();
            }
        }

        self.publish(|state| state.busy = false);
        result
    }

    /// Replace the snapshot wholesale or record the error, then re-evaluate polling
    fn apply(&mut self, result: &Result<StatusSnapshot, ApiError>) {
        match result {
            Ok(snapshot) => self.publish(|state| {
                state.snapshot = Some(snapshot.clone());
                state.error = None;
            }),
            Err(e) => {
                warn!(error = %e, "Self-check status fetch failed");
                self.publish(|state| state.error = Some(e.clone()));
            }
        }
        self.rearm();
    }

    /// Apply `modify` unless the view has been torn down
    fn publish(&self, modify: impl FnOnce(&mut ViewState)) {
        self.state.send_if_modified(|state| {
            if self.closed.load(Ordering::Acquire) {
                return false;
            }
            modify(state);
            true
        });
    }

    fn rearm(&mut self) {
        let snapshot = self.state.borrow().snapshot.clone();
        let phase = self.scheduler.rearm(snapshot.as_ref());
        debug!(?phase, "Poll scheduler re-evaluated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{Method, ScriptedTransport};
    use crate::api::{SELF_CHECK_RUN_PATH, SELF_CHECK_STATUS_PATH};
    use crate::self_check::DisplayState;
    use tokio::time::{sleep, timeout};

    const RUNNING: &str = r#"{"overallStatus":"never_run","isRunning":true,"scripts":{}}"#;
    const DONE: &str = r#"{"overallStatus":"success","isRunning":false,"scripts":{"dns":{"success":true,"message":"ok"}}}"#;
    const INTERVAL: Duration = Duration::from_millis(2000);

    fn mount(transport: &ScriptedTransport) -> SelfCheckView {
        SelfCheckView::mount(Arc::new(AdminClient::new(transport.clone())), INTERVAL)
    }

    fn status_gets(transport: &ScriptedTransport) -> usize {
        transport.count(Method::Get, SELF_CHECK_STATUS_PATH)
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetches_once_immediately() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(DONE.to_string()));
        let view = mount(&transport);

        sleep(Duration::from_millis(1)).await;
        assert_eq!(status_gets(&transport), 1);
        assert_eq!(
            view.state().presentation().state,
            DisplayState::SettledSuccess
        );

        sleep(Duration::from_secs(30)).await;
        assert_eq!(status_gets(&transport), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn running_snapshot_polls_after_interval_not_before() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(RUNNING.to_string()));
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(DONE.to_string()));
        let view = mount(&transport);

        sleep(Duration::from_millis(1999)).await;
        assert_eq!(status_gets(&transport), 1);
        assert_eq!(view.state().presentation().state, DisplayState::Running);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(status_gets(&transport), 2);
        assert_eq!(
            view.state().presentation().state,
            DisplayState::SettledSuccess
        );

        sleep(Duration::from_secs(30)).await;
        assert_eq!(status_gets(&transport), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_polling_while_running() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(RUNNING.to_string()));
        let _view = mount(&transport);

        sleep(Duration::from_millis(6001)).await;
        assert_eq!(status_gets(&transport), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_initial_fetch_does_not_spin() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Method::Get,
            SELF_CHECK_STATUS_PATH,
            Err(ApiError::Network("connection refused".to_string())),
        );
        let view = mount(&transport);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(status_gets(&transport), 1);
        let state = view.state();
        assert!(state.snapshot.is_none());
        assert!(matches!(state.presentation().state, DisplayState::Error(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_keeps_snapshot_and_retries_next_tick() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(RUNNING.to_string()));
        transport.respond(
            Method::Get,
            SELF_CHECK_STATUS_PATH,
            Err(ApiError::Network("timeout".to_string())),
        );
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(DONE.to_string()));
        let view = mount(&transport);

        sleep(Duration::from_millis(2001)).await;
        let state = view.state();
        assert!(state.snapshot.as_ref().is_some_and(|s| s.is_running));
        assert!(state.error.is_some());

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(status_gets(&transport), 3);
        let state = view.state();
        assert!(state.error.is_none());
        assert_eq!(state.presentation().state, DisplayState::SettledSuccess);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_view_cancels_pending_poll() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(RUNNING.to_string()));
        let view = mount(&transport);
        let mut updates = view.subscribe();

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(status_gets(&transport), 1);
        updates.borrow_and_update();
        let closed = Arc::clone(&view.closed);
        view.close();
        assert!(closed.load(Ordering::Acquire));

        sleep(Duration::from_secs(10)).await;
        assert_eq!(status_gets(&transport), 1);
        assert!(updates.changed().await.is_err());
    }

    #[tokio::test]
    async fn closed_driver_publishes_nothing() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(DONE.to_string()));
        let state = Arc::new(watch::Sender::new(ViewState::default()));
        let mut updates = state.subscribe();
        let (_commands, receiver) = mpsc::channel(1);
        let mut driver = Driver {
            client: Arc::new(AdminClient::new(transport.clone())),
            scheduler: PollScheduler::new(INTERVAL),
            commands: receiver,
            state: Arc::clone(&state),
            closed: Arc::new(AtomicBool::new(true)),
        };

        assert!(driver.refresh().await.is_ok());
        assert!(!updates.has_changed().unwrap());
        assert!(state.borrow().snapshot.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn run_action_restarts_polling() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(DONE.to_string()));
        let view = mount(&transport);
        sleep(Duration::from_millis(1)).await;

        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(RUNNING.to_string()));
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(DONE.to_string()));
        // Drop the DONE reply still at the queue head
        let _ = view.refresh().await;

        let outcome = view.run(Action::RunSelfCheck).await.unwrap();
        assert!(outcome.refreshed.unwrap().is_running);
        assert_eq!(transport.count(Method::Post, SELF_CHECK_RUN_PATH), 1);
        let after_action = status_gets(&transport);
        assert!(!view.state().busy);

        sleep(Duration::from_millis(1999)).await;
        assert_eq!(status_gets(&transport), after_action);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(status_gets(&transport), after_action + 1);
        assert_eq!(
            view.state().presentation().state,
            DisplayState::SettledSuccess
        );
    }

    #[tokio::test(start_paused = true)]
    async fn busy_view_rejects_second_action() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(DONE.to_string()));
        let view = mount(&transport);
        sleep(Duration::from_millis(1)).await;

        view.state.send_modify(|state| state.busy = true);
        let err = view.run(Action::RunSelfCheck).await.unwrap_err();
        assert_eq!(err, ViewError::Busy);
        assert_eq!(transport.count(Method::Post, SELF_CHECK_RUN_PATH), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_action_clears_busy_and_surfaces_error() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(DONE.to_string()));
        transport.respond(
            Method::Post,
            SELF_CHECK_RUN_PATH,
            Err(ApiError::Auth("session expired".to_string())),
        );
        let view = mount(&transport);
        sleep(Duration::from_millis(1)).await;

        let err = view.run(Action::RunSelfCheck).await.unwrap_err();
        assert_eq!(
            err,
            ViewError::Api(ApiError::Auth("session expired".to_string()))
        );
        let state = view.state();
        assert!(!state.busy);
        assert!(state.error.as_ref().is_some_and(ApiError::is_auth));
        assert_eq!(status_gets(&transport), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_run_releases_busy_flag() {
        let transport = ScriptedTransport::new();
        transport.respond(Method::Get, SELF_CHECK_STATUS_PATH, Ok(DONE.to_string()));
        let gate = transport.gate();
        let view = Arc::new(mount(&transport));

        // The driver is parked in its mount fetch; fill the command queue
        let queued: Vec<_> = (0..8)
            .map(|_| {
                let view = Arc::clone(&view);
                tokio::spawn(async move { view.refresh().await })
            })
            .collect();
        sleep(Duration::from_millis(1)).await;

        let abandoned = view.run(Action::RunSelfCheck);
        assert!(timeout(Duration::from_millis(20), abandoned).await.is_err());
        assert!(!view.state().busy);

        gate.add_permits(1);
        for task in queued {
            task.await.unwrap().unwrap();
        }
        view.run(Action::RunSelfCheck).await.unwrap();
        assert_eq!(transport.count(Method::Post, SELF_CHECK_RUN_PATH), 1);
        assert!(!view.state().busy);
    }
}
