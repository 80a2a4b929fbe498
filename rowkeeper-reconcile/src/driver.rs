//! The async driver: executes the machine's commands against a live
//! document, runs its timers, and feeds observations back in.
//!
//! Single-threaded and cooperative: everything happens as a reaction to a
//! client message, a timer deadline, or the container identity poll. There
//! are no blocking waits anywhere — suspension is always a timer.

use crate::command::{Command, TimerKind};
use crate::error::{ReconcileError, ReconcileResult};
use crate::event::{Event, UserAction};
use crate::reconciler::Reconciler;
use backon::{BackoffBuilder, ExponentialBuilder};
use rowkeeper_dom::{Document, NodeId};
use rowkeeper_engine::{LabelFilter, RowSorter};
use rowkeeper_types::{ActiveMode, Millis, ReconcilerConfig, SortDirection};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy)]
enum DriverMessage {
    User(UserAction),
    HostChanged,
    Visibility { foreground: bool },
    Shutdown,
}

/// Handle for talking to a running [`ReconcileDriver`].
///
/// Cheap to clone; the driver stops when the last client drops (or on an
/// explicit [`DriverClient::shutdown`]).
#[derive(Debug, Clone)]
pub struct DriverClient {
    tx: mpsc::Sender<DriverMessage>,
    mode: watch::Receiver<ActiveMode>,
}

impl DriverClient {
    /// Sort now and keep enforcing the direction.
    pub async fn sort(&self, direction: SortDirection) -> ReconcileResult<()> {
        self.send(DriverMessage::User(UserAction::Sort(direction)))
            .await
    }

    /// Restore the pristine order and stop enforcing.
    pub async fn reset(&self) -> ReconcileResult<()> {
        self.send(DriverMessage::User(UserAction::Reset)).await
    }

    /// Flip auto-enforcement.
    pub async fn toggle_auto(&self) -> ReconcileResult<()> {
        self.send(DriverMessage::User(UserAction::ToggleAuto)).await
    }

    /// Tell the driver the host touched the document; it drains the
    /// mutation journal and feeds the batch through the machine.
    pub async fn host_changed(&self) -> ReconcileResult<()> {
        self.send(DriverMessage::HostChanged).await
    }

    /// Report a page visibility change.
    pub async fn visibility(&self, foreground: bool) -> ReconcileResult<()> {
        self.send(DriverMessage::Visibility { foreground }).await
    }

    /// Stop the driver.
    pub async fn shutdown(&self) -> ReconcileResult<()> {
        self.send(DriverMessage::Shutdown).await
    }

    /// The mode currently being enforced.
    #[must_use]
    pub fn mode(&self) -> ActiveMode {
        *self.mode.borrow()
    }

    async fn send(&self, msg: DriverMessage) -> ReconcileResult<()> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| ReconcileError::ChannelClosed)
    }
}

/// Owns one watched list end to end: document handle, sort engine, optional
/// visibility partition, the pure machine, and the timers.
pub struct ReconcileDriver {
    inner: Inner,
    rx: mpsc::Receiver<DriverMessage>,
}

struct Inner {
    doc: Arc<Mutex<Document>>,
    sorter: RowSorter,
    filter: Option<LabelFilter>,
    machine: Reconciler,
    config: ReconcilerConfig,
    deadlines: [Option<Instant>; TimerKind::COUNT],
    watched: Option<NodeId>,
    origin: Instant,
    mode_tx: watch::Sender<ActiveMode>,
}

impl ReconcileDriver {
    /// Builds a driver over a shared document. Nothing runs until
    /// [`ReconcileDriver::run`] is awaited (typically via `tokio::spawn`).
    #[must_use]
    pub fn new(
        doc: Arc<Mutex<Document>>,
        sorter: RowSorter,
        config: ReconcilerConfig,
    ) -> (Self, DriverClient) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (mode_tx, mode_rx) = watch::channel(ActiveMode::None);
        let machine = Reconciler::new(config.clone());
        let driver = Self {
            inner: Inner {
                doc,
                sorter,
                filter: None,
                machine,
                config,
                deadlines: [None; TimerKind::COUNT],
                watched: None,
                origin: Instant::now(),
                mode_tx,
            },
            rx,
        };
        let client = DriverClient { tx, mode: mode_rx };
        (driver, client)
    }

    /// Attaches a visibility partition, re-applied after every engine pass.
    #[must_use]
    pub fn with_filter(mut self, filter: LabelFilter) -> Self {
        self.inner.filter = Some(filter);
        self
    }

    /// Runs until shutdown (or until every client is dropped).
    pub async fn run(self) {
        let Self { mut inner, mut rx } = self;
        info!(id = %inner.machine.id(), "reconcile driver starting");

        if let Some(container) = inner.discover().await {
            inner.dispatch(Event::ContainerSeen {
                container: Some(container),
            });
        }

        let mut poll = tokio::time::interval(Duration::from_millis(inner.config.watch_poll_ms));
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let next = inner.next_deadline();
            tokio::select! {
                msg = rx.recv() => match msg {
                    None | Some(DriverMessage::Shutdown) => break,
                    Some(msg) => inner.on_message(msg),
                },
                _ = poll.tick() => inner.poll_container(),
                _ = sleep_until(next.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600))),
                    if next.is_some() => inner.fire_due_timers(),
            }
        }
        info!(id = %inner.machine.id(), "reconcile driver stopped");
    }
}

impl Inner {
    fn now(&self) -> Millis {
        Millis::from_raw(self.origin.elapsed().as_millis() as u64)
    }

    /// Bounded boot-time discovery: retry with exponential backoff until the
    /// host renders a list or the budget runs out, after which the feature
    /// stays inert until the identity poll finds one.
    async fn discover(&mut self) -> Option<NodeId> {
        let discovery = self.config.discovery.clone();
        let mut backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(discovery.initial_delay_ms))
            .with_max_delay(Duration::from_millis(discovery.max_delay_ms))
            .with_max_times(discovery.max_attempts)
            .build();
        loop {
            if let Some(container) = self.try_locate() {
                return Some(container);
            }
            match backoff.next() {
                Some(delay) => sleep(delay).await,
                None => {
                    debug!("discovery budget exhausted; staying inert until the list appears");
                    return None;
                }
            }
        }
    }

    fn try_locate(&mut self) -> Option<NodeId> {
        let now = self.now();
        let doc = self.doc.lock().expect("document lock poisoned");
        self.sorter.locator_mut().locate_container(&doc, now)
    }

    fn on_message(&mut self, msg: DriverMessage) {
        match msg {
            DriverMessage::User(action) => self.dispatch(Event::User(action)),
            DriverMessage::HostChanged => self.flush_mutations(),
            DriverMessage::Visibility { foreground } => {
                self.dispatch(Event::Visibility { foreground });
            }
            DriverMessage::Shutdown => {}
        }
    }

    fn poll_container(&mut self) {
        let container = self.try_locate();
        self.dispatch(Event::ContainerSeen { container });
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.iter().flatten().min().copied()
    }

    fn fire_due_timers(&mut self) {
        let now = Instant::now();
        for kind in [TimerKind::Debounce, TimerKind::Settle, TimerKind::Sweep] {
            if let Some(deadline) = self.deadlines[kind.index()]
                && deadline <= now
            {
                self.deadlines[kind.index()] = None;
                self.dispatch(Event::Timer(kind));
            }
        }
    }

    /// Drains the document's mutation journal and feeds changes under the
    /// watched container through the machine. The engine's own writes come
    /// back through here too — the machine ignores them while suppressed,
    /// which is the feedback-loop guard at work.
    fn flush_mutations(&mut self) {
        let relevant = {
            let mut doc = self.doc.lock().expect("document lock poisoned");
            let records = doc.take_mutations();
            match self.watched {
                Some(watched) => records
                    .iter()
                    .filter(|r| {
                        r.parent == watched || doc.ancestors(r.parent).contains(&watched)
                    })
                    .count(),
                None => 0,
            }
        };
        if relevant > 0
            && let Some(container) = self.watched
        {
            self.dispatch(Event::Mutations {
                container,
                records: relevant,
            });
        }
    }

    fn dispatch(&mut self, event: Event) {
        let now = self.now();
        let commands = self.machine.handle(event, now);
        for command in commands {
            self.execute(command, now);
        }
        let mode = self.machine.mode();
        self.mode_tx.send_if_modified(|current| {
            if *current == mode {
                false
            } else {
                *current = mode;
                true
            }
        });
    }

    fn execute(&mut self, command: Command, now: Millis) {
        match command {
            Command::Watch(container) => {
                self.watched = Some(container);
            }
            Command::Unwatch(container) => {
                if self.watched == Some(container) {
                    self.watched = None;
                }
            }
            Command::StartTimer { kind, at } => {
                self.deadlines[kind.index()] =
                    Some(self.origin + Duration::from_millis(at.as_raw()));
            }
            Command::CancelTimer(kind) => {
                self.deadlines[kind.index()] = None;
            }
            Command::ApplySort(direction) => {
                self.run_engine(|sorter, doc, filter, now| {
                    sorter.sort(doc, direction, now);
                    if let Some(filter) = filter {
                        sorter.apply_filter(doc, filter, now);
                    }
                });
            }
            Command::ApplyReset => {
                self.run_engine(|sorter, doc, filter, now| {
                    sorter.reset(doc, now);
                    if let Some(filter) = filter {
                        sorter.apply_filter(doc, filter, now);
                    }
                });
            }
            Command::CheckOrder(direction) => {
                let satisfied = {
                    let doc = self.doc.lock().expect("document lock poisoned");
                    self.sorter.is_ordered(&doc, direction, now)
                };
                self.dispatch(Event::OrderChecked { satisfied });
            }
        }
    }

    /// Runs one engine pass and immediately feeds the resulting journal
    /// back through the machine (where suppression discards it).
    fn run_engine(
        &mut self,
        pass: impl FnOnce(&mut RowSorter, &mut Document, Option<&LabelFilter>, Millis),
    ) {
        let now = self.now();
        {
            let mut doc = self.doc.lock().expect("document lock poisoned");
            pass(&mut self.sorter, &mut doc, self.filter.as_ref(), now);
        }
        self.flush_mutations();
    }
}
