//! The reconciler state machine.

use crate::command::{Command, TimerKind};
use crate::event::{Event, UserAction};
use rowkeeper_dom::NodeId;
use rowkeeper_types::{ActiveMode, InstanceId, Millis, ReconcilerConfig, SortDirection};
use tracing::{debug, trace};

/// Pure state machine deciding *when* the engine runs.
///
/// One instance per watched list. All inputs arrive through
/// [`Reconciler::handle`] with an explicit clock reading; the outputs are
/// instructions for the driver. The machine owns the three pieces of state
/// the whole design revolves around:
///
/// - **Active mode** — which ordering (if any) is being enforced.
/// - **Suppression** — raised before any engine write is commanded, lowered
///   only when the settle timer fires, so the engine's own mutations are
///   observed but never acted on.
/// - **Adaptive debounce** — the delay before re-applying after a host
///   mutation doubles while mutations arrive in bursts (up to a ceiling, so
///   convergence is guaranteed) and decays to base after a quiet period.
#[derive(Debug)]
pub struct Reconciler {
    id: InstanceId,
    config: ReconcilerConfig,
    mode: ActiveMode,
    watched: Option<NodeId>,
    suppressed: bool,
    debounce_delay_ms: u64,
    pending_resort: bool,
    last_mutation: Option<Millis>,
    sweep_running: bool,
}

impl Reconciler {
    /// Creates a machine with everything idle.
    #[must_use]
    pub fn new(config: ReconcilerConfig) -> Self {
        let debounce_delay_ms = config.debounce_base_ms;
        Self {
            id: InstanceId::new(),
            config,
            mode: ActiveMode::None,
            watched: None,
            suppressed: false,
            debounce_delay_ms,
            pending_resort: false,
            last_mutation: None,
            sweep_running: false,
        }
    }

    /// This instance's identifier.
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The mode currently being enforced.
    #[must_use]
    pub fn mode(&self) -> ActiveMode {
        self.mode
    }

    /// True while the machine is masking the engine's own writes.
    #[must_use]
    pub fn suppressed(&self) -> bool {
        self.suppressed
    }

    /// The container currently watched, if any.
    #[must_use]
    pub fn watched(&self) -> Option<NodeId> {
        self.watched
    }

    /// The current adaptive debounce delay (diagnostics and tests).
    #[must_use]
    pub fn debounce_delay_ms(&self) -> u64 {
        self.debounce_delay_ms
    }

    /// Feeds one event through the machine.
    pub fn handle(&mut self, event: Event, now: Millis) -> Vec<Command> {
        match event {
            Event::User(action) => self.on_user(action, now),
            Event::Mutations { container, records } => self.on_mutations(container, records, now),
            Event::Timer(kind) => self.on_timer(kind, now),
            Event::Visibility { foreground } => self.on_visibility(foreground),
            Event::ContainerSeen { container } => self.on_container_seen(container, now),
            Event::OrderChecked { satisfied } => self.on_order_checked(satisfied, now),
        }
    }

    // ── Event handlers ───────────────────────────────────────────

    fn on_user(&mut self, action: UserAction, now: Millis) -> Vec<Command> {
        match action {
            UserAction::Sort(direction) => {
                debug!(id = %self.id, %direction, "user sort; mode enforced");
                self.mode = direction.into();
                let mut cmds = self.cancel_pending_resort();
                cmds.extend(self.arm_sweep(now));
                cmds.extend(self.apply(direction, now));
                cmds
            }
            UserAction::Reset => {
                debug!(id = %self.id, "user reset; enforcement off");
                self.mode = ActiveMode::None;
                let mut cmds = self.cancel_pending_resort();
                cmds.extend(self.disarm_sweep());
                self.suppressed = true;
                cmds.push(Command::ApplyReset);
                cmds.push(Command::StartTimer {
                    kind: TimerKind::Settle,
                    at: now.plus(self.config.settle_delay_ms),
                });
                cmds
            }
            UserAction::ToggleAuto => {
                if self.mode.is_active() {
                    debug!(id = %self.id, "auto toggled off");
                    self.mode = ActiveMode::None;
                    let mut cmds = self.cancel_pending_resort();
                    cmds.extend(self.disarm_sweep());
                    cmds
                } else {
                    self.on_user(UserAction::Sort(SortDirection::Ascending), now)
                }
            }
        }
    }

    fn on_mutations(&mut self, container: NodeId, records: usize, now: Millis) -> Vec<Command> {
        if self.suppressed {
            trace!(id = %self.id, records, "own writes settling; mutation batch ignored");
            return Vec::new();
        }
        if self.watched != Some(container) {
            return Vec::new();
        }
        if !self.mode.is_active() {
            return Vec::new();
        }

        if let Some(last) = self.last_mutation {
            let gap = now.since(last);
            if gap <= self.config.burst_window_ms {
                self.debounce_delay_ms =
                    (self.debounce_delay_ms * 2).min(self.config.debounce_ceiling_ms);
            } else if gap >= self.config.quiet_after_ms {
                self.debounce_delay_ms = self.config.debounce_base_ms;
            }
        }
        self.last_mutation = Some(now);
        self.pending_resort = true;
        debug!(
            id = %self.id,
            records,
            delay_ms = self.debounce_delay_ms,
            "host mutations; re-sort scheduled"
        );
        vec![Command::StartTimer {
            kind: TimerKind::Debounce,
            at: now.plus(self.debounce_delay_ms),
        }]
    }

    fn on_timer(&mut self, kind: TimerKind, now: Millis) -> Vec<Command> {
        match kind {
            TimerKind::Debounce => {
                self.pending_resort = false;
                let Some(direction) = self.mode.direction() else {
                    return Vec::new();
                };
                if self.suppressed {
                    // The engine is still settling; try again just after.
                    self.pending_resort = true;
                    return vec![Command::StartTimer {
                        kind: TimerKind::Debounce,
                        at: now.plus(self.config.settle_delay_ms),
                    }];
                }
                self.apply(direction, now)
            }
            TimerKind::Settle => {
                self.suppressed = false;
                Vec::new()
            }
            TimerKind::Sweep => {
                if !self.sweep_running {
                    return Vec::new();
                }
                let mut cmds = vec![Command::StartTimer {
                    kind: TimerKind::Sweep,
                    at: now.plus(self.config.sweep_interval_ms),
                }];
                if let Some(direction) = self.mode.direction()
                    && !self.suppressed
                {
                    cmds.push(Command::CheckOrder(direction));
                }
                cmds
            }
        }
    }

    fn on_visibility(&mut self, foreground: bool) -> Vec<Command> {
        if !foreground {
            return Vec::new();
        }
        // The host may have suspended its rendering cycle while
        // backgrounded; verify the order survived.
        match self.mode.direction() {
            Some(direction) if !self.suppressed => vec![Command::CheckOrder(direction)],
            _ => Vec::new(),
        }
    }

    fn on_order_checked(&mut self, satisfied: bool, now: Millis) -> Vec<Command> {
        if satisfied {
            return Vec::new();
        }
        match self.mode.direction() {
            Some(direction) if !self.suppressed => {
                debug!(id = %self.id, %direction, "order drifted; forcing re-sort");
                self.apply(direction, now)
            }
            _ => Vec::new(),
        }
    }

    fn on_container_seen(&mut self, container: Option<NodeId>, now: Millis) -> Vec<Command> {
        match (self.watched, container) {
            (Some(current), Some(seen)) if current == seen => Vec::new(),
            (old, Some(seen)) => {
                debug!(id = %self.id, container = %seen, "watching new container instance");
                let mut cmds = self.cancel_pending_resort();
                if let Some(old) = old {
                    cmds.push(Command::Unwatch(old));
                }
                cmds.push(Command::Watch(seen));
                self.watched = Some(seen);
                // Fresh container, fresh burst history.
                self.debounce_delay_ms = self.config.debounce_base_ms;
                self.last_mutation = None;
                if self.mode.is_active() {
                    // Re-impose the mode once the replacement settles.
                    self.pending_resort = true;
                    cmds.push(Command::StartTimer {
                        kind: TimerKind::Debounce,
                        at: now.plus(self.config.settle_delay_ms),
                    });
                }
                cmds
            }
            (Some(old), None) => {
                debug!(id = %self.id, container = %old, "watched container vanished");
                self.watched = None;
                let mut cmds = self.cancel_pending_resort();
                cmds.push(Command::Unwatch(old));
                cmds
            }
            (None, None) => Vec::new(),
        }
    }

    // ── Helpers ──────────────────────────────────────────────────

    /// Raises suppression and commands one engine pass. The flag goes up
    /// *before* the command is emitted (and therefore before any
    /// reinsertion), and comes down only when the settle timer fires.
    fn apply(&mut self, direction: SortDirection, now: Millis) -> Vec<Command> {
        self.suppressed = true;
        vec![
            Command::ApplySort(direction),
            Command::StartTimer {
                kind: TimerKind::Settle,
                at: now.plus(self.config.settle_delay_ms),
            },
        ]
    }

    fn cancel_pending_resort(&mut self) -> Vec<Command> {
        if self.pending_resort {
            self.pending_resort = false;
            vec![Command::CancelTimer(TimerKind::Debounce)]
        } else {
            Vec::new()
        }
    }

    fn arm_sweep(&mut self, now: Millis) -> Vec<Command> {
        if self.sweep_running {
            return Vec::new();
        }
        self.sweep_running = true;
        vec![Command::StartTimer {
            kind: TimerKind::Sweep,
            at: now.plus(self.config.sweep_interval_ms),
        }]
    }

    fn disarm_sweep(&mut self) -> Vec<Command> {
        if !self.sweep_running {
            return Vec::new();
        }
        self.sweep_running = false;
        vec![Command::CancelTimer(TimerKind::Sweep)]
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcilerConfig::default())
    }
}
