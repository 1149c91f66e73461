//! Start and stop of the overlay service.
//!
//! State machine: `Stopped -> Starting -> Attached -> Stopping -> Stopped`.
//! A failed start goes straight back to `Stopped`. Starting while attached
//! detaches first and re-attaches with the current configuration.
//!
//! Only a start triggered by a redelivery (the platform restarting the service
//! after the process died) asks the host to re-provision the render engine;
//! a fresh start that finds the engine missing or broken just fails.

use overlay_engine::{Engine, WindowHandle, resolve_start};
use overlay_protocol::{MsgToHost, ipc::HostTx};
use overlay_winops::RenderHost;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    notification::ForegroundNotice,
    wake_lock::WakeLock,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Starting,
    Attached,
    Stopping,
}

/// What a start request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartAction {
    /// Attach (or re-attach) the overlay.
    #[default]
    Attach,
    /// Remove the overlay window and stop.
    CloseWindow,
    /// Platform shutdown: stop.
    Shutdown,
}

/// One start request for the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StartRequest {
    pub action: StartAction,
    /// Start X in dp; `None` or the unset sentinel starts at the left edge.
    pub x: Option<i32>,
    /// Start Y in dp; `None` or the unset sentinel tucks under the status bar.
    pub y: Option<i32>,
    /// The platform redelivered this request after a restart.
    pub redelivery: bool,
}

impl StartRequest {
    pub fn attach(x: Option<i32>, y: Option<i32>) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn redelivered(mut self) -> Self {
        self.redelivery = true;
        self
    }
}

/// Result of a successful start request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartOutcome {
    Attached(WindowHandle),
    /// The request stopped the service instead.
    Stopped,
}

/// Owns the running state of the overlay service.
pub struct Lifecycle {
    engine: Engine,
    wake_lock: WakeLock,
    notice: ForegroundNotice,
    host_tx: HostTx,
    state: Mutex<LifecycleState>,
    /// Serializes start and stop.
    transition: Mutex<()>,
}

impl Lifecycle {
    pub fn new(
        engine: Engine,
        wake_lock: WakeLock,
        notice: ForegroundNotice,
        host_tx: HostTx,
    ) -> Self {
        Self {
            engine,
            wake_lock,
            notice,
            host_tx,
            state: Mutex::new(LifecycleState::Stopped),
            transition: Mutex::new(()),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    pub fn is_active(&self) -> bool {
        self.state() == LifecycleState::Attached
    }

    pub fn wake_lock(&self) -> &WakeLock {
        &self.wake_lock
    }

    /// Handle one start request. `None` models a start with no payload, which
    /// stops the service.
    pub fn on_start(&self, req: Option<StartRequest>) -> Result<StartOutcome> {
        let _guard = self.transition.lock();
        let req = match req {
            Some(r) if r.action != StartAction::Shutdown => r,
            _ => {
                debug!("start without payload or shutdown action, stopping");
                self.stop_locked();
                return Ok(StartOutcome::Stopped);
            }
        };
        self.set_state(LifecycleState::Starting);
        match self.start_locked(req) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                warn!(%err, redelivery = req.redelivery, "overlay start failed");
                self.stop_locked();
                if req.redelivery {
                    self.broadcast_restart();
                }
                Err(err)
            }
        }
    }

    /// Stop the service. Safe to call in any state.
    pub fn stop(&self) {
        let _guard = self.transition.lock();
        self.stop_locked();
    }

    fn start_locked(&self, req: StartRequest) -> Result<StartOutcome> {
        validate_engine(self.engine.surface().render_host().as_ref())?;

        if req.action == StartAction::CloseWindow {
            debug!("close-window start request");
            self.stop_locked();
            return Ok(StartOutcome::Stopped);
        }

        if self.engine.detach() {
            debug!("detached previous overlay before re-attach");
        }

        if let Err(err) = self.engine.surface().render_host().resume() {
            if req.redelivery {
                return Err(Error::ResumeFailed(err));
            }
            warn!(?err, "error resuming render engine");
        }

        let display = self.engine.surface().display_metrics();
        let start = resolve_start(req.x, req.y, &display);
        let handle = self.engine.attach(start)?;

        self.wake_lock.acquire();
        self.notice.post(&self.engine.config().snapshot());
        self.set_state(LifecycleState::Attached);
        info!(x = start.x, y = start.y, "overlay service started");
        Ok(StartOutcome::Attached(handle))
    }

    /// Each step runs regardless of whether the previous one failed.
    fn stop_locked(&self) {
        self.set_state(LifecycleState::Stopping);
        self.wake_lock.release();
        if self.engine.detach() {
            debug!("overlay detached");
        }
        self.notice.cancel();
        self.set_state(LifecycleState::Stopped);
    }

    fn broadcast_restart(&self) {
        info!("requesting render engine restart");
        if self.host_tx.send(MsgToHost::RestartRequired).is_err() {
            debug!("no host listening for restart broadcast");
        }
    }

    fn set_state(&self, next: LifecycleState) {
        let mut state = self.state.lock();
        if *state != next {
            debug!(from = ?*state, to = ?next, "lifecycle");
            *state = next;
        }
    }
}

/// The engine must be reachable and both of its subsystems must respond.
fn validate_engine(host: &dyn RenderHost) -> Result<()> {
    if !host.is_reachable() {
        return Err(Error::EngineUnavailable);
    }
    if !host.is_valid() {
        return Err(Error::EngineInvalid);
    }
    Ok(())
}
