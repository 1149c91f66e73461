//! Overlay Engine
//!
//! Core state machine for one overlay window:
//! - [`Surface`]: the attached window slot, re-checked for liveness on every use
//! - [`DragController`]: pointer events to position deltas
//! - [`SnapAnimator`]: post-release easing toward an edge
//! - position queries and mutators on [`Engine`]
//!
//! [`Engine`] ties these together. Window mutations happen on the thread that
//! calls into the engine; snap ticks run on a tokio runtime and come back as
//! [`MainOp`]s that the owner applies via [`Engine::apply_main_op`].
use std::{sync::Arc, time::Duration};

use config::{ConfigCell, OverlayConfig, Settings, SnapPolicy};
use crossbeam_channel::Receiver;
use overlay_winops::{
    DisplayMetrics, LayoutParamsBuilder, MainOp, Point, RenderHost, WindowManager,
    main_op_channel,
};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

mod drag;
mod error;
mod position;
mod snap;
mod surface;

pub use drag::{DragAction, DragController, DragSession, PointerEvent};
pub use error::{Error, Result};
pub use position::{DpPosition, resolve_start};
pub use snap::{SnapAnimator, SnapTask};
pub use surface::{Surface, WindowHandle};

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    pub snap_interval: Duration,
    pub snap_converge_px: i32,
    pub drag_threshold_px2: f32,
    /// Display metrics used when the platform reports none.
    pub fallback_display: DisplayMetrics,
}

impl EngineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            snap_interval: Duration::from_millis(settings.snap_interval_ms),
            snap_converge_px: settings.snap_converge_px,
            drag_threshold_px2: settings.drag_threshold_px2,
            fallback_display: DisplayMetrics::fallback(
                &settings.fallback_display,
                settings.status_bar_height_dp,
            ),
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// One overlay window: configuration, attached surface, drag and snap.
///
/// Cloning yields another handle to the same engine.
#[derive(Clone)]
pub struct Engine {
    config: ConfigCell,
    surface: Surface,
    drag: Arc<Mutex<DragController>>,
    snap: SnapAnimator,
    main_rx: Receiver<MainOp>,
    opts: EngineOptions,
}

impl Engine {
    /// Create an engine. Snap ticks are spawned on `rt`.
    pub fn new(
        wm: Arc<dyn WindowManager>,
        host: Arc<dyn RenderHost>,
        rt: tokio::runtime::Handle,
        opts: EngineOptions,
    ) -> Self {
        let (ops_tx, main_rx) = main_op_channel();
        Self {
            config: ConfigCell::default(),
            surface: Surface::new(wm, host, opts.fallback_display),
            drag: Arc::new(Mutex::new(DragController::new(opts.drag_threshold_px2))),
            snap: SnapAnimator::new(rt, ops_tx, opts.snap_interval),
            main_rx,
            opts,
        }
    }

    pub fn config(&self) -> &ConfigCell {
        &self.config
    }

    /// Replace the configuration wholesale.
    pub fn configure(&self, config: OverlayConfig) {
        self.config.replace(config);
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn snap_animator(&self) -> &SnapAnimator {
        &self.snap
    }

    pub fn options(&self) -> &EngineOptions {
        &self.opts
    }

    /// Attach the overlay using the current configuration, offset to `start`
    /// (px). Any existing window is torn down first.
    pub fn attach(&self, start: Point) -> Result<WindowHandle> {
        self.snap.cancel();
        let display = self.surface.display_metrics();
        let config = self.config.snapshot();
        let attrs = LayoutParamsBuilder::build(&config, &display).with_position(start.x, start.y);
        let handle = self.surface.attach(attrs, display)?;
        debug!(
            x = start.x,
            y = start.y,
            alignment = config.alignment.as_str(),
            "overlay attached"
        );
        Ok(handle)
    }

    /// Cancel any animation and detach. Returns whether a window was held.
    pub fn detach(&self) -> bool {
        self.snap.cancel_sync();
        self.surface.detach()
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_live()
    }

    /// Current touch sequence, if one is in progress.
    pub fn drag_session(&self) -> Option<DragSession> {
        self.drag.lock().session()
    }

    /// Feed one pointer event. The event is never consumed, so the overlay
    /// content still sees it; the return value is always `false`.
    pub fn handle_pointer(&self, event: PointerEvent) -> bool {
        let config = self.config.snapshot();
        if !config.drag_enabled || !self.surface.is_live() {
            return false;
        }
        let action = self.drag.lock().handle(event, config.alignment);
        match action {
            DragAction::None => {}
            DragAction::Began => self.snap.cancel(),
            DragAction::MoveBy { dx, dy } => {
                let moved = self.surface.mutate(|a| {
                    a.with_position(a.x.saturating_add(dx), a.y.saturating_add(dy))
                });
                if let Err(err) = moved {
                    warn!(?err, "drag step dropped");
                }
            }
            DragAction::Released => self.on_release(config.snap),
        }
        false
    }

    fn on_release(&self, policy: SnapPolicy) {
        let Some(handle) = self.surface.handle() else {
            return;
        };
        let release_y = handle.attrs.y;
        if policy == SnapPolicy::None {
            return;
        }
        let width = self
            .surface
            .measured_size()
            .map(|s| s.width)
            .unwrap_or(handle.attrs.width.max(0));
        let from = Point {
            x: handle.attrs.x,
            y: handle.attrs.y,
        };
        let task = SnapTask::new(
            policy,
            from,
            release_y,
            width,
            handle.display.width_px,
            self.opts.snap_converge_px,
        );
        let generation = self.snap.start(task, from);
        debug!(generation, dest = ?task.dest, "snap started");
    }

    /// Receiver for queued UI-thread ops, for use in a select loop.
    pub fn main_ops_receiver(&self) -> &Receiver<MainOp> {
        &self.main_rx
    }

    /// Apply every queued op. Returns how many were applied (not dropped).
    pub fn drain_main_ops(&self) -> usize {
        let mut applied = 0;
        while let Ok(op) = self.main_rx.try_recv() {
            if self.apply_main_op(op) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one op on the calling (UI) thread. Stale or undeliverable ops
    /// are dropped and reported as `false`.
    pub fn apply_main_op(&self, op: MainOp) -> bool {
        match op {
            MainOp::SnapStep {
                generation,
                to,
                done,
            } => {
                if !self.snap.is_current(generation) {
                    trace!(generation, "stale snap step dropped");
                    return false;
                }
                match self.surface.mutate(|a| a.with_position(to.x, to.y)) {
                    Ok(Some(_)) => {
                        if done {
                            self.snap.finish(generation);
                        }
                        true
                    }
                    Ok(None) => {
                        trace!(generation, "snap step: overlay not attached");
                        self.snap.cancel();
                        false
                    }
                    Err(err) => {
                        warn!(?err, generation, "snap step failed");
                        self.snap.cancel();
                        false
                    }
                }
            }
        }
    }
}
