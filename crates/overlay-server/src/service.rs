use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use config::{
    Alignment, DIMENSION_SENTINEL, InteractionFlag, NotificationVisibility, OverlayConfig,
    OverlaySize, Settings, SnapPolicy,
};
use overlay_engine::{Engine, EngineOptions, PointerEvent};
use overlay_protocol::{
    BlurReq, ClickThroughReq, MethodCall, MethodError, MethodReply, MoveReq, MsgToHost,
    OverlayMethod, Position, ResizeReq, ShowReq, StartPosition, UpdateFlagReq,
    ipc::{HostTx, codec},
};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::{
    error::{Error, Result},
    lifecycle::{Lifecycle, LifecycleState, StartOutcome, StartRequest},
    notification::ForegroundNotice,
    platform::{ACCESSIBILITY_NODE_KEY, Platform, RESTART_ON_BOOT_KEY},
    wake_lock::{self, WakeLock},
};

/// Flag name applied when `show` names none.
const DEFAULT_FLAG: &str = "flagNotFocusable";

/// Build the overlay configuration for a `show` request.
pub fn overlay_config_from_show(req: &ShowReq) -> OverlayConfig {
    let flag = req.flag.as_deref().unwrap_or(DEFAULT_FLAG);
    OverlayConfig {
        size: OverlaySize {
            width: req.width.unwrap_or(DIMENSION_SENTINEL),
            height: req.height.unwrap_or(DIMENSION_SENTINEL),
        },
        alignment: Alignment::from_name(req.alignment.as_deref().unwrap_or("center")),
        interaction: InteractionFlag::from_name(flag).unwrap_or_else(|| {
            debug!(flag, "unknown flag at show, using default");
            InteractionFlag::default()
        }),
        drag_enabled: req.enable_drag,
        snap: req
            .position_gravity
            .as_deref()
            .map(SnapPolicy::from_name)
            .unwrap_or_default(),
        notification_visibility: req
            .notification_visibility
            .as_deref()
            .map(NotificationVisibility::from_name)
            .unwrap_or_default(),
        title: req.overlay_title.clone(),
        body: req.overlay_content.clone().unwrap_or_default(),
    }
}

/// The overlay service: one engine, its lifecycle, and the platform
/// collaborators, behind typed operations and a method-call dispatcher.
///
/// Methods are synchronous and must be called from the thread that owns
/// window mutations (see [`crate::Server`]).
pub struct OverlayService {
    engine: Engine,
    lifecycle: Lifecycle,
    platform: Platform,
    settings: Settings,
    host_tx: HostTx,
    /// Start position of the last `show`, reused on boot restart.
    last_start: Mutex<StartPosition>,
    shutdown: AtomicBool,
}

impl OverlayService {
    /// Build a service. Snap animation ticks are spawned on `rt`.
    pub fn new(
        platform: Platform,
        settings: Settings,
        host_tx: HostTx,
        rt: tokio::runtime::Handle,
    ) -> Self {
        let engine = Engine::new(
            platform.windows.clone(),
            platform.render.clone(),
            rt,
            EngineOptions::from_settings(&settings),
        );
        let lifecycle = Lifecycle::new(
            engine.clone(),
            WakeLock::new(platform.power.clone(), settings.wake_lock_tag.clone()),
            ForegroundNotice::new(platform.notifications.clone()),
            host_tx.clone(),
        );
        Self {
            engine,
            lifecycle,
            platform,
            settings,
            host_tx,
            last_start: Mutex::new(StartPosition::default()),
            shutdown: AtomicBool::new(false),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Configure and attach the overlay. Requires the overlay permission.
    pub fn show(&self, req: &ShowReq) -> Result<()> {
        if !self.platform.permissions.overlay_ok() {
            warn!("show refused: overlay permission is not enabled");
            return Err(Error::PermissionDenied);
        }
        let config = overlay_config_from_show(req);
        debug!(?config, "show");
        self.engine.configure(config);
        let start = req.start_position.unwrap_or_default();
        *self.last_start.lock() = start;
        self.lifecycle
            .on_start(Some(StartRequest::attach(start.x, start.y)))?;
        Ok(())
    }

    /// Stop the service. Returns whether it was running.
    pub fn close(&self) -> bool {
        if self.lifecycle.state() == LifecycleState::Stopped {
            debug!("close: overlay not running");
            return false;
        }
        self.lifecycle.stop();
        true
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub fn move_to(&self, x: i32, y: i32) -> Result<bool> {
        self.interactive(self.engine.move_position(x, y))
    }

    pub fn position(&self) -> Option<Position> {
        self.engine
            .get_position()
            .map(|p| Position { x: p.x, y: p.y })
    }

    pub fn resize(&self, width: i32, height: i32, drag_enabled: bool) -> Result<bool> {
        self.interactive(self.engine.resize(width, height, drag_enabled))
    }

    pub fn update_flag(&self, name: &str) -> Result<bool> {
        self.interactive(self.engine.update_flag(name))
    }

    pub fn set_click_through(&self, enable: bool) -> Result<bool> {
        self.interactive(self.engine.set_click_through(enable))
    }

    pub fn set_blur(&self, radius: i32) -> Result<bool> {
        self.interactive(self.engine.set_blur(radius))
    }

    pub fn request_overlay_permission(&self) -> bool {
        self.platform.permissions.request_overlay()
    }

    pub fn check_overlay_permission(&self) -> bool {
        self.platform.permissions.overlay_ok()
    }

    pub fn request_accessibility_permission(&self) {
        self.platform.permissions.request_accessibility();
    }

    pub fn check_accessibility_permission(&self) -> bool {
        self.platform.permissions.accessibility_ok()
    }

    /// Briefly pulse a wake lock.
    pub fn turn_screen_off(&self) {
        wake_lock::pulse(
            self.platform.power.as_ref(),
            &self.settings.wake_lock_tag,
            Duration::from_millis(self.settings.screen_off_pulse_ms),
        );
    }

    /// Feed one pointer event from the overlay content. Never consumes it.
    pub fn handle_pointer(&self, event: PointerEvent) -> bool {
        self.engine.handle_pointer(event)
    }

    /// Device boot finished. When restart-on-boot is enabled the overlay is
    /// restarted with the last configuration as a redelivered start.
    /// Returns whether the overlay is attached afterwards.
    pub fn on_boot_completed(&self) -> Result<bool> {
        let enabled = self
            .platform
            .prefs
            .get_bool(RESTART_ON_BOOT_KEY)
            .unwrap_or(self.settings.restart_on_boot);
        if !enabled {
            debug!("boot completed, restart on boot disabled");
            return Ok(false);
        }
        info!("boot completed, restarting overlay");
        let start = *self.last_start.lock();
        let outcome = self
            .lifecycle
            .on_start(Some(StartRequest::attach(start.x, start.y).redelivered()))?;
        Ok(matches!(outcome, StartOutcome::Attached(_)))
    }

    /// Relay the cached accessibility payload to the host.
    pub fn on_accessibility_event(&self) {
        let payload = self
            .platform
            .prefs
            .get_string(ACCESSIBILITY_NODE_KEY)
            .unwrap_or_default();
        if self
            .host_tx
            .send(MsgToHost::AccessibilityEvent { payload })
            .is_err()
        {
            debug!("no host listening for accessibility events");
        }
    }

    /// Stop the overlay and refuse further calls.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("overlay service shutting down");
        self.lifecycle.stop();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// A failed layout update has already torn the window down; stop the
    /// service so nothing keeps running without a window.
    fn interactive(&self, r: overlay_engine::Result<bool>) -> Result<bool> {
        match r {
            Ok(applied) => Ok(applied),
            Err(err) => {
                error!(%err, "overlay mutation failed, stopping");
                self.lifecycle.stop();
                Err(err.into())
            }
        }
    }

    /// Execute one control-channel call.
    pub fn dispatch(&self, call: &MethodCall) -> std::result::Result<MethodReply, MethodError> {
        self.dispatch_inner(call).map_err(|e| {
            debug!(method = %call.method, code = %e.code(), "call failed");
            e.to_method_error()
        })
    }

    fn dispatch_inner(&self, call: &MethodCall) -> Result<MethodReply> {
        if self.is_shutting_down() {
            return Err(Error::ShuttingDown);
        }
        debug!(method = %call.method, bytes = call.payload.len(), "handling call");
        let Some(method) = OverlayMethod::try_from_str(&call.method) else {
            return Err(Error::MethodNotFound(call.method.clone()));
        };
        let reply = match method {
            OverlayMethod::Show => {
                // A bare show uses every default.
                let req: ShowReq = if call.payload.is_empty() {
                    ShowReq::default()
                } else {
                    args(call)?
                };
                self.show(&req)?;
                MethodReply::Unit
            }
            OverlayMethod::Close => MethodReply::Bool(self.close()),
            OverlayMethod::IsActive => MethodReply::Bool(self.is_active()),
            OverlayMethod::Move => {
                let req: MoveReq = args(call)?;
                MethodReply::Bool(self.move_to(req.x, req.y)?)
            }
            OverlayMethod::GetPosition => MethodReply::Position(self.position()),
            OverlayMethod::Resize => {
                let req: ResizeReq = args(call)?;
                MethodReply::Bool(self.resize(req.width, req.height, req.enable_drag)?)
            }
            OverlayMethod::UpdateFlag => {
                let req: UpdateFlagReq = args(call)?;
                MethodReply::Bool(self.update_flag(&req.flag)?)
            }
            OverlayMethod::SetClickThrough => {
                let req: ClickThroughReq = args(call)?;
                MethodReply::Bool(self.set_click_through(req.enable)?)
            }
            OverlayMethod::SetBlur => {
                let req: BlurReq = args(call)?;
                MethodReply::Bool(self.set_blur(req.blur_radius)?)
            }
            OverlayMethod::RequestOverlayPermission => {
                MethodReply::Bool(self.request_overlay_permission())
            }
            OverlayMethod::CheckOverlayPermission => {
                MethodReply::Bool(self.check_overlay_permission())
            }
            OverlayMethod::RequestAccessibilityPermission => {
                self.request_accessibility_permission();
                MethodReply::Unit
            }
            OverlayMethod::CheckAccessibilityPermission => {
                MethodReply::Bool(self.check_accessibility_permission())
            }
            OverlayMethod::TurnScreenOff => {
                self.turn_screen_off();
                MethodReply::Unit
            }
        };
        Ok(reply)
    }
}

fn args<T: DeserializeOwned>(call: &MethodCall) -> Result<T> {
    codec::decode_args(call).map_err(|e| Error::InvalidArgs {
        method: call.method.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_defaults() {
        let cfg = overlay_config_from_show(&ShowReq::default());
        assert_eq!(cfg.size, OverlaySize::default());
        assert_eq!(cfg.alignment, Alignment::Center);
        assert_eq!(cfg.interaction, InteractionFlag::FullyInteractive);
        assert_eq!(cfg.snap, SnapPolicy::None);
        assert_eq!(cfg.notification_visibility, NotificationVisibility::Private);
        assert_eq!(cfg.title, None);
        assert_eq!(cfg.body, "");
        assert!(!cfg.drag_enabled);
    }

    #[test]
    fn show_fields_map_by_name() {
        let req = ShowReq {
            width: Some(200),
            height: Some(100),
            alignment: Some("bottomRight".into()),
            flag: Some("clickThrough".into()),
            overlay_title: Some("t".into()),
            overlay_content: Some("b".into()),
            notification_visibility: Some("visibilityPublic".into()),
            enable_drag: true,
            position_gravity: Some("auto".into()),
            start_position: None,
        };
        let cfg = overlay_config_from_show(&req);
        assert_eq!(
            cfg.size,
            OverlaySize {
                width: 200,
                height: 100
            }
        );
        assert_eq!(cfg.alignment, Alignment::BottomRight);
        assert_eq!(cfg.interaction, InteractionFlag::ClickThroughAndUnfocusable);
        assert_eq!(cfg.snap, SnapPolicy::Auto);
        assert_eq!(cfg.notification_visibility, NotificationVisibility::Public);
        assert!(cfg.drag_enabled);
    }

    #[test]
    fn unknown_names_fall_back() {
        let req = ShowReq {
            alignment: Some("middle".into()),
            flag: Some("hover".into()),
            position_gravity: Some("top".into()),
            ..ShowReq::default()
        };
        let cfg = overlay_config_from_show(&req);
        assert_eq!(cfg.alignment, Alignment::Center);
        assert_eq!(cfg.interaction, InteractionFlag::FullyInteractive);
        assert_eq!(cfg.snap, SnapPolicy::None);
    }
}
