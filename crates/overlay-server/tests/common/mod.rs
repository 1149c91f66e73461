//! Shared fixture for service integration tests.
#![allow(dead_code)]

use config::Settings;
use overlay_protocol::{
    MethodCall, MethodError, MethodReply, OverlayMethod, ShowReq, StartPosition,
    ipc::{HostRx, host_channel},
};
use overlay_server::{OverlayService, headless::HeadlessPlatform};
use overlay_winops::{DisplayMetrics, Frame};
use tokio::runtime::{Builder, Runtime};

pub const SCREEN_W: i32 = 1080;
pub const SCREEN_H: i32 = 1920;
pub const STATUS_BAR: i32 = 25;
pub const WAKE_TAG: &str = "overlay_window:WakeLock";

pub fn metrics() -> DisplayMetrics {
    DisplayMetrics {
        width_px: SCREEN_W,
        height_px: SCREEN_H,
        density: 1.0,
        status_bar_px: STATUS_BAR,
    }
}

pub struct Fixture {
    pub rt: Runtime,
    pub hp: HeadlessPlatform,
    pub service: OverlayService,
    pub host_rx: HostRx,
}

pub fn fixture() -> Fixture {
    fixture_on(HeadlessPlatform::new(Some(metrics())))
}

pub fn fixture_on(hp: HeadlessPlatform) -> Fixture {
    let rt = Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .unwrap();
    let (host_tx, host_rx) = host_channel();
    let service = OverlayService::new(
        hp.platform(),
        Settings::default(),
        host_tx,
        rt.handle().clone(),
    );
    Fixture {
        rt,
        hp,
        service,
        host_rx,
    }
}

/// 200x100 overlay at `alignment` with drag on.
pub fn show_req(alignment: &str, snap: &str) -> ShowReq {
    ShowReq {
        width: Some(200),
        height: Some(100),
        alignment: Some(alignment.into()),
        enable_drag: true,
        position_gravity: Some(snap.into()),
        ..ShowReq::default()
    }
}

pub fn at(mut req: ShowReq, x: i32, y: i32) -> ShowReq {
    req.start_position = Some(StartPosition {
        x: Some(x),
        y: Some(y),
    });
    req
}

pub fn call<T: serde::Serialize>(method: OverlayMethod, req: &T) -> MethodCall {
    MethodCall::new(method, req).unwrap()
}

pub fn dispatch(f: &Fixture, c: &MethodCall) -> Result<MethodReply, MethodError> {
    f.service.dispatch(c)
}

pub fn bare(f: &Fixture, method: OverlayMethod) -> Result<MethodReply, MethodError> {
    f.service.dispatch(&MethodCall::bare(method))
}

pub fn frame(f: &Fixture) -> Frame {
    let token = f.hp.windows.live_token().unwrap();
    f.hp.windows.frame(token).unwrap()
}
