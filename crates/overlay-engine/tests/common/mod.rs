//! Shared fixture for engine integration tests.
#![allow(dead_code)]

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use config::{Alignment, OverlayConfig, OverlaySize, SnapPolicy};
use overlay_engine::{Engine, EngineOptions};
use overlay_winops::{
    DisplayMetrics, MainOp, Point,
    headless::{HeadlessRenderHost, HeadlessWindowManager},
};
use tokio::runtime::{Builder, Runtime};

pub const SCREEN_W: i32 = 1080;
pub const SCREEN_H: i32 = 1920;

pub fn metrics() -> DisplayMetrics {
    DisplayMetrics {
        width_px: SCREEN_W,
        height_px: SCREEN_H,
        density: 1.0,
        status_bar_px: 25,
    }
}

pub struct Fixture {
    pub rt: Runtime,
    pub wm: HeadlessWindowManager,
    pub host: HeadlessRenderHost,
    pub engine: Engine,
}

pub fn draggable(snap: SnapPolicy) -> OverlayConfig {
    OverlayConfig {
        size: OverlaySize {
            width: 200,
            height: 100,
        },
        alignment: Alignment::TopLeft,
        drag_enabled: true,
        snap,
        ..OverlayConfig::default()
    }
}

/// Engine over a headless 1080x1920 display with `config` attached at the origin.
pub fn attached(config: OverlayConfig) -> Fixture {
    let rt = Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .unwrap();
    let wm = HeadlessWindowManager::new(Some(metrics()));
    let host = HeadlessRenderHost::new();
    let opts = EngineOptions {
        snap_interval: Duration::from_millis(5),
        ..EngineOptions::default()
    };
    let engine = Engine::new(
        Arc::new(wm.clone()),
        Arc::new(host.clone()),
        rt.handle().clone(),
        opts,
    );
    engine.configure(config);
    engine.attach(Point { x: 0, y: 0 }).unwrap();
    Fixture {
        rt,
        wm,
        host,
        engine,
    }
}

/// Apply queued UI-thread ops until a final snap step is applied or the
/// deadline passes. Returns the positions applied, in order.
pub fn pump_snap(engine: &Engine, timeout: Duration) -> Vec<Point> {
    let deadline = Instant::now() + timeout;
    let mut applied = Vec::new();
    while Instant::now() < deadline {
        let Ok(op) = engine
            .main_ops_receiver()
            .recv_timeout(Duration::from_millis(20))
        else {
            continue;
        };
        let MainOp::SnapStep { to, done, .. } = op.clone();
        if engine.apply_main_op(op) {
            applied.push(to);
            if done {
                break;
            }
        }
    }
    applied
}

pub fn position_px(f: &Fixture) -> Point {
    let h = f.engine.surface().handle().unwrap();
    Point {
        x: h.attrs.x,
        y: h.attrs.y,
    }
}
