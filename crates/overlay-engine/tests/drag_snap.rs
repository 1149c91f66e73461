mod common;

use std::time::Duration;

use common::{SCREEN_W, attached, draggable, position_px, pump_snap};
use config::{OverlayConfig, SnapPolicy};
use overlay_engine::PointerEvent;
use overlay_winops::{MainOp, Point};

fn drag(f: &common::Fixture, from: (f32, f32), to: (f32, f32)) {
    let e = &f.engine;
    assert!(!e.handle_pointer(PointerEvent::Down { x: from.0, y: from.1 }));
    assert!(!e.handle_pointer(PointerEvent::Move { x: to.0, y: to.1 }));
    assert!(!e.handle_pointer(PointerEvent::Up { x: to.0, y: to.1 }));
}

#[test]
fn drag_then_snap_right_converges() {
    let f = attached(draggable(SnapPolicy::Right));
    drag(&f, (100.0, 100.0), (108.0, 100.0));

    let steps = pump_snap(&f.engine, Duration::from_secs(3));
    let dest = Point {
        x: SCREEN_W - 200,
        y: 0,
    };
    assert!(!steps.is_empty());
    assert!(steps.len() < 20, "took {} ticks", steps.len());

    // Each tick keeps two thirds of the remaining distance.
    let mut prev = Point { x: 8, y: 0 };
    for p in &steps {
        assert_eq!(p.x - dest.x, 2 * (prev.x - dest.x) / 3);
        assert_eq!(p.y, dest.y);
        prev = *p;
    }
    let end = position_px(&f);
    assert!((end.x - dest.x).abs() < 2 && (end.y - dest.y).abs() < 2);
    assert!(!f.engine.snap_animator().is_active());
}

#[test]
fn snap_none_does_not_animate() {
    let f = attached(draggable(SnapPolicy::None));
    drag(&f, (100.0, 100.0), (140.0, 130.0));
    assert_eq!(position_px(&f), Point { x: 40, y: 30 });
    assert!(pump_snap(&f.engine, Duration::from_millis(100)).is_empty());
}

#[test]
fn new_snap_discards_steps_from_the_previous_one() {
    let f = attached(draggable(SnapPolicy::Right));
    drag(&f, (100.0, 100.0), (160.0, 100.0));

    // Hold the first task's first step back from the UI thread.
    let held = f
        .engine
        .main_ops_receiver()
        .recv_timeout(Duration::from_secs(1))
        .unwrap();
    let MainOp::SnapStep { generation: old, .. } = held.clone();

    f.engine
        .config()
        .update(|c| OverlayConfig {
            snap: SnapPolicy::Left,
            ..c.clone()
        });
    drag(&f, (100.0, 100.0), (110.0, 100.0));
    assert!(!f.engine.snap_animator().is_current(old));

    let before = f.wm.layout_history().len();
    assert!(!f.engine.apply_main_op(held));
    assert_eq!(f.wm.layout_history().len(), before);

    // Everything applied from here on belongs to the leftward task.
    let steps = pump_snap(&f.engine, Duration::from_secs(3));
    let mut prev = position_px(&f).x.max(70);
    for p in &steps {
        assert!(p.x <= prev);
        prev = p.x;
    }
    assert!(position_px(&f).x.abs() < 2);
}

#[test]
fn down_cancels_running_snap() {
    let f = attached(draggable(SnapPolicy::Right));
    drag(&f, (100.0, 100.0), (108.0, 100.0));
    assert!(!f.engine.handle_pointer(PointerEvent::Down { x: 0.0, y: 0.0 }));
    assert!(!f.engine.snap_animator().is_active());
    let drained = f.engine.drain_main_ops();
    assert_eq!(drained, 0);
    assert_eq!(position_px(&f), Point { x: 8, y: 0 });
}

#[test]
fn detach_mid_snap_is_safe() {
    let f = attached(draggable(SnapPolicy::Auto));
    drag(&f, (100.0, 100.0), (700.0, 100.0));
    assert!(f.engine.detach());
    assert_eq!(f.engine.drain_main_ops(), 0);
    assert!(f.engine.get_position().is_none());
    assert_eq!(f.host.live_surfaces(), 0);
}

#[test]
fn drag_disabled_never_mutates() {
    let mut config = draggable(SnapPolicy::Right);
    config.drag_enabled = false;
    let f = attached(config);
    drag(&f, (0.0, 0.0), (300.0, 300.0));
    assert!(f.wm.layout_history().is_empty());
    assert!(f.engine.drag_session().is_none());
}

#[test]
fn bottom_right_anchor_follows_finger() {
    let mut config = draggable(SnapPolicy::None);
    config.alignment = config::Alignment::BottomRight;
    let f = attached(config);
    drag(&f, (500.0, 500.0), (520.0, 530.0));
    assert_eq!(position_px(&f), Point { x: -20, y: -30 });
    let frame = f.wm.frame(f.wm.live_token().unwrap()).unwrap();
    assert_eq!(frame.x, SCREEN_W - 200 + 20);
}

#[test]
fn drag_and_snap_from_the_far_edge_of_i32_stay_in_range() {
    let f = attached(draggable(SnapPolicy::None));
    assert!(f.engine.move_position(i32::MAX, 0).unwrap());
    assert_eq!(position_px(&f).x, i32::MAX);

    drag(&f, (100.0, 100.0), (108.0, 100.0));
    assert_eq!(position_px(&f), Point { x: i32::MAX, y: 0 });
    assert!(f.engine.is_attached());

    f.engine
        .config()
        .update(|c| OverlayConfig {
            snap: SnapPolicy::Right,
            ..c.clone()
        });
    assert!(!f.engine.handle_pointer(PointerEvent::Down { x: 100.0, y: 100.0 }));
    assert!(!f.engine.handle_pointer(PointerEvent::Up { x: 100.0, y: 100.0 }));
    let steps = pump_snap(&f.engine, Duration::from_secs(3));
    assert!(!steps.is_empty());
    let end = position_px(&f);
    assert!((end.x - (SCREEN_W - 200)).abs() < 2, "ended at {end:?}");
}
