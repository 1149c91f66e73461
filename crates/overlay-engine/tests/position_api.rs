mod common;

use common::{attached, draggable, metrics};
use config::{InteractionFlag, SnapPolicy};
use overlay_engine::Error;
use overlay_winops::{CLICK_THROUGH_MAX_ALPHA, MATCH_PARENT, WindowFlags};

#[test]
fn move_sentinels_are_equivalent() {
    let f = attached(draggable(SnapPolicy::None));
    for y in [0, 15, -40] {
        assert_eq!(f.engine.move_position(-1999, y), Ok(true));
        let a = f.engine.surface().handle().unwrap().attrs;
        assert_eq!(f.engine.move_position(-1, y), Ok(true));
        let b = f.engine.surface().handle().unwrap().attrs;
        assert_eq!((a.x, a.y), (-1, y));
        assert_eq!((a.x, a.y), (b.x, b.y));
    }
}

#[test]
fn position_round_trips_through_dp() {
    let f = attached(draggable(SnapPolicy::None));
    assert_eq!(f.engine.move_position(30, 45), Ok(true));
    let p = f.engine.get_position().unwrap();
    assert_eq!((p.x, p.y), (30.0, 45.0));
}

#[test]
fn detached_overlay_is_benign() {
    let f = attached(draggable(SnapPolicy::None));
    assert!(f.engine.detach());
    assert!(!f.engine.detach());
    assert!(f.engine.get_position().is_none());
    assert_eq!(f.engine.move_position(1, 1), Ok(false));
    assert_eq!(f.engine.resize(10, 10, true), Ok(false));
    assert_eq!(f.engine.update_flag("clickThrough"), Ok(false));
    assert_eq!(f.engine.set_click_through(true), Ok(false));
    assert_eq!(f.engine.set_blur(4), Ok(false));
}

#[test]
fn revoked_window_reads_as_detached() {
    let f = attached(draggable(SnapPolicy::None));
    f.wm.revoke(f.wm.live_token().unwrap());
    assert!(f.engine.get_position().is_none());
    assert_eq!(f.engine.move_position(1, 1), Ok(false));
    assert!(!f.engine.is_attached());
}

#[test]
fn failed_layout_update_is_an_error_then_detached() {
    let f = attached(draggable(SnapPolicy::None));
    f.wm.set_fail_update(true);
    let err = f.engine.move_position(5, 5).unwrap_err();
    assert!(matches!(err, Error::LayoutMutationFailed(_)));
    f.wm.set_fail_update(false);
    assert_eq!(f.engine.move_position(5, 5), Ok(false));
}

#[test]
fn resize_width_sentinel_fills_height_sentinel_literal() {
    let f = attached(draggable(SnapPolicy::None));
    assert_eq!(f.engine.resize(-1999, -1999, false), Ok(true));
    let a = f.engine.surface().handle().unwrap().attrs;
    assert_eq!((a.width, a.height), (MATCH_PARENT, -1999));
    let config = f.engine.config().snapshot();
    assert!(!config.drag_enabled);
    assert_eq!(config.size.width, -1999);

    assert_eq!(f.engine.resize(120, 80, true), Ok(true));
    let a = f.engine.surface().handle().unwrap().attrs;
    assert_eq!((a.width, a.height), (120, 80));
    assert!(f.engine.config().snapshot().drag_enabled);
}

#[test]
fn update_flag_switches_and_ignores_unknown() {
    let f = attached(draggable(SnapPolicy::None));
    assert_eq!(f.engine.update_flag("clickThrough"), Ok(true));
    let a = f.engine.surface().handle().unwrap().attrs;
    assert!(a.flags.contains(WindowFlags::NOT_TOUCHABLE | WindowFlags::MANDATORY));
    assert_eq!(a.alpha, CLICK_THROUGH_MAX_ALPHA);
    assert_eq!(
        f.engine.config().snapshot().interaction,
        InteractionFlag::ClickThroughAndUnfocusable
    );

    assert_eq!(f.engine.update_flag("noSuchFlag"), Ok(true));
    assert_eq!(
        f.engine.config().snapshot().interaction,
        InteractionFlag::ClickThroughAndUnfocusable
    );
}

#[test]
fn click_through_and_blur() {
    let f = attached(draggable(SnapPolicy::None));
    let base = f.engine.surface().handle().unwrap().attrs;
    assert_eq!(f.engine.set_click_through(true), Ok(true));
    assert!(
        f.engine
            .surface()
            .handle()
            .unwrap()
            .attrs
            .flags
            .contains(WindowFlags::NOT_TOUCHABLE)
    );
    assert_eq!(f.engine.set_click_through(false), Ok(true));
    assert_eq!(f.engine.surface().handle().unwrap().attrs.flags, base.flags);

    assert_eq!(f.engine.set_blur(16), Ok(true));
    let a = f.engine.surface().handle().unwrap().attrs;
    assert_eq!(a.blur_radius, 16);
    assert!(a.flags.contains(WindowFlags::BLUR_BEHIND));
    assert_eq!(f.engine.set_blur(0), Ok(true));
    assert!(
        !f.engine
            .surface()
            .handle()
            .unwrap()
            .attrs
            .flags
            .contains(WindowFlags::BLUR_BEHIND)
    );
    // display unchanged across mutations
    assert_eq!(f.engine.surface().handle().unwrap().display, metrics());
}
