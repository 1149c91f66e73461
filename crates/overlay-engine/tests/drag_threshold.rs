mod common;

use common::{attached, draggable, position_px};
use config::SnapPolicy;
use overlay_engine::PointerEvent;
use overlay_winops::Point;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sub_threshold_moves_never_drag(
        offsets in prop::collection::vec((-3i32..=3, -3i32..=3), 1..24)
    ) {
        let f = attached(draggable(SnapPolicy::None));
        f.engine.handle_pointer(PointerEvent::Down { x: 200.0, y: 200.0 });
        for (dx, dy) in offsets {
            f.engine.handle_pointer(PointerEvent::Move {
                x: 200.0 + dx as f32,
                y: 200.0 + dy as f32,
            });
        }
        let session = f.engine.drag_session().unwrap();
        prop_assert!(!session.is_dragging);
        prop_assert_eq!((session.origin_x, session.origin_y), (200.0, 200.0));
        prop_assert!(f.wm.layout_history().is_empty());
        prop_assert_eq!(position_px(&f), Point { x: 0, y: 0 });
    }
}

#[test]
fn creep_accumulates_from_the_down_point() {
    let f = attached(draggable(SnapPolicy::None));
    let e = &f.engine;
    e.handle_pointer(PointerEvent::Down { x: 100.0, y: 100.0 });
    // 9 px² from the origin: ignored, origin stays at 100.
    e.handle_pointer(PointerEvent::Move { x: 103.0, y: 100.0 });
    assert_eq!(position_px(&f), Point { x: 0, y: 0 });
    // 36 px² measured from the down point, not from 103.
    e.handle_pointer(PointerEvent::Move { x: 106.0, y: 100.0 });
    assert_eq!(position_px(&f), Point { x: 6, y: 0 });
    let s = e.drag_session().unwrap();
    assert!(s.is_dragging);
    assert_eq!(s.origin_x, 106.0);
    // Once dragging, small steps apply.
    e.handle_pointer(PointerEvent::Move { x: 107.0, y: 100.0 });
    assert_eq!(position_px(&f), Point { x: 7, y: 0 });
}
