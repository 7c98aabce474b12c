#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use dragkit_gesture::testing::SimulatedHost;
use dragkit_gesture::{
    BoundingBox, DragConstraints, DragController, DragOptions, PixelLimits, PointerEvent,
};
use libfuzzer_sys::fuzz_target;
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Op {
    Down { pointer: u8, x: i16, y: i16 },
    Move { pointer: u8, x: i16, y: i16 },
    Up { pointer: u8, x: i16, y: i16 },
    Cancel { pointer: u8 },
    Frame,
    Wait { ms: u8 },
    Stop,
    DropElement,
}

#[derive(Debug, Arbitrary)]
struct Input {
    container: bool,
    momentum: bool,
    direction_lock: bool,
    snap_to_origin: bool,
    elastic: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let host = SimulatedHost::new()
        .with_element(BoundingBox::from_origin_size(100.0, 100.0, 50.0, 50.0))
        .with_container(BoundingBox::from_origin_size(0.0, 0.0, 600.0, 400.0));
    let constraints = if input.container {
        DragConstraints::Container
    } else {
        DragConstraints::Pixels(PixelLimits::all(-200.0, -200.0, 200.0, 200.0))
    };
    let options = DragOptions::default()
        .with_constraints(constraints)
        .with_elastic(f64::from(input.elastic) / 255.0)
        .with_momentum(input.momentum)
        .with_direction_lock(input.direction_lock)
        .with_snap_to_origin(input.snap_to_origin);
    let Ok(mut drag) = DragController::attach(host, options) else {
        return;
    };

    let mut now = Instant::now();
    let mut last_id = 0;
    for op in input.ops.iter().take(256) {
        now += Duration::from_millis(4);
        let transition = match *op {
            Op::Down { pointer, x, y } => {
                drag.handle_pointer(&PointerEvent::down(u32::from(pointer), x.into(), y.into()), now)
            }
            Op::Move { pointer, x, y } => {
                drag.handle_pointer(&PointerEvent::moved(u32::from(pointer), x.into(), y.into()), now)
            }
            Op::Up { pointer, x, y } => {
                drag.handle_pointer(&PointerEvent::up(u32::from(pointer), x.into(), y.into()), now)
            }
            Op::Cancel { pointer } => drag.handle_pointer(&PointerEvent::cancel(u32::from(pointer), 0.0, 0.0), now),
            Op::Frame => drag.on_frame(now),
            Op::Wait { ms } => {
                now += Duration::from_millis(u64::from(ms));
                continue;
            }
            Op::Stop => match drag.stop() {
                Some(transition) => transition,
                None => continue,
            },
            Op::DropElement => {
                drag.host_mut().set_element(None);
                continue;
            }
        };
        assert!(transition.transition_id > last_id);
        last_id = transition.transition_id;
        assert_eq!(transition.to, drag.phase());
        assert!(drag.applied_transform().is_finite());
        assert_eq!(drag.host().transform(), drag.applied_transform());
    }
});
