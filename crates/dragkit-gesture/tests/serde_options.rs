//! Options and transition records behind the `serde` feature.
#![cfg(feature = "serde")]

use dragkit_gesture::{
    DragAxis, DragConstraints, DragEffect, DragOptions, DragPhase, DragTransition, Elastic,
    PixelLimits, Point, ReleaseKind, SettleTransition,
};

#[test]
fn partial_options_fill_in_defaults() {
    let options: DragOptions = serde_json::from_str(
        r#"{
            "axis": "x",
            "constraints": {"kind": "pixels", "limits": {"left": -100.0, "right": 100.0}},
            "elastic": {"kind": "uniform", "factor": 0.2},
            "settle": {"kind": "instant"}
        }"#,
    )
    .unwrap();
    assert_eq!(options.axis, DragAxis::X);
    assert_eq!(
        options.constraints,
        DragConstraints::Pixels(PixelLimits::horizontal(-100.0, 100.0))
    );
    assert_eq!(options.elastic, Elastic::Uniform(0.2));
    assert_eq!(options.settle, SettleTransition::Instant);
    assert!(options.momentum);
    assert!(options.validate().is_ok());
}

#[test]
fn transitions_serialize_with_tags() {
    let transition = DragTransition {
        transition_id: 4,
        from: DragPhase::Dragging { pointer_id: 1 },
        to: DragPhase::Releasing {
            release: ReleaseKind::Momentum,
        },
        effect: DragEffect::Released {
            release: ReleaseKind::Momentum,
            velocity: Point::new(10.0, 0.0),
        },
    };
    let json = serde_json::to_value(transition).unwrap();
    assert_eq!(json["from"]["phase"], "dragging");
    assert_eq!(json["to"]["release"], "momentum");
    assert_eq!(json["effect"]["effect"], "released");
    assert_eq!(json["effect"]["velocity"]["x"], 10.0);
}
