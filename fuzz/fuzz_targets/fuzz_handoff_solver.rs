#![no_main]

use arbitrary::Arbitrary;
use dragkit_core::{AxisState, Bounds, Elastic, HandoffSolver, PhysicsOverrides, constrain, derive};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    value: f32,
    velocity: f32,
    min: f32,
    span: f32,
    elastic: u8,
    time_constant: u8,
    steps: Vec<u16>,
}

fuzz_target!(|input: Input| {
    let finite = |v: f32| if v.is_finite() { f64::from(v) } else { 0.0 };
    let value = finite(input.value).clamp(-1.0e6, 1.0e6);
    let velocity = finite(input.velocity).clamp(-1.0e6, 1.0e6);
    let min = finite(input.min).clamp(-1.0e6, 1.0e6);
    let bounds = Bounds::new(min, min + finite(input.span).abs().min(1.0e6));

    let elastic = Elastic::Uniform(f64::from(input.elastic) / 255.0);
    let overrides = PhysicsOverrides::default()
        .with_time_constant(f64::from(input.time_constant.max(1)) / 50.0);
    let physics = derive(elastic, &overrides);

    let constrained = constrain(value, bounds, elastic);
    assert!(constrained.is_finite());

    let mut solver = HandoffSolver::new(AxisState::new(value, velocity), bounds, physics);
    let mut elapsed = 0.0;
    let mut settled = None;
    for step in input.steps.iter().take(512) {
        elapsed += f64::from(*step) / 8.0;
        let sample = solver.step(elapsed);
        assert!(sample.value.is_finite(), "non-finite sample {sample:?}");
        if let Some(previous) = settled {
            assert_eq!(sample, previous, "value changed after done");
        } else if sample.done {
            settled = Some(sample);
        }
    }
    if let Some(crossing) = solver.crossing() {
        assert!(crossing.time_ms.is_finite() && crossing.time_ms >= 0.0);
    }
});
