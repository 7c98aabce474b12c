//! Degraded conditions are logged, not raised.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dragkit_gesture::testing::SimulatedHost;
use dragkit_gesture::{
    DragConstraints, DragController, DragEffect, DragOptions, DragPhase, PointerCaptureError,
    PointerEvent,
};
use tracing_subscriber::layer::SubscriberExt;
use web_time::Instant;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

#[test]
fn capture_failure_is_logged_and_swallowed() {
    let events = with_captured_tracing(|| {
        let host = SimulatedHost::new()
            .with_capture_error(PointerCaptureError::InactivePointer { pointer_id: 3 });
        let mut drag = DragController::attach(host, DragOptions::default()).unwrap();
        let down = drag.handle_pointer(&PointerEvent::down(3, 0.0, 0.0), Instant::now());
        assert!(matches!(down.effect, DragEffect::Started { .. }));
        assert!(drag.host().captured().is_empty());
    });

    let warning = events
        .iter()
        .find(|event| event.level == tracing::Level::WARN)
        .expect("capture failure warning");
    assert!(warning.message().contains("pointer capture failed"));
    assert_eq!(
        warning.fields.get("error").map(String::as_str),
        Some("pointer 3 is not active")
    );
    assert!(
        events
            .iter()
            .any(|event| event.level == tracing::Level::DEBUG && event.message() == "drag started")
    );
}

#[test]
fn missing_geometry_is_logged() {
    let events = with_captured_tracing(|| {
        let mut drag = DragController::attach(
            SimulatedHost::new(),
            DragOptions::default().with_constraints(DragConstraints::Container),
        )
        .unwrap();
        let down = drag.handle_pointer(&PointerEvent::down(1, 0.0, 0.0), Instant::now());
        assert_eq!(down.to, DragPhase::Idle);
    });

    assert!(events.iter().any(|event| {
        event.level == tracing::Level::WARN && event.message().contains("could not be measured")
    }));
}
