//! Tracing layer recording spans and events for assertions.
//!
//! Span fields recorded after creation (`span.record(..)`) are merged into
//! the captured span. Events keep their `message` and fields.
//!
//! Installed with `set_default`, so async tests must run on
//! `#[tokio::test(flavor = "current_thread")]`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
pub struct CapturedSpan {
    pub name: &'static str,
    pub level: tracing::Level,
    pub fields: HashMap<String, String>,
    pub parent: Option<&'static str>,
}

impl CapturedSpan {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: tracing::Level,
    pub message: String,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Captured {
    spans: Vec<CapturedSpan>,
    events: Vec<CapturedEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct SpanStore(Arc<Mutex<Captured>>);

impl SpanStore {
    pub fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
        self.0
            .lock()
            .unwrap()
            .spans
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    pub fn span_names(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().spans.iter().map(|s| s.name).collect()
    }

    /// Events whose message equals `message`.
    pub fn events(&self, message: &str) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| e.message == message)
            .cloned()
            .collect()
    }
}

/// Position of a span in the store, kept in the span's extensions.
struct SpanSlot(usize);

struct CaptureLayer {
    store: SpanStore,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = Fields::default();
        attrs.record(&mut visitor);

        let Some(span) = ctx.span(id) else {
            return;
        };
        let parent = span.parent().map(|p| p.name());
        let meta = span.metadata();

        let slot = {
            let mut captured = self.store.0.lock().unwrap();
            captured.spans.push(CapturedSpan {
                name: meta.name(),
                level: *meta.level(),
                fields: visitor.fields,
                parent,
            });
            captured.spans.len() - 1
        };
        span.extensions_mut().insert(SpanSlot(slot));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let extensions = span.extensions();
        let Some(SpanSlot(slot)) = extensions.get::<SpanSlot>() else {
            return;
        };
        let mut visitor = Fields::default();
        values.record(&mut visitor);
        if let Some(captured) = self.store.0.lock().unwrap().spans.get_mut(*slot) {
            captured.fields.extend(visitor.fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = Fields::default();
        event.record(&mut visitor);
        let message = visitor.fields.remove("message").unwrap_or_default();
        self.store.0.lock().unwrap().events.push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct Fields {
    fields: HashMap<String, String>,
}

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }
}

/// Capture every span and event on the current thread until the guard drops.
pub fn init_test_tracing() -> (SpanStore, tracing::subscriber::DefaultGuard) {
    let store = SpanStore::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        store: store.clone(),
    });
    let guard = tracing::subscriber::set_default(subscriber);
    (store, guard)
}
