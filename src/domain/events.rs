use std::rc::Rc;

use crate::domain::market_data::{SeriesResult, TimeRange};

/// Base trait for all domain events
pub trait DomainEvent: std::fmt::Debug + Clone {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> u64 {
        use crate::domain::logging::get_time_provider;
        get_time_provider().current_timestamp()
    }
}

/// Lifecycle of series requests, in the order observers receive them.
#[derive(Debug, Clone)]
pub enum SeriesEvent {
    LoadingChanged {
        loading: bool,
    },
    SeriesReady {
        request_id: u64,
        series: Rc<SeriesResult>,
    },
    StaleResultDiscarded {
        request_id: u64,
        range: TimeRange,
        active_request_id: u64,
    },
}

impl DomainEvent for SeriesEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SeriesEvent::LoadingChanged { .. } => "LoadingChanged",
            SeriesEvent::SeriesReady { .. } => "SeriesReady",
            SeriesEvent::StaleResultDiscarded { .. } => "StaleResultDiscarded",
        }
    }
}

/// Receiver of [`SeriesEvent`]s, e.g. the leptos signal bridge.
pub trait SeriesObserver {
    fn on_series_event(&self, event: &SeriesEvent);
}

/// Simple in-memory event dispatcher
#[derive(Default)]
pub struct SeriesEventDispatcher {
    observers: Vec<Rc<dyn SeriesObserver>>,
}

impl SeriesEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Rc<dyn SeriesObserver>) {
        self.observers.push(observer);
    }

    pub fn publish(&self, event: &SeriesEvent) {
        for observer in &self.observers {
            observer.on_series_event(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
