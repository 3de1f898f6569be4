//! Call recorder shared by the integration suites.
//!
//! Every listener built by a [`Recorder`] appends `(label, args)` to one
//! shared log, so a test can assert on exact dispatch order across topics.

use serde_json::Value;
use std::sync::{Arc, Mutex};
use zeroin::Listener;

#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that records its label and the arguments it was called with.
    pub fn listener(&self, label: &str) -> Listener {
        let calls = Arc::clone(&self.calls);
        let label = label.to_string();
        Listener::new(move |args: &[Value]| {
            calls.lock().unwrap().push((label.clone(), args.to_vec()));
        })
    }

    pub fn record(&self, label: &str, args: &[Value]) {
        self.calls
            .lock()
            .unwrap()
            .push((label.to_string(), args.to_vec()));
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(label, _)| label.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
