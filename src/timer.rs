//! Named wall-clock timers.
use std::fmt;
use std::time::{Duration, Instant};
use fnv::FnvHashMap;

#[derive(Clone, Debug)]
struct Entry {
    label: String,
    total: Duration,
    started: Option<Instant>,
    calls: usize,
}

/// A set of accumulating timers, reported in creation order.
#[derive(Clone, Debug, Default)]
pub struct Timers {
    entries: Vec<Entry>,
    index: FnvHashMap<String, usize>,
}

impl Timers {
    pub fn new() -> Self {
        Default::default()
    }

    /// Register a timer.  Does nothing if `key` already exists.
    pub fn new_entry(&mut self, key: &str, label: &str) {
        if self.index.contains_key(key) {
            return;
        }
        self.index.insert(key.to_owned(), self.entries.len());
        self.entries.push(Entry {
            label: label.to_owned(),
            total: Duration::default(),
            started: None,
            calls: 0,
        });
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i]),
            None => {
                warn!("timer '{}' does not exist", key);
                None
            }
        }
    }

    pub fn start(&mut self, key: &str) {
        if let Some(e) = self.entry_mut(key) {
            e.started = Some(Instant::now());
        }
    }

    /// Stop a running timer and add the elapsed time to its total.
    pub fn stop(&mut self, key: &str) {
        if let Some(e) = self.entry_mut(key) {
            if let Some(t) = e.started.take() {
                e.total += t.elapsed();
                e.calls += 1;
            }
        }
    }

    /// Accumulated time in seconds.
    pub fn total(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&i| {
            let d = self.entries[i].total;
            d.as_secs() as f64 + d.subsec_nanos() as f64 * 1e-9
        })
    }

    pub fn calls(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&i| self.entries[i].calls)
    }
}

impl fmt::Display for Timers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "timers:")?;
        for e in &self.entries {
            let secs = e.total.as_secs() as f64
                + e.total.subsec_nanos() as f64 * 1e-9;
            writeln!(f, "  {:<40}{:13.3}", e.label, secs)?;
        }
        Ok(())
    }
}
