//! When to tell the consumer about a new item sequence.
//!
//! Parsing runs on every delta, which can be many times per second. A change
//! opens a window; everything that changes before the window closes goes out
//! as one emission carrying the latest sequence. Timing never affects the
//! final state: completion always forces one last emission.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionState {
    /// Nothing emitted yet and nothing waiting.
    Idle,
    /// A changed sequence is waiting for the window to close.
    Pending { scheduled_at: Instant },
    /// The last emission is current.
    Emitted,
}

/// One notification to the consumer. The sequence replaces any earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission<T> {
    pub items: Vec<T>,
    /// No further emissions follow.
    pub is_final: bool,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    state: EmissionState,
    last_emitted: Vec<T>,
    pending: Option<Vec<T>>,
    emissions: usize,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: EmissionState::Idle,
            last_emitted: Vec::new(),
            pending: None,
            emissions: 0,
        }
    }

    pub fn state(&self) -> EmissionState {
        self.state
    }

    pub fn last_emitted(&self) -> &[T] {
        &self.last_emitted
    }

    /// Number of emissions delivered so far, the final one included.
    pub fn emissions(&self) -> usize {
        self.emissions
    }

    /// When the pending emission is due, if one is waiting.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            EmissionState::Pending { scheduled_at } => Some(scheduled_at),
            _ => None,
        }
    }

    /// Feed the latest parse result. Returns an emission if one is due right
    /// away (zero window, or an already expired deadline).
    pub fn offer(&mut self, items: Vec<T>, now: Instant) -> Option<Emission<T>> {
        if items == self.last_emitted {
            // the change reverted before anyone saw it
            self.pending = None;
            self.settle();
            return None;
        }
        if !matches!(self.state, EmissionState::Pending { .. }) {
            self.state = EmissionState::Pending {
                scheduled_at: now + self.window,
            };
        }
        self.pending = Some(items);
        self.poll(now)
    }

    /// Deliver the pending sequence if its window has closed.
    pub fn poll(&mut self, now: Instant) -> Option<Emission<T>> {
        let EmissionState::Pending { scheduled_at } = self.state else {
            return None;
        };
        if now < scheduled_at {
            return None;
        }
        let items = self.pending.take()?;
        Some(self.emit(items, false))
    }

    /// Deliver `items` immediately as the final emission.
    pub fn finish(&mut self, items: Vec<T>) -> Emission<T> {
        self.pending = None;
        self.emit(items, true)
    }

    /// Drop whatever is pending without emitting it. Already emitted items stay.
    pub fn abandon(&mut self) {
        self.pending = None;
        self.settle();
    }

    fn emit(&mut self, items: Vec<T>, is_final: bool) -> Emission<T> {
        self.last_emitted = items.clone();
        self.state = EmissionState::Emitted;
        self.emissions += 1;
        tracing::trace!(items = items.len(), is_final, "emitting item sequence");
        Emission { items, is_final }
    }

    fn settle(&mut self) {
        self.state = if self.emissions > 0 {
            EmissionState::Emitted
        } else {
            EmissionState::Idle
        };
    }
}
