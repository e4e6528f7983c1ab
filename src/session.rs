//! One in-flight generation request: buffer, parser and emission policy.

use crate::accumulator::ChunkAccumulator;
use crate::clock::Clock;
use crate::emission::{Debouncer, Emission, EmissionState};
use crate::error::StreamError;
use crate::options::SessionOptions;
use crate::partial::{ParseMiss, parse_partial_outcome};
use crate::validate::Validator;
use std::time::Instant;

/// Events delivered by the streaming transport, already decoded from its framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    TextDelta(String),
    Complete,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Streaming,
    Completed,
    Failed(String),
    Cancelled,
}

/// What a session produced in response to a transport event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate<T> {
    Items(Emission<T>),
    Failed(StreamError),
}

/// Owns everything for a single request. A second request gets a new session.
pub struct StreamSession<V: Validator, C: Clock> {
    opts: SessionOptions,
    validator: V,
    clock: C,
    acc: ChunkAccumulator,
    debouncer: Debouncer<V::Item>,
    status: SessionStatus,
}

impl<V: Validator, C: Clock> StreamSession<V, C> {
    pub fn new(validator: V, clock: C, opts: SessionOptions) -> Self {
        let debouncer = Debouncer::new(opts.debounce);
        Self {
            opts,
            validator,
            clock,
            acc: ChunkAccumulator::new(),
            debouncer,
            status: SessionStatus::Streaming,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status != SessionStatus::Streaming
    }

    pub fn buffer(&self) -> &str {
        self.acc.current_buffer()
    }

    /// The last sequence delivered to the consumer.
    pub fn last_emitted(&self) -> &[V::Item] {
        self.debouncer.last_emitted()
    }

    pub fn emission_state(&self) -> EmissionState {
        self.debouncer.state()
    }

    pub fn emissions(&self) -> usize {
        self.debouncer.emissions()
    }

    /// When [`poll`](Self::poll) should next be called, if an emission is waiting.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.is_finished() {
            return None;
        }
        self.debouncer.deadline()
    }

    pub fn on_text_delta(&mut self, delta: &str) -> Option<Emission<V::Item>> {
        if self.is_finished() {
            tracing::warn!(status = ?self.status, "delta after stream end ignored");
            return None;
        }
        self.acc.append(delta);
        let items = self.parse();
        self.debouncer.offer(items, self.clock.now())
    }

    /// Deliver a pending emission whose window has closed.
    pub fn poll(&mut self) -> Option<Emission<V::Item>> {
        if self.is_finished() {
            return None;
        }
        self.debouncer.poll(self.clock.now())
    }

    /// Final, non-debounced emission of the fully parsed buffer.
    pub fn on_complete(&mut self) -> Result<Emission<V::Item>, StreamError> {
        if self.is_finished() {
            return Err(StreamError::AlreadyFinished);
        }
        let items = self.parse();
        self.status = SessionStatus::Completed;
        tracing::debug!(
            items = items.len(),
            deltas = self.acc.deltas(),
            bytes = self.acc.len(),
            "stream completed"
        );
        Ok(self.debouncer.finish(items))
    }

    /// Record a transport failure. Items already emitted stay valid.
    pub fn on_error(&mut self, message: &str) -> StreamError {
        if self.is_finished() {
            return StreamError::AlreadyFinished;
        }
        tracing::warn!(error = message, "generation stream failed");
        self.debouncer.abandon();
        self.status = SessionStatus::Failed(message.to_string());
        StreamError::Transport(message.to_string())
    }

    /// Stop the session. Nothing further is emitted; earlier emissions stay.
    pub fn cancel(&mut self) {
        if self.is_finished() {
            return;
        }
        tracing::debug!(emissions = self.debouncer.emissions(), "stream cancelled");
        self.debouncer.abandon();
        self.status = SessionStatus::Cancelled;
    }

    pub fn handle(&mut self, event: TransportEvent) -> Option<SessionUpdate<V::Item>> {
        match event {
            TransportEvent::TextDelta(delta) => self.on_text_delta(&delta).map(SessionUpdate::Items),
            TransportEvent::Complete => Some(match self.on_complete() {
                Ok(e) => SessionUpdate::Items(e),
                Err(e) => SessionUpdate::Failed(e),
            }),
            TransportEvent::Error(msg) => Some(SessionUpdate::Failed(self.on_error(&msg))),
        }
    }

    fn parse(&self) -> Vec<V::Item> {
        let outcome = parse_partial_outcome(self.acc.current_buffer(), &self.opts.parse, &self.validator);
        if let Some(ParseMiss::RepairFailed(e)) = &outcome.miss {
            tracing::trace!(error = %e, deltas = self.acc.deltas(), "buffer not repairable yet");
        }
        outcome.items
    }
}
