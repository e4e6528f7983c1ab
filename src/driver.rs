//! Pump transport events into a session on a tokio runtime.

use crate::clock::TokioClock;
use crate::emission::Emission;
use crate::error::StreamError;
use crate::session::{StreamSession, TransportEvent};
use crate::validate::Validator;
use futures::{Stream, StreamExt};
use std::future::Future;
use tokio::time::{Instant, sleep_until};

/// Run `session` until the transport completes, fails, or `cancel` resolves.
///
/// Debounced emissions are delivered to `on_emit` when their window closes,
/// even if no further delta arrives. A transport stream that ends without a
/// terminal event counts as completed. Returns the final emission, or the
/// error / cancellation signal; in both of those cases
/// `session.last_emitted()` still holds the last-known-good items.
pub async fn drive<S, V, F, X>(
    events: S,
    cancel: X,
    session: &mut StreamSession<V, TokioClock>,
    mut on_emit: F,
) -> Result<Emission<V::Item>, StreamError>
where
    S: Stream<Item = TransportEvent>,
    V: Validator,
    F: FnMut(&Emission<V::Item>),
    X: Future<Output = ()>,
{
    tokio::pin!(events);
    tokio::pin!(cancel);
    loop {
        let deadline = session.next_deadline();
        let wake = deadline.map(Instant::from_std).unwrap_or_else(Instant::now);
        tokio::select! {
            biased;
            _ = &mut cancel => {
                session.cancel();
                return Err(StreamError::Cancelled);
            }
            _ = sleep_until(wake), if deadline.is_some() => {
                if let Some(e) = session.poll() {
                    on_emit(&e);
                }
            }
            event = events.next() => match event {
                Some(TransportEvent::TextDelta(delta)) => {
                    if let Some(e) = session.on_text_delta(&delta) {
                        on_emit(&e);
                    }
                }
                Some(TransportEvent::Complete) | None => {
                    let e = session.on_complete()?;
                    on_emit(&e);
                    return Ok(e);
                }
                Some(TransportEvent::Error(message)) => {
                    return Err(session.on_error(&message));
                }
            },
        }
    }
}
