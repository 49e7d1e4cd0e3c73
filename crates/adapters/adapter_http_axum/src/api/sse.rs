//! Server-Sent Events (SSE) stream for real-time updates.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use hearth_app::ports::{EventPublisher, Integration, MusicClient};

use crate::state::AppState;

/// `GET /api/events/stream` — SSE stream of domain events.
///
/// Each event is sent as a JSON `data:` frame. The stream ends when the
/// client disconnects or the event bus is closed.
pub async fn stream<I, EP, M>(
    State(state): State<AppState<I, EP, M>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    I: Integration + Send + Sync + 'static,
    EP: EventPublisher + Clone + Send + Sync + 'static,
    M: MusicClient + 'static,
{
    let events = BroadcastStream::new(state.events.subscribe()).filter_map(|result| match result {
        Ok(event) => match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(Event::default().event(event.event_type.as_str()).data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged, events dropped");
            None
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
