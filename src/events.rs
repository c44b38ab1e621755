//! Budget change events and the server-sent event stream that delivers them
//! to open pages.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use axum_htmx::HX_TRIGGER;
use futures_util::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    AppState, Error,
    alert::Alert,
    record::{RecordId, RecordKind},
};

/// The name of the server-sent event and the `HX-Trigger` header value that
/// tell pages to refresh their budget data.
pub const BUDGET_CHANGED: &str = "budget-changed";

const EVENT_BUFFER: usize = 16;

/// A change to the budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BudgetEvent {
    RecordAdded { id: RecordId, kind: RecordKind },
    RecordDeleted { id: RecordId },
    Cleared { removed: usize },
    Imported { count: usize, skipped: usize },
    DemoLoaded,
}

/// Broadcasts [BudgetEvent]s to every open event stream.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BudgetEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);

        Self { sender }
    }

    /// Send `event` to every subscriber. Having no subscribers is fine.
    pub fn publish(&self, event: BudgetEvent) {
        tracing::debug!("Publishing budget event {event:?}");
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BudgetEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl FromRef<AppState> for EventBus {
    fn from_ref(state: &AppState) -> Self {
        state.events.clone()
    }
}

/// Stream every budget change as a `budget-changed` server-sent event with
/// the [BudgetEvent] as JSON data.
pub async fn get_event_stream(
    State(events): State<EventBus>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = stream::unfold(events.subscribe(), |mut receiver| async move {
        let event = match receiver.recv().await {
            Ok(event) => to_sse_event(&event),
            // The page only needs to know that something changed.
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Event stream fell behind and skipped {skipped} events");
                Event::default().event(BUDGET_CHANGED).data("{}")
            }
            Err(RecvError::Closed) => return None,
        };

        Some((Ok(event), receiver))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Respond to a change of the budget with `alert`, or with `save_error` if
/// the change could not be saved, and tell the page to refresh.
pub(crate) fn budget_changed_response(alert: Alert, save_error: Option<Error>) -> Response {
    let response = match save_error {
        Some(error) => error.into_alert_response(),
        None => alert.into_response(),
    };

    ([(HX_TRIGGER, BUDGET_CHANGED)], response).into_response()
}

fn to_sse_event(event: &BudgetEvent) -> Event {
    Event::default()
        .event(BUDGET_CHANGED)
        .json_data(event)
        .unwrap_or_else(|error| {
            tracing::error!("Could not serialize budget event {event:?}: {error}");
            Event::default().event(BUDGET_CHANGED).data("{}")
        })
}
