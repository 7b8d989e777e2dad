use crate::{
    adapter::{Adapter, HandleReport},
    github::{EventHeaders, EventType, Payload, EVENT_TYPE_HEADER},
    registry::Registry,
};
use log::{debug, info};
use std::sync::Arc;

/// Routes a webhook delivery to the adapter for its event type.
///
/// The dispatcher holds nothing but the read-only [`Registry`]; every call
/// builds its own adapter and listeners, so concurrent calls never share
/// mutable state.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

/// What a call to [`Dispatcher::route_and_handle`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The event type header was missing, unreadable or named an event we don't
    /// handle. Nothing ran.
    Ignored { event: Option<String> },
    Handled {
        event: EventType,
        report: HandleReport,
    },
}

impl Dispatch {
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled { .. })
    }
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Reads the event type from `headers` and hands `body` to the matching
    /// adapter. Unknown or missing event types are not an error; the delivery
    /// is dropped without running anything.
    pub async fn route_and_handle<H>(&self, headers: &H, body: &Payload) -> Dispatch
    where
        H: EventHeaders + Sync + ?Sized,
    {
        let event_type = match classify(headers) {
            Ok(event_type) => event_type,
            Err(event) => {
                debug!("ignoring unhandled event {:?}", event);
                return Dispatch::Ignored { event };
            }
        };

        let report = match event_type {
            EventType::PullRequest => self.registry.pull_request_adapter().handle(body).await,
            EventType::Push => self.registry.push_adapter().handle(body).await,
        };

        info!(
            "{}: {}/{} listeners succeeded",
            event_type,
            report.succeeded(),
            report.invoked
        );

        Dispatch::Handled {
            event: event_type,
            report,
        }
    }
}

/// On failure returns the raw header value, if there was a readable one.
fn classify<H: EventHeaders + ?Sized>(headers: &H) -> Result<EventType, Option<String>> {
    match headers.event_type_raw() {
        Some(raw) => raw.parse().map_err(|_| Some(raw.to_owned())),
        None => {
            debug!("no valid {} header", EVENT_TYPE_HEADER);
            Err(None)
        }
    }
}
