use crate::github::{EventType, Payload};
use std::fmt::Debug;

/// Marker for the kind of event an adapter and its listeners deal with.
///
/// Tying listeners to a kind at the type level means a push listener can
/// never end up on the pull request adapter.
pub trait EventKind: Send + Sync + Debug + 'static {
    const EVENT_TYPE: EventType;
}

/// `pull_request` events
#[derive(Debug)]
pub enum PullRequestKind {}

impl EventKind for PullRequestKind {
    const EVENT_TYPE: EventType = EventType::PullRequest;
}

/// `push` events
#[derive(Debug)]
pub enum PushKind {}

impl EventKind for PushKind {
    const EVENT_TYPE: EventType = EventType::Push;
}

/// A unit of business logic reacting to one webhook payload of kind `K`.
///
/// Anything a listener produces is a side effect of its own. Returning an
/// error only tells the adapter to log it and move on to the next listener.
#[async_trait::async_trait]
pub trait Listener<K: EventKind>: Send + Sync + Debug {
    /// Returns the name of the listener.
    fn name(&self) -> &str;

    async fn process(&self, payload: &Payload) -> anyhow::Result<()>;
}
