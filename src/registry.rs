use crate::{
    adapter::{Adapter, ListenerAdapter},
    config::{ConfigError, ListenersConfig},
    listener::{EventKind, Listener, PullRequestKind, PushKind},
    listeners,
};
use std::{fmt, sync::Arc};

/// Builds a fresh listener for every delivery.
pub type ListenerFactory<K> = Arc<dyn Fn() -> Box<dyn Listener<K>> + Send + Sync>;

/// Which listeners run for which event kind.
///
/// Built once at startup and shared read-only between requests; adapters and
/// listener instances are created from it per delivery.
#[derive(Clone, Default)]
pub struct Registry {
    pull_request: Vec<ListenerFactory<PullRequestKind>>,
    push: Vec<ListenerFactory<PushKind>>,
}

impl Registry {
    /// An empty registry; every event is accepted and nothing runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock wiring: `automatic-pr` for pull requests and `dco` for pushes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .on_pull_request(|| Box::new(listeners::AutomaticPr))
            .on_push(|| Box::new(listeners::DcoCheck));
        registry
    }

    pub fn from_config(config: &ListenersConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new();

        for name in &config.pull_request {
            let factory = listeners::pull_request_listener(name).ok_or_else(|| {
                ConfigError::UnknownListener {
                    event: PullRequestKind::EVENT_TYPE,
                    name: name.clone(),
                }
            })?;
            registry.pull_request.push(factory);
        }

        for name in &config.push {
            let factory =
                listeners::push_listener(name).ok_or_else(|| ConfigError::UnknownListener {
                    event: PushKind::EVENT_TYPE,
                    name: name.clone(),
                })?;
            registry.push.push(factory);
        }

        Ok(registry)
    }

    pub fn on_pull_request<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Listener<PullRequestKind>> + Send + Sync + 'static,
    {
        self.pull_request.push(Arc::new(factory));
        self
    }

    pub fn on_push<F>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Listener<PushKind>> + Send + Sync + 'static,
    {
        self.push.push(Arc::new(factory));
        self
    }

    pub(crate) fn pull_request_adapter(&self) -> ListenerAdapter<PullRequestKind> {
        build_adapter(&self.pull_request)
    }

    pub(crate) fn push_adapter(&self) -> ListenerAdapter<PushKind> {
        build_adapter(&self.push)
    }
}

fn build_adapter<K: EventKind>(factories: &[ListenerFactory<K>]) -> ListenerAdapter<K> {
    let mut adapter = ListenerAdapter::new();
    for factory in factories {
        adapter.add_listener(factory());
    }
    adapter
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("pull_request", &self.pull_request.len())
            .field("push", &self.push.len())
            .finish()
    }
}
