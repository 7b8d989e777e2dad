use crate::{
    github::Payload,
    listener::{EventKind, Listener, PullRequestKind, PushKind},
};
use futures::FutureExt;
use log::{error, trace, warn};
use std::{any::Any, fmt, panic::AssertUnwindSafe};

/// Owns the listeners for one kind of event and fans a payload out to them.
#[async_trait::async_trait]
pub trait Adapter: Send + Sync {
    type Kind: EventKind;

    /// Appends a listener. Nothing is deduplicated; a listener added twice runs twice.
    fn add_listener(&mut self, listener: Box<dyn Listener<Self::Kind>>);

    /// Runs every listener against `payload`, one after the other, in the order
    /// they were added.
    async fn handle(&self, payload: &Payload) -> HandleReport;
}

pub type PullRequestAdapter = ListenerAdapter<PullRequestKind>;
pub type PushAdapter = ListenerAdapter<PushKind>;

/// The one fan-out implementation shared by every adapter kind.
///
/// A listener that returns an error or panics is recorded in the
/// [`HandleReport`] and the remaining listeners still run.
pub struct ListenerAdapter<K: EventKind> {
    listeners: Vec<Box<dyn Listener<K>>>,
}

impl<K: EventKind> ListenerAdapter<K> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<K: EventKind> Default for ListenerAdapter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventKind> fmt::Debug for ListenerAdapter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerAdapter")
            .field("event_type", &K::EVENT_TYPE)
            .field("listeners", &self.listeners)
            .finish()
    }
}

#[async_trait::async_trait]
impl<K: EventKind> Adapter for ListenerAdapter<K> {
    type Kind = K;

    fn add_listener(&mut self, listener: Box<dyn Listener<K>>) {
        self.listeners.push(listener);
    }

    async fn handle(&self, payload: &Payload) -> HandleReport {
        let mut report = HandleReport::default();

        for listener in &self.listeners {
            trace!("{}: running listener {}", K::EVENT_TYPE, listener.name());
            report.invoked += 1;

            let outcome = AssertUnwindSafe(listener.process(payload))
                .catch_unwind()
                .await;

            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => {
                    warn!("{}: listener {} failed: {:#}", K::EVENT_TYPE, listener.name(), e);
                    ListenerFailure {
                        listener: listener.name().to_owned(),
                        reason: format!("{:#}", e),
                        panicked: false,
                    }
                }
                Err(panic) => {
                    let reason = panic_message(&*panic);
                    error!("{}: listener {} panicked: {}", K::EVENT_TYPE, listener.name(), reason);
                    ListenerFailure {
                        listener: listener.name().to_owned(),
                        reason,
                        panicked: true,
                    }
                }
            };
            report.failures.push(failure);
        }

        report
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// What happened when an adapter handled a payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HandleReport {
    /// Number of listeners that were run
    pub invoked: usize,
    pub failures: Vec<ListenerFailure>,
}

impl HandleReport {
    pub fn succeeded(&self) -> usize {
        self.invoked - self.failures.len()
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerFailure {
    pub listener: String,
    pub reason: String,
    pub panicked: bool,
}

#[cfg(test)]
mod test {
    use super::{Adapter, PullRequestAdapter, PushAdapter};
    use crate::{
        github::Payload,
        listener::{EventKind, Listener},
    };
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<(String, Payload)>>>;

    #[derive(Debug)]
    enum Behaviour {
        Succeed,
        Fail,
        Panic,
    }

    #[derive(Debug)]
    struct Recording {
        name: String,
        calls: Calls,
        behaviour: Behaviour,
    }

    impl Recording {
        fn boxed(name: &str, calls: &Calls, behaviour: Behaviour) -> Box<Self> {
            Box::new(Self {
                name: name.to_owned(),
                calls: calls.clone(),
                behaviour,
            })
        }
    }

    #[async_trait::async_trait]
    impl<K: EventKind> Listener<K> for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        async fn process(&self, payload: &Payload) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((self.name.clone(), payload.clone()));
            match self.behaviour {
                Behaviour::Succeed => Ok(()),
                Behaviour::Fail => Err(anyhow!("boom")),
                Behaviour::Panic => panic!("listener blew up"),
            }
        }
    }

    fn names(calls: &Calls) -> Vec<String> {
        calls.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }

    #[tokio::test]
    async fn listeners_run_in_registration_order() {
        let calls = Calls::default();
        let mut adapter = PushAdapter::new();
        adapter.add_listener(Recording::boxed("first", &calls, Behaviour::Succeed));
        adapter.add_listener(Recording::boxed("second", &calls, Behaviour::Succeed));
        adapter.add_listener(Recording::boxed("third", &calls, Behaviour::Succeed));

        let payload = Payload::from(r#"{"commits": []}"#);
        let report = adapter.handle(&payload).await;

        assert_eq!(names(&calls), vec!["first", "second", "third"]);
        assert!(calls.lock().unwrap().iter().all(|(_, p)| *p == payload));
        assert_eq!(report.invoked, 3);
        assert!(report.is_ok());
    }

    #[tokio::test]
    async fn duplicate_listeners_each_run() {
        let calls = Calls::default();
        let mut adapter = PullRequestAdapter::new();
        adapter.add_listener(Recording::boxed("same", &calls, Behaviour::Succeed));
        adapter.add_listener(Recording::boxed("same", &calls, Behaviour::Succeed));
        assert_eq!(adapter.len(), 2);

        adapter.handle(&Payload::from("{}")).await;
        assert_eq!(names(&calls), vec!["same", "same"]);
    }

    #[tokio::test]
    async fn failing_listener_does_not_stop_the_rest() {
        let calls = Calls::default();
        let mut adapter = PullRequestAdapter::new();
        adapter.add_listener(Recording::boxed("fails", &calls, Behaviour::Fail));
        adapter.add_listener(Recording::boxed("panics", &calls, Behaviour::Panic));
        adapter.add_listener(Recording::boxed("works", &calls, Behaviour::Succeed));

        let report = adapter.handle(&Payload::from("{}")).await;

        assert_eq!(names(&calls), vec!["fails", "panics", "works"]);
        assert_eq!(report.invoked, 3);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].listener, "fails");
        assert_eq!(report.failures[0].reason, "boom");
        assert!(!report.failures[0].panicked);
        assert_eq!(report.failures[1].listener, "panics");
        assert_eq!(report.failures[1].reason, "listener blew up");
        assert!(report.failures[1].panicked);
    }

    #[tokio::test]
    async fn empty_adapter() {
        let adapter = PushAdapter::default();
        assert!(adapter.is_empty());
        let report = adapter.handle(&Payload::from("{}")).await;
        assert_eq!(report.invoked, 0);
        assert!(report.is_ok());
    }
}
