//! Receives GitHub webhooks and hands each delivery to the listeners
//! registered for its event type.

mod adapter;
mod config;
mod dispatcher;
mod error;
pub mod github;
mod listener;
pub mod listeners;
mod registry;
mod server;
mod service;

pub use adapter::{
    Adapter, HandleReport, ListenerAdapter, ListenerFailure, PullRequestAdapter, PushAdapter,
};
pub use config::{Config, ConfigError, ListenersConfig, ServerConfig};
pub use dispatcher::{Dispatch, Dispatcher};
pub use error::{Error, Result};
pub use listener::{EventKind, Listener, PullRequestKind, PushKind};
pub use registry::{ListenerFactory, Registry};
pub use server::Server;
pub use service::{run_serve, ServeOptions};
