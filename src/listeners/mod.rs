//! The listeners shipped with hookshot, addressable by name from the config file.

mod pulls;
mod push;

pub use self::{pulls::AutomaticPr, push::DcoCheck};

use crate::{
    listener::{Listener, PullRequestKind, PushKind},
    registry::ListenerFactory,
};
use std::sync::Arc;

pub fn pull_request_listener(name: &str) -> Option<ListenerFactory<PullRequestKind>> {
    match name {
        AutomaticPr::NAME => Some(Arc::new(|| -> Box<dyn Listener<PullRequestKind>> {
            Box::new(AutomaticPr)
        })),
        _ => None,
    }
}

pub fn push_listener(name: &str) -> Option<ListenerFactory<PushKind>> {
    match name {
        DcoCheck::NAME => Some(Arc::new(|| -> Box<dyn Listener<PushKind>> {
            Box::new(DcoCheck)
        })),
        _ => None,
    }
}
