//! Types for Github webhooks
//! https://developer.github.com/webhooks/

mod events;
mod webhook;

pub use events::*;
pub use webhook::*;
