use bytes::Bytes;
use hyper::HeaderMap;
use serde::de::DeserializeOwned;
use std::{collections::HashMap, fmt, str::FromStr};
use thiserror::Error;

/// The GitHub header key used to pass the event type
///
/// Github API docs: https://developer.github.com/webhooks/#delivery-headers
pub const EVENT_TYPE_HEADER: &str = "X-Github-Event";

/// The GitHub header key used to pass the unique ID for the webhook event
///
/// Github API docs: https://developer.github.com/webhooks/#delivery-headers
pub const DELIVERY_ID_HEADER: &str = "X-Github-Delivery";

/// The event types this crate knows how to dispatch.
///
/// Matching is exact and case-sensitive, `"Push"` is not `"push"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    PullRequest,
    Push,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::PullRequest => "pull_request",
            EventType::Push => "push",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("unhandled github webhook event `{0}`")]
pub struct ParseEventTypeError(pub String);

impl FromStr for EventType {
    type Err = ParseEventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pull_request" => Ok(EventType::PullRequest),
            "push" => Ok(EventType::Push),
            _ => Err(ParseEventTypeError(s.to_owned())),
        }
    }
}

/// A set of request headers the dispatcher can read the event type from.
///
/// Header names are compared ASCII case-insensitively, like HTTP does.
pub trait EventHeaders {
    fn header(&self, name: &str) -> Option<&str>;

    fn event_type_raw(&self) -> Option<&str> {
        self.header(EVENT_TYPE_HEADER)
    }

    fn delivery_id(&self) -> Option<&str> {
        self.header(DELIVERY_ID_HEADER)
    }
}

impl EventHeaders for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|h| h.to_str().ok())
    }
}

/// An exact key wins. Otherwise the name must match exactly one key ignoring
/// case; several spellings of the same header make it unreadable.
impl EventHeaders for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.get(name) {
            return Some(value.as_str());
        }

        let mut matches = self
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str());
        match (matches.next(), matches.next()) {
            (Some(value), None) => Some(value),
            _ => None,
        }
    }
}

/// The body of a webhook delivery.
///
/// The dispatcher never looks inside; listeners decide how to read it.
/// Cloning is cheap and shares the underlying buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload(Bytes);

impl Payload {
    pub fn new<B: Into<Bytes>>(body: B) -> Self {
        Payload(body.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.0)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(body: Vec<u8>) -> Self {
        Payload::new(body)
    }
}

impl From<&'static str> for Payload {
    fn from(body: &'static str) -> Self {
        Payload::new(body)
    }
}

#[cfg(test)]
mod test {
    use super::{EventHeaders, EventType, Payload};
    use hyper::HeaderMap;
    use std::collections::HashMap;

    #[test]
    fn event_type_is_case_sensitive() {
        assert_eq!("pull_request".parse::<EventType>().unwrap(), EventType::PullRequest);
        assert_eq!("push".parse::<EventType>().unwrap(), EventType::Push);
        assert!("Push".parse::<EventType>().is_err());
        assert!("PULL_REQUEST".parse::<EventType>().is_err());
        assert!("issue_comment".parse::<EventType>().is_err());
        assert!("".parse::<EventType>().is_err());
    }

    #[test]
    fn header_names_are_case_insensitive() {
        let mut map = HashMap::new();
        map.insert("x-github-event".to_owned(), "push".to_owned());
        assert_eq!(map.event_type_raw(), Some("push"));

        let mut headers = HeaderMap::new();
        headers.insert("x-github-event", "pull_request".parse().unwrap());
        assert_eq!(headers.event_type_raw(), Some("pull_request"));
        assert_eq!(headers.delivery_id(), None);
    }

    #[test]
    fn mixed_case_duplicate_headers() {
        // the exact spelling is preferred over other casings
        let mut map = HashMap::new();
        map.insert("X-Github-Event".to_owned(), "push".to_owned());
        map.insert("x-github-event".to_owned(), "issue_comment".to_owned());
        for _ in 0..64 {
            assert_eq!(map.event_type_raw(), Some("push"));
        }

        // with no exact spelling, two casings are ambiguous
        let mut map = HashMap::new();
        map.insert("x-github-event".to_owned(), "push".to_owned());
        map.insert("X-GITHUB-EVENT".to_owned(), "issue_comment".to_owned());
        assert_eq!(map.event_type_raw(), None);
    }

    #[test]
    fn payload_json() {
        let payload = Payload::from(r#"{"action": "opened", "number": 42}"#);
        let value: serde_json::Value = payload.json().unwrap();
        assert_eq!(value["number"], 42);
        assert!(Payload::from("not json").json::<serde_json::Value>().is_err());
    }
}
