//! Domain event model.
//!
//! A domain event is an immutable fact about something that happened in the
//! newsroom domain. Every event carries a stable identity (`EventId`), the
//! moment it occurred, and a kind-specific payload. The kind tag doubles as
//! the wire `event_type` string, so the in-process dispatch key and the
//! serialized discriminator are always the same value.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::Timestamp;

/// Unique identifier for events (used for deduplication and acknowledgement).
///
/// Uses a String internally to allow for various ID formats (UUID, ULID, etc.)
/// while maintaining serializability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Creates a new random EventId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an EventId from an existing string.
    ///
    /// No validation is performed - any non-empty string is accepted.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of event kinds known to this process.
///
/// The `as_str` form is the wire `event_type` discriminator and the routing
/// suffix for broker channels (`domain.<event_type>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainEventKind {
    AuthorDeleted,
    NewsArticlePublished,
}

impl DomainEventKind {
    /// The wire `event_type` string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainEventKind::AuthorDeleted => "AuthorDeleted",
            DomainEventKind::NewsArticlePublished => "NewsArticlePublished",
        }
    }

    /// Resolves a wire `event_type` string back to a kind.
    pub fn from_event_type(s: &str) -> Option<Self> {
        match s {
            "AuthorDeleted" => Some(DomainEventKind::AuthorDeleted),
            "NewsArticlePublished" => Some(DomainEventKind::NewsArticlePublished),
            _ => None,
        }
    }
}

impl fmt::Display for DomainEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An author was removed from the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDeleted {
    pub event_id: EventId,
    pub date_occurred: Timestamp,
    pub author_id: String,
}

/// A draft was published as a news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticlePublished {
    pub event_id: EventId,
    pub date_occurred: Timestamp,
    pub news_article_id: String,
    pub author_id: String,
}

/// A domain event, one variant per kind.
///
/// Events are immutable after construction. Two events are distinct entities
/// even when their payloads match, unless their `event_id`s match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    AuthorDeleted(AuthorDeleted),
    NewsArticlePublished(NewsArticlePublished),
}

impl DomainEvent {
    /// Creates an `AuthorDeleted` event occurring now, with a fresh id.
    pub fn author_deleted(author_id: impl Into<String>) -> Self {
        DomainEvent::AuthorDeleted(AuthorDeleted {
            event_id: EventId::new(),
            date_occurred: Timestamp::now(),
            author_id: author_id.into(),
        })
    }

    /// Creates a `NewsArticlePublished` event occurring now, with a fresh id.
    pub fn news_article_published(
        news_article_id: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        DomainEvent::NewsArticlePublished(NewsArticlePublished {
            event_id: EventId::new(),
            date_occurred: Timestamp::now(),
            news_article_id: news_article_id.into(),
            author_id: author_id.into(),
        })
    }

    /// Returns this event's kind tag.
    pub fn kind(&self) -> DomainEventKind {
        match self {
            DomainEvent::AuthorDeleted(_) => DomainEventKind::AuthorDeleted,
            DomainEvent::NewsArticlePublished(_) => DomainEventKind::NewsArticlePublished,
        }
    }

    /// Returns the event's stable identity.
    pub fn event_id(&self) -> &EventId {
        match self {
            DomainEvent::AuthorDeleted(e) => &e.event_id,
            DomainEvent::NewsArticlePublished(e) => &e.event_id,
        }
    }

    /// Returns when the event occurred.
    pub fn date_occurred(&self) -> Timestamp {
        match self {
            DomainEvent::AuthorDeleted(e) => e.date_occurred,
            DomainEvent::NewsArticlePublished(e) => e.date_occurred,
        }
    }

    /// Serializes the event to its canonical JSON representation.
    ///
    /// Keys appear in a fixed order: `event_type`, `event_id`,
    /// `date_occurred`, then the variant's payload fields.
    pub fn to_wire_json(&self) -> String {
        #[derive(Serialize)]
        struct AuthorDeletedWire<'a> {
            event_type: &'static str,
            event_id: &'a EventId,
            date_occurred: Timestamp,
            author_id: &'a str,
        }

        #[derive(Serialize)]
        struct NewsArticlePublishedWire<'a> {
            event_type: &'static str,
            event_id: &'a EventId,
            date_occurred: Timestamp,
            news_article_id: &'a str,
            author_id: &'a str,
        }

        let json = match self {
            DomainEvent::AuthorDeleted(e) => serde_json::to_string(&AuthorDeletedWire {
                event_type: self.kind().as_str(),
                event_id: &e.event_id,
                date_occurred: e.date_occurred,
                author_id: &e.author_id,
            }),
            DomainEvent::NewsArticlePublished(e) => {
                serde_json::to_string(&NewsArticlePublishedWire {
                    event_type: self.kind().as_str(),
                    event_id: &e.event_id,
                    date_occurred: e.date_occurred,
                    news_article_id: &e.news_article_id,
                    author_id: &e.author_id,
                })
            }
        };
        json.expect("event serialization should never fail for well-formed events")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_timestamp() -> Timestamp {
        Timestamp::from_datetime("2023-01-01T12:00:00Z".parse().unwrap())
    }

    #[test]
    fn event_id_generates_unique_values() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn event_id_from_string_preserves_value() {
        let id = EventId::from_string("evt-123");
        assert_eq!(id.as_str(), "evt-123");
    }

    #[test]
    fn kind_round_trips_through_event_type_string() {
        for kind in [
            DomainEventKind::AuthorDeleted,
            DomainEventKind::NewsArticlePublished,
        ] {
            assert_eq!(DomainEventKind::from_event_type(kind.as_str()), Some(kind));
        }
        assert_eq!(DomainEventKind::from_event_type("Unknown"), None);
    }

    #[test]
    fn author_deleted_serializes_with_fixed_key_order() {
        let event = DomainEvent::AuthorDeleted(AuthorDeleted {
            event_id: EventId::from_string("11111111-1111-1111-1111-111111111111"),
            date_occurred: fixed_timestamp(),
            author_id: "a1".to_string(),
        });
        assert_eq!(
            event.to_wire_json(),
            "{\
             \"event_type\":\"AuthorDeleted\",\
             \"event_id\":\"11111111-1111-1111-1111-111111111111\",\
             \"date_occurred\":\"2023-01-01T12:00:00Z\",\
             \"author_id\":\"a1\"}"
        );
    }

    #[test]
    fn news_article_published_serializes_with_fixed_key_order() {
        let event = DomainEvent::NewsArticlePublished(NewsArticlePublished {
            event_id: EventId::from_string("evt-2"),
            date_occurred: fixed_timestamp(),
            news_article_id: "n1".to_string(),
            author_id: "a1".to_string(),
        });
        assert_eq!(
            event.to_wire_json(),
            "{\
             \"event_type\":\"NewsArticlePublished\",\
             \"event_id\":\"evt-2\",\
             \"date_occurred\":\"2023-01-01T12:00:00Z\",\
             \"news_article_id\":\"n1\",\
             \"author_id\":\"a1\"}"
        );
    }

    #[test]
    fn constructors_assign_fresh_ids() {
        let first = DomainEvent::author_deleted("a1");
        let second = DomainEvent::author_deleted("a1");
        assert_ne!(first.event_id(), second.event_id());
        assert_eq!(first.kind(), DomainEventKind::AuthorDeleted);
    }
}
