//! Server event types, envelope schema, and event bus.
//!
//! Memo mutations and the outcome of background tag enrichment are published
//! on a single broadcast channel. Subscribers (tests, log bridges, future
//! push channels) receive every event independently.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

// ============================================================================
// Event Envelope
// ============================================================================

/// Who or what caused an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventActor {
    /// Background tasks (enrichment).
    System,
    /// A request made through the API.
    User,
}

/// Versioned wrapper around a domain event.
///
/// The `event_type` field uses dot-namespaced names (e.g. `"memo.updated"`,
/// `"enrichment.completed"`).
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Unique event identifier (UUIDv7 for temporal ordering).
    pub event_id: Uuid,
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub actor: EventActor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo_id: Option<Uuid>,
    /// Payload schema version.
    pub payload_version: u32,
    pub payload: ServerEvent,
}

impl EventEnvelope {
    pub fn new(event: ServerEvent) -> Self {
        let actor = event.default_actor();
        Self::with_actor(event, actor)
    }

    pub fn with_actor(event: ServerEvent, actor: EventActor) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type: event.namespaced_event_type().to_string(),
            occurred_at: Utc::now(),
            actor,
            memo_id: event.memo_id(),
            payload_version: 1,
            payload: event,
        }
    }
}

// ============================================================================
// Server Event (domain payloads)
// ============================================================================

/// Domain events, serialized with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    MemoCreated {
        memo_id: Uuid,
    },
    MemoUpdated {
        memo_id: Uuid,
        tags: Vec<String>,
        has_summary: bool,
    },
    MemoDeleted {
        memo_id: Uuid,
    },
    MemosCleared,
    /// A summary was generated on request and persisted.
    SummaryGenerated {
        memo_id: Uuid,
    },
    /// Background enrichment merged and persisted tags.
    TagsEnriched {
        memo_id: Uuid,
        tags: Vec<String>,
    },
    /// Background enrichment failed in generation or while persisting.
    EnrichmentFailed {
        memo_id: Uuid,
        error: String,
    },
    /// Background enrichment was discarded because a newer edit landed.
    EnrichmentSuperseded {
        memo_id: Uuid,
    },
}

impl ServerEvent {
    /// Short variant name.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MemoCreated { .. } => "MemoCreated",
            Self::MemoUpdated { .. } => "MemoUpdated",
            Self::MemoDeleted { .. } => "MemoDeleted",
            Self::MemosCleared => "MemosCleared",
            Self::SummaryGenerated { .. } => "SummaryGenerated",
            Self::TagsEnriched { .. } => "TagsEnriched",
            Self::EnrichmentFailed { .. } => "EnrichmentFailed",
            Self::EnrichmentSuperseded { .. } => "EnrichmentSuperseded",
        }
    }

    /// Dot-namespaced event type used in envelopes.
    pub fn namespaced_event_type(&self) -> &'static str {
        match self {
            Self::MemoCreated { .. } => "memo.created",
            Self::MemoUpdated { .. } => "memo.updated",
            Self::MemoDeleted { .. } => "memo.deleted",
            Self::MemosCleared => "memo.cleared",
            Self::SummaryGenerated { .. } => "summary.generated",
            Self::TagsEnriched { .. } => "enrichment.completed",
            Self::EnrichmentFailed { .. } => "enrichment.failed",
            Self::EnrichmentSuperseded { .. } => "enrichment.superseded",
        }
    }

    /// Memo this event relates to, if any.
    pub fn memo_id(&self) -> Option<Uuid> {
        match self {
            Self::MemoCreated { memo_id }
            | Self::MemoUpdated { memo_id, .. }
            | Self::MemoDeleted { memo_id }
            | Self::SummaryGenerated { memo_id }
            | Self::TagsEnriched { memo_id, .. }
            | Self::EnrichmentFailed { memo_id, .. }
            | Self::EnrichmentSuperseded { memo_id } => Some(*memo_id),
            Self::MemosCleared => None,
        }
    }

    fn default_actor(&self) -> EventActor {
        match self {
            Self::TagsEnriched { .. }
            | Self::EnrichmentFailed { .. }
            | Self::EnrichmentSuperseded { .. } => EventActor::System,
            _ => EventActor::User,
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast hub for [`EventEnvelope`]s.
///
/// Uses `tokio::sync::broadcast` with a fixed buffer. Slow receivers lag and
/// drop old events rather than blocking emitters.
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Emit an event to all subscribers. Dropped when nobody listens.
    pub fn emit(&self, event: ServerEvent) {
        let envelope = EventEnvelope::new(event);
        let subscriber_count = self.tx.receiver_count();
        tracing::debug!(
            event_type = %envelope.event_type,
            event_id = %envelope.event_id,
            subscriber_count,
            "EventBus emit"
        );
        let _ = self.tx.send(envelope);
    }

    /// Subscribe to receive enveloped events.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::defaults::EVENT_BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_emit_subscribe() {
        let bus = EventBus::new(32);
        let mut rx = bus.subscribe();
        let id = Uuid::new_v4();

        bus.emit(ServerEvent::MemoCreated { memo_id: id });

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.event_type, "memo.created");
        assert_eq!(envelope.memo_id, Some(id));
        assert_eq!(envelope.actor, EventActor::User);
        assert_eq!(envelope.payload_version, 1);
    }

    #[tokio::test]
    async fn test_enrichment_events_are_system_actor() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(ServerEvent::TagsEnriched {
            memo_id: Uuid::nil(),
            tags: vec!["x".to_string()],
        });

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.actor, EventActor::System);
        assert_eq!(envelope.event_type, "enrichment.completed");
    }

    #[test]
    fn test_emit_without_subscribers_does_not_panic() {
        let bus = EventBus::new(4);
        assert_eq!(bus.subscriber_count(), 0);
        bus.emit(ServerEvent::MemosCleared);
    }

    #[test]
    fn test_envelope_serializes_type_tag() {
        let envelope = EventEnvelope::new(ServerEvent::MemoDeleted {
            memo_id: Uuid::nil(),
        });
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["payload"]["type"], "MemoDeleted");
        assert_eq!(json["event_type"], "memo.deleted");
        assert_eq!(json["actor"], "user");
    }

    #[test]
    fn test_cleared_has_no_memo_id() {
        assert!(ServerEvent::MemosCleared.memo_id().is_none());
        assert_eq!(ServerEvent::MemosCleared.event_type(), "MemosCleared");
    }
}
