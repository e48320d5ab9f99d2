//! Agent event bus.
//!
//! Agents publish what happened during a tick; hosts drain the queue
//! afterwards for UI, audio cues, or logging.

use crossbeam_channel::{bounded, Receiver, Sender};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use sentinel_common::AgentId;

use crate::noise::Rejection;
use crate::states::StateKind;

/// Something observable an agent did or noticed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentEvent {
    /// Behavior state changed
    StateChanged {
        /// Agent
        agent: AgentId,
        /// Previous state
        from: StateKind,
        /// New state
        to: StateKind,
    },
    /// Target came into view
    TargetSighted {
        /// Agent
        agent: AgentId,
        /// Where it was seen
        position: Vec3,
    },
    /// Target left view
    TargetLost {
        /// Agent
        agent: AgentId,
        /// Last confirmed position
        last_known: Vec3,
    },
    /// A noise was taken up for investigation
    NoiseClaimed {
        /// Agent
        agent: AgentId,
        /// Priority it won with
        priority: f32,
        /// Source of the noise
        source: Vec3,
    },
    /// A noise was ignored
    NoiseRejected {
        /// Agent
        agent: AgentId,
        /// Why
        reason: Rejection,
    },
    /// An attack connected at the end of its wind-up
    StrikeLanded {
        /// Agent
        agent: AgentId,
        /// Where the blow was aimed
        aim: Vec3,
    },
    /// An attack was cut short before its wind-up finished
    StrikeAbandoned {
        /// Agent
        agent: AgentId,
    },
}

impl AgentEvent {
    /// Agent the event belongs to.
    #[must_use]
    pub const fn agent(&self) -> AgentId {
        match self {
            Self::StateChanged { agent, .. }
            | Self::TargetSighted { agent, .. }
            | Self::TargetLost { agent, .. }
            | Self::NoiseClaimed { agent, .. }
            | Self::NoiseRejected { agent, .. }
            | Self::StrikeLanded { agent, .. }
            | Self::StrikeAbandoned { agent } => *agent,
        }
    }
}

/// Bounded queue of agent events.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for publishing events
    sender: Sender<AgentEvent>,
    /// Receiver for collecting events
    receiver: Receiver<AgentEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event. When the queue is full the event is dropped.
    pub fn publish(&self, event: AgentEvent) {
        if self.sender.try_send(event).is_err() {
            tracing::trace!("event queue full, dropping event");
        }
    }

    /// Drains all pending events in publication order.
    pub fn drain(&self) -> Vec<AgentEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle, e.g. for a host that merges several
    /// agents into one stream.
    #[must_use]
    pub fn sender(&self) -> Sender<AgentEvent> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain_in_order() {
        let bus = EventBus::new(8);
        let agent = AgentId::from_raw(7);
        bus.publish(AgentEvent::StrikeAbandoned { agent });
        bus.publish(AgentEvent::StateChanged {
            agent,
            from: StateKind::Attack,
            to: StateKind::Chase,
        });
        assert_eq!(bus.pending_count(), 2);

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AgentEvent::StrikeAbandoned { .. }));
        assert_eq!(events[1].agent(), agent);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops() {
        let bus = EventBus::new(1);
        let agent = AgentId::from_raw(1);
        bus.publish(AgentEvent::StrikeAbandoned { agent });
        bus.publish(AgentEvent::StrikeAbandoned { agent });
        assert_eq!(bus.drain().len(), 1);
    }

    #[test]
    fn test_sender_feeds_the_same_queue() {
        let bus = EventBus::new(4);
        let sender = bus.sender();
        sender
            .try_send(AgentEvent::StrikeAbandoned {
                agent: AgentId::from_raw(2),
            })
            .expect("queue has room");
        assert_eq!(bus.capacity(), 4);
        assert_eq!(bus.drain().len(), 1);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(EventBus::new(0).capacity(), 1);
    }

    #[test]
    fn test_event_serializes() {
        let event = AgentEvent::NoiseRejected {
            agent: AgentId::from_raw(3),
            reason: Rejection::Chasing,
        };
        let json = serde_json::to_string(&event).expect("event serializes");
        assert!(json.contains("NoiseRejected"));
        assert!(json.contains("Chasing"));
    }
}
