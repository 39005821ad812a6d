//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{ScriptEvent, TickEvent, WorldEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Entity changes (movement, combat, items, levels)
    World,
    /// Script load failures, faults and reloads
    Script,
    /// Clock progress
    Tick,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::World, Topic::Script, Topic::Tick];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    World(WorldEvent),
    Script(ScriptEvent),
    Tick(TickEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::World(_) => Topic::World,
            Event::Script(_) => Topic::Script,
            Event::Tick(_) => Topic::Tick,
        }
    }
}

impl From<WorldEvent> for Event {
    fn from(event: WorldEvent) -> Self {
        Event::World(event)
    }
}

impl From<ScriptEvent> for Event {
    fn from(event: ScriptEvent) -> Self {
        Event::Script(event)
    }
}

impl From<TickEvent> for Event {
    fn from(event: TickEvent) -> Self {
        Event::Tick(event)
    }
}

/// Topic-based event bus
///
/// Every topic gets its channel up front, so publishing and subscribing
/// never need a lock.
#[derive(Clone)]
pub struct EventBus {
    world: broadcast::Sender<Event>,
    script: broadcast::Sender<Event>,
    tick: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            world: broadcast::channel(capacity).0,
            script: broadcast::channel(capacity).0,
            tick: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::World => &self.world,
            Topic::Script => &self.script,
            Topic::Tick => &self.tick,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::Tick;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut ticks = bus.subscribe(Topic::Tick);
        let mut scripts = bus.subscribe(Topic::Script);

        bus.publish(Event::Tick(TickEvent::Completed {
            tick: Tick(1),
            characters: 2,
        }));

        let received = ticks.recv().await.unwrap();
        assert_eq!(received.topic(), Topic::Tick);
        assert!(scripts.try_recv().is_err());
    }
}
