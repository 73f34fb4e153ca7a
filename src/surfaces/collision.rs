//! Collision shapes and the bind/unbind snapshot cache

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{CollisionChannel, CollisionEnabled, CollisionResponse, ShapeId};

/// Physical configuration of one scene collision surface
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionShape {
    pub overlap_events: bool,
    pub collision_enabled: CollisionEnabled,
    /// Per-channel overrides; channels not listed use `default_response`
    pub responses: AHashMap<CollisionChannel, CollisionResponse>,
    pub default_response: CollisionResponse,
}

impl CollisionShape {
    pub fn new(collision_enabled: CollisionEnabled) -> Self {
        Self {
            overlap_events: false,
            collision_enabled,
            responses: AHashMap::new(),
            default_response: CollisionResponse::Block,
        }
    }

    pub fn with_overlap_events(mut self, enabled: bool) -> Self {
        self.overlap_events = enabled;
        self
    }

    pub fn with_response(mut self, channel: CollisionChannel, response: CollisionResponse) -> Self {
        self.responses.insert(channel, response);
        self
    }

    pub fn response_to(&self, channel: CollisionChannel) -> CollisionResponse {
        self.responses
            .get(&channel)
            .copied()
            .unwrap_or(self.default_response)
    }

    pub fn set_response(&mut self, channel: CollisionChannel, response: CollisionResponse) {
        self.responses.insert(channel, response);
    }

    /// Does this shape currently generate overlaps on `channel`?
    pub fn overlaps_on(&self, channel: CollisionChannel) -> bool {
        self.overlap_events
            && self.collision_enabled != CollisionEnabled::NoCollision
            && self.collision_enabled != CollisionEnabled::PhysicsOnly
            && self.response_to(channel) == CollisionResponse::Overlap
    }
}

/// Pre-bind configuration of a shape, restored on unbind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSnapshot {
    pub overlap_events: bool,
    pub collision_enabled: CollisionEnabled,
    pub channel: CollisionChannel,
    /// Override entry for `channel`; `None` when the shape used its default
    pub channel_override: Option<CollisionResponse>,
}

impl ShapeSnapshot {
    pub fn capture(shape: &CollisionShape, channel: CollisionChannel) -> Self {
        Self {
            overlap_events: shape.overlap_events,
            collision_enabled: shape.collision_enabled,
            channel,
            channel_override: shape.responses.get(&channel).copied(),
        }
    }

    fn restore(&self, shape: &mut CollisionShape) {
        shape.overlap_events = self.overlap_events;
        shape.collision_enabled = self.collision_enabled;
        match self.channel_override {
            Some(response) => shape.set_response(self.channel, response),
            None => {
                shape.responses.remove(&self.channel);
            }
        }
    }
}

/// Snapshots of every shape an interactable currently has bound
#[derive(Debug, Clone, Default)]
pub struct ShapeCache {
    entries: AHashMap<ShapeId, ShapeSnapshot>,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }

    /// Configure `shape` to generate overlaps on `channel`
    ///
    /// Only the first bind records a snapshot; binding an already bound shape
    /// re-applies the overlap settings without touching the snapshot.
    pub fn bind(&mut self, id: ShapeId, shape: &mut CollisionShape, channel: CollisionChannel) {
        self.entries
            .entry(id)
            .or_insert_with(|| ShapeSnapshot::capture(shape, channel));

        shape.overlap_events = true;
        shape.set_response(channel, CollisionResponse::Overlap);
        if shape.collision_enabled == CollisionEnabled::NoCollision {
            shape.collision_enabled = CollisionEnabled::QueryOnly;
        }
    }

    /// Restore the pre-bind configuration; returns false if `id` was not bound
    pub fn unbind(&mut self, id: ShapeId, shape: &mut CollisionShape) -> bool {
        match self.entries.remove(&id) {
            Some(snapshot) => {
                snapshot.restore(shape);
                true
            }
            None => false,
        }
    }

    /// Drop a snapshot without restoring it (the shape itself is gone)
    pub fn forget(&mut self, id: ShapeId) {
        self.entries.remove(&id);
    }

    pub fn is_bound(&self, id: ShapeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn snapshot(&self, id: ShapeId) -> Option<&ShapeSnapshot> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_of(shape: &CollisionShape, channel: CollisionChannel) -> ShapeSnapshot {
        ShapeSnapshot::capture(shape, channel)
    }

    #[test]
    fn test_bind_enables_overlaps() {
        let mut cache = ShapeCache::new();
        let mut shape = CollisionShape::new(CollisionEnabled::NoCollision);
        cache.bind(ShapeId(0), &mut shape, CollisionChannel::Visibility);

        assert!(shape.overlap_events);
        assert_eq!(shape.collision_enabled, CollisionEnabled::QueryOnly);
        assert!(shape.overlaps_on(CollisionChannel::Visibility));
        assert!(cache.is_bound(ShapeId(0)));
    }

    #[test]
    fn test_unbind_restores_exact_configuration() {
        let mut cache = ShapeCache::new();
        let mut shape = CollisionShape::new(CollisionEnabled::PhysicsOnly)
            .with_response(CollisionChannel::Camera, CollisionResponse::Ignore);
        let before = config_of(&shape, CollisionChannel::Camera);

        cache.bind(ShapeId(1), &mut shape, CollisionChannel::Camera);
        assert!(cache.unbind(ShapeId(1), &mut shape));

        assert_eq!(config_of(&shape, CollisionChannel::Camera), before);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_double_bind_keeps_first_snapshot() {
        let mut cache = ShapeCache::new();
        let mut shape = CollisionShape::new(CollisionEnabled::NoCollision);
        let before = config_of(&shape, CollisionChannel::Visibility);

        cache.bind(ShapeId(2), &mut shape, CollisionChannel::Visibility);
        cache.bind(ShapeId(2), &mut shape, CollisionChannel::Visibility);
        cache.unbind(ShapeId(2), &mut shape);

        assert_eq!(config_of(&shape, CollisionChannel::Visibility), before);
    }

    #[test]
    fn test_unbind_without_bind_changes_nothing() {
        let mut cache = ShapeCache::new();
        let mut shape = CollisionShape::new(CollisionEnabled::QueryAndPhysics);
        let before = shape.clone();

        assert!(!cache.unbind(ShapeId(3), &mut shape));
        assert_eq!(shape, before);
    }

    #[test]
    fn test_repeated_cycles_do_not_drift() {
        let mut cache = ShapeCache::new();
        let mut shape = CollisionShape::new(CollisionEnabled::NoCollision)
            .with_response(CollisionChannel::Visibility, CollisionResponse::Block);
        let before = shape.clone();

        for _ in 0..5 {
            cache.bind(ShapeId(4), &mut shape, CollisionChannel::Visibility);
            cache.unbind(ShapeId(4), &mut shape);
        }

        assert_eq!(shape, before);
    }
}
