//! Collision shapes and highlightable meshes attached to interactables

use super::World;
use crate::core::error::{InteractionError, Result};
use crate::core::types::{CollisionChannel, InteractableId, MeshId, ShapeId};
use crate::events::InteractableEvent;
use crate::surfaces::CollisionShape;

impl World {
    /// Register a scene collision shape
    pub fn spawn_shape(&mut self, shape: CollisionShape) -> ShapeId {
        let id = ShapeId(self.shape_ids.allocate());
        self.shapes.insert(id, shape);
        id
    }

    pub fn shape(&self, id: ShapeId) -> Result<&CollisionShape> {
        self.shapes.get(&id).ok_or(InteractionError::ShapeNotFound(id))
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Result<&mut CollisionShape> {
        self.shapes
            .get_mut(&id)
            .ok_or(InteractionError::ShapeNotFound(id))
    }

    /// Remove a shape from the scene, detaching it from every interactable
    pub fn despawn_shape(&mut self, id: ShapeId) -> bool {
        if self.shapes.remove(&id).is_none() {
            return false;
        }
        for entity in self.interactables.values_mut() {
            if entity.collision_shapes.contains(&id) {
                entity.collision_shapes.retain(|s| *s != id);
                entity.shape_cache.forget(id);
                entity
                    .events
                    .emit(&InteractableEvent::CollisionShapeRemoved(id));
            }
        }
        true
    }

    /// Attach a collision shape and bind it to the interactable's channel
    ///
    /// A shape belongs to at most one interactable; attaching a shape that
    /// another interactable already holds is ignored.
    pub fn add_collision_shape(&mut self, id: InteractableId, shape_id: ShapeId) -> Result<()> {
        if !self.interactables.contains_key(&id) {
            return Err(InteractionError::InteractableNotFound(id));
        }
        if let Some(holder) = self.shape_holder(shape_id).filter(|holder| *holder != id) {
            tracing::debug!(
                interactable = id.0,
                shape = shape_id.0,
                holder = holder.0,
                "Collision shape already attached elsewhere"
            );
            return Ok(());
        }

        let entity = self
            .interactables
            .get_mut(&id)
            .ok_or(InteractionError::InteractableNotFound(id))?;
        let shape = self
            .shapes
            .get_mut(&shape_id)
            .ok_or(InteractionError::ShapeNotFound(shape_id))?;

        if entity.collision_shapes.contains(&shape_id) {
            return Ok(());
        }
        let channel = entity.collision_channel();
        entity.collision_shapes.push(shape_id);
        entity.shape_cache.bind(shape_id, shape, channel);
        entity
            .events
            .emit(&InteractableEvent::CollisionShapeAdded(shape_id));
        Ok(())
    }

    /// The interactable a shape is attached to, if any
    pub fn shape_holder(&self, shape_id: ShapeId) -> Option<InteractableId> {
        self.interactables
            .iter()
            .find(|(_, entity)| entity.collision_shapes.contains(&shape_id))
            .map(|(id, _)| *id)
    }

    /// Detach a collision shape, restoring its original configuration
    pub fn remove_collision_shape(&mut self, id: InteractableId, shape_id: ShapeId) -> Result<()> {
        let entity = self
            .interactables
            .get_mut(&id)
            .ok_or(InteractionError::InteractableNotFound(id))?;
        if !entity.collision_shapes.contains(&shape_id) {
            return Ok(());
        }

        match self.shapes.get_mut(&shape_id) {
            Some(shape) => {
                entity.shape_cache.unbind(shape_id, shape);
            }
            None => entity.shape_cache.forget(shape_id),
        }
        entity.collision_shapes.retain(|s| *s != shape_id);
        entity
            .events
            .emit(&InteractableEvent::CollisionShapeRemoved(shape_id));
        Ok(())
    }

    /// Move the interactable to another channel, rebinding any bound shapes
    pub fn set_interactable_channel(&mut self, id: InteractableId, channel: CollisionChannel) -> Result<()> {
        let entity = self.interactable_mut(id)?;
        if entity.collision_channel() == channel {
            return Ok(());
        }
        let was_bound = !entity.shape_cache.is_empty();

        self.unbind_collisions(id);
        self.interactable_mut(id)?.set_collision_channel(channel);
        if was_bound {
            self.bind_collisions(id);
        }
        Ok(())
    }

    pub fn add_highlight_mesh(&mut self, id: InteractableId, mesh: MeshId) -> Result<()> {
        let entity = self.interactable_mut(id)?;
        if !entity.highlight_meshes.contains(&mesh) {
            entity.highlight_meshes.push(mesh);
            entity
                .events
                .emit(&InteractableEvent::HighlightableAdded(mesh));
        }
        Ok(())
    }

    pub fn remove_highlight_mesh(&mut self, id: InteractableId, mesh: MeshId) -> Result<()> {
        let entity = self.interactable_mut(id)?;
        if entity.highlight_meshes.contains(&mesh) {
            entity.highlight_meshes.retain(|m| *m != mesh);
            entity
                .events
                .emit(&InteractableEvent::HighlightableRemoved(mesh));
        }
        Ok(())
    }

    pub(crate) fn bind_collisions(&mut self, id: InteractableId) {
        let Some(entity) = self.interactables.get_mut(&id) else {
            return;
        };
        let channel = entity.collision_channel();
        for shape_id in &entity.collision_shapes {
            if let Some(shape) = self.shapes.get_mut(shape_id) {
                entity.shape_cache.bind(*shape_id, shape, channel);
            }
        }
    }

    pub(crate) fn unbind_collisions(&mut self, id: InteractableId) {
        let Some(entity) = self.interactables.get_mut(&id) else {
            return;
        };
        for shape_id in &entity.collision_shapes {
            if let Some(shape) = self.shapes.get_mut(shape_id) {
                entity.shape_cache.unbind(*shape_id, shape);
            }
        }
    }

    /// Drop every shape and mesh; used once an interactable completes
    pub(crate) fn release_surfaces(&mut self, id: InteractableId) {
        self.unbind_collisions(id);
        let Some(entity) = self.interactables.get_mut(&id) else {
            return;
        };
        for shape_id in std::mem::take(&mut entity.collision_shapes) {
            entity.shape_cache.forget(shape_id);
            entity
                .events
                .emit(&InteractableEvent::CollisionShapeRemoved(shape_id));
        }
        for mesh in std::mem::take(&mut entity.highlight_meshes) {
            entity
                .events
                .emit(&InteractableEvent::HighlightableRemoved(mesh));
        }
    }

    pub(crate) fn start_highlight(&mut self, id: InteractableId) {
        if let Some(entity) = self.interactables.get(&id) {
            self.highlighter.show(id, &entity.highlight_meshes);
        }
    }

    pub(crate) fn stop_highlight(&mut self, id: InteractableId) {
        if let Some(entity) = self.interactables.get(&id) {
            self.highlighter.hide(id, &entity.highlight_meshes);
        }
    }

    pub(crate) fn set_widget_visible(&mut self, id: InteractableId, visible: bool) {
        if self.interactables.contains_key(&id) {
            self.highlighter.set_widget_visible(id, visible);
        }
    }
}
