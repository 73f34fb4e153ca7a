//! Overlap reports from the host's collision queries

use super::World;
use crate::core::types::{InteractableId, InteractorId};

impl World {
    /// Would `interactor` detect `interactable` right now?
    ///
    /// The interactor must be able to interact and not ignore the
    /// interactable's owner, the channels must match, and at least one of
    /// the interactable's shapes must overlap on that channel.
    pub fn can_detect(&self, interactor: InteractorId, interactable: InteractableId) -> bool {
        let (Some(seeker), Some(target)) = (
            self.interactors.get(&interactor),
            self.interactables.get(&interactable),
        ) else {
            return false;
        };

        if !seeker.is_valid() || !seeker.can_interact() || seeker.ignores(target.owner) {
            return false;
        }
        let channel = target.collision_channel();
        if seeker.response_channel() != channel || !target.can_be_triggered() {
            return false;
        }

        target
            .collision_shapes
            .iter()
            .filter_map(|s| self.shapes.get(s))
            .any(|shape| shape.overlaps_on(channel))
    }

    /// The host reports that `interactor` overlaps `interactable`
    ///
    /// Returns true when the interactable ends up bound to the interactor.
    pub fn report_overlap(&mut self, interactor: InteractorId, interactable: InteractableId) -> bool {
        if !self.can_detect(interactor, interactable) {
            return false;
        }
        self.interactor_found(interactable, interactor);

        self.interactables
            .get(&interactable)
            .is_some_and(|e| e.interactor == Some(interactor))
    }

    /// The host reports that an overlap ended
    pub fn report_overlap_end(&mut self, interactor: InteractorId, interactable: InteractableId) {
        self.interactor_lost(interactable, interactor);
    }
}
