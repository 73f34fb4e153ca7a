//! Weight-based choice between the current target and a new candidate

use crate::core::types::InteractableId;

/// A target under consideration: handle and its current weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contender {
    pub id: InteractableId,
    pub weight: i32,
}

impl Contender {
    pub fn new(id: InteractableId, weight: i32) -> Self {
        Self { id, weight }
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arbitration {
    /// The candidate becomes the active target
    Adopt(InteractableId),
    /// Nothing changes
    Keep,
    /// There is no candidate; drop the current target
    Release(InteractableId),
    /// No candidate and no target
    Idle,
}

/// Decide between the active target and a candidate
///
/// A different candidate replaces the active target only with a strictly
/// greater weight, so ties keep the incumbent.
pub fn arbitrate(active: Option<Contender>, candidate: Option<Contender>) -> Arbitration {
    match (active, candidate) {
        (None, None) => Arbitration::Idle,
        (Some(current), None) => Arbitration::Release(current.id),
        (None, Some(candidate)) => Arbitration::Adopt(candidate.id),
        (Some(current), Some(candidate)) => {
            if current.id == candidate.id || candidate.weight <= current.weight {
                Arbitration::Keep
            } else {
                Arbitration::Adopt(candidate.id)
            }
        }
    }
}
