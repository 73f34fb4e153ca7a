//! Visual feedback contract
//!
//! Highlighting and the prompt widget are pure presentation: the state
//! machines tell the host what to show and never read anything back.

use crate::core::types::{InteractableId, MeshId};

/// Host-provided presentation hooks
pub trait Highlighter {
    fn show(&mut self, owner: InteractableId, meshes: &[MeshId]);

    fn hide(&mut self, owner: InteractableId, meshes: &[MeshId]);

    /// Show or hide the interaction prompt of `owner`
    fn set_widget_visible(&mut self, _owner: InteractableId, _visible: bool) {}
}

/// Highlighter that ignores every request
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHighlighter;

impl Highlighter for NullHighlighter {
    fn show(&mut self, _owner: InteractableId, _meshes: &[MeshId]) {}

    fn hide(&mut self, _owner: InteractableId, _meshes: &[MeshId]) {}
}
