//! Scene surfaces the interactables bind to
//!
//! Collision shapes and highlightable meshes belong to the scene; an
//! interactable only holds their handles. Binding a collision shape snapshots
//! its configuration so unbinding can put it back exactly.

pub mod collision;
pub mod highlight;

pub use collision::{CollisionShape, ShapeCache, ShapeSnapshot};
pub use highlight::{Highlighter, NullHighlighter};
