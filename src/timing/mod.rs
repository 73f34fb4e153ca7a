//! Scheduling contract consumed by the state machines
//!
//! Every long-running interaction is a single-fire, cancelable timer keyed by
//! owner and purpose. Host engines can plug their own clock in through
//! [`Scheduler`]; [`TimerQueue`] is the stand-alone implementation driven by
//! [`crate::world::World::advance`].

pub mod scheduler;
pub mod timer_queue;

pub use scheduler::{Scheduler, TimerKey, TimerPurpose};
pub use timer_queue::TimerQueue;
