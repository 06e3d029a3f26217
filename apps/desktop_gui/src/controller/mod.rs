//! Controller layer: UI events, modal state transitions, and command orchestration.

pub mod events;
pub mod modal;
pub mod orchestration;
