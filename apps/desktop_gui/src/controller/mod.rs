//! Controller layer: carousel timing state, UI events, and command
//! orchestration.

pub mod carousel;
pub mod events;
pub mod orchestration;
