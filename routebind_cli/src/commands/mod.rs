//! The fixed demo sequence, one module per API surface.

pub mod github;
pub mod states;
