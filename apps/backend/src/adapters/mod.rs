//! Adapters for external dependencies.

pub mod participants_sea;
pub mod sessions_sea;
pub mod word_assignments_sea;
