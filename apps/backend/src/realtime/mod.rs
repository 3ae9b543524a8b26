pub mod hub;

pub use hub::{SessionEvent, SessionHub};
