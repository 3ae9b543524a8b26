pub mod session_path;

pub use session_path::{ParticipantPath, SessionPath};
