pub mod participants;
pub mod sessions;
pub mod word_assignments;

pub use participants::Entity as Participants;
pub use participants::Model as ParticipantRow;
pub use sessions::Entity as Sessions;
pub use sessions::Model as SessionRow;
pub use word_assignments::Entity as WordAssignments;
pub use word_assignments::Model as WordAssignmentRow;
