pub mod entry;
pub mod status;

pub use entry::{Entry, EntryInput, NewEntry};
pub use status::Status;
