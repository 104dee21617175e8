pub mod debounce;
pub mod mutations;
pub mod sync;

pub use debounce::Debouncer;
pub use mutations::{Mutation, MutationQueue, PendingMutation};
pub use sync::{ListingSync, MutationFailure, Notice, Outgoing, Phase, ResponseOutcome};
