mod directory;
mod message_store;

pub use directory::{FixtureError, InMemoryDirectory};
pub use message_store::{InMemoryMessageStore, StoredMessage};
