//! Client side: persisted conversation and selection state, the catalog,
//! and the session that relays the transcript to the gateway.

pub mod catalog;
pub mod conversation;
pub mod reply;
pub mod selection;
pub mod session;
pub mod storage;
pub mod transport;

// Re-export commonly used types
pub use catalog::{Catalog, Product, ProductId};
pub use conversation::ConversationStore;
pub use reply::{extract_reply_text, interpret_reply, RawReply, ReplyOutcome};
pub use selection::SelectionStore;
pub use session::{Command, DisplayLine, Outcome, Session};
pub use storage::{FileStorage, MemoryStorage, StateStorage, StorageError};
pub use transport::{HttpRelayClient, RelayClientError, RelayTransport};
