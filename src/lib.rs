pub mod auth;
pub mod bus;
pub mod error;
pub mod interface;
pub mod language;
pub mod message;
pub mod session;
pub mod store;
pub mod translate;

pub use auth::{IdentityProvider, LocalIdentity, Principal};
pub use bus::{Event, EventBus, NoticeLevel};
pub use error::{Error, Result};
pub use language::Language;
pub use message::{Draft, Message};
pub use session::{ChatSession, SessionState};
pub use store::{MemoryStore, MessageStore, SqliteStore};
pub use translate::{DictionaryTranslator, RemoteTranslator, Translator};
