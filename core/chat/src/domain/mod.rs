//! chat 固有のドメイン型（型と不変条件）

pub mod chat;
pub mod command;
pub mod settings;
pub mod stream;

pub use chat::{remove_exchange, title_from_prompt, ChatIndex, ChatIndexEntry};
pub use command::ChatCommand;
pub use settings::Settings;
pub use stream::{StreamOutcome, StreamSession, StreamState};
