//! Outbound ポート: アプリが外界を使うための trait

pub mod chat_completion;
pub mod chat_id_generator;
pub mod chat_store;
pub mod interrupt_checker;
pub mod settings_store;

pub use chat_completion::ChatCompletion;
pub use chat_id_generator::ChatIdGenerator;
pub use chat_store::ChatStore;
pub use interrupt_checker::InterruptChecker;
pub use settings_store::SettingsStore;
