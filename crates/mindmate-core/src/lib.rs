pub mod backend;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use backend::{ChatBackend, ChatReply, HttpBackend, MoodStore};
pub use config::AppConfig;
pub use error::MindmateError;
pub use session::{SendOutcome, SessionStore};
pub use types::{ChatModel, Message, MoodEntry, Role};
