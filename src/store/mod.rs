// Conversation storage: message records, local snapshot, remote mirror

mod conversation;
pub mod local;
mod message;
mod mirror;

pub use conversation::Conversation;
pub use local::{LocalStorage, MESSAGES_KEY, NARRATION_KEY};
pub use message::{Message, MessageType, Sender};
pub use mirror::{create_mirror, mirror_detached, MessageMirror, NoopMirror, SupabaseMirror};
