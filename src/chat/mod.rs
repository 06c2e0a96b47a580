// Chat orchestration: session state machine and standing alerts

mod alerts;
mod session;

pub use alerts::{AlertState, ALERT_WINDOW};
pub use session::{text_digest, ChatSession, ChatState};
