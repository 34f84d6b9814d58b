pub mod chat;
pub mod parser;
pub mod slots;

pub use chat::{ChatSession, DisplayableResponse};
pub use parser::{DocumentParser, PlainTextParser};
pub use slots::{SlotStatus, UploadSlots};
