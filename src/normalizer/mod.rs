pub mod extract;
pub mod json_repair;
pub mod structured;

pub use extract::{extract_from_value, extract_text, RawResponse};
pub use json_repair::{fallback_structure, repair_json, try_repair_json, FALLBACK_SKILL, LEVELS};
pub use structured::{AnswerSheet, QaPair, QuestionBank};
