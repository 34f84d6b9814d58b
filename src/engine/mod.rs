pub mod decision;
pub mod router;

pub use decision::{parse_tool_calls, Decision, DecisionLoop};
pub use router::{DispatchOutcome, Dispatcher, Route};
