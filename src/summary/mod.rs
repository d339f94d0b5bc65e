pub mod dispatcher;
pub mod formatter;

pub use dispatcher::{DeliveryChannel, GenerationFailure, SummaryDispatcher, SummaryGenerator};
pub use formatter::{build_prompt, NO_PENDING_MESSAGE};
