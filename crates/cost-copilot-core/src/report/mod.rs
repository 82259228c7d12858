pub mod briefing;

#[cfg(feature = "llm")]
pub mod chat_client;

pub use briefing::{format_currency, generate_briefing, BriefingRequest, NarrativeGenerator};
