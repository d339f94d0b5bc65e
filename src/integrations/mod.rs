pub mod gemini;
pub mod slack;

pub use gemini::GeminiClient;
pub use slack::{channels_from_config, SlackBot, SlackWebhook};

use crate::summary::{SummaryDispatcher, SummaryGenerator};
use crate::utils::config::Config;

/// Dispatcher wired to whichever collaborators the environment configures.
pub fn dispatcher_from_config(config: &Config) -> SummaryDispatcher {
    let generator = GeminiClient::from_config(config)
        .map(|client| Box::new(client) as Box<dyn SummaryGenerator>);
    SummaryDispatcher::new(generator, channels_from_config(config))
}
