//! Generation and delivery of todo summaries. Each call makes at most one
//! outbound request and never retries.

use super::formatter::{self, NO_PENDING_MESSAGE};
use crate::models::{DeliveryReceipt, SummaryTodo};
use crate::utils::errors::{AppError, AppResult};
use async_trait::async_trait;

/// Failure message reported by a generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFailure(pub String);

#[async_trait(?Send)]
pub trait SummaryGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure>;
}

/// One way of getting a summary into the team chat.
#[async_trait(?Send)]
pub trait DeliveryChannel {
    fn name(&self) -> &'static str;

    async fn deliver(&self, message: &str) -> AppResult<DeliveryReceipt>;
}

pub fn chat_message(summary: &str) -> String {
    format!("*Todo Summary*\n\n{}", summary)
}

pub struct SummaryDispatcher {
    generator: Option<Box<dyn SummaryGenerator>>,
    /// Highest priority first. Only the first configured channel is used.
    channels: Vec<Box<dyn DeliveryChannel>>,
}

impl SummaryDispatcher {
    pub fn new(
        generator: Option<Box<dyn SummaryGenerator>>,
        channels: Vec<Box<dyn DeliveryChannel>>,
    ) -> Self {
        Self { generator, channels }
    }

    /// Fails with `Configuration` when no generation service is configured.
    pub fn require_generator(&self) -> AppResult<&dyn SummaryGenerator> {
        self.generator
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Gemini API key is missing".into()))
    }

    pub async fn generate(&self, todos: &[SummaryTodo]) -> AppResult<String> {
        let generator = self.require_generator()?;

        let prompt = match formatter::build_prompt(todos) {
            Some(prompt) => prompt,
            None => return Ok(NO_PENDING_MESSAGE.to_string()),
        };

        generator
            .generate(&prompt)
            .await
            .map_err(|GenerationFailure(message)| AppError::from_generation_failure(message))
    }

    pub async fn deliver(&self, summary: Option<&str>) -> AppResult<DeliveryReceipt> {
        let summary = summary
            .filter(|s| !s.is_empty())
            .ok_or(AppError::MissingSummary)?;

        let channel = self.channels.first().ok_or(AppError::DeliveryConfigMissing)?;
        channel.deliver(&chat_message(summary)).await
    }

    pub fn delivery_channel(&self) -> Option<&'static str> {
        self.channels.first().map(|c| c.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeGenerator {
        calls: Rc<RefCell<Vec<String>>>,
        reply: Result<String, GenerationFailure>,
    }

    #[async_trait(?Send)]
    impl SummaryGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationFailure> {
            self.calls.borrow_mut().push(prompt.to_string());
            self.reply.clone()
        }
    }

    struct FakeChannel {
        name: &'static str,
        sent: Rc<RefCell<Vec<(&'static str, String)>>>,
        fail: bool,
    }

    #[async_trait(?Send)]
    impl DeliveryChannel for FakeChannel {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn deliver(&self, message: &str) -> AppResult<DeliveryReceipt> {
            self.sent.borrow_mut().push((self.name, message.to_string()));
            if self.fail {
                return Err(AppError::Delivery(format!("{} failed", self.name)));
            }
            Ok(DeliveryReceipt {
                message: format!("sent via {}", self.name),
                slack_response: None,
            })
        }
    }

    fn generator(reply: Result<&str, &str>) -> (Box<dyn SummaryGenerator>, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let gen = FakeGenerator {
            calls: calls.clone(),
            reply: reply
                .map(str::to_string)
                .map_err(|e| GenerationFailure(e.to_string())),
        };
        (Box::new(gen), calls)
    }

    fn pending(title: &str) -> SummaryTodo {
        SummaryTodo {
            title: title.to_string(),
            ..SummaryTodo::default()
        }
    }

    #[tokio::test]
    async fn missing_key_fails_before_anything_else() {
        let dispatcher = SummaryDispatcher::new(None, vec![]);
        let res = dispatcher.generate(&[]).await;
        assert!(matches!(res, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn all_completed_skips_the_generator() {
        let (gen, calls) = generator(Ok("unused"));
        let dispatcher = SummaryDispatcher::new(Some(gen), vec![]);
        let done = SummaryTodo {
            completed: Some(true),
            ..pending("done")
        };

        let summary = dispatcher.generate(&[done]).await.unwrap();
        assert_eq!(summary, "You have no pending tasks. Great job!");
        assert!(calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn generator_receives_the_prompt_once() {
        let (gen, calls) = generator(Ok("Do the dishes first."));
        let dispatcher = SummaryDispatcher::new(Some(gen), vec![]);

        let summary = dispatcher.generate(&[pending("Dishes")]).await.unwrap();
        assert_eq!(summary, "Do the dishes first.");
        assert_eq!(calls.borrow().len(), 1);
        assert!(calls.borrow()[0].contains("- [MEDIUM] Dishes"));
    }

    fn kind(err: &AppError) -> &'static str {
        match err {
            AppError::UpstreamAuth(_) => "auth",
            AppError::UpstreamQuota(_) => "quota",
            AppError::UpstreamGeneric(_) => "generic",
            _ => "other",
        }
    }

    #[tokio::test]
    async fn generator_failures_are_classified() {
        for (message, expected) in [
            ("API key not valid", "auth"),
            ("You exceeded your current quota", "quota"),
            ("internal", "generic"),
        ] {
            let (gen, calls) = generator(Err(message));
            let dispatcher = SummaryDispatcher::new(Some(gen), vec![]);
            let err = dispatcher.generate(&[pending("x")]).await.unwrap_err();
            assert_eq!(kind(&err), expected, "{message}");
            assert_eq!(calls.borrow().len(), 1);
        }
    }

    fn channel(name: &'static str, sent: &Rc<RefCell<Vec<(&'static str, String)>>>, fail: bool) -> Box<dyn DeliveryChannel> {
        Box::new(FakeChannel { name, sent: sent.clone(), fail })
    }

    #[tokio::test]
    async fn delivery_requires_a_summary() {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let dispatcher = SummaryDispatcher::new(None, vec![channel("webhook", &sent, false)]);

        assert!(matches!(dispatcher.deliver(None).await, Err(AppError::MissingSummary)));
        assert!(matches!(dispatcher.deliver(Some("")).await, Err(AppError::MissingSummary)));
        assert!(sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn delivery_without_channels_is_config_missing() {
        let dispatcher = SummaryDispatcher::new(None, vec![]);
        assert!(matches!(
            dispatcher.deliver(Some("hi")).await,
            Err(AppError::DeliveryConfigMissing)
        ));
    }

    #[tokio::test]
    async fn only_the_first_channel_is_attempted() {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let dispatcher = SummaryDispatcher::new(
            None,
            vec![channel("webhook", &sent, false), channel("bot", &sent, false)],
        );

        let receipt = dispatcher.deliver(Some("All good")).await.unwrap();
        assert_eq!(receipt.message, "sent via webhook");
        assert_eq!(*sent.borrow(), vec![("webhook", "*Todo Summary*\n\nAll good".to_string())]);
        assert_eq!(dispatcher.delivery_channel(), Some("webhook"));
    }

    #[tokio::test]
    async fn failed_channel_does_not_fall_through() {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let dispatcher = SummaryDispatcher::new(
            None,
            vec![channel("webhook", &sent, true), channel("bot", &sent, false)],
        );

        assert!(matches!(dispatcher.deliver(Some("x")).await, Err(AppError::Delivery(_))));
        assert_eq!(sent.borrow().len(), 1);
    }
}
