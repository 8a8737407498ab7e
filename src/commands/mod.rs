//! # Command Processor
//!
//! Drains pending chat updates once per cycle and applies the subscriber
//! commands `/register`, `/unregister` and `/status` to the registry.
//!
//! Each recognised command gets exactly one reply, sent before the next
//! update is looked at. Once the whole batch has been handled the updates are
//! acknowledged so they are not seen again.

mod replies;

use std::sync::Arc;

use serde::Serialize;

pub use replies::escape_markdown;

use crate::{
    persistence::{PersistenceError, SubscriberRegistry},
    telegram::{ChatApi, ChatError, Update},
};

const DEFAULT_FIRST_NAME: &str = "User";

/// A recognised subscriber command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Subscribe to notifications.
    Register,
    /// Stop notifications.
    Unregister,
    /// Report registration state.
    Status,
}

impl Command {
    /// Parses message text. Matching is exact after trimming and ignoring case.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "/register" => Some(Command::Register),
            "/unregister" => Some(Command::Unregister),
            "/status" => Some(Command::Status),
            _ => None,
        }
    }
}

/// What one `process_pending` call did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandReport {
    /// Updates fetched in the batch.
    pub received: usize,
    /// Recognised commands handled.
    pub handled: usize,
    /// Replies delivered.
    pub replies_sent: usize,
    /// Replies that could not be delivered.
    pub reply_failures: usize,
    /// Offset acknowledged after the batch, if any.
    pub acknowledged: Option<i64>,
}

/// Applies chat commands to the subscriber registry.
pub struct CommandProcessor {
    chat: Arc<dyn ChatApi>,
    registry: Arc<dyn SubscriberRegistry>,
    batch_limit: u32,
}

impl CommandProcessor {
    /// Creates a processor fetching at most `batch_limit` updates per call.
    pub fn new(chat: Arc<dyn ChatApi>, registry: Arc<dyn SubscriberRegistry>, batch_limit: u32) -> Self {
        Self { chat, registry, batch_limit: batch_limit.max(1) }
    }

    /// Handles one batch of pending updates.
    ///
    /// Only a failure to fetch updates is returned as an error; everything
    /// after that is logged and reflected in the report.
    #[tracing::instrument(skip(self))]
    pub async fn process_pending(&self) -> Result<CommandReport, ChatError> {
        let updates = self.chat.fetch_updates(self.batch_limit).await?;
        let mut report = CommandReport { received: updates.len(), ..Default::default() };

        for update in &updates {
            let Some((chat_id, command, first_name)) = recognise(update) else {
                continue;
            };
            report.handled += 1;

            let reply = self.apply(command, &chat_id, &first_name).await;
            match self.chat.send_message(&chat_id, &reply).await {
                Ok(()) => report.replies_sent += 1,
                Err(e) => {
                    report.reply_failures += 1;
                    tracing::error!(chat_id = %chat_id, ?command, error = %e, "Failed to send command reply.");
                }
            }
        }

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            let offset = last + 1;
            match self.chat.acknowledge(offset).await {
                Ok(()) => report.acknowledged = Some(offset),
                Err(e) => {
                    tracing::warn!(offset, error = %e, "Failed to acknowledge chat updates; they will be seen again.");
                }
            }
        }

        tracing::info!(
            received = report.received,
            handled = report.handled,
            reply_failures = report.reply_failures,
            "Chat commands processed."
        );
        Ok(report)
    }

    async fn apply(&self, command: Command, chat_id: &str, first_name: &str) -> String {
        let outcome = match command {
            Command::Register => self.registry.add(chat_id).await.map(|added| {
                if added {
                    replies::registered(first_name)
                } else {
                    replies::already_registered(first_name)
                }
            }),
            Command::Unregister => self.registry.remove(chat_id).await.map(|removed| {
                if removed {
                    replies::unregistered(first_name)
                } else {
                    replies::not_registered(first_name)
                }
            }),
            Command::Status => self
                .registry
                .contains(chat_id)
                .await
                .map(|registered| replies::status(first_name, registered)),
        };

        outcome.unwrap_or_else(|e: PersistenceError| {
            tracing::error!(chat_id, ?command, error = %e, "Subscriber registry operation failed.");
            replies::storage_failure(first_name)
        })
    }
}

/// Extracts `(chat id, command, first name)` from an update carrying a
/// recognised command.
fn recognise(update: &Update) -> Option<(String, Command, String)> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    let command = Command::parse(text)?;
    let first_name = message
        .from
        .as_ref()
        .and_then(|user| user.first_name.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FIRST_NAME.to_string());
    Some((message.chat.id.to_string(), command, first_name))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::*;

    use super::*;
    use crate::{
        persistence::traits::MockSubscriberRegistry, telegram::MockChatApi,
        test_helpers::InMemoryRegistry,
    };

    /// A chat delivering one `text` update from chat 42 and expecting exactly
    /// one reply containing `reply`.
    fn chat_expecting_reply(text: &'static str, reply: &'static str) -> MockChatApi {
        let mut chat = MockChatApi::new();
        chat.expect_fetch_updates()
            .returning(move |_| Ok(vec![Update::text(7, 42, text, Some("Ana"))]));
        chat.expect_send_message()
            .withf(move |chat_id, body| chat_id == "42" && body.contains(reply))
            .times(1)
            .returning(|_, _| Ok(()));
        chat.expect_acknowledge().with(eq(8)).times(1).returning(|_| Ok(()));
        chat
    }

    #[test]
    fn test_parse_is_exact_after_trim_and_lowercase() {
        assert_eq!(Command::parse("  /REGISTER "), Some(Command::Register));
        assert_eq!(Command::parse("/Unregister"), Some(Command::Unregister));
        assert_eq!(Command::parse("/status"), Some(Command::Status));
        assert_eq!(Command::parse("/register now"), None);
        assert_eq!(Command::parse("/start"), None);
    }

    #[test]
    fn test_recognise_defaults_first_name() {
        let mut update = Update::text(1, 99, "/status", None);
        let (chat_id, command, name) = recognise(&update).unwrap();
        assert_eq!((chat_id.as_str(), command, name.as_str()), ("99", Command::Status, "User"));

        update.message.as_mut().unwrap().text = Some("   ".into());
        assert!(recognise(&update).is_none());
    }

    #[tokio::test]
    async fn test_persistence_failure_changes_reply() {
        let mut chat = MockChatApi::new();
        chat.expect_fetch_updates()
            .returning(|_| Ok(vec![Update::text(5, 42, "/register", Some("Ana"))]));
        chat.expect_send_message()
            .withf(|chat_id, text| chat_id == "42" && text.contains("could not be saved"))
            .times(1)
            .returning(|_, _| Ok(()));
        chat.expect_acknowledge().with(eq(6)).times(1).returning(|_| Ok(()));

        let mut registry = MockSubscriberRegistry::new();
        registry
            .expect_add()
            .returning(|_| Err(PersistenceError::InvalidInput("disk full".into())));

        let processor = CommandProcessor::new(Arc::new(chat), Arc::new(registry), 100);
        let report = processor.process_pending().await.unwrap();

        assert_eq!(report.handled, 1);
        assert_eq!(report.replies_sent, 1);
        assert_eq!(report.acknowledged, Some(6));
    }

    #[tokio::test]
    async fn test_empty_batch_is_not_acknowledged() {
        let mut chat = MockChatApi::new();
        chat.expect_fetch_updates().with(eq(100)).returning(|_| Ok(vec![]));
        chat.expect_acknowledge().never();
        chat.expect_send_message().never();

        let processor =
            CommandProcessor::new(Arc::new(chat), Arc::new(MockSubscriberRegistry::new()), 100);
        let report = processor.process_pending().await.unwrap();
        assert_eq!(report, CommandReport::default());
    }

    #[tokio::test]
    async fn test_unrecognised_messages_are_acknowledged_without_reply() {
        let mut chat = MockChatApi::new();
        chat.expect_fetch_updates().returning(|_| {
            Ok(vec![
                Update::text(3, 1, "hello", Some("Ana")),
                Update { update_id: 8, message: None },
            ])
        });
        chat.expect_send_message().never();
        chat.expect_acknowledge().with(eq(9)).times(1).returning(|_| Ok(()));

        let processor =
            CommandProcessor::new(Arc::new(chat), Arc::new(MockSubscriberRegistry::new()), 100);
        let report = processor.process_pending().await.unwrap();
        assert_eq!(report.received, 2);
        assert_eq!(report.handled, 0);
    }

    #[tokio::test]
    async fn test_reply_failure_does_not_stop_the_batch() {
        let mut chat = MockChatApi::new();
        chat.expect_fetch_updates().returning(|_| {
            Ok(vec![
                Update::text(1, 10, "/status", None),
                Update::text(2, 20, "/status", None),
            ])
        });
        chat.expect_send_message().times(2).returning(|chat_id, _| {
            if chat_id == "10" { Err(ChatError::Transport("reset".into())) } else { Ok(()) }
        });
        chat.expect_acknowledge().returning(|_| Ok(()));

        let mut registry = MockSubscriberRegistry::new();
        registry.expect_contains().returning(|_| Ok(false));

        let processor = CommandProcessor::new(Arc::new(chat), Arc::new(registry), 100);
        let report = processor.process_pending().await.unwrap();
        assert_eq!(report.replies_sent, 1);
        assert_eq!(report.reply_failures, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_returned() {
        let mut chat = MockChatApi::new();
        chat.expect_fetch_updates()
            .returning(|_| Err(ChatError::Transport("timeout".into())));

        let processor =
            CommandProcessor::new(Arc::new(chat), Arc::new(MockSubscriberRegistry::new()), 100);
        assert!(processor.process_pending().await.is_err());
    }

    #[tokio::test]
    async fn test_register_when_already_registered_changes_nothing() {
        let registry = Arc::new(InMemoryRegistry::with_ids(&["42", "77"]));
        let before = registry.list().await.unwrap();

        let chat = chat_expecting_reply("/register", "already registered");
        let processor = CommandProcessor::new(Arc::new(chat), registry.clone(), 100);
        let report = processor.process_pending().await.unwrap();

        assert_eq!(report.replies_sent, 1);
        assert_eq!(registry.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unregister_removes_registered_id() {
        let registry = Arc::new(InMemoryRegistry::with_ids(&["42", "77"]));
        assert!(registry.contains("42").await.unwrap());

        let chat = chat_expecting_reply("/unregister", "successfully unregistered");
        let processor = CommandProcessor::new(Arc::new(chat), registry.clone(), 100);
        let report = processor.process_pending().await.unwrap();

        assert_eq!(report.replies_sent, 1);
        assert!(!registry.contains("42").await.unwrap());
        assert!(registry.contains("77").await.unwrap());
    }

    #[tokio::test]
    async fn test_unregister_when_not_registered_only_replies() {
        let registry = Arc::new(InMemoryRegistry::with_ids(&["77"]));
        let before = registry.list().await.unwrap();

        let chat = chat_expecting_reply("/unregister", "not currently registered");
        let processor = CommandProcessor::new(Arc::new(chat), registry.clone(), 100);
        let report = processor.process_pending().await.unwrap();

        assert_eq!(report.handled, 1);
        assert_eq!(report.replies_sent, 1);
        assert_eq!(registry.list().await.unwrap(), before);
    }
}
