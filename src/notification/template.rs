//! Rendering of notification texts with minijinja.

use minijinja::Environment;
use thiserror::Error;

use crate::{
    commands::escape_markdown, config::NotificationTemplates, models::NotificationEvent,
};

/// Renders template strings against a JSON context.
///
/// Undefined variables are errors, so a typo in a configured template fails
/// the delivery instead of sending a half-empty message.
pub struct TemplateService {
    env: Environment<'static>,
}

/// Error type for the TemplateService.
#[derive(Debug, Error)]
pub enum TemplateServiceError {
    /// The template failed to parse or render.
    #[error("Failed to render template: {0}")]
    RenderError(#[from] minijinja::Error),
}

impl TemplateService {
    /// Creates a strict environment with the `markdown_escape` filter.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        env.add_filter("markdown_escape", |value: String| escape_markdown(&value));
        Self { env }
    }

    /// Renders a template with the given context.
    pub fn render(
        &self,
        template_str: &str,
        context: serde_json::Value,
    ) -> Result<String, TemplateServiceError> {
        self.env.render_str(template_str, context).map_err(|e| {
            tracing::warn!(template = template_str, error = %e, "Failed to render template.");
            TemplateServiceError::RenderError(e)
        })
    }
}

impl Default for TemplateService {
    fn default() -> Self {
        Self::new()
    }
}

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub text: String,
}

/// The configured templates bound to a renderer.
pub struct MessageTemplates {
    service: TemplateService,
    templates: NotificationTemplates,
}

impl MessageTemplates {
    /// Binds `templates` to a fresh renderer.
    pub fn new(templates: NotificationTemplates) -> Self {
        Self { service: TemplateService::new(), templates }
    }

    /// The chat broadcast text.
    pub fn chat(&self, event: &NotificationEvent) -> Result<String, TemplateServiceError> {
        self.service.render(&self.templates.chat, event.context())
    }

    /// The email subject and body.
    pub fn email(&self, event: &NotificationEvent) -> Result<EmailMessage, TemplateServiceError> {
        Ok(EmailMessage {
            subject: self.service.render(&self.templates.email_subject, event.context())?,
            text: self.service.render(&self.templates.email_body, event.context())?,
        })
    }

    /// The SMS text.
    pub fn sms(&self, event: &NotificationEvent) -> Result<String, TemplateServiceError> {
        self.service.render(&self.templates.sms, event.context())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event() -> NotificationEvent {
        NotificationEvent {
            event_label: "Seven_Stars".into(),
            event_url: "https://tickets.example/events/seven-stars".into(),
            ticket_count: 2,
        }
    }

    #[test]
    fn test_default_templates_render() {
        let templates = MessageTemplates::new(NotificationTemplates::default());

        let chat = templates.chat(&event()).unwrap();
        assert!(chat.contains("Seven\\_Stars"));
        assert!(chat.contains("Check now: https://tickets.example/events/seven-stars"));

        let email = templates.email(&event()).unwrap();
        assert_eq!(email.subject, "🎟️ Resale Tickets Available for Seven_Stars!");
        assert!(email.text.starts_with("Great news!"));

        assert_eq!(
            templates.sms(&event()).unwrap(),
            "Resale tickets available for Seven_Stars: https://tickets.example/events/seven-stars"
        );
    }

    #[test]
    fn test_chat_template_escapes_markdown_in_url() {
        let templates = MessageTemplates::new(NotificationTemplates::default());
        let event = NotificationEvent {
            event_url: "https://tickets.example/events/seven_stars_2025".into(),
            ..event()
        };

        let chat = templates.chat(&event).unwrap();
        assert!(chat.contains("Check now: https://tickets.example/events/seven\\_stars\\_2025"));
        assert!(!chat.contains("seven_stars"));

        // Email and SMS are plain text and keep the URL as is.
        assert!(templates.sms(&event).unwrap().ends_with("seven_stars_2025"));
    }

    #[test]
    fn test_ticket_count_is_available() {
        let service = TemplateService::new();
        let rendered = service.render("{{ ticket_count }} listing(s)", event().context()).unwrap();
        assert_eq!(rendered, "2 listing(s)");
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let service = TemplateService::new();
        let result = service.render("Hello {{ name }}", json!({}));
        assert!(matches!(result, Err(TemplateServiceError::RenderError(_))));
    }

    #[test]
    fn test_invalid_template_is_an_error() {
        let service = TemplateService::new();
        assert!(service.render("Hello, {{ name }", json!({ "name": "World" })).is_err());
    }
}
