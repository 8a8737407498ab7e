//! Reply texts for subscriber commands. All replies are Telegram Markdown.

const HELP: &str = "Commands:\n/register - Register for notifications\n/unregister - Unregister\n/status - Check registration status";

/// Escapes the characters Telegram's legacy Markdown treats as markup.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn greeting(first_name: &str) -> String {
    format!("Hi {}! 👋\n\n", escape_markdown(first_name))
}

pub fn registered(first_name: &str) -> String {
    format!(
        "{}You've been successfully registered for resale ticket notifications! 🎟️\n\n\
         You'll automatically get alerted when resale tickets become available. No further action needed!",
        greeting(first_name)
    )
}

pub fn already_registered(first_name: &str) -> String {
    format!(
        "{}You're already registered for resale ticket notifications. \
         You'll get alerted when resale tickets become available!",
        greeting(first_name)
    )
}

pub fn unregistered(first_name: &str) -> String {
    format!(
        "{}You've been successfully unregistered from resale ticket notifications.\n\n\
         You won't receive any more alerts. Send /register if you want to sign up again!",
        greeting(first_name)
    )
}

pub fn not_registered(first_name: &str) -> String {
    format!(
        "{}You're not currently registered for notifications.\n\n\
         Send /register to sign up for resale ticket alerts!",
        greeting(first_name)
    )
}

pub fn status(first_name: &str, registered: bool) -> String {
    if registered {
        format!("{}✅ You are registered for notifications!\n\n{HELP}", greeting(first_name))
    } else {
        format!(
            "{}❌ You are not registered for notifications.\n\nSend /register to sign up!\n\n{HELP}",
            greeting(first_name)
        )
    }
}

pub fn storage_failure(first_name: &str) -> String {
    format!(
        "{}Sorry, your request could not be saved right now. Please try again later.",
        greeting(first_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_escaped() {
        assert_eq!(escape_markdown("snake_case*[x]`"), "snake\\_case\\*\\[x]\\`");
        assert!(registered("a_b").starts_with("Hi a\\_b! 👋"));
    }

    #[test]
    fn test_status_lists_commands() {
        assert!(status("User", true).contains("/unregister - Unregister"));
        assert!(status("User", false).contains("not registered"));
    }
}
