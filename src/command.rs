//! Commit command templates and shell-safe message insertion.
//!
//! The generated message is untrusted text. It only reaches the shell through
//! [`insert_message`], which always hands it over as a single quoted argument.

use std::fmt;

use crate::error::TemplateError;

/// How the message placeholder is rendered when a template is displayed.
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// One word of a commit command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A fixed word emitted as-is (program name, subcommand, flag).
    Literal(String),
    /// Where the commit message goes.
    Message,
}

/// A commit invocation with the message not yet substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    tokens: Vec<Token>,
}

impl CommandTemplate {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// `<program> commit -m <message>`, the shape every supported SCM shares.
    pub fn commit(program: &str) -> Self {
        Self::new(vec![
            Token::Literal(program.to_string()),
            Token::Literal("commit".to_string()),
            Token::Literal("-m".to_string()),
            Token::Message,
        ])
    }

    /// Append a fixed word to the end of the command.
    pub fn push_literal(&mut self, word: &str) {
        self.tokens.push(Token::Literal(word.to_string()));
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn has_literal(&self, word: &str) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, Token::Literal(w) if w == word))
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self
            .tokens
            .iter()
            .map(|t| match t {
                Token::Literal(word) => word.as_str(),
                Token::Message => MESSAGE_PLACEHOLDER,
            })
            .collect();
        f.write_str(&words.join(" "))
    }
}

/// Characters a POSIX shell still interprets inside double quotes.
const DOUBLE_QUOTE_LIVE: [char; 4] = ['"', '$', '`', '\\'];

/// Quote `message` as a single shell argument, using the simplest safe form.
///
/// - No single quotes: wrap in single quotes, which the shell never interprets.
/// - Single quotes but nothing that is live inside double quotes: wrap in
///   double quotes.
/// - Otherwise: single-quote everything, writing each `'` as `'"'"'`.
pub fn quote(message: &str) -> String {
    if !message.contains('\'') {
        return format!("'{message}'");
    }
    if !message.contains(DOUBLE_QUOTE_LIVE) {
        return format!("\"{message}\"");
    }
    format!("'{}'", message.replace('\'', r#"'"'"'"#))
}

/// Substitute the quoted message into `template` and join the words into one
/// shell command line.
pub fn insert_message(template: &CommandTemplate, message: &str) -> Result<String, TemplateError> {
    if !template.tokens.contains(&Token::Message) {
        return Err(TemplateError::PlaceholderMissing {
            template: template.to_string(),
        });
    }

    let quoted = quote(message);
    let words: Vec<&str> = template
        .tokens
        .iter()
        .map(|t| match t {
            Token::Literal(word) => word.as_str(),
            Token::Message => quoted.as_str(),
        })
        .collect();

    Ok(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain_message_uses_single_quotes() {
        assert_eq!(quote("Add JWT login"), "'Add JWT login'");
        assert_eq!(quote("Say \"hi\""), "'Say \"hi\"'");
        assert_eq!(quote("Costs $5 `now`"), "'Costs $5 `now`'");
    }

    #[test]
    fn test_quote_single_quote_uses_double_quotes() {
        assert_eq!(quote("Fix user's session"), "\"Fix user's session\"");
    }

    #[test]
    fn test_quote_both_quotes_escapes_single_quotes() {
        assert_eq!(quote(r#"It's "done""#), r#"'It'"'"'s "done"'"#);
    }

    #[test]
    fn test_quote_single_quote_with_dollar_does_not_use_double_quotes() {
        let quoted = quote("Don't expand $HOME");
        assert_eq!(quoted, r#"'Don'"'"'t expand $HOME'"#);
    }

    #[test]
    fn test_quote_single_quote_with_backtick_does_not_use_double_quotes() {
        let quoted = quote("Don't run `rm`");
        assert!(quoted.starts_with('\''));
        assert!(quoted.ends_with('\''));
    }

    #[test]
    fn test_quote_keeps_newlines() {
        assert_eq!(quote("Subject\n\nBody"), "'Subject\n\nBody'");
    }

    #[test]
    fn test_insert_message_replaces_placeholder_only() {
        let mut template = CommandTemplate::commit("git");
        template.push_literal("-a");

        let line = insert_message(&template, "Add parser").unwrap();
        assert_eq!(line, "git commit -m 'Add parser' -a");
    }

    #[test]
    fn test_insert_message_does_not_touch_literal_words() {
        let template = CommandTemplate::new(vec![
            Token::Literal("echo".to_string()),
            Token::Literal("{message}".to_string()),
            Token::Message,
        ]);

        let line = insert_message(&template, "x").unwrap();
        assert_eq!(line, "echo {message} 'x'");
    }

    #[test]
    fn test_insert_message_without_placeholder_fails() {
        let template = CommandTemplate::new(vec![
            Token::Literal("git".to_string()),
            Token::Literal("commit".to_string()),
        ]);

        let result = insert_message(&template, "msg");
        assert_eq!(
            result,
            Err(TemplateError::PlaceholderMissing {
                template: "git commit".to_string()
            })
        );
    }

    #[test]
    fn test_template_display_shows_placeholder() {
        let template = CommandTemplate::commit("hg");
        assert_eq!(template.to_string(), "hg commit -m {message}");
        assert!(template.has_literal("commit"));
        assert!(!template.has_literal("-a"));
    }
}
