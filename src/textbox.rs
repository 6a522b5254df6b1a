//! Text display collaborator
//!
//! The core never draws text itself; it hands message strings to a
//! [`TextSink`]. [`Textbox`] is the headless implementation: it keeps the
//! current line and a history, which is all tests and the console front end
//! need.

use std::fmt;

use log::debug;

/// Core trait for anything that can show a message line
pub trait TextSink {
    /// Replace the displayed text. `None` clears the box.
    fn show(&mut self, text: Option<&str>) -> Result<(), DisplayError>;

    /// Text currently displayed
    fn text(&self) -> Option<&str>;
}

/// Display error type
#[derive(Debug, Clone)]
pub struct DisplayError {
    pub message: String,
}

impl DisplayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Display error: {}", self.message)
    }
}

impl std::error::Error for DisplayError {}

#[derive(Debug, Default, Clone)]
pub struct Textbox {
    current: Option<String>,
    history: Vec<String>,
}

impl Textbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every non-empty message shown so far, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Forget the history and clear the box
    pub fn reset(&mut self) {
        self.current = None;
        self.history.clear();
    }
}

impl TextSink for Textbox {
    fn show(&mut self, text: Option<&str>) -> Result<(), DisplayError> {
        debug!("Textbox: {:?}", text);
        self.current = text.map(str::to_owned);
        if let Some(t) = text {
            self.history.push(t.to_owned());
        }
        Ok(())
    }

    fn text(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn show_replaces_and_records() {
        let mut tb = Textbox::new();
        tb.show(Some("HELLO")).unwrap();
        tb.show(Some("WORLD")).unwrap();
        assert_eq!(tb.text(), Some("WORLD"));
        assert_eq!(tb.history(), &["HELLO".to_string(), "WORLD".to_string()]);
    }

    #[test]
    fn missing_message_clears_box() {
        let mut tb = Textbox::new();
        tb.show(Some("HELLO")).unwrap();
        tb.show(None).unwrap();
        assert_eq!(tb.text(), None);
        assert_eq!(tb.history().len(), 1);
    }
}
