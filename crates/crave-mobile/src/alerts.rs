//! The single modal alert channel.
//!
//! Every collaborator failure is mapped to an explicit `(title, message)`
//! pair here; screens render exactly one dismissible alert at a time and
//! never show inline field errors.

use crate::completion::CompletionError;
use crate::speech::SpeechError;
use crave_core::Error;

/// Content of the modal alert: a title and a message, one dismiss button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Submission failed; the entered data stays in the form for retry.
#[must_use]
pub fn submission_failed(error: &Error) -> Alert {
    Alert::new("Couldn't log craving", error.to_string())
}

/// The list fetch failed.
#[must_use]
pub fn fetch_failed(error: &Error) -> Alert {
    Alert::new("Couldn't load cravings", error.to_string())
}

/// Archiving a craving failed.
#[must_use]
pub fn archive_failed(error: &Error) -> Alert {
    Alert::new("Couldn't archive craving", error.to_string())
}

/// A dictation operation failed or permission was denied.
#[must_use]
pub fn speech_failed(error: &SpeechError) -> Alert {
    Alert::new("Dictation problem", error.to_string())
}

/// The completion service failed.
#[must_use]
pub fn completion_failed(error: &CompletionError) -> Alert {
    Alert::new("Couldn't fetch insight", error.to_string())
}
