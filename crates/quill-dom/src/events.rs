//! Host Events
//!
//! The synthetic events a page script can dispatch at an element, and the
//! log entry recorded for each dispatch.

use crate::NodeId;

/// `inputType` of an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    InsertText,
    InsertFromPaste,
    DeleteContent,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::InsertText => "insertText",
            InputType::InsertFromPaste => "insertFromPaste",
            InputType::DeleteContent => "deleteContentBackward",
        }
    }
}

/// Event dispatched at a host element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Focus,
    Click,
    Input {
        data: Option<String>,
        input_type: InputType,
    },
    Change,
    /// Clipboard paste carrying `text/plain` data
    Paste { data: String },
}

impl HostEvent {
    /// Input event of type `insertText`
    pub fn insert_text(text: &str) -> Self {
        HostEvent::Input {
            data: Some(text.to_string()),
            input_type: InputType::InsertText,
        }
    }

    /// Paste event carrying `text`
    pub fn paste(text: &str) -> Self {
        HostEvent::Paste {
            data: text.to_string(),
        }
    }

    /// DOM event type name
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::Focus => "focus",
            HostEvent::Click => "click",
            HostEvent::Input { .. } => "input",
            HostEvent::Change => "change",
            HostEvent::Paste { .. } => "paste",
        }
    }

    /// Whether the event can be canceled by a listener
    pub fn cancelable(&self) -> bool {
        matches!(self, HostEvent::Click | HostEvent::Input { .. } | HostEvent::Paste { .. })
    }
}

/// A dispatched event as seen by page listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub target: NodeId,
    pub event: HostEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(HostEvent::insert_text("hi").name(), "input");
        assert_eq!(HostEvent::paste("hi").name(), "paste");
        assert_eq!(InputType::InsertText.as_str(), "insertText");
        assert!(!HostEvent::Focus.cancelable());
        assert!(HostEvent::paste("x").cancelable());
    }
}
