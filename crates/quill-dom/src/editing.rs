//! Framework-controlled editors
//!
//! A host page's UI framework owns the state of its rich-text inputs and
//! may ignore edits it did not originate. `EditingPolicy` describes which
//! edit paths a given editor honours; the document consults it for direct
//! DOM writes, paste events and `execCommand`.

/// Editing command (the `execCommand` subset editors respond to)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditCommand {
    InsertText,
    Delete,
    SelectAll,
}

impl EditCommand {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "inserttext" => Self::InsertText,
            "delete" => Self::Delete,
            "selectall" => Self::SelectAll,
            _ => return None,
        })
    }

    pub fn requires_value(&self) -> bool {
        matches!(self, Self::InsertText)
    }
}

/// Which edit paths an editor honours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditingPolicy {
    /// Direct child/text mutation from page script
    pub direct_mutation: bool,
    /// `execCommand("insertText")` while focused
    pub insert_text_command: bool,
    /// Default action of a synthetic paste event
    pub paste: bool,
    /// Characters kept after any accepted edit
    pub max_len: Option<usize>,
}

impl EditingPolicy {
    /// Accepts every edit path
    pub fn cooperative() -> Self {
        Self {
            direct_mutation: true,
            insert_text_command: true,
            paste: true,
            max_len: None,
        }
    }

    /// Ignores direct mutation and paste; only the legacy command lands
    pub fn command_only() -> Self {
        Self {
            direct_mutation: false,
            insert_text_command: true,
            paste: false,
            max_len: None,
        }
    }

    /// Accepts nothing page script does
    pub fn locked() -> Self {
        Self {
            direct_mutation: false,
            insert_text_command: false,
            paste: false,
            max_len: None,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Apply the length limit to a proposed content
    pub fn clamp<'a>(&self, text: &'a str) -> &'a str {
        match self.max_len {
            Some(max) => match text.char_indices().nth(max) {
                Some((cut, _)) => &text[..cut],
                None => text,
            },
            None => text,
        }
    }
}

impl Default for EditingPolicy {
    fn default() -> Self {
        Self::cooperative()
    }
}
