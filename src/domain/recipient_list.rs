use super::recipient_email::RecipientEmail;

pub const INVALID_FORMAT_ALERT: &str = "Invalid email format";
pub const BATCH_REJECTED_ALERT: &str = "One or more emails have invalid format and were removed.";

/// One chip in the recipient picker. `label` mirrors `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientEntry {
    label: String,
    value: RecipientEmail,
}

impl RecipientEntry {
    pub fn new(value: RecipientEmail) -> Self {
        Self {
            label: value.as_ref().to_owned(),
            value,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        self.value.as_ref()
    }
}

/// A candidate entry handed over by a picker or a paste, not yet validated.
/// Committed entries are labelled by their address, whatever `label` says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientOption {
    pub label: String,
    pub value: String,
}

impl From<&str> for RecipientOption {
    fn from(value: &str) -> Self {
        Self {
            label: value.to_owned(),
            value: value.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOutcome {
    Accepted,
    Ignored(IgnoreReason),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Empty,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidFormat,
}

/// Ordered, duplicate-free list of recipients, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSet {
    entries: Vec<RecipientEntry>,
}

impl RecipientSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit_token(&mut self, raw_text: &str) -> TokenOutcome {
        let token = raw_text.trim();
        if token.is_empty() {
            return TokenOutcome::Ignored(IgnoreReason::Empty);
        }
        let Ok(email) = RecipientEmail::parse(token.to_owned()) else {
            return TokenOutcome::Rejected(RejectReason::InvalidFormat);
        };
        if self.contains(email.as_ref()) {
            return TokenOutcome::Ignored(IgnoreReason::Duplicate);
        }
        self.entries.push(RecipientEntry::new(email));
        TokenOutcome::Accepted
    }

    /// Replaces the whole set with the valid candidates, keeping their order
    /// and dropping repeats. Returns how many candidates had a bad format.
    pub fn commit_batch<I>(&mut self, selected: I) -> usize
    where
        I: IntoIterator<Item = RecipientOption>,
    {
        let mut kept = RecipientSet::new();
        let mut rejected = 0;
        for option in selected {
            let Ok(email) = RecipientEmail::parse(option.value) else {
                rejected += 1;
                continue;
            };
            if kept.contains(email.as_ref()) {
                continue;
            }
            kept.entries.push(RecipientEntry::new(email));
        }
        *self = kept;
        rejected
    }

    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.value() != value);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|entry| entry.value() == value)
    }

    pub fn entries(&self) -> &[RecipientEntry] {
        &self.entries
    }

    pub fn values(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.value().to_owned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Char(char),
    Other,
}

impl Key {
    pub fn is_delimiter(self) -> bool {
        matches!(self, Key::Enter | Key::Tab | Key::Char(','))
    }
}

/// What the input widget should do after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResponse {
    /// Swallow the key instead of typing it or moving focus.
    pub suppress_default: bool,
    pub outcome: Option<TokenOutcome>,
    pub alert: Option<&'static str>,
}

impl KeyResponse {
    fn pass_through() -> Self {
        Self {
            suppress_default: false,
            outcome: None,
            alert: None,
        }
    }
}

/// The recipient picker: a committed set plus the text currently being typed.
#[derive(Debug, Clone, Default)]
pub struct RecipientInput {
    set: RecipientSet,
    buffer: String,
}

impl RecipientInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn recipients(&self) -> &RecipientSet {
        &self.set
    }

    pub fn recipients_mut(&mut self) -> &mut RecipientSet {
        &mut self.set
    }

    pub fn handle_key(&mut self, key: Key) -> KeyResponse {
        if self.buffer.is_empty() || !key.is_delimiter() {
            return KeyResponse::pass_through();
        }

        let outcome = self.set.commit_token(&self.buffer);
        let alert = match outcome {
            TokenOutcome::Accepted => {
                self.buffer.clear();
                None
            }
            TokenOutcome::Ignored(IgnoreReason::Duplicate) => None,
            // whitespace only
            TokenOutcome::Ignored(IgnoreReason::Empty) => Some(INVALID_FORMAT_ALERT),
            TokenOutcome::Rejected(RejectReason::InvalidFormat) => Some(INVALID_FORMAT_ALERT),
        };
        if let Some(alert) = alert {
            tracing::warn!(token = %self.buffer, "{}", alert);
        }

        KeyResponse {
            suppress_default: true,
            outcome: Some(outcome),
            alert,
        }
    }

    /// Applies a multi-select change from the picker.
    pub fn select(&mut self, selected: Vec<RecipientOption>) -> Option<&'static str> {
        let rejected = self.set.commit_batch(selected);
        (rejected > 0).then_some(BATCH_REJECTED_ALERT)
    }
}
