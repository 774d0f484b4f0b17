use std::collections::HashMap;

/// Key-value cache the composer persists its fields into between sessions.
pub trait FieldStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// The fields worth keeping across reloads. Recipients are deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    SenderEmail,
    SenderSecret,
    Subject,
    Body,
}

impl FormField {
    pub fn key(self) -> &'static str {
        match self {
            FormField::SenderEmail => "useremail",
            FormField::SenderSecret => "password",
            FormField::Subject => "subject",
            FormField::Body => "editorContent",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryFieldStore {
    values: HashMap<String, String>,
}

impl InMemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FieldStore for InMemoryFieldStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}
