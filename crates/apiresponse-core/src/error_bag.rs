//! Field-level error collections

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// One or more messages attached to a field or category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessages {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessages {
    /// Iterate over the contained messages
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            ErrorMessages::One(message) => std::slice::from_ref(message),
            ErrorMessages::Many(messages) => messages,
        };
        slice.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        match self {
            ErrorMessages::One(_) => 1,
            ErrorMessages::Many(messages) => messages.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, message: String) {
        match self {
            ErrorMessages::One(existing) => {
                let first = std::mem::take(existing);
                *self = ErrorMessages::Many(vec![first, message]);
            }
            ErrorMessages::Many(messages) => messages.push(message),
        }
    }
}

impl From<String> for ErrorMessages {
    fn from(message: String) -> Self {
        ErrorMessages::One(message)
    }
}

impl From<&str> for ErrorMessages {
    fn from(message: &str) -> Self {
        ErrorMessages::One(message.to_string())
    }
}

impl From<Vec<String>> for ErrorMessages {
    fn from(messages: Vec<String>) -> Self {
        ErrorMessages::Many(messages)
    }
}

/// Mapping of field or category name to its messages
///
/// Keys are kept sorted so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBag(BTreeMap<String, ErrorMessages>);

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bag holding a single entry
    pub fn single(field: impl Into<String>, messages: impl Into<ErrorMessages>) -> Self {
        let mut bag = Self::new();
        bag.insert(field, messages);
        bag
    }

    /// Replace the messages for `field`
    pub fn insert(&mut self, field: impl Into<String>, messages: impl Into<ErrorMessages>) {
        self.0.insert(field.into(), messages.into());
    }

    /// Append a message to `field`, keeping any existing ones
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        match self.0.entry(field.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(message),
            Entry::Vacant(entry) => {
                entry.insert(ErrorMessages::Many(vec![message]));
            }
        }
    }

    /// Builder-style [`ErrorBag::add`]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn get(&self, field: &str) -> Option<&ErrorMessages> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorMessages)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for ErrorBag
where
    K: Into<String>,
    V: Into<ErrorMessages>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (field, messages) in iter {
            bag.insert(field, messages);
        }
        bag
    }
}
