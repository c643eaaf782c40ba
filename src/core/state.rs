//! Pipeline state and partial updates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when building a partial update
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Unknown state field '{0}' (expected topic, research or draft)")]
    UnknownField(String),
}

/// A named field of [`PipelineState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateField {
    Topic,
    Research,
    Draft,
}

impl StateField {
    pub const ALL: [StateField; 3] = [StateField::Topic, StateField::Research, StateField::Draft];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateField::Topic => "topic",
            StateField::Research => "research",
            StateField::Draft => "draft",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateField {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| StateError::UnknownField(s.to_string()))
    }
}

/// The record passed linearly through the pipeline steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    pub topic: String,
    pub research: String,
    pub draft: String,
}

impl PipelineState {
    /// Initial state for a topic, with research and draft empty
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: StateField) -> &str {
        match field {
            StateField::Topic => &self.topic,
            StateField::Research => &self.research,
            StateField::Draft => &self.draft,
        }
    }

    /// Merge a partial update; fields absent from the update are left as they are
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            topic,
            research,
            draft,
        } = update;
        if let Some(topic) = topic {
            self.topic = topic;
        }
        if let Some(research) = research {
            self.research = research;
        }
        if let Some(draft) = draft {
            self.draft = draft;
        }
    }

    /// Consuming form of [`apply`](Self::apply)
    pub fn merged(mut self, update: StateUpdate) -> Self {
        self.apply(update);
        self
    }
}

/// A partial update returned by a step
///
/// Serializes only the fields that are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one field, replacing any earlier value for it
    pub fn set(mut self, field: StateField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            StateField::Topic => self.topic = value,
            StateField::Research => self.research = value,
            StateField::Draft => self.draft = value,
        }
        self
    }

    pub fn research(value: impl Into<String>) -> Self {
        Self::new().set(StateField::Research, value)
    }

    pub fn draft(value: impl Into<String>) -> Self {
        Self::new().set(StateField::Draft, value)
    }

    /// Build an update from `(field name, value)` pairs
    ///
    /// Later pairs win when a name repeats.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        pairs.into_iter().try_fold(Self::new(), |update, (name, value)| {
            let field = name.as_ref().parse::<StateField>()?;
            Ok(update.set(field, value))
        })
    }

    pub fn get(&self, field: StateField) -> Option<&str> {
        match field {
            StateField::Topic => self.topic.as_deref(),
            StateField::Research => self.research.as_deref(),
            StateField::Draft => self.draft.as_deref(),
        }
    }

    /// Fields this update writes, in declaration order
    pub fn fields(&self) -> Vec<StateField> {
        StateField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}
