use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to last entered value, persisted as one JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot(BTreeMap<String, String>);

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The named text-bearing fields of a page and their current values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormFields {
    values: BTreeMap<String, String>,
}

impl FormFields {
    /// Declares the page's fields, all starting empty.
    pub fn with_fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: names
                .into_iter()
                .map(|name| (name.into(), String::new()))
                .collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Records user input. Returns `false` for a field the page does not have.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Fills empty fields from a stored snapshot, never overwriting what
    /// the user already typed. Returns the names of the fields it filled,
    /// in field order, so dependent displays can refresh.
    pub fn restore(&mut self, snapshot: &FormSnapshot) -> Vec<String> {
        let mut restored = Vec::new();
        for (name, slot) in self.values.iter_mut() {
            if !slot.is_empty() {
                continue;
            }
            if let Some(saved) = snapshot.get(name).filter(|v| !v.is_empty()) {
                *slot = saved.to_string();
                restored.push(name.clone());
            }
        }
        restored
    }
}
