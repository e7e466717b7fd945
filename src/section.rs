use std::str::FromStr;

use indexmap::IndexMap;
use indexmap::map::{Iter, Keys};

/// A named group of key-value pairs. A section without a name holds the keys that appear
/// before the first header of a file.
///
/// Keys keep their insertion order and are matched ignoring case. Inserting a key that already
/// exists replaces its value in place, keeping the key's original spelling and position.
///
/// Two sections are equal when their names and key-value pairs are equal; the order of the keys
/// is not compared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: Option<String>,
    keys: IndexMap<String, String>,
}

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            keys: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Returns `true` if this section has no header when written, i.e. its name is absent or
    /// empty.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.as_deref().is_none_or(str::is_empty)
    }

    /// Returns `true` if the section's name matches `name`, ignoring case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref().is_some_and(|n| eq_ignore_case(n, name))
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.keys
            .get_index_of(key)
            .or_else(|| self.keys.keys().position(|k| eq_ignore_case(k, key)))
    }

    /// Look up a value, ignoring the case of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index_of(key)
            .and_then(|i| self.keys.get_index(i))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Insert a key-value pair, returning the previous value if the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        match self.index_of(&key) {
            Some(i) => self
                .keys
                .get_index_mut(i)
                .map(|(_, slot)| std::mem::replace(slot, value)),
            None => {
                self.keys.insert(key, value);
                None
            }
        }
    }

    /// Remove a key, ignoring case, while keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.index_of(key)
            .and_then(|i| self.keys.shift_remove_index(i))
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.keys.iter()
    }

    pub fn keys(&self) -> Keys<'_, String, String> {
        self.keys.keys()
    }

    /// Parse the value stored under `key`, falling back to `default` if the key is missing or
    /// the value does not parse.
    pub fn get_parsed<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr,
    {
        self.get(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }

    #[must_use]
    pub fn get_u8(&self, key: &str, default: u8) -> u8 {
        self.get_parsed(key, default)
    }

    #[must_use]
    pub fn get_i16(&self, key: &str, default: i16) -> i16 {
        self.get_parsed(key, default)
    }

    #[must_use]
    pub fn get_i32(&self, key: &str, default: i32) -> i32 {
        self.get_parsed(key, default)
    }

    #[must_use]
    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.get_parsed(key, default)
    }

    #[must_use]
    pub fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.get_parsed(key, default)
    }

    #[must_use]
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get_parsed(key, default)
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl<K, V> Extend<(K, V)> for Section
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
