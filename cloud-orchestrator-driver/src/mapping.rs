//! Vendor string -> common enum translation tables.
//!
//! Every driver builds its tables when it is constructed; a table with an
//! empty or duplicate key is rejected right there. Lookups of a value that has
//! no entry fail with [`ResponseError::UNMAPPED_VALUE`] instead of leaking the
//! raw vendor string.

use std::collections::HashMap;
use std::fmt::Debug;

use crate::error::{ResponseError, Result};

/// Case-insensitive, validated mapping from vendor strings to `T`.
#[derive(Debug, Clone)]
pub struct MappingTable<T> {
    name: &'static str,
    /// Entries in declaration order, keys as declared.
    entries: Vec<(&'static str, T)>,
    /// Upper-cased key -> index into `entries`.
    index: HashMap<String, usize>,
}

impl<T: Copy + PartialEq + Debug> MappingTable<T> {
    /// Builds and validates a table.
    ///
    /// `name` identifies the table in error messages, e.g. `"ecs.node_state"`.
    pub fn new(name: &'static str, entries: &[(&'static str, T)]) -> Result<Self> {
        if entries.is_empty() {
            return Err(ResponseError::invalid_mapping(name, "table has no entries"));
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (i, (key, _)) in entries.iter().enumerate() {
            let normalized = normalize_key(key);
            if normalized.is_empty() {
                return Err(ResponseError::invalid_mapping(
                    name,
                    format!("entry {i} has an empty key"),
                ));
            }
            if index.insert(normalized, i).is_some() {
                return Err(ResponseError::invalid_mapping(
                    name,
                    format!("duplicate key '{key}'"),
                ));
            }
        }

        Ok(Self {
            name,
            entries: entries.to_vec(),
            index,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Exact (case-insensitive) lookup.
    pub fn lookup(&self, raw: &str) -> Result<T> {
        self.index
            .get(&normalize_key(raw))
            .map(|&i| self.entries[i].1)
            .ok_or_else(|| ResponseError::unmapped(self.name, raw))
    }

    /// Lookup for optional vendor fields: a missing or blank value maps to `None`.
    pub fn lookup_opt(&self, raw: Option<&str>) -> Result<Option<T>> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => self.lookup(value).map(Some),
        }
    }

    /// Keyword lookup for free-form vendor text such as `"CentOS 7.9 64位"`.
    ///
    /// Returns the first entry, in declaration order, whose key occurs in `raw`.
    /// Blank input maps to `None`.
    pub fn lookup_keyword(&self, raw: &str) -> Result<Option<T>> {
        let haystack = normalize_key(raw);
        if haystack.is_empty() {
            return Ok(None);
        }
        self.entries
            .iter()
            .find(|(key, _)| haystack.contains(&normalize_key(key)))
            .map(|(_, value)| Some(*value))
            .ok_or_else(|| ResponseError::unmapped(self.name, raw))
    }

    /// Reverse lookup: the first vendor string declared for `value`.
    pub fn vendor_value(&self, value: T) -> Result<&'static str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(key, _)| *key)
            .ok_or_else(|| ResponseError::unmapped(self.name, &format!("{value:?}")))
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}
