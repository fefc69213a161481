// Copyright 2025 the TheoremX Authors
// SPDX-License-Identifier: Apache-2.0

//! Variable bindings echoed back to the solver on every call.

use crate::client::SolveItem;
use serde::Serialize;
use std::collections::BTreeMap;

/// Symbol name → last known value.
///
/// Backed by a `BTreeMap` so the serialized `dict_of_vars` is stable
/// across calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableBindings {
    inner: BTreeMap<String, String>,
}

impl VariableBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Bind `name`, overwriting any earlier value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(name.into(), value.into());
    }

    /// Merge every `assign` item, later items win. Returns how many were
    /// assigned.
    pub fn merge_assignments(&mut self, items: &[SolveItem]) -> usize {
        let mut assigned = 0;
        for item in items.iter().filter(|item| item.assign) {
            self.insert(item.expr.clone(), item.result.clone());
            assigned += 1;
        }
        assigned
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
