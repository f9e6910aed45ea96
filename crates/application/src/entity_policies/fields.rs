use std::collections::BTreeMap;

use serde::Serialize;

/// Writability of the fields of a form or serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldAccess {
    read_only: BTreeMap<String, bool>,
}

impl FieldAccess {
    /// Every listed field writable.
    #[must_use]
    pub fn writable<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            read_only: fields
                .into_iter()
                .map(|field| (field.to_owned(), false))
                .collect(),
        }
    }

    /// Marks a field read-only. Unknown fields are ignored.
    pub fn mark_read_only(&mut self, field: &str) {
        if let Some(read_only) = self.read_only.get_mut(field) {
            *read_only = true;
        }
    }

    /// Marks every field except `writable` read-only.
    pub fn restrict_to(&mut self, writable: &[&str]) {
        for (field, read_only) in &mut self.read_only {
            if !writable.contains(&field.as_str()) {
                *read_only = true;
            }
        }
    }

    /// Returns whether the field is read-only. Unknown fields are not writable.
    #[must_use]
    pub fn is_read_only(&self, field: &str) -> bool {
        self.read_only.get(field).copied().unwrap_or(true)
    }

    /// Returns whether every field is writable.
    #[must_use]
    pub fn is_fully_writable(&self) -> bool {
        self.read_only.values().all(|read_only| !read_only)
    }

    /// Names of the writable fields.
    #[must_use]
    pub fn writable_fields(&self) -> Vec<&str> {
        self.read_only
            .iter()
            .filter(|(_, read_only)| !**read_only)
            .map(|(field, _)| field.as_str())
            .collect()
    }
}
