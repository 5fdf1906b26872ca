//! Set-like comparison of two lists

use serde::Serialize;

/// Elements added, removed and kept between an old and a new list.
///
/// Order of first appearance is preserved in each bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ListDiff<T> {
    added: Vec<T>,
    removed: Vec<T>,
    shared: Vec<T>,
}

impl<T: PartialEq + Clone> ListDiff<T> {
    pub fn between(old: &[T], new: &[T]) -> Self {
        let mut diff = Self::default();
        for item in old {
            let bucket = if new.contains(item) {
                &mut diff.shared
            } else {
                &mut diff.removed
            };
            if !bucket.contains(item) {
                bucket.push(item.clone());
            }
        }
        for item in new {
            if !old.contains(item) && !diff.added.contains(item) {
                diff.added.push(item.clone());
            }
        }
        diff
    }
}

impl<T> ListDiff<T> {
    pub fn added(&self) -> &[T] {
        &self.added
    }

    pub fn removed(&self) -> &[T] {
        &self.removed
    }

    pub fn shared(&self) -> &[T] {
        &self.shared
    }

    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl<T> Default for ListDiff<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            shared: Vec::new(),
        }
    }
}
