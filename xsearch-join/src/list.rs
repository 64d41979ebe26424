//! Ordered join lists.

use crate::spec::JoinSpec;

/// Joins of one request, applied in order.
///
/// [`push`](JoinList::push) assigns positions `0, 1, 2, ...` so each join
/// gets a distinct parameter key.
#[derive(Debug, Clone, Default)]
pub struct JoinList {
    joins: Vec<JoinSpec>,
}

impl JoinList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a join, setting its position to its index in the list.
    pub fn push(&mut self, mut join: JoinSpec) {
        join.set_position(self.joins.len() as i32);
        self.joins.push(join);
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&JoinSpec> {
        self.joins.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut JoinSpec> {
        self.joins.get_mut(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JoinSpec> {
        self.joins.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, JoinSpec> {
        self.joins.iter_mut()
    }
}

impl FromIterator<JoinSpec> for JoinList {
    fn from_iter<T: IntoIterator<Item = JoinSpec>>(iter: T) -> Self {
        let mut list = Self::new();
        for join in iter {
            list.push(join);
        }
        list
    }
}

impl<'a> IntoIterator for &'a JoinList {
    type Item = &'a JoinSpec;
    type IntoIter = std::slice::Iter<'a, JoinSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.joins.iter()
    }
}
