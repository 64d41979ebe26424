//! Document sets exchanged between the primary search and the join pipeline.

use crate::reader::IndexReader;
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

/// Index-local document identifier.
pub type DocId = u32;

/// The foreign document a row was joined to at one join position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForeignMatch {
    /// Join position that produced this match.
    pub position: i32,
    /// Matched foreign document; `None` when an outer join kept the row
    /// without a foreign match.
    pub doc: Option<DocId>,
    /// Score of the foreign document (0 for an outer miss).
    pub score: f32,
}

impl ForeignMatch {
    /// A match against a foreign document.
    pub fn hit(position: i32, doc: DocId, score: f32) -> Self {
        Self {
            position,
            doc: Some(doc),
            score,
        }
    }

    /// An outer-join miss.
    pub fn miss(position: i32) -> Self {
        Self {
            position,
            doc: None,
            score: 0.0,
        }
    }
}

/// One row of a document set: a local document plus the foreign documents
/// it has been joined to so far.
#[derive(Debug, Clone, PartialEq)]
pub struct DocRow {
    pub doc: DocId,
    pub score: f32,
    pub joins: Vec<ForeignMatch>,
}

impl DocRow {
    pub fn new(doc: DocId, score: f32) -> Self {
        Self {
            doc,
            score,
            joins: Vec::new(),
        }
    }

    /// Copy of this row extended with one more foreign match.
    pub fn with_match(&self, foreign: ForeignMatch) -> Self {
        let mut joins = Vec::with_capacity(self.joins.len() + 1);
        joins.extend_from_slice(&self.joins);
        joins.push(foreign);
        Self {
            doc: self.doc,
            score: self.score,
            joins,
        }
    }

    /// The foreign match recorded for a join position, if any.
    pub fn foreign(&self, position: i32) -> Option<&ForeignMatch> {
        self.joins.iter().find(|m| m.position == position)
    }
}

/// Ordered, scored set of document rows.
///
/// Row order is significant: it is the order the primary search produced,
/// and joins preserve it. After a join the set also keeps the foreign
/// reader for that join position so downstream rendering can resolve more
/// foreign fields per matched document.
#[derive(Debug, Clone, Default)]
pub struct DocSet {
    rows: Vec<DocRow>,
    foreign_readers: BTreeMap<i32, Arc<dyn IndexReader>>,
}

impl DocSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unscored set from document ids, in iteration order.
    pub fn from_docs(docs: impl IntoIterator<Item = DocId>) -> Self {
        Self::from_scored(docs.into_iter().map(|doc| (doc, 0.0)))
    }

    /// Scored set from `(doc, score)` pairs, in iteration order.
    pub fn from_scored(docs: impl IntoIterator<Item = (DocId, f32)>) -> Self {
        Self {
            rows: docs
                .into_iter()
                .map(|(doc, score)| DocRow::new(doc, score))
                .collect(),
            foreign_readers: BTreeMap::new(),
        }
    }

    /// Empty set that keeps the foreign readers attached to `self`.
    ///
    /// Used when a join derives a new set from a previous join's output.
    pub fn empty_like(&self, capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            foreign_readers: self.foreign_readers.clone(),
        }
    }

    pub fn push(&mut self, row: DocRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DocRow] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&DocRow> {
        self.rows.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocRow> {
        self.rows.iter()
    }

    /// Document ids in row order (repeats when a join fanned out).
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.rows.iter().map(|r| r.doc).collect()
    }

    pub fn attach_foreign_reader(&mut self, position: i32, reader: Arc<dyn IndexReader>) {
        self.foreign_readers.insert(position, reader);
    }

    pub fn foreign_reader(&self, position: i32) -> Option<&Arc<dyn IndexReader>> {
        self.foreign_readers.get(&position)
    }

    /// Resolve a foreign field value for a row's match at `position`.
    ///
    /// Returns `Ok(None)` when the row doesn't exist, has no foreign match
    /// there (outer miss), the foreign field isn't indexed, or the matched
    /// document has no value.
    pub fn foreign_value(&self, row: usize, position: i32, field: &str) -> io::Result<Option<String>> {
        let Some(doc) = self
            .rows
            .get(row)
            .and_then(|r| r.foreign(position))
            .and_then(|m| m.doc)
        else {
            return Ok(None);
        };
        let Some(reader) = self.foreign_readers.get(&position) else {
            return Ok(None);
        };
        Ok(reader
            .string_index(field)?
            .and_then(|index| index.value(doc).map(str::to_owned)))
    }
}

impl<'a> IntoIterator for &'a DocSet {
    type Item = &'a DocRow;
    type IntoIter = std::slice::Iter<'a, DocRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<DocRow> for DocSet {
    fn from_iter<T: IntoIterator<Item = DocRow>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
            foreign_readers: BTreeMap::new(),
        }
    }
}
