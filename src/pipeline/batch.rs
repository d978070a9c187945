//! Batch store: the ordered working set of a multi-file tool.
//!
//! Order is submission order. Nothing here sorts; entries move only through
//! [`Batch::move_adjacent`] and leave only through [`Batch::remove_at`] or
//! [`Batch::clear`]. Duplicate names are distinct entries.

use crate::pipeline::input::StagedFile;
use crate::pipeline::validate::{classify, FileKind};
use tracing::{debug, warn};

/// Direction for [`Batch::move_adjacent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// What [`Batch::append`] did with one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Every file was accepted.
    Accepted { added: usize },
    /// Some files were dropped; the rest were appended.
    PartiallyAccepted { added: usize, rejected: usize },
    /// Nothing usable; the batch is unchanged.
    NothingUsable { rejected: usize },
}

impl AppendOutcome {
    pub fn added(self) -> usize {
        match self {
            AppendOutcome::Accepted { added } | AppendOutcome::PartiallyAccepted { added, .. } => {
                added
            }
            AppendOutcome::NothingUsable { .. } => 0,
        }
    }

    pub fn rejected(self) -> usize {
        match self {
            AppendOutcome::Accepted { .. } => 0,
            AppendOutcome::PartiallyAccepted { rejected, .. }
            | AppendOutcome::NothingUsable { rejected } => rejected,
        }
    }
}

/// Ordered files for one tool instance.
#[derive(Debug, Clone)]
pub struct Batch {
    kind: FileKind,
    files: Vec<StagedFile>,
}

impl Batch {
    pub fn new(kind: FileKind) -> Self {
        Self {
            kind,
            files: Vec::new(),
        }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Validate `incoming` and append the accepted files, in their relative
    /// order, after the existing entries.
    pub fn append(&mut self, incoming: Vec<StagedFile>) -> AppendOutcome {
        let total = incoming.len();
        let accepted: Vec<StagedFile> = incoming
            .into_iter()
            .filter(|f| {
                let ok = classify(f, self.kind).is_accepted();
                if !ok {
                    debug!("Dropping {} ({}): not a {:?}", f.name, f.mime_type, self.kind);
                }
                ok
            })
            .collect();
        let added = accepted.len();
        let rejected = total - added;

        if added == 0 {
            warn!("No usable files in input ({} rejected)", rejected);
            return AppendOutcome::NothingUsable { rejected };
        }

        self.files.extend(accepted);
        debug!("Batch now holds {} file(s)", self.files.len());

        if rejected > 0 {
            warn!("Dropped {} file(s) of the wrong type", rejected);
            AppendOutcome::PartiallyAccepted { added, rejected }
        } else {
            AppendOutcome::Accepted { added }
        }
    }

    /// Remove the entry at `index`. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<StagedFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    /// Swap the entry at `index` with its neighbour. Returns whether anything moved.
    pub fn move_adjacent(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        match target {
            Some(t) if index < self.files.len() && t < self.files.len() => {
                self.files.swap(index, t);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }

    /// True once the batch holds at least `minimum` entries.
    pub fn meets_minimum(&self, minimum: usize) -> bool {
        self.files.len() >= minimum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> StagedFile {
        StagedFile::new(name, 10, "application/pdf", format!("/tmp/{name}"))
    }

    fn png(name: &str) -> StagedFile {
        StagedFile::new(name, 10, "image/png", format!("/tmp/{name}"))
    }

    fn names(b: &Batch) -> Vec<&str> {
        b.files().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn append_keeps_relative_order_and_existing_entries() {
        let mut b = Batch::new(FileKind::Pdf);
        assert_eq!(b.append(vec![pdf("a"), pdf("b")]), AppendOutcome::Accepted { added: 2 });
        let out = b.append(vec![png("x"), pdf("c"), png("y"), pdf("d")]);
        assert_eq!(out, AppendOutcome::PartiallyAccepted { added: 2, rejected: 2 });
        assert_eq!(names(&b), ["a", "b", "c", "d"]);
    }

    #[test]
    fn all_rejected_leaves_batch_unchanged() {
        let mut b = Batch::new(FileKind::Pdf);
        b.append(vec![pdf("a")]);
        let out = b.append(vec![png("x"), png("y")]);
        assert_eq!(out, AppendOutcome::NothingUsable { rejected: 2 });
        assert_eq!(names(&b), ["a"]);
    }

    #[test]
    fn empty_event_is_nothing_usable() {
        let mut b = Batch::new(FileKind::Image);
        assert_eq!(b.append(vec![]), AppendOutcome::NothingUsable { rejected: 0 });
    }

    #[test]
    fn duplicates_are_distinct_entries() {
        let mut b = Batch::new(FileKind::Pdf);
        b.append(vec![pdf("a"), pdf("a")]);
        assert_eq!(b.len(), 2);
        b.remove_at(0);
        assert_eq!(names(&b), ["a"]);
    }

    #[test]
    fn boundary_moves_are_noops() {
        let mut b = Batch::new(FileKind::Pdf);
        b.append(vec![pdf("a"), pdf("b"), pdf("c")]);
        assert!(!b.move_adjacent(0, Direction::Up));
        assert!(!b.move_adjacent(2, Direction::Down));
        assert!(!b.move_adjacent(7, Direction::Up));
        assert!(!b.move_adjacent(usize::MAX, Direction::Down));
        assert_eq!(names(&b), ["a", "b", "c"]);
    }

    #[test]
    fn reorder_is_a_permutation() {
        let mut b = Batch::new(FileKind::Pdf);
        b.append(vec![pdf("a"), pdf("b"), pdf("c"), pdf("d")]);
        assert!(b.move_adjacent(0, Direction::Down));
        assert!(b.move_adjacent(3, Direction::Up));
        assert_eq!(names(&b), ["b", "a", "d", "c"]);
        assert_eq!(b.remove_at(1).map(|f| f.name), Some("a".to_string()));
        assert_eq!(names(&b), ["b", "d", "c"]);
    }

    #[test]
    fn remove_out_of_range_is_silent() {
        let mut b = Batch::new(FileKind::Pdf);
        b.append(vec![pdf("a")]);
        assert!(b.remove_at(5).is_none());
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn minimum_flips_exactly_at_boundary() {
        let mut b = Batch::new(FileKind::Pdf);
        b.append(vec![pdf("a")]);
        assert!(!b.meets_minimum(2));
        b.append(vec![pdf("b")]);
        assert!(b.meets_minimum(2));
        b.remove_at(0);
        assert!(!b.meets_minimum(2));
        b.clear();
        assert!(b.is_empty());
    }
}
