//! Token index over shared entries.
//!
//! Every display name is split into tokens and each casefolded token becomes
//! one [`Association`] holding an `Rc` to its entry. The associations are
//! bulk-sorted once by locale collation; a stable sort keeps insertion order
//! among equal tokens. Dropping the index releases every association, and an
//! entry is freed when its last association goes.

use std::rc::Rc;

use crate::collation::Collation;
use crate::model::{casefold, tokenize};

#[derive(Debug)]
pub struct Association<T> {
    token: String,
    entry: Rc<T>,
}

impl<T> Association<T> {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn entry(&self) -> &Rc<T> {
        &self.entry
    }
}

#[derive(Debug)]
pub struct Index<T> {
    collation: Rc<Collation>,
    associations: Vec<Association<T>>,
}

impl<T> Index<T> {
    pub fn len(&self) -> usize {
        self.associations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }

    pub fn associations(&self) -> &[Association<T>] {
        &self.associations
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.associations.iter().map(Association::token)
    }

    pub fn collation(&self) -> &Collation {
        &self.collation
    }

    /// Position of the first association whose token is not less than `key`.
    pub fn lower_bound(&self, key: &str) -> usize {
        self.associations
            .partition_point(|association| self.collation.compare(&association.token, key).is_lt())
    }

    /// Number of associations referencing `entry`.
    pub fn references_to(&self, entry: &Rc<T>) -> usize {
        self.associations
            .iter()
            .filter(|association| Rc::ptr_eq(&association.entry, entry))
            .count()
    }

    /// Tears the index down and reports how many associations were released.
    pub fn release(self) -> usize {
        let released = self.associations.len();
        drop(self);
        released
    }
}

pub struct IndexBuilder<T> {
    collation: Rc<Collation>,
    associations: Vec<Association<T>>,
}

impl<T> IndexBuilder<T> {
    pub fn new(collation: Rc<Collation>) -> Self {
        Self {
            collation,
            associations: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.associations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }

    /// Indexes `entry` under every token of `name` and returns how many
    /// associations were added.
    pub fn append(&mut self, name: &str, entry: &Rc<T>) -> usize {
        let before = self.associations.len();
        for token in tokenize(name) {
            let folded = casefold(token);
            if folded.is_empty() {
                continue;
            }
            self.associations.push(Association {
                token: folded,
                entry: Rc::clone(entry),
            });
        }
        self.associations.len() - before
    }

    pub fn finish(self) -> Index<T> {
        let Self {
            collation,
            mut associations,
        } = self;
        associations.sort_by(|left, right| collation.compare(&left.token, &right.token));
        Index {
            collation,
            associations,
        }
    }
}

/// Builds an index from `(display name, entry)` pairs.
///
/// An entry may appear in several pairs to be reachable under several names.
/// Each pair's handle is dropped as soon as it has been tokenized, so an entry
/// none of whose names produced a token is freed before this returns.
pub fn build_index<T, S, I>(collation: Rc<Collation>, sources: I) -> Index<T>
where
    I: IntoIterator<Item = (S, Rc<T>)>,
    S: AsRef<str>,
{
    let mut builder = IndexBuilder::new(collation);
    let mut names = 0_usize;
    for (name, entry) in sources {
        builder.append(name.as_ref(), &entry);
        names += 1;
    }
    let index = builder.finish();
    tracing::debug!(
        names,
        associations = index.len(),
        locale = index.collation().locale(),
        "index built"
    );
    index
}
