use crate::change::AtomicChange;
use crate::error::{Error, Result};

/// A single mutation of an index-ordered list.
///
/// Indices are valid against the list state produced by the changes that
/// precede this one in the same batch (see the ordering rules on
/// [`ChangeTrackingList`](crate::tracking::ChangeTrackingList)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortedChange<T> {
    /// `item` was inserted at `index`; later elements shifted right.
    Insertion { index: usize, item: T },
    /// `item` was removed from `index`; later elements shifted left.
    Removal { index: usize, item: T },
    /// `item` moved from `old_index` to `new_index` without being replaced.
    Movement {
        old_index: usize,
        new_index: usize,
        item: T,
    },
    /// The element at `index` changed from `old_item` to `new_item`.
    Replacement {
        index: usize,
        old_item: T,
        new_item: T,
    },
    /// Combined replace-and-move: `old_item` left `old_index` and `new_item`
    /// now sits at `new_index`.
    Update {
        old_index: usize,
        old_item: T,
        new_index: usize,
        new_item: T,
    },
}

impl<T> SortedChange<T> {
    /// Index and inserted item, or `WrongVariant`.
    pub fn as_insertion(&self) -> Result<(usize, &T)> {
        match self {
            Self::Insertion { index, item } => Ok((*index, item)),
            other => Err(Error::wrong_variant("insertion", other.variant_name())),
        }
    }

    /// Index and removed item, or `WrongVariant`.
    pub fn as_removal(&self) -> Result<(usize, &T)> {
        match self {
            Self::Removal { index, item } => Ok((*index, item)),
            other => Err(Error::wrong_variant("removal", other.variant_name())),
        }
    }

    /// Old index, new index and moved item, or `WrongVariant`.
    pub fn as_movement(&self) -> Result<(usize, usize, &T)> {
        match self {
            Self::Movement {
                old_index,
                new_index,
                item,
            } => Ok((*old_index, *new_index, item)),
            other => Err(Error::wrong_variant("movement", other.variant_name())),
        }
    }

    /// Index, old item and new item, or `WrongVariant`.
    pub fn as_replacement(&self) -> Result<(usize, &T, &T)> {
        match self {
            Self::Replacement {
                index,
                old_item,
                new_item,
            } => Ok((*index, old_item, new_item)),
            other => Err(Error::wrong_variant("replacement", other.variant_name())),
        }
    }

    /// Both halves of a combined update, or `WrongVariant`.
    pub fn as_update(&self) -> Result<(usize, &T, usize, &T)> {
        match self {
            Self::Update {
                old_index,
                old_item,
                new_index,
                new_item,
            } => Ok((*old_index, old_item, *new_index, new_item)),
            other => Err(Error::wrong_variant("update", other.variant_name())),
        }
    }
}

impl<T> AtomicChange for SortedChange<T> {
    fn is_removal(&self) -> bool {
        matches!(self, Self::Removal { .. })
    }

    fn is_addition(&self) -> bool {
        matches!(self, Self::Insertion { .. })
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Self::Insertion { .. } => "insertion",
            Self::Removal { .. } => "removal",
            Self::Movement { .. } => "movement",
            Self::Replacement { .. } => "replacement",
            Self::Update { .. } => "update",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        let insertion = SortedChange::Insertion { index: 0, item: 'x' };
        assert_eq!(insertion.as_insertion(), Ok((0, &'x')));
        assert!(insertion.as_removal().is_err());

        let movement = SortedChange::Movement {
            old_index: 2,
            new_index: 0,
            item: 'y',
        };
        assert_eq!(movement.as_movement(), Ok((2, 0, &'y')));
        assert_eq!(
            movement.as_update(),
            Err(Error::WrongVariant {
                requested: "update",
                actual: "movement",
            })
        );
    }

    #[test]
    fn only_insertions_count_as_additions() {
        let changes: Vec<SortedChange<u8>> = vec![
            SortedChange::Insertion { index: 0, item: 1 },
            SortedChange::Removal { index: 0, item: 1 },
            SortedChange::Movement {
                old_index: 0,
                new_index: 1,
                item: 1,
            },
            SortedChange::Replacement {
                index: 0,
                old_item: 1,
                new_item: 2,
            },
        ];
        let additions: Vec<bool> = changes.iter().map(AtomicChange::is_addition).collect();
        assert_eq!(additions, [true, false, false, false]);
    }
}
