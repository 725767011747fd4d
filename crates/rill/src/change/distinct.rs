use crate::change::AtomicChange;
use crate::error::{Error, Result};

/// A single mutation of a distinct-element set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistinctChange<T> {
    /// `item` was inserted into the set.
    Addition(T),
    /// `item` was removed from the set.
    Removal(T),
}

impl<T> DistinctChange<T> {
    /// The item carried by the change, whichever variant it is.
    pub fn item(&self) -> &T {
        match self {
            Self::Addition(item) | Self::Removal(item) => item,
        }
    }

    /// Consumes the change and returns the carried item.
    pub fn into_item(self) -> T {
        match self {
            Self::Addition(item) | Self::Removal(item) => item,
        }
    }

    /// The added item, or `WrongVariant` if this is not an addition.
    pub fn as_addition(&self) -> Result<&T> {
        match self {
            Self::Addition(item) => Ok(item),
            other => Err(Error::wrong_variant("addition", other.variant_name())),
        }
    }

    /// The removed item, or `WrongVariant` if this is not a removal.
    pub fn as_removal(&self) -> Result<&T> {
        match self {
            Self::Removal(item) => Ok(item),
            other => Err(Error::wrong_variant("removal", other.variant_name())),
        }
    }
}

impl<T> AtomicChange for DistinctChange<T> {
    fn is_removal(&self) -> bool {
        matches!(self, Self::Removal(_))
    }

    fn is_addition(&self) -> bool {
        matches!(self, Self::Addition(_))
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Self::Addition(_) => "addition",
            Self::Removal(_) => "removal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        let addition = DistinctChange::Addition(7);
        assert_eq!(addition.as_addition(), Ok(&7));
        assert_eq!(
            addition.as_removal(),
            Err(Error::WrongVariant {
                requested: "removal",
                actual: "addition",
            })
        );

        let removal = DistinctChange::Removal(7);
        assert_eq!(removal.as_removal(), Ok(&7));
        assert!(removal.as_addition().is_err());
    }

    #[test]
    fn item_is_variant_independent() {
        assert_eq!(DistinctChange::Addition("a").item(), &"a");
        assert_eq!(DistinctChange::Removal("a").into_item(), "a");
    }
}
