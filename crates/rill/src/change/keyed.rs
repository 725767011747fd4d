use crate::change::AtomicChange;
use crate::error::{Error, Result};

/// A single mutation of a keyed collection (map or cache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyedChange<K, V> {
    /// `item` was inserted under `key`, which was previously absent.
    Addition { key: K, item: V },
    /// `item` was removed together with `key`.
    Removal { key: K, item: V },
    /// The value under `key` changed from `old_item` to `new_item`.
    Replacement { key: K, old_item: V, new_item: V },
}

impl<K, V> KeyedChange<K, V> {
    /// The key the change applies to, whichever variant it is.
    pub fn key(&self) -> &K {
        match self {
            Self::Addition { key, .. } | Self::Removal { key, .. } | Self::Replacement { key, .. } => {
                key
            }
        }
    }

    /// Key and added item, or `WrongVariant` if this is not an addition.
    pub fn as_addition(&self) -> Result<(&K, &V)> {
        match self {
            Self::Addition { key, item } => Ok((key, item)),
            other => Err(Error::wrong_variant("addition", other.variant_name())),
        }
    }

    /// Key and removed item, or `WrongVariant` if this is not a removal.
    pub fn as_removal(&self) -> Result<(&K, &V)> {
        match self {
            Self::Removal { key, item } => Ok((key, item)),
            other => Err(Error::wrong_variant("removal", other.variant_name())),
        }
    }

    /// Key, old item and new item, or `WrongVariant` if this is not a
    /// replacement.
    pub fn as_replacement(&self) -> Result<(&K, &V, &V)> {
        match self {
            Self::Replacement {
                key,
                old_item,
                new_item,
            } => Ok((key, old_item, new_item)),
            other => Err(Error::wrong_variant("replacement", other.variant_name())),
        }
    }
}

impl<K, V> AtomicChange for KeyedChange<K, V> {
    fn is_removal(&self) -> bool {
        matches!(self, Self::Removal { .. })
    }

    fn is_addition(&self) -> bool {
        matches!(self, Self::Addition { .. })
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Self::Addition { .. } => "addition",
            Self::Removal { .. } => "removal",
            Self::Replacement { .. } => "replacement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_variant_independent() {
        let addition = KeyedChange::Addition { key: "a", item: 1 };
        let removal = KeyedChange::Removal { key: "b", item: 2 };
        let replacement = KeyedChange::Replacement {
            key: "c",
            old_item: 3,
            new_item: 4,
        };
        assert_eq!(addition.key(), &"a");
        assert_eq!(removal.key(), &"b");
        assert_eq!(replacement.key(), &"c");
    }

    #[test]
    fn replacement_accessor() {
        let replacement = KeyedChange::Replacement {
            key: "k",
            old_item: 1,
            new_item: 2,
        };
        assert_eq!(replacement.as_replacement(), Ok((&"k", &1, &2)));
        assert_eq!(
            replacement.as_addition(),
            Err(Error::WrongVariant {
                requested: "addition",
                actual: "replacement",
            })
        );
    }
}
