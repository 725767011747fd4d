//! Atomic change descriptions.
//!
//! A change describes exactly one mutation of a collection. Three families
//! exist, one per collection shape:
//!
//! - [`DistinctChange`] for sets of distinct elements,
//! - [`KeyedChange`] for maps and caches,
//! - [`SortedChange`] for index-ordered lists.
//!
//! Changes are plain data. The typed accessors (`as_addition`, `as_removal`,
//! ...) return [`Error::WrongVariant`](crate::error::Error::WrongVariant)
//! instead of panicking when the variant does not match, so callers walking a
//! heterogeneous batch can propagate mismatches with `?`.

mod distinct;
mod keyed;
mod sorted;

pub use distinct::DistinctChange;
pub use keyed::KeyedChange;
pub use sorted::SortedChange;

/// Classification probes used by the change-set builder.
///
/// The builder only needs to know whether a change removes an element or
/// introduces a new one; everything else about the variant is opaque to it.
pub trait AtomicChange {
    /// Whether this change removes an element from the collection.
    fn is_removal(&self) -> bool;

    /// Whether this change introduces a new element (an addition or an
    /// insertion). Replacements, movements and combined updates are neither
    /// additions nor removals.
    fn is_addition(&self) -> bool;

    /// Lowercase variant name, used in `WrongVariant` errors.
    fn variant_name(&self) -> &'static str;
}
