//! Subject collections: change-tracking collections wrapped with reactive
//! publication.
//!
//! Every public mutation runs the underlying collection operation and then
//! publishes whatever it left pending, so observer callbacks (stream sends)
//! happen synchronously before the mutating method returns. Reads are
//! snapshots taken at call time.

mod cache;
mod list;
mod map;
mod set;

pub use cache::SubjectCache;
pub use list::SubjectList;
pub use map::SubjectMap;
pub use set::SubjectSet;
