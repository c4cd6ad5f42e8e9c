//! Data models
//!
//! Feeding chart shapes: the untrusted import form, the canonical table and
//! the per-query result.

mod feed;
mod feeding;
mod raw_feed;

pub(crate) use feed::FeedIdentity;
pub use feed::{CanonicalFeed, Orientation, PresentedAxis, Presentation};
pub use feeding::{CellRef, CornerTrace, FeedingResult, RangeBounds};
pub use raw_feed::{RawAxes, RawAxis, RawFeed, RawGrid};
