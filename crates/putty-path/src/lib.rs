//! SVG-subset path data for putty.
//!
//! Provides the typed command sequence the warp engine consumes: a tolerant
//! parser for `d`-attribute style path strings and a stable 6-decimal
//! serializer.
//!
//! # Example
//!
//! ```
//! use putty_path::{parse, serialize, SegmentKind};
//!
//! let segments = parse("M0 0 L100 0 L100 50 Z");
//! assert_eq!(segments.len(), 4);
//! assert_eq!(segments[3].kind, SegmentKind::ClosePath);
//! assert_eq!(serialize(&segments), "M 0.000000 0.000000 L 100.000000 0.000000 L 100.000000 50.000000 Z");
//! ```

mod codec;
mod segment;

pub use codec::{parse, parse_strict, serialize, PathParseError, COORD_EPSILON};
pub use segment::{PathSegment, SegmentKind};
