//! Typed path segments for the SVG-subset path language.

use serde::{Deserialize, Serialize};

/// The command kind of a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Start a new subpath (`M`/`m`, 2 args).
    MoveTo,
    /// Straight line (`L`/`l`, 2 args).
    LineTo,
    /// Horizontal line (`H`/`h`, 1 arg: x).
    HorizontalTo,
    /// Vertical line (`V`/`v`, 1 arg: y).
    VerticalTo,
    /// Cubic Bezier (`C`/`c`, 6 args: control1, control2, endpoint).
    CubicTo,
    /// Smooth cubic Bezier (`S`/`s`, 4 args: control2, endpoint).
    SmoothCubicTo,
    /// Quadratic Bezier (`Q`/`q`, 4 args: control, endpoint).
    QuadTo,
    /// Smooth quadratic Bezier (`T`/`t`, 2 args: endpoint).
    SmoothQuadTo,
    /// Elliptical arc (`A`/`a`, 7 args: rx, ry, rotation, large-arc, sweep, endpoint).
    ArcTo,
    /// Close the current subpath (`Z`/`z`, 0 args).
    ClosePath,
}

impl SegmentKind {
    /// Number of arguments one instance of this command consumes.
    pub const fn arity(self) -> usize {
        match self {
            SegmentKind::MoveTo | SegmentKind::LineTo | SegmentKind::SmoothQuadTo => 2,
            SegmentKind::HorizontalTo | SegmentKind::VerticalTo => 1,
            SegmentKind::CubicTo => 6,
            SegmentKind::SmoothCubicTo | SegmentKind::QuadTo => 4,
            SegmentKind::ArcTo => 7,
            SegmentKind::ClosePath => 0,
        }
    }

    /// Maps a command letter (either case) to its kind.
    pub fn from_letter(letter: char) -> Option<SegmentKind> {
        match letter.to_ascii_uppercase() {
            'M' => Some(SegmentKind::MoveTo),
            'L' => Some(SegmentKind::LineTo),
            'H' => Some(SegmentKind::HorizontalTo),
            'V' => Some(SegmentKind::VerticalTo),
            'C' => Some(SegmentKind::CubicTo),
            'S' => Some(SegmentKind::SmoothCubicTo),
            'Q' => Some(SegmentKind::QuadTo),
            'T' => Some(SegmentKind::SmoothQuadTo),
            'A' => Some(SegmentKind::ArcTo),
            'Z' => Some(SegmentKind::ClosePath),
            _ => None,
        }
    }

    /// The uppercase (absolute) command letter.
    pub const fn letter(self) -> char {
        match self {
            SegmentKind::MoveTo => 'M',
            SegmentKind::LineTo => 'L',
            SegmentKind::HorizontalTo => 'H',
            SegmentKind::VerticalTo => 'V',
            SegmentKind::CubicTo => 'C',
            SegmentKind::SmoothCubicTo => 'S',
            SegmentKind::QuadTo => 'Q',
            SegmentKind::SmoothQuadTo => 'T',
            SegmentKind::ArcTo => 'A',
            SegmentKind::ClosePath => 'Z',
        }
    }

    /// The kind a repeated coordinate group continues as.
    ///
    /// After an `M`/`m`, extra coordinate pairs are implicit line-tos; every
    /// other command repeats as itself.
    pub const fn implicit_next(self) -> SegmentKind {
        match self {
            SegmentKind::MoveTo => SegmentKind::LineTo,
            other => other,
        }
    }
}

/// One parsed path command.
///
/// `args` holds the raw literal numbers as they appeared in the path data;
/// relative commands are *not* resolved against the current point, so a
/// segment sequence round-trips through [`serialize`](crate::serialize)
/// without losing relative/absolute semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Command kind.
    pub kind: SegmentKind,
    /// Whether the command letter was uppercase (absolute coordinates).
    pub absolute: bool,
    /// Raw numeric arguments; length always equals `kind.arity()`.
    pub args: Vec<f64>,
}

impl PathSegment {
    /// Creates a segment. `args.len()` must equal `kind.arity()`.
    pub fn new(kind: SegmentKind, absolute: bool, args: Vec<f64>) -> Self {
        debug_assert_eq!(args.len(), kind.arity());
        Self {
            kind,
            absolute,
            args,
        }
    }

    /// The command letter with case encoding the absolute flag.
    pub fn letter(&self) -> char {
        if self.absolute {
            self.kind.letter()
        } else {
            self.kind.letter().to_ascii_lowercase()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_matches_svg_grammar() {
        assert_eq!(SegmentKind::MoveTo.arity(), 2);
        assert_eq!(SegmentKind::HorizontalTo.arity(), 1);
        assert_eq!(SegmentKind::CubicTo.arity(), 6);
        assert_eq!(SegmentKind::QuadTo.arity(), 4);
        assert_eq!(SegmentKind::ArcTo.arity(), 7);
        assert_eq!(SegmentKind::ClosePath.arity(), 0);
    }

    #[test]
    fn letters_round_trip_through_kind() {
        for letter in ['M', 'L', 'H', 'V', 'C', 'S', 'Q', 'T', 'A', 'Z'] {
            let kind = SegmentKind::from_letter(letter).unwrap();
            assert_eq!(kind.letter(), letter);
            assert_eq!(SegmentKind::from_letter(letter.to_ascii_lowercase()), Some(kind));
        }
        assert_eq!(SegmentKind::from_letter('x'), None);
    }

    #[test]
    fn letter_case_encodes_absolute_flag() {
        let abs = PathSegment::new(SegmentKind::LineTo, true, vec![1.0, 2.0]);
        let rel = PathSegment::new(SegmentKind::LineTo, false, vec![1.0, 2.0]);
        assert_eq!(abs.letter(), 'L');
        assert_eq!(rel.letter(), 'l');
    }

    #[test]
    fn move_to_repeats_as_line_to() {
        assert_eq!(SegmentKind::MoveTo.implicit_next(), SegmentKind::LineTo);
        assert_eq!(SegmentKind::CubicTo.implicit_next(), SegmentKind::CubicTo);
    }
}
