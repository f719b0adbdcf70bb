//! Parsing and serialization of SVG-subset path data.
//!
//! The parser accepts the `M L H V C S Q T A Z` command set in both absolute
//! and relative form, with implicit command repetition (`"M0 0 10 10"` is a
//! move followed by a line). Segments keep their raw literal arguments, so
//! parse → serialize → parse is numerically stable.

use std::fmt::Write;

use crate::{PathSegment, SegmentKind};
use thiserror::Error;

/// Magnitude below which serialized coordinates snap to exactly `0`.
///
/// Keeps output free of scientific-notation artifacts and stable across runs.
pub const COORD_EPSILON: f64 = 1e-6;

/// Error from [`parse_strict`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathParseError {
    /// A letter that is not part of the supported command set.
    #[error("unrecognized path command '{0}'")]
    UnknownCommand(char),

    /// A numeric token that did not scan as a finite float.
    #[error("malformed number '{token}' in '{command}' command")]
    MalformedNumber {
        /// The command letter being parsed.
        command: char,
        /// The offending token text.
        token: String,
    },

    /// A command with fewer arguments than its arity requires.
    #[error("truncated '{command}' command: expected {expected} arguments, found {found}")]
    TruncatedCommand {
        /// The command letter being parsed.
        command: char,
        /// Arguments the command needs.
        expected: usize,
        /// Arguments actually present.
        found: usize,
    },

    /// Numbers appeared before any command letter.
    #[error("expected a command letter at byte {0}")]
    ExpectedCommand(usize),
}

/// Parses path data, dropping malformed commands.
///
/// This is the tolerant entry point and the default behavior: a command with
/// a malformed or missing number is logged via [`log::warn!`] and skipped,
/// and parsing continues at the next command letter. Glyph-derived paths are
/// always well formed; third-party paths degrade gracefully instead of
/// failing. Use [`parse_strict`] to surface these defects as errors.
pub fn parse(data: &str) -> Vec<PathSegment> {
    parse_impl(data, false).unwrap_or_default()
}

/// Parses path data, failing on the first malformed command.
pub fn parse_strict(data: &str) -> Result<Vec<PathSegment>, PathParseError> {
    parse_impl(data, true)
}

/// Serializes segments back to path data.
///
/// Every argument is formatted to 6 decimal places, with magnitudes below
/// [`COORD_EPSILON`] snapped to exactly `0`. [`SegmentKind::ClosePath`]
/// serializes with no trailing arguments regardless of input.
pub fn serialize(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(seg.letter());
        if seg.kind == SegmentKind::ClosePath {
            continue;
        }
        for &arg in &seg.args {
            let arg = if arg.abs() < COORD_EPSILON { 0.0 } else { arg };
            write!(out, " {arg:.6}").unwrap();
        }
    }
    out
}

fn parse_impl(data: &str, strict: bool) -> Result<Vec<PathSegment>, PathParseError> {
    let mut segments = Vec::new();
    let mut tok = Tokenizer::new(data);

    loop {
        tok.skip_separators();
        let Some(letter) = tok.next_letter() else {
            if tok.at_end() {
                break;
            }
            // Numbers with no command to attach to.
            if strict {
                return Err(PathParseError::ExpectedCommand(tok.pos()));
            }
            log::warn!("path data: stray token before any command, skipping");
            tok.skip_to_letter();
            continue;
        };

        let Some(kind) = SegmentKind::from_letter(letter) else {
            if strict {
                return Err(PathParseError::UnknownCommand(letter));
            }
            log::warn!("path data: dropping unrecognized command '{letter}'");
            tok.skip_to_letter();
            continue;
        };
        let absolute = letter.is_ascii_uppercase();

        if kind == SegmentKind::ClosePath {
            segments.push(PathSegment::new(kind, absolute, Vec::new()));
            continue;
        }

        // One or more coordinate groups; extra groups repeat the command
        // (M repeats as L).
        let mut group_kind = kind;
        let mut first = true;
        loop {
            if !first && !tok.peek_number() {
                break;
            }
            match read_group(&mut tok, letter, group_kind.arity(), strict)? {
                Some(args) => {
                    segments.push(PathSegment::new(group_kind, absolute, args))
                }
                None => {
                    // Tolerant mode dropped this command; resync on the
                    // next command letter.
                    tok.skip_to_letter();
                    break;
                }
            }
            group_kind = group_kind.implicit_next();
            first = false;
        }
    }

    Ok(segments)
}

/// Reads one group of `arity` numbers, or `None` when the group is dropped
/// in tolerant mode.
fn read_group(
    tok: &mut Tokenizer<'_>,
    command: char,
    arity: usize,
    strict: bool,
) -> Result<Option<Vec<f64>>, PathParseError> {
    let mut args = Vec::with_capacity(arity);
    for _ in 0..arity {
        match tok.next_number() {
            Some(Ok(value)) => args.push(value),
            Some(Err(token)) => {
                if strict {
                    return Err(PathParseError::MalformedNumber { command, token });
                }
                log::warn!("path data: malformed number '{token}', dropping '{command}' command");
                return Ok(None);
            }
            None => {
                if strict {
                    return Err(PathParseError::TruncatedCommand {
                        command,
                        expected: arity,
                        found: args.len(),
                    });
                }
                log::warn!("path data: truncated '{command}' command, dropping");
                return Ok(None);
            }
        }
    }
    Ok(Some(args))
}

/// Byte-level scanner over path data.
///
/// Separators are whitespace and commas; numbers carry an optional sign,
/// decimal digits/dots, and an optional exponent.
struct Tokenizer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            bytes: data.as_bytes(),
            pos: 0,
        }
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b',') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Consumes everything up to (not including) the next command letter.
    fn skip_to_letter(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E') {
                break;
            }
            self.pos += 1;
        }
    }

    /// Consumes the next command letter, if one is next.
    fn next_letter(&mut self) -> Option<char> {
        self.skip_separators();
        let &b = self.bytes.get(self.pos)?;
        if b.is_ascii_alphabetic() {
            self.pos += 1;
            Some(b as char)
        } else {
            None
        }
    }

    /// True if the next token starts a number.
    fn peek_number(&mut self) -> bool {
        self.skip_separators();
        matches!(
            self.bytes.get(self.pos),
            Some(b'0'..=b'9' | b'-' | b'+' | b'.')
        )
    }

    /// Scans the next numeric token.
    ///
    /// Returns `None` when the next token is a command letter or the end of
    /// input, `Some(Err(token))` when the token does not parse as a finite
    /// float (e.g. `"1.2.3"` or an overflowing exponent).
    fn next_number(&mut self) -> Option<Result<f64, String>> {
        self.skip_separators();
        let &b = self.bytes.get(self.pos)?;
        if b.is_ascii_alphabetic() {
            return None;
        }

        let start = self.pos;
        if matches!(b, b'-' | b'+') {
            self.pos += 1;
        }
        while matches!(self.bytes.get(self.pos), Some(b'0'..=b'9' | b'.')) {
            self.pos += 1;
        }
        if matches!(self.bytes.get(self.pos), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b'-' | b'+')) {
                self.pos += 1;
            }
            while matches!(self.bytes.get(self.pos), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        if self.pos == start {
            // A symbol that is neither a letter nor part of a number.
            self.pos += 1;
            return Some(Err((b as char).to_string()));
        }

        let token = std::str::from_utf8(&self.bytes[start..self.pos])
            .unwrap_or_default()
            .to_string();
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(Ok(value)),
            _ => Some(Err(token)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(segments: &[PathSegment]) -> Vec<SegmentKind> {
        segments.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn parses_absolute_and_relative_commands() {
        let segs = parse("M10 20 l5,-5 H40 v3 Z");
        assert_eq!(
            kinds(&segs),
            vec![
                SegmentKind::MoveTo,
                SegmentKind::LineTo,
                SegmentKind::HorizontalTo,
                SegmentKind::VerticalTo,
                SegmentKind::ClosePath,
            ]
        );
        assert!(segs[0].absolute);
        assert!(!segs[1].absolute);
        assert_eq!(segs[1].args, vec![5.0, -5.0]);
        assert_eq!(segs[3].args, vec![3.0]);
    }

    #[test]
    fn parses_curves_and_arcs() {
        let segs = parse("M0 0 C1 2 3 4 5 6 S7 8 9 10 Q1 1 2 2 T3 3 A5 5 0 0 1 10 10");
        assert_eq!(
            kinds(&segs),
            vec![
                SegmentKind::MoveTo,
                SegmentKind::CubicTo,
                SegmentKind::SmoothCubicTo,
                SegmentKind::QuadTo,
                SegmentKind::SmoothQuadTo,
                SegmentKind::ArcTo,
            ]
        );
        assert_eq!(segs[1].args.len(), 6);
        assert_eq!(segs[5].args, vec![5.0, 5.0, 0.0, 0.0, 1.0, 10.0, 10.0]);
    }

    #[test]
    fn implicit_repetition_after_move_is_line() {
        let segs = parse("M0 0 10 10 20 20");
        assert_eq!(
            kinds(&segs),
            vec![SegmentKind::MoveTo, SegmentKind::LineTo, SegmentKind::LineTo]
        );

        let segs = parse("m0 0 10 10");
        assert_eq!(kinds(&segs), vec![SegmentKind::MoveTo, SegmentKind::LineTo]);
        assert!(!segs[1].absolute);
    }

    #[test]
    fn scans_compact_svg_number_forms() {
        let segs = parse("M1e2 .5 L-3-4");
        assert_eq!(segs[0].args, vec![100.0, 0.5]);
        assert_eq!(segs[1].args, vec![-3.0, -4.0]);
    }

    #[test]
    fn malformed_number_drops_only_that_command() {
        let segs = parse("M0 0 L1.2.3 7 L5 5");
        assert_eq!(kinds(&segs), vec![SegmentKind::MoveTo, SegmentKind::LineTo]);
        assert_eq!(segs[1].args, vec![5.0, 5.0]);
    }

    #[test]
    fn truncated_command_is_dropped() {
        let segs = parse("M0 0 L5");
        assert_eq!(kinds(&segs), vec![SegmentKind::MoveTo]);
    }

    #[test]
    fn unknown_command_is_dropped_with_its_arguments() {
        let segs = parse("M0 0 W1 2 3 L5 5");
        assert_eq!(kinds(&segs), vec![SegmentKind::MoveTo, SegmentKind::LineTo]);
        assert_eq!(segs[1].args, vec![5.0, 5.0]);
    }

    #[test]
    fn strict_mode_reports_defects() {
        assert!(matches!(
            parse_strict("M0 0 W1 2"),
            Err(PathParseError::UnknownCommand('W'))
        ));
        assert!(matches!(
            parse_strict("M0 0 L5"),
            Err(PathParseError::TruncatedCommand { command: 'L', expected: 2, found: 1 })
        ));
        assert!(matches!(
            parse_strict("L1.2.3 4"),
            Err(PathParseError::MalformedNumber { command: 'L', .. })
        ));
        assert!(matches!(
            parse_strict("1 2 L3 4"),
            Err(PathParseError::ExpectedCommand(0))
        ));
        assert!(parse_strict("M0 0 L100 0 L100 50 Z").is_ok());
    }

    #[test]
    fn serialize_formats_six_decimals() {
        let segs = parse("M1.5 2 L0.1234567 -3");
        let out = serialize(&segs);
        assert_eq!(out, "M 1.500000 2.000000 L 0.123457 -3.000000");
    }

    #[test]
    fn serialize_snaps_near_zero_to_zero() {
        let segs = vec![PathSegment::new(
            SegmentKind::LineTo,
            true,
            vec![1e-9, -1e-7],
        )];
        assert_eq!(serialize(&segs), "L 0.000000 0.000000");
    }

    #[test]
    fn close_path_serializes_without_arguments() {
        let segs = parse("M0 0 L1 1 Z");
        assert!(serialize(&segs).ends_with('Z'));
    }

    #[test]
    fn round_trip_is_numerically_stable() {
        let source = "M0 0 L100 0 C10 20 30 40 50 60 Q1 2 3 4 A5 5 0 0 1 9 9 h7 v-2 t1 1 Z";
        let first = parse(source);
        let second = parse(&serialize(&first));
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.absolute, b.absolute);
            for (x, y) in a.args.iter().zip(&b.args) {
                assert!((x - y).abs() < COORD_EPSILON, "{x} vs {y}");
            }
        }
    }
}
