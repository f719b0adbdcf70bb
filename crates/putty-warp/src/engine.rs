//! Warping of parsed path command sequences.
//!
//! Remaps every coordinate pair in a segment sequence through a
//! [`BilinearWarpField`], preserving command structure and relative/absolute
//! semantics. The input sequence is never mutated; warping always produces a
//! fresh sequence so the original stays available for reset.

use glam::DVec2;
use putty_path::{parse, serialize, PathSegment, SegmentKind};

use crate::BilinearWarpField;

/// Warps a path-data string and re-serializes the result.
pub fn warp_path_data(data: &str, field: &BilinearWarpField<'_>) -> String {
    serialize(&warp_segments(&parse(data), field))
}

/// Warps a segment sequence through a deformation field.
///
/// Coordinate handling per command:
///
/// - `M`/`L`/`T`: the endpoint is remapped.
/// - `H`/`V`: the missing coordinate is synthesized from the last *warped*
///   position before mapping, and only the warped x (resp. y) is kept.
/// - `C`: control1, control2, and the endpoint are remapped independently,
///   which is what lets straight-ish curves S-bend under the mesh.
/// - `S`/`Q`: both coordinate pairs are remapped.
/// - `A`: only the endpoint is remapped; rx/ry/rotation/flags pass through.
///   Correcting an arc's radius and rotation for local mesh shear is a known
///   limitation, acceptable for the typographic curves this targets.
/// - `Z`: no coordinates, but the warped position of the subpath's `MoveTo`
///   becomes the current position, so a following relative command resolves
///   against the warped subpath start.
///
/// Relative commands resolve their literals against the running unwarped
/// current point, map the absolute position, and re-encode the delta against
/// the running warped current point.
pub fn warp_segments(segments: &[PathSegment], field: &BilinearWarpField<'_>) -> Vec<PathSegment> {
    let mut out = Vec::with_capacity(segments.len());

    // Current point in source (unwarped) space, and its warped image.
    let mut current = DVec2::ZERO;
    let mut warped = DVec2::ZERO;
    // Subpath start, both spaces, for ClosePath bookkeeping.
    let mut start = DVec2::ZERO;
    let mut warped_start = DVec2::ZERO;

    for seg in segments {
        if seg.args.len() != seg.kind.arity() {
            // Malformed arity from a hand-built segment: pass the command
            // through untouched and keep bookkeeping from the unwarped
            // values if the tail looks like a coordinate pair.
            log::warn!(
                "warp: '{}' carries {} args (expected {}), passing through",
                seg.letter(),
                seg.args.len(),
                seg.kind.arity()
            );
            if let [.., x, y] = seg.args[..] {
                let abs = resolve(DVec2::new(x, y), seg.absolute, current);
                current = abs;
                warped = abs;
            }
            out.push(seg.clone());
            continue;
        }

        // Relative literals in one segment all resolve against the position
        // at segment entry, and re-encode against its warped image.
        let base = current;
        let warped_base = warped;

        let mut args = seg.args.clone();
        match seg.kind {
            SegmentKind::MoveTo => {
                let abs = resolve(DVec2::new(args[0], args[1]), seg.absolute, base);
                let w = field.map(abs);
                encode(&mut args[0..2], w, seg.absolute, warped_base);
                current = abs;
                warped = w;
                start = abs;
                warped_start = w;
            }
            SegmentKind::LineTo | SegmentKind::SmoothQuadTo => {
                let abs = resolve(DVec2::new(args[0], args[1]), seg.absolute, base);
                let w = field.map(abs);
                encode(&mut args[0..2], w, seg.absolute, warped_base);
                current = abs;
                warped = w;
            }
            SegmentKind::HorizontalTo => {
                let abs_x = if seg.absolute { args[0] } else { base.x + args[0] };
                let w = field.map(DVec2::new(abs_x, warped.y));
                args[0] = if seg.absolute { w.x } else { w.x - warped_base.x };
                current.x = abs_x;
                warped.x = w.x;
            }
            SegmentKind::VerticalTo => {
                let abs_y = if seg.absolute { args[0] } else { base.y + args[0] };
                let w = field.map(DVec2::new(warped.x, abs_y));
                args[0] = if seg.absolute { w.y } else { w.y - warped_base.y };
                current.y = abs_y;
                warped.y = w.y;
            }
            SegmentKind::CubicTo => {
                for pair in [0, 2] {
                    let abs = resolve(
                        DVec2::new(args[pair], args[pair + 1]),
                        seg.absolute,
                        base,
                    );
                    let w = field.map(abs);
                    encode(&mut args[pair..pair + 2], w, seg.absolute, warped_base);
                }
                let abs = resolve(DVec2::new(args[4], args[5]), seg.absolute, base);
                let w = field.map(abs);
                encode(&mut args[4..6], w, seg.absolute, warped_base);
                current = abs;
                warped = w;
            }
            SegmentKind::SmoothCubicTo | SegmentKind::QuadTo => {
                let abs_ctrl = resolve(DVec2::new(args[0], args[1]), seg.absolute, base);
                let w_ctrl = field.map(abs_ctrl);
                encode(&mut args[0..2], w_ctrl, seg.absolute, warped_base);

                let abs = resolve(DVec2::new(args[2], args[3]), seg.absolute, base);
                let w = field.map(abs);
                encode(&mut args[2..4], w, seg.absolute, warped_base);
                current = abs;
                warped = w;
            }
            SegmentKind::ArcTo => {
                // Leading five parameters (rx, ry, rotation, flags) pass
                // through unchanged.
                let abs = resolve(DVec2::new(args[5], args[6]), seg.absolute, base);
                let w = field.map(abs);
                encode(&mut args[5..7], w, seg.absolute, warped_base);
                current = abs;
                warped = w;
            }
            SegmentKind::ClosePath => {
                current = start;
                warped = warped_start;
            }
        }

        out.push(PathSegment::new(seg.kind, seg.absolute, args));
    }

    out
}

fn resolve(literal: DVec2, absolute: bool, base: DVec2) -> DVec2 {
    if absolute {
        literal
    } else {
        base + literal
    }
}

fn encode(slot: &mut [f64], warped: DVec2, absolute: bool, warped_base: DVec2) {
    let value = if absolute { warped } else { warped - warped_base };
    slot[0] = value.x;
    slot[1] = value.y;
}
