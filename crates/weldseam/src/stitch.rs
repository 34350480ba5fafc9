//! Stitching line fragments that share endpoints into maximal chains.

use tracing::debug;
use weldseam_math::{Point3, Tolerance};

use crate::line::Line;

/// Which endpoints of two chains meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joint {
    StartStart,
    StartEnd,
    EndStart,
    EndEnd,
}

fn find_joint(a: &[Point3], b: &[Point3], tol: &Tolerance) -> Option<Joint> {
    let (a_start, a_end) = (&a[0], &a[a.len() - 1]);
    let (b_start, b_end) = (&b[0], &b[b.len() - 1]);
    if tol.points_equal(a_start, b_start) {
        Some(Joint::StartStart)
    } else if tol.points_equal(a_start, b_end) {
        Some(Joint::StartEnd)
    } else if tol.points_equal(a_end, b_start) {
        Some(Joint::EndStart)
    } else if tol.points_equal(a_end, b_end) {
        Some(Joint::EndEnd)
    } else {
        None
    }
}

/// Join `b` onto `a` at `joint`, keeping the shared point once.
fn splice(a: Vec<Point3>, b: &[Point3], joint: Joint) -> Vec<Point3> {
    let mut out = Vec::with_capacity(a.len() + b.len() - 1);
    match joint {
        Joint::StartStart => {
            out.extend(b[1..].iter().rev());
            out.extend(a);
        }
        Joint::StartEnd => {
            out.extend_from_slice(&b[..b.len() - 1]);
            out.extend(a);
        }
        Joint::EndStart => {
            out.extend(a);
            out.extend_from_slice(&b[1..]);
        }
        Joint::EndEnd => {
            out.extend(a);
            out.extend(b[..b.len() - 1].iter().rev());
        }
    }
    out
}

/// First mergeable pair `(i, j)` with `i < j`.
fn first_mergeable(chains: &[Vec<Point3>], tol: &Tolerance) -> Option<(usize, usize, Joint)> {
    for i in 0..chains.len() {
        for j in (i + 1)..chains.len() {
            if let Some(joint) = find_joint(&chains[i], &chains[j], tol) {
                return Some((i, j, joint));
            }
        }
    }
    None
}

/// Merge fragments whose endpoints coincide within `tolerance` into
/// maximal chains.
///
/// Each pass scans all pairs of open chains and splices the first
/// matching pair, then rebuilds the chain list and scans again, until a
/// full pass finds nothing. A chain whose ends meet is closed and takes
/// no further part. Closed input lines pass through untouched, and the
/// result is the same set of chains whatever order the fragments come in,
/// up to reversal of each chain.
pub fn merge_lines(lines: Vec<Line>, tolerance: f64) -> Vec<Line> {
    let tol = Tolerance::linear(tolerance);
    let mut finished: Vec<Line> = Vec::new();
    let mut open: Vec<Vec<Point3>> = Vec::new();

    for line in lines {
        if line.is_closed() {
            finished.push(line);
        } else {
            open.push(line.into_points());
        }
    }

    let mut passes = 0usize;
    while let Some((i, j, joint)) = first_mergeable(&open, &tol) {
        passes += 1;
        let merged = Line::new(splice(std::mem::take(&mut open[i]), &open[j], joint), tolerance);

        let mut next: Vec<Vec<Point3>> = open
            .into_iter()
            .enumerate()
            .filter(|(k, _)| *k != i && *k != j)
            .map(|(_, chain)| chain)
            .collect();
        match merged {
            Some(line) if line.is_closed() => finished.push(line),
            Some(line) => next.insert(i, line.into_points()),
            None => {}
        }
        open = next;
    }

    debug!(
        "Stitched in {} passes: {} closed, {} open",
        passes,
        finished.len(),
        open.len()
    );
    finished.extend(open.into_iter().filter_map(Line::open));
    finished
}
