//! Row-range fork-join runtime shared by the spatial transforms.
//!
//! Work is a contiguous row range `[start, end)` of a destination buffer.
//! A task whose range covers no more than `cutoff` pixels, or a single row,
//! runs its leaf closure directly. Otherwise it splits at the midpoint row,
//! computes the left half on the current worker and offers the right half to
//! the pool through [`rayon::join`], then waits for both.
//!
//! The destination slice is divided with `split_at_mut` at the same
//! midpoint, so every leaf owns exactly the rows of its range and no two
//! leaves can alias. No locks are involved.
//!
//! Splitting depends only on `(height, width, cutoff)`, never on the number
//! of worker threads, so the set of leaf ranges is the one returned by
//! [`plan_rows`] whatever the pool size.

use crate::{OpsError, OpsResult};
use pixfork_core::Rgb;
use tracing::{debug, trace, Level};

/// Half-open range of image rows handled by one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowRange {
    /// First row, inclusive
    pub start: usize,
    /// Last row, exclusive
    pub end: usize,
}

impl RowRange {
    /// Creates `[start, end)`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// `true` if the range holds no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Splits at the midpoint row: `[start, mid)` and `[mid, end)`.
    #[inline]
    pub fn split_mid(&self) -> (Self, Self) {
        let mid = self.start + self.len() / 2;
        (Self::new(self.start, mid), Self::new(mid, self.end))
    }

    /// Iterator over the row indices.
    #[inline]
    pub fn iter(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// `true` if a task over this range must run sequentially.
    #[inline]
    fn is_leaf(&self, width: usize, cutoff: usize) -> bool {
        self.len() < 2 || self.len().saturating_mul(width) <= cutoff.max(1)
    }
}

/// Runs `leaf` over `rows` of `dest`, splitting recursively above `cutoff`.
///
/// `dest` holds exactly the pixels of `rows`, `width` per row. Each leaf
/// call receives its own range and the matching sub-slice of `dest`, with
/// row `rows.start` at offset 0.
///
/// Both halves of a split always run to completion. If either returns an
/// error the call fails, reporting the left error first.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] if `dest.len() != rows.len() * width`,
/// checked before any leaf runs.
pub fn fork_join_rows<F>(
    dest: &mut [Rgb],
    width: usize,
    rows: RowRange,
    cutoff: usize,
    leaf: &F,
) -> OpsResult<()>
where
    F: Fn(RowRange, &mut [Rgb]) -> OpsResult<()> + Sync,
{
    if rows.start > rows.end || rows.len().checked_mul(width) != Some(dest.len()) {
        return Err(OpsError::InvalidDimensions(format!(
            "destination holds {} pixels, rows {}..{} of width {} need {}",
            dest.len(),
            rows.start,
            rows.end,
            width,
            rows.end.saturating_sub(rows.start).saturating_mul(width)
        )));
    }
    split_rows(dest, width, rows, cutoff, leaf)
}

fn split_rows<F>(dest: &mut [Rgb], width: usize, rows: RowRange, cutoff: usize, leaf: &F) -> OpsResult<()>
where
    F: Fn(RowRange, &mut [Rgb]) -> OpsResult<()> + Sync,
{
    if rows.is_leaf(width, cutoff) {
        trace!(start = rows.start, end = rows.end, "fork_join leaf");
        return leaf(rows, dest);
    }

    let (left, right) = rows.split_mid();
    let (dest_left, dest_right) = dest.split_at_mut(left.len() * width);
    let (a, b) = rayon::join(
        || split_rows(dest_left, width, left, cutoff, leaf),
        || split_rows(dest_right, width, right, cutoff, leaf),
    );
    a.and(b)
}

/// Leaf ranges that [`fork_join_rows`] produces for an image of the given
/// shape, in row order.
pub fn plan_rows(height: usize, width: usize, cutoff: usize) -> Vec<RowRange> {
    fn collect(rows: RowRange, width: usize, cutoff: usize, out: &mut Vec<RowRange>) {
        if rows.is_leaf(width, cutoff) {
            out.push(rows);
            return;
        }
        let (left, right) = rows.split_mid();
        collect(left, width, cutoff, out);
        collect(right, width, cutoff, out);
    }

    let mut out = Vec::new();
    collect(RowRange::new(0, height), width, cutoff, &mut out);
    out
}

/// Logs the leaf count of the task tree at debug level.
pub(crate) fn debug_plan(op: &str, height: usize, width: usize, cutoff: usize) {
    if tracing::enabled!(Level::DEBUG) {
        let leaves = plan_rows(height, width, cutoff).len();
        debug!(op, height, width, cutoff, leaves, "fork-join plan");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsError;
    use std::sync::Mutex;

    #[test]
    fn test_split_mid() {
        assert_eq!(
            RowRange::new(0, 7).split_mid(),
            (RowRange::new(0, 3), RowRange::new(3, 7))
        );
        assert_eq!(
            RowRange::new(4, 6).split_mid(),
            (RowRange::new(4, 5), RowRange::new(5, 6))
        );
    }

    #[test]
    fn test_plan_covers_rows_exactly_once() {
        let plan = plan_rows(100, 30, 200);
        assert!(plan.len() > 1);
        assert_eq!(plan.first().map(|r| r.start), Some(0));
        assert_eq!(plan.last().map(|r| r.end), Some(100));
        for pair in plan.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(plan.iter().all(|r| r.len() * 30 <= 200));
    }

    #[test]
    fn test_plan_below_cutoff_is_single_leaf() {
        assert_eq!(plan_rows(10, 10, 100), vec![RowRange::new(0, 10)]);
        assert_eq!(plan_rows(10, 10, 99).len(), 2);
    }

    #[test]
    fn test_single_wide_row_never_splits() {
        assert_eq!(plan_rows(1, 1_000_000, 10), vec![RowRange::new(0, 1)]);
    }

    #[test]
    fn test_leaves_own_their_rows() {
        let (width, height) = (5, 37);
        let mut dest = vec![Rgb::BLACK; width * height];
        let seen = Mutex::new(Vec::new());

        fork_join_rows(&mut dest, width, RowRange::new(0, height), 12, &|rows: RowRange, out: &mut [Rgb]| {
            assert_eq!(out.len(), rows.len() * width);
            for (y, row) in rows.iter().zip(out.chunks_exact_mut(width)) {
                row.fill(Rgb::grey(y as u8));
            }
            seen.lock().unwrap().push(rows);
            Ok(())
        })
        .unwrap();

        for (y, row) in dest.chunks_exact(width).enumerate() {
            assert!(row.iter().all(|&p| p == Rgb::grey(y as u8)));
        }
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, plan_rows(height, width, 12));
    }

    #[test]
    fn test_leaf_error_aborts_transform() {
        let width = 4;
        let mut dest = vec![Rgb::BLACK; width * 64];
        let result = fork_join_rows(&mut dest, width, RowRange::new(0, 64), 4, &|rows: RowRange, _: &mut [Rgb]| {
            if rows.iter().any(|y| y == 41) {
                Err(OpsError::InvalidParameter(format!("row {}", rows.start)))
            } else {
                Ok(())
            }
        });
        assert!(matches!(result, Err(OpsError::InvalidParameter(_))));
    }

    #[test]
    fn test_mismatched_destination_rejected() {
        let calls = Mutex::new(0usize);
        let leaf = |_: RowRange, _: &mut [Rgb]| -> OpsResult<()> {
            *calls.lock().unwrap() += 1;
            Ok(())
        };

        let mut short = vec![Rgb::BLACK; 10];
        let result = fork_join_rows(&mut short, 4, RowRange::new(0, 8), 4, &leaf);
        assert!(matches!(result, Err(OpsError::InvalidDimensions(_))));

        let mut long = vec![Rgb::BLACK; 33];
        let result = fork_join_rows(&mut long, 4, RowRange::new(0, 8), 4, &leaf);
        assert!(matches!(result, Err(OpsError::InvalidDimensions(_))));

        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_leaf_panic_propagates() {
        let outcome = std::panic::catch_unwind(|| {
            let mut dest = vec![Rgb::BLACK; 16];
            let _ = fork_join_rows(&mut dest, 1, RowRange::new(0, 16), 1, &|rows: RowRange, _: &mut [Rgb]| {
                assert!(rows.start != 9, "leaf failed");
                Ok(())
            });
        });
        assert!(outcome.is_err());
    }
}
