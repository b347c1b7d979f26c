//! Two-phase parallel helpers: compute in parallel, then commit exclusively.
//!
//! The compute phase only gets shared borrows, so no part can observe another
//! part's writes; the commit phase receives every result at once and is the
//! only place mutation happens.

use rayon::prelude::*;

/// Runs `compute` for every part in `0..parts` on the rayon pool, then hands
/// the results (in part order) to `commit`.
///
/// ```
/// use distcolor::concurrency::parallel_read_then_commit;
///
/// let mut totals = vec![0; 3];
/// let data = [1, 2, 3, 4, 5, 6];
/// parallel_read_then_commit(
///     3,
///     |part| data[part * 2] + data[part * 2 + 1],
///     |sums| totals.copy_from_slice(&sums),
/// );
/// assert_eq!(totals, vec![3, 7, 11]);
/// ```
#[inline]
pub fn parallel_read_then_commit<W, R>(
    parts: usize,
    compute: impl Fn(usize) -> W + Sync + Send,
    commit: impl FnOnce(Vec<W>) -> R,
) -> R
where
    W: Send,
{
    let work: Vec<W> = (0..parts).into_par_iter().map(compute).collect();
    commit(work)
}

/// Like [`parallel_read_then_commit`] over the items of `input`.
#[inline]
pub fn map_then_commit<T, W, R>(
    input: &[T],
    compute: impl Fn(&T) -> W + Sync + Send,
    commit: impl FnOnce(Vec<W>) -> R,
) -> R
where
    T: Sync,
    W: Send,
{
    let work: Vec<W> = input.par_iter().map(compute).collect();
    commit(work)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_arrive_in_part_order() {
        let out = parallel_read_then_commit(64, |i| i * i, |v| v);
        assert_eq!(out, (0..64).map(|i| i * i).collect::<Vec<_>>());
    }

    #[test]
    fn commit_sees_every_result() {
        let words = ["a", "bb", "ccc"];
        let total = map_then_commit(&words, |w| w.len(), |lens| lens.into_iter().sum::<usize>());
        assert_eq!(total, 6);
    }
}
