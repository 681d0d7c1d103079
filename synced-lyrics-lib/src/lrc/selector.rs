//! Active-line selection.

use crate::types::LyricEntry;

/// Find the line that is current at `elapsed` seconds.
///
/// Returns the first position `i` where `entries[i]` has been reached and
/// either `i` is the last entry or `entries[i + 1]` has not been reached
/// yet. For time-ordered input this is the last entry whose timestamp is
/// `<= elapsed`. Input order is trusted, not checked.
///
/// Returns `None` for an empty slice, when `elapsed` precedes every entry,
/// and for negative or NaN `elapsed`.
pub fn active_index(entries: &[LyricEntry], elapsed: f64) -> Option<usize> {
    // A linear scan is fine: lyric blocks are short and this runs once per tick.
    (0..entries.len()).find(|&i| {
        entries[i].timestamp() <= elapsed
            && entries
                .get(i + 1)
                .map_or(true, |next| next.timestamp() > elapsed)
    })
}

/// Encode an active index with `-1` for "no active line".
pub fn to_sentinel(index: Option<usize>) -> i64 {
    index.map_or(-1, |i| i as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(centis: &[u32]) -> Vec<LyricEntry> {
        centis
            .iter()
            .map(|&c| LyricEntry::new(c, format!("line {}", c)))
            .collect()
    }

    #[test]
    fn test_reference_points() {
        let seq = entries(&[147, 450, 650]);
        assert_eq!(active_index(&seq, 0.0), None);
        assert_eq!(active_index(&seq, 1.47), Some(0));
        assert_eq!(active_index(&seq, 3.0), Some(0));
        assert_eq!(active_index(&seq, 4.50), Some(1));
        assert_eq!(active_index(&seq, 6.49), Some(1));
        assert_eq!(active_index(&seq, 6.50), Some(2));
        assert_eq!(active_index(&seq, 100.0), Some(2));
    }

    #[test]
    fn test_empty_sequence() {
        for elapsed in [0.0, 0.1, 1.47, 12.0, 1e9] {
            assert_eq!(active_index(&[], elapsed), None);
        }
    }

    #[test]
    fn test_negative_and_nan() {
        let seq = entries(&[0, 100]);
        assert_eq!(active_index(&seq, -0.1), None);
        assert_eq!(active_index(&seq, f64::NEG_INFINITY), None);
        assert_eq!(active_index(&seq, f64::NAN), None);
        assert_eq!(active_index(&seq, 0.0), Some(0));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let seq = entries(&[147, 450, 650]);
        let first = active_index(&seq, 5.0);
        for _ in 0..10 {
            assert_eq!(active_index(&seq, 5.0), first);
        }
    }

    #[test]
    fn test_equal_timestamps_pick_last() {
        let seq = entries(&[100, 200, 200, 300]);
        assert_eq!(active_index(&seq, 2.0), Some(2));
        assert_eq!(active_index(&seq, 2.5), Some(2));
    }

    #[test]
    fn test_unordered_input_not_sorted() {
        // 5.00, 2.00, 8.00: at 3.0 the first position passing the
        // lookahead rule is index 1.
        let seq = entries(&[500, 200, 800]);
        assert_eq!(active_index(&seq, 3.0), Some(1));
        // At 6.0 index 0 is reached but index 1 is also reached, and
        // index 1's successor (8.00) is not, so index 1 wins.
        assert_eq!(active_index(&seq, 6.0), Some(1));
        assert_eq!(active_index(&seq, 1.0), None);
    }

    #[test]
    fn test_to_sentinel() {
        assert_eq!(to_sentinel(None), -1);
        assert_eq!(to_sentinel(Some(0)), 0);
        assert_eq!(to_sentinel(Some(7)), 7);
    }
}
