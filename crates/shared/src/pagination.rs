//! Offset pagination arithmetic.

/// Converts a 1-based page number into a row offset.
///
/// Page 0 and page 1 both address the first window.
pub fn offset_for_page(page: i64, limit: i64) -> i64 {
    let zero_based = if page > 0 { page - 1 } else { page };
    zero_based.saturating_mul(limit)
}

/// Number of pages needed to hold `total` rows at `limit` rows per page.
///
/// Unbounded listings (no limit) always report a single page.
pub fn page_count(total: i64, limit: Option<i64>) -> i64 {
    match limit {
        Some(limit) if limit > 0 => {
            let total = total.max(0);
            total / limit + i64::from(total % limit != 0)
        }
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_for_page() {
        assert_eq!(offset_for_page(0, 10), 0);
        assert_eq!(offset_for_page(1, 10), 0);
        assert_eq!(offset_for_page(2, 10), 10);
        assert_eq!(offset_for_page(4, 10), 30);
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(25, Some(10)), 3);
        assert_eq!(page_count(30, Some(10)), 3);
        assert_eq!(page_count(1, Some(10)), 1);
        assert_eq!(page_count(0, Some(10)), 0);
    }

    #[test]
    fn test_page_count_with_huge_limit() {
        assert_eq!(page_count(5, Some(i64::MAX)), 1);
        assert_eq!(page_count(25, Some(i64::MAX - 10)), 1);
        assert_eq!(page_count(i64::MAX, Some(i64::MAX)), 1);
        assert_eq!(page_count(i64::MAX, Some(2)), i64::MAX / 2 + 1);
        assert_eq!(page_count(0, Some(i64::MAX)), 0);
    }

    #[test]
    fn test_offset_for_huge_page_saturates() {
        assert_eq!(offset_for_page(i64::MAX, i64::MAX), i64::MAX);
    }

    #[test]
    fn test_page_count_unbounded() {
        assert_eq!(page_count(25, None), 1);
        assert_eq!(page_count(0, None), 1);
    }
}
