//! Page slicing over an accumulated order sequence.
//!
//! Upstream hands back batches whose size need not match the page size shown
//! to the merchant. Batches are flattened first and only then cut into pages
//! here.

use crate::types::{OrderRecord, PageInfo, UpstreamPageInfo};

/// Sort records by `display_id` descending.
///
/// Plain lexicographic comparison: `#999` sorts above `#1000`. The sort is
/// stable, so records with identical ids keep their upstream order.
pub fn sort_by_display_id_desc(records: &mut [OrderRecord]) {
    records.sort_by(|a, b| b.display_id.cmp(&a.display_id));
}

/// Slice `flat` into the requested 1-based page.
///
/// `page_records = flat[(page - 1) * page_size .. page * page_size]`, clamped
/// to the bounds of `flat`. An out-of-range page yields an empty slice rather
/// than an error. `has_next_page` is true when upstream has more batches or
/// `flat` already holds records past the end of this page.
#[must_use]
pub fn assemble(
    flat: &[OrderRecord],
    requested_page: u32,
    page_size: usize,
    upstream: &UpstreamPageInfo,
) -> (Vec<OrderRecord>, PageInfo) {
    let page = requested_page.max(1);
    let page_size = page_size.max(1);

    let start = (page as usize - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size);
    let records = flat
        .get(start.min(flat.len())..end.min(flat.len()))
        .map(<[OrderRecord]>::to_vec)
        .unwrap_or_default();

    let has_next_page = upstream.has_next_page || flat.len() > end;
    let info = PageInfo::new(page, has_next_page, upstream.end_cursor.clone());
    (records, info)
}

/// Number of pages needed to show `total_items`; at least one.
#[must_use]
pub fn total_pages(total_items: usize, page_size: usize) -> u32 {
    let pages = total_items.div_ceil(page_size.max(1)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use crate::types::{MoneyAmount, OrderTotals};

    use super::*;

    fn order(display_id: &str) -> OrderRecord {
        OrderRecord {
            display_id: display_id.to_string(),
            internal_id: display_id.trim_start_matches('#').to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            customer_name: None,
            financial_status: "paid".to_string(),
            fulfillment_status: None,
            line_items: vec![],
            totals: OrderTotals {
                total: MoneyAmount::zero("JPY"),
                subtotal: MoneyAmount::zero("JPY"),
                tax: MoneyAmount::zero("JPY"),
            },
        }
    }

    fn orders(count: usize) -> Vec<OrderRecord> {
        (0..count).map(|i| order(&format!("#{}", 1000 + i))).collect()
    }

    fn ids(records: &[OrderRecord]) -> Vec<&str> {
        records.iter().map(|r| r.display_id.as_str()).collect()
    }

    #[test]
    fn test_sort_is_lexicographic_descending() {
        let mut records = vec![order("#1000"), order("#999"), order("#1001")];
        sort_by_display_id_desc(&mut records);
        assert_eq!(ids(&records), vec!["#999", "#1001", "#1000"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_ids() {
        let mut first = order("#1");
        first.internal_id = "a".to_string();
        let mut second = order("#1");
        second.internal_id = "b".to_string();
        let mut records = vec![first, second, order("#2")];
        sort_by_display_id_desc(&mut records);
        let internal: Vec<&str> = records.iter().map(|r| r.internal_id.as_str()).collect();
        assert_eq!(internal, vec!["2", "a", "b"]);
    }

    #[test]
    fn test_assemble_middle_page() {
        let flat = orders(25);
        let (page, info) = assemble(&flat, 2, 10, &UpstreamPageInfo::default());
        assert_eq!(page.len(), 10);
        assert_eq!(page.first().map(|r| r.display_id.as_str()), Some("#1010"));
        assert_eq!(info.current_page(), 2);
        assert!(info.has_next_page());
        assert!(info.has_previous_page());
    }

    #[test]
    fn test_assemble_partial_last_page() {
        let flat = orders(25);
        let (page, info) = assemble(&flat, 3, 10, &UpstreamPageInfo::default());
        assert_eq!(page.len(), 5);
        assert!(!info.has_next_page());
    }

    #[test]
    fn test_assemble_exact_fit_uses_upstream_flag() {
        let flat = orders(20);
        let more = UpstreamPageInfo {
            has_next_page: true,
            end_cursor: Some("c2".to_string()),
        };
        let (_, info) = assemble(&flat, 2, 10, &more);
        assert!(info.has_next_page());
        assert_eq!(info.end_cursor(), Some("c2"));

        let (_, info) = assemble(&flat, 2, 10, &UpstreamPageInfo::default());
        assert!(!info.has_next_page());
    }

    #[test]
    fn test_assemble_out_of_range_is_empty() {
        let flat = orders(5);
        let (page, info) = assemble(&flat, 9, 10, &UpstreamPageInfo::default());
        assert!(page.is_empty());
        assert!(!info.has_next_page());
        assert_eq!(info.current_page(), 9);
    }

    #[test]
    fn test_assemble_empty_first_page() {
        let (page, info) = assemble(&[], 1, 100, &UpstreamPageInfo::default());
        assert!(page.is_empty());
        assert!(!info.has_next_page());
        assert!(!info.has_previous_page());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }
}
