// ABOUTME: Property tests for splitting deletion work across workers.
// ABOUTME: Partitions are contiguous, cover every item once, and never outnumber items.

use arsweep::sweep::partition;
use proptest::prelude::*;

proptest! {
    #[test]
    fn partitions_cover_list_in_order(
        items in prop::collection::vec(any::<u16>(), 0..200),
        concurrency in 0usize..32,
    ) {
        let parts = partition(&items, concurrency);
        let joined: Vec<u16> = parts.iter().flat_map(|p| p.iter().copied()).collect();
        prop_assert_eq!(joined, items.clone());
    }

    #[test]
    fn partition_count_is_bounded(
        items in prop::collection::vec(any::<u8>(), 0..200),
        concurrency in 0usize..32,
    ) {
        let parts = partition(&items, concurrency);
        prop_assert_eq!(parts.len(), concurrency.max(1).min(items.len()));
        prop_assert!(parts.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn partition_sizes_differ_by_at_most_one(
        len in 1usize..500,
        concurrency in 1usize..32,
    ) {
        let items: Vec<usize> = (0..len).collect();
        let sizes: Vec<usize> = partition(&items, concurrency).iter().map(|p| p.len()).collect();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        prop_assert!(max - min <= 1);
        // larger partitions come first
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn ten_items_across_three_workers() {
    let items: Vec<u32> = (0..10).collect();
    let parts = partition(&items, 3);
    assert_eq!(parts, vec![&[0, 1, 2, 3][..], &[4, 5, 6][..], &[7, 8, 9][..]]);
}
