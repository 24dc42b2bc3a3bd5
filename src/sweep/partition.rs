// ABOUTME: Splits deletion work lists into contiguous partitions, one per worker.
// ABOUTME: Never more partitions than items; remainder items go to the earliest partitions.

/// Split `items` into `min(concurrency, items.len())` contiguous, non-overlapping
/// slices that together cover the whole list in order.
///
/// A `concurrency` of zero is treated as one. An empty list yields no partitions.
pub fn partition<T>(items: &[T], concurrency: usize) -> Vec<&[T]> {
    let count = concurrency.max(1).min(items.len());
    if count == 0 {
        return Vec::new();
    }

    let base = items.len() / count;
    let remainder = items.len() % count;

    let mut partitions = Vec::with_capacity(count);
    let mut start = 0;
    for index in 0..count {
        let size = base + usize::from(index < remainder);
        partitions.push(&items[start..start + size]);
        start += size;
    }
    partitions
}
