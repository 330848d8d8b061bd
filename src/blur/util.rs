#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowRange {
    pub from: usize,
    pub to: usize,
}

impl RowRange {
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.to == self.from
    }
}

/// Splits `0..height` into `num_thread` contiguous bands whose sizes differ by
/// at most one row. Never produces an empty band.
pub fn create_row_ranges(num_thread: usize, height: usize) -> Vec<RowRange> {
    if height == 0 {
        return vec![];
    }
    let num_thread = num_thread.clamp(1, height);
    let height_per_thread = height / num_thread;
    let remainder = height % num_thread;

    let mut ranges = Vec::with_capacity(num_thread);
    let mut from = 0;
    for t in 0..num_thread {
        let to = from + height_per_thread + usize::from(t < remainder);
        ranges.push(RowRange { from, to });
        from = to;
    }
    ranges
}
