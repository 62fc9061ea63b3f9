use core::cmp;

/// Prefix sums over a growable sequence of item heights.
///
/// Appending, point updates and prefix queries are all `O(log n)`, so a re-measured item only
/// touches the nodes covering it instead of every offset after it.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fenwick {
    tree: Vec<f64>, // 1-indexed, tree[0] unused
}

impl Fenwick {
    pub(crate) fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    pub(crate) fn clear(&mut self) {
        self.tree.clear();
    }

    pub(crate) fn truncate(&mut self, new_len: usize) {
        if new_len < self.len() {
            // Node `i` only covers values at or before `i`, so the kept prefix stays valid.
            self.tree.truncate(new_len + 1);
        }
    }

    /// Appends `value` after the last element.
    pub(crate) fn push_value(&mut self, value: f64) {
        if self.tree.is_empty() {
            self.tree.push(0.0);
        }
        let i = self.len() + 1;
        let start_exclusive = i - lsb(i);

        // tree[i] covers (i - lsb(i), i]: the new value plus its already built children.
        let mut node = value;
        let mut j = i - 1;
        while j > start_exclusive {
            node += self.tree[j];
            j &= j - 1;
        }
        self.tree.push(node);
    }

    pub(crate) fn add(&mut self, index: usize, delta: f64) {
        let n = self.len();
        let mut i = index + 1;
        while i <= n {
            self.tree[i] += delta;
            i += lsb(i);
        }
    }

    /// Sum of the first `count` values.
    pub(crate) fn prefix_sum(&self, count: usize) -> f64 {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0.0;
        while i > 0 {
            sum += self.tree[i];
            i &= i - 1;
        }
        sum
    }

    pub(crate) fn total(&self) -> f64 {
        self.prefix_sum(self.len())
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}
