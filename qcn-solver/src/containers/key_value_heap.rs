use fnv::FnvHashMap;

use crate::qcn_assert_moderate;
use crate::qcn_assert_simple;

/// A binary min-heap over `(index, key)` entries with an index lookup, so the
/// key of an enqueued index can be decreased in place.
///
/// Inserting an index that is already present must not increase its key; the
/// propagation worklist only ever tightens relations, so keys only go down.
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyValueHeap {
    /// Heap-ordered `(index, key)` entries, smallest key at position 0.
    heap: Vec<(usize, u64)>,
    /// Maps an enqueued index to its current position in `heap`.
    positions: FnvHashMap<usize, usize>,
}

impl KeyValueHeap {
    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.positions.clear();
    }

    /// Enqueues `index` with `key`, or decreases its key if already enqueued.
    pub(crate) fn insert(&mut self, index: usize, key: u64) {
        if let Some(&position) = self.positions.get(&index) {
            qcn_assert_moderate!(key <= self.heap[position].1);
            if key == self.heap[position].1 {
                return;
            }
            self.heap[position].1 = key;
            self.sift_up(position);
        } else {
            self.heap.push((index, key));
            let _ = self.positions.insert(index, self.heap.len() - 1);
            self.sift_up(self.heap.len() - 1);
        }
    }

    /// Removes and returns the entry with the smallest key.
    pub(crate) fn pop_min(&mut self) -> Option<(usize, u64)> {
        if self.heap.is_empty() {
            return None;
        }
        let minimum = self.heap.swap_remove(0);
        let _ = self.positions.remove(&minimum.0);
        if !self.heap.is_empty() {
            let _ = self.positions.insert(self.heap[0].0, 0);
            self.sift_down(0);
        }
        Some(minimum)
    }

    fn sift_up(&mut self, position: usize) {
        let mut position = position;
        while position > 0 {
            let parent = (position - 1) / 2;
            if self.heap[parent].1 <= self.heap[position].1 {
                break;
            }
            self.swap_entries(parent, position);
            position = parent;
        }
    }

    fn sift_down(&mut self, position: usize) {
        let mut position = position;
        loop {
            let left = 2 * position + 1;
            let right = 2 * position + 2;
            let mut smallest = position;
            if left < self.heap.len() && self.heap[left].1 < self.heap[smallest].1 {
                smallest = left;
            }
            if right < self.heap.len() && self.heap[right].1 < self.heap[smallest].1 {
                smallest = right;
            }
            if smallest == position {
                break;
            }
            self.swap_entries(smallest, position);
            position = smallest;
        }
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        qcn_assert_simple!(a != b);
        self.heap.swap(a, b);
        let _ = self.positions.insert(self.heap[a].0, a);
        let _ = self.positions.insert(self.heap[b].0, b);
    }
}

#[cfg(test)]
mod tests {
    use super::KeyValueHeap;

    #[test]
    fn empty_heap_pops_nothing() {
        let mut heap = KeyValueHeap::default();
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn pops_in_nondecreasing_key_order() {
        let mut heap = KeyValueHeap::default();
        let keys = [13_u64, 5, 8, 1, 21, 3, 3, 34, 2];
        for (index, key) in keys.iter().enumerate() {
            heap.insert(index, *key);
        }

        let mut sorted = Vec::new();
        while let Some((_, key)) = heap.pop_min() {
            sorted.push(key);
        }
        let mut expected = keys.to_vec();
        expected.sort_unstable();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn reinserting_decreases_the_key() {
        let mut heap = KeyValueHeap::default();
        heap.insert(7, 100);
        heap.insert(9, 50);
        heap.insert(7, 10);

        assert_eq!(heap.pop_min(), Some((7, 10)));
        assert_eq!(heap.pop_min(), Some((9, 50)));
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn reinserting_with_the_same_key_is_a_no_op() {
        let mut heap = KeyValueHeap::default();
        heap.insert(4, 6);
        heap.insert(4, 6);
        assert_eq!(heap.pop_min(), Some((4, 6)));
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn clearing_empties_the_heap() {
        let mut heap = KeyValueHeap::default();
        heap.insert(0, 1);
        heap.insert(1, 2);
        heap.clear();
        assert_eq!(heap.pop_min(), None);
    }
}
