//! Balanced 3-D tree over catalog RGB points.
//!
//! Built once at load by recursively splitting on the axis of greatest
//! spread at the median; read-only afterward. The tree partitions by raw
//! Euclidean RGB distance, so its pruning is only valid for that metric;
//! perceptual metrics go through the matcher's rescoring path instead.

use std::collections::HashSet;

/// One indexed point: an RGB coordinate, the dye's id (for exclusion
/// checks), and its catalog slot.
#[derive(Debug, Clone, Copy)]
pub struct KdEntry {
    /// RGB coordinate as signed integers for exact distance arithmetic
    pub point: [i64; 3],
    /// Dye id, matched against exclusion sets
    pub id: u32,
    /// Catalog slot (load-order position)
    pub slot: usize,
}

#[derive(Debug)]
struct Node {
    entry: KdEntry,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// A nearest/range index over 3-D integer points.
#[derive(Debug)]
pub struct KdTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl KdTree {
    /// Build a balanced tree from the given entries.
    ///
    /// Returns an empty tree for an empty slice; queries on it yield
    /// nothing.
    pub fn build(mut entries: Vec<KdEntry>) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(entries.len()),
            root: None,
        };
        tree.root = tree.build_recursive(&mut entries);
        tree
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no points are indexed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn build_recursive(&mut self, entries: &mut [KdEntry]) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }

        let axis = widest_axis(entries);
        // Sort by (coordinate, slot) so the median split is deterministic
        // even with duplicate coordinates
        entries.sort_by_key(|e| (e.point[axis], e.slot));
        let median = entries.len() / 2;
        let entry = entries[median];

        let node_index = self.nodes.len();
        self.nodes.push(Node {
            entry,
            axis,
            left: None,
            right: None,
        });

        // Split borrows around the median before recursing
        let (left_half, rest) = entries.split_at_mut(median);
        let right_half = &mut rest[1..];

        let left = self.build_recursive(left_half);
        let right = self.build_recursive(right_half);
        let node = &mut self.nodes[node_index];
        node.left = left;
        node.right = right;

        Some(node_index)
    }

    /// Find the nearest indexed point to `target` under squared Euclidean
    /// distance, skipping entries whose id is in `exclude`.
    ///
    /// Ties break toward the lower catalog slot, matching an exhaustive
    /// scan in load order. Returns `(slot, squared distance)`.
    pub fn nearest(&self, target: [i64; 3], exclude: &HashSet<u32>) -> Option<(usize, i64)> {
        let mut best: Option<(usize, i64)> = None;
        if let Some(root) = self.root {
            self.nearest_recursive(root, target, exclude, &mut best);
        }
        best
    }

    fn nearest_recursive(
        &self,
        node_index: usize,
        target: [i64; 3],
        exclude: &HashSet<u32>,
        best: &mut Option<(usize, i64)>,
    ) {
        let node = &self.nodes[node_index];

        // Excluded entries are skipped but the descent continues
        if !exclude.contains(&node.entry.id) {
            let d2 = distance_squared(target, node.entry.point);
            let better = match *best {
                None => true,
                Some((best_slot, best_d2)) => {
                    d2 < best_d2 || (d2 == best_d2 && node.entry.slot < best_slot)
                }
            };
            if better {
                *best = Some((node.entry.slot, d2));
            }
        }

        let axis = node.axis;
        let diff = target[axis] - node.entry.point[axis];
        let (near, far) = if diff < 0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.nearest_recursive(near, target, exclude, best);
        }

        // Visit the far side unless the splitting plane is provably
        // farther than the best match (<= keeps equal-distance,
        // lower-slot candidates reachable)
        let plane_d2 = diff * diff;
        let must_visit = match *best {
            None => true,
            Some((_, best_d2)) => plane_d2 <= best_d2,
        };
        if must_visit {
            if let Some(far) = far {
                self.nearest_recursive(far, target, exclude, best);
            }
        }
    }

    /// Collect every indexed point within `max_distance` of `target`,
    /// sorted ascending by distance (ties by slot), truncated to `limit`.
    ///
    /// Returns `(slot, distance)` pairs.
    pub fn range(
        &self,
        target: [i64; 3],
        max_distance: f64,
        limit: Option<usize>,
    ) -> Vec<(usize, f64)> {
        let mut hits = Vec::new();
        if let Some(root) = self.root {
            self.range_recursive(root, target, max_distance, &mut hits);
        }
        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        if let Some(limit) = limit {
            hits.truncate(limit);
        }
        hits
    }

    fn range_recursive(
        &self,
        node_index: usize,
        target: [i64; 3],
        max_distance: f64,
        hits: &mut Vec<(usize, f64)>,
    ) {
        let node = &self.nodes[node_index];

        let d = (distance_squared(target, node.entry.point) as f64).sqrt();
        if d <= max_distance {
            hits.push((node.entry.slot, d));
        }

        let axis = node.axis;
        let diff = target[axis] - node.entry.point[axis];
        let (near, far) = if diff < 0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.range_recursive(near, target, max_distance, hits);
        }
        if (diff.abs() as f64) <= max_distance {
            if let Some(far) = far {
                self.range_recursive(far, target, max_distance, hits);
            }
        }
    }
}

/// Axis with the greatest coordinate spread; ties prefer the lower axis.
fn widest_axis(entries: &[KdEntry]) -> usize {
    let mut best_axis = 0;
    let mut best_spread = -1;
    for axis in 0..3 {
        let min = entries.iter().map(|e| e.point[axis]).min().unwrap_or(0);
        let max = entries.iter().map(|e| e.point[axis]).max().unwrap_or(0);
        let spread = max - min;
        if spread > best_spread {
            best_spread = spread;
            best_axis = axis;
        }
    }
    best_axis
}

#[inline]
fn distance_squared(a: [i64; 3], b: [i64; 3]) -> i64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(point: [i64; 3], id: u32, slot: usize) -> KdEntry {
        KdEntry { point, id, slot }
    }

    /// Exhaustive scan with the same tie-breaking as the tree.
    fn scan_nearest(
        entries: &[KdEntry],
        target: [i64; 3],
        exclude: &HashSet<u32>,
    ) -> Option<(usize, i64)> {
        let mut best: Option<(usize, i64)> = None;
        for e in entries {
            if exclude.contains(&e.id) {
                continue;
            }
            let d2 = distance_squared(target, e.point);
            let better = match best {
                None => true,
                Some((best_slot, best_d2)) => d2 < best_d2 || (d2 == best_d2 && e.slot < best_slot),
            };
            if better {
                best = Some((e.slot, d2));
            }
        }
        best
    }

    /// Deterministic pseudo-random byte stream (xorshift) so the
    /// differential test needs no external crates.
    struct XorShift(u64);

    impl XorShift {
        fn next_u8(&mut self) -> u8 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            (x >> 24) as u8
        }
    }

    fn random_entries(count: usize, seed: u64) -> Vec<KdEntry> {
        let mut rng = XorShift(seed | 1);
        (0..count)
            .map(|i| {
                entry(
                    [
                        rng.next_u8() as i64,
                        rng.next_u8() as i64,
                        rng.next_u8() as i64,
                    ],
                    i as u32 + 100,
                    i,
                )
            })
            .collect()
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = KdTree::build(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.nearest([0, 0, 0], &HashSet::new()), None);
        assert!(tree.range([0, 0, 0], 1000.0, None).is_empty());
    }

    #[test]
    fn single_point() {
        let tree = KdTree::build(vec![entry([10, 20, 30], 1, 0)]);
        assert_eq!(tree.nearest([0, 0, 0], &HashSet::new()), Some((0, 1400)));
        assert_eq!(tree.nearest([10, 20, 30], &HashSet::new()), Some((0, 0)));
    }

    #[test]
    fn exact_member_has_zero_distance() {
        let entries = random_entries(64, 42);
        let probe = entries[17];
        let tree = KdTree::build(entries);
        let (slot, d2) = tree.nearest(probe.point, &HashSet::new()).unwrap();
        assert_eq!(d2, 0);
        // The found slot must hold the same coordinate (duplicates tie
        // toward the lower slot)
        assert!(slot <= probe.slot);
    }

    #[test]
    fn nearest_matches_exhaustive_scan() {
        // Differential property over random catalogs and probes
        for seed in [3, 7, 1234, 99_991] {
            let entries = random_entries(200, seed);
            let tree = KdTree::build(entries.clone());
            let mut rng = XorShift(seed.wrapping_mul(31) | 1);
            let empty = HashSet::new();
            for _ in 0..200 {
                let target = [
                    rng.next_u8() as i64,
                    rng.next_u8() as i64,
                    rng.next_u8() as i64,
                ];
                assert_eq!(
                    tree.nearest(target, &empty),
                    scan_nearest(&entries, target, &empty),
                    "differential mismatch at {target:?} (seed {seed})"
                );
            }
        }
    }

    #[test]
    fn nearest_matches_scan_with_exclusions() {
        let entries = random_entries(100, 555);
        let tree = KdTree::build(entries.clone());
        let exclude: HashSet<u32> = (100..140).collect();
        let mut rng = XorShift(777);
        for _ in 0..100 {
            let target = [
                rng.next_u8() as i64,
                rng.next_u8() as i64,
                rng.next_u8() as i64,
            ];
            assert_eq!(
                tree.nearest(target, &exclude),
                scan_nearest(&entries, target, &exclude)
            );
        }
    }

    #[test]
    fn excluding_everything_yields_none() {
        let entries = random_entries(10, 8);
        let tree = KdTree::build(entries.clone());
        let exclude: HashSet<u32> = entries.iter().map(|e| e.id).collect();
        assert_eq!(tree.nearest([1, 2, 3], &exclude), None);
    }

    #[test]
    fn range_collects_sorted_within_radius() {
        let entries = vec![
            entry([0, 0, 0], 1, 0),
            entry([10, 0, 0], 2, 1),
            entry([0, 20, 0], 3, 2),
            entry([100, 100, 100], 4, 3),
        ];
        let tree = KdTree::build(entries);
        let hits = tree.range([0, 0, 0], 25.0, None);
        let slots: Vec<usize> = hits.iter().map(|h| h.0).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert_eq!(hits[0].1, 0.0);
        assert!(hits[1].1 < hits[2].1);
    }

    #[test]
    fn range_respects_limit() {
        let entries = random_entries(50, 21);
        let tree = KdTree::build(entries.clone());
        let all = tree.range([128, 128, 128], f64::INFINITY, None);
        assert_eq!(all.len(), 50);

        let top3 = tree.range([128, 128, 128], f64::INFINITY, Some(3));
        assert_eq!(top3.len(), 3);
        assert_eq!(&all[..3], &top3[..]);
    }

    #[test]
    fn range_matches_exhaustive_filter() {
        let entries = random_entries(150, 2024);
        let tree = KdTree::build(entries.clone());
        let target = [40, 200, 90];
        let radius = 60.0;

        let mut expected: Vec<(usize, f64)> = entries
            .iter()
            .map(|e| (e.slot, (distance_squared(target, e.point) as f64).sqrt()))
            .filter(|(_, d)| *d <= radius)
            .collect();
        expected.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)));

        assert_eq!(tree.range(target, radius, None), expected);
    }
}
