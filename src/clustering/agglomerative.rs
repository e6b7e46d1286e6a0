//! Average-linkage agglomerative clustering on a precomputed distance matrix
//!
//! The matrix is consumed as-is (no enhancement). Only its upper triangle is
//! read. The full merge tree is built, the number of clusters is the number
//! of merges at or above the distance threshold plus one, and the tree is
//! cut by repeatedly splitting the highest remaining node.

use ndarray::Array2;

use super::{check_square, Estimator};
use crate::error::Result;

/// Agglomerative estimator; the sweep parameter is the distance threshold
#[derive(Debug, Clone, Default)]
pub struct AgglomerativeEstimator;

impl Estimator for AgglomerativeEstimator {
    fn name(&self) -> &'static str {
        "agglomerative"
    }

    fn estimate(&self, similarity: &Array2<f64>, thresh: f64) -> Result<Vec<usize>> {
        agglomerative_clustering(similarity, thresh)
    }
}

/// One row of the merge tree. Node ids below `n` are leaves, node
/// `n + k` is the cluster created by the k-th merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
}

pub fn agglomerative_clustering(distances: &Array2<f64>, thresh: f64) -> Result<Vec<usize>> {
    check_square(distances)?;
    let n = distances.nrows();
    if n < 2 {
        return Ok(vec![0; n]);
    }

    let tree = average_linkage(distances);
    let n_clusters = tree.iter().filter(|m| m.distance >= thresh).count() + 1;

    Ok(cut_tree(&tree, n, n_clusters))
}

/// Build the complete average-linkage tree, ordered by merge distance.
pub fn average_linkage(distances: &Array2<f64>) -> Vec<Merge> {
    let n = distances.nrows();

    let mut dist = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            dist[[i, j]] = distances[[i, j]];
            dist[[j, i]] = distances[[i, j]];
        }
    }

    let mut size = vec![1usize; n];
    let mut active = vec![true; n];
    // (representative leaf, representative leaf, distance)
    let mut raw: Vec<(usize, usize, f64)> = Vec::with_capacity(n.saturating_sub(1));

    for _ in 1..n {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in (0..n).filter(|&i| active[i]) {
            for j in ((i + 1)..n).filter(|&j| active[j]) {
                let d = dist[[i, j]];
                if best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((i, j, d));
                }
            }
        }
        let Some((a, b, d)) = best else { break };

        // Lance-Williams update for average linkage; `a` represents the union
        let (sa, sb) = (size[a] as f64, size[b] as f64);
        for k in (0..n).filter(|&k| active[k] && k != a && k != b) {
            let merged = (sa * dist[[a, k]] + sb * dist[[b, k]]) / (sa + sb);
            dist[[a, k]] = merged;
            dist[[k, a]] = merged;
        }
        size[a] += size[b];
        active[b] = false;
        raw.push((a, b, d));
    }

    // stable: equal distances keep merge order
    raw.sort_by(|x, y| x.2.total_cmp(&y.2));
    relabel(&raw, n)
}

/// Turn representative-leaf merges into node-id merges with union-find.
fn relabel(raw: &[(usize, usize, f64)], n: usize) -> Vec<Merge> {
    let mut parent: Vec<usize> = (0..(2 * n).saturating_sub(1)).collect();
    let mut next = n;

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        let mut root = x;
        while parent[root] != root {
            root = parent[root];
        }
        while parent[x] != root {
            let up = parent[x];
            parent[x] = root;
            x = up;
        }
        root
    }

    raw.iter()
        .map(|&(a, b, distance)| {
            let x = find(&mut parent, a);
            let y = find(&mut parent, b);
            parent[x] = next;
            parent[y] = next;
            next += 1;
            Merge {
                left: x.min(y),
                right: x.max(y),
                distance,
            }
        })
        .collect()
}

/// Cut the tree into `n_clusters` flat clusters.
///
/// Nodes are kept in a binary min-heap of negated ids, so the root of the
/// heap is always the most recent merge still standing. Each step replaces
/// it with its two children. Cluster labels are the final positions in the
/// heap array, which fixes the label numbering.
pub fn cut_tree(tree: &[Merge], n_leaves: usize, n_clusters: usize) -> Vec<usize> {
    let mut labels = vec![0usize; n_leaves];
    if tree.is_empty() {
        for (i, label) in labels.iter_mut().enumerate() {
            *label = i;
        }
        return labels;
    }

    let root = tree[tree.len() - 1];
    let mut heap: Vec<i64> = vec![-(root.left.max(root.right) as i64 + 1)];

    for _ in 1..n_clusters {
        let node = (-heap[0]) as usize;
        let merge = tree[node - n_leaves];
        heap_push(&mut heap, -(merge.left as i64));
        heap_push_pop(&mut heap, -(merge.right as i64));
    }

    for (label, &node) in heap.iter().enumerate() {
        for leaf in descendants((-node) as usize, tree, n_leaves) {
            labels[leaf] = label;
        }
    }
    labels
}

fn descendants(node: usize, tree: &[Merge], n_leaves: usize) -> Vec<usize> {
    let mut leaves = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current < n_leaves {
            leaves.push(current);
        } else {
            let merge = tree[current - n_leaves];
            stack.push(merge.left);
            stack.push(merge.right);
        }
    }
    leaves
}

fn heap_push(heap: &mut Vec<i64>, item: i64) {
    heap.push(item);
    let last = heap.len() - 1;
    sift_down(heap, 0, last);
}

/// Push `item` then pop and return the smallest element.
fn heap_push_pop(heap: &mut [i64], item: i64) -> i64 {
    if !heap.is_empty() && heap[0] < item {
        let smallest = heap[0];
        heap[0] = item;
        sift_up(heap, 0);
        smallest
    } else {
        item
    }
}

// Move the item at `pos` towards the root until its parent is not larger.
fn sift_down(heap: &mut [i64], start: usize, mut pos: usize) {
    let item = heap[pos];
    while pos > start {
        let parent = (pos - 1) >> 1;
        if item < heap[parent] {
            heap[pos] = heap[parent];
            pos = parent;
        } else {
            break;
        }
    }
    heap[pos] = item;
}

// Bubble the smaller child up until a leaf is reached, then settle the item.
fn sift_up(heap: &mut [i64], mut pos: usize) {
    let end = heap.len();
    let start = pos;
    let item = heap[pos];
    let mut child = 2 * pos + 1;
    while child < end {
        let right = child + 1;
        if right < end && heap[child] >= heap[right] {
            child = right;
        }
        heap[pos] = heap[child];
        pos = child;
        child = 2 * pos + 1;
    }
    heap[pos] = item;
    sift_down(heap, start, pos);
}
