//! Disjoint-set forest for the MST drivers
//!
//! Union-by-rank with iterative path halving. `union` reports which root
//! survived so callers that key per-component state by root (the Boruvka
//! drivers key candidate heaps this way) can rehome it after a merge.

/// Disjoint-set forest over the elements `0..len`.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    components: usize,
}

impl UnionFind {
    /// Creates `len` singleton components.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
            components: len,
        }
    }

    /// Number of elements the structure was created with.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of distinct components remaining.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Returns the representative root of `x`'s component, halving the path
    /// as it walks so later finds get shorter.
    pub fn find(&mut self, x: usize) -> usize {
        let mut cur = x;
        while self.parent[cur] != cur {
            let grandparent = self.parent[self.parent[cur]];
            self.parent[cur] = grandparent;
            cur = grandparent;
        }
        cur
    }

    /// Merges the components of `a` and `b`. Returns the surviving root, or
    /// `None` if they were already in the same component.
    pub fn union(&mut self, a: usize, b: usize) -> Option<usize> {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return None;
        }
        let (winner, loser) = if self.rank[ra] >= self.rank[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[loser] = winner;
        if self.rank[winner] == self.rank[loser] {
            self.rank[winner] += 1;
        }
        self.components -= 1;
        Some(winner)
    }

    /// Returns true if `a` and `b` are currently in the same component.
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}
