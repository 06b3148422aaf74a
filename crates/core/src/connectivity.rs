//! Incremental side-to-side connectivity for Hex.
//!
//! Every cell is a union-find element. Four extra virtual elements stand for
//! the board edges, so "has this player connected their sides" becomes a
//! single `find` comparison after each placed stone.

use crate::board::Player;

/// Row/column offsets of the six neighbours of a cell on a rhombic Hex board.
///
/// Cell (r, c) touches (r-1, c), (r-1, c+1), (r, c-1), (r, c+1), (r+1, c-1)
/// and (r+1, c). The two remaining diagonals (r-1, c-1) and (r+1, c+1) are
/// not adjacent.
pub const HEX_NEIGHBORS: [(isize, isize); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0)];

/// Iterate the in-bounds neighbours of `index` on a `size`x`size` board.
pub fn neighbors(size: usize, index: usize) -> impl Iterator<Item = usize> {
    let row = (index / size) as isize;
    let col = (index % size) as isize;
    let n = size as isize;

    HEX_NEIGHBORS.iter().filter_map(move |&(dr, dc)| {
        let r = row + dr;
        let c = col + dc;
        if r >= 0 && r < n && c >= 0 && c < n {
            Some((r * n + c) as usize)
        } else {
            None
        }
    })
}

/// Disjoint-set forest with union by rank and path halving.
#[derive(Debug, Clone)]
struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len as u32).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] as usize != x {
            let grandparent = self.parent[self.parent[x] as usize];
            self.parent[x] = grandparent;
            x = grandparent as usize;
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb as u32,
            std::cmp::Ordering::Greater => self.parent[rb] = ra as u32,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra as u32;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Win detector for one board.
///
/// Player A owns the top and bottom edges, player B the left and right edges.
#[derive(Debug, Clone)]
pub struct Connectivity {
    size: usize,
    sets: UnionFind,
}

impl Connectivity {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            sets: UnionFind::new(size * size + 4),
        }
    }

    fn top(&self) -> usize {
        self.size * self.size
    }

    fn bottom(&self) -> usize {
        self.size * self.size + 1
    }

    fn left(&self) -> usize {
        self.size * self.size + 2
    }

    fn right(&self) -> usize {
        self.size * self.size + 3
    }

    /// The two virtual edge elements `player` has to join.
    fn sides(&self, player: Player) -> (usize, usize) {
        match player {
            Player::A => (self.top(), self.bottom()),
            Player::B => (self.left(), self.right()),
        }
    }

    /// Record a stone for `player` at `index` and report whether it wins.
    ///
    /// `same_owner` must answer whether a neighbouring cell already holds a
    /// stone of `player`. Work is proportional to the cell's degree.
    pub fn connect<F>(&mut self, index: usize, player: Player, same_owner: F) -> bool
    where
        F: Fn(usize) -> bool,
    {
        let size = self.size;
        let row = index / size;
        let col = index % size;

        for neighbor in neighbors(size, index) {
            if same_owner(neighbor) {
                self.sets.union(index, neighbor);
            }
        }

        match player {
            Player::A => {
                if row == 0 {
                    let top = self.top();
                    self.sets.union(index, top);
                }
                if row == size - 1 {
                    let bottom = self.bottom();
                    self.sets.union(index, bottom);
                }
            }
            Player::B => {
                if col == 0 {
                    let left = self.left();
                    self.sets.union(index, left);
                }
                if col == size - 1 {
                    let right = self.right();
                    self.sets.union(index, right);
                }
            }
        }

        self.has_connected(player)
    }

    /// Whether `player` currently joins both of their edges.
    pub fn has_connected(&mut self, player: Player) -> bool {
        let (a, b) = self.sides(player);
        self.sets.find(a) == self.sets.find(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_neighbors(size: usize, index: usize) -> Vec<usize> {
        let mut v: Vec<usize> = neighbors(size, index).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_interior_cell_has_six_neighbors() {
        // 3x3, center (1,1) = 4
        assert_eq!(sorted_neighbors(3, 4), vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_corner_neighbors_follow_hex_topology() {
        // (0,0) touches (0,1) and (1,0) only
        assert_eq!(sorted_neighbors(3, 0), vec![1, 3]);
        // (0,2) touches (0,1), (1,1), (1,2)
        assert_eq!(sorted_neighbors(3, 2), vec![1, 4, 5]);
        // (2,0) touches (1,0), (1,1), (2,1)
        assert_eq!(sorted_neighbors(3, 6), vec![3, 4, 7]);
        // (2,2) touches (1,2), (2,1)
        assert_eq!(sorted_neighbors(3, 8), vec![5, 7]);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let size = 5;
        for a in 0..size * size {
            for b in neighbors(size, a) {
                assert!(
                    neighbors(size, b).any(|x| x == a),
                    "{a} -> {b} is not mirrored"
                );
            }
        }
    }

    #[test]
    fn test_union_find_joins_sets() {
        let mut uf = UnionFind::new(6);
        uf.union(0, 1);
        uf.union(2, 3);
        assert_eq!(uf.find(0), uf.find(1));
        assert_ne!(uf.find(1), uf.find(2));
        uf.union(1, 3);
        assert_eq!(uf.find(0), uf.find(2));
        assert_ne!(uf.find(0), uf.find(5));
    }

    #[test]
    fn test_vertical_column_wins_for_a() {
        let size = 3;
        let mut conn = Connectivity::new(size);
        let mut owned = vec![false; size * size];

        for &idx in &[1usize, 4] {
            owned[idx] = true;
            let snapshot = owned.clone();
            assert!(!conn.connect(idx, Player::A, |n| snapshot[n]));
        }

        owned[7] = true;
        let snapshot = owned.clone();
        assert!(conn.connect(7, Player::A, |n| snapshot[n]));
        assert!(!conn.has_connected(Player::B));
    }

    #[test]
    fn test_non_adjacent_diagonal_does_not_connect() {
        // (0,0) and (1,1) are not neighbours, so no path for B along them.
        let size = 2;
        let mut conn = Connectivity::new(size);
        let mut owned = vec![false; 4];

        owned[0] = true;
        let snapshot = owned.clone();
        assert!(!conn.connect(0, Player::B, |n| snapshot[n]));

        owned[3] = true;
        let snapshot = owned.clone();
        assert!(!conn.connect(3, Player::B, |n| snapshot[n]));
    }

    #[test]
    fn test_anti_diagonal_connects() {
        // (1,0) and (0,1) are neighbours: B joins left to right.
        let size = 2;
        let mut conn = Connectivity::new(size);
        let mut owned = vec![false; 4];

        owned[2] = true;
        let snapshot = owned.clone();
        assert!(!conn.connect(2, Player::B, |n| snapshot[n]));

        owned[1] = true;
        let snapshot = owned.clone();
        assert!(conn.connect(1, Player::B, |n| snapshot[n]));
    }
}
