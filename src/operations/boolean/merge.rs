use slotmap::SecondaryMap;

use super::arrangement::{Arrangement, FaceId};

/// Maximal groups of kept faces connected through shared edges.
#[derive(Debug, Default)]
pub struct Regions {
    region_of: SecondaryMap<FaceId, usize>,
    count: usize,
}

impl Regions {
    #[must_use]
    pub fn region_of(&self, face: FaceId) -> Option<usize> {
        self.region_of.get(face).copied()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Disjoint-set forest with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

/// Groups kept faces that share an edge into regions. The shared edges are
/// interior to a region and never reach the output.
#[must_use]
pub fn merge_regions(arrangement: &Arrangement, kept: &SecondaryMap<FaceId, bool>) -> Regions {
    let is_kept = |f: FaceId| kept.get(f).copied().unwrap_or(false);

    let mut index: SecondaryMap<FaceId, usize> = SecondaryMap::new();
    for face in arrangement.faces.keys().filter(|&f| is_kept(f)) {
        let next = index.len();
        index.insert(face, next);
    }

    let mut sets = DisjointSet::new(index.len());
    for h in arrangement.half_edges.keys() {
        let (left, right) = (arrangement.face(h), arrangement.face(arrangement.twin(h)));
        if let (Some(&a), Some(&b)) = (index.get(left), index.get(right)) {
            sets.union(a, b);
        }
    }

    let mut dense: Vec<Option<usize>> = vec![None; index.len()];
    let mut regions = Regions::default();
    for (face, &i) in &index {
        let root = sets.find(i);
        let id = *dense[root].get_or_insert_with(|| {
            regions.count += 1;
            regions.count - 1
        });
        regions.region_of.insert(face, id);
    }
    regions
}
