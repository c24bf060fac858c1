use std::cmp::Ordering;
use std::collections::HashMap;

use slotmap::{SecondaryMap, SlotMap};

use crate::error::GeometryError;

use super::noding::Segment;
use super::snap::{cross, GridPoint};

slotmap::new_key_type! {
    /// Unique identifier for an arrangement vertex.
    pub struct VertexId;
    /// Unique identifier for a half-edge.
    pub struct HalfEdgeId;
    /// Unique identifier for a face.
    pub struct FaceId;
}

#[derive(Debug, Clone)]
pub struct VertexData {
    pub point: GridPoint,
    /// Outgoing half-edges sorted counter-clockwise, starting at direction +x.
    pub outgoing: Vec<HalfEdgeId>,
}

#[derive(Debug, Clone)]
pub struct HalfEdgeData {
    pub origin: VertexId,
    pub twin: HalfEdgeId,
    /// Next half-edge along the boundary of the face on the left.
    pub next: HalfEdgeId,
    /// Face on the left.
    pub face: FaceId,
    /// Winding change per operand when crossing from the right face to the left face.
    pub wind: [i32; 2],
    /// Position in the origin's `outgoing` list.
    slot: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FaceData {
    /// One half-edge of the outer boundary; `None` for the unbounded face.
    pub outer: Option<HalfEdgeId>,
    /// One half-edge per boundary cycle of a component nested in the face.
    pub inner: Vec<HalfEdgeId>,
    pub winding: [i32; 2],
    /// Fill-rule membership in the source and the clip.
    pub inside: [bool; 2],
}

/// Planar subdivision induced by a set of noded segments.
#[derive(Debug)]
pub struct Arrangement {
    pub vertices: SlotMap<VertexId, VertexData>,
    pub half_edges: SlotMap<HalfEdgeId, HalfEdgeData>,
    pub faces: SlotMap<FaceId, FaceData>,
    unbounded: FaceId,
}

/// A boundary cycle found while linking faces.
struct Cycle {
    start: HalfEdgeId,
    face: Option<FaceId>,
    bounded: bool,
}

impl Arrangement {
    /// Builds the arrangement of segments that meet only at shared endpoints.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if a boundary cycle cannot be closed or a
    /// component cannot be placed in a face.
    pub fn build(segments: &[Segment]) -> Result<Self, GeometryError> {
        let mut faces = SlotMap::with_key();
        let unbounded = faces.insert(FaceData::default());
        let mut arrangement = Self {
            vertices: SlotMap::with_key(),
            half_edges: SlotMap::with_key(),
            faces,
            unbounded,
        };

        let mut index: HashMap<GridPoint, VertexId> = HashMap::with_capacity(segments.len());
        for seg in segments {
            let va = arrangement.vertex_at(&mut index, seg.a);
            let vb = arrangement.vertex_at(&mut index, seg.b);
            arrangement.add_edge_pair(va, vb, seg.wind);
        }

        arrangement.sort_around_vertices();
        arrangement.link_next();
        arrangement.build_faces()?;
        Ok(arrangement)
    }

    #[must_use]
    pub fn unbounded(&self) -> FaceId {
        self.unbounded
    }

    #[must_use]
    pub fn face(&self, h: HalfEdgeId) -> FaceId {
        self.half_edges[h].face
    }

    #[must_use]
    pub fn twin(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h].twin
    }

    #[must_use]
    pub fn next(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h].next
    }

    #[must_use]
    pub fn origin(&self, h: HalfEdgeId) -> VertexId {
        self.half_edges[h].origin
    }

    #[must_use]
    pub fn point(&self, v: VertexId) -> GridPoint {
        self.vertices[v].point
    }

    #[must_use]
    pub fn degree(&self, v: VertexId) -> usize {
        self.vertices[v].outgoing.len()
    }

    fn origin_point(&self, h: HalfEdgeId) -> GridPoint {
        self.point(self.origin(h))
    }

    fn dest_point(&self, h: HalfEdgeId) -> GridPoint {
        self.origin_point(self.twin(h))
    }

    /// Half-edges of the cycle through `start`, following `next`.
    pub fn cycle(&self, start: HalfEdgeId) -> impl Iterator<Item = HalfEdgeId> + '_ {
        std::iter::successors(Some(start), move |&h| {
            let n = self.next(h);
            (n != start).then_some(n)
        })
    }

    /// Every half-edge with `face` on its left.
    #[must_use]
    pub fn face_boundary(&self, face: FaceId) -> Vec<HalfEdgeId> {
        let data = &self.faces[face];
        data.outer
            .iter()
            .chain(data.inner.iter())
            .flat_map(|&start| self.cycle(start))
            .collect()
    }

    fn vertex_at(&mut self, index: &mut HashMap<GridPoint, VertexId>, point: GridPoint) -> VertexId {
        *index.entry(point).or_insert_with(|| {
            self.vertices.insert(VertexData {
                point,
                outgoing: Vec::new(),
            })
        })
    }

    fn add_edge_pair(&mut self, from: VertexId, to: VertexId, wind: [i32; 2]) {
        let forward = self.half_edges.insert(HalfEdgeData {
            origin: from,
            twin: HalfEdgeId::default(),
            next: HalfEdgeId::default(),
            face: FaceId::default(),
            wind,
            slot: 0,
        });
        let backward = self.half_edges.insert(HalfEdgeData {
            origin: to,
            twin: forward,
            next: HalfEdgeId::default(),
            face: FaceId::default(),
            wind: [-wind[0], -wind[1]],
            slot: 0,
        });
        self.half_edges[forward].twin = backward;
        self.vertices[from].outgoing.push(forward);
        self.vertices[to].outgoing.push(backward);
    }

    fn sort_around_vertices(&mut self) {
        let directions: SecondaryMap<HalfEdgeId, (i64, i64)> = self
            .half_edges
            .keys()
            .map(|h| {
                let (a, b) = (self.origin_point(h), self.dest_point(h));
                (h, (b.x - a.x, b.y - a.y))
            })
            .collect();

        for vertex in self.vertices.values_mut() {
            vertex
                .outgoing
                .sort_by(|&a, &b| compare_directions(directions[a], directions[b]));
            for (slot, &h) in vertex.outgoing.iter().enumerate() {
                self.half_edges[h].slot = slot;
            }
        }
    }

    /// `next(h)` is the outgoing half-edge at the head of `h` that comes
    /// immediately clockwise after `twin(h)`.
    fn link_next(&mut self) {
        let links: Vec<(HalfEdgeId, HalfEdgeId)> = self
            .half_edges
            .iter()
            .map(|(h, data)| {
                let twin = &self.half_edges[data.twin];
                let around = &self.vertices[twin.origin].outgoing;
                let degree = around.len();
                (h, around[(twin.slot + degree - 1) % degree])
            })
            .collect();
        for (h, next) in links {
            self.half_edges[h].next = next;
        }
    }

    /// Turns boundary cycles into faces. Counter-clockwise cycles bound a face
    /// of their own; every other cycle is the outer boundary of a connected
    /// component and is attached to the face that contains the component.
    fn build_faces(&mut self) -> Result<(), GeometryError> {
        let mut cycle_of: SecondaryMap<HalfEdgeId, usize> = SecondaryMap::new();
        let mut cycles: Vec<Cycle> = Vec::new();
        let total = self.half_edges.len();

        let keys: Vec<HalfEdgeId> = self.half_edges.keys().collect();
        for start in keys {
            if cycle_of.contains_key(start) {
                continue;
            }
            let index = cycles.len();
            let mut area2: i128 = 0;
            let mut length = 0;
            for h in self.cycle(start) {
                length += 1;
                if length > total || cycle_of.insert(h, index).is_some() {
                    return Err(GeometryError::OpenBoundary);
                }
                let (a, b) = (self.origin_point(h), self.dest_point(h));
                area2 += cross(i128::from(a.x), i128::from(a.y), i128::from(b.x), i128::from(b.y));
            }
            let face = (area2 > 0).then(|| {
                self.faces.insert(FaceData {
                    outer: Some(start),
                    ..FaceData::default()
                })
            });
            cycles.push(Cycle {
                start,
                bounded: face.is_some(),
                face,
            });
        }

        for index in 0..cycles.len() {
            if cycles[index].face.is_none() {
                self.resolve_containing_face(index, &mut cycles, &cycle_of)?;
            }
        }

        for cycle in &cycles {
            let Some(face) = cycle.face else {
                return Err(GeometryError::Degenerate("unplaced component".into()));
            };
            if !cycle.bounded {
                self.faces[face].inner.push(cycle.start);
            }
            let members: Vec<HalfEdgeId> = self.cycle(cycle.start).collect();
            for h in members {
                self.half_edges[h].face = face;
            }
        }
        Ok(())
    }

    /// Follows leftward rays from component to component until a bounded face
    /// or the unbounded face is reached, then records that face for every
    /// component on the way.
    fn resolve_containing_face(
        &self,
        index: usize,
        cycles: &mut [Cycle],
        cycle_of: &SecondaryMap<HalfEdgeId, usize>,
    ) -> Result<(), GeometryError> {
        let mut chain = Vec::new();
        let mut current = index;
        let face = loop {
            if let Some(face) = cycles[current].face {
                break face;
            }
            if chain.len() > cycles.len() {
                return Err(GeometryError::Degenerate("cyclic component nesting".into()));
            }
            chain.push(current);
            let origin = self.leftmost_vertex(cycles[current].start);
            match self.cast_left(origin) {
                Some(h) => current = cycle_of[h],
                None => break self.unbounded,
            }
        };
        for c in chain {
            cycles[c].face = Some(face);
        }
        Ok(())
    }

    fn leftmost_vertex(&self, start: HalfEdgeId) -> GridPoint {
        self.cycle(start)
            .map(|h| self.origin_point(h))
            .min()
            .unwrap_or_else(|| self.origin_point(start))
    }

    /// Casts a ray from `from` towards -x and returns a half-edge whose left
    /// face contains the stretch of the ray just before `from`, or `None` if
    /// the ray escapes.
    ///
    /// `from` must be the leftmost-lowest vertex of its component, so every
    /// hit belongs to another component.
    fn cast_left(&self, from: GridPoint) -> Option<HalfEdgeId> {
        // Nearest crossing of an edge interior, as x = num / den with den > 0.
        let mut best_edge: Option<(i128, i128, HalfEdgeId)> = None;
        for h in self.half_edges.keys() {
            let (a, b) = (self.origin_point(h), self.dest_point(h));
            // One half-edge per pair: the one pointing down.
            if a.y <= b.y || from.y >= a.y || from.y <= b.y {
                continue;
            }
            let den = i128::from(a.y - b.y);
            let num = i128::from(b.x) * den + i128::from(from.y - b.y) * i128::from(a.x - b.x);
            if num >= i128::from(from.x) * den {
                continue;
            }
            let closer = best_edge.map_or(true, |(bn, bd, _)| num * bd > bn * den);
            if closer {
                best_edge = Some((num, den, h));
            }
        }

        let best_vertex = self
            .vertices
            .iter()
            .filter(|(_, v)| v.point.y == from.y && v.point.x < from.x)
            .max_by_key(|(_, v)| v.point.x);

        match (best_edge, best_vertex) {
            (Some((num, den, h)), Some((_, vertex))) => {
                if num > i128::from(vertex.point.x) * den {
                    Some(h)
                } else {
                    vertex.outgoing.last().copied()
                }
            }
            (Some((_, _, h)), None) => Some(h),
            (None, Some((_, vertex))) => vertex.outgoing.last().copied(),
            (None, None) => None,
        }
    }
}

/// Orders directions counter-clockwise starting at +x.
fn compare_directions(a: (i64, i64), b: (i64, i64)) -> Ordering {
    let half = |(x, y): (i64, i64)| u8::from(!(y > 0 || (y == 0 && x > 0)));
    half(a).cmp(&half(b)).then_with(|| {
        let c = cross(i128::from(a.0), i128::from(a.1), i128::from(b.0), i128::from(b.1));
        0.cmp(&c)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn g(x: i64, y: i64) -> GridPoint {
        GridPoint::new(x, y)
    }

    fn ring(points: &[(i64, i64)], operand: usize) -> Vec<Segment> {
        let n = points.len();
        (0..n)
            .map(|i| {
                let mut wind = [0, 0];
                wind[operand] = 1;
                let (a, b) = (points[i], points[(i + 1) % n]);
                Segment::new(g(a.0, a.1), g(b.0, b.1), wind)
            })
            .collect()
    }

    #[test]
    fn direction_order() {
        let mut dirs = vec![(0, -1), (-1, 0), (1, 1), (1, 0), (0, 1), (1, -1)];
        dirs.sort_by(|&a, &b| compare_directions(a, b));
        assert_eq!(dirs, vec![(1, 0), (1, 1), (0, 1), (-1, 0), (0, -1), (1, -1)]);
    }

    #[test]
    fn single_square_has_one_bounded_face() {
        let arr = Arrangement::build(&ring(&[(0, 0), (4, 0), (4, 4), (0, 4)], 0)).unwrap();
        assert_eq!(arr.vertices.len(), 4);
        assert_eq!(arr.half_edges.len(), 8);
        assert_eq!(arr.faces.len(), 2);
        let unbounded = &arr.faces[arr.unbounded()];
        assert_eq!(unbounded.inner.len(), 1);
        for h in arr.half_edges.keys() {
            assert_eq!(arr.origin(arr.next(h)), arr.origin(arr.twin(h)));
            assert_ne!(arr.face(h), arr.face(arr.twin(h)));
        }
    }

    #[test]
    fn nested_square_attaches_to_enclosing_face() {
        let mut segments = ring(&[(0, 0), (10, 0), (10, 10), (0, 10)], 0);
        segments.extend(ring(&[(3, 3), (6, 3), (6, 6), (3, 6)], 1));
        let arr = Arrangement::build(&segments).unwrap();
        assert_eq!(arr.faces.len(), 3);

        let outer_face = arr
            .faces
            .iter()
            .find(|(_, f)| f.outer.is_some() && !f.inner.is_empty())
            .map(|(id, _)| id)
            .unwrap();
        let boundary = arr.face_boundary(outer_face);
        assert_eq!(boundary.len(), 8);
    }

    #[test]
    fn ray_through_vertex_finds_enclosing_face() {
        // The inner square's leftmost-lowest vertex (4, 5) sees the diamond
        // vertex (0, 5) on its leftward ray.
        let mut segments = ring(&[(5, 0), (10, 5), (5, 10), (0, 5)], 0);
        segments.extend(ring(&[(4, 5), (6, 5), (6, 6), (4, 6)], 1));
        let arr = Arrangement::build(&segments).unwrap();
        let inner_edge = arr
            .half_edges
            .iter()
            .find(|(h, _)| arr.origin_point(*h) == g(4, 5) && arr.dest_point(*h) == g(4, 6))
            .map(|(h, _)| h)
            .unwrap();
        let diamond_edge = arr
            .half_edges
            .iter()
            .find(|(h, _)| arr.origin_point(*h) == g(5, 0) && arr.dest_point(*h) == g(10, 5))
            .map(|(h, _)| h)
            .unwrap();
        assert_eq!(arr.face(inner_edge), arr.face(diamond_edge));
        assert_ne!(arr.face(diamond_edge), arr.unbounded());
    }

    #[test]
    fn disjoint_components_share_the_unbounded_face() {
        let mut segments = ring(&[(0, 0), (2, 0), (2, 2), (0, 2)], 0);
        segments.extend(ring(&[(5, 0), (7, 0), (7, 2), (5, 2)], 1));
        let arr = Arrangement::build(&segments).unwrap();
        assert_eq!(arr.faces[arr.unbounded()].inner.len(), 2);
    }
}
