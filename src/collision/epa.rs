use crate::collision::gjk::{minkowski_support, Simplex, SupportMap, SupportPoint};
use crate::math::{Vector3, EPSILON};

/// Maximum number of iterations for the EPA algorithm
const MAX_ITERATIONS: usize = 64;

/// Expansion stops once a new support point is this close to the closest face
const TOLERANCE: f32 = 1.0e-4;

/// Penetration found by EPA
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit normal pointing from shape A toward shape B
    pub normal: Vector3,

    /// Depth along `normal`
    pub depth: f32,

    /// Deepest point of A inside B
    pub on_a: Vector3,

    /// Deepest point of B inside A
    pub on_b: Vector3,
}

/// A face of the polytope, wound counter-clockwise seen from outside
#[derive(Debug, Clone)]
struct Face {
    vertices: [usize; 3],
    normal: Vector3,
    distance: f32,
}

/// Expanding Polytope Algorithm (EPA) for computing penetration depth
pub struct EPA;

impl EPA {
    /// Expands the GJK tetrahedron toward the boundary of A - B.
    ///
    /// Returns `None` when the seed simplex is degenerate.
    pub fn penetration<A: SupportMap + ?Sized, B: SupportMap + ?Sized>(
        simplex: &Simplex,
        a: &A,
        b: &B,
    ) -> Option<Penetration> {
        let mut vertices: Vec<SupportPoint> = simplex.get_points().to_vec();
        if vertices.len() < 4 {
            return None;
        }

        // The seed centroid stays inside the expanding polytope
        let interior = vertices.iter().map(|v| v.point).sum::<Vector3>() / vertices.len() as f32;

        let mut faces = Vec::new();
        for [i, j, k] in [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]] {
            if let Some(face) = Self::make_face(&vertices, i, j, k, &interior) {
                faces.push(face);
            }
        }

        if faces.len() < 4 {
            return None;
        }

        for _ in 0..MAX_ITERATIONS {
            let closest = Self::closest_face(&faces)?;
            let face = faces[closest].clone();

            let support = minkowski_support(a, b, &face.normal);
            if support.point.dot(&face.normal) - face.distance < TOLERANCE {
                return Some(Self::result(&vertices, &face));
            }

            vertices.push(support);
            let new_index = vertices.len() - 1;

            // Remove every face the new point can see, keeping the horizon edges
            let mut edges: Vec<(usize, usize)> = Vec::new();
            let mut i = 0;
            while i < faces.len() {
                let f = &faces[i];
                if f.normal.dot(&(support.point - vertices[f.vertices[0]].point)) > 0.0 {
                    let [v0, v1, v2] = f.vertices;
                    Self::add_unique_edge(&mut edges, v0, v1);
                    Self::add_unique_edge(&mut edges, v1, v2);
                    Self::add_unique_edge(&mut edges, v2, v0);
                    faces.swap_remove(i);
                } else {
                    i += 1;
                }
            }

            if edges.is_empty() {
                return Some(Self::result(&vertices, &face));
            }

            for (from, to) in edges {
                if let Some(face) = Self::make_face(&vertices, from, to, new_index, &interior) {
                    faces.push(face);
                }
            }
        }

        let closest = Self::closest_face(&faces)?;
        Some(Self::result(&vertices, &faces[closest]))
    }

    /// Builds a face, flipping it so its normal points away from `interior`.
    /// Faces passing through the origin are oriented correctly as well.
    fn make_face(vertices: &[SupportPoint], a: usize, b: usize, c: usize, interior: &Vector3) -> Option<Face> {
        let pa = vertices[a].point;
        let cross = (vertices[b].point - pa).cross(&(vertices[c].point - pa));
        let length = cross.norm();

        // Zero-area triangle
        if length <= EPSILON * EPSILON {
            return None;
        }

        let normal = cross / length;
        let distance = normal.dot(&pa);

        if normal.dot(&(pa - interior)) < 0.0 {
            Some(Face {
                vertices: [a, c, b],
                normal: -normal,
                distance: -distance,
            })
        } else {
            Some(Face {
                vertices: [a, b, c],
                normal,
                distance,
            })
        }
    }

    fn closest_face(faces: &[Face]) -> Option<usize> {
        faces
            .iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| x.distance.total_cmp(&y.distance))
            .map(|(i, _)| i)
    }

    /// Keeps an edge on the horizon; an edge shared by two removed faces appears reversed and cancels out
    fn add_unique_edge(edges: &mut Vec<(usize, usize)>, a: usize, b: usize) {
        if let Some(index) = edges.iter().position(|&edge| edge == (b, a)) {
            edges.swap_remove(index);
        } else {
            edges.push((a, b));
        }
    }

    /// Maps the origin's projection on `face` back onto both shapes
    fn result(vertices: &[SupportPoint], face: &Face) -> Penetration {
        let [v0, v1, v2] = face.vertices.map(|i| vertices[i]);
        let projected = face.normal * face.distance;
        let (u, v, w) = barycentric(&projected, &v0.point, &v1.point, &v2.point);

        Penetration {
            normal: face.normal,
            depth: face.distance,
            on_a: v0.on_a * u + v1.on_a * v + v2.on_a * w,
            on_b: v0.on_b * u + v1.on_b * v + v2.on_b * w,
        }
    }
}

/// Barycentric coordinates of `p` in triangle (a, b, c); the centroid for degenerate triangles
fn barycentric(p: &Vector3, a: &Vector3, b: &Vector3, c: &Vector3) -> (f32, f32, f32) {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;

    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() <= EPSILON * EPSILON {
        return (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    (1.0 - v - w, v, w)
}
