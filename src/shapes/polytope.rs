use crate::math::{Matrix3, Transform, Vector3};

/// A convex polytope given by its vertex cloud.
///
/// The points are assumed to be in convex position; interior points are
/// harmless for collision since only support queries are made.
#[derive(Debug, Clone, PartialEq)]
pub struct Polytope {
    vertices: Vec<Vector3>,
}

impl Polytope {
    /// Creates a polytope from a set of points
    pub fn from_points(points: &[Vector3]) -> Self {
        Self {
            vertices: points.to_vec(),
        }
    }

    /// An axis-aligned cuboid polytope with the given half-extents
    pub fn cuboid(half_extents: Vector3) -> Self {
        let mut vertices = Vec::with_capacity(8);
        for i in 0..8 {
            vertices.push(Vector3::new(
                if i & 1 != 0 { half_extents.x } else { -half_extents.x },
                if i & 2 != 0 { half_extents.y } else { -half_extents.y },
                if i & 4 != 0 { half_extents.z } else { -half_extents.z },
            ));
        }
        Self { vertices }
    }

    /// Returns the vertices of the polytope
    pub fn get_vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    /// Returns the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn local_bounds(&self) -> (Vector3, Vector3) {
        let mut iter = self.vertices.iter();
        let first = match iter.next() {
            Some(v) => *v,
            None => return (Vector3::zeros(), Vector3::zeros()),
        };

        iter.fold((first, first), |(min, max), v| (min.inf(v), max.sup(v)))
    }

    /// Volume of the local bounding box, used as an estimate of the hull volume
    pub fn volume(&self) -> f32 {
        let (min, max) = self.local_bounds();
        let extents = max - min;
        extents.x * extents.y * extents.z
    }

    /// Inertia of the local bounding box
    pub fn inertia_tensor(&self, mass: f32) -> Matrix3 {
        if self.vertices.is_empty() {
            return Matrix3::zeros();
        }

        let (min, max) = self.local_bounds();
        let d = max - min;
        let (x2, y2, z2) = (d.x * d.x, d.y * d.y, d.z * d.z);

        Matrix3::from_diagonal(&Vector3::new(
            (1.0 / 12.0) * mass * (y2 + z2),
            (1.0 / 12.0) * mass * (x2 + z2),
            (1.0 / 12.0) * mass * (x2 + y2),
        ))
    }

    /// Places every vertex in world space
    pub fn to_world(&self, transform: &Transform) -> WorldPolytope {
        WorldPolytope {
            points: self.vertices.iter().map(|v| transform.transform_point(*v)).collect(),
        }
    }
}

/// A convex polytope in world space
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPolytope {
    pub points: Vec<Vector3>,
}

impl WorldPolytope {
    /// Vertex with the largest projection onto `direction`
    pub fn support(&self, direction: &Vector3) -> Vector3 {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.dot(direction).total_cmp(&b.dot(direction)))
            .unwrap_or_else(Vector3::zeros)
    }

    /// Average of the vertices
    pub fn centroid(&self) -> Vector3 {
        if self.points.is_empty() {
            return Vector3::zeros();
        }
        self.points.iter().sum::<Vector3>() / self.points.len() as f32
    }
}
