use crate::math::{Matrix3, Plane, Quaternion, Transform, Vector3};

/// A box (cuboid) collision shape
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    /// Centre of the box in the collider's local space
    center: Vector3,

    /// The half-extents of the box (half-width, half-height, half-depth)
    half_extents: Vector3,

    /// Orientation of the box relative to its collider
    rotation: Quaternion,
}

impl BoxShape {
    /// Creates a new box with the given half-extents centred on the local origin
    pub fn new(half_extents: Vector3) -> Self {
        Self::with_offset(Vector3::zeros(), half_extents, Quaternion::identity())
    }

    /// Creates a new box with the given full dimensions
    pub fn new_with_dimensions(width: f32, height: f32, depth: f32) -> Self {
        Self::new(Vector3::new(width, height, depth) * 0.5)
    }

    /// Creates a new box with a local centre and orientation
    pub fn with_offset(center: Vector3, half_extents: Vector3, rotation: Quaternion) -> Self {
        Self {
            center,
            half_extents: half_extents.map(|e| e.max(0.0)),
            rotation,
        }
    }

    /// Returns the half-extents of the box
    pub fn get_half_extents(&self) -> Vector3 {
        self.half_extents
    }

    /// Sets the half-extents of the box
    pub fn set_half_extents(&mut self, half_extents: Vector3) {
        self.half_extents = half_extents.map(|e| e.max(0.0));
    }

    /// Returns the full dimensions of the box
    pub fn get_dimensions(&self) -> Vector3 {
        self.half_extents * 2.0
    }

    pub fn volume(&self) -> f32 {
        let d = self.get_dimensions();
        d.x * d.y * d.z
    }

    /// Solid cuboid: I = (1/12) * m * (h^2 + d^2) etc.
    pub fn inertia_tensor(&self, mass: f32) -> Matrix3 {
        let d = self.get_dimensions();
        let (x2, y2, z2) = (d.x * d.x, d.y * d.y, d.z * d.z);

        Matrix3::from_diagonal(&Vector3::new(
            (1.0 / 12.0) * mass * (y2 + z2),
            (1.0 / 12.0) * mass * (x2 + z2),
            (1.0 / 12.0) * mass * (x2 + y2),
        ))
    }

    /// Places the box in world space as an oriented bounding box
    pub fn to_world(&self, transform: &Transform) -> WorldObb {
        let rotation = transform.rotation * self.rotation;
        let basis = rotation.to_rotation_matrix().into_inner();

        WorldObb {
            center: transform.transform_point(self.center),
            axes: [
                basis.column(0).into_owned(),
                basis.column(1).into_owned(),
                basis.column(2).into_owned(),
            ],
            half_extents: self.half_extents.component_mul(&transform.scale.abs()),
        }
    }
}

/// An oriented box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldObb {
    pub center: Vector3,

    /// Unit local axes of the box in world space
    pub axes: [Vector3; 3],

    pub half_extents: Vector3,
}

impl WorldObb {
    /// Returns the 8 corners of the box.
    ///
    /// Corner `i` takes the positive extent along axis `k` when bit `k` of `i` is set.
    pub fn corners(&self) -> [Vector3; 8] {
        let mut corners = [Vector3::zeros(); 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let mut p = self.center;
            for k in 0..3 {
                let sign = if i & (1 << k) != 0 { 1.0 } else { -1.0 };
                p += self.axes[k] * (sign * self.half_extents[k]);
            }
            *corner = p;
        }
        corners
    }

    /// Returns the outward support plane of face `face`.
    ///
    /// Faces are numbered `2 * axis + side`, where side 0 is the positive face.
    pub fn face_plane(&self, face: usize) -> Plane {
        let axis = face / 2;
        let sign = if face % 2 == 0 { 1.0 } else { -1.0 };
        let normal = self.axes[axis] * sign;
        Plane::from_point_normal(self.center + normal * self.half_extents[axis], normal)
    }

    /// Projects the box onto `axis`, returning the (min, max) interval
    pub fn project(&self, axis: &Vector3) -> (f32, f32) {
        let c = self.center.dot(axis);
        let r = (0..3)
            .map(|k| self.half_extents[k] * self.axes[k].dot(axis).abs())
            .sum::<f32>();
        (c - r, c + r)
    }

    /// Farthest corner of the box along `direction`
    pub fn support(&self, direction: &Vector3) -> Vector3 {
        let mut p = self.center;
        for k in 0..3 {
            let sign = if self.axes[k].dot(direction) >= 0.0 { 1.0 } else { -1.0 };
            p += self.axes[k] * (sign * self.half_extents[k]);
        }
        p
    }

    /// Position of `point` in the box's local frame
    pub fn to_local(&self, point: &Vector3) -> Vector3 {
        let d = point - self.center;
        Vector3::new(d.dot(&self.axes[0]), d.dot(&self.axes[1]), d.dot(&self.axes[2]))
    }
}
