use crate::math::{Vector3, Matrix3, Quaternion, EPSILON};

/// Represents a transformation in 3D space (position, rotation, and scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vector3,

    /// Rotation as a unit quaternion
    pub rotation: Quaternion,

    /// Scale in each axis
    pub scale: Vector3,
}

impl Transform {
    /// Creates a new transform with the given position, rotation, and scale
    #[inline]
    pub fn new(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Creates a new identity transform (no translation, no rotation, unit scale)
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Quaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Creates a new transform from a position and rotation
    #[inline]
    pub fn from_position_rotation(position: Vector3, rotation: Quaternion) -> Self {
        Self {
            position,
            rotation,
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Returns the rotation part as a 3x3 matrix whose columns are the local axes in world space
    #[inline]
    pub fn rotation_matrix(&self) -> Matrix3 {
        self.rotation.to_rotation_matrix().into_inner()
    }

    /// Returns the local-to-world matrix
    pub fn to_matrix(&self) -> nalgebra::Matrix4<f32> {
        nalgebra::Matrix4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * nalgebra::Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Transforms a point from local into world space
    #[inline]
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        self.rotation * point.component_mul(&self.scale) + self.position
    }

    /// Transforms a direction vector (ignoring translation, including scale)
    #[inline]
    pub fn transform_direction(&self, direction: Vector3) -> Vector3 {
        self.rotation * direction.component_mul(&self.scale)
    }

    /// Rotates a vector without applying scale or translation
    #[inline]
    pub fn rotate_vector(&self, v: Vector3) -> Vector3 {
        self.rotation * v
    }

    /// Transforms a world-space point into this transform's local space
    pub fn inverse_transform_point(&self, point: Vector3) -> Vector3 {
        let unrotated = self.rotation.inverse() * (point - self.position);

        Vector3::new(
            if self.scale.x.abs() > EPSILON { unrotated.x / self.scale.x } else { 0.0 },
            if self.scale.y.abs() > EPSILON { unrotated.y / self.scale.y } else { 0.0 },
            if self.scale.z.abs() > EPSILON { unrotated.z / self.scale.z } else { 0.0 },
        )
    }

    /// Returns the largest absolute scale component, used to scale radii
    #[inline]
    pub fn max_scale(&self) -> f32 {
        self.scale.x.abs().max(self.scale.y.abs()).max(self.scale.z.abs())
    }

    /// Composes a child transform expressed relative to this one.
    ///
    /// The result maps child-local points straight into world space:
    /// `parent.combine(&child).transform_point(p) == parent.transform_point(child.transform_point(p))`
    /// for uniformly scaled parents.
    pub fn combine(&self, child: &Self) -> Self {
        Self {
            position: self.transform_point(child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale.component_mul(&child.scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
