use crate::bodies::{Material, RigidBody};
use crate::core::{BodyHandle, BodyStorage};
use crate::debug::{Color, DebugDraw};
use crate::math::{Transform, Vector3};
use crate::shapes::{Shape, ShapeType, WorldShape};

/// A collision shape attached to the world, optionally riding on a rigid body.
///
/// An attached collider shares its body's transform: its world placement is
/// the body transform composed with the collider's local offset. A detached
/// collider is static and placed by its local transform alone.
#[derive(Debug, Clone)]
pub struct Collider {
    shape: Shape,

    /// Offset relative to the parent body, or the world placement when detached
    local_transform: Transform,

    body: Option<BodyHandle>,

    /// Overrides the parent body's material when set
    material: Option<Material>,

    /// Opaque back-reference to an owning entity
    pub user_data: u64,
}

impl Collider {
    /// Creates a detached collider placed by `transform`
    pub fn new(shape: Shape, transform: Transform) -> Self {
        Self {
            shape,
            local_transform: transform,
            body: None,
            material: None,
            user_data: 0,
        }
    }

    /// Creates a collider attached to `body` with no offset
    pub fn attached(shape: Shape, body: BodyHandle) -> Self {
        Self::new(shape, Transform::identity()).with_body(body)
    }

    /// Attaches the collider to a body
    pub fn with_body(mut self, body: BodyHandle) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the offset (or world placement, when detached)
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.local_transform = transform;
        self
    }

    /// Sets a material override
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn local_transform(&self) -> &Transform {
        &self.local_transform
    }

    pub fn set_local_transform(&mut self, transform: Transform) {
        self.local_transform = transform;
    }

    /// Material used for contacts: the override, else the body's, else the default
    pub fn material(&self, bodies: &BodyStorage<RigidBody>) -> Material {
        self.material
            .or_else(|| self.parent(bodies).map(|body| *body.get_material()))
            .unwrap_or_default()
    }

    fn parent<'a>(&self, bodies: &'a BodyStorage<RigidBody>) -> Option<&'a RigidBody> {
        self.body.and_then(|handle| bodies.get(handle))
    }

    /// World placement of the collider
    pub fn world_transform(&self, bodies: &BodyStorage<RigidBody>) -> Transform {
        match self.parent(bodies) {
            Some(body) => body.transform().combine(&self.local_transform),
            None => self.local_transform,
        }
    }

    /// Derives the world-space shape from the local shape and the current transform
    pub fn world_shape(&self, bodies: &BodyStorage<RigidBody>) -> WorldShape {
        self.shape.to_world(&self.world_transform(bodies))
    }

    /// Draws the world-space outline of the collider
    pub fn debug_draw(&self, bodies: &BodyStorage<RigidBody>, draw: &mut dyn DebugDraw, color: Color) {
        match self.world_shape(bodies) {
            WorldShape::Sphere(s) => draw.draw_sphere(s.center, s.radius, color),
            WorldShape::Box(b) => {
                let corners = b.corners();
                // Corners differing in exactly one axis bit share an edge
                for i in 0..8usize {
                    for k in 0..3 {
                        let j = i | (1 << k);
                        if j != i {
                            draw.draw_line(corners[i], corners[j], color);
                        }
                    }
                }
            }
            WorldShape::Capsule(c) => {
                draw.draw_line(c.segment.start, c.segment.end, color);
                draw.draw_sphere(c.segment.start, c.radius, color);
                draw.draw_sphere(c.segment.end, c.radius, color);
            }
            WorldShape::Cylinder(c) => {
                let up = c.up();
                draw.draw_circle(c.axis.start, up, c.radius, color);
                draw.draw_circle(c.axis.end, up, c.radius, color);
                draw.draw_line(c.axis.start, c.axis.end, color);
            }
            WorldShape::Polytope(p) => {
                for point in &p.points {
                    draw.draw_point(*point, color);
                }
            }
        }
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::new(Shape::sphere(0.5), Transform::from_position(Vector3::zeros()))
    }
}
