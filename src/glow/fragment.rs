/// Per-fragment inputs and outputs of the glow evaluator.

use crate::engine::types::{Matrix4, Rgb, Vec3D};
use crate::math::math3d;

/// Geometry for one fragment, in world space. Never mutated by the evaluator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentContext {
    /// Surface position
    pub position: Vec3D,
    /// Surface normal (used as supplied, not renormalized)
    pub normal: Vec3D,
    /// Camera position, shared by every fragment of a frame
    pub camera_position: Vec3D,
    /// False for back faces of double-sided geometry; the normal is then flipped.
    pub front_facing: bool,
}

impl FragmentContext {
    pub fn new(position: Vec3D, normal: Vec3D, camera_position: Vec3D) -> Self {
        Self {
            position,
            normal,
            camera_position,
            front_facing: true,
        }
    }

    /// Build from object-space attributes and the model-world matrix.
    ///
    /// The position is transformed as a point and the normal as a direction;
    /// scaled models therefore yield non-unit normals, exactly as the vertex
    /// stage of the material produces them.
    pub fn from_object_space(
        model: &Matrix4,
        position: &Vec3D,
        normal: &Vec3D,
        camera_position: Vec3D,
    ) -> Self {
        Self::new(
            math3d::mat4_transform_point(model, position),
            math3d::mat4_transform_direction(model, normal),
            camera_position,
        )
    }

    pub fn with_front_facing(mut self, front_facing: bool) -> Self {
        self.front_facing = front_facing;
        self
    }

    /// Normal oriented toward the viewer side of the surface.
    #[inline(always)]
    pub fn facing_normal(&self) -> Vec3D {
        if self.front_facing {
            self.normal
        } else {
            math3d::vec3d_negate(&self.normal)
        }
    }
}

/// Shaded color and opacity for one fragment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorResult {
    /// Tone-mapped color in [0, 1]^3
    pub color: Rgb,
    /// Glow opacity in [0, opacity]
    pub alpha: f64,
}

impl ColorResult {
    #[inline(always)]
    pub fn to_rgba(&self) -> [f64; 4] {
        [self.color.r, self.color.g, self.color.b, self.alpha]
    }
}
