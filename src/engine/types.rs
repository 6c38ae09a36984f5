/// Core value types shared by the shading and tone-mapping passes.
/// All types use #[repr(C)] for stable ABI across WASM ↔ JS boundary.

/// 3D vector with f64 precision.
#[repr(C, align(16))]
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Vec3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3D {
    pub const ZERO: Vec3D = Vec3D { x: 0.0, y: 0.0, z: 0.0 };

    #[inline(always)]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3D { x, y, z }
    }

    /// Read three consecutive components starting at `offset`.
    /// Missing components read as zero.
    pub fn from_slice(data: &[f64], offset: usize) -> Self {
        let at = |i: usize| data.get(offset + i).copied().unwrap_or(0.0);
        Vec3D { x: at(0), y: at(1), z: at(2) }
    }
}

/// 3×3 matrix, row-major: `m[row][col]`.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Matrix3 {
    pub m: [[f64; 3]; 3],
}

/// 4×4 affine transform, row-major: `m[row][col]`, translation in the last column.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Matrix4 {
    pub m: [[f64; 4]; 4],
}

/// Linear or display RGB triple.
///
/// Channels are unbounded while a color flows through the shading pass;
/// only the tone-mapped output is guaranteed to lie in [0, 1].
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    #[inline(always)]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    #[inline(always)]
    pub fn scale(&self, s: f64) -> Rgb {
        Rgb { r: self.r * s, g: self.g * s, b: self.b * s }
    }

    /// Apply `f` to every channel.
    #[inline(always)]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Rgb {
        Rgb { r: f(self.r), g: f(self.g), b: f(self.b) }
    }

    #[inline(always)]
    pub fn to_array(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    #[inline(always)]
    pub fn to_vec3(&self) -> Vec3D {
        Vec3D { x: self.r, y: self.g, z: self.b }
    }

    #[inline(always)]
    pub fn from_vec3(v: &Vec3D) -> Rgb {
        Rgb { r: v.x, g: v.y, b: v.z }
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl From<[f64; 3]> for Rgb {
    fn from(c: [f64; 3]) -> Self {
        Rgb { r: c[0], g: c[1], b: c[2] }
    }
}
