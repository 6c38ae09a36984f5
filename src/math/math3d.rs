/// 3D math library.
///
/// Vector and matrix operations with f64 precision, used to build the
/// per-fragment geometry the glow evaluator consumes.

use crate::engine::types::{Matrix3, Matrix4, Vec3D};

// ─── Vector operations ───────────────────────────────────────

#[inline(always)]
pub fn vec3d_sub(a: &Vec3D, b: &Vec3D) -> Vec3D {
    Vec3D {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
}

/// `a + b * s`, the point reached along a ray.
#[inline(always)]
pub fn vec3d_add_scaled(a: &Vec3D, b: &Vec3D, s: f64) -> Vec3D {
    Vec3D {
        x: b.x.mul_add(s, a.x),
        y: b.y.mul_add(s, a.y),
        z: b.z.mul_add(s, a.z),
    }
}

#[inline(always)]
pub fn vec3d_negate(v: &Vec3D) -> Vec3D {
    Vec3D {
        x: -v.x,
        y: -v.y,
        z: -v.z,
    }
}

#[inline(always)]
pub fn vec3d_dot(a: &Vec3D, b: &Vec3D) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

#[inline(always)]
pub fn vec3d_length(v: &Vec3D) -> f64 {
    (v.x * v.x + v.y * v.y + v.z * v.z).sqrt()
}

/// Normalize in place. Zero-length vectors are left untouched.
#[inline(always)]
pub fn vec3d_normalize(v: &mut Vec3D) {
    let len = vec3d_length(v);
    if len > 1e-30 {
        let inv = 1.0 / len;
        v.x *= inv;
        v.y *= inv;
        v.z *= inv;
    }
}

#[inline(always)]
pub fn vec3d_normalized(v: &Vec3D) -> Vec3D {
    let mut result = *v;
    vec3d_normalize(&mut result);
    result
}

// ─── 3×3 matrices ────────────────────────────────────────────

/// Multiply matrix × column vector: result = M * v
#[inline]
pub fn mat3_mul_vec(m: &Matrix3, v: &Vec3D) -> Vec3D {
    Vec3D {
        x: m.m[0][0] * v.x + m.m[0][1] * v.y + m.m[0][2] * v.z,
        y: m.m[1][0] * v.x + m.m[1][1] * v.y + m.m[1][2] * v.z,
        z: m.m[2][0] * v.x + m.m[2][1] * v.y + m.m[2][2] * v.z,
    }
}

/// Build a matrix from three column vectors, the way shader `mat3(c0, c1, c2)`
/// constructors lay them out.
pub const fn mat3_from_columns(c0: [f64; 3], c1: [f64; 3], c2: [f64; 3]) -> Matrix3 {
    Matrix3 {
        m: [
            [c0[0], c1[0], c2[0]],
            [c0[1], c1[1], c2[1]],
            [c0[2], c1[2], c2[2]],
        ],
    }
}

/// Build rotation matrix from Euler angles (in radians), XYZ order.
pub fn mat3_from_euler(rx: f64, ry: f64, rz: f64) -> Matrix3 {
    let (sx, cx) = rx.sin_cos();
    let (sy, cy) = ry.sin_cos();
    let (sz, cz) = rz.sin_cos();

    Matrix3 {
        m: [
            [cy * cz, -cy * sz, sy],
            [sx * sy * cz + cx * sz, -sx * sy * sz + cx * cz, -sx * cy],
            [-cx * sy * cz + sx * sz, cx * sy * sz + sx * cz, cx * cy],
        ],
    }
}

// ─── 4×4 affine transforms ───────────────────────────────────

/// Compose a model-world matrix from a rotation, uniform scale and translation.
pub fn mat4_from_rotation_scale_translation(rot: &Matrix3, scale: f64, t: &Vec3D) -> Matrix4 {
    let r = &rot.m;
    Matrix4 {
        m: [
            [r[0][0] * scale, r[0][1] * scale, r[0][2] * scale, t.x],
            [r[1][0] * scale, r[1][1] * scale, r[1][2] * scale, t.y],
            [r[2][0] * scale, r[2][1] * scale, r[2][2] * scale, t.z],
            [0.0, 0.0, 0.0, 1.0],
        ],
    }
}

/// Read a column-major 16-element array (the layout JS matrix types use).
pub fn mat4_from_cols_slice(data: &[f64]) -> Option<Matrix4> {
    if data.len() < 16 {
        return None;
    }
    let mut m = Matrix4::default();
    for col in 0..4 {
        for row in 0..4 {
            m.m[row][col] = data[col * 4 + row];
        }
    }
    Some(m)
}

/// Transform a point (w = 1). The projective row is ignored.
#[inline]
pub fn mat4_transform_point(m: &Matrix4, p: &Vec3D) -> Vec3D {
    Vec3D {
        x: m.m[0][0] * p.x + m.m[0][1] * p.y + m.m[0][2] * p.z + m.m[0][3],
        y: m.m[1][0] * p.x + m.m[1][1] * p.y + m.m[1][2] * p.z + m.m[1][3],
        z: m.m[2][0] * p.x + m.m[2][1] * p.y + m.m[2][2] * p.z + m.m[2][3],
    }
}

/// Transform a direction (w = 0). The result is not renormalized.
#[inline]
pub fn mat4_transform_direction(m: &Matrix4, d: &Vec3D) -> Vec3D {
    Vec3D {
        x: m.m[0][0] * d.x + m.m[0][1] * d.y + m.m[0][2] * d.z,
        y: m.m[1][0] * d.x + m.m[1][1] * d.y + m.m[1][2] * d.z,
        z: m.m[2][0] * d.x + m.m[2][1] * d.y + m.m[2][2] * d.z,
    }
}
