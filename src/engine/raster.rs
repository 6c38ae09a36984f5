/// CPU fragment backend.
///
/// Drives the glow evaluator over explicit sample points when no GPU
/// shading stage is available:
/// - Batches of host-supplied fragments (flat position/normal buffers)
/// - Interleaved work split across workers, one call per worker
/// - Additive compositing into an RGBA framebuffer
/// - A single-sphere preview renderer for quick visual checks

use log::{trace, warn};

use crate::engine::types::{Rgb, Vec3D};
use crate::glow::{ColorResult, FragmentContext, FresnelGlowEvaluator, ShadingParameters};
use crate::math::{math3d, utils};
use crate::tonemap::ToneMappingStrategy;

/// Shade a slice of prepared fragments in order.
pub fn shade_contexts<S: ToneMappingStrategy>(
    evaluator: &FresnelGlowEvaluator<S>,
    params: &ShadingParameters,
    fragments: &[FragmentContext],
) -> Vec<ColorResult> {
    fragments.iter().map(|ctx| evaluator.evaluate(params, ctx)).collect()
}

/// Shade a batch of fragments given as flat buffers.
///
/// `positions` and `normals` hold 3 values per fragment, `rgba_out` 4.
/// The batch length is the shortest of the three. Worker `worker_id` of
/// `worker_count` shades fragments `worker_id, worker_id + worker_count, ...`
/// so concurrent workers never write the same output slot.
///
/// Returns the number of fragments this worker shaded.
pub fn shade_fragments<S: ToneMappingStrategy>(
    evaluator: &FresnelGlowEvaluator<S>,
    params: &ShadingParameters,
    camera: &Vec3D,
    positions: &[f64],
    normals: &[f64],
    rgba_out: &mut [f64],
    worker_id: u32,
    worker_count: u32,
) -> u32 {
    let count = (positions.len() / 3).min(normals.len() / 3).min(rgba_out.len() / 4);
    let stride = worker_count.max(1) as usize;
    let mut shaded = 0u32;
    let mut non_finite = 0u32;

    let mut i = worker_id as usize;
    while i < count {
        let ctx = FragmentContext::new(
            Vec3D::from_slice(positions, i * 3),
            Vec3D::from_slice(normals, i * 3),
            *camera,
        );
        let result = evaluator.evaluate(params, &ctx);
        if !result.alpha.is_finite() {
            non_finite += 1;
        }
        rgba_out[i * 4..i * 4 + 4].copy_from_slice(&result.to_rgba());
        shaded += 1;
        i += stride;
    }

    if non_finite > 0 {
        warn!("{non_finite} fragments produced a non-finite glow alpha (fresnel guard {:?})", evaluator.guard());
    }

    trace!("Worker {worker_id}/{stride} shaded {shaded} of {count} fragments");
    shaded
}

/// Additive blend of one shaded fragment over a destination color.
///
/// A channel whose contribution is not finite (NaN alpha from an unguarded
/// back face) adds nothing.
#[inline(always)]
pub fn blend_additive(dst: &Rgb, src: &ColorResult) -> Rgb {
    let add = |d: f64, c: f64| {
        let contribution = c * src.alpha;
        if contribution.is_finite() {
            utils::saturate(d + contribution)
        } else {
            d
        }
    };
    Rgb {
        r: add(dst.r, src.color.r),
        g: add(dst.g, src.color.g),
        b: add(dst.b, src.color.b),
    }
}

/// Composite shaded RGBA fragments additively into an RGBA framebuffer.
///
/// Destination alpha is left untouched. Returns the number of pixels blended.
pub fn composite_additive(framebuffer: &mut [f64], shaded: &[f64]) -> usize {
    let mut blended = 0;
    for (dst, src) in framebuffer.chunks_exact_mut(4).zip(shaded.chunks_exact(4)) {
        let result = ColorResult {
            color: Rgb::new(src[0], src[1], src[2]),
            alpha: src[3],
        };
        let out = blend_additive(&Rgb::new(dst[0], dst[1], dst[2]), &result);
        dst[0] = out.r;
        dst[1] = out.g;
        dst[2] = out.b;
        blended += 1;
    }
    blended
}

/// Pack RGBA floats into bytes for display.
pub fn pack_rgba8(rgba: &[f64], out: &mut [u8]) {
    for (src, dst) in rgba.iter().zip(out.iter_mut()) {
        *dst = utils::float_to_byte(*src);
    }
}

/// Camera and target for the sphere preview.
#[derive(Clone, Debug)]
pub struct PreviewView {
    pub width: u32,
    pub height: u32,
    /// Camera position (world space)
    pub camera_pos: Vec3D,
    /// Center ray direction
    pub ray_dir_base: Vec3D,
    /// World-space ray offset at the right edge of the image
    pub ray_dx: Vec3D,
    /// World-space ray offset at the bottom edge of the image
    pub ray_dy: Vec3D,
    pub sphere_center: Vec3D,
    pub sphere_radius: f64,
    pub background: Rgb,
}

impl Default for PreviewView {
    fn default() -> Self {
        // Camera 6 units back on +Z looking at the origin, ~35° vertical FOV
        Self {
            width: 256,
            height: 256,
            camera_pos: Vec3D { x: 0.0, y: 0.0, z: 6.0 },
            ray_dir_base: Vec3D { x: 0.0, y: 0.0, z: -1.0 },
            ray_dx: Vec3D { x: 0.315, y: 0.0, z: 0.0 },
            ray_dy: Vec3D { x: 0.0, y: -0.315, z: 0.0 },
            sphere_center: Vec3D::ZERO,
            sphere_radius: 1.3,
            background: Rgb::new(0.02, 0.02, 0.05),
        }
    }
}

impl PreviewView {
    /// Build from a flat buffer:
    /// `[width, height, camera xyz, base_dir xyz, dx xyz, dy xyz,
    ///   sphere xyz, radius, bg rgb]`.
    /// Returns the default view when the buffer is short.
    pub fn from_buffer(data: &[f64]) -> Self {
        if data.len() < 21 {
            return Self::default();
        }
        Self {
            width: data[0] as u32,
            height: data[1] as u32,
            camera_pos: Vec3D::from_slice(data, 2),
            ray_dir_base: Vec3D::from_slice(data, 5),
            ray_dx: Vec3D::from_slice(data, 8),
            ray_dy: Vec3D::from_slice(data, 11),
            sphere_center: Vec3D::from_slice(data, 14),
            sphere_radius: data[17],
            background: Rgb::new(data[18], data[19], data[20]),
        }
    }

    /// Nearest hit distance of `dir` against the sphere, if any.
    fn intersect(&self, dir: &Vec3D) -> Option<f64> {
        let oc = math3d::vec3d_sub(&self.camera_pos, &self.sphere_center);
        let b = math3d::vec3d_dot(&oc, dir);
        let c = math3d::vec3d_dot(&oc, &oc) - self.sphere_radius * self.sphere_radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t_near = -b - sqrt_disc;
        let t_far = -b + sqrt_disc;
        if t_near > 0.0 {
            Some(t_near)
        } else if t_far > 0.0 {
            Some(t_far)
        } else {
            None
        }
    }

    /// Fragment seen through pixel (x, y), if the ray hits the sphere.
    pub fn fragment_at(&self, x: u32, y: u32) -> Option<FragmentContext> {
        let hw = self.width as f64 * 0.5;
        let hh = self.height as f64 * 0.5;
        let px = (x as f64 + 0.5 - hw) / hw;
        let py = (y as f64 + 0.5 - hh) / hh;

        let mut dir = Vec3D {
            x: self.ray_dir_base.x + px * self.ray_dx.x + py * self.ray_dy.x,
            y: self.ray_dir_base.y + px * self.ray_dx.y + py * self.ray_dy.y,
            z: self.ray_dir_base.z + px * self.ray_dx.z + py * self.ray_dy.z,
        };
        math3d::vec3d_normalize(&mut dir);

        let t = self.intersect(&dir)?;
        let hit = math3d::vec3d_add_scaled(&self.camera_pos, &dir, t);
        let normal = math3d::vec3d_normalized(&math3d::vec3d_sub(&hit, &self.sphere_center));
        Some(FragmentContext::new(hit, normal, self.camera_pos))
    }
}

/// Render interleaved scanlines of the sphere preview into an RGBA float buffer.
///
/// Background pixels get the background color; sphere pixels are shaded
/// and composited additively over it. Returns the number of rows rendered.
pub fn render_preview_scanlines<S: ToneMappingStrategy>(
    view: &PreviewView,
    evaluator: &FresnelGlowEvaluator<S>,
    params: &ShadingParameters,
    rgba_out: &mut [f64],
    worker_id: u32,
    worker_count: u32,
) -> u32 {
    let w = view.width as usize;
    let h = view.height as usize;
    let needed = w.checked_mul(h).and_then(|n| n.checked_mul(4));
    if needed.map_or(true, |n| n > rgba_out.len()) {
        warn!("Preview buffer holds {} values, {w}x{h} RGBA needs more", rgba_out.len());
        return 0;
    }

    let stride = worker_count.max(1) as usize;
    let mut rows_rendered = 0u32;

    let mut y = worker_id as usize;
    while y < h {
        for x in 0..w {
            let ri = (y * w + x) * 4;

            let mut color = view.background;
            if let Some(ctx) = view.fragment_at(x as u32, y as u32) {
                color = blend_additive(&color, &evaluator.evaluate(params, &ctx));
            }

            rgba_out[ri] = color.r;
            rgba_out[ri + 1] = color.g;
            rgba_out[ri + 2] = color.b;
            rgba_out[ri + 3] = 1.0;
        }
        rows_rendered += 1;
        y += stride;
    }

    rows_rendered
}
