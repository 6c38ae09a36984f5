use js_sys::{Float64Array, Function};
use log::{debug, warn};
use wasm_bindgen::prelude::*;

pub mod engine;
pub mod error;
pub mod glow;
pub mod logging;
pub mod material;
pub mod math;
pub mod tonemap;

pub use engine::types::{Matrix3, Matrix4, Rgb, Vec3D};
pub use error::GlowError;
pub use glow::{
    ColorResult, FragmentContext, FresnelGlowEvaluator, FresnelGuard, ShadingParameters, SharedParameters,
};
pub use material::{BlendMode, BlendState, FakeGlowMaterial};
pub use tonemap::{AcesFilmic, Delegated, FilmicOperator, SelfContained, ToneMapping, ToneMappingStrategy};

use glow::params::{PARAMETER_DESCRIPTORS, PARAMS_LEN};
use math::{math3d, utils};

/// Initialize the WASM module (called automatically on load).
#[wasm_bindgen(start)]
pub fn init() {
    logging::install(logging::DEFAULT_LEVEL);
}

/// Change the console log level ("error", "warn", "info", "debug", "trace").
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logging::install(logging::parse_level(level));
}

/// Default material as a flat buffer (layout as listed on `evaluate_fragments`).
#[wasm_bindgen]
pub fn default_params() -> Vec<f64> {
    FakeGlowMaterial::default().to_buffer()
}

/// Shade a batch of fragments.
///
/// `material`: Float64Array material buffer:
///   [falloff, color_r, color_g, color_b, opacity, glow_internal_radius,
///    glow_sharpness, tone_mapping_exposure, tone_mapping_mode, fresnel_guard]
/// `model`: Float64Array(16) column-major model-world matrix, or empty when
///   positions and normals are already in world space
/// `camera`: Float64Array(3) camera world position
/// `positions` / `normals`: Float64Array, 3 values per fragment
/// `rgba_out`: Float64Array, 4 values per fragment
/// `worker_id` / `worker_count`: interleaved fragment assignment
#[wasm_bindgen]
pub fn evaluate_fragments(
    material: &[f64],
    model: &[f64],
    camera: &[f64],
    positions: &[f64],
    normals: &[f64],
    rgba_out: &mut [f64],
    worker_id: u32,
    worker_count: u32,
) -> u32 {
    let material = material_from_js(material);
    let evaluator = material.evaluator();
    let camera = Vec3D::from_slice(camera, 0);

    match math3d::mat4_from_cols_slice(model) {
        Some(model) => {
            let (world_positions, world_normals) = to_world_space(&model, positions, normals);
            engine::raster::shade_fragments(
                &evaluator,
                &material.params,
                &camera,
                &world_positions,
                &world_normals,
                rgba_out,
                worker_id,
                worker_count,
            )
        }
        None => engine::raster::shade_fragments(
            &evaluator,
            &material.params,
            &camera,
            positions,
            normals,
            rgba_out,
            worker_id,
            worker_count,
        ),
    }
}

/// Tone-map a flat RGB buffer with the built-in strategies.
///
/// `mode`: 0 = delegated (exposure ignored), 1 = self-contained.
/// Returns the number of colors written.
#[wasm_bindgen]
pub fn tone_map(colors: &[f64], exposure: f64, mode: u32, out: &mut [f64]) -> u32 {
    tone_map_buffer(&ToneMapping::from_id(mode), colors, exposure, out)
}

/// Tone-map a flat RGB buffer through a host-provided filmic function.
///
/// `operator` is called as `operator(Float64Array[r, g, b])` and must return
/// an array-like of at least three numbers. Results are saturated.
#[wasm_bindgen]
pub fn tone_map_with_host(colors: &[f64], operator: &Function, out: &mut [f64]) -> u32 {
    let strategy = Delegated::new(JsFilmicOperator { function: operator });
    tone_map_buffer(&strategy, colors, 1.0, out)
}

/// Composite shaded RGBA fragments additively into an RGBA framebuffer, in place.
#[wasm_bindgen]
pub fn composite_additive(framebuffer: &mut [f64], shaded: &[f64]) -> u32 {
    engine::raster::composite_additive(framebuffer, shaded) as u32
}

/// Convert an RGBA float buffer into bytes for an ImageData.
#[wasm_bindgen]
pub fn pack_rgba8(rgba: &[f64], out: &mut [u8]) {
    engine::raster::pack_rgba8(rgba, out);
}

/// Render scanlines of the single-sphere preview.
///
/// `view`: Float64Array view buffer (see `PreviewView::from_buffer`)
/// `material`: material buffer as for `evaluate_fragments`
/// `rgba_out`: Float64Array (width * height * 4)
#[wasm_bindgen]
pub fn render_preview(
    view: &[f64],
    material: &[f64],
    rgba_out: &mut [f64],
    worker_id: u32,
    worker_count: u32,
) -> u32 {
    let view = engine::raster::PreviewView::from_buffer(view);
    let material = material_from_js(material);
    engine::raster::render_preview_scanlines(
        &view,
        &material.evaluator(),
        &material.params,
        rgba_out,
        worker_id,
        worker_count,
    )
}

/// Parse a CSS hex color into `[r, g, b]` in [0, 1].
#[wasm_bindgen]
pub fn parse_glow_color(hex: &str) -> std::result::Result<Vec<f64>, JsValue> {
    utils::parse_hex_color(hex)
        .map(|c| c.to_array().to_vec())
        .map_err(to_js_error)
}

/// Settings-panel controls, one `name,label,min,max,step` line each.
#[wasm_bindgen]
pub fn parameter_descriptors() -> String {
    PARAMETER_DESCRIPTORS
        .iter()
        .map(|d| format!("{},{},{},{},{}", d.name, d.label, d.min, d.max, d.step))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Load a TOML preset into a material buffer.
#[wasm_bindgen]
pub fn material_from_toml(source: &str) -> std::result::Result<Vec<f64>, JsValue> {
    FakeGlowMaterial::from_toml_str(source)
        .map(|m| m.to_buffer())
        .map_err(to_js_error)
}

/// Serialize a material buffer as a TOML preset.
#[wasm_bindgen]
pub fn material_to_toml(material: &[f64]) -> std::result::Result<String, JsValue> {
    material_from_js(material).to_toml_string().map_err(to_js_error)
}

/// Decode a material buffer from the JS side, warning when it is short.
fn material_from_js(data: &[f64]) -> FakeGlowMaterial {
    if data.len() < PARAMS_LEN {
        warn!(
            "Material buffer has {} of {} parameter values; using defaults for the rest",
            data.len(),
            PARAMS_LEN
        );
    }
    let material = FakeGlowMaterial::from_buffer(data);
    debug!(
        "Material: tone mapping {}, guard {:?}",
        material.tone_mapping.name(),
        material.fresnel_guard
    );
    material
}

/// Transform object-space attribute buffers into world space.
fn to_world_space(model: &Matrix4, positions: &[f64], normals: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let count = (positions.len() / 3).min(normals.len() / 3);
    let mut world_positions = Vec::with_capacity(count * 3);
    let mut world_normals = Vec::with_capacity(count * 3);
    for i in 0..count {
        let p = math3d::mat4_transform_point(model, &Vec3D::from_slice(positions, i * 3));
        let n = math3d::mat4_transform_direction(model, &Vec3D::from_slice(normals, i * 3));
        world_positions.extend_from_slice(&[p.x, p.y, p.z]);
        world_normals.extend_from_slice(&[n.x, n.y, n.z]);
    }
    (world_positions, world_normals)
}

fn tone_map_buffer<S: ToneMappingStrategy>(strategy: &S, colors: &[f64], exposure: f64, out: &mut [f64]) -> u32 {
    let mut written = 0u32;
    for (src, dst) in colors.chunks_exact(3).zip(out.chunks_exact_mut(3)) {
        let mapped = strategy.apply(&Rgb::new(src[0], src[1], src[2]), exposure);
        dst.copy_from_slice(&mapped.to_array());
        written += 1;
    }
    written
}

fn to_js_error(err: GlowError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Filmic operator backed by a JS function.
struct JsFilmicOperator<'a> {
    function: &'a Function,
}

impl FilmicOperator for JsFilmicOperator<'_> {
    fn tone_map(&self, linear: &Rgb) -> Rgb {
        let input = Float64Array::from(&linear.to_array()[..]);
        match self.function.call1(&JsValue::NULL, &input) {
            Ok(value) => {
                let out = Float64Array::new(&value).to_vec();
                if out.len() >= 3 {
                    Rgb::new(out[0], out[1], out[2])
                } else {
                    AcesFilmic.tone_map(linear)
                }
            }
            // A throwing host operator degrades to the built-in curve
            Err(_) => AcesFilmic.tone_map(linear),
        }
    }
}
