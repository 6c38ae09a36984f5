/// ACES filmic fit.
///
/// The fitted RRT+ODT curve wrapped by the sRGB→AP1 input transform and the
/// AP1→sRGB output transform. Matrices are built from column vectors the way
/// shader sources write them and applied as `M * column-vector`, so each
/// listed row of the usual printed form is a row of the stored matrix.

use crate::engine::types::{Matrix3, Rgb};
use crate::math::{math3d, utils};

/// Mid-gray calibration divisor: an exposure of 0.6 leaves the input unscaled.
pub const EXPOSURE_CALIBRATION: f64 = 0.6;

/// sRGB → AP1 (with RRT saturation folded in).
pub const ACES_INPUT_MAT: Matrix3 = math3d::mat3_from_columns(
    [0.59719, 0.07600, 0.02840],
    [0.35458, 0.90834, 0.13383],
    [0.04823, 0.01566, 0.83777],
);

/// AP1 → sRGB (with ODT saturation folded in).
pub const ACES_OUTPUT_MAT: Matrix3 = math3d::mat3_from_columns(
    [1.60475, -0.10208, -0.00327],
    [-0.53108, 1.10813, -0.07276],
    [-0.07367, -0.00605, 1.07602],
);

/// Rational approximation of the RRT and ODT, per channel.
#[inline(always)]
pub fn rrt_and_odt_fit(v: f64) -> f64 {
    let a = v * (v + 0.0245786) - 0.000090537;
    let b = v * (0.983729 * v + 0.4329510) + 0.238081;
    a / b
}

/// Full ACES filmic transform with an exposure multiplier.
///
/// The output is saturated to [0, 1].
pub fn aces_filmic(color: &Rgb, exposure: f64) -> Rgb {
    let scaled = color.scale(exposure / EXPOSURE_CALIBRATION).to_vec3();
    let ap1 = math3d::mat3_mul_vec(&ACES_INPUT_MAT, &scaled);
    let fitted = Rgb::from_vec3(&ap1).map(rrt_and_odt_fit);
    let out = math3d::mat3_mul_vec(&ACES_OUTPUT_MAT, &fitted.to_vec3());
    utils::saturate_rgb(&Rgb::from_vec3(&out))
}
