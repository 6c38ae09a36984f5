/// Fresnel glow evaluator.
///
/// Computes a view-dependent rim glow for one fragment:
///
/// ```text
/// fresnel   = dot(normalize(camera - position), normal) ^ (radius + 0.1)
/// weight    = smoothstep(0, falloff, fresnel)
/// intensity = (fresnel + fresnel * sharpness) * weight
/// alpha     = clamp(intensity, 0, opacity)
/// color     = tone_map(saturate(glow_color * fresnel), exposure)
/// ```
///
/// The evaluator is a pure function of its inputs. It holds no per-frame
/// state and can be shared across any number of worker threads.

use serde::{Deserialize, Serialize};

use super::fragment::{ColorResult, FragmentContext};
use super::params::ShadingParameters;
use crate::engine::types::Rgb;
use crate::math::{math3d, utils};
use crate::tonemap::{ToneMapping, ToneMappingStrategy};

/// Offset added to `glow_internal_radius`; a radius of 0 still shapes the rim.
pub const RADIUS_EXPONENT_OFFSET: f64 = 0.1;

/// What to do with the cosine term before exponentiation.
///
/// Surfaces facing away from the camera give a negative cosine, and a
/// negative base raised to a non-integer power is NaN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FresnelGuard {
    /// Clamp the cosine into [0, 1] first. Away-facing fragments get no glow.
    #[default]
    Clamped,
    /// Raise the raw cosine. Away-facing fragments produce NaN, matching
    /// the unguarded shader bit for bit.
    Unguarded,
}

impl FresnelGuard {
    pub fn from_id(id: u32) -> Self {
        match id {
            1 => FresnelGuard::Unguarded,
            _ => FresnelGuard::Clamped,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            FresnelGuard::Clamped => 0,
            FresnelGuard::Unguarded => 1,
        }
    }
}

/// Intermediate scalar terms of one evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowTerms {
    /// Shaped fresnel term
    pub fresnel: f64,
    /// smoothstep(0, falloff, fresnel)
    pub falloff_weight: f64,
    /// Glow intensity before the opacity clamp
    pub intensity: f64,
}

/// Glow evaluator parameterized by its tone-mapping strategy.
#[derive(Clone, Debug, Default)]
pub struct FresnelGlowEvaluator<S: ToneMappingStrategy = ToneMapping> {
    tone_mapper: S,
    guard: FresnelGuard,
}

impl<S: ToneMappingStrategy> FresnelGlowEvaluator<S> {
    pub fn new(tone_mapper: S) -> Self {
        Self {
            tone_mapper,
            guard: FresnelGuard::default(),
        }
    }

    pub fn with_guard(mut self, guard: FresnelGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn guard(&self) -> FresnelGuard {
        self.guard
    }

    pub fn tone_mapper(&self) -> &S {
        &self.tone_mapper
    }

    /// Raw cosine between the view direction and the (facing) normal.
    #[inline]
    pub fn view_cosine(ctx: &FragmentContext) -> f64 {
        let view_dir = math3d::vec3d_normalized(&math3d::vec3d_sub(&ctx.camera_position, &ctx.position));
        math3d::vec3d_dot(&view_dir, &ctx.facing_normal())
    }

    /// Fresnel, falloff and intensity terms for a fragment.
    #[inline]
    pub fn terms(&self, params: &ShadingParameters, ctx: &FragmentContext) -> GlowTerms {
        let cosine = Self::view_cosine(ctx);
        let base = match self.guard {
            FresnelGuard::Clamped => utils::saturate(cosine),
            FresnelGuard::Unguarded => cosine,
        };

        let fresnel = base.powf(params.glow_internal_radius + RADIUS_EXPONENT_OFFSET);
        let falloff_weight = utils::smoothstep(0.0, params.falloff, fresnel);

        let mut intensity = fresnel;
        intensity += fresnel * params.glow_sharpness;
        intensity *= falloff_weight;

        GlowTerms { fresnel, falloff_weight, intensity }
    }

    /// Linear glow color before tone mapping, saturated to [0, 1].
    #[inline]
    pub fn linear_color(params: &ShadingParameters, terms: &GlowTerms) -> Rgb {
        utils::saturate_rgb(&params.glow_color.scale(terms.fresnel))
    }

    /// Shade one fragment.
    #[inline]
    pub fn evaluate(&self, params: &ShadingParameters, ctx: &FragmentContext) -> ColorResult {
        let terms = self.terms(params, ctx);
        let alpha = utils::clamp(terms.intensity, 0.0, params.opacity);
        let linear = Self::linear_color(params, &terms);
        let color = self.tone_mapper.apply(&linear, params.tone_mapping_exposure);
        ColorResult { color, alpha }
    }
}
