/// The fake glow material.
///
/// Bundles the shading parameters with the per-instance choices that are
/// not per-frame tunables: which tone-mapping strategy to run and how to
/// treat away-facing fragments. Also describes how the host must blend the
/// output into the frame.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::glow::{ColorResult, FragmentContext, FresnelGlowEvaluator, FresnelGuard, ShadingParameters};
use crate::glow::params::PARAMS_LEN;
use crate::tonemap::ToneMapping;

/// Number of f64 slots a material occupies in a flat buffer.
pub const MATERIAL_BUFFER_LEN: usize = PARAMS_LEN + 2;

/// How the shaded fragment combines with the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// `dst += src.rgb * src.a`
    Additive,
}

/// Pipeline state the host must apply when drawing with this material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendState {
    pub mode: BlendMode,
    /// Glow is drawn over everything; fragments behind geometry are not discarded.
    pub depth_test: bool,
    pub transparent: bool,
}

impl BlendState {
    pub const GLOW: BlendState = BlendState {
        mode: BlendMode::Additive,
        depth_test: false,
        transparent: true,
    };
}

/// A configured glow material instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FakeGlowMaterial {
    pub tone_mapping: ToneMapping,
    pub fresnel_guard: FresnelGuard,
    pub params: ShadingParameters,
}

impl FakeGlowMaterial {
    pub fn new(params: ShadingParameters) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn with_tone_mapping(mut self, tone_mapping: ToneMapping) -> Self {
        self.tone_mapping = tone_mapping;
        self
    }

    pub fn with_fresnel_guard(mut self, guard: FresnelGuard) -> Self {
        self.fresnel_guard = guard;
        self
    }

    pub fn blend_state(&self) -> BlendState {
        BlendState::GLOW
    }

    /// Evaluator configured for this instance. Cheap; build one per frame or batch.
    pub fn evaluator(&self) -> FresnelGlowEvaluator<ToneMapping> {
        FresnelGlowEvaluator::new(self.tone_mapping).with_guard(self.fresnel_guard)
    }

    /// Shade a single fragment with the current parameters.
    pub fn evaluate(&self, ctx: &FragmentContext) -> ColorResult {
        self.evaluator().evaluate(&self.params, ctx)
    }

    /// Load a TOML preset. Missing keys keep their defaults.
    ///
    /// ```toml
    /// tone_mapping = "self-contained"
    /// fresnel_guard = "clamped"
    ///
    /// [params]
    /// falloff = 0.1
    /// glow_color = "#8039ea"   # or [0.5, 0.22, 0.92]
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let material: FakeGlowMaterial = toml::from_str(source)?;
        debug!(
            "Loaded glow preset: tone mapping {:?}, guard {:?}",
            material.tone_mapping, material.fresnel_guard
        );
        Ok(material)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Flat buffer layout: the parameter block followed by
    /// `[tone_mapping_id, fresnel_guard_id]`.
    pub fn to_buffer(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(MATERIAL_BUFFER_LEN);
        out.extend_from_slice(&self.params.to_buffer());
        out.push(self.tone_mapping.id() as f64);
        out.push(self.fresnel_guard.id() as f64);
        out
    }

    /// Build from a flat buffer; missing trailing values keep their defaults.
    pub fn from_buffer(data: &[f64]) -> Self {
        let mut material = Self::new(ShadingParameters::from_buffer(data));
        if let Some(&mode) = data.get(PARAMS_LEN) {
            material.tone_mapping = ToneMapping::from_id(mode as u32);
        }
        if let Some(&guard) = data.get(PARAMS_LEN + 1) {
            material.fresnel_guard = FresnelGuard::from_id(guard as u32);
        }
        material
    }
}
