/// Shading parameters for the fake glow material.
///
/// Held by the material, read-only during a frame, freely mutated by the
/// host between frames. No value is range-checked: out-of-domain inputs
/// produce degenerate but bounded output thanks to the clamps downstream.

use serde::{Deserialize, Serialize};

use crate::engine::types::Rgb;
use crate::error::{GlowError, Result};
use crate::math::utils;

/// Number of f64 slots `ShadingParameters` occupies in a flat buffer.
pub const PARAMS_LEN: usize = 8;

/// Default glow tint, `#8039ea`.
pub const DEFAULT_GLOW_COLOR: Rgb = Rgb {
    r: 128.0 / 255.0,
    g: 57.0 / 255.0,
    b: 234.0 / 255.0,
};

/// Per-material glow parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingParameters {
    /// Upper smoothstep edge for the fresnel falloff, nominally (0, 1].
    pub falloff: f64,
    /// Base tint of the glow.
    #[serde(with = "glow_color_repr")]
    pub glow_color: Rgb,
    /// Maximum alpha, nominally [0, 1].
    pub opacity: f64,
    /// Shapes the fresnel exponent; larger values narrow the rim.
    pub glow_internal_radius: f64,
    /// Additive boost applied to the fresnel term, nominally [0, 1].
    pub glow_sharpness: f64,
    /// Exposure for the self-contained tone mapper only.
    pub tone_mapping_exposure: f64,
}

impl Default for ShadingParameters {
    fn default() -> Self {
        Self {
            falloff: 0.1,
            glow_color: DEFAULT_GLOW_COLOR,
            opacity: 1.0,
            glow_internal_radius: 6.0,
            glow_sharpness: 0.5,
            tone_mapping_exposure: 1.0,
        }
    }
}

impl ShadingParameters {
    /// Set the glow tint from a CSS hex string. The previous color is kept on error.
    pub fn set_glow_color_hex(&mut self, hex: &str) -> Result<()> {
        self.glow_color = utils::parse_hex_color(hex)?;
        Ok(())
    }

    /// Set a scalar parameter by its control-surface name.
    pub fn set_scalar(&mut self, name: &str, value: f64) -> Result<()> {
        let slot = match name {
            "falloff" => &mut self.falloff,
            "opacity" => &mut self.opacity,
            "glow_internal_radius" => &mut self.glow_internal_radius,
            "glow_sharpness" => &mut self.glow_sharpness,
            "tone_mapping_exposure" => &mut self.tone_mapping_exposure,
            _ => return Err(GlowError::UnknownParameter(name.to_string())),
        };
        *slot = value;
        Ok(())
    }

    /// Read a scalar parameter by its control-surface name.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        match name {
            "falloff" => Some(self.falloff),
            "opacity" => Some(self.opacity),
            "glow_internal_radius" => Some(self.glow_internal_radius),
            "glow_sharpness" => Some(self.glow_sharpness),
            "tone_mapping_exposure" => Some(self.tone_mapping_exposure),
            _ => None,
        }
    }

    /// Flatten to the JS buffer layout:
    /// `[falloff, color_r, color_g, color_b, opacity, glow_internal_radius,
    ///   glow_sharpness, tone_mapping_exposure]`
    pub fn to_buffer(&self) -> [f64; PARAMS_LEN] {
        [
            self.falloff,
            self.glow_color.r,
            self.glow_color.g,
            self.glow_color.b,
            self.opacity,
            self.glow_internal_radius,
            self.glow_sharpness,
            self.tone_mapping_exposure,
        ]
    }

    /// Build from a flat buffer, keeping defaults for any missing trailing values.
    pub fn from_buffer(data: &[f64]) -> Self {
        let mut params = Self::default();
        let fields: [&mut f64; PARAMS_LEN] = [
            &mut params.falloff,
            &mut params.glow_color.r,
            &mut params.glow_color.g,
            &mut params.glow_color.b,
            &mut params.opacity,
            &mut params.glow_internal_radius,
            &mut params.glow_sharpness,
            &mut params.tone_mapping_exposure,
        ];
        for (slot, value) in fields.into_iter().zip(data) {
            *slot = *value;
        }
        params
    }

    /// Like `from_buffer`, but a short buffer is an error.
    pub fn try_from_buffer(data: &[f64]) -> Result<Self> {
        if data.len() < PARAMS_LEN {
            return Err(GlowError::BufferTooShort {
                what: "parameter",
                expected: PARAMS_LEN,
                actual: data.len(),
            });
        }
        Ok(Self::from_buffer(data))
    }
}

/// One numeric control on a settings panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Slider ranges for the numeric parameters. Advisory only.
pub const PARAMETER_DESCRIPTORS: &[ParameterDescriptor] = &[
    ParameterDescriptor { name: "falloff", label: "Falloff", min: 0.0, max: 1.0, step: 0.01 },
    ParameterDescriptor {
        name: "glow_internal_radius",
        label: "Glow Internal Radius",
        min: -10.0,
        max: 10.0,
        step: 0.01,
    },
    ParameterDescriptor { name: "glow_sharpness", label: "Glow Sharpness", min: 0.0, max: 1.0, step: 0.01 },
    ParameterDescriptor { name: "opacity", label: "Opacity", min: 0.0, max: 1.0, step: 0.01 },
    ParameterDescriptor {
        name: "tone_mapping_exposure",
        label: "Tone Mapping Exposure",
        min: 0.0,
        max: 4.0,
        step: 0.01,
    },
];

/// Look up the descriptor for a scalar parameter.
pub fn descriptor(name: &str) -> Option<&'static ParameterDescriptor> {
    PARAMETER_DESCRIPTORS.iter().find(|d| d.name == name)
}

/// `glow_color` is written as an `[r, g, b]` float array so HDR tints survive
/// a save. Presets may also give a CSS hex string.
mod glow_color_repr {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    use crate::engine::types::Rgb;
    use crate::math::utils;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ColorRepr {
        Channels([f64; 3]),
        Hex(String),
    }

    pub fn serialize<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        color.to_array().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Channels(channels) => Ok(Rgb::from(channels)),
            ColorRepr::Hex(hex) => utils::parse_hex_color(&hex).map_err(de::Error::custom),
        }
    }
}
