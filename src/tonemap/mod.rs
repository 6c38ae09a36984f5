/// Tone mapping strategies.
///
/// The glow evaluator hands its linear color to a `ToneMappingStrategy`.
/// Two strategies exist:
/// - `Delegated`: forwards to a host-provided filmic operator at a fixed
///   exposure of 1, ignoring the exposure parameter
/// - `SelfContained`: runs the ACES fit inline with a tunable exposure
///
/// Both saturate their output, so every channel lands in [0, 1].

pub mod aces;

use serde::{Deserialize, Serialize};

use crate::engine::types::Rgb;
use crate::error::GlowError;
use crate::math::utils;

/// Maps a linear color to a display color in [0, 1]^3.
pub trait ToneMappingStrategy {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Tone-map `linear`. Strategies without exposure control ignore `exposure`.
    fn apply(&self, linear: &Rgb, exposure: f64) -> Rgb;
}

/// A host-side filmic tone-mapping primitive with its own fixed exposure.
pub trait FilmicOperator {
    fn tone_map(&self, linear: &Rgb) -> Rgb;
}

impl<F> FilmicOperator for F
where
    F: Fn(&Rgb) -> Rgb,
{
    fn tone_map(&self, linear: &Rgb) -> Rgb {
        self(linear)
    }
}

/// The standard ACES filmic operator most rendering hosts ship, at exposure 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcesFilmic;

impl FilmicOperator for AcesFilmic {
    fn tone_map(&self, linear: &Rgb) -> Rgb {
        aces::aces_filmic(linear, 1.0)
    }
}

/// Delegates to a host operator. The exposure argument is ignored.
#[derive(Clone, Debug, Default)]
pub struct Delegated<O: FilmicOperator = AcesFilmic> {
    operator: O,
}

impl<O: FilmicOperator> Delegated<O> {
    pub fn new(operator: O) -> Self {
        Self { operator }
    }
}

impl<O: FilmicOperator> ToneMappingStrategy for Delegated<O> {
    fn name(&self) -> &str {
        "delegated"
    }

    fn apply(&self, linear: &Rgb, _exposure: f64) -> Rgb {
        // Host output is not trusted to honour the [0, 1] contract
        utils::saturate_rgb(&self.operator.tone_map(linear))
    }
}

/// Inline ACES fit with exposure control.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelfContained;

impl ToneMappingStrategy for SelfContained {
    fn name(&self) -> &str {
        "self-contained"
    }

    fn apply(&self, linear: &Rgb, exposure: f64) -> Rgb {
        aces::aces_filmic(linear, exposure)
    }
}

/// Runtime strategy selection, stored per material instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToneMapping {
    /// Built-in host ACES operator, exposure fixed at 1.
    Delegated,
    #[default]
    SelfContained,
}

impl ToneMapping {
    /// Lenient decode used by the flat buffer path; unknown ids fall back to the default.
    pub fn from_id(id: u32) -> Self {
        Self::try_from(id).unwrap_or_default()
    }

    pub fn id(&self) -> u32 {
        match self {
            ToneMapping::Delegated => 0,
            ToneMapping::SelfContained => 1,
        }
    }
}

impl TryFrom<u32> for ToneMapping {
    type Error = GlowError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(ToneMapping::Delegated),
            1 => Ok(ToneMapping::SelfContained),
            other => Err(GlowError::UnknownToneMapping(other)),
        }
    }
}

impl ToneMappingStrategy for ToneMapping {
    fn name(&self) -> &str {
        match self {
            ToneMapping::Delegated => "delegated",
            ToneMapping::SelfContained => "self-contained",
        }
    }

    fn apply(&self, linear: &Rgb, exposure: f64) -> Rgb {
        match self {
            ToneMapping::Delegated => Delegated::new(AcesFilmic).apply(linear, exposure),
            ToneMapping::SelfContained => SelfContained.apply(linear, exposure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_colors() -> Vec<Rgb> {
        let mut out = Vec::new();
        for &r in &[0.0, 0.1, 0.5, 1.0, 3.0] {
            for &g in &[0.0, 0.25, 1.0] {
                for &b in &[0.0, 0.75, 8.0] {
                    out.push(Rgb::new(r, g, b));
                }
            }
        }
        out
    }

    #[test]
    fn test_strategies_agree_at_unit_exposure() {
        let delegated = Delegated::<AcesFilmic>::default();
        for c in sample_colors() {
            let a = delegated.apply(&c, 1.0);
            let b = SelfContained.apply(&c, 1.0);
            for (x, y) in a.to_array().iter().zip(b.to_array()) {
                assert!((x - y).abs() < 1e-9, "{c:?}: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_delegated_ignores_exposure() {
        let delegated = Delegated::<AcesFilmic>::default();
        let c = Rgb::new(0.4, 0.2, 0.9);
        assert_eq!(delegated.apply(&c, 1.0), delegated.apply(&c, 3.5));
        assert_ne!(SelfContained.apply(&c, 1.0), SelfContained.apply(&c, 3.5));
    }

    #[test]
    fn test_delegated_saturates_host_output() {
        let wild = Delegated::new(|c: &Rgb| c.scale(10.0));
        let out = wild.apply(&Rgb::new(0.5, -1.0, f64::NAN), 1.0);
        assert_eq!(out, Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_outputs_in_unit_cube() {
        for c in sample_colors() {
            for &exposure in &[0.0, 0.6, 1.0, 2.5] {
                for strategy in [ToneMapping::Delegated, ToneMapping::SelfContained] {
                    let out = strategy.apply(&c, exposure);
                    for ch in out.to_array() {
                        assert!((0.0..=1.0).contains(&ch));
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_exposure_is_black() {
        let out = SelfContained.apply(&Rgb::new(5.0, 5.0, 5.0), 0.0);
        assert_eq!(out, Rgb::BLACK);
    }

    #[test]
    fn test_tone_mapping_ids() {
        assert_eq!(ToneMapping::from_id(0), ToneMapping::Delegated);
        assert_eq!(ToneMapping::from_id(1), ToneMapping::SelfContained);
        assert_eq!(ToneMapping::from_id(99), ToneMapping::SelfContained);
        assert!(ToneMapping::try_from(7).is_err());
        assert_eq!(ToneMapping::from_id(ToneMapping::Delegated.id()), ToneMapping::Delegated);
    }
}
