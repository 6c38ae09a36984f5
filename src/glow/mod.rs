/// Fake glow shading.
///
/// Analytic rim glow computed per fragment from view and normal geometry:
/// - `params`: the material's tunable parameter set
/// - `fragment`: per-fragment inputs and the shaded result
/// - `evaluator`: the fresnel/falloff shaping and tone-mapping hand-off
/// - `shared`: frame-granular parameter hand-off from a control thread

pub mod evaluator;
pub mod fragment;
pub mod params;
pub mod shared;

pub use evaluator::{FresnelGlowEvaluator, FresnelGuard, GlowTerms};
pub use fragment::{ColorResult, FragmentContext};
pub use params::{ParameterDescriptor, ShadingParameters, PARAMETER_DESCRIPTORS};
pub use shared::{FrameParameters, SharedParameters};
