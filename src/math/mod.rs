/// Math support for the shading pass.

pub mod math3d;
pub mod utils;
