#![doc = include_str!("../README.md")]

/// The bread-and-butter, shrink-wrapped and ready to use
pub mod prelude {
    pub use crate::Error;
    pub use crate::coordinate::*;
    pub use crate::field::*;
    pub use crate::io;
    pub use crate::kernel::Component;
    pub use crate::math::quadrature::Tolerance;
}

/// Extended prelude for driving the kernels and the quadrature engine directly
pub mod authoring {
    pub use crate::prelude::*;

    pub use crate::kernel::Kernels;
    pub use crate::math::gausskronrod::GRID;
    pub use crate::math::gausskronrod::NodeGrid;
    pub use crate::math::quadrature::integrate;

    // External material
    pub use log::debug;
    pub use log::error;
    pub use log::info;
    pub use log::trace;
    pub use log::warn;
}

use thiserror::Error;
/// The *tessfield* error messaging enumeration
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] std::io::Error),

    #[error("General error: '{0}'")]
    General(&'static str),

    #[error("Invalid header (expected {expected:?}, found {found:?})")]
    InvalidHeader { expected: String, found: String },

    #[error("Invalid: {0}")]
    Invalid(String),
}

mod coordinate;
mod field;
pub mod io;
mod kernel;
mod math;

/// A small patch of crust and some places to observe it from,
/// for test composition
#[cfg(test)]
mod test_data {
    use crate::prelude::*;

    pub fn basalt_block() -> DensityTesseroid {
        DensityTesseroid {
            shape: Tesseroid::new(-1., 1., -1., 1., 6_378_000., 6_378_100.),
            density: 2670.,
        }
    }

    pub fn airborne_observer() -> Observer {
        Observer::new(0., 0., 6_388_100.)
    }

    pub fn offset_observer() -> Observer {
        Observer::new(0., 20., 6_388_100.)
    }
}
