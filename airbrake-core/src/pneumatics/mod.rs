//! Reservoirs, pipes and the compressor that make up one vehicle's air
//! system, plus the rate limiter every pressure exchange goes through.

use crate::imports::*;

pub mod brake_cylinder;
pub mod compressor;
pub mod pipe;
pub mod rate;
pub mod reservoir;

pub use brake_cylinder::{AirSound, BrakeCylinder};
pub use compressor::{Compressor, CompressorSound, COMPRESSOR_RATE};
pub use pipe::{BrakePipe, StraightAirPipe, BRAKE_PIPE_LEAK_RATE};
pub use rate::{exceeds, get_rate, nominal_flow, TOLERANCE};
pub use reservoir::{AuxiliaryReservoir, EqualizingReservoir, MainReservoir, Reservoir};

#[cfg(test)]
mod tests;
