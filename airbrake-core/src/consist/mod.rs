//! Vehicles assembled into a train, the train-wide brake pipe and the
//! parameter set the brake system is built from.

use crate::car_brake::*;
use crate::imports::*;
use crate::pneumatics::*;

pub mod config;
pub mod consist_model;
pub mod vehicle;

pub use config::{BrakeSystemType, TrainBrakeConfig};
pub use consist_model::{Consist, PressureDistribution};
pub use vehicle::{Vehicle, VehicleOutput, VehicleState, VehicleStateHistoryVec};

#[cfg(test)]
mod tests;
