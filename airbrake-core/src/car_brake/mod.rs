//! Per-car brake models.  Each brake type implements [CarBrakeTrait] and is
//! dispatched through [CarBrakeType].

use crate::imports::*;
use crate::pneumatics::*;

pub mod automatic_air_brake;
pub mod car_brake_model;
pub mod deceleration;
pub mod electric_command_brake;
pub mod electromagnetic_straight_air_brake;
pub mod electropneumatic;
pub mod handles;
pub(crate) mod valves;
pub mod vacuum_brake;

pub use automatic_air_brake::AutomaticAirBrake;
pub use car_brake_model::{BrakeOutput, BrakeType, CarBrakeTrait, CarBrakeType, StartMode};
pub(crate) use car_brake_model::{check_step, initialize_components};
pub use deceleration::{
    brake_deceleration, deceleration_at_service_maximum, DecelerationCurve,
};
pub(crate) use deceleration::check_curves;
pub use electric_command_brake::ElectricCommandBrake;
pub use electromagnetic_straight_air_brake::ElectromagneticStraightAirBrake;
pub use electropneumatic::{ElectropneumaticType, MotorBrake};
pub use handles::{AirBrakeHandleState, BrakeHandle, TrainHandles};
pub use vacuum_brake::VacuumBrake;
pub(crate) use valves::*;
