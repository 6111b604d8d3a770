//! Import uom si system and add unit constants
//! Zero values should be created using standard uom syntax ($Quantity::ZERO) after adding "use crate::imports::*"
//! Non-zero values should be created using standard uom syntax ($Quantity::new::<$unit>($value)) or multiplication syntax ($value * $UNIT_CONSTANT)

use uom::si;

pub use si::acceleration::meter_per_second_squared;
pub use si::f64::{Acceleration, Pressure, Ratio, Time, Velocity, Volume};
pub use si::pressure::{kilopascal, pascal};
pub use si::ratio::ratio;
pub use si::time::second;
pub use si::velocity::{kilometer_per_hour, meter_per_second};
pub use si::volume::cubic_meter;
