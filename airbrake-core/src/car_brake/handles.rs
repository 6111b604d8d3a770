use super::*;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Read-only snapshot of a notched brake handle
pub struct BrakeHandle {
    /// Current notch
    pub actual: i32,
    pub maximum_notch: i32,
}

impl BrakeHandle {
    pub fn new(actual: i32, maximum_notch: i32) -> Self {
        Self {
            actual,
            maximum_notch,
        }
    }

    /// Fraction of a full service application demanded, within `[0, 1]`
    pub fn notch_ratio(&self) -> f64 {
        if self.maximum_notch <= 0 {
            return 0.0;
        }
        (self.actual as f64 / self.maximum_notch as f64).clamp(0.0, 1.0)
    }

    /// Ensures the handle has at least one notch
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.maximum_notch > 0,
            "{}\nbrake handle must have at least one notch",
            format_dbg!(self.maximum_notch)
        );
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Train-wide driver and safety-system inputs read by every car brake
pub struct TrainHandles {
    pub brake: BrakeHandle,
    /// True while the emergency brake is applied
    pub emergency_brake: bool,
    /// Reverser position, zero in neutral
    pub reverser: i32,
}

impl TrainHandles {
    pub fn new(brake: BrakeHandle, emergency_brake: bool, reverser: i32) -> Self {
        Self {
            brake,
            emergency_brake,
            reverser,
        }
    }
}

/// Position of the automatic air brake valve, read from the brake notch
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, IsVariant)]
pub enum AirBrakeHandleState {
    /// Equalizing reservoir recharges from the main reservoir
    Release,
    /// Equalizing reservoir is held
    Lap,
    /// Equalizing reservoir is reduced at the service rate
    Service,
}

impl From<&BrakeHandle> for AirBrakeHandleState {
    fn from(handle: &BrakeHandle) -> Self {
        match handle.actual {
            i32::MIN..=0 => Self::Release,
            1 => Self::Lap,
            _ => Self::Service,
        }
    }
}
