use super::reservoir::check_non_negative;
use super::*;

/// Release cue emitted when brake cylinder pressure is exhausted
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, IsVariant)]
pub enum AirSound {
    /// Released all the way to zero
    Zero,
    /// Partial release
    Low,
    /// Release from the emergency maximum
    High,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Actuator whose pressure becomes braking force
pub struct BrakeCylinder {
    pub current_pressure: si::Pressure,
    /// Pressure reached by a full service application
    pub service_maximum_pressure: si::Pressure,
    /// Pressure reached by an emergency application, and upper bound
    pub emergency_maximum_pressure: si::Pressure,
    /// Fill rate for service applications, Pa/s
    pub service_charge_rate: f64,
    /// Fill rate for emergency applications, Pa/s
    pub emergency_charge_rate: f64,
    /// Exhaust rate, Pa/s
    pub release_rate: f64,
    /// Pressure at which the last [AirSound] was emitted.  Reset to the
    /// emergency maximum whenever the cylinder fills or holds, so that only
    /// the first release tick below it emits a cue.
    pub sound_played_for_pressure: si::Pressure,
    pub volume: si::Volume,
}

impl BrakeCylinder {
    /// Builds a released brake cylinder
    pub fn new(
        service_maximum_pressure: si::Pressure,
        emergency_maximum_pressure: si::Pressure,
        service_charge_rate: f64,
        emergency_charge_rate: f64,
        release_rate: f64,
    ) -> Result<Self, Error> {
        let mut bc = Self {
            current_pressure: si::Pressure::ZERO,
            service_maximum_pressure,
            emergency_maximum_pressure,
            service_charge_rate,
            emergency_charge_rate,
            release_rate,
            sound_played_for_pressure: emergency_maximum_pressure,
            volume: 0.01 * uc::M3,
        };
        bc.init()?;
        Ok(bc)
    }

    /// Current pressure as a fraction of the service maximum
    pub fn pressure_ratio(&self) -> f64 {
        self.current_pressure.ratio_to(self.service_maximum_pressure)
    }

    /// Fill rate for the application type, Pa/s
    pub fn charge_rate(&self, emergency: bool) -> f64 {
        if emergency {
            self.emergency_charge_rate
        } else {
            self.service_charge_rate
        }
    }

    /// Exhausts the cylinder to atmosphere toward `target` without
    /// undershooting it, returning a cue the first time pressure drops below
    /// [Self::sound_played_for_pressure]
    pub fn release_toward(&mut self, target: si::Pressure, dt: si::Time) -> Option<AirSound> {
        let d = (self.current_pressure - target).max(si::Pressure::ZERO);
        let r = get_rate(
            d.ratio_to(self.emergency_maximum_pressure),
            nominal_flow(self.release_rate, dt),
        )
        .min(d);
        let cue = self.release_cue(r, target);
        self.add_pressure(-r);
        cue
    }

    /// Emits a cue if `released` is a real release below the last cue
    /// pressure, moving the cue pressure to `next_threshold`
    pub fn release_cue(
        &mut self,
        released: si::Pressure,
        next_threshold: si::Pressure,
    ) -> Option<AirSound> {
        if released > si::Pressure::ZERO && self.current_pressure < self.sound_played_for_pressure
        {
            self.sound_played_for_pressure = next_threshold;
            Some(if next_threshold < TOLERANCE {
                AirSound::Zero
            } else if self.current_pressure > self.emergency_maximum_pressure - TOLERANCE {
                AirSound::High
            } else {
                AirSound::Low
            })
        } else {
            None
        }
    }

    /// Re-arms the release cue after filling or holding
    pub fn rearm_sound(&mut self) {
        self.sound_played_for_pressure = self.emergency_maximum_pressure;
    }
}

impl Init for BrakeCylinder {
    fn init(&mut self) -> Result<(), Error> {
        init_ensure!(
            self.service_maximum_pressure > si::Pressure::ZERO,
            "{}\n`service_maximum_pressure` must be positive",
            format_dbg!(self.service_maximum_pressure)
        );
        init_ensure!(
            self.service_maximum_pressure <= self.emergency_maximum_pressure,
            "{}\n`service_maximum_pressure` must not exceed `emergency_maximum_pressure`",
            format_dbg!((
                self.service_maximum_pressure,
                self.emergency_maximum_pressure
            ))
        );
        check_non_negative("service_charge_rate", self.service_charge_rate)?;
        check_non_negative("emergency_charge_rate", self.emergency_charge_rate)?;
        check_non_negative("release_rate", self.release_rate)?;
        init_ensure!(
            self.is_within_bounds(),
            "{}\n`current_pressure` must lie within [0, emergency_maximum_pressure]",
            format_dbg!(self.current_pressure)
        );
        Ok(())
    }
}
impl SerdeAPI for BrakeCylinder {}
