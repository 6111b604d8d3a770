use super::reservoir::check_non_negative;
use super::*;

/// Rate at which a broken brake pipe vents, Pa/s
pub const BRAKE_PIPE_LEAK_RATE: f64 = 500_000.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Conduit running the length of the train.  On automatic and vacuum brakes
/// a drop in its pressure is the brake application signal.
pub struct BrakePipe {
    /// Fully charged pressure and upper bound
    pub normal_pressure: si::Pressure,
    pub current_pressure: si::Pressure,
    /// Charge rate from the main reservoir, Pa/s
    pub charge_rate: f64,
    /// Exhaust rate for a service application, Pa/s
    pub service_rate: f64,
    /// Exhaust rate for an emergency application, Pa/s
    pub emergency_rate: f64,
    /// Rate at which the pipe vents where the train has come apart, Pa/s
    pub leak_rate: f64,
    pub volume: si::Volume,
}

impl BrakePipe {
    /// Builds a brake pipe.  Electrically commanded brakes do not use the
    /// pipe as a control signal, so it starts empty for them.
    pub fn new(
        normal_pressure: si::Pressure,
        charge_rate: f64,
        service_rate: f64,
        emergency_rate: f64,
        electric_command: bool,
    ) -> Result<Self, Error> {
        let mut bp = Self {
            normal_pressure,
            current_pressure: if electric_command {
                si::Pressure::ZERO
            } else {
                normal_pressure
            },
            charge_rate,
            service_rate,
            emergency_rate,
            leak_rate: BRAKE_PIPE_LEAK_RATE,
            volume: 0.02 * uc::M3,
        };
        bp.init()?;
        Ok(bp)
    }

    /// Vents the pipe at [Self::leak_rate] for `dt`
    pub fn leak(&mut self, dt: si::Time) {
        self.add_pressure(-nominal_flow(self.leak_rate, dt));
    }
}

impl Init for BrakePipe {
    fn init(&mut self) -> Result<(), Error> {
        check_non_negative("charge_rate", self.charge_rate)?;
        check_non_negative("service_rate", self.service_rate)?;
        check_non_negative("emergency_rate", self.emergency_rate)?;
        check_non_negative("leak_rate", self.leak_rate)?;
        init_ensure!(
            self.normal_pressure > si::Pressure::ZERO,
            "{}\n`normal_pressure` must be positive",
            format_dbg!(self.normal_pressure)
        );
        init_ensure!(
            self.is_within_bounds(),
            "{}\n`current_pressure` must lie within [0, normal_pressure]",
            format_dbg!(self.current_pressure)
        );
        Ok(())
    }
}
impl SerdeAPI for BrakePipe {}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Command conduit of electropneumatic brakes.  Its pressure mirrors the
/// driver's demand.
pub struct StraightAirPipe {
    pub current_pressure: si::Pressure,
    /// Rise rate, Pa/s
    pub service_rate: f64,
    /// Fall rate under emergency, Pa/s
    pub emergency_rate: f64,
    /// Fall rate on release, Pa/s
    pub release_rate: f64,
}

impl StraightAirPipe {
    pub fn new(service_rate: f64, emergency_rate: f64, release_rate: f64) -> Result<Self, Error> {
        let mut sap = Self {
            current_pressure: si::Pressure::ZERO,
            service_rate,
            emergency_rate,
            release_rate,
        };
        sap.init()?;
        Ok(sap)
    }

    /// Moves the pipe pressure toward `target` without overshooting it.
    ///
    /// # Arguments
    /// - `target`: demanded pressure
    /// - `emergency`: falls at [Self::emergency_rate] rather than [Self::release_rate]
    /// - `reference`: pressure that normalizes the differential
    /// - `dt`: time step size
    pub fn drive_toward(
        &mut self,
        target: si::Pressure,
        emergency: bool,
        reference: si::Pressure,
        dt: si::Time,
    ) {
        if exceeds(self.current_pressure, target) {
            let rate = if emergency {
                self.emergency_rate
            } else {
                self.release_rate
            };
            let d = self.current_pressure - target;
            let r = get_rate(d.ratio_to(reference), nominal_flow(rate, dt)).min(d);
            self.current_pressure -= r;
        } else if exceeds(target, self.current_pressure) {
            let d = target - self.current_pressure;
            let r = get_rate(d.ratio_to(reference), nominal_flow(self.service_rate, dt)).min(d);
            self.current_pressure += r;
        }
        self.current_pressure = self.current_pressure.max(si::Pressure::ZERO);
    }
}

impl Init for StraightAirPipe {
    fn init(&mut self) -> Result<(), Error> {
        check_non_negative("service_rate", self.service_rate)?;
        check_non_negative("emergency_rate", self.emergency_rate)?;
        check_non_negative("release_rate", self.release_rate)?;
        init_ensure!(
            self.current_pressure >= si::Pressure::ZERO,
            "{}\n`current_pressure` must not be negative",
            format_dbg!(self.current_pressure)
        );
        Ok(())
    }
}
impl SerdeAPI for StraightAirPipe {}
