use super::*;

/// A sealed volume whose pressure is held within
/// `[lower_bound, upper_bound]`.
pub trait Reservoir {
    fn pressure(&self) -> si::Pressure;

    /// Highest pressure the component can hold
    fn upper_bound(&self) -> si::Pressure;

    /// Lowest pressure the component can hold
    fn lower_bound(&self) -> si::Pressure {
        si::Pressure::ZERO
    }

    fn volume(&self) -> si::Volume;

    /// Sets the pressure, clamped into bounds
    fn set_pressure(&mut self, pressure: si::Pressure);

    fn add_pressure(&mut self, delta: si::Pressure) {
        self.set_pressure(self.pressure() + delta)
    }

    /// Pressure that can still be added before reaching the upper bound
    fn headroom(&self) -> si::Pressure {
        (self.upper_bound() - self.pressure()).max(si::Pressure::ZERO)
    }

    fn is_within_bounds(&self) -> bool {
        self.pressure() >= self.lower_bound() && self.pressure() <= self.upper_bound()
    }

    /// Free air volume at atmospheric pressure.  Diagnostics only.
    fn air_volume(&self) -> si::Volume {
        self.volume() * self.pressure().ratio_to(uc::ATMOSPHERE)
    }
}

#[duplicate_item(
    ReservoirType          upper;
    [MainReservoir]        [maximum_pressure];
    [AuxiliaryReservoir]   [maximum_pressure];
    [EqualizingReservoir]  [normal_pressure];
    [BrakePipe]            [normal_pressure];
    [BrakeCylinder]        [emergency_maximum_pressure];
)]
impl Reservoir for ReservoirType {
    fn pressure(&self) -> si::Pressure {
        self.current_pressure
    }

    fn upper_bound(&self) -> si::Pressure {
        self.upper
    }

    fn volume(&self) -> si::Volume {
        self.volume
    }

    fn set_pressure(&mut self, pressure: si::Pressure) {
        self.current_pressure = pressure.clamp_within(si::Pressure::ZERO, self.upper);
    }
}

/// Checks the fields every reservoir shares
fn check_reservoir<R: Reservoir + fmt::Debug>(reservoir: &R) -> Result<(), Error> {
    init_ensure!(
        reservoir.upper_bound() > si::Pressure::ZERO,
        "{}\nupper pressure bound must be positive",
        format_dbg!(reservoir)
    );
    init_ensure!(
        reservoir.is_within_bounds(),
        "{}\ncurrent pressure must lie within [{:?}, {:?}]",
        format_dbg!(reservoir.pressure()),
        reservoir.lower_bound(),
        reservoir.upper_bound()
    );
    init_ensure!(
        reservoir.volume() > si::Volume::ZERO,
        "{}\nvolume must be positive",
        format_dbg!(reservoir.volume())
    );
    Ok(())
}

/// Checks that a rate or coefficient is finite and not negative
pub(crate) fn check_non_negative(name: &str, value: f64) -> Result<(), Error> {
    init_ensure!(
        value.is_finite() && value >= 0.0,
        "{}\n`{name}` must be finite and non-negative",
        format_dbg!(value)
    );
    Ok(())
}

/// Checks that a coefficient used as a divisor is finite and positive
pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), Error> {
    init_ensure!(
        value.is_finite() && value > 0.0,
        "{}\n`{name}` must be finite and positive",
        format_dbg!(value)
    );
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Reservoir refilled by the compressor.  Supplies the equalizing
/// reservoir, the brake pipe and, on electric command cars, the brake
/// cylinder.
pub struct MainReservoir {
    /// Compressor cut-in pressure
    pub minimum_pressure: si::Pressure,
    /// Compressor cut-out pressure and upper bound
    pub maximum_pressure: si::Pressure,
    pub current_pressure: si::Pressure,
    /// Main reservoir draw per unit of equalizing reservoir gain
    pub equalizing_reservoir_coefficient: f64,
    /// Main reservoir draw per unit of brake pipe gain
    pub brake_pipe_coefficient: f64,
    pub volume: si::Volume,
}

impl MainReservoir {
    /// Builds a main reservoir whose starting pressure is drawn uniformly from
    /// `[minimum, maximum]`, as if the compressor had already been running.
    pub fn new<R: Rng + ?Sized>(
        minimum: si::Pressure,
        maximum: si::Pressure,
        equalizing_reservoir_coefficient: f64,
        brake_pipe_coefficient: f64,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let mut mr = Self::with_pressure(
            minimum,
            maximum,
            equalizing_reservoir_coefficient,
            brake_pipe_coefficient,
            maximum,
        )?;
        mr.current_pressure = rng
            .gen_range(minimum.get::<si::pascal>()..=maximum.get::<si::pascal>())
            * uc::PASCAL;
        Ok(mr)
    }

    /// Builds a main reservoir holding an externally supplied pressure
    pub fn with_pressure(
        minimum: si::Pressure,
        maximum: si::Pressure,
        equalizing_reservoir_coefficient: f64,
        brake_pipe_coefficient: f64,
        current: si::Pressure,
    ) -> Result<Self, Error> {
        let mut mr = Self {
            minimum_pressure: minimum,
            maximum_pressure: maximum,
            current_pressure: current,
            equalizing_reservoir_coefficient,
            brake_pipe_coefficient,
            volume: 0.5 * uc::M3,
        };
        mr.init()?;
        Ok(mr)
    }

    /// True when the pressure has dropped below the compressor cut-in
    pub fn needs_charge(&self) -> bool {
        self.current_pressure < self.minimum_pressure
    }
}

impl Init for MainReservoir {
    fn init(&mut self) -> Result<(), Error> {
        init_ensure!(
            self.minimum_pressure >= si::Pressure::ZERO,
            "{}\n`minimum_pressure` must not be negative",
            format_dbg!(self.minimum_pressure)
        );
        init_ensure!(
            self.minimum_pressure <= self.maximum_pressure,
            "{}\n`minimum_pressure` must not exceed `maximum_pressure`",
            format_dbg!((self.minimum_pressure, self.maximum_pressure))
        );
        check_non_negative(
            "equalizing_reservoir_coefficient",
            self.equalizing_reservoir_coefficient,
        )?;
        check_non_negative("brake_pipe_coefficient", self.brake_pipe_coefficient)?;
        check_reservoir(self)
    }
}
impl SerdeAPI for MainReservoir {}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Per-car store of air charged from the brake pipe and discharged into the
/// brake cylinder
pub struct AuxiliaryReservoir {
    pub maximum_pressure: si::Pressure,
    pub current_pressure: si::Pressure,
    /// Charge rate from the brake pipe, Pa/s
    pub charge_rate: f64,
    /// Brake pipe draw is the auxiliary reservoir gain divided by this
    pub brake_pipe_coefficient: f64,
    /// Brake cylinder gain is the auxiliary reservoir draw divided by this
    pub brake_cylinder_coefficient: f64,
    pub volume: si::Volume,
}

impl AuxiliaryReservoir {
    /// Builds a fully charged auxiliary reservoir
    pub fn new(
        maximum: si::Pressure,
        charge_rate: f64,
        brake_pipe_coefficient: f64,
        brake_cylinder_coefficient: f64,
    ) -> Result<Self, Error> {
        let mut aux = Self {
            maximum_pressure: maximum,
            current_pressure: maximum,
            charge_rate,
            brake_pipe_coefficient,
            brake_cylinder_coefficient,
            volume: 0.1 * uc::M3,
        };
        aux.init()?;
        Ok(aux)
    }
}

impl Init for AuxiliaryReservoir {
    fn init(&mut self) -> Result<(), Error> {
        check_non_negative("charge_rate", self.charge_rate)?;
        check_positive("brake_pipe_coefficient", self.brake_pipe_coefficient)?;
        check_positive(
            "brake_cylinder_coefficient",
            self.brake_cylinder_coefficient,
        )?;
        check_reservoir(self)
    }
}
impl SerdeAPI for AuxiliaryReservoir {}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Small reservoir set by the driver's brake valve.  The brake pipe on the
/// lead car follows its pressure.
pub struct EqualizingReservoir {
    /// Equilibrium pressure and upper bound
    pub normal_pressure: si::Pressure,
    pub current_pressure: si::Pressure,
    /// Reduction rate for a service application, Pa/s
    pub service_rate: f64,
    /// Reduction rate for an emergency application, Pa/s
    pub emergency_rate: f64,
    /// Charge rate from the main reservoir, Pa/s
    pub charge_rate: f64,
    pub volume: si::Volume,
}

impl EqualizingReservoir {
    /// Builds an equalizing reservoir charged to `normal_pressure`
    pub fn new(
        service_rate: f64,
        emergency_rate: f64,
        charge_rate: f64,
        normal_pressure: si::Pressure,
    ) -> Result<Self, Error> {
        let mut er = Self {
            normal_pressure,
            current_pressure: normal_pressure,
            service_rate,
            emergency_rate,
            charge_rate,
            volume: 0.015 * uc::M3,
        };
        er.init()?;
        Ok(er)
    }
}

impl Init for EqualizingReservoir {
    fn init(&mut self) -> Result<(), Error> {
        check_non_negative("service_rate", self.service_rate)?;
        check_non_negative("emergency_rate", self.emergency_rate)?;
        check_non_negative("charge_rate", self.charge_rate)?;
        check_reservoir(self)
    }
}
impl SerdeAPI for EqualizingReservoir {}
