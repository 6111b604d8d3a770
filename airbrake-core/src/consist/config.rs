use super::*;

/// Brake system fitted to every car of a train
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, IsVariant)]
pub enum BrakeSystemType {
    AutomaticAirBrake,
    #[default]
    ElectromagneticStraightAirBrake,
    ElectricCommandBrake,
    VacuumBrake,
}

/// Brake cylinder pressure below which the 490 kPa operating pressure rule
/// applies
const LOW_CYLINDER_PRESSURE: f64 = 480_000.0;
/// Main reservoir cut-in above which the 490 kPa operating pressure rule
/// applies
const HIGH_MAIN_RESERVOIR_PRESSURE: f64 = 500_000.0;
const STANDARD_OPERATING_PRESSURE: f64 = 490_000.0;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Train-wide brake parameters, from which every car's pneumatic components
/// are derived
pub struct TrainBrakeConfig {
    pub brake_system: BrakeSystemType,
    pub brake_cylinder_service_maximum_pressure: si::Pressure,
    pub brake_cylinder_emergency_maximum_pressure: si::Pressure,
    /// Brake cylinder fill rate, Pa/s
    pub brake_cylinder_up: f64,
    /// Brake cylinder release rate, Pa/s
    pub brake_cylinder_down: f64,
    pub main_reservoir_minimum_pressure: si::Pressure,
    pub main_reservoir_maximum_pressure: si::Pressure,
    /// Brake pipe operating pressure; derived from the cylinder and main
    /// reservoir pressures if `None`
    pub brake_pipe_pressure: Option<si::Pressure>,
    pub electropneumatic_type: ElectropneumaticType,
    pub brake_control_speed: si::Velocity,
    /// Deceleration at service maximum pressure, one curve per notch
    pub deceleration_curves: Vec<DecelerationCurve>,
    /// Tractive acceleration, used to derive the motor deceleration
    pub maximum_acceleration: si::Acceleration,
    /// Motor deceleration at full brake; derived if `None`
    pub motor_deceleration: Option<si::Acceleration>,
    pub motor_deceleration_delay_up: si::Time,
    pub motor_deceleration_delay_down: si::Time,
    /// Notches of the brake handle, ignored by the automatic air brake whose
    /// handle has release, lap and service positions
    pub brake_notches: i32,
    /// One entry per car, true for motor cars
    pub motor_cars: Vec<bool>,
    /// Index of the car the train is driven from
    pub driver_car: usize,
    pub pressure_distribution: PressureDistribution,
    pub save_interval: Option<usize>,
}

impl Default for TrainBrakeConfig {
    fn default() -> Self {
        let file_contents = include_str!("../../resources/train_brake.default.yaml");
        Self::from_yaml(file_contents, false).unwrap()
    }
}

impl Init for TrainBrakeConfig {
    fn init(&mut self) -> Result<(), Error> {
        init_ensure!(
            !self.motor_cars.is_empty(),
            "{}\na train needs at least one car",
            format_dbg!()
        );
        init_ensure!(
            self.driver_car < self.motor_cars.len(),
            "{}\n`driver_car` must index a car",
            format_dbg!((self.driver_car, self.motor_cars.len()))
        );
        init_ensure!(
            self.brake_notches > 0,
            "{}\n`brake_notches` must be positive",
            format_dbg!(self.brake_notches)
        );
        init_ensure!(
            self.brake_cylinder_service_maximum_pressure
                <= self.brake_cylinder_emergency_maximum_pressure,
            "{}\nservice maximum must not exceed emergency maximum",
            format_dbg!((
                self.brake_cylinder_service_maximum_pressure,
                self.brake_cylinder_emergency_maximum_pressure
            ))
        );
        init_ensure!(
            self.main_reservoir_minimum_pressure <= self.main_reservoir_maximum_pressure,
            "{}\nmain reservoir minimum must not exceed maximum",
            format_dbg!((
                self.main_reservoir_minimum_pressure,
                self.main_reservoir_maximum_pressure
            ))
        );
        if let Some(p) = self.brake_pipe_pressure {
            init_ensure!(
                p > si::Pressure::ZERO,
                "{}\n`brake_pipe_pressure` must be positive",
                format_dbg!(p)
            );
        }
        check_curves(&mut self.deceleration_curves)
    }
}
impl SerdeAPI for TrainBrakeConfig {}

impl TrainBrakeConfig {
    pub fn n_cars(&self) -> usize {
        self.motor_cars.len()
    }

    /// Highest notch of the brake handle
    pub fn maximum_notch(&self) -> i32 {
        if self.brake_system.is_automatic_air_brake() {
            2
        } else {
            self.brake_notches
        }
    }

    /// Brake pipe pressure in normal running.  An explicit
    /// [Self::brake_pipe_pressure] wins; otherwise it sits three quarters of
    /// the way from the cylinder emergency maximum to the main reservoir
    /// cut-in, except that non-automatic brakes with low cylinder and high
    /// main reservoir pressures use 490 kPa.
    pub fn operating_pressure(&self) -> si::Pressure {
        if let Some(p) = self.brake_pipe_pressure {
            return p;
        }
        let emax = self.brake_cylinder_emergency_maximum_pressure;
        let mr_min = self.main_reservoir_minimum_pressure;
        let pressure = if !self.brake_system.is_automatic_air_brake()
            && emax < LOW_CYLINDER_PRESSURE * uc::PASCAL
            && mr_min > HIGH_MAIN_RESERVOIR_PRESSURE * uc::PASCAL
        {
            STANDARD_OPERATING_PRESSURE * uc::PASCAL
        } else {
            (emax + 0.75 * (mr_min - emax)).min(mr_min)
        };
        #[cfg(feature = "logging")]
        log::debug!(
            "derived brake pipe operating pressure {:.0} Pa",
            pressure.get::<si::pascal>()
        );
        pressure
    }

    /// Motor deceleration at full brake.  Derived as the geometric mean of
    /// the tractive acceleration and the first curve's deceleration at
    /// standstill when not given.
    pub fn motor_deceleration(&self) -> anyhow::Result<si::Acceleration> {
        if let Some(decel) = self.motor_deceleration {
            return Ok(decel);
        }
        let brake_decel = deceleration_at_service_maximum(
            &self.deceleration_curves,
            1,
            si::Velocity::ZERO,
        )?;
        Ok((self.maximum_acceleration.get::<si::meter_per_second_squared>()
            * brake_decel.get::<si::meter_per_second_squared>())
        .max(0.0)
        .sqrt()
            * uc::MPS2)
    }

    /// Whether car `idx` drives the brake pipe
    pub fn is_main(&self, idx: usize) -> bool {
        self.motor_cars.get(idx).copied().unwrap_or(false)
            || idx == self.driver_car
            || self.brake_system.is_electric_command_brake()
    }

    /// Brake cylinder auxiliary coefficient, `200 kPa / emergency maximum - 1`
    /// held within `[0.1, 1]`
    fn auxiliary_brake_cylinder_coefficient(&self) -> f64 {
        (200_000.0
            / self
                .brake_cylinder_emergency_maximum_pressure
                .get::<si::pascal>()
            - 1.0)
            .clamp(0.1, 1.0)
    }

    fn build_car_brake(&self, idx: usize) -> anyhow::Result<CarBrakeType> {
        let op = self.operating_pressure();
        let automatic = self.brake_system.is_automatic_air_brake();
        let electric_command = self.brake_system.is_electric_command_brake();
        let brake_type = if self.is_main(idx) {
            BrakeType::Main
        } else {
            BrakeType::Auxiliary
        };
        let brake_cylinder = BrakeCylinder::new(
            self.brake_cylinder_service_maximum_pressure,
            self.brake_cylinder_emergency_maximum_pressure,
            if automatic {
                self.brake_cylinder_up
            } else {
                0.3 * self.brake_cylinder_up
            },
            self.brake_cylinder_up,
            self.brake_cylinder_down,
        )?;
        let equalizing_reservoir = EqualizingReservoir::new(50e3, 250e3, 200e3, 1.005 * op)?;
        let brake_pipe = BrakePipe::new(op, 1e7, 1.5e6, 5e6, electric_command)?;
        let auxiliary_reservoir = AuxiliaryReservoir::new(
            0.975 * op,
            200e3,
            0.5,
            self.auxiliary_brake_cylinder_coefficient(),
        )?;
        let straight_air_pipe = StraightAirPipe::new(300e3, 400e3, 200e3)?;
        let motor_brake = MotorBrake::new(
            self.motor_cars.get(idx).copied().unwrap_or(false),
            self.electropneumatic_type,
            self.brake_control_speed,
            self.motor_deceleration()?,
            self.motor_deceleration_delay_up,
            self.motor_deceleration_delay_down,
        )?;
        let curves = self.deceleration_curves.clone();

        Ok(match self.brake_system {
            BrakeSystemType::AutomaticAirBrake => AutomaticAirBrake::new(
                brake_type,
                equalizing_reservoir,
                brake_pipe,
                auxiliary_reservoir,
                brake_cylinder,
                curves,
            )?
            .into(),
            BrakeSystemType::ElectromagneticStraightAirBrake => {
                ElectromagneticStraightAirBrake::new(
                    brake_type,
                    equalizing_reservoir,
                    brake_pipe,
                    auxiliary_reservoir,
                    brake_cylinder,
                    straight_air_pipe,
                    motor_brake,
                    curves,
                )?
                .into()
            }
            BrakeSystemType::ElectricCommandBrake => ElectricCommandBrake::new(
                brake_type,
                brake_pipe,
                brake_cylinder,
                straight_air_pipe,
                auxiliary_reservoir.brake_pipe_coefficient,
                auxiliary_reservoir.brake_cylinder_coefficient,
                motor_brake,
                curves,
            )?
            .into(),
            BrakeSystemType::VacuumBrake => VacuumBrake::new(
                brake_type,
                equalizing_reservoir,
                brake_pipe,
                auxiliary_reservoir,
                brake_cylinder,
                curves,
            )?
            .into(),
        })
    }

    /// Builds the consist, drawing each main reservoir's starting pressure
    /// from `rng`
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> anyhow::Result<Consist> {
        let mut config = self.clone();
        config.init()?;
        let n_cars = config.n_cars();
        let brake_pipe_coefficient = if config.brake_system.is_automatic_air_brake() {
            0.25
        } else {
            0.075
        } / n_cars as f64;

        let mut vehicles = Vec::with_capacity(n_cars);
        for idx in 0..n_cars {
            let main_reservoir = MainReservoir::new(
                config.main_reservoir_minimum_pressure,
                config.main_reservoir_maximum_pressure,
                0.01,
                brake_pipe_coefficient,
                rng,
            )?;
            let car_brake = config
                .build_car_brake(idx)
                .with_context(|| format!("{}\ncar idx: {idx}", format_dbg!()))?;
            vehicles.push(Vehicle::new(
                main_reservoir,
                Compressor::new(COMPRESSOR_RATE)?,
                car_brake,
                config.save_interval,
            )?);
        }
        #[cfg(feature = "logging")]
        log::info!(
            "built {} {:?} cars, operating pressure {:.0} Pa",
            n_cars,
            config.brake_system,
            config.operating_pressure().get::<si::pascal>()
        );
        Ok(Consist::new(
            vehicles,
            config.pressure_distribution,
            config.maximum_notch(),
            config.save_interval,
        )?)
    }
}
