use super::*;

/// Role of a car in distributing brake pipe air
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, IsVariant)]
pub enum BrakeType {
    /// Carries a brake valve and feeds the brake pipe from its main reservoir
    Main,
    /// Only draws from the brake pipe
    #[default]
    Auxiliary,
}

/// State in which the brake system is placed before the first step
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, IsVariant)]
pub enum StartMode {
    /// Cylinders at the service maximum, pipe charged
    ServiceBrakesApplied,
    /// Cylinders at the emergency maximum, pipe and equalizing reservoir empty
    EmergencyBrakesApplied,
    /// Released and fully charged
    #[default]
    Default,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
/// What one brake step reports back to the car
pub struct BrakeOutput {
    /// Deceleration due to the friction brake
    pub deceleration: si::Acceleration,
    /// Deceleration the motor brake provides, zero when it does not act
    pub motor_deceleration: si::Acceleration,
    /// Release cue for the host to play
    pub air_sound: Option<AirSound>,
}

impl Default for BrakeOutput {
    fn default() -> Self {
        Self {
            deceleration: si::Acceleration::ZERO,
            motor_deceleration: si::Acceleration::ZERO,
            air_sound: None,
        }
    }
}

/// Checks performed before any brake step
pub(crate) fn check_step(dt: si::Time, handles: &TrainHandles) -> anyhow::Result<()> {
    ensure!(
        dt >= si::Time::ZERO,
        "{}\ntime step must not be negative",
        format_dbg!(dt)
    );
    handles.brake.validate()
}

/// Places the shared pneumatic components in `start_mode`.  Electric command
/// brakes keep their pipe empty.
pub(crate) fn initialize_components(
    start_mode: StartMode,
    bc: &mut BrakeCylinder,
    bp: &mut BrakePipe,
    er: Option<&mut EqualizingReservoir>,
    sap: Option<&mut StraightAirPipe>,
    electric_command: bool,
) {
    let (bc_pressure, bp_pressure, er_charged, sap_pressure) = match start_mode {
        StartMode::ServiceBrakesApplied => (
            bc.service_maximum_pressure,
            bp.normal_pressure,
            true,
            bc.service_maximum_pressure,
        ),
        StartMode::EmergencyBrakesApplied => (
            bc.emergency_maximum_pressure,
            si::Pressure::ZERO,
            false,
            si::Pressure::ZERO,
        ),
        StartMode::Default => (
            si::Pressure::ZERO,
            bp.normal_pressure,
            true,
            si::Pressure::ZERO,
        ),
    };
    bc.set_pressure(bc_pressure);
    bc.rearm_sound();
    bp.set_pressure(if electric_command {
        si::Pressure::ZERO
    } else {
        bp_pressure
    });
    if let Some(er) = er {
        let er_pressure = if er_charged {
            er.normal_pressure
        } else {
            si::Pressure::ZERO
        };
        er.set_pressure(er_pressure);
    }
    if let Some(sap) = sap {
        sap.current_pressure = sap_pressure;
    }
}

pub trait CarBrakeTrait {
    /// Advances the brake by one time step.
    ///
    /// # Arguments
    /// - `dt`: time step size
    /// - `speed`: car speed, sign gives direction
    /// - `handles`: driver and safety-system inputs
    /// - `main_reservoir`: the car's main reservoir
    fn update(
        &mut self,
        dt: si::Time,
        speed: si::Velocity,
        handles: &TrainHandles,
        main_reservoir: &mut MainReservoir,
    ) -> anyhow::Result<BrakeOutput>;

    /// Places the brake in `start_mode`
    fn initialize(&mut self, start_mode: StartMode);

    /// Brake cylinder pressure the brake is currently driving toward
    fn target_pressure(
        &self,
        speed: si::Velocity,
        handles: &TrainHandles,
    ) -> anyhow::Result<si::Pressure>;

    fn brake_type(&self) -> BrakeType;

    fn brake_cylinder(&self) -> &BrakeCylinder;

    fn brake_pipe(&self) -> &BrakePipe;

    fn brake_pipe_mut(&mut self) -> &mut BrakePipe;

    /// Motor brake of the car, if the brake type supports blending
    fn motor_brake(&self) -> Option<&MotorBrake> {
        None
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, From, IsVariant)]
/// Wrapper for the supported brake types
pub enum CarBrakeType {
    AutomaticAirBrake(AutomaticAirBrake),
    ElectromagneticStraightAirBrake(ElectromagneticStraightAirBrake),
    ElectricCommandBrake(ElectricCommandBrake),
    VacuumBrake(VacuumBrake),
}

impl fmt::Display for CarBrakeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AutomaticAirBrake(_) => "AutomaticAirBrake",
            Self::ElectromagneticStraightAirBrake(_) => "ElectromagneticStraightAirBrake",
            Self::ElectricCommandBrake(_) => "ElectricCommandBrake",
            Self::VacuumBrake(_) => "VacuumBrake",
        };
        write!(f, "{name}")
    }
}

impl Init for CarBrakeType {
    fn init(&mut self) -> Result<(), Error> {
        match self {
            Self::AutomaticAirBrake(b) => b.init()?,
            Self::ElectromagneticStraightAirBrake(b) => b.init()?,
            Self::ElectricCommandBrake(b) => b.init()?,
            Self::VacuumBrake(b) => b.init()?,
        }
        Ok(())
    }
}
impl SerdeAPI for CarBrakeType {}

impl CarBrakeTrait for CarBrakeType {
    fn update(
        &mut self,
        dt: si::Time,
        speed: si::Velocity,
        handles: &TrainHandles,
        main_reservoir: &mut MainReservoir,
    ) -> anyhow::Result<BrakeOutput> {
        match self {
            Self::AutomaticAirBrake(b) => b.update(dt, speed, handles, main_reservoir),
            Self::ElectromagneticStraightAirBrake(b) => {
                b.update(dt, speed, handles, main_reservoir)
            }
            Self::ElectricCommandBrake(b) => b.update(dt, speed, handles, main_reservoir),
            Self::VacuumBrake(b) => b.update(dt, speed, handles, main_reservoir),
        }
        .with_context(|| format!("{}\n{}", format_dbg!(), self))
    }

    fn initialize(&mut self, start_mode: StartMode) {
        match self {
            Self::AutomaticAirBrake(b) => b.initialize(start_mode),
            Self::ElectromagneticStraightAirBrake(b) => b.initialize(start_mode),
            Self::ElectricCommandBrake(b) => b.initialize(start_mode),
            Self::VacuumBrake(b) => b.initialize(start_mode),
        }
    }

    fn target_pressure(
        &self,
        speed: si::Velocity,
        handles: &TrainHandles,
    ) -> anyhow::Result<si::Pressure> {
        match self {
            Self::AutomaticAirBrake(b) => b.target_pressure(speed, handles),
            Self::ElectromagneticStraightAirBrake(b) => b.target_pressure(speed, handles),
            Self::ElectricCommandBrake(b) => b.target_pressure(speed, handles),
            Self::VacuumBrake(b) => b.target_pressure(speed, handles),
        }
    }

    fn brake_type(&self) -> BrakeType {
        match self {
            Self::AutomaticAirBrake(b) => b.brake_type(),
            Self::ElectromagneticStraightAirBrake(b) => b.brake_type(),
            Self::ElectricCommandBrake(b) => b.brake_type(),
            Self::VacuumBrake(b) => b.brake_type(),
        }
    }

    fn brake_cylinder(&self) -> &BrakeCylinder {
        match self {
            Self::AutomaticAirBrake(b) => b.brake_cylinder(),
            Self::ElectromagneticStraightAirBrake(b) => b.brake_cylinder(),
            Self::ElectricCommandBrake(b) => b.brake_cylinder(),
            Self::VacuumBrake(b) => b.brake_cylinder(),
        }
    }

    fn brake_pipe(&self) -> &BrakePipe {
        match self {
            Self::AutomaticAirBrake(b) => b.brake_pipe(),
            Self::ElectromagneticStraightAirBrake(b) => b.brake_pipe(),
            Self::ElectricCommandBrake(b) => b.brake_pipe(),
            Self::VacuumBrake(b) => b.brake_pipe(),
        }
    }

    fn brake_pipe_mut(&mut self) -> &mut BrakePipe {
        match self {
            Self::AutomaticAirBrake(b) => b.brake_pipe_mut(),
            Self::ElectromagneticStraightAirBrake(b) => b.brake_pipe_mut(),
            Self::ElectricCommandBrake(b) => b.brake_pipe_mut(),
            Self::VacuumBrake(b) => b.brake_pipe_mut(),
        }
    }

    fn motor_brake(&self) -> Option<&MotorBrake> {
        match self {
            Self::AutomaticAirBrake(b) => b.motor_brake(),
            Self::ElectromagneticStraightAirBrake(b) => b.motor_brake(),
            Self::ElectricCommandBrake(b) => b.motor_brake(),
            Self::VacuumBrake(b) => b.motor_brake(),
        }
    }
}
