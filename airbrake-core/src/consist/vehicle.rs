use super::*;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// What one vehicle reports for a time step
pub struct VehicleOutput {
    /// Deceleration due to the friction brake
    pub deceleration: si::Acceleration,
    /// Deceleration due to motor braking
    pub motor_deceleration: si::Acceleration,
    pub air_sound: Option<AirSound>,
    pub compressor_sounds: Vec<CompressorSound>,
}

/// Vehicle state for current time step
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct VehicleState {
    pub i: usize,
    pub main_reservoir_pressure: si::Pressure,
    pub brake_pipe_pressure: si::Pressure,
    pub brake_cylinder_pressure: si::Pressure,
    pub deceleration: si::Acceleration,
    pub motor_deceleration: si::Acceleration,
    pub compressor_enabled: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            i: 1,
            main_reservoir_pressure: si::Pressure::ZERO,
            brake_pipe_pressure: si::Pressure::ZERO,
            brake_cylinder_pressure: si::Pressure::ZERO,
            deceleration: si::Acceleration::ZERO,
            motor_deceleration: si::Acceleration::ZERO,
            compressor_enabled: false,
        }
    }
}
impl Init for VehicleState {}
impl SerdeAPI for VehicleState {}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
/// Column-wise record of [VehicleState]
pub struct VehicleStateHistoryVec {
    pub i: Vec<usize>,
    pub main_reservoir_pressure: Vec<si::Pressure>,
    pub brake_pipe_pressure: Vec<si::Pressure>,
    pub brake_cylinder_pressure: Vec<si::Pressure>,
    pub deceleration: Vec<si::Acceleration>,
    pub motor_deceleration: Vec<si::Acceleration>,
    pub compressor_enabled: Vec<bool>,
}

impl VehicleStateHistoryVec {
    pub fn push(&mut self, state: VehicleState) {
        self.i.push(state.i);
        self.main_reservoir_pressure
            .push(state.main_reservoir_pressure);
        self.brake_pipe_pressure.push(state.brake_pipe_pressure);
        self.brake_cylinder_pressure
            .push(state.brake_cylinder_pressure);
        self.deceleration.push(state.deceleration);
        self.motor_deceleration.push(state.motor_deceleration);
        self.compressor_enabled.push(state.compressor_enabled);
    }

    pub fn len(&self) -> usize {
        self.i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }
}
impl Init for VehicleStateHistoryVec {}
impl SerdeAPI for VehicleStateHistoryVec {}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// One car: its main reservoir, the compressor charging it and its brake
pub struct Vehicle {
    pub main_reservoir: MainReservoir,
    pub compressor: Compressor,
    pub car_brake: CarBrakeType,
    /// A derailed car vents the brake pipe of its neighbours
    pub derailed: bool,
    pub state: VehicleState,
    /// Custom vector of [Self::state]
    pub history: VehicleStateHistoryVec,
    save_interval: Option<usize>,
}

impl Vehicle {
    pub fn new(
        main_reservoir: MainReservoir,
        compressor: Compressor,
        car_brake: CarBrakeType,
        save_interval: Option<usize>,
    ) -> Result<Self, Error> {
        let mut vehicle = Self {
            main_reservoir,
            compressor,
            car_brake,
            derailed: false,
            state: Default::default(),
            history: Default::default(),
            save_interval,
        };
        vehicle.init()?;
        vehicle.set_state();
        Ok(vehicle)
    }

    pub fn get_save_interval(&self) -> Option<usize> {
        self.save_interval
    }

    pub fn set_save_interval(&mut self, save_interval: Option<usize>) {
        self.save_interval = save_interval;
    }

    pub fn brake_type(&self) -> BrakeType {
        self.car_brake.brake_type()
    }

    /// Advances the vehicle by one time step.  On `Main` cars the compressor
    /// runs before the brake, so a reservoir below cut-in starts charging in
    /// the same step the brake draws from it.
    ///
    /// # Arguments
    /// - `dt`: time step size
    /// - `speed`: vehicle speed, sign gives direction
    /// - `handles`: driver and safety-system inputs
    pub fn update(
        &mut self,
        dt: si::Time,
        speed: si::Velocity,
        handles: &TrainHandles,
    ) -> anyhow::Result<VehicleOutput> {
        let compressor_sounds = if self.brake_type().is_main() {
            self.compressor
                .update(dt, &mut self.main_reservoir)
                .with_context(|| format_dbg!())?
        } else {
            vec![]
        };
        let brake_output = self
            .car_brake
            .update(dt, speed, handles, &mut self.main_reservoir)
            .with_context(|| format_dbg!())?;

        self.state.deceleration = brake_output.deceleration;
        self.state.motor_deceleration = brake_output.motor_deceleration;
        self.set_state();
        Ok(VehicleOutput {
            deceleration: brake_output.deceleration,
            motor_deceleration: brake_output.motor_deceleration,
            air_sound: brake_output.air_sound,
            compressor_sounds,
        })
    }

    /// Places the brake in `start_mode`
    pub fn initialize(&mut self, start_mode: StartMode) {
        self.car_brake.initialize(start_mode);
        self.state.deceleration = si::Acceleration::ZERO;
        self.state.motor_deceleration = si::Acceleration::ZERO;
        self.set_state();
    }

    /// Copies pressures into [Self::state]
    pub(crate) fn set_state(&mut self) {
        self.state.main_reservoir_pressure = self.main_reservoir.current_pressure;
        self.state.brake_pipe_pressure = self.car_brake.brake_pipe().current_pressure;
        self.state.brake_cylinder_pressure = self.car_brake.brake_cylinder().current_pressure;
        self.state.compressor_enabled = self.compressor.is_charging();
    }

    pub fn save_state(&mut self) {
        if let Some(interval) = self.save_interval {
            if interval > 0 && self.state.i % interval == 0 {
                self.history.push(self.state);
            }
        }
    }

    pub fn step(&mut self) {
        self.state.i += 1;
    }
}

impl Init for Vehicle {
    fn init(&mut self) -> Result<(), Error> {
        self.main_reservoir.init()?;
        self.compressor.init()?;
        self.car_brake.init()?;
        self.state.init()?;
        self.history.init()?;
        Ok(())
    }
}
impl SerdeAPI for Vehicle {}
