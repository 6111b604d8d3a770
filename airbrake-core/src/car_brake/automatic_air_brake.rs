use super::*;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Automatic air brake.  A drop in brake pipe pressure below the auxiliary
/// reservoir makes the triple valve apply the cylinder; a rise above it
/// releases the cylinder and recharges the reservoir.
pub struct AutomaticAirBrake {
    pub brake_type: BrakeType,
    pub equalizing_reservoir: EqualizingReservoir,
    pub brake_pipe: BrakePipe,
    pub auxiliary_reservoir: AuxiliaryReservoir,
    pub brake_cylinder: BrakeCylinder,
    /// Deceleration at service maximum pressure, selected by notch
    pub deceleration_curves: Vec<DecelerationCurve>,
}

impl AutomaticAirBrake {
    pub fn new(
        brake_type: BrakeType,
        equalizing_reservoir: EqualizingReservoir,
        brake_pipe: BrakePipe,
        auxiliary_reservoir: AuxiliaryReservoir,
        brake_cylinder: BrakeCylinder,
        deceleration_curves: Vec<DecelerationCurve>,
    ) -> Result<Self, Error> {
        let mut aab = Self {
            brake_type,
            equalizing_reservoir,
            brake_pipe,
            auxiliary_reservoir,
            brake_cylinder,
            deceleration_curves,
        };
        aab.init()?;
        Ok(aab)
    }

    /// Driver's brake valve: sets the equalizing reservoir from the handle
    /// and has the pipe follow it
    fn update_brake_valve(
        &mut self,
        dt: si::Time,
        handles: &TrainHandles,
        mr: &mut MainReservoir,
    ) {
        let er = &mut self.equalizing_reservoir;
        if handles.emergency_brake {
            exhaust_equalizing_reservoir(er, true, dt);
        } else {
            match AirBrakeHandleState::from(&handles.brake) {
                AirBrakeHandleState::Service => {
                    exhaust_equalizing_reservoir(er, false, dt)
                }
                AirBrakeHandleState::Release => charge_equalizing_reservoir(er, mr, dt),
                AirBrakeHandleState::Lap => {}
            }
        }
        follow_equalizing_reservoir(
            &mut self.brake_pipe,
            &self.equalizing_reservoir,
            mr,
            handles.emergency_brake,
            dt,
        );
    }
}

impl CarBrakeTrait for AutomaticAirBrake {
    fn update(
        &mut self,
        dt: si::Time,
        speed: si::Velocity,
        handles: &TrainHandles,
        main_reservoir: &mut MainReservoir,
    ) -> anyhow::Result<BrakeOutput> {
        check_step(dt, handles)?;
        if self.brake_type.is_main() {
            self.update_brake_valve(dt, handles, main_reservoir);
        }

        let bp = self.brake_pipe.current_pressure;
        let aux = self.auxiliary_reservoir.current_pressure;
        let mut air_sound = None;
        if exceeds(aux, bp) {
            triple_valve_apply(&mut self.brake_cylinder, &mut self.auxiliary_reservoir, dt);
        } else if exceeds(bp, aux) {
            let u = proximity(bp - aux);
            refill_auxiliary_reservoir(
                &mut self.auxiliary_reservoir,
                &mut self.brake_pipe,
                1.0,
                u,
                dt,
            );
            air_sound = triple_valve_release(&mut self.brake_cylinder, u, dt);
        } else {
            self.brake_cylinder.rearm_sound();
        }

        Ok(BrakeOutput {
            deceleration: brake_deceleration(
                &self.brake_cylinder,
                &self.deceleration_curves,
                handles.brake.actual,
                speed,
            )?,
            motor_deceleration: si::Acceleration::ZERO,
            air_sound,
        })
    }

    fn initialize(&mut self, start_mode: StartMode) {
        initialize_components(
            start_mode,
            &mut self.brake_cylinder,
            &mut self.brake_pipe,
            Some(&mut self.equalizing_reservoir),
            None,
            false,
        );
    }

    fn target_pressure(
        &self,
        _speed: si::Velocity,
        handles: &TrainHandles,
    ) -> anyhow::Result<si::Pressure> {
        let bc = &self.brake_cylinder;
        let aux = self.auxiliary_reservoir.current_pressure;
        Ok(if handles.emergency_brake {
            bc.emergency_maximum_pressure
        } else if exceeds(aux, self.brake_pipe.current_pressure) {
            aux.min(bc.emergency_maximum_pressure)
        } else if exceeds(self.brake_pipe.current_pressure, aux) {
            si::Pressure::ZERO
        } else {
            bc.current_pressure
        })
    }

    fn brake_type(&self) -> BrakeType {
        self.brake_type
    }

    fn brake_cylinder(&self) -> &BrakeCylinder {
        &self.brake_cylinder
    }

    fn brake_pipe(&self) -> &BrakePipe {
        &self.brake_pipe
    }

    fn brake_pipe_mut(&mut self) -> &mut BrakePipe {
        &mut self.brake_pipe
    }
}

impl Init for AutomaticAirBrake {
    fn init(&mut self) -> Result<(), Error> {
        self.equalizing_reservoir.init()?;
        self.brake_pipe.init()?;
        self.auxiliary_reservoir.init()?;
        self.brake_cylinder.init()?;
        check_curves(&mut self.deceleration_curves)
    }
}
impl SerdeAPI for AutomaticAirBrake {}
