use super::*;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Electric command brake.  Every car fills its cylinder straight from its
/// own main reservoir to the commanded pressure; the brake pipe carries no
/// signal.
pub struct ElectricCommandBrake {
    pub brake_type: BrakeType,
    pub brake_pipe: BrakePipe,
    pub brake_cylinder: BrakeCylinder,
    pub straight_air_pipe: StraightAirPipe,
    /// Auxiliary reservoir draw per unit of brake pipe gain, used to derive
    /// the main reservoir draw per unit of cylinder gain
    pub auxiliary_brake_pipe_coefficient: f64,
    /// Auxiliary reservoir draw per unit of cylinder gain
    pub auxiliary_brake_cylinder_coefficient: f64,
    pub motor_brake: MotorBrake,
    pub deceleration_curves: Vec<DecelerationCurve>,
}

impl ElectricCommandBrake {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        brake_type: BrakeType,
        brake_pipe: BrakePipe,
        brake_cylinder: BrakeCylinder,
        straight_air_pipe: StraightAirPipe,
        auxiliary_brake_pipe_coefficient: f64,
        auxiliary_brake_cylinder_coefficient: f64,
        motor_brake: MotorBrake,
        deceleration_curves: Vec<DecelerationCurve>,
    ) -> Result<Self, Error> {
        let mut ecb = Self {
            brake_type,
            brake_pipe,
            brake_cylinder,
            straight_air_pipe,
            auxiliary_brake_pipe_coefficient,
            auxiliary_brake_cylinder_coefficient,
            motor_brake,
            deceleration_curves,
        };
        ecb.init()?;
        Ok(ecb)
    }

    /// Pressure demanded by the handle before any motor blending
    fn command_pressure(&self, handles: &TrainHandles) -> si::Pressure {
        if handles.emergency_brake {
            self.brake_cylinder.emergency_maximum_pressure
        } else {
            self.brake_cylinder.service_maximum_pressure * handles.brake.notch_ratio()
        }
    }
}

impl CarBrakeTrait for ElectricCommandBrake {
    fn update(
        &mut self,
        dt: si::Time,
        speed: si::Velocity,
        handles: &TrainHandles,
        main_reservoir: &mut MainReservoir,
    ) -> anyhow::Result<BrakeOutput> {
        check_step(dt, handles)?;
        let motor_deceleration = self
            .motor_brake
            .step_motor_deceleration(dt, &handles.brake);

        let target = self.target_pressure(speed, handles)?;
        let bc = &mut self.brake_cylinder;
        let emax = bc.emergency_maximum_pressure;
        let mut air_sound = None;
        if exceeds(bc.current_pressure, target) || target == si::Pressure::ZERO {
            air_sound = bc.release_toward(target, dt);
        } else if (exceeds(target, bc.current_pressure) || target == emax)
            && exceeds(main_reservoir.current_pressure, bc.current_pressure)
        {
            let coefficient = self.auxiliary_brake_cylinder_coefficient
                * main_reservoir.brake_pipe_coefficient
                / self.auxiliary_brake_pipe_coefficient;
            fill_cylinder_from_main(
                bc,
                main_reservoir,
                target,
                coefficient,
                handles.emergency_brake,
                dt,
            );
        } else {
            bc.rearm_sound();
        }
        self.straight_air_pipe.current_pressure = self.command_pressure(handles);

        Ok(BrakeOutput {
            deceleration: brake_deceleration(
                &self.brake_cylinder,
                &self.deceleration_curves,
                handles.brake.actual,
                speed,
            )?,
            motor_deceleration: if self.motor_brake.is_active(speed, handles) {
                motor_deceleration
            } else {
                si::Acceleration::ZERO
            },
            air_sound,
        })
    }

    fn initialize(&mut self, start_mode: StartMode) {
        initialize_components(
            start_mode,
            &mut self.brake_cylinder,
            &mut self.brake_pipe,
            None,
            Some(&mut self.straight_air_pipe),
            true,
        );
    }

    fn target_pressure(
        &self,
        speed: si::Velocity,
        handles: &TrainHandles,
    ) -> anyhow::Result<si::Pressure> {
        let service_maximum_deceleration = deceleration_at_service_maximum(
            &self.deceleration_curves,
            handles.brake.actual,
            speed,
        )?;
        Ok(self.motor_brake.blend_target(
            self.command_pressure(handles),
            self.brake_cylinder.service_maximum_pressure,
            service_maximum_deceleration,
            speed,
            handles,
        ))
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

    fn motor_brake(&self) -> Option<&MotorBrake> {
        Some(&self.motor_brake)
    }
}

impl Init for ElectricCommandBrake {
    fn init(&mut self) -> Result<(), Error> {
        self.brake_pipe.init()?;
        self.brake_cylinder.init()?;
        self.straight_air_pipe.init()?;
        self.motor_brake.init()?;
        init_ensure!(
            self.auxiliary_brake_pipe_coefficient > 0.0
                && self.auxiliary_brake_cylinder_coefficient > 0.0,
            "{}\nauxiliary coefficients must be positive",
            format_dbg!((
                self.auxiliary_brake_pipe_coefficient,
                self.auxiliary_brake_cylinder_coefficient
            ))
        );
        check_curves(&mut self.deceleration_curves)
    }
}
impl SerdeAPI for ElectricCommandBrake {}
