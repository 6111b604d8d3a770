use super::*;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Electromagnetic straight air brake.  The cylinder follows the notch
/// directly, fed from the auxiliary reservoir; the brake pipe remains a
/// fail-safe that forces an emergency application when it drops.
pub struct ElectromagneticStraightAirBrake {
    pub brake_type: BrakeType,
    pub equalizing_reservoir: EqualizingReservoir,
    pub brake_pipe: BrakePipe,
    pub auxiliary_reservoir: AuxiliaryReservoir,
    pub brake_cylinder: BrakeCylinder,
    pub straight_air_pipe: StraightAirPipe,
    pub motor_brake: MotorBrake,
    pub deceleration_curves: Vec<DecelerationCurve>,
}

impl ElectromagneticStraightAirBrake {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        brake_type: BrakeType,
        equalizing_reservoir: EqualizingReservoir,
        brake_pipe: BrakePipe,
        auxiliary_reservoir: AuxiliaryReservoir,
        brake_cylinder: BrakeCylinder,
        straight_air_pipe: StraightAirPipe,
        motor_brake: MotorBrake,
        deceleration_curves: Vec<DecelerationCurve>,
    ) -> Result<Self, Error> {
        let mut esab = Self {
            brake_type,
            equalizing_reservoir,
            brake_pipe,
            auxiliary_reservoir,
            brake_cylinder,
            straight_air_pipe,
            motor_brake,
            deceleration_curves,
        };
        esab.init()?;
        Ok(esab)
    }

    fn emergency(&self, handles: &TrainHandles) -> bool {
        handles.emergency_brake
            || exceeds(
                self.auxiliary_reservoir.current_pressure,
                self.brake_pipe.current_pressure,
            )
    }
}

impl CarBrakeTrait for ElectromagneticStraightAirBrake {
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

        if self.brake_type.is_main() {
            let er = &mut self.equalizing_reservoir;
            if handles.emergency_brake {
                exhaust_equalizing_reservoir(er, true, dt);
            } else {
                charge_equalizing_reservoir(er, main_reservoir, dt);
            }
            follow_equalizing_reservoir(
                &mut self.brake_pipe,
                &self.equalizing_reservoir,
                main_reservoir,
                handles.emergency_brake,
                dt,
            );
        }
        refill_auxiliary_reservoir(
            &mut self.auxiliary_reservoir,
            &mut self.brake_pipe,
            2.0,
            1.0,
            dt,
        );

        let emergency = self.emergency(handles);
        let target = self.target_pressure(speed, handles)?;
        let mut air_sound = None;
        if exceeds(self.brake_cylinder.current_pressure, target) || target == si::Pressure::ZERO
        {
            air_sound = self.brake_cylinder.release_toward(target, dt);
        } else if exceeds(target, self.brake_cylinder.current_pressure) {
            fill_cylinder_from_auxiliary(
                &mut self.brake_cylinder,
                &mut self.auxiliary_reservoir,
                target,
                emergency,
                dt,
            );
        } else {
            self.brake_cylinder.rearm_sound();
        }

        if self.brake_type.is_main() {
            let command = if handles.emergency_brake {
                si::Pressure::ZERO
            } else {
                self.brake_cylinder.service_maximum_pressure * handles.brake.notch_ratio()
            };
            self.straight_air_pipe.drive_toward(
                command,
                handles.emergency_brake,
                self.brake_cylinder.emergency_maximum_pressure,
                dt,
            );
        }

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
            Some(&mut self.equalizing_reservoir),
            Some(&mut self.straight_air_pipe),
            false,
        );
    }

    fn target_pressure(
        &self,
        speed: si::Velocity,
        handles: &TrainHandles,
    ) -> anyhow::Result<si::Pressure> {
        let bc = &self.brake_cylinder;
        let target = if self.emergency(handles) {
            bc.emergency_maximum_pressure
        } else {
            bc.service_maximum_pressure * handles.brake.notch_ratio()
        };
        let service_maximum_deceleration = deceleration_at_service_maximum(
            &self.deceleration_curves,
            handles.brake.actual,
            speed,
        )?;
        Ok(self.motor_brake.blend_target(
            target,
            bc.service_maximum_pressure,
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

impl Init for ElectromagneticStraightAirBrake {
    fn init(&mut self) -> Result<(), Error> {
        self.equalizing_reservoir.init()?;
        self.brake_pipe.init()?;
        self.auxiliary_reservoir.init()?;
        self.brake_cylinder.init()?;
        self.straight_air_pipe.init()?;
        self.motor_brake.init()?;
        check_curves(&mut self.deceleration_curves)
    }
}
impl SerdeAPI for ElectromagneticStraightAirBrake {}
