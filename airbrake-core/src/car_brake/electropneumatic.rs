use super::*;

/// How an electropneumatic brake blends air braking with motor braking
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, IsVariant)]
pub enum ElectropneumaticType {
    /// Air brake acts alone
    #[default]
    None,
    /// Motor braking locks out the air brake completely
    ClosingElectromagneticValve,
    /// Air brake supplies only the deceleration the motor cannot
    DelayFillingControl,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Motor (dynamic) braking of a car, as seen by its friction brake
pub struct MotorBrake {
    pub is_motor_car: bool,
    pub electropneumatic_type: ElectropneumaticType,
    /// Absolute speed above which motor braking acts
    pub brake_control_speed: si::Velocity,
    /// Motor deceleration at the maximum brake notch
    pub motor_deceleration: si::Acceleration,
    /// Delay before motor braking follows a notch increase
    pub delay_up: si::Time,
    /// Delay before motor braking follows a notch decrease
    pub delay_down: si::Time,
    /// Time remaining before motor braking follows the last notch change
    pub delay_timer: si::Time,
    /// Notch seen by the previous step
    pub last_handle_position: i32,
    /// Last deceleration taken after a delay elapsed
    pub last_motor_deceleration: si::Acceleration,
    /// Deceleration available in the current step
    pub current_deceleration: si::Acceleration,
}

impl MotorBrake {
    pub fn new(
        is_motor_car: bool,
        electropneumatic_type: ElectropneumaticType,
        brake_control_speed: si::Velocity,
        motor_deceleration: si::Acceleration,
        delay_up: si::Time,
        delay_down: si::Time,
    ) -> Result<Self, Error> {
        let mut mb = Self {
            is_motor_car,
            electropneumatic_type,
            brake_control_speed,
            motor_deceleration,
            delay_up,
            delay_down,
            delay_timer: si::Time::ZERO,
            last_handle_position: 0,
            last_motor_deceleration: si::Acceleration::ZERO,
            current_deceleration: si::Acceleration::ZERO,
        };
        mb.init()?;
        Ok(mb)
    }

    /// Trailer car without motor braking
    pub fn trailer() -> Self {
        Self {
            is_motor_car: false,
            electropneumatic_type: ElectropneumaticType::None,
            brake_control_speed: si::Velocity::ZERO,
            motor_deceleration: si::Acceleration::ZERO,
            delay_up: si::Time::ZERO,
            delay_down: si::Time::ZERO,
            delay_timer: si::Time::ZERO,
            last_handle_position: 0,
            last_motor_deceleration: si::Acceleration::ZERO,
            current_deceleration: si::Acceleration::ZERO,
        }
    }

    /// Advances the notch delay timer by `dt` and returns the motor
    /// deceleration available this step.  A notch change re-arms the timer;
    /// until it elapses the previously available deceleration is kept.
    pub fn step_motor_deceleration(
        &mut self,
        dt: si::Time,
        handle: &BrakeHandle,
    ) -> si::Acceleration {
        let mut actual = si::Acceleration::ZERO;
        if self.is_motor_car {
            if self.last_handle_position != handle.actual {
                self.delay_timer = if handle.actual > self.last_handle_position {
                    self.delay_up
                } else {
                    self.delay_down
                };
                self.last_handle_position = handle.actual;
            }
            if handle.actual != 0 {
                self.delay_timer -= dt;
                if self.delay_timer < si::Time::ZERO {
                    actual = self.motor_deceleration * handle.notch_ratio();
                    self.last_motor_deceleration = actual;
                } else {
                    actual = self.last_motor_deceleration;
                }
            }
        }
        self.current_deceleration = actual;
        actual
    }

    /// Whether motor braking acts on the car at `speed`
    pub fn is_active(&self, speed: si::Velocity, handles: &TrainHandles) -> bool {
        self.is_motor_car
            && !handles.emergency_brake
            && handles.reverser != 0
            && speed.abs() >= self.brake_control_speed
    }

    /// Reduces the air brake `target` to account for motor braking.
    ///
    /// # Arguments
    /// - `target`: pressure demanded of the friction brake
    /// - `service_maximum_pressure`: cylinder pressure at full service
    /// - `service_maximum_deceleration`: deceleration at full service at the
    ///   current notch and speed
    pub fn blend_target(
        &self,
        target: si::Pressure,
        service_maximum_pressure: si::Pressure,
        service_maximum_deceleration: si::Acceleration,
        speed: si::Velocity,
        handles: &TrainHandles,
    ) -> si::Pressure {
        if !(self.is_motor_car
            && !handles.emergency_brake
            && handles.reverser != 0
            && speed.abs() > self.brake_control_speed)
        {
            return target;
        }
        match self.electropneumatic_type {
            ElectropneumaticType::None => target,
            ElectropneumaticType::ClosingElectromagneticValve => si::Pressure::ZERO,
            ElectropneumaticType::DelayFillingControl => {
                if service_maximum_deceleration <= si::Acceleration::ZERO {
                    return target;
                }
                let demanded =
                    service_maximum_deceleration * target.ratio_to(service_maximum_pressure);
                let shortfall = demanded - self.current_deceleration;
                if shortfall > si::Acceleration::ZERO {
                    let fraction = (shortfall / service_maximum_deceleration)
                        .get::<si::ratio>()
                        .min(1.0);
                    service_maximum_pressure * fraction
                } else {
                    si::Pressure::ZERO
                }
            }
        }
    }
}

impl Default for MotorBrake {
    fn default() -> Self {
        Self::trailer()
    }
}

impl Init for MotorBrake {
    fn init(&mut self) -> Result<(), Error> {
        init_ensure!(
            self.brake_control_speed >= si::Velocity::ZERO,
            "{}\n`brake_control_speed` must not be negative",
            format_dbg!(self.brake_control_speed)
        );
        init_ensure!(
            self.motor_deceleration >= si::Acceleration::ZERO,
            "{}\n`motor_deceleration` must not be negative",
            format_dbg!(self.motor_deceleration)
        );
        init_ensure!(
            self.delay_up >= si::Time::ZERO && self.delay_down >= si::Time::ZERO,
            "{}\nbrake delays must not be negative",
            format_dbg!((self.delay_up, self.delay_down))
        );
        Ok(())
    }
}
impl SerdeAPI for MotorBrake {}
