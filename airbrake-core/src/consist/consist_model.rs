use super::*;

/// How brake pipe air moves between cars after every car has stepped
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, IsVariant)]
pub enum PressureDistribution {
    /// Every pipe takes the train-wide mean.  Pipes next to a derailed car
    /// first vent at their leak rate.
    #[default]
    Averaging,
    /// Every pipe vents at its leak rate, then each `Main` car feeds the cars
    /// behind it up to the next `Main` car and back-feeds the cars ahead of
    /// it down to the previous one.  Changes ripple one car per step.
    Propagating,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Train of vehicles sharing one brake pipe
pub struct Consist {
    pub vehicles: Vec<Vehicle>,
    pub pressure_distribution: PressureDistribution,
    /// Highest notch of the brake handle driving this consist
    pub maximum_notch: i32,
    save_interval: Option<usize>,
}

impl Consist {
    pub fn new(
        vehicles: Vec<Vehicle>,
        pressure_distribution: PressureDistribution,
        maximum_notch: i32,
        save_interval: Option<usize>,
    ) -> Result<Self, Error> {
        let mut consist = Self {
            vehicles,
            pressure_distribution,
            maximum_notch,
            save_interval,
        };
        consist.init()?;
        consist.set_save_interval(save_interval);
        Ok(consist)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn get_save_interval(&self) -> Option<usize> {
        self.save_interval
    }

    /// Set save interval and cascade to vehicles
    pub fn set_save_interval(&mut self, save_interval: Option<usize>) {
        self.save_interval = save_interval;
        for vehicle in self.vehicles.iter_mut() {
            vehicle.set_save_interval(save_interval);
        }
    }

    /// Places every car in `start_mode` and returns the handle positions the
    /// driver should start from
    pub fn initialize(&mut self, start_mode: StartMode) -> TrainHandles {
        for vehicle in self.vehicles.iter_mut() {
            vehicle.initialize(start_mode);
        }
        #[cfg(feature = "logging")]
        log::info!(
            "initialized {} vehicles with {:?}",
            self.vehicles.len(),
            start_mode
        );
        let automatic = self
            .vehicles
            .first()
            .map_or(false, |v| v.car_brake.is_automatic_air_brake());
        let (notch, emergency_brake, reverser) = match start_mode {
            // the automatic air brake handle starts in `Service`
            StartMode::ServiceBrakesApplied if automatic => (self.maximum_notch, false, 1),
            StartMode::ServiceBrakesApplied => (
                (0.7 * self.maximum_notch as f64).round() as i32,
                false,
                1,
            ),
            StartMode::EmergencyBrakesApplied => (self.maximum_notch, true, 0),
            StartMode::Default => (0, false, 0),
        };
        TrainHandles::new(
            BrakeHandle::new(notch, self.maximum_notch),
            emergency_brake,
            reverser,
        )
    }

    /// Steps every vehicle, then distributes brake pipe pressure along the
    /// train.  Returns one output per vehicle, in consist order.
    ///
    /// # Arguments
    /// - `dt`: time step size
    /// - `speed`: train speed, sign gives direction
    /// - `handles`: driver and safety-system inputs
    pub fn update_brake_system(
        &mut self,
        dt: si::Time,
        speed: si::Velocity,
        handles: &TrainHandles,
    ) -> anyhow::Result<Vec<VehicleOutput>> {
        let outputs = self
            .vehicles
            .iter_mut()
            .enumerate()
            .map(|(idx, vehicle)| {
                vehicle
                    .update(dt, speed, handles)
                    .with_context(|| format!("{}\nvehicle idx: {idx}", format_dbg!()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        match self.pressure_distribution {
            PressureDistribution::Averaging => self.average_brake_pipes(dt),
            PressureDistribution::Propagating => self.propagate_brake_pipes(dt),
        }

        for vehicle in self.vehicles.iter_mut() {
            vehicle.set_state();
            vehicle.save_state();
            vehicle.step();
        }
        Ok(outputs)
    }

    fn average_brake_pipes(&mut self, dt: si::Time) {
        let n = self.vehicles.len();
        if n == 0 {
            return;
        }
        let derailed: Vec<bool> = self.vehicles.iter().map(|v| v.derailed).collect();
        let mut total = si::Pressure::ZERO;
        for (i, vehicle) in self.vehicles.iter_mut().enumerate() {
            let pipe = vehicle.car_brake.brake_pipe_mut();
            if i > 0 && (derailed[i - 1] || derailed[i]) {
                pipe.leak(dt);
            }
            if i + 1 < n && (derailed[i] || derailed[i + 1]) {
                pipe.leak(dt);
            }
            total += pipe.current_pressure;
        }
        let average = total / n as f64;
        for vehicle in self.vehicles.iter_mut() {
            vehicle.car_brake.brake_pipe_mut().set_pressure(average);
        }
    }

    fn propagate_brake_pipes(&mut self, dt: si::Time) {
        let n = self.vehicles.len();
        let mut last_main: Option<usize> = None;
        for i in 0..n {
            self.vehicles[i].car_brake.brake_pipe_mut().leak(dt);
            if !self.vehicles[i].brake_type().is_main() {
                continue;
            }
            let first_fed = last_main.map_or(0, |m| m + 1);
            for j in (first_fed..i).rev() {
                self.feed_brake_pipe(i, j, dt);
            }
            for j in i + 1..n {
                if self.vehicles[j].brake_type().is_main() {
                    break;
                }
                self.feed_brake_pipe(i, j, dt);
            }
            last_main = Some(i);
        }
    }

    /// Moves air from the pipe of car `from` into the pipe of car `to`
    fn feed_brake_pipe(&mut self, from: usize, to: usize, dt: si::Time) {
        if from == to {
            return;
        }
        let receiver = self.vehicles[to].car_brake.brake_pipe();
        let change = (receiver.normal_pressure - receiver.current_pressure)
            .min(nominal_flow(0.5 * receiver.charge_rate, dt))
            .max(si::Pressure::ZERO);
        let supply = self.vehicles[from].car_brake.brake_pipe().current_pressure;
        let diff = change.min(supply);
        self.vehicles[from]
            .car_brake
            .brake_pipe_mut()
            .add_pressure(-diff);
        self.vehicles[to]
            .car_brake
            .brake_pipe_mut()
            .add_pressure(diff);
    }

    /// Mean friction brake deceleration over `outputs`
    pub fn mean_deceleration(outputs: &[VehicleOutput]) -> si::Acceleration {
        if outputs.is_empty() {
            return si::Acceleration::ZERO;
        }
        outputs
            .iter()
            .fold(si::Acceleration::ZERO, |acc, o| acc + o.deceleration)
            / outputs.len() as f64
    }
}

impl Init for Consist {
    fn init(&mut self) -> Result<(), Error> {
        init_ensure!(
            self.maximum_notch > 0,
            "{}\nbrake handle must have at least one notch",
            format_dbg!(self.maximum_notch)
        );
        self.vehicles.init()
    }
}
impl SerdeAPI for Consist {}
