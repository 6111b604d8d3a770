use super::reservoir::check_non_negative;
use super::*;

/// Compressor delivery rate used for every car, Pa/s
pub const COMPRESSOR_RATE: f64 = 5000.0;

/// Audio cues emitted by the compressor
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, IsVariant)]
pub enum CompressorSound {
    /// Compressor has switched on
    Start,
    /// Running loop begins after the warm-up delay
    LoopStart,
    /// Running loop ends
    LoopStop,
    /// Compressor has switched off
    End,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Two-state latch that recharges a [MainReservoir].  Switches on below
/// [MainReservoir::minimum_pressure] and off once
/// [MainReservoir::maximum_pressure] is reached.
pub struct Compressor {
    /// True while charging
    pub enabled: bool,
    /// Delivery rate, Pa/s
    pub rate: f64,
    /// Time between the start cue and the loop cue
    pub loop_delay: si::Time,
    /// Time since the compressor last switched on
    pub time_since_start: si::Time,
    pub loop_started: bool,
}

impl Default for Compressor {
    fn default() -> Self {
        Self {
            enabled: false,
            rate: COMPRESSOR_RATE,
            loop_delay: 5.0 * uc::S,
            time_since_start: si::Time::ZERO,
            loop_started: false,
        }
    }
}

impl Init for Compressor {
    fn init(&mut self) -> Result<(), Error> {
        check_non_negative("rate", self.rate)?;
        init_ensure!(
            self.loop_delay >= si::Time::ZERO,
            "{}\n`loop_delay` must not be negative",
            format_dbg!(self.loop_delay)
        );
        Ok(())
    }
}
impl SerdeAPI for Compressor {}

impl Compressor {
    pub fn new(rate: f64) -> Result<Self, Error> {
        let mut compressor = Self {
            rate,
            ..Default::default()
        };
        compressor.init()?;
        Ok(compressor)
    }

    pub fn is_charging(&self) -> bool {
        self.enabled
    }

    /// Advances the compressor one time step, returning the cues emitted
    ///
    /// # Arguments
    /// - `dt`: time step size
    /// - `main_reservoir`: reservoir being charged, borrowed for this call only
    pub fn update(
        &mut self,
        dt: si::Time,
        main_reservoir: &mut MainReservoir,
    ) -> anyhow::Result<Vec<CompressorSound>> {
        ensure!(
            dt >= si::Time::ZERO,
            "{}\ndt must not be negative",
            format_dbg!(dt)
        );
        let mut sounds = Vec::new();
        if self.enabled {
            main_reservoir.add_pressure(nominal_flow(self.rate, dt));
            self.time_since_start += dt;
            if main_reservoir.current_pressure >= main_reservoir.maximum_pressure {
                self.enabled = false;
                if self.loop_started {
                    sounds.push(CompressorSound::LoopStop);
                }
                self.loop_started = false;
                sounds.push(CompressorSound::End);
                #[cfg(feature = "logging")]
                log::debug!(
                    "compressor off at {:.0} Pa",
                    main_reservoir.current_pressure.get::<si::pascal>()
                );
            } else if !self.loop_started && self.time_since_start > self.loop_delay {
                self.loop_started = true;
                sounds.push(CompressorSound::LoopStart);
            }
        } else if main_reservoir.needs_charge() {
            self.enabled = true;
            self.time_since_start = si::Time::ZERO;
            sounds.push(CompressorSound::Start);
            #[cfg(feature = "logging")]
            log::debug!(
                "compressor on at {:.0} Pa",
                main_reservoir.current_pressure.get::<si::pascal>()
            );
        }
        Ok(sounds)
    }
}
