use super::*;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// Deceleration a car achieves with its brake cylinder at the service
/// maximum pressure
pub enum DecelerationCurve {
    /// Same deceleration at every speed
    Constant(si::Acceleration),
    /// Deceleration linearly interpolated over absolute speed, held flat
    /// outside the table
    SpeedTable {
        speed: Vec<si::Velocity>,
        deceleration: Vec<si::Acceleration>,
    },
}

impl DecelerationCurve {
    pub fn deceleration_at(&self, speed: si::Velocity) -> anyhow::Result<si::Acceleration> {
        match self {
            Self::Constant(decel) => Ok(*decel),
            Self::SpeedTable {
                speed: speed_data,
                deceleration,
            } => {
                let x: Vec<f64> = speed_data
                    .iter()
                    .map(|v| v.get::<si::meter_per_second>())
                    .collect();
                let y: Vec<f64> = deceleration
                    .iter()
                    .map(|a| a.get::<si::meter_per_second_squared>())
                    .collect();
                Ok(interp1d(speed.abs().get::<si::meter_per_second>(), &x, &y)
                    .with_context(|| format_dbg!())?
                    * uc::MPS2)
            }
        }
    }
}

impl Default for DecelerationCurve {
    /// 1 km/h/s, the usual full service rate
    fn default() -> Self {
        Self::Constant(uc::KPH.get::<si::meter_per_second>() * uc::MPS2)
    }
}

impl Init for DecelerationCurve {
    fn init(&mut self) -> Result<(), Error> {
        match self {
            Self::Constant(decel) => {
                init_ensure!(
                    *decel >= si::Acceleration::ZERO,
                    "{}\ndeceleration must not be negative",
                    format_dbg!(decel)
                );
            }
            Self::SpeedTable {
                speed,
                deceleration,
            } => {
                init_ensure!(
                    !speed.is_empty() && speed.len() == deceleration.len(),
                    "{}\n`speed` and `deceleration` must be non-empty and of equal length",
                    format_dbg!((speed.len(), deceleration.len()))
                );
                init_ensure!(
                    is_sorted(speed),
                    "{}\n`speed` must be sorted",
                    format_dbg!(speed)
                );
                init_ensure!(
                    deceleration.iter().all(|a| *a >= si::Acceleration::ZERO),
                    "{}\ndeceleration must not be negative",
                    format_dbg!(deceleration)
                );
            }
        }
        Ok(())
    }
}
impl SerdeAPI for DecelerationCurve {}

/// Checks that a brake has at least one valid curve
pub(crate) fn check_curves(curves: &mut [DecelerationCurve]) -> Result<(), Error> {
    init_ensure!(
        !curves.is_empty(),
        "{}\nat least one deceleration curve is required",
        format_dbg!()
    );
    for curve in curves.iter_mut() {
        curve.init()?;
    }
    Ok(())
}

/// Deceleration at service maximum pressure for `notch`.  Notch `n` uses
/// curve `n - 1`, saturating at the last curve; notch zero uses the first.
pub fn deceleration_at_service_maximum(
    curves: &[DecelerationCurve],
    notch: i32,
    speed: si::Velocity,
) -> anyhow::Result<si::Acceleration> {
    if curves.is_empty() {
        return Ok(si::Acceleration::ZERO);
    }
    let idx = (notch.max(1) as usize).min(curves.len()) - 1;
    curves[idx].deceleration_at(speed)
}

/// Braking deceleration from the cylinder pressure, scaled from the
/// deceleration at service maximum pressure.  Zero when the cylinder is empty.
pub fn brake_deceleration(
    brake_cylinder: &BrakeCylinder,
    curves: &[DecelerationCurve],
    notch: i32,
    speed: si::Velocity,
) -> anyhow::Result<si::Acceleration> {
    let ratio = brake_cylinder.pressure_ratio();
    if ratio == 0.0 {
        return Ok(si::Acceleration::ZERO);
    }
    Ok(deceleration_at_service_maximum(curves, notch, speed)? * ratio)
}
