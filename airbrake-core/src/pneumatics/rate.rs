use super::*;

/// Pressure quantum below which two pressures are treated as equal.
pub const TOLERANCE: si::Pressure = si::Pressure {
    dimension: PhantomData,
    units: PhantomData,
    value: 5000.0,
};

/// Rate limiter for every pressure exchange.
///
/// `ratio` is the pressure differential normalized by a reference capacity
/// and is clamped to `[0, 1]`.  The returned flow is `nominal * r * (2 - r)`:
/// zero at zero differential, never more than `nominal`, with a slope that
/// flattens as the differential saturates.  Because the flow shrinks in
/// proportion to the differential near equilibrium, exchanges settle
/// asymptotically instead of overshooting.
///
/// # Arguments
/// - `ratio`: normalized pressure differential
/// - `nominal`: largest flow this tick, i.e. rate × dt
pub fn get_rate(ratio: f64, nominal: si::Pressure) -> si::Pressure {
    let r = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    };
    nominal.max(si::Pressure::ZERO) * (r * (2.0 - r))
}

/// Largest pressure change a `rate` (Pa/s) can produce over `dt`
pub fn nominal_flow(rate: f64, dt: si::Time) -> si::Pressure {
    rate * dt.get::<si::second>() * uc::PASCAL
}

/// `a > b + TOLERANCE`
pub fn exceeds(a: si::Pressure, b: si::Pressure) -> bool {
    a > b + TOLERANCE
}
