//! Pressure exchanges shared by several brake types.  Every exchange is rate
//! limited through [get_rate] and applies half of the computed transfer per
//! step, which keeps the explicit update stable at large time steps.

use super::*;

/// Scales a transfer pair so that the drawn side `s` does not exceed
/// `available`
fn limit_draw(
    r: si::Pressure,
    s: si::Pressure,
    available: si::Pressure,
) -> (si::Pressure, si::Pressure) {
    let available = available.max(si::Pressure::ZERO);
    if s > available {
        (r * available.ratio_to(s), available)
    } else {
        (r, s)
    }
}

/// Proximity factor of a triple valve: grows from zero at one tolerance of
/// differential to one at two tolerances
pub(crate) fn proximity(differential: si::Pressure) -> f64 {
    ((differential - TOLERANCE) / TOLERANCE)
        .get::<si::ratio>()
        .clamp(0.0, 1.0)
}

/// Vents the equalizing reservoir toward zero at its service or emergency
/// rate
pub(crate) fn exhaust_equalizing_reservoir(
    er: &mut EqualizingReservoir,
    emergency: bool,
    dt: si::Time,
) {
    let rate = if emergency {
        er.emergency_rate
    } else {
        er.service_rate
    };
    let r = get_rate(
        er.current_pressure.ratio_to(er.normal_pressure),
        nominal_flow(rate, dt),
    )
    .min(er.current_pressure);
    er.add_pressure(-r);
}

/// Recharges the equalizing reservoir from the main reservoir toward its
/// normal pressure
pub(crate) fn charge_equalizing_reservoir(
    er: &mut EqualizingReservoir,
    mr: &mut MainReservoir,
    dt: si::Time,
) {
    let d = er.normal_pressure - er.current_pressure;
    if d <= si::Pressure::ZERO {
        return;
    }
    let r = get_rate(
        d.ratio_to(er.normal_pressure),
        nominal_flow(er.charge_rate, dt),
    )
    .min(d)
    .min((mr.current_pressure - er.current_pressure).max(si::Pressure::ZERO));
    let s = r * mr.equalizing_reservoir_coefficient;
    let (r, s) = limit_draw(r, s, mr.current_pressure);
    er.add_pressure(0.5 * r);
    mr.add_pressure(-0.5 * s);
}

/// Drives the brake pipe of a lead car toward the equalizing reservoir,
/// venting to atmosphere or charging from the main reservoir
pub(crate) fn follow_equalizing_reservoir(
    bp: &mut BrakePipe,
    er: &EqualizingReservoir,
    mr: &mut MainReservoir,
    emergency: bool,
    dt: si::Time,
) {
    if exceeds(bp.current_pressure, er.current_pressure) {
        let rate = if emergency {
            bp.emergency_rate
        } else {
            bp.service_rate
        };
        let d = bp.current_pressure - er.current_pressure;
        let r = get_rate(d.ratio_to(er.normal_pressure), nominal_flow(rate, dt)).min(d);
        bp.add_pressure(-r);
    } else if exceeds(er.current_pressure, bp.current_pressure) {
        let d = er.current_pressure - bp.current_pressure;
        let r = get_rate(
            d.ratio_to(er.normal_pressure),
            nominal_flow(bp.charge_rate, dt),
        )
        .min(d)
        .min(bp.headroom());
        let s = r * mr.brake_pipe_coefficient;
        let (r, s) = limit_draw(r, s, mr.current_pressure);
        bp.add_pressure(0.5 * r);
        mr.add_pressure(-0.5 * s);
    }
}

/// Recharges the auxiliary reservoir from the brake pipe when the pipe is at
/// least one tolerance above it.
///
/// # Arguments
/// - `rate_scale`: multiplier on the auxiliary reservoir charge rate
/// - `proximity`: triple valve proximity factor scaling the differential
pub(crate) fn refill_auxiliary_reservoir(
    aux: &mut AuxiliaryReservoir,
    bp: &mut BrakePipe,
    rate_scale: f64,
    proximity: f64,
    dt: si::Time,
) {
    if !exceeds(bp.current_pressure, aux.current_pressure) {
        return;
    }
    let d = bp.current_pressure - aux.current_pressure;
    let room = aux.headroom();
    let r = get_rate(
        (d * proximity).ratio_to(aux.maximum_pressure),
        nominal_flow(rate_scale * aux.charge_rate, dt),
    )
    .min(bp.current_pressure)
    .min(d)
    .min(room);
    let s = r / aux.brake_pipe_coefficient;
    let (r, s) = limit_draw(r, s, bp.current_pressure);
    let (r, s) = limit_draw(r, s, room);
    aux.add_pressure(0.5 * r);
    bp.add_pressure(-0.5 * s);
}

/// Fills the brake cylinder from the auxiliary reservoir toward `target`
/// without overshooting it
pub(crate) fn fill_cylinder_from_auxiliary(
    bc: &mut BrakeCylinder,
    aux: &mut AuxiliaryReservoir,
    target: si::Pressure,
    emergency: bool,
    dt: si::Time,
) {
    let d = (aux.current_pressure - bc.current_pressure).max(si::Pressure::ZERO);
    if d > si::Pressure::ZERO {
        let f = aux.brake_cylinder_coefficient;
        let r = get_rate(
            d.ratio_to(bc.emergency_maximum_pressure),
            nominal_flow(2.0 * bc.charge_rate(emergency) * f, dt),
        )
        .min(aux.current_pressure)
        .min(d);
        let s = r / f;
        let (r, s) = limit_draw(r, s, d);
        let (r, s) = limit_draw(
            r,
            s,
            2.0 * (target.min(bc.emergency_maximum_pressure) - bc.current_pressure),
        );
        aux.add_pressure(-0.5 * r);
        bc.add_pressure(0.5 * s);
    }
    bc.rearm_sound();
}

/// Fills the brake cylinder directly from the main reservoir toward
/// `target`.  `coefficient` is the main reservoir draw per unit of cylinder
/// gain.
pub(crate) fn fill_cylinder_from_main(
    bc: &mut BrakeCylinder,
    mr: &mut MainReservoir,
    target: si::Pressure,
    coefficient: f64,
    emergency: bool,
    dt: si::Time,
) {
    let pm = target.min(mr.current_pressure);
    let d = (pm - bc.current_pressure).max(si::Pressure::ZERO);
    let r = get_rate(
        d.ratio_to(bc.emergency_maximum_pressure),
        nominal_flow(2.0 * bc.charge_rate(emergency), dt),
    )
    .min(d);
    let s = r * coefficient;
    let (r, s) = limit_draw(r, s, mr.current_pressure);
    bc.add_pressure(0.5 * r);
    mr.add_pressure(-0.5 * s);
    bc.rearm_sound();
}

/// Moves air between the auxiliary reservoir and the brake cylinder of an
/// automatic brake while the pipe is below the auxiliary reservoir.  The
/// valve has one port size, so both directions flow at the service charge
/// rate whether or not the emergency brake is applied.
pub(crate) fn triple_valve_apply(
    bc: &mut BrakeCylinder,
    aux: &mut AuxiliaryReservoir,
    dt: si::Time,
) {
    let f = aux.brake_cylinder_coefficient;
    if exceeds(bc.current_pressure, aux.current_pressure) {
        // cylinder above reservoir, air flows back
        let d = bc.current_pressure - aux.current_pressure;
        let u = proximity(d);
        let r = get_rate(
            (d * u).ratio_to(aux.maximum_pressure),
            nominal_flow(bc.service_charge_rate * f, dt),
        )
        .min(aux.headroom())
        .min(d);
        let s = r / f;
        let (r, s) = limit_draw(r, s, d);
        let (r, s) = limit_draw(r, s, bc.current_pressure);
        aux.add_pressure(0.5 * r);
        bc.add_pressure(-0.5 * s);
    } else if exceeds(aux.current_pressure, bc.current_pressure) {
        let d = aux.current_pressure - bc.current_pressure;
        let u = proximity(d);
        let r = get_rate(
            (d * u).ratio_to(aux.maximum_pressure),
            nominal_flow(bc.service_charge_rate * f, dt),
        )
        .min(aux.current_pressure)
        .min(d);
        let s = r / f;
        let (r, s) = limit_draw(r, s, d);
        let (r, s) = limit_draw(r, s, bc.headroom());
        aux.add_pressure(-0.5 * r);
        bc.add_pressure(0.5 * s);
    }
    bc.rearm_sound();
}

/// Exhausts the brake cylinder of an automatic brake while the pipe is above
/// the auxiliary reservoir
pub(crate) fn triple_valve_release(
    bc: &mut BrakeCylinder,
    proximity: f64,
    dt: si::Time,
) -> Option<AirSound> {
    let emax = bc.emergency_maximum_pressure;
    let r = get_rate(
        (bc.current_pressure * proximity).ratio_to(emax),
        nominal_flow(bc.release_rate, dt),
    )
    .min(bc.current_pressure);
    bc.add_pressure(-r);
    let threshold = (0.8 * bc.current_pressure - 0.2 * emax).max(si::Pressure::ZERO);
    bc.release_cue(r, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_draw() {
        let (r, s) = limit_draw(10.0 * uc::KPA, 20.0 * uc::KPA, 5.0 * uc::KPA);
        assert!(almost_eq(r.get::<si::kilopascal>(), 2.5, None));
        assert!(almost_eq(s.get::<si::kilopascal>(), 5.0, None));
        let (r, s) = limit_draw(10.0 * uc::KPA, 20.0 * uc::KPA, 50.0 * uc::KPA);
        assert_eq!((r, s), (10.0 * uc::KPA, 20.0 * uc::KPA));
    }

    #[test]
    fn test_proximity() {
        assert_eq!(proximity(TOLERANCE), 0.0);
        assert!(almost_eq(proximity(1.5 * TOLERANCE), 0.5, None));
        assert_eq!(proximity(10.0 * TOLERANCE), 1.0);
    }

    #[test]
    fn test_equalizing_reservoir_charge_draws_main() {
        let mut er = EqualizingReservoir::new(50e3, 250e3, 200e3, 500.0 * uc::KPA).unwrap();
        er.current_pressure = 300.0 * uc::KPA;
        let mut mr = MainReservoir::with_pressure(
            690.0 * uc::KPA,
            780.0 * uc::KPA,
            0.01,
            0.075,
            700.0 * uc::KPA,
        )
        .unwrap();
        charge_equalizing_reservoir(&mut er, &mut mr, 0.1 * uc::S);
        assert!(er.current_pressure > 300.0 * uc::KPA);
        assert!(mr.current_pressure < 700.0 * uc::KPA);
    }

    #[test]
    fn test_cylinder_fill_does_not_overshoot() {
        let mut bc =
            BrakeCylinder::new(440.0 * uc::KPA, 440.0 * uc::KPA, 90e3, 300e3, 200e3).unwrap();
        let mut aux = AuxiliaryReservoir::new(480.0 * uc::KPA, 200e3, 0.5, 0.5).unwrap();
        let target = 100.0 * uc::KPA;
        for _ in 0..200 {
            fill_cylinder_from_auxiliary(&mut bc, &mut aux, target, true, 1.0 * uc::S);
            assert!(bc.current_pressure <= target);
        }
    }

    #[test]
    fn test_triple_valve_fills_at_service_rate() {
        // emergency charge rate is more than three times the service rate
        let mut bc =
            BrakeCylinder::new(440.0 * uc::KPA, 440.0 * uc::KPA, 90e3, 300e3, 200e3).unwrap();
        let mut aux = AuxiliaryReservoir::new(480.0 * uc::KPA, 200e3, 0.5, 0.5).unwrap();
        triple_valve_apply(&mut bc, &mut aux, 0.1 * uc::S);
        // 90 kPa/s * 0.5 * 0.1 s drawn, half of r / f applied
        assert!(almost_eq(bc.current_pressure.get::<si::pascal>(), 4500.0, None));
        assert!(almost_eq(
            aux.current_pressure.get::<si::pascal>(),
            480_000.0 - 2250.0,
            None
        ));
    }
}
