use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn test_main_reservoir(pressure: si::Pressure) -> MainReservoir {
    MainReservoir::with_pressure(690.0 * uc::KPA, 780.0 * uc::KPA, 0.01, 0.075, pressure).unwrap()
}

#[test]
fn test_main_reservoir_seeded_draw() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mr_a = MainReservoir::new(500.0 * uc::KPA, 600.0 * uc::KPA, 0.01, 0.075, &mut rng).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mr_b = MainReservoir::new(500.0 * uc::KPA, 600.0 * uc::KPA, 0.01, 0.075, &mut rng).unwrap();
    assert_eq!(mr_a, mr_b);
    assert!(mr_a.current_pressure >= 500.0 * uc::KPA);
    assert!(mr_a.current_pressure <= 600.0 * uc::KPA);

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..100 {
        let mr =
            MainReservoir::new(500.0 * uc::KPA, 600.0 * uc::KPA, 0.01, 0.075, &mut rng).unwrap();
        assert!(mr.current_pressure >= mr.minimum_pressure);
        assert!(mr.current_pressure <= mr.maximum_pressure);
    }
}

#[test]
fn test_main_reservoir_rejects_inverted_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let res = MainReservoir::new(600.0 * uc::KPA, 500.0 * uc::KPA, 0.01, 0.075, &mut rng);
    assert!(matches!(res, Err(Error::InitError(_))));
    assert!(MainReservoir::with_pressure(
        500.0 * uc::KPA,
        600.0 * uc::KPA,
        0.01,
        0.075,
        700.0 * uc::KPA
    )
    .is_err());
    assert!(MainReservoir::with_pressure(
        500.0 * uc::KPA,
        600.0 * uc::KPA,
        -0.01,
        0.075,
        550.0 * uc::KPA
    )
    .is_err());
}

#[test]
fn test_brake_cylinder_rejects_service_above_emergency() {
    let res = BrakeCylinder::new(500.0 * uc::KPA, 440.0 * uc::KPA, 90e3, 300e3, 200e3);
    assert!(matches!(res, Err(Error::InitError(_))));
    assert!(BrakeCylinder::new(440.0 * uc::KPA, 440.0 * uc::KPA, 90e3, 300e3, 200e3).is_ok());
}

#[test]
fn test_auxiliary_reservoir_rejects_zero_coefficient() {
    assert!(AuxiliaryReservoir::new(480.0 * uc::KPA, 200e3, 0.0, 0.1).is_err());
    assert!(AuxiliaryReservoir::new(480.0 * uc::KPA, 200e3, 0.5, 0.1).is_ok());
}

#[test]
fn test_set_pressure_clamps() {
    let mut er = EqualizingReservoir::new(50e3, 250e3, 200e3, 492.45 * uc::KPA).unwrap();
    er.set_pressure(1.0e6 * uc::PASCAL);
    assert_eq!(er.current_pressure, er.normal_pressure);
    er.add_pressure(-1.0e6 * uc::PASCAL);
    assert_eq!(er.current_pressure, si::Pressure::ZERO);
    assert!(er.is_within_bounds());
    assert_eq!(er.headroom(), er.normal_pressure);

    let mut mr = test_main_reservoir(700.0 * uc::KPA);
    mr.add_pressure(200.0 * uc::KPA);
    assert_eq!(mr.current_pressure, mr.maximum_pressure);
    // the cut-in pressure is not a floor
    mr.set_pressure(100.0 * uc::KPA);
    assert_eq!(mr.current_pressure, 100.0 * uc::KPA);
    assert!(mr.needs_charge());
}

#[test]
fn test_air_volume_scales_with_pressure() {
    let mut aux = AuxiliaryReservoir::new(480.0 * uc::KPA, 200e3, 0.5, 0.1).unwrap();
    let full = aux.air_volume();
    aux.set_pressure(240.0 * uc::KPA);
    assert!(almost_eq(
        (aux.air_volume() / full).get::<si::ratio>(),
        0.5,
        None
    ));
    aux.set_pressure(si::Pressure::ZERO);
    assert_eq!(aux.air_volume(), si::Volume::ZERO);
}

#[test]
fn test_brake_pipe_start_and_leak() {
    let bp = BrakePipe::new(490.0 * uc::KPA, 10e6, 1.5e6, 5e6, false).unwrap();
    assert_eq!(bp.current_pressure, bp.normal_pressure);
    let mut bp = BrakePipe::new(490.0 * uc::KPA, 10e6, 1.5e6, 5e6, true).unwrap();
    assert_eq!(bp.current_pressure, si::Pressure::ZERO);
    bp.set_pressure(100.0 * uc::KPA);
    bp.leak(0.1 * uc::S);
    assert!(bp.current_pressure < 100.0 * uc::KPA);
    bp.leak(10.0 * uc::S);
    assert_eq!(bp.current_pressure, si::Pressure::ZERO);
}

#[test]
fn test_straight_air_pipe_tracks_demand() {
    let mut sap = StraightAirPipe::new(300e3, 400e3, 200e3).unwrap();
    let target = 220.0 * uc::KPA;
    let reference = 440.0 * uc::KPA;
    let mut last = sap.current_pressure;
    for _ in 0..200 {
        sap.drive_toward(target, false, reference, 0.1 * uc::S);
        assert!(sap.current_pressure >= last);
        assert!(sap.current_pressure <= target);
        last = sap.current_pressure;
    }
    assert!(target - sap.current_pressure <= TOLERANCE);
    for _ in 0..200 {
        sap.drive_toward(si::Pressure::ZERO, true, reference, 0.1 * uc::S);
        assert!(sap.current_pressure >= si::Pressure::ZERO);
    }
    assert!(sap.current_pressure <= TOLERANCE);
}

#[test]
fn test_brake_cylinder_release_cue_fires_once() {
    let mut bc = BrakeCylinder::new(440.0 * uc::KPA, 440.0 * uc::KPA, 90e3, 300e3, 200e3).unwrap();
    bc.current_pressure = 300.0 * uc::KPA;
    let first = bc.release_toward(si::Pressure::ZERO, 0.1 * uc::S);
    assert_eq!(first, Some(AirSound::Zero));
    for _ in 0..300 {
        assert_eq!(bc.release_toward(si::Pressure::ZERO, 0.1 * uc::S), None);
        assert!(bc.current_pressure >= si::Pressure::ZERO);
    }
    // filling re-arms the cue
    bc.rearm_sound();
    bc.current_pressure = 438.0 * uc::KPA;
    let cue = bc.release_toward(200.0 * uc::KPA, 0.1 * uc::S);
    assert_eq!(cue, Some(AirSound::High));
}

#[test]
fn test_compressor_cycle() {
    let mut mr = test_main_reservoir(680.0 * uc::KPA);
    let mut compressor = Compressor::default();
    let dt = 0.1 * uc::S;
    let mut events = Vec::new();
    for _ in 0..400 {
        let before = mr.current_pressure;
        let charging = compressor.is_charging();
        for sound in compressor.update(dt, &mut mr).unwrap() {
            events.push(sound);
        }
        if charging {
            assert!(mr.current_pressure >= before);
        }
        assert!(mr.current_pressure <= mr.maximum_pressure);
    }
    assert_eq!(
        events,
        vec![
            CompressorSound::Start,
            CompressorSound::LoopStart,
            CompressorSound::LoopStop,
            CompressorSound::End
        ]
    );
    assert!(!compressor.is_charging());
    assert_eq!(mr.current_pressure, mr.maximum_pressure);
}

#[test]
fn test_compressor_loop_waits_for_warm_up() {
    let mut mr = test_main_reservoir(600.0 * uc::KPA);
    let mut compressor = Compressor::default();
    let dt = 1.0 * uc::S;
    assert_eq!(
        compressor.update(dt, &mut mr).unwrap(),
        vec![CompressorSound::Start]
    );
    for _ in 0..5 {
        assert!(compressor.update(dt, &mut mr).unwrap().is_empty());
    }
    assert_eq!(
        compressor.update(dt, &mut mr).unwrap(),
        vec![CompressorSound::LoopStart]
    );
}

#[test]
fn test_compressor_idle_above_cut_in() {
    let mut mr = test_main_reservoir(700.0 * uc::KPA);
    let mut compressor = Compressor::default();
    assert!(compressor.update(1.0 * uc::S, &mut mr).unwrap().is_empty());
    assert_eq!(mr.current_pressure, 700.0 * uc::KPA);
    assert!(compressor.update(-1.0 * uc::S, &mut mr).is_err());
}
