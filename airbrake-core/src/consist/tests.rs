use super::*;
use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn released(maximum_notch: i32) -> TrainHandles {
    TrainHandles::new(BrakeHandle::new(0, maximum_notch), false, 0)
}

fn build(config: &TrainBrakeConfig) -> Consist {
    config.build(&mut ChaCha8Rng::seed_from_u64(7)).unwrap()
}

fn pipe_pressures(consist: &Consist) -> Vec<f64> {
    consist
        .vehicles
        .iter()
        .map(|v| v.car_brake.brake_pipe().current_pressure.get::<si::pascal>())
        .collect()
}

#[test]
fn test_default_config_builds() {
    let config = TrainBrakeConfig::default();
    assert_eq!(config.operating_pressure(), 490.0 * uc::KPA);
    let consist = build(&config);
    assert_eq!(consist.len(), 4);
    assert_eq!(consist.maximum_notch, 8);
    let types: Vec<BrakeType> = consist.vehicles.iter().map(|v| v.brake_type()).collect();
    assert_eq!(
        types,
        vec![
            BrakeType::Main,
            BrakeType::Auxiliary,
            BrakeType::Auxiliary,
            BrakeType::Main
        ]
    );
    for vehicle in consist.vehicles.iter() {
        let mr = &vehicle.main_reservoir;
        assert!(mr.current_pressure >= config.main_reservoir_minimum_pressure);
        assert!(mr.current_pressure <= config.main_reservoir_maximum_pressure);
        assert_relative_eq!(mr.brake_pipe_coefficient, 0.075 / 4.0);
        match &vehicle.car_brake {
            CarBrakeType::ElectromagneticStraightAirBrake(b) => {
                assert_relative_eq!(
                    b.equalizing_reservoir.normal_pressure.get::<si::pascal>(),
                    1.005 * 490e3
                );
                assert_relative_eq!(b.auxiliary_reservoir.brake_cylinder_coefficient, 0.1);
                assert_relative_eq!(b.brake_cylinder.service_charge_rate, 90e3);
            }
            other => panic!("unexpected brake {other}"),
        }
    }
}

#[test]
fn test_seeded_builds_match() {
    let config = TrainBrakeConfig::default();
    assert_eq!(build(&config), build(&config));
}

#[test]
fn test_operating_pressure_rules() {
    let mut config = TrainBrakeConfig {
        brake_system: BrakeSystemType::AutomaticAirBrake,
        ..Default::default()
    };
    assert_relative_eq!(config.operating_pressure().get::<si::pascal>(), 627.5e3);
    assert_eq!(config.maximum_notch(), 2);

    config.brake_system = BrakeSystemType::VacuumBrake;
    config.brake_cylinder_emergency_maximum_pressure = 500.0 * uc::KPA;
    config.brake_cylinder_service_maximum_pressure = 480.0 * uc::KPA;
    assert_relative_eq!(config.operating_pressure().get::<si::pascal>(), 642.5e3);

    config.brake_pipe_pressure = Some(500.0 * uc::KPA);
    assert_eq!(config.operating_pressure(), 500.0 * uc::KPA);
}

#[test]
fn test_derived_motor_deceleration() {
    let config = TrainBrakeConfig::default();
    assert_relative_eq!(
        config
            .motor_deceleration()
            .unwrap()
            .get::<si::meter_per_second_squared>(),
        (0.7222_f64 * 0.2777).sqrt(),
        epsilon = 1e-12
    );
}

#[test]
fn test_invalid_config_rejected() {
    let config = TrainBrakeConfig {
        driver_car: 9,
        ..Default::default()
    };
    assert!(config.build(&mut ChaCha8Rng::seed_from_u64(7)).is_err());

    let config = TrainBrakeConfig {
        brake_cylinder_service_maximum_pressure: 500.0 * uc::KPA,
        ..Default::default()
    };
    assert!(config.build(&mut ChaCha8Rng::seed_from_u64(7)).is_err());
}

#[test]
fn test_electric_command_cars_all_main() {
    let config = TrainBrakeConfig {
        brake_system: BrakeSystemType::ElectricCommandBrake,
        ..Default::default()
    };
    let consist = build(&config);
    for vehicle in consist.vehicles.iter() {
        assert!(vehicle.brake_type().is_main());
        assert_eq!(
            vehicle.car_brake.brake_pipe().current_pressure,
            si::Pressure::ZERO
        );
    }
}

#[test]
fn test_averaging_equalizes_pipes() {
    let mut consist = build(&TrainBrakeConfig::default());
    consist.vehicles[1]
        .car_brake
        .brake_pipe_mut()
        .set_pressure(400.0 * uc::KPA);
    consist
        .update_brake_system(si::Time::ZERO, si::Velocity::ZERO, &released(8))
        .unwrap();
    for p in pipe_pressures(&consist) {
        assert_relative_eq!(p, 467.5e3, max_relative = 1e-12);
    }
}

#[test]
fn test_derailment_vents_neighbours() {
    let mut intact = build(&TrainBrakeConfig::default());
    let mut derailed = intact.clone();
    derailed.vehicles[2].derailed = true;
    let dt = 0.01 * uc::S;
    intact
        .update_brake_system(dt, si::Velocity::ZERO, &released(8))
        .unwrap();
    derailed
        .update_brake_system(dt, si::Velocity::ZERO, &released(8))
        .unwrap();
    // cars 1 and 3 vent once, car 2 twice, shared over four cars
    let expected = 4.0 * BRAKE_PIPE_LEAK_RATE * 0.01 / 4.0;
    let diff = pipe_pressures(&intact)[0] - pipe_pressures(&derailed)[0];
    assert_relative_eq!(diff, expected, max_relative = 1e-9);
}

#[test]
fn test_propagating_feeds_trailing_cars() {
    let config = TrainBrakeConfig {
        motor_cars: vec![true, false, false, false],
        pressure_distribution: PressureDistribution::Propagating,
        ..Default::default()
    };
    let mut consist = build(&config);
    for vehicle in consist.vehicles.iter_mut() {
        let pipe = vehicle.car_brake.brake_pipe_mut();
        pipe.leak_rate = 0.0;
    }
    for vehicle in consist.vehicles.iter_mut().skip(1) {
        vehicle
            .car_brake
            .brake_pipe_mut()
            .set_pressure(300.0 * uc::KPA);
    }
    let total_before: f64 = pipe_pressures(&consist).iter().sum();
    consist
        .update_brake_system(0.1 * uc::S, si::Velocity::ZERO, &released(8))
        .unwrap();
    let pipes = pipe_pressures(&consist);
    assert_relative_eq!(pipes.iter().sum::<f64>(), total_before, max_relative = 1e-12);
    assert!(pipes[1..].iter().all(|p| *p > 300e3));

    for _ in 0..200 {
        consist
            .update_brake_system(0.1 * uc::S, si::Velocity::ZERO, &released(8))
            .unwrap();
    }
    assert!(pipe_pressures(&consist).iter().all(|p| *p > 480e3));
}

#[test]
fn test_propagating_stops_at_next_main_car() {
    let config = TrainBrakeConfig {
        motor_cars: vec![true, false, true, false],
        pressure_distribution: PressureDistribution::Propagating,
        ..Default::default()
    };
    let step = |drain_last: bool| {
        let mut consist = build(&config);
        for vehicle in consist.vehicles.iter_mut() {
            vehicle.car_brake.brake_pipe_mut().leak_rate = 0.0;
        }
        if drain_last {
            consist.vehicles[3]
                .car_brake
                .brake_pipe_mut()
                .set_pressure(300.0 * uc::KPA);
        }
        consist
            .update_brake_system(0.1 * uc::S, si::Velocity::ZERO, &released(8))
            .unwrap();
        pipe_pressures(&consist)
    };
    let charged = step(false);
    let drained = step(true);
    // car 3 is fed by car 2 only
    assert_eq!(drained[0], charged[0]);
    assert_eq!(drained[1], charged[1]);
    assert!(drained[2] < charged[2]);
    assert!(drained[3] > 300e3);
}

#[test]
fn test_initialize_returns_start_handles() {
    let mut consist = build(&TrainBrakeConfig::default());
    let handles = consist.initialize(StartMode::ServiceBrakesApplied);
    // 70% of 8 notches, rounded
    assert_eq!(handles.brake.actual, 6);
    assert_eq!(handles.reverser, 1);
    assert!(!handles.emergency_brake);
    for vehicle in consist.vehicles.iter() {
        assert_eq!(vehicle.state.brake_cylinder_pressure, 440.0 * uc::KPA);
    }
    let handles = consist.initialize(StartMode::EmergencyBrakesApplied);
    assert!(handles.emergency_brake);
    let handles = consist.initialize(StartMode::Default);
    assert_eq!(handles.brake.actual, 0);
    assert!(!handles.emergency_brake);
}

#[test]
fn test_automatic_service_start_uses_service_state() {
    let config = TrainBrakeConfig {
        brake_system: BrakeSystemType::AutomaticAirBrake,
        ..Default::default()
    };
    let mut consist = build(&config);
    let handles = consist.initialize(StartMode::ServiceBrakesApplied);
    assert_eq!(
        AirBrakeHandleState::from(&handles.brake),
        AirBrakeHandleState::Service
    );
}

#[test]
fn test_compressor_runs_on_main_cars_first() {
    let mut consist = build(&TrainBrakeConfig::default());
    for vehicle in consist.vehicles.iter_mut() {
        vehicle.main_reservoir.current_pressure = 600.0 * uc::KPA;
    }
    let outputs = consist
        .update_brake_system(0.1 * uc::S, si::Velocity::ZERO, &released(8))
        .unwrap();
    assert_eq!(outputs[0].compressor_sounds, vec![CompressorSound::Start]);
    assert!(outputs[1].compressor_sounds.is_empty());
    assert!(consist.vehicles[0].state.compressor_enabled);
    assert!(!consist.vehicles[1].state.compressor_enabled);
}

#[test]
fn test_automatic_train_emergency() {
    let config = TrainBrakeConfig {
        brake_system: BrakeSystemType::AutomaticAirBrake,
        motor_cars: vec![true, false, false, false],
        ..Default::default()
    };
    let mut consist = build(&config);
    let mut handles = consist.initialize(StartMode::Default);
    handles.emergency_brake = true;
    let mut outputs = vec![];
    for _ in 0..400 {
        outputs = consist
            .update_brake_system(0.1 * uc::S, 10.0 * uc::MPS, &handles)
            .unwrap();
    }
    for vehicle in consist.vehicles.iter() {
        assert!(vehicle.state.brake_cylinder_pressure > 400.0 * uc::KPA);
    }
    assert!(Consist::mean_deceleration(&outputs) > si::Acceleration::ZERO);
    assert!(outputs.iter().all(|o| o.motor_deceleration == si::Acceleration::ZERO));
}

#[test]
fn test_history_saved_at_interval() {
    let config = TrainBrakeConfig {
        save_interval: Some(2),
        ..Default::default()
    };
    let mut consist = build(&config);
    for _ in 0..10 {
        consist
            .update_brake_system(0.1 * uc::S, si::Velocity::ZERO, &released(8))
            .unwrap();
    }
    for vehicle in consist.vehicles.iter() {
        assert_eq!(vehicle.history.len(), 5);
        assert_eq!(vehicle.history.i, vec![2, 4, 6, 8, 10]);
    }
    consist.set_save_interval(None);
    assert_eq!(consist.vehicles[0].get_save_interval(), None);
}

#[test]
fn test_config_json_round_trip() {
    let config = TrainBrakeConfig::default();
    let back = TrainBrakeConfig::from_json(config.to_json().unwrap(), false).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_deserialized_config_is_validated() {
    let config = TrainBrakeConfig {
        brake_cylinder_service_maximum_pressure: 500.0 * uc::KPA,
        ..Default::default()
    };
    let json = config.to_json().unwrap();
    assert!(TrainBrakeConfig::from_json(&json, false).is_err());
    assert!(TrainBrakeConfig::from_json(&json, true).is_ok());
    let encoded = config.to_bincode().unwrap();
    assert!(TrainBrakeConfig::from_bincode(&encoded, false).is_err());
}

#[test]
fn test_consist_bincode_round_trip() {
    let mut consist = build(&TrainBrakeConfig::default());
    consist
        .update_brake_system(0.1 * uc::S, 10.0 * uc::MPS, &released(8))
        .unwrap();
    let back = Consist::from_bincode(&consist.to_bincode().unwrap(), false).unwrap();
    assert_eq!(back, consist);
}

#[test]
fn test_to_from_file() {
    let tempdir = tempfile::tempdir().unwrap();
    let consist = build(&TrainBrakeConfig::default());
    for name in ["consist.yaml", "consist.bin"] {
        let path = tempdir.path().join(name);
        consist.to_file(&path).unwrap();
        assert_eq!(Consist::from_file(&path, false).unwrap(), consist);
    }

    let config = TrainBrakeConfig {
        brake_system: BrakeSystemType::VacuumBrake,
        ..Default::default()
    };
    let path = tempdir.path().join("config.json");
    config.to_file(&path).unwrap();
    assert_eq!(TrainBrakeConfig::from_file(&path, false).unwrap(), config);

    assert!(consist.to_file(tempdir.path().join("consist.csv")).is_err());
    assert!(Consist::from_file(tempdir.path().join("missing.yaml"), false).is_err());
}
