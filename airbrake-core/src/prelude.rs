pub use crate::car_brake::{
    AirBrakeHandleState, AutomaticAirBrake, BrakeHandle, BrakeOutput, BrakeType, CarBrakeTrait,
    CarBrakeType, DecelerationCurve, ElectricCommandBrake, ElectromagneticStraightAirBrake,
    ElectropneumaticType, MotorBrake, StartMode, TrainHandles, VacuumBrake,
};
pub use crate::consist::{
    BrakeSystemType, Consist, PressureDistribution, TrainBrakeConfig, Vehicle, VehicleOutput,
    VehicleState, VehicleStateHistoryVec,
};
pub use crate::error::Error;
pub use crate::pneumatics::{
    get_rate, AirSound, AuxiliaryReservoir, BrakeCylinder, BrakePipe, Compressor,
    CompressorSound, EqualizingReservoir, MainReservoir, Reservoir, StraightAirPipe, TOLERANCE,
};
pub use crate::traits::{Init, SerdeAPI};
