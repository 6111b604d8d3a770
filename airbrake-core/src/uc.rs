//! Unit constants for building quantities with multiplication syntax, e.g.
//! `440.0 * uc::KPA` or `uc::S * 0.1`

use crate::si;
use std::marker::PhantomData;

macro_rules! unit_const {
    ($($name:ident: $quantity:ident = $value:expr;)+) => {
        $(
            pub const $name: si::$quantity = si::$quantity {
                dimension: PhantomData,
                units: PhantomData,
                value: $value,
            };
        )+
    };
}

unit_const! {
    PASCAL: Pressure = 1.0;
    KPA: Pressure = 1.0e3;
    S: Time = 1.0;
    MPS: Velocity = 1.0;
    KPH: Velocity = 1.0 / 3.6;
    MPS2: Acceleration = 1.0;
    M3: Volume = 1.0;
    R: Ratio = 1.0;
}

/// Standard atmospheric pressure, the reference for free air volumes
pub const ATMOSPHERE: si::Pressure = si::Pressure {
    dimension: PhantomData,
    units: PhantomData,
    value: 101_325.0,
};
