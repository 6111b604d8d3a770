#![allow(unused_imports)]

pub(crate) use crate::error::Error;
pub(crate) use crate::si;
pub(crate) use crate::traits::*;
pub(crate) use crate::uc;
pub(crate) use crate::utils;
pub(crate) use crate::utils::{almost_eq, interp1d, is_sorted, PressureExt};
pub(crate) use anyhow::{anyhow, bail, ensure, Context};
pub(crate) use derive_more::{From, IsVariant};
pub(crate) use duplicate::duplicate_item;
pub(crate) use easy_ext::ext;
pub(crate) use rand::Rng;
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use std::ffi::OsStr;
pub(crate) use std::fmt;
pub(crate) use std::fs::File;
pub(crate) use std::marker::PhantomData;
pub(crate) use std::path::Path;
pub(crate) use uom::ConstZero;
