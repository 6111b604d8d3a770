//! Module containing miscellaneous utility functions.

use crate::imports::*;

/// Returns `"[file:line]"` for the call site, followed by the debug output of
/// an optional expression.  Used to prefix error messages.
#[macro_export]
macro_rules! format_dbg {
    ($dbg_expr:expr) => {
        format!(
            "[{}:{}] {}: {:?}",
            file!(),
            line!(),
            stringify!($dbg_expr),
            $dbg_expr
        )
    };
    () => {
        format!("[{}:{}]", file!(), line!())
    };
}

/// Early-returns an [Error::InitError](crate::error::Error::InitError) with
/// the formatted message unless the condition holds
#[macro_export]
macro_rules! init_ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::Error::InitError(format!($($arg)+)));
        }
    };
}

/// Returns true if `val1` and `val2` are within a relative or absolute
/// `epsilon` of each other, with `epsilon` defaulting to 1e-8
pub fn almost_eq(val1: f64, val2: f64, epsilon: Option<f64>) -> bool {
    let epsilon = epsilon.unwrap_or(1e-8);
    ((val2 - val1) / (val1 + val2)).abs() < epsilon || (val2 - val1).abs() < epsilon
}

/// Returns true if `data` is sorted in non-decreasing order
pub fn is_sorted<T: PartialOrd>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

/// Linear interpolation of `x` over the table `(x_data, y_data)`.  Values of
/// `x` outside the table take the value at the nearest end.
pub fn interp1d(x: f64, x_data: &[f64], y_data: &[f64]) -> anyhow::Result<f64> {
    ensure!(
        x_data.len() == y_data.len(),
        "{}\n`x_data` and `y_data` must have the same length",
        format_dbg!((x_data.len(), y_data.len()))
    );
    let (first, last) = match (x_data.first(), x_data.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => bail!("{}\nCannot interpolate over an empty table", format_dbg!()),
    };
    if x <= first {
        return Ok(y_data[0]);
    }
    if x >= last {
        return Ok(y_data[y_data.len() - 1]);
    }
    let idx = x_data
        .windows(2)
        .position(|w| x >= w[0] && x < w[1])
        .with_context(|| format_dbg!(x))?;
    let (x0, x1) = (x_data[idx], x_data[idx + 1]);
    let (y0, y1) = (y_data[idx], y_data[idx + 1]);
    if x1 == x0 {
        return Ok(y0);
    }
    Ok(y0 + (x - x0) / (x1 - x0) * (y1 - y0))
}

#[ext(PressureExt)]
pub impl si::Pressure {
    /// Restricts the pressure to `[lower, upper]`
    fn clamp_within(self, lower: si::Pressure, upper: si::Pressure) -> si::Pressure {
        self.max(lower).min(upper)
    }

    /// Ratio of `self` to `reference`, or zero when `reference` is not
    /// positive
    fn ratio_to(self, reference: si::Pressure) -> f64 {
        if reference > si::Pressure::ZERO {
            (self / reference).get::<si::ratio>()
        } else {
            0.0
        }
    }
}
