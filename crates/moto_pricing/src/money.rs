use std::{
    iter::Sum,
    ops::{Add, AddAssign, Sub},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A CLP amount. The peso has no subunit, so whole pesos are exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize, JsonSchema,
)]
pub struct Pesos(i64);

impl Pesos {
    pub const ZERO: Pesos = Pesos(0);

    pub fn new(value: i64) -> Self {
        Pesos(value)
    }

    /// Rounds a fractional amount to the nearest whole peso.
    pub fn round(value: f64) -> Self {
        Pesos(value.round() as i64)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl From<i64> for Pesos {
    fn from(value: i64) -> Self {
        Pesos::new(value)
    }
}

impl Add for Pesos {
    type Output = Pesos;

    fn add(self, other: Pesos) -> Pesos {
        Pesos(self.0 + other.0)
    }
}

impl AddAssign for Pesos {
    fn add_assign(&mut self, other: Pesos) {
        self.0 += other.0;
    }
}

impl Sub for Pesos {
    type Output = Pesos;

    fn sub(self, other: Pesos) -> Pesos {
        Pesos(self.0 - other.0)
    }
}

impl Sum for Pesos {
    fn sum<I: Iterator<Item = Pesos>>(iter: I) -> Pesos {
        iter.fold(Pesos::ZERO, |acc, x| acc + x)
    }
}
