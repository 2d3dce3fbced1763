use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Km(f64);

impl Km {
    pub const ZERO: Km = Km(0.0);

    pub fn new(value: f64) -> Self {
        Km(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Eq for Km {}

impl PartialOrd for Km {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Km {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Km {
    fn from(value: f64) -> Self {
        Km::new(value)
    }
}

impl Add for Km {
    type Output = Km;

    fn add(self, other: Km) -> Km {
        Km(self.0 + other.0)
    }
}

impl AddAssign for Km {
    fn add_assign(&mut self, other: Km) {
        self.0 += other.0;
    }
}

impl Sum for Km {
    fn sum<I: Iterator<Item = Km>>(iter: I) -> Km {
        iter.fold(Km::ZERO, |acc, x| acc + x)
    }
}
