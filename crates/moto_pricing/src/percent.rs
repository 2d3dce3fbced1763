use std::borrow::Cow;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A percentage stored internally as a fraction in `[0, 1]`.
///
/// Config files historically carried a mix of scales: `10` meaning 10%
/// next to `0.1` meaning the same thing. The ambiguity is resolved once,
/// here, at the configuration boundary: raw values above 1 are read as
/// percentage points, everything else as an already-fractional value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent(f64);

impl Percent {
    pub const ZERO: Percent = Percent(0.0);

    pub fn from_raw(raw: f64) -> Self {
        if !raw.is_finite() || raw <= 0.0 {
            return Percent::ZERO;
        }

        let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
        Percent(fraction.min(1.0))
    }

    pub fn from_fraction(fraction: f64) -> Self {
        Percent(fraction.clamp(0.0, 1.0))
    }

    pub fn fraction(&self) -> f64 {
        self.0
    }

    pub fn points(&self) -> f64 {
        self.0 * 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Points without a trailing `.0`, for labels like `"10%"` or `"2.5%"`.
    pub fn points_label(&self) -> String {
        let points = self.points();
        if points.fract() == 0.0 {
            format!("{}", points as i64)
        } else {
            format!("{points}")
        }
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.points())
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Ok(Percent::from_raw(raw))
    }
}

impl JsonSchema for Percent {
    fn schema_name() -> Cow<'static, str> {
        "Percent".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        f64::json_schema(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_are_scaled_down() {
        assert_eq!(Percent::from_raw(10.0).fraction(), 0.1);
        assert_eq!(Percent::from_raw(19.0).points(), 19.0);
    }

    #[test]
    fn test_fractions_pass_through() {
        assert_eq!(Percent::from_raw(0.25).fraction(), 0.25);
        assert_eq!(Percent::from_raw(1.0).fraction(), 1.0);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        assert_eq!(Percent::from_raw(-5.0), Percent::ZERO);
        assert_eq!(Percent::from_raw(250.0).fraction(), 1.0);
        assert_eq!(Percent::from_raw(f64::NAN), Percent::ZERO);
    }

    #[test]
    fn test_points_label() {
        assert_eq!(Percent::from_raw(10.0).points_label(), "10");
        assert_eq!(Percent::from_raw(2.5).points_label(), "2.5");
    }

    #[test]
    fn test_serde_round_trip_in_points() {
        let json = serde_json::to_string(&Percent::from_raw(12.0)).unwrap();
        assert_eq!(json, "12.0");

        let back: Percent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fraction(), 0.12);
    }
}
