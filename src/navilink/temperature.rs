use crate::error::ValidationError;
use crate::navilink::packet::TemperatureUnit;

/// Celsius temperatures travel as one byte in half-degree steps. Fahrenheit
/// channels send whole degrees with no scaling at all, so the unit flag from
/// the channel record has to reach every conversion site.
pub fn from_byte(byte: u8) -> f64 {
    f64::from(byte >> 1) + if byte & 1 == 1 { 0.5 } else { 0.0 }
}

pub fn to_byte(celsius: f64) -> u8 {
    (celsius * 2.0).round() as u8
}

/// Convert a raw temperature byte for display in the channel's unit.
pub fn display(unit: TemperatureUnit, raw: u8) -> f64 {
    match unit {
        TemperatureUnit::Fahrenheit => f64::from(raw),
        _ => from_byte(raw),
    }
}

/// Advertised setpoint limits for one control, kept as the raw bytes the
/// channel record carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetpointRange {
    pub min: u8,
    pub max: u8,
}

impl SetpointRange {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Validate a requested setpoint against the advertised limits and encode
    /// it for the wire. Fails without encoding anything when out of range.
    pub fn encode(&self, unit: TemperatureUnit, requested: f64) -> Result<u8, ValidationError> {
        let min = display(unit, self.min);
        let max = display(unit, self.max);
        if requested < min || requested > max {
            return Err(ValidationError::SetpointOutOfRange {
                requested,
                min,
                max,
            });
        }
        Ok(match unit {
            TemperatureUnit::Fahrenheit => requested.round() as u8,
            _ => to_byte(requested),
        })
    }
}
