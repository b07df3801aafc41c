use nom::bytes::complete::take;
use nom::number::complete::{le_u16, le_u32, u8 as nom_u8};
use nom::IResult;

pub struct Utils;

impl Utils {
    /// Multi-byte counters arrive on the wire with their bytes reversed; the
    /// vendor app flips them back before interpreting. Reading little-endian
    /// is the same operation.
    pub fn rev_u16(input: &[u8]) -> IResult<&[u8], u16> {
        le_u16(input)
    }

    /// Three-byte reversed field (model info), widened to u32.
    pub fn rev_u24(input: &[u8]) -> IResult<&[u8], u32> {
        let (input, bytes) = take(3usize)(input)?;
        let value = u32::from(bytes[2]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[0]);
        Ok((input, value))
    }

    pub fn rev_u32(input: &[u8]) -> IResult<&[u8], u32> {
        le_u32(input)
    }

    /// Single-byte enumeration tag. Decodes through the enum's catch-all
    /// conversion so out-of-range values survive as data.
    pub fn enum_u8<T: From<u8>>(input: &[u8]) -> IResult<&[u8], T> {
        let (input, byte) = nom_u8(input)?;
        Ok((input, T::from(byte)))
    }

    pub fn round(value: f64, decimals: u32) -> f64 {
        let scale = 10_f64.powi(decimals as i32);
        (value * scale).round() / scale
    }
}
