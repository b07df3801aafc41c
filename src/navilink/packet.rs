use crate::prelude::*;
use crate::navilink::temperature::SetpointRange;
use crate::utils::Utils;

use enum_dispatch::*;
use nom_derive::{Nom, Parse};
use num_enum::{FromPrimitive, IntoPrimitive, TryFromPrimitive};
use std::convert::TryFrom;

// {{{ wire enumerations

/// Dispatch tag in the common response header. Unlike the data enumerations
/// below, an out-of-range value here is a hard decode failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ControlType {
    Unknown = 0,
    ChannelInformation = 1,
    State = 2,
    TrendSample = 3,
    TrendMonth = 4,
    TrendYear = 5,
    ErrorCode = 6,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DeviceSorting {
    NoDevice = 0,
    Npe = 1,
    Ncb = 2,
    Nhb = 3,
    CasNpe = 4,
    CasNhb = 5,
    Nfb = 6,
    CasNfb = 7,
    Nfc = 8,
    Npn = 9,
    CasNpn = 10,
    Npe2 = 11,
    CasNpe2 = 12,
    NcbH = 13,
    Nvw = 14,
    CasNvw = 15,
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

impl DeviceSorting {
    pub fn is_cascade(&self) -> bool {
        matches!(
            self,
            Self::CasNpe | Self::CasNhb | Self::CasNfb | Self::CasNpn | Self::CasNpe2 | Self::CasNvw
        )
    }

    /// Models with a domestic hot water circuit.
    pub fn has_hot_water(&self) -> bool {
        matches!(
            self,
            Self::Npe
                | Self::Npn
                | Self::Npe2
                | Self::Ncb
                | Self::Nfc
                | Self::NcbH
                | Self::CasNpe
                | Self::CasNpn
                | Self::CasNpe2
                | Self::Nfb
                | Self::Nvw
                | Self::CasNfb
                | Self::CasNvw
        )
    }

    /// Models with a central heating circuit.
    pub fn has_central_heating(&self) -> bool {
        matches!(
            self,
            Self::Nhb
                | Self::CasNhb
                | Self::Nfb
                | Self::Nvw
                | Self::CasNfb
                | Self::CasNvw
                | Self::Ncb
                | Self::Nfc
                | Self::NcbH
        )
    }

    /// Scaling applied to the instantaneous gas counter. The high-capacity
    /// models report in a coarser unit.
    pub fn gas_instant_factor(&self, unit: TemperatureUnit) -> u32 {
        let high_capacity = matches!(self, Self::Nfc | Self::NcbH | Self::Nfb | Self::Nvw);
        match unit {
            TemperatureUnit::Fahrenheit => {
                if high_capacity {
                    10
                } else {
                    1
                }
            }
            _ => {
                if high_capacity {
                    100
                } else {
                    10
                }
            }
        }
    }
}

impl std::fmt::Display for DeviceSorting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDevice => write!(f, "NO_DEVICE"),
            Self::Npe => write!(f, "NPE"),
            Self::Ncb => write!(f, "NCB"),
            Self::Nhb => write!(f, "NHB"),
            Self::CasNpe => write!(f, "CAS_NPE"),
            Self::CasNhb => write!(f, "CAS_NHB"),
            Self::Nfb => write!(f, "NFB"),
            Self::CasNfb => write!(f, "CAS_NFB"),
            Self::Nfc => write!(f, "NFC"),
            Self::Npn => write!(f, "NPN"),
            Self::CasNpn => write!(f, "CAS_NPN"),
            Self::Npe2 => write!(f, "NPE2"),
            Self::CasNpe2 => write!(f, "CAS_NPE2"),
            Self::NcbH => write!(f, "NCB_H"),
            Self::Nvw => write!(f, "NVW"),
            Self::CasNvw => write!(f, "CAS_NVW"),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({raw})"),
        }
    }
}

/// Which of the three serial channels a gateway has populated.
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum ChannelUse {
    Unknown = 0,
    Channel1 = 1,
    Channel2 = 2,
    Channel1And2 = 3,
    Channel3 = 4,
    Channel1And3 = 5,
    Channel2And3 = 6,
    Channel1And2And3 = 7,
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TemperatureUnit {
    Unknown = 0,
    Celsius = 1,
    Fahrenheit = 2,
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Celsius => write!(f, "CELSIUS"),
            Self::Fahrenheit => write!(f, "FAHRENHEIT"),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({raw})"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum OnDemandFlag {
    Unknown = 0,
    On = 1,
    Off = 2,
    WarmUp = 3,
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

impl std::fmt::Display for OnDemandFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
            Self::WarmUp => write!(f, "WARMUP"),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({raw})"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum HeatingControl {
    Unknown = 0,
    Supply = 1,
    Return = 2,
    OutsideControl = 3,
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

impl std::fmt::Display for HeatingControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Supply => write!(f, "SUPPLY"),
            Self::Return => write!(f, "RETURN"),
            Self::OutsideControl => write!(f, "OUTSIDE_CONTROL"),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({raw})"),
        }
    }
}

/// High-temperature mode: the unit caps hot water at 60 or 83 degrees.
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum HighTemperature {
    Temperature60 = 0,
    Temperature83 = 1,
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

impl std::fmt::Display for HighTemperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temperature60 => write!(f, "TEMPERATURE_60"),
            Self::Temperature83 => write!(f, "TEMPERATURE_83"),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({raw})"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum OnOff {
    Unknown = 0,
    On = 1,
    Off = 2,
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

impl std::fmt::Display for OnOff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({raw})"),
        }
    }
}

/// Day slots arrive Sunday-first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DayOfWeek {
    Unknown = 0,
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

impl Default for DayOfWeek {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Sunday => write!(f, "SUN"),
            Self::Monday => write!(f, "MON"),
            Self::Tuesday => write!(f, "TUE"),
            Self::Wednesday => write!(f, "WED"),
            Self::Thursday => write!(f, "THU"),
            Self::Friday => write!(f, "FRI"),
            Self::Saturday => write!(f, "SAT"),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED({raw})"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive)]
#[repr(u8)]
pub enum ControlSorting {
    Info = 1,
    Control = 2,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive)]
#[repr(u8)]
pub enum DeviceControl {
    Power = 1,
    Heat = 2,
    WaterTemperature = 3,
    HeatingWaterTemperature = 4,
    OnDemand = 5,
    Weekly = 6,
    RecirculationTemperature = 7,
}

/// Mode tags for the legacy operation-mode dialect.
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive)]
#[repr(u8)]
pub enum OperateMode {
    PowerOff = 1,
    PowerOn = 2,
    GoOutOff = 3,
    GoOutOn = 4,
    InsideHeat = 5,
    OndolHeat = 6,
    RepeatReserve = 7,
    CircleReserve = 8,
    SimpleReserve = 9,
    HotWaterOn = 10,
    HotWaterOff = 11,
    WaterSetTemp = 12,
    QuickHotWater = 13,
    HeatLevel = 14,
    Active = 128,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive)]
#[repr(u8)]
pub enum HeatLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

/// Four unrelated capabilities bundled into one byte by the vendor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Wwsd(u8);

impl Wwsd {
    pub fn raw(&self) -> u8 {
        self.0
    }

    /// Bit 0: warm-weather shutdown currently active.
    pub fn wwsd_active(&self) -> bool {
        self.0 & 0x01 != 0
    }

    /// Bit 1: commercial lock engaged.
    pub fn commercial_lock(&self) -> bool {
        self.0 & 0x02 != 0
    }

    /// Bit 2: unit can produce hot water.
    pub fn hot_water_possible(&self) -> bool {
        self.0 & 0x04 != 0
    }

    /// Bit 3: unit supports recirculation.
    pub fn recirculation_possible(&self) -> bool {
        self.0 & 0x08 != 0
    }
}

impl From<u8> for Wwsd {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

// }}}

// {{{ common header

/// Every response opens with the same 12 bytes.
#[derive(Clone, Copy, Debug)]
pub struct ResponseHeader {
    pub device_id: GatewayId,
    pub country_code: u8,
    pub control_type: u8,
    pub sw_major: u8,
    pub sw_minor: u8,
}

impl ResponseHeader {
    pub const LENGTH: usize = 12;

    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < Self::LENGTH {
            return Err(ProtocolError::Truncated {
                needed: Self::LENGTH,
                got: data.len(),
            });
        }
        let mut id = [0u8; 8];
        id.copy_from_slice(&data[0..8]);
        Ok(Self {
            device_id: GatewayId::from(id),
            country_code: data[8],
            control_type: data[9],
            sw_major: data[10],
            sw_minor: data[11],
        })
    }

    /// Firmware version as the vendor app compares it: major*100 + minor.
    pub fn firmware_version(&self) -> u16 {
        u16::from(self.sw_major) * 100 + u16::from(self.sw_minor)
    }
}

// }}}

// {{{ channel information (control type 1)

/// Channel records grew from 13 to 15 bytes when recirculation limits were
/// added; the split is keyed on firmware version, never on buffer size.
pub const RECIRCULATION_FIRMWARE: u16 = 1500;
const CHANNEL_COUNT: usize = 3;
const CHANNEL_RECORDS_OFFSET: usize = 13;
const NARROW_CHANNEL_RECORD: usize = 13;
const WIDE_CHANNEL_RECORD: usize = 15;

#[derive(Clone, Debug, Nom)]
pub struct ChannelDescriptor {
    pub channel: u8,
    #[nom(Parse = "Utils::enum_u8")]
    pub device_sorting: DeviceSorting,
    pub device_count: u8,
    #[nom(Parse = "Utils::enum_u8")]
    pub temperature_unit: TemperatureUnit,
    pub minimum_water_temperature: u8,
    pub maximum_water_temperature: u8,
    pub minimum_heating_temperature: u8,
    pub maximum_heating_temperature: u8,
    #[nom(Parse = "Utils::enum_u8")]
    pub use_on_demand: OnDemandFlag,
    #[nom(Parse = "Utils::enum_u8")]
    pub heating_control: HeatingControl,
    #[nom(Parse = "Utils::enum_u8")]
    pub wwsd: Wwsd,
    #[nom(Parse = "Utils::enum_u8")]
    pub high_temperature: HighTemperature,
    #[nom(Parse = "Utils::enum_u8")]
    pub use_warm_water: OnOff,
    #[nom(Ignore)]
    pub minimum_recirculation_temperature: Option<u8>,
    #[nom(Ignore)]
    pub maximum_recirculation_temperature: Option<u8>,
}

impl ChannelDescriptor {
    pub fn water_range(&self) -> SetpointRange {
        SetpointRange::new(self.minimum_water_temperature, self.maximum_water_temperature)
    }

    pub fn heating_range(&self) -> SetpointRange {
        SetpointRange::new(
            self.minimum_heating_temperature,
            self.maximum_heating_temperature,
        )
    }

    pub fn recirculation_range(&self) -> Result<SetpointRange, ValidationError> {
        match (
            self.minimum_recirculation_temperature,
            self.maximum_recirculation_temperature,
        ) {
            (Some(min), Some(max)) => Ok(SetpointRange::new(min, max)),
            _ => Err(ValidationError::RecirculationUnsupported),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChannelInformation {
    pub device_id: GatewayId,
    pub firmware_version: u16,
    pub channel_use: ChannelUse,
    pub channels: Vec<ChannelDescriptor>,
}

impl ChannelInformation {
    fn decode(header: &ResponseHeader, data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() <= CHANNEL_RECORDS_OFFSET {
            return Err(ProtocolError::Truncated {
                needed: CHANNEL_RECORDS_OFFSET + 1,
                got: data.len(),
            });
        }

        let channel_use = ChannelUse::from(data[12]);
        if channel_use == ChannelUse::Unknown {
            return Err(ProtocolError::ChannelsUnavailable);
        }

        let firmware_version = header.firmware_version();
        let wide = firmware_version > RECIRCULATION_FIRMWARE;
        let stride = if wide {
            WIDE_CHANNEL_RECORD
        } else {
            NARROW_CHANNEL_RECORD
        };

        let needed = CHANNEL_RECORDS_OFFSET + CHANNEL_COUNT * stride;
        if data.len() < needed {
            return Err(ProtocolError::Truncated {
                needed,
                got: data.len(),
            });
        }

        let mut channels = Vec::with_capacity(CHANNEL_COUNT);
        for slot in 0..CHANNEL_COUNT {
            let offset = CHANNEL_RECORDS_OFFSET + stride * slot;
            let record = &data[offset..offset + stride];
            let (rest, mut descriptor) = ChannelDescriptor::parse(record)
                .map_err(|_| malformed(format!("channel record {} unparseable", slot + 1)))?;
            if wide {
                descriptor.minimum_recirculation_temperature = Some(rest[0]);
                descriptor.maximum_recirculation_temperature = Some(rest[1]);
            }
            channels.push(descriptor);
        }

        Ok(Self {
            device_id: header.device_id,
            firmware_version,
            channel_use,
            channels,
        })
    }

    pub fn channel(&self, number: u8) -> Option<&ChannelDescriptor> {
        self.channels.iter().find(|c| c.channel == number)
    }
}

// }}}

// {{{ state (control type 2)

const SCHEDULE_OFFSET: usize = 43;
const DAY_SLOTS: usize = 7;
const DAY_SLOT_BYTES: usize = 32;
const SCHEDULE_END: usize = SCHEDULE_OFFSET + DAY_SLOTS * DAY_SLOT_BYTES;
const AVERAGES_LENGTH: usize = 271;
const RECIRCULATION_LENGTH: usize = 273;

/// Most entries a single day slot can carry on the wire.
pub const MAX_DAY_ENTRIES: usize = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScheduleEntry {
    pub hour: u8,
    pub minute: u8,
    pub state: OnOff,
}

#[derive(Clone, Debug, Default)]
pub struct DaySchedule {
    pub day_of_week: DayOfWeek,
    pub entries: Vec<ScheduleEntry>,
}

impl DaySchedule {
    /// Entries plus one more, for a schedule-add edit.
    pub fn with_entry(&self, entry: ScheduleEntry) -> Result<Vec<ScheduleEntry>, ValidationError> {
        if entry.hour >= 24 || entry.minute >= 60 {
            return Err(ValidationError::BadScheduleTime {
                hour: entry.hour,
                minute: entry.minute,
            });
        }
        if self.entries.len() >= MAX_DAY_ENTRIES {
            return Err(ValidationError::ScheduleFull {
                max: MAX_DAY_ENTRIES,
            });
        }
        let mut entries = self.entries.clone();
        entries.push(entry);
        Ok(entries)
    }

    /// Entries minus any at the given time, for a schedule-delete edit.
    pub fn without_entry(&self, hour: u8, minute: u8) -> Vec<ScheduleEntry> {
        self.entries
            .iter()
            .copied()
            .filter(|e| e.hour != hour || e.minute != minute)
            .collect()
    }
}

/// Always exactly seven slots, Sunday first.
#[derive(Clone, Debug, Default)]
pub struct WeeklySchedule {
    pub days: [DaySchedule; DAY_SLOTS],
}

impl WeeklySchedule {
    pub fn day(&self, day: DayOfWeek) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.day_of_week == day)
    }

    fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut days: [DaySchedule; DAY_SLOTS] = Default::default();
        for (slot, day) in days.iter_mut().enumerate() {
            let base = SCHEDULE_OFFSET + slot * DAY_SLOT_BYTES;
            day.day_of_week = DayOfWeek::from(data[base]);

            // The declared count drives how many triples are real; the rest
            // of the 32-byte slot is padding. A count past the slot capacity
            // means we have lost framing.
            let declared = usize::from(data[base + 1]);
            if declared > MAX_DAY_ENTRIES {
                return Err(malformed(format!(
                    "day slot {slot} declares {declared} entries, slot holds at most {MAX_DAY_ENTRIES}"
                )));
            }

            day.entries = (0..declared)
                .map(|n| {
                    let at = base + 2 + n * 3;
                    ScheduleEntry {
                        hour: data[at],
                        minute: data[at + 1],
                        state: OnOff::from(data[at + 2]),
                    }
                })
                .collect();
        }
        Ok(Self { days })
    }
}

#[derive(Clone, Debug, Nom)]
pub struct DeviceState {
    #[nom(Parse = "Utils::rev_u16")]
    pub controller_version: u16,
    #[nom(Parse = "Utils::rev_u16")]
    pub panel_version: u16,
    #[nom(Parse = "Utils::enum_u8")]
    pub device_sorting: DeviceSorting,
    pub device_count: u8,
    pub current_channel: u8,
    pub device_number: u8,
    #[nom(Parse = "Utils::rev_u16")]
    pub error_code: u16,
    pub operation_device_number: u8,
    /// Half-percent steps, same encoding as temperatures.
    pub average_calorimeter: u8,
    #[nom(Parse = "Utils::rev_u16")]
    pub gas_instant_use: u16,
    #[nom(Parse = "Utils::rev_u32")]
    pub gas_accumulated_use: u32,
    pub hot_water_setting_temperature: u8,
    pub hot_water_current_temperature: u8,
    #[nom(Parse = "Utils::rev_u16")]
    pub hot_water_flow_rate: u16,
    pub inlet_temperature: u8,
    pub heat_setting_temperature: u8,
    pub current_supply_temperature: u8,
    pub current_return_temperature: u8,
    #[nom(Parse = "Utils::enum_u8")]
    pub power_status: OnOff,
    #[nom(Parse = "Utils::enum_u8")]
    pub heat_status: OnOff,
    #[nom(Parse = "Utils::enum_u8")]
    pub use_on_demand: OnDemandFlag,
    #[nom(Parse = "Utils::enum_u8")]
    pub weekly_control: OnOff,
    pub total_day_sequence: u8,
    #[nom(Ignore)]
    pub weekly_schedule: WeeklySchedule,
    #[nom(Ignore)]
    pub hot_water_average_temperature: Option<u8>,
    #[nom(Ignore)]
    pub inlet_average_temperature: Option<u8>,
    #[nom(Ignore)]
    pub supply_average_temperature: Option<u8>,
    #[nom(Ignore)]
    pub return_average_temperature: Option<u8>,
    #[nom(Ignore)]
    pub recirculation_setting_temperature: Option<u8>,
    #[nom(Ignore)]
    pub recirculation_current_temperature: Option<u8>,
    #[nom(Ignore)]
    pub device_id: GatewayId,
}

impl DeviceState {
    fn decode(header: &ResponseHeader, data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < SCHEDULE_END {
            return Err(ProtocolError::Truncated {
                needed: SCHEDULE_END,
                got: data.len(),
            });
        }

        let (_, mut state) = DeviceState::parse(&data[ResponseHeader::LENGTH..])
            .map_err(|_| malformed("state record unparseable".to_string()))?;

        state.weekly_schedule = WeeklySchedule::decode(data)?;

        // The tail varies: cascade-averaging firmware appends four average
        // temperatures, recirculation firmware two more. Check the actual
        // length, not a fixed offset table.
        if data.len() >= AVERAGES_LENGTH {
            state.hot_water_average_temperature = Some(data[SCHEDULE_END]);
            state.inlet_average_temperature = Some(data[SCHEDULE_END + 1]);
            state.supply_average_temperature = Some(data[SCHEDULE_END + 2]);
            state.return_average_temperature = Some(data[SCHEDULE_END + 3]);
        }
        if data.len() >= RECIRCULATION_LENGTH {
            state.recirculation_setting_temperature = Some(data[SCHEDULE_END + 4]);
            state.recirculation_current_temperature = Some(data[SCHEDULE_END + 5]);
        }

        state.device_id = header.device_id;
        Ok(state)
    }

    /// Vendor error code, `None` when the unit reports normal operation.
    pub fn error(&self) -> Option<u16> {
        (self.error_code != 0).then_some(self.error_code)
    }
}

// }}}

// {{{ trend sample (control type 3)

const TREND_SAMPLE_SHORT: usize = 39;
const TREND_SAMPLE_LONG: usize = 43;

#[derive(Clone, Debug, Nom)]
pub struct TrendSample {
    #[nom(Parse = "Utils::rev_u16")]
    pub controller_version: u16,
    #[nom(Parse = "Utils::rev_u16")]
    pub panel_version: u16,
    #[nom(Parse = "Utils::enum_u8")]
    pub device_sorting: DeviceSorting,
    pub device_count: u8,
    pub current_channel: u8,
    pub device_number: u8,
    #[nom(Parse = "Utils::rev_u24")]
    pub model_info: u32,
    #[nom(Parse = "Utils::rev_u32")]
    pub total_operated_time: u32,
    #[nom(Parse = "Utils::rev_u32")]
    pub total_gas_accumulated: u32,
    #[nom(Parse = "Utils::rev_u32")]
    pub total_hot_water_accumulated: u32,
    #[nom(Parse = "Utils::rev_u32")]
    pub total_central_heating_operated_time: u32,
    #[nom(Ignore)]
    pub total_dhw_usage_time: Option<u32>,
    #[nom(Ignore)]
    pub device_id: GatewayId,
}

impl TrendSample {
    fn decode(header: &ResponseHeader, data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < TREND_SAMPLE_SHORT {
            return Err(ProtocolError::Truncated {
                needed: TREND_SAMPLE_SHORT,
                got: data.len(),
            });
        }

        let (rest, mut sample) = TrendSample::parse(&data[ResponseHeader::LENGTH..])
            .map_err(|_| malformed("trend sample unparseable".to_string()))?;

        // Newer firmware appends a DHW usage-time counter.
        if data.len() > TREND_SAMPLE_SHORT {
            if data.len() < TREND_SAMPLE_LONG {
                return Err(ProtocolError::Truncated {
                    needed: TREND_SAMPLE_LONG,
                    got: data.len(),
                });
            }
            let (_, dhw) = Utils::rev_u32(rest)
                .map_err(|_| malformed("trend sample DHW counter unparseable".to_string()))?;
            sample.total_dhw_usage_time = Some(dhw);
        }

        sample.device_id = header.device_id;
        Ok(sample)
    }
}

// }}}

// {{{ trend month / year (control types 4 and 5)

const TREND_CYCLE_HEADER: usize = 21;
const TREND_ENTRY_BYTES: usize = 22;

/// One month/year report. Month reports carry per-day entries, year reports
/// per-month entries; the layout is identical and the entry count is taken
/// from the header, never assumed.
#[derive(Clone, Debug, Nom)]
pub struct TrendCycle {
    #[nom(Parse = "Utils::rev_u16")]
    pub controller_version: u16,
    #[nom(Parse = "Utils::rev_u16")]
    pub panel_version: u16,
    #[nom(Parse = "Utils::enum_u8")]
    pub device_sorting: DeviceSorting,
    pub device_count: u8,
    pub current_channel: u8,
    pub device_number: u8,
    pub declared_sequences: u8,
    #[nom(Ignore)]
    pub sequences: Vec<TrendEntry>,
    #[nom(Ignore)]
    pub device_id: GatewayId,
}

#[derive(Clone, Debug, Nom)]
pub struct TrendEntry {
    /// Day-of-month or month index, depending on the report.
    pub index: u8,
    #[nom(Parse = "Utils::rev_u24")]
    pub model_info: u32,
    #[nom(Parse = "Utils::rev_u32")]
    pub gas_accumulated_use: u32,
    #[nom(Parse = "Utils::rev_u32")]
    pub hot_water_accumulated_use: u32,
    #[nom(Parse = "Utils::rev_u16")]
    pub hot_water_operated_count: u16,
    #[nom(Parse = "Utils::rev_u16")]
    pub on_demand_use_count: u16,
    #[nom(Parse = "Utils::rev_u16")]
    pub heat_accumulated_use: u16,
    pub outdoor_air_max_temperature: u8,
    pub outdoor_air_min_temperature: u8,
    #[nom(Parse = "Utils::rev_u16")]
    pub dhw_accumulated_use: u16,
}

impl TrendCycle {
    fn decode(header: &ResponseHeader, data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < TREND_CYCLE_HEADER {
            return Err(ProtocolError::Truncated {
                needed: TREND_CYCLE_HEADER,
                got: data.len(),
            });
        }

        let (_, mut cycle) = TrendCycle::parse(&data[ResponseHeader::LENGTH..])
            .map_err(|_| malformed("trend report header unparseable".to_string()))?;

        let count = usize::from(cycle.declared_sequences);
        let needed = TREND_CYCLE_HEADER + count * TREND_ENTRY_BYTES;
        if data.len() < needed {
            return Err(ProtocolError::Truncated {
                needed,
                got: data.len(),
            });
        }

        cycle.sequences = Vec::with_capacity(count);
        for n in 0..count {
            let offset = TREND_CYCLE_HEADER + n * TREND_ENTRY_BYTES;
            let (_, entry) = TrendEntry::parse(&data[offset..offset + TREND_ENTRY_BYTES])
                .map_err(|_| malformed(format!("trend entry {n} unparseable")))?;
            cycle.sequences.push(entry);
        }

        cycle.device_id = header.device_id;
        Ok(cycle)
    }
}

// }}}

// {{{ error code (control type 6)

/// The server reports a device fault. The payload layout has never been
/// captured, so only the raw bytes are surfaced; callers still get an
/// explicit result instead of a dropped frame.
#[derive(Clone, Debug)]
pub struct ErrorReport {
    pub device_id: GatewayId,
    pub raw: Vec<u8>,
}

// }}}

// {{{ response dispatch

#[derive(Clone, Debug)]
pub enum Response {
    ChannelInformation(ChannelInformation),
    State(Box<DeviceState>),
    TrendSample(TrendSample),
    TrendMonth(TrendCycle),
    TrendYear(TrendCycle),
    ErrorCode(ErrorReport),
}

pub struct Parser;

impl Parser {
    pub fn parse(input: &[u8]) -> Result<Response, ProtocolError> {
        let header = ResponseHeader::decode(input)?;

        let response = match ControlType::try_from(header.control_type) {
            Ok(ControlType::ChannelInformation) => {
                Response::ChannelInformation(ChannelInformation::decode(&header, input)?)
            }
            Ok(ControlType::State) => {
                Response::State(Box::new(DeviceState::decode(&header, input)?))
            }
            Ok(ControlType::TrendSample) => {
                Response::TrendSample(TrendSample::decode(&header, input)?)
            }
            Ok(ControlType::TrendMonth) => Response::TrendMonth(TrendCycle::decode(&header, input)?),
            Ok(ControlType::TrendYear) => Response::TrendYear(TrendCycle::decode(&header, input)?),
            Ok(ControlType::ErrorCode) => Response::ErrorCode(ErrorReport {
                device_id: header.device_id,
                raw: input[ResponseHeader::LENGTH..].to_vec(),
            }),
            Ok(ControlType::Unknown) => return Err(ProtocolError::UnknownControlType),
            Err(_) => {
                return Err(ProtocolError::MalformedHeader {
                    tag: header.control_type,
                })
            }
        };

        Ok(response)
    }
}

// }}}

// {{{ outbound frames

/// Fixed request preamble: stx, did, reserve, cmd, data length, dSid.
pub const REQUEST_HEADER: [u8; 6] = [0x07, 0x99, 0x00, 0xA6, 0x37, 0x00];
/// Control requests are always the same size; untouched sections ride along
/// zero-filled.
pub const REQUEST_LENGTH: usize = 54;
const COMMAND_COUNT: u8 = 0x01;

const WEEKLY_BLOCK_BYTES: usize = 33;

const OPERATION_COMMAND: u8 = 131;
const OPERATION_DATA_LENGTH: u8 = 21;
const OPERATION_SEQUENCE: u8 = 1;
pub const OPERATION_LENGTH: usize = 19;

#[enum_dispatch]
pub trait CommandFrame {
    fn device_id(&self) -> GatewayId;
    fn bytes(&self) -> Vec<u8>;
}

/// The two outbound framings are different protocol generations and never
/// interchangeable; keep them as separate message types.
#[enum_dispatch(CommandFrame)]
#[derive(Clone, Debug)]
pub enum Command {
    Control(ControlRequest),
    OperationMode(OperationModeCommand),
}

/// The 33-byte weekly sub-block every control request carries: day tag,
/// entry count, then ten fixed (hour, minute, flag) triples.
#[derive(Clone, Debug, Default)]
pub struct WeeklyBlock {
    pub day_of_week: DayOfWeek,
    pub entries: Vec<ScheduleEntry>,
}

impl WeeklyBlock {
    pub fn for_day(
        day_of_week: DayOfWeek,
        entries: Vec<ScheduleEntry>,
    ) -> Result<Self, ValidationError> {
        if entries.len() > MAX_DAY_ENTRIES {
            return Err(ValidationError::ScheduleFull {
                max: MAX_DAY_ENTRIES,
            });
        }
        for entry in &entries {
            if entry.hour >= 24 || entry.minute >= 60 {
                return Err(ValidationError::BadScheduleTime {
                    hour: entry.hour,
                    minute: entry.minute,
                });
            }
        }
        Ok(Self {
            day_of_week,
            entries,
        })
    }

    fn bytes(&self) -> [u8; WEEKLY_BLOCK_BYTES] {
        let mut block = [0u8; WEEKLY_BLOCK_BYTES];
        block[0] = self.day_of_week.into();
        block[1] = self.entries.len() as u8;
        for (n, entry) in self.entries.iter().enumerate() {
            let at = 2 + n * 3;
            block[at] = entry.hour;
            block[at + 1] = entry.minute;
            block[at + 2] = entry.state.into();
        }
        block
    }
}

#[derive(Clone, Debug)]
pub struct ControlRequest {
    pub device_id: GatewayId,
    pub channel: u8,
    pub device_number: u8,
    pub control_sorting: ControlSorting,
    pub info_item: u8,
    pub control_item: u8,
    pub control_value: u8,
    pub weekly: WeeklyBlock,
}

impl ControlRequest {
    fn information(device_id: GatewayId, channel: u8, device_number: u8, item: ControlType) -> Self {
        Self {
            device_id,
            channel,
            device_number,
            control_sorting: ControlSorting::Info,
            info_item: item.into(),
            control_item: 0x00,
            control_value: 0x00,
            weekly: WeeklyBlock::default(),
        }
    }

    fn control(
        device_id: GatewayId,
        channel: u8,
        device_number: u8,
        item: DeviceControl,
        value: u8,
    ) -> Self {
        Self {
            device_id,
            channel,
            device_number,
            control_sorting: ControlSorting::Control,
            info_item: ControlType::Unknown.into(),
            control_item: item.into(),
            control_value: value,
            weekly: WeeklyBlock::default(),
        }
    }

    pub fn state_request(device_id: GatewayId, channel: u8, device_number: u8) -> Self {
        Self::information(device_id, channel, device_number, ControlType::State)
    }

    /// The gateway volunteers this at connect time; an explicit request only
    /// matters for refreshing limits mid-session.
    pub fn channel_information_request(
        device_id: GatewayId,
        channel: u8,
        device_number: u8,
    ) -> Self {
        Self::information(
            device_id,
            channel,
            device_number,
            ControlType::ChannelInformation,
        )
    }

    pub fn trend_sample_request(device_id: GatewayId, channel: u8, device_number: u8) -> Self {
        Self::information(device_id, channel, device_number, ControlType::TrendSample)
    }

    pub fn trend_month_request(device_id: GatewayId, channel: u8, device_number: u8) -> Self {
        Self::information(device_id, channel, device_number, ControlType::TrendMonth)
    }

    pub fn trend_year_request(device_id: GatewayId, channel: u8, device_number: u8) -> Self {
        Self::information(device_id, channel, device_number, ControlType::TrendYear)
    }

    pub fn power_control(
        device_id: GatewayId,
        channel: u8,
        device_number: u8,
        state: OnOff,
    ) -> Self {
        Self::control(
            device_id,
            channel,
            device_number,
            DeviceControl::Power,
            state.into(),
        )
    }

    pub fn heat_control(
        device_id: GatewayId,
        channel: u8,
        device_number: u8,
        state: OnOff,
    ) -> Self {
        Self::control(
            device_id,
            channel,
            device_number,
            DeviceControl::Heat,
            state.into(),
        )
    }

    /// On-demand is a trigger, not a toggle; the unit runs one priming cycle.
    pub fn on_demand_control(device_id: GatewayId, channel: u8, device_number: u8) -> Self {
        Self::control(
            device_id,
            channel,
            device_number,
            DeviceControl::OnDemand,
            OnOff::On.into(),
        )
    }

    pub fn weekly_control(
        device_id: GatewayId,
        channel: u8,
        device_number: u8,
        state: OnOff,
    ) -> Self {
        Self::control(
            device_id,
            channel,
            device_number,
            DeviceControl::Weekly,
            state.into(),
        )
    }

    pub fn water_temperature_control(
        device_id: GatewayId,
        channel: u8,
        device_number: u8,
        descriptor: &ChannelDescriptor,
        setpoint: f64,
    ) -> Result<Self, ValidationError> {
        let value = descriptor
            .water_range()
            .encode(descriptor.temperature_unit, setpoint)?;
        Ok(Self::control(
            device_id,
            channel,
            device_number,
            DeviceControl::WaterTemperature,
            value,
        ))
    }

    pub fn heating_water_temperature_control(
        device_id: GatewayId,
        channel: u8,
        device_number: u8,
        descriptor: &ChannelDescriptor,
        setpoint: f64,
    ) -> Result<Self, ValidationError> {
        let value = descriptor
            .heating_range()
            .encode(descriptor.temperature_unit, setpoint)?;
        Ok(Self::control(
            device_id,
            channel,
            device_number,
            DeviceControl::HeatingWaterTemperature,
            value,
        ))
    }

    pub fn recirculation_temperature_control(
        device_id: GatewayId,
        channel: u8,
        device_number: u8,
        descriptor: &ChannelDescriptor,
        setpoint: f64,
    ) -> Result<Self, ValidationError> {
        let value = descriptor
            .recirculation_range()?
            .encode(descriptor.temperature_unit, setpoint)?;
        Ok(Self::control(
            device_id,
            channel,
            device_number,
            DeviceControl::RecirculationTemperature,
            value,
        ))
    }

    /// Replace one day's recirculation schedule with the given entries.
    pub fn weekly_schedule_update(
        device_id: GatewayId,
        channel: u8,
        device_number: u8,
        block: WeeklyBlock,
    ) -> Self {
        let mut request = Self::control(
            device_id,
            channel,
            device_number,
            DeviceControl::Weekly,
            OnOff::On.into(),
        );
        request.weekly = block;
        request
    }
}

impl CommandFrame for ControlRequest {
    fn device_id(&self) -> GatewayId {
        self.device_id
    }

    fn bytes(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(REQUEST_LENGTH);
        frame.extend_from_slice(&REQUEST_HEADER);
        frame.extend_from_slice(&self.device_id.data());
        frame.extend_from_slice(&[
            COMMAND_COUNT,
            self.channel,
            self.device_number,
            self.control_sorting.into(),
            self.info_item,
            self.control_item,
            self.control_value,
        ]);
        frame.extend_from_slice(&self.weekly.bytes());
        frame
    }
}

/// Legacy dialect command: direct mode/setpoint changes on older gateways.
#[derive(Clone, Debug)]
pub struct OperationModeCommand {
    pub device_id: GatewayId,
    pub mode: OperateMode,
    pub values: [u8; 5],
}

impl OperationModeCommand {
    fn new(device_id: GatewayId, mode: OperateMode, values: [u8; 5]) -> Self {
        Self {
            device_id,
            mode,
            values,
        }
    }

    pub fn power_on(device_id: GatewayId) -> Self {
        Self::new(device_id, OperateMode::PowerOn, [1, 0, 0, 0, 0])
    }

    pub fn power_off(device_id: GatewayId) -> Self {
        Self::new(device_id, OperateMode::PowerOff, [1, 0, 0, 0, 0])
    }

    pub fn go_out_on(device_id: GatewayId) -> Self {
        Self::new(device_id, OperateMode::GoOutOn, [1, 0, 0, 0, 0])
    }

    pub fn go_out_off(device_id: GatewayId) -> Self {
        Self::new(device_id, OperateMode::GoOutOff, [1, 0, 0, 0, 0])
    }

    pub fn hot_water_on(device_id: GatewayId) -> Self {
        Self::new(device_id, OperateMode::HotWaterOn, [1, 0, 0, 0, 0])
    }

    pub fn hot_water_off(device_id: GatewayId) -> Self {
        Self::new(device_id, OperateMode::HotWaterOff, [1, 0, 0, 0, 0])
    }

    pub fn quick_hot_water(device_id: GatewayId) -> Self {
        Self::new(device_id, OperateMode::QuickHotWater, [1, 0, 0, 0, 0])
    }

    /// The legacy dialect always speaks Celsius.
    pub fn inside_heat(
        device_id: GatewayId,
        range: SetpointRange,
        temperature: f64,
    ) -> Result<Self, ValidationError> {
        let byte = range.encode(TemperatureUnit::Celsius, temperature)?;
        Ok(Self::new(
            device_id,
            OperateMode::InsideHeat,
            [1, 0, 0, 0, byte],
        ))
    }

    pub fn ondol_heat(
        device_id: GatewayId,
        range: SetpointRange,
        temperature: f64,
    ) -> Result<Self, ValidationError> {
        let byte = range.encode(TemperatureUnit::Celsius, temperature)?;
        Ok(Self::new(
            device_id,
            OperateMode::OndolHeat,
            [1, 0, 0, 0, byte],
        ))
    }

    pub fn hot_water_setpoint(
        device_id: GatewayId,
        range: SetpointRange,
        temperature: f64,
    ) -> Result<Self, ValidationError> {
        let byte = range.encode(TemperatureUnit::Celsius, temperature)?;
        Ok(Self::new(
            device_id,
            OperateMode::WaterSetTemp,
            [1, 0, 0, 0, byte],
        ))
    }

    pub fn heat_level(device_id: GatewayId, level: HeatLevel) -> Self {
        Self::new(device_id, OperateMode::HeatLevel, [1, 0, 0, 0, level.into()])
    }

    pub fn repeat_reserve(device_id: GatewayId, hour_interval: u8, duration_minutes: u8) -> Self {
        Self::new(
            device_id,
            OperateMode::RepeatReserve,
            [1, 0, 0, hour_interval, duration_minutes],
        )
    }

    pub fn circle_reserve(device_id: GatewayId, schedules: [u8; 3]) -> Self {
        Self::new(
            device_id,
            OperateMode::CircleReserve,
            [1, 0, schedules[0], schedules[1], schedules[2]],
        )
    }
}

impl CommandFrame for OperationModeCommand {
    fn device_id(&self) -> GatewayId {
        self.device_id
    }

    fn bytes(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(OPERATION_LENGTH);
        frame.extend_from_slice(&[0x00, OPERATION_COMMAND, OPERATION_DATA_LENGTH, 0x00]);
        frame.extend_from_slice(&self.device_id.data());
        frame.push(OPERATION_SEQUENCE);
        frame.push(self.mode.into());
        frame.extend_from_slice(&self.values);
        frame
    }
}

// }}}

fn malformed(reason: String) -> ProtocolError {
    ProtocolError::MalformedPayload { reason }
}
