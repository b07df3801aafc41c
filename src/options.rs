use clap::{Parser, ValueEnum};

use crate::navilink::packet::{DayOfWeek, HeatLevel, OnOff};

/// NaviLink Bridge - control Navien tankless water heaters, combi-boilers
/// and boilers connected via NaviLink
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Credentials file to read
    #[clap(short = 'c', long = "credentials", default_value = "credentials.json")]
    pub credentials_file: String,

    /// Gateway ID (required when the account has more than one gateway)
    #[clap(long)]
    pub gateway_id: Option<String>,

    /// Channel number (required when more than one channel hosts a device)
    #[clap(long)]
    pub channel: Option<u8>,

    /// Device number (required when devices are cascaded on one channel)
    #[clap(long)]
    pub device_number: Option<u8>,

    /// Talk the legacy protocol dialect (older gateways)
    #[clap(long)]
    pub legacy: bool,

    /// Show the device's extended status
    #[clap(long)]
    pub summary: bool,

    /// Show the device's trend sample report
    #[clap(long)]
    pub trend_sample: bool,

    /// Show the device's trend month report
    #[clap(long)]
    pub trend_month: bool,

    /// Show the device's trend year report
    #[clap(long)]
    pub trend_year: bool,

    /// Turn the power on or off
    #[clap(long, value_enum)]
    pub power: Option<Switch>,

    /// Turn the heat on or off
    #[clap(long, value_enum)]
    pub heat: Option<Switch>,

    /// Trigger an on-demand hot water priming cycle
    #[clap(long)]
    pub on_demand: bool,

    /// Turn the weekly recirculation schedule on or off
    #[clap(long, value_enum)]
    pub schedule: Option<Switch>,

    /// Set the hot water temperature
    #[clap(long)]
    pub hot_water_temp: Option<f64>,

    /// Set the central heating temperature
    #[clap(long)]
    pub heating_temp: Option<f64>,

    /// Set the recirculation temperature
    #[clap(long)]
    pub recirc_temp: Option<f64>,

    /// Modify the recirculation schedule; needs --schedule-time,
    /// --schedule-day and --schedule-state
    #[clap(long, value_enum)]
    pub modify_schedule: Option<ScheduleEdit>,

    /// Schedule entry time in HH:MM
    #[clap(long)]
    pub schedule_time: Option<String>,

    /// Schedule entry day of week
    #[clap(long, value_enum)]
    pub schedule_day: Option<Day>,

    /// Schedule entry state
    #[clap(long, value_enum)]
    pub schedule_state: Option<Switch>,

    /// Set the boiler mode (legacy dialect only)
    #[clap(long, value_enum)]
    pub mode: Option<Mode>,

    /// Set the boiler heat level (legacy dialect only)
    #[clap(long, value_enum)]
    pub heat_level: Option<Level>,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }

    /// True when any switch beyond plain identification was given; with
    /// nothing to do we print help instead of logging in.
    pub fn has_action(&self) -> bool {
        self.summary
            || self.trend_sample
            || self.trend_month
            || self.trend_year
            || self.power.is_some()
            || self.heat.is_some()
            || self.on_demand
            || self.schedule.is_some()
            || self.hot_water_temp.is_some()
            || self.heating_temp.is_some()
            || self.recirc_temp.is_some()
            || self.modify_schedule.is_some()
            || self.mode.is_some()
            || self.heat_level.is_some()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl From<Switch> for OnOff {
    fn from(switch: Switch) -> Self {
        match switch {
            Switch::On => OnOff::On,
            Switch::Off => OnOff::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ScheduleEdit {
    Add,
    Delete,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Day {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl From<Day> for DayOfWeek {
    fn from(day: Day) -> Self {
        match day {
            Day::Sun => DayOfWeek::Sunday,
            Day::Mon => DayOfWeek::Monday,
            Day::Tue => DayOfWeek::Tuesday,
            Day::Wed => DayOfWeek::Wednesday,
            Day::Thu => DayOfWeek::Thursday,
            Day::Fri => DayOfWeek::Friday,
            Day::Sat => DayOfWeek::Saturday,
        }
    }
}

/// Legacy operation modes, named after the vendor app's switches.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Mode {
    PowerOn,
    PowerOff,
    HolidayOn,
    HolidayOff,
    SummerOn,
    SummerOff,
    QuickHotWater,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl From<Level> for HeatLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => HeatLevel::Low,
            Level::Medium => HeatLevel::Medium,
            Level::High => HeatLevel::High,
        }
    }
}
