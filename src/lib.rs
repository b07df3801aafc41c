// Module declarations for the application's core components
pub mod cloud;    // Cloud gateway directory client
pub mod config;   // Credentials file loading
pub mod error;    // Error handling and types
pub mod navilink; // NaviLink binary protocol implementation
pub mod options;  // Command line options parsing
pub mod prelude;  // Common imports and types
pub mod report;   // Human readable rendering of decoded frames
pub mod utils;    // Utility functions

use crate::prelude::*;
use crate::cloud::{DirectoryClient, ProtocolDialect};
use crate::navilink::packet::{
    ChannelDescriptor, Command, ControlRequest, DaySchedule, DeviceSorting, DeviceState,
    OperationModeCommand, Response, ScheduleEntry, WeeklyBlock,
};
use crate::navilink::session::Session;
use crate::navilink::temperature;
use crate::options::{Mode, ScheduleEdit};
use anyhow::{anyhow, bail, Result};

/// One CLI invocation: login, pick a gateway/channel/device, run the
/// requested actions against one TCP session, print the results.
pub async fn app(options: Options) -> Result<()> {
    let credentials = Credentials::new(&options.credentials_file)?;

    let dialect = if options.legacy {
        ProtocolDialect::Legacy
    } else {
        ProtocolDialect::Current
    };
    let client = DirectoryClient::new(dialect);

    info!("logging in as {}", credentials.username);
    let gateways = client
        .login(&credentials.username, &credentials.password)
        .await?;
    if gateways.is_empty() {
        bail!("account has no registered gateways");
    }

    let selected = match &options.gateway_id {
        Some(gid) => Some(
            gateways
                .iter()
                .position(|g| &g.gid == gid)
                .ok_or_else(|| anyhow!("no such gateway id {gid}"))?,
        ),
        None if gateways.len() == 1 => Some(0),
        None => None,
    };

    let Some(selected) = selected else {
        if options.summary {
            for gateway in &gateways {
                report::print_gateway(gateway);
            }
            println!("Specify a gateway to view channel details.");
            return Ok(());
        }
        bail!("must specify --gateway-id when more than one is available; run --summary to list them");
    };
    let gateway = &gateways[selected];

    let (host, port) = gateway.endpoint();
    let (mut session, greeting) =
        Session::connect(&credentials.username, &gateway.gid, &host, port).await?;

    let channel_info = match greeting {
        Response::ChannelInformation(info) => info,
        Response::ErrorCode(error_frame) => {
            report::print_error_report(&error_frame);
            bail!("gateway reported an error during connect");
        }
        other => bail!("expected channel information at connect, got {other:?}"),
    };
    let device_id = session.gateway();

    // Legacy mode commands are one-way and need no channel selection.
    if let Some(mode) = options.mode {
        if !options.legacy {
            bail!("--mode requires --legacy");
        }
        let command = match mode {
            Mode::PowerOn => OperationModeCommand::power_on(device_id),
            Mode::PowerOff => OperationModeCommand::power_off(device_id),
            Mode::HolidayOn => OperationModeCommand::go_out_on(device_id),
            Mode::HolidayOff => OperationModeCommand::go_out_off(device_id),
            Mode::SummerOn => OperationModeCommand::hot_water_on(device_id),
            Mode::SummerOff => OperationModeCommand::hot_water_off(device_id),
            Mode::QuickHotWater => OperationModeCommand::quick_hot_water(device_id),
        };
        session.send_command(&Command::OperationMode(command)).await?;
        println!("Mode now set to {mode:?}.");
        return Ok(());
    }
    if let Some(level) = options.heat_level {
        if !options.legacy {
            bail!("--heat-level requires --legacy");
        }
        let command = OperationModeCommand::heat_level(device_id, level.into());
        session.send_command(&Command::OperationMode(command)).await?;
        println!("Heat level now set to {level:?}.");
        return Ok(());
    }

    let populated: Vec<&ChannelDescriptor> = channel_info
        .channels
        .iter()
        .filter(|c| c.device_sorting != DeviceSorting::NoDevice)
        .collect();
    if populated.is_empty() {
        bail!(
            "no device detected on any channel on gateway {}",
            gateway.gid
        );
    }

    let descriptor = match options.channel {
        Some(number) => channel_info
            .channel(number)
            .filter(|c| c.device_sorting != DeviceSorting::NoDevice)
            .ok_or_else(|| {
                anyhow!(
                    "no device detected on channel {number} on gateway {}",
                    gateway.gid
                )
            })?,
        None if populated.len() == 1 || options.summary => populated[0],
        None => bail!("must specify --channel when more than one channel is populated"),
    };
    let channel = descriptor.channel;
    let unit = descriptor.temperature_unit;

    let device_number = match options.device_number {
        Some(number) if number >= 1 && number <= descriptor.device_count => number,
        Some(number) => bail!(
            "device number {number} not found on channel {channel} (device count {})",
            descriptor.device_count
        ),
        None if descriptor.device_count <= 1 || options.summary => 1,
        None => bail!("must specify --device-number when more than one device shares the channel"),
    };

    if options.summary {
        report::print_gateway(gateway);
        println!("Channel Info");
        println!("---------------------------");
        report::print_channel_information(&channel_info);
        println!("---------------------------");
        println!();
        for descriptor in &populated {
            println!("Channel {} Info:", descriptor.channel);
            for device in 1..=descriptor.device_count.max(1) {
                println!("Device: {device}");
                let state = send_expecting_state(
                    &mut session,
                    ControlRequest::state_request(device_id, descriptor.channel, device),
                )
                .await?;
                println!("State");
                println!("---------------------------");
                report::print_state(&state, descriptor.temperature_unit);
                println!("---------------------------");
                println!();
            }
        }
        return Ok(());
    }

    let suffix = match unit {
        crate::navilink::packet::TemperatureUnit::Fahrenheit => "\u{b0}F",
        _ => "\u{b0}C",
    };

    if let Some(setpoint) = options.recirc_temp {
        let request = ControlRequest::recirculation_temperature_control(
            device_id,
            channel,
            device_number,
            descriptor,
            setpoint,
        )?;
        let state = send_expecting_state(&mut session, request).await?;
        match state.recirculation_setting_temperature {
            Some(value) => println!(
                "Recirculation temperature now set to {} {suffix}",
                temperature::display(unit, value)
            ),
            None => bail!("recirculation temperature does not appear to be supported"),
        }
    }

    if let Some(setpoint) = options.heating_temp {
        let request = ControlRequest::heating_water_temperature_control(
            device_id,
            channel,
            device_number,
            descriptor,
            setpoint,
        )?;
        let state = send_expecting_state(&mut session, request).await?;
        println!(
            "Heating setting temperature now set to {} {suffix}",
            temperature::display(unit, state.heat_setting_temperature)
        );
    }

    if let Some(setpoint) = options.hot_water_temp {
        let request = ControlRequest::water_temperature_control(
            device_id,
            channel,
            device_number,
            descriptor,
            setpoint,
        )?;
        let state = send_expecting_state(&mut session, request).await?;
        println!(
            "Hot water setting temperature now set to {} {suffix}",
            temperature::display(unit, state.hot_water_setting_temperature)
        );
    }

    if let Some(switch) = options.power {
        let request = ControlRequest::power_control(device_id, channel, device_number, switch.into());
        let state = send_expecting_state(&mut session, request).await?;
        println!("Power status is now {}", state.power_status);
    }

    if let Some(switch) = options.heat {
        let request = ControlRequest::heat_control(device_id, channel, device_number, switch.into());
        let state = send_expecting_state(&mut session, request).await?;
        println!("Heat status is now {}", state.heat_status);
    }

    if options.on_demand {
        let request = ControlRequest::on_demand_control(device_id, channel, device_number);
        let state = send_expecting_state(&mut session, request).await?;
        println!("On Demand status is now {}", state.use_on_demand);
    }

    if let Some(switch) = options.schedule {
        let request =
            ControlRequest::weekly_control(device_id, channel, device_number, switch.into());
        let state = send_expecting_state(&mut session, request).await?;
        println!("Weekly schedule control is now {}", state.weekly_control);
    }

    if let Some(edit) = options.modify_schedule {
        let (time, day, switch) = match (
            &options.schedule_time,
            options.schedule_day,
            options.schedule_state,
        ) {
            (Some(time), Some(day), Some(state)) => (time, day, state),
            _ => bail!(
                "must supply --schedule-time, --schedule-day and --schedule-state with --modify-schedule"
            ),
        };
        let (hour, minute) = parse_schedule_time(time)?;

        let current = send_expecting_state(
            &mut session,
            ControlRequest::state_request(device_id, channel, device_number),
        )
        .await?;

        let day_of_week = day.into();
        let day_schedule = current
            .weekly_schedule
            .day(day_of_week)
            .cloned()
            .unwrap_or_else(|| DaySchedule {
                day_of_week,
                ..Default::default()
            });

        let entries = match edit {
            ScheduleEdit::Add => day_schedule.with_entry(ScheduleEntry {
                hour,
                minute,
                state: switch.into(),
            })?,
            ScheduleEdit::Delete => day_schedule.without_entry(hour, minute),
        };

        let block = WeeklyBlock::for_day(day_of_week, entries)?;
        let state = send_expecting_state(
            &mut session,
            ControlRequest::weekly_schedule_update(device_id, channel, device_number, block),
        )
        .await?;
        report::print_state(&state, unit);
    }

    if options.trend_sample {
        let request = Command::Control(ControlRequest::trend_sample_request(
            device_id,
            channel,
            device_number,
        ));
        match session.request(&request).await? {
            Response::TrendSample(sample) => report::print_trend_sample(&sample, unit),
            other => bail!("expected trend sample response, got {other:?}"),
        }
    }

    if options.trend_month {
        let request = Command::Control(ControlRequest::trend_month_request(
            device_id,
            channel,
            device_number,
        ));
        match session.request(&request).await? {
            Response::TrendMonth(cycle) => report::print_trend_cycle(&cycle, unit),
            other => bail!("expected trend month response, got {other:?}"),
        }
    }

    if options.trend_year {
        let request = Command::Control(ControlRequest::trend_year_request(
            device_id,
            channel,
            device_number,
        ));
        match session.request(&request).await? {
            Response::TrendYear(cycle) => report::print_trend_cycle(&cycle, unit),
            other => bail!("expected trend year response, got {other:?}"),
        }
    }

    Ok(())
}

async fn send_expecting_state(
    session: &mut Session,
    request: ControlRequest,
) -> Result<Box<DeviceState>> {
    match session.request(&Command::Control(request)).await? {
        Response::State(state) => Ok(state),
        Response::ErrorCode(error_frame) => {
            report::print_error_report(&error_frame);
            bail!("gateway reported an error frame");
        }
        other => bail!("expected state response, got {other:?}"),
    }
}

fn parse_schedule_time(time: &str) -> Result<(u8, u8)> {
    let parsed = time
        .split_once(':')
        .and_then(|(h, m)| Some((h.parse::<u8>().ok()?, m.parse::<u8>().ok()?)));
    match parsed {
        Some((hour, minute)) if hour < 24 && minute < 60 => Ok((hour, minute)),
        _ => bail!("invalid time specified: {time}"),
    }
}
