//! Plain-text rendering of decoded frames. Every enumeration and every
//! decoded field surfaces here, in the unit the channel advertises.

use crate::cloud::GatewayDescriptor;
use crate::navilink::packet::{
    ChannelInformation, DeviceState, ErrorReport, TemperatureUnit, TrendCycle, TrendSample,
};
use crate::navilink::temperature;
use crate::utils::Utils;

const CUBIC_FEET_PER_CUBIC_METER: f64 = 35.314667;
const LITERS_PER_GALLON: f64 = 3.785;
const BTU_PER_KCAL: f64 = 3.968;

pub fn print_gateway(gateway: &GatewayDescriptor) {
    println!("---------------------------");
    println!("Device ID: {}", gateway.gid);
    println!("Nickname: {}", gateway.nickname);
    println!("State: {}", gateway.state);
    println!("Connected: {}", gateway.connection_time);
    println!("Server IP Address: {}", gateway.server_ip);
    println!("Server TCP Port Number: {}", gateway.server_port);
    println!("---------------------------");
    println!();
}

pub fn print_channel_information(information: &ChannelInformation) {
    for channel in &information.channels {
        println!("Channel:{}", channel.channel);
        println!("\tDevice Model Type: {}", channel.device_sorting);
        println!("\tDevice Count: {}", channel.device_count);
        println!("\tTemp Flag: {}", channel.temperature_unit);
        let unit = channel.temperature_unit;
        println!(
            "\tMinimum Setting Water Temperature: {}",
            temperature::display(unit, channel.minimum_water_temperature)
        );
        println!(
            "\tMaximum Setting Water Temperature: {}",
            temperature::display(unit, channel.maximum_water_temperature)
        );
        println!(
            "\tHeating Minimum Setting Water Temperature: {}",
            temperature::display(unit, channel.minimum_heating_temperature)
        );
        println!(
            "\tHeating Maximum Setting Water Temperature: {}",
            temperature::display(unit, channel.maximum_heating_temperature)
        );
        println!("\tUse On Demand: {}", channel.use_on_demand);
        println!("\tHeating Control: {}", channel.heating_control);
        println!(
            "\twwsdFlag: {}",
            if channel.wwsd.wwsd_active() { "FAIL" } else { "OK" }
        );
        println!(
            "\tcommercialLock: {}",
            if channel.wwsd.commercial_lock() { "LOCK" } else { "OK" }
        );
        println!(
            "\thotwaterPossibility: {}",
            if channel.wwsd.hot_water_possible() { "ON" } else { "OFF" }
        );
        println!(
            "\trecirculationPossibility: {}",
            if channel.wwsd.recirculation_possible() { "ON" } else { "OFF" }
        );
        println!("\tHigh Temperature: {}", channel.high_temperature);
        println!("\tUse Warm Water: {}", channel.use_warm_water);
        if let (Some(min), Some(max)) = (
            channel.minimum_recirculation_temperature,
            channel.maximum_recirculation_temperature,
        ) {
            println!(
                "\tMinimum Recirculation Temperature: {}",
                temperature::display(unit, min)
            );
            println!(
                "\tMaximum Recirculation Temperature: {}",
                temperature::display(unit, max)
            );
        }
    }
}

pub fn print_state(state: &DeviceState, unit: TemperatureUnit) {
    println!("Controller Version: {}", state.controller_version);
    println!("Panel Version: {}", state.panel_version);
    println!("Device Model Type: {}", state.device_sorting);
    println!("Device Count: {}", state.device_count);
    println!("Current Channel: {}", state.current_channel);
    println!("Device Number: {}", state.device_number);
    match state.error() {
        Some(code) => println!("Error Code: {code}"),
        None => println!("Error Code: Normal"),
    }
    println!(
        "Operation Device Number: {}",
        state.operation_device_number
    );
    println!(
        "Average Calorimeter: {} %",
        f64::from(state.average_calorimeter) / 2.0
    );

    let sorting = state.device_sorting;
    let gas_factor = f64::from(sorting.gas_instant_factor(unit));
    match unit {
        TemperatureUnit::Fahrenheit => {
            // Gas counters are summed across cascaded units by the server.
            println!(
                "Current Gas Usage: {} BTU",
                f64::from(state.gas_instant_use) * gas_factor * BTU_PER_KCAL
            );
            println!(
                "Total Gas Usage: {} ft\u{b3}",
                f64::from(state.gas_accumulated_use) * CUBIC_FEET_PER_CUBIC_METER / 10.0
            );
        }
        _ => {
            println!(
                "Current Gas Usage: {} kcal",
                f64::from(state.gas_instant_use) * gas_factor / 10.0
            );
            println!(
                "Total Gas Usage: {} m\u{b3}",
                f64::from(state.gas_accumulated_use) / 10.0
            );
        }
    }

    let suffix = match unit {
        TemperatureUnit::Fahrenheit => "\u{b0}F",
        _ => "\u{b0}C",
    };

    if sorting.has_hot_water() {
        println!(
            "Hot Water Setting Temperature: {} {suffix}",
            temperature::display(unit, state.hot_water_setting_temperature)
        );
        if sorting.is_cascade() {
            if let Some(average) = state.hot_water_average_temperature {
                println!(
                    "Hot Water Average Temperature: {} {suffix}",
                    temperature::display(unit, average)
                );
            }
            if let Some(average) = state.inlet_average_temperature {
                println!(
                    "Inlet Average Temperature: {} {suffix}",
                    temperature::display(unit, average)
                );
            }
        }
        println!(
            "Hot Water Current Temperature: {} {suffix}",
            temperature::display(unit, state.hot_water_current_temperature)
        );
        match unit {
            TemperatureUnit::Fahrenheit => println!(
                "Hot Water Flow Rate: {} GPM",
                f64::from(state.hot_water_flow_rate) / LITERS_PER_GALLON / 10.0
            ),
            _ => println!(
                "Hot Water Flow Rate: {} LPM",
                f64::from(state.hot_water_flow_rate) / 10.0
            ),
        }
        println!(
            "Inlet Temperature: {} {suffix}",
            temperature::display(unit, state.inlet_temperature)
        );
        if let Some(setting) = state.recirculation_setting_temperature {
            println!(
                "Recirculation Setting Temperature: {} {suffix}",
                temperature::display(unit, setting)
            );
        }
        if let Some(current) = state.recirculation_current_temperature {
            println!(
                "Recirculation Current Temperature: {} {suffix}",
                temperature::display(unit, current)
            );
        }
    }

    if sorting.has_central_heating() {
        // The setpoint is meaningless on cascades but the server sends it
        // regardless; print it the way the vendor app does.
        println!(
            "Heat Setting Temperature: {} {suffix}",
            temperature::display(unit, state.heat_setting_temperature)
        );
        if sorting.is_cascade() {
            if let Some(average) = state.supply_average_temperature {
                println!(
                    "Supply Average Temperature: {} {suffix}",
                    temperature::display(unit, average)
                );
            }
            if let Some(average) = state.return_average_temperature {
                println!(
                    "Return Average Temperature: {} {suffix}",
                    temperature::display(unit, average)
                );
            }
        }
        println!(
            "Current Supply Water Temperature: {} {suffix}",
            temperature::display(unit, state.current_supply_temperature)
        );
        println!(
            "Current Return Water Temperature: {} {suffix}",
            temperature::display(unit, state.current_return_temperature)
        );
    }

    println!("Power Status: {}", state.power_status);
    println!("Heat Status: {}", state.heat_status);
    println!("Use On Demand: {}", state.use_on_demand);
    println!("Weekly Control: {}", state.weekly_control);

    println!("Day Sequences");
    for day in &state.weekly_schedule.days {
        println!("\t{}", day.day_of_week);
        if day.entries.is_empty() {
            println!("\t\tNone");
        } else {
            for entry in &day.entries {
                println!(
                    "\t\tHour: {}, Minute: {}, {}",
                    entry.hour, entry.minute, entry.state
                );
            }
        }
    }
}

pub fn print_trend_sample(sample: &TrendSample, unit: TemperatureUnit) {
    println!("Controller Version: {}", sample.controller_version);
    println!("Panel Version: {}", sample.panel_version);
    println!("Device Model Type: {}", sample.device_sorting);
    println!("Device Count: {}", sample.device_count);
    println!("Current Channel: {}", sample.current_channel);
    println!("Device Number: {}", sample.device_number);
    println!("Model Info: {}", sample.model_info);
    println!("Total Operated Time: {}", sample.total_operated_time);
    match unit {
        TemperatureUnit::Fahrenheit => println!(
            "Total Gas Accumulated Sum: {} ft\u{b3}",
            f64::from(sample.total_gas_accumulated) * CUBIC_FEET_PER_CUBIC_METER / 10.0
        ),
        _ => println!(
            "Total Gas Accumulated Sum: {} m\u{b3}",
            f64::from(sample.total_gas_accumulated) / 10.0
        ),
    }
    println!(
        "Total Hot Water Accumulated Sum: {}",
        sample.total_hot_water_accumulated
    );
    println!(
        "Total Central Heating Operated Time: {}",
        sample.total_central_heating_operated_time
    );
    if let Some(dhw) = sample.total_dhw_usage_time {
        println!("Total Domestic Hot Water Usage Time: {dhw}");
    }
}

pub fn print_trend_cycle(cycle: &TrendCycle, unit: TemperatureUnit) {
    println!("Controller Version: {}", cycle.controller_version);
    println!("Panel Version: {}", cycle.panel_version);
    println!("Device Model Type: {}", cycle.device_sorting);
    println!("Device Count: {}", cycle.device_count);
    println!("Current Channel: {}", cycle.current_channel);
    println!("Device Number: {}", cycle.device_number);

    for entry in &cycle.sequences {
        println!("\tIndex: {}", entry.index);
        println!("\t\tModel Info: {}", entry.model_info);
        println!(
            "\t\tHot Water Operated Count: {}",
            entry.hot_water_operated_count
        );
        println!("\t\tOn Demand Use Count: {}", entry.on_demand_use_count);
        println!("\t\tHeat Accumulated Use: {}", entry.heat_accumulated_use);
        println!(
            "\t\tDomestic Hot Water Accumulated Use: {}",
            entry.dhw_accumulated_use
        );
        match unit {
            TemperatureUnit::Fahrenheit => {
                println!(
                    "\t\tTotal Gas Usage: {} ft\u{b3}",
                    f64::from(entry.gas_accumulated_use) * CUBIC_FEET_PER_CUBIC_METER / 10.0
                );
                println!(
                    "\t\tHot water Accumulated Use: {} G",
                    Utils::round(
                        f64::from(entry.hot_water_accumulated_use) / LITERS_PER_GALLON / 10.0,
                        2
                    )
                );
                println!(
                    "\t\tOutdoor Air Max Temperature: {} \u{b0}F",
                    entry.outdoor_air_max_temperature
                );
                println!(
                    "\t\tOutdoor Air Min Temperature: {} \u{b0}F",
                    entry.outdoor_air_min_temperature
                );
            }
            _ => {
                println!(
                    "\t\tTotal Gas Usage: {} m\u{b3}",
                    f64::from(entry.gas_accumulated_use) / 10.0
                );
                println!(
                    "\t\tHot water Accumulated Use: {} L",
                    f64::from(entry.hot_water_accumulated_use) / 10.0
                );
                println!(
                    "\t\tOutdoor Air Max Temperature: {} \u{b0}C",
                    f64::from(entry.outdoor_air_max_temperature) / 2.0
                );
                println!(
                    "\t\tOutdoor Air Min Temperature: {} \u{b0}C",
                    f64::from(entry.outdoor_air_min_temperature) / 2.0
                );
            }
        }
    }
}

pub fn print_error_report(report: &ErrorReport) {
    // Payload layout unknown; show what the server sent so it can be filed.
    println!("Device {} reported an error frame:", report.device_id);
    println!("\t{}", hex::encode(&report.raw));
}
