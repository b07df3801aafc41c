mod common;
use common::*;

use navilink_bridge::error::ProtocolError;
use navilink_bridge::navilink::packet::{
    DayOfWeek, DeviceSorting, OnOff, Parser, Response, TemperatureUnit,
};

#[test]
fn channel_information_narrow_records_before_recirculation_firmware() {
    let data = Factory::channel_information(14, 99);
    assert_eq!(data.len(), 52);

    let info = match Parser::parse(&data).unwrap() {
        Response::ChannelInformation(info) => info,
        other => panic!("unexpected response: {other:?}"),
    };

    assert_eq!(info.firmware_version, 1499);
    assert_eq!(info.channels.len(), 3);
    assert_eq!(info.channels[0].device_sorting, DeviceSorting::Npn);
    assert_eq!(info.channels[0].temperature_unit, TemperatureUnit::Celsius);
    assert_eq!(info.channels[0].minimum_water_temperature, 80);
    assert_eq!(info.channels[0].maximum_water_temperature, 120);
    assert!(info.channels[0].minimum_recirculation_temperature.is_none());
    assert!(info.channels[0].maximum_recirculation_temperature.is_none());

    // The second and third records only line up if the 13-byte stride held.
    assert_eq!(info.channels[1].channel, 2);
    assert_eq!(info.channels[2].channel, 3);
    assert_eq!(info.channels[1].device_sorting, DeviceSorting::NoDevice);
}

#[test]
fn channel_information_wide_records_after_recirculation_firmware() {
    let data = Factory::channel_information(15, 1);
    assert_eq!(data.len(), 58);

    let info = match Parser::parse(&data).unwrap() {
        Response::ChannelInformation(info) => info,
        other => panic!("unexpected response: {other:?}"),
    };

    assert_eq!(info.firmware_version, 1501);
    assert_eq!(info.channels.len(), 3);
    assert_eq!(
        info.channels[0].minimum_recirculation_temperature,
        Some(60)
    );
    assert_eq!(
        info.channels[0].maximum_recirculation_temperature,
        Some(120)
    );
    assert_eq!(info.channels[1].channel, 2);
    assert_eq!(info.channels[2].channel, 3);
}

#[test]
fn channel_information_wwsd_bits() {
    let data = Factory::channel_information(14, 99);
    let info = match Parser::parse(&data).unwrap() {
        Response::ChannelInformation(info) => info,
        other => panic!("unexpected response: {other:?}"),
    };

    // Fixture carries 0x0D: bits 0, 2 and 3 set.
    let wwsd = info.channels[0].wwsd;
    assert!(wwsd.wwsd_active());
    assert!(!wwsd.commercial_lock());
    assert!(wwsd.hot_water_possible());
    assert!(wwsd.recirculation_possible());
}

#[test]
fn unrecognized_device_sorting_is_data_not_failure() {
    let data = Factory::channel_information_with_sorting(14, 99, 77);
    let info = match Parser::parse(&data).unwrap() {
        Response::ChannelInformation(info) => info,
        other => panic!("unexpected response: {other:?}"),
    };

    assert_eq!(
        info.channels[0].device_sorting,
        DeviceSorting::Unrecognized(77)
    );
    // Everything after the odd byte still decodes.
    assert_eq!(info.channels[0].maximum_heating_temperature, 160);
}

#[test]
fn state_without_average_fields() {
    let data = Factory::state([0; 7], 270);
    let state = match Parser::parse(&data).unwrap() {
        Response::State(state) => state,
        other => panic!("unexpected response: {other:?}"),
    };

    assert_eq!(state.controller_version, 1001);
    assert_eq!(state.panel_version, 250);
    assert_eq!(state.device_sorting, DeviceSorting::Npn);
    assert_eq!(state.error(), None);
    assert_eq!(state.gas_accumulated_use, 5000);
    assert_eq!(state.hot_water_setting_temperature, 97);
    assert_eq!(state.hot_water_flow_rate, 85);
    assert_eq!(state.power_status, OnOff::On);
    assert_eq!(state.heat_status, OnOff::Off);
    assert_eq!(state.weekly_control, OnOff::On);

    assert!(state.hot_water_average_temperature.is_none());
    assert!(state.inlet_average_temperature.is_none());
    assert!(state.supply_average_temperature.is_none());
    assert!(state.return_average_temperature.is_none());
    assert!(state.recirculation_setting_temperature.is_none());
    assert!(state.recirculation_current_temperature.is_none());
}

#[test]
fn state_with_average_and_recirculation_fields() {
    let data = Factory::state([0; 7], 274);
    let state = match Parser::parse(&data).unwrap() {
        Response::State(state) => state,
        other => panic!("unexpected response: {other:?}"),
    };

    assert_eq!(state.hot_water_average_temperature, Some(98));
    assert_eq!(state.inlet_average_temperature, Some(42));
    assert_eq!(state.supply_average_temperature, Some(50));
    assert_eq!(state.return_average_temperature, Some(45));
    assert_eq!(state.recirculation_setting_temperature, Some(110));
    assert_eq!(state.recirculation_current_temperature, Some(108));
}

#[test]
fn weekly_schedule_respects_declared_entry_counts() {
    let data = Factory::state([0, 1, 10, 3, 0, 0, 0], 270);
    let state = match Parser::parse(&data).unwrap() {
        Response::State(state) => state,
        other => panic!("unexpected response: {other:?}"),
    };

    let days = &state.weekly_schedule.days;
    assert_eq!(days[0].day_of_week, DayOfWeek::Sunday);
    assert!(days[0].entries.is_empty());

    assert_eq!(days[1].entries.len(), 1);
    assert_eq!(days[1].entries[0].hour, 6);
    assert_eq!(days[1].entries[0].minute, 15);
    assert_eq!(days[1].entries[0].state, OnOff::On);

    assert_eq!(days[2].entries.len(), 10);
    assert_eq!(days[2].entries[9].hour, 15);
    assert_eq!(days[2].entries[9].state, OnOff::Off);

    // The cursor must land on the next slot no matter the previous count.
    assert_eq!(days[3].day_of_week, DayOfWeek::Wednesday);
    assert_eq!(days[3].entries.len(), 3);
    assert_eq!(days[3].entries[2].hour, 8);

    assert_eq!(days[6].day_of_week, DayOfWeek::Saturday);
    assert!(days[6].entries.is_empty());
}

#[test]
fn weekly_schedule_rejects_count_past_slot_capacity() {
    let data = Factory::state([0, 0, 11, 0, 0, 0, 0], 270);
    match Parser::parse(&data) {
        Err(ProtocolError::MalformedPayload { reason }) => {
            assert!(reason.contains("11"), "reason was: {reason}")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn trend_sample_short_and_long_layouts() {
    let short = Factory::trend_sample(false);
    assert_eq!(short.len(), 39);
    let sample = match Parser::parse(&short).unwrap() {
        Response::TrendSample(sample) => sample,
        other => panic!("unexpected response: {other:?}"),
    };
    assert_eq!(sample.model_info, 12345);
    assert_eq!(sample.total_gas_accumulated, 5000);
    assert_eq!(sample.total_hot_water_accumulated, 12000);
    assert!(sample.total_dhw_usage_time.is_none());

    let long = Factory::trend_sample(true);
    assert_eq!(long.len(), 43);
    let sample = match Parser::parse(&long).unwrap() {
        Response::TrendSample(sample) => sample,
        other => panic!("unexpected response: {other:?}"),
    };
    assert_eq!(sample.total_dhw_usage_time, Some(450));
}

#[test]
fn trend_cycle_honors_declared_sequence_count() {
    let data = Factory::trend_cycle(4, 5, 5);
    let cycle = match Parser::parse(&data).unwrap() {
        Response::TrendMonth(cycle) => cycle,
        other => panic!("unexpected response: {other:?}"),
    };

    assert_eq!(cycle.declared_sequences, 5);
    assert_eq!(cycle.sequences.len(), 5);
    assert_eq!(cycle.sequences[0].index, 1);
    assert_eq!(cycle.sequences[4].index, 5);
    assert_eq!(cycle.sequences[4].gas_accumulated_use, 104);
    assert_eq!(cycle.sequences[4].hot_water_operated_count, 14);
    assert_eq!(cycle.sequences[2].outdoor_air_max_temperature, 50);
}

#[test]
fn trend_year_uses_the_shared_layout() {
    let data = Factory::trend_cycle(5, 12, 12);
    match Parser::parse(&data).unwrap() {
        Response::TrendYear(cycle) => assert_eq!(cycle.sequences.len(), 12),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn trend_cycle_truncated_when_entries_missing() {
    let data = Factory::trend_cycle(4, 31, 5);
    match Parser::parse(&data) {
        Err(ProtocolError::Truncated { needed, got }) => {
            assert_eq!(needed, 21 + 31 * 22);
            assert_eq!(got, 21 + 5 * 22);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn error_code_frames_surface_raw_payload() {
    let mut data = Factory::header(6, 15, 1);
    data.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    match Parser::parse(&data).unwrap() {
        Response::ErrorCode(report) => assert_eq!(report.raw, vec![0xDE, 0xAD, 0xBE, 0xEF]),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn control_type_zero_is_unknown_control_type() {
    let data = Factory::header(0, 15, 1);
    match Parser::parse(&data) {
        Err(ProtocolError::UnknownControlType) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn out_of_range_control_type_is_malformed_header() {
    let data = Factory::header(99, 15, 1);
    match Parser::parse(&data) {
        Err(ProtocolError::MalformedHeader { tag }) => assert_eq!(tag, 99),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn truncated_header_fails_before_any_read() {
    let data = vec![0u8; 11];
    match Parser::parse(&data) {
        Err(ProtocolError::Truncated { needed, got }) => {
            assert_eq!(needed, 12);
            assert_eq!(got, 11);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn truncated_state_reports_required_length() {
    let data = Factory::state([0; 7], 270);
    match Parser::parse(&data[..100]) {
        Err(ProtocolError::Truncated { needed, got }) => {
            assert_eq!(needed, 267);
            assert_eq!(got, 100);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn truncated_channel_information_reports_required_length() {
    let data = Factory::channel_information(14, 99);
    match Parser::parse(&data[..30]) {
        Err(ProtocolError::Truncated { needed, got }) => {
            assert_eq!(needed, 52);
            assert_eq!(got, 30);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
