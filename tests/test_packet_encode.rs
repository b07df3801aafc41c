mod common;
use common::*;

use navilink_bridge::error::ValidationError;
use navilink_bridge::navilink::packet::{
    ChannelDescriptor, CommandFrame, ControlRequest, DayOfWeek, DeviceSorting, HeatingControl,
    HighTemperature, OnDemandFlag, OnOff, OperationModeCommand, ScheduleEntry, TemperatureUnit,
    WeeklyBlock, Wwsd, OPERATION_LENGTH, REQUEST_LENGTH,
};
use navilink_bridge::navilink::session::GatewayId;
use navilink_bridge::navilink::temperature;

fn device_id() -> GatewayId {
    GATEWAY_HEX.parse().unwrap()
}

fn celsius_descriptor() -> ChannelDescriptor {
    ChannelDescriptor {
        channel: 1,
        device_sorting: DeviceSorting::Npn,
        device_count: 1,
        temperature_unit: TemperatureUnit::Celsius,
        minimum_water_temperature: temperature::to_byte(40.0),
        maximum_water_temperature: temperature::to_byte(60.0),
        minimum_heating_temperature: temperature::to_byte(40.0),
        maximum_heating_temperature: temperature::to_byte(80.0),
        use_on_demand: OnDemandFlag::On,
        heating_control: HeatingControl::Supply,
        wwsd: Wwsd::from(0x0D),
        high_temperature: HighTemperature::Temperature60,
        use_warm_water: OnOff::On,
        minimum_recirculation_temperature: None,
        maximum_recirculation_temperature: None,
    }
}

#[test]
fn power_on_request_is_byte_exact() {
    let request = ControlRequest::power_control(device_id(), 1, 1, OnOff::On);
    let frame = request.bytes();

    #[rustfmt::skip]
    let expected: Vec<u8> = vec![
        // request header
        0x07, 0x99, 0x00, 0xA6, 0x37, 0x00,
        // device id
        0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF,
        // count, channel, device, sorting=CONTROL, info item, control item=POWER, value=ON
        0x01, 0x01, 0x01, 0x02, 0x00, 0x01, 0x01,
        // zeroed weekly block
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    assert_eq!(frame.len(), REQUEST_LENGTH);
    assert_eq!(frame, expected);
}

#[test]
fn state_request_uses_info_sorting() {
    let request = ControlRequest::state_request(device_id(), 2, 1);
    let frame = request.bytes();

    assert_eq!(frame.len(), REQUEST_LENGTH);
    assert_eq!(&frame[0..6], &[0x07, 0x99, 0x00, 0xA6, 0x37, 0x00]);
    assert_eq!(&frame[6..14], &Factory::device_id_bytes());
    // count, channel, device, sorting=INFO, info item=STATE, no control tuple
    assert_eq!(&frame[14..21], &[0x01, 0x02, 0x01, 0x01, 0x02, 0x00, 0x00]);
    assert!(frame[21..].iter().all(|&b| b == 0));
}

#[test]
fn trend_requests_carry_their_control_type() {
    let sample = ControlRequest::trend_sample_request(device_id(), 1, 1).bytes();
    let month = ControlRequest::trend_month_request(device_id(), 1, 1).bytes();
    let year = ControlRequest::trend_year_request(device_id(), 1, 1).bytes();

    assert_eq!(sample[18], 0x03);
    assert_eq!(month[18], 0x04);
    assert_eq!(year[18], 0x05);
}

#[test]
fn weekly_schedule_update_populates_the_block() {
    let entries = vec![
        ScheduleEntry {
            hour: 6,
            minute: 30,
            state: OnOff::On,
        },
        ScheduleEntry {
            hour: 22,
            minute: 15,
            state: OnOff::Off,
        },
    ];
    let block = WeeklyBlock::for_day(DayOfWeek::Monday, entries).unwrap();
    let request = ControlRequest::weekly_schedule_update(device_id(), 1, 1, block);
    let frame = request.bytes();

    // Frame length never varies; the block rides in the fixed tail.
    assert_eq!(frame.len(), REQUEST_LENGTH);
    assert_eq!(frame[19], 0x06); // control item WEEKLY
    assert_eq!(frame[21], 0x02); // Monday
    assert_eq!(frame[22], 2); // entry count
    assert_eq!(&frame[23..26], &[6, 30, 0x01]);
    assert_eq!(&frame[26..29], &[22, 15, 0x02]);
    assert!(frame[29..].iter().all(|&b| b == 0));
}

#[test]
fn weekly_block_rejects_invalid_times_and_overflow() {
    let bad_time = WeeklyBlock::for_day(
        DayOfWeek::Monday,
        vec![ScheduleEntry {
            hour: 24,
            minute: 0,
            state: OnOff::On,
        }],
    );
    match bad_time {
        Err(ValidationError::BadScheduleTime { hour: 24, minute: 0 }) => {}
        other => panic!("unexpected result: {other:?}"),
    }

    let eleven = (0..11)
        .map(|n| ScheduleEntry {
            hour: n,
            minute: 0,
            state: OnOff::On,
        })
        .collect();
    match WeeklyBlock::for_day(DayOfWeek::Monday, eleven) {
        Err(ValidationError::ScheduleFull { max: 10 }) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn in_range_setpoint_encodes_half_degrees() {
    let request =
        ControlRequest::water_temperature_control(device_id(), 1, 1, &celsius_descriptor(), 48.5)
            .unwrap();
    let frame = request.bytes();
    assert_eq!(frame[19], 0x03); // control item WATER_TEMPERATURE
    assert_eq!(frame[20], 97); // 48.5 C in half-degree steps
}

#[test]
fn out_of_range_setpoint_fails_without_a_frame() {
    let result =
        ControlRequest::water_temperature_control(device_id(), 1, 1, &celsius_descriptor(), 95.0);
    match result {
        Err(ValidationError::SetpointOutOfRange {
            requested,
            min,
            max,
        }) => {
            assert_eq!(requested, 95.0);
            assert_eq!(min, 40.0);
            assert_eq!(max, 60.0);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn recirculation_setpoint_requires_advertised_limits() {
    let result = ControlRequest::recirculation_temperature_control(
        device_id(),
        1,
        1,
        &celsius_descriptor(),
        45.0,
    );
    match result {
        Err(ValidationError::RecirculationUnsupported) => {}
        other => panic!("unexpected result: {other:?}"),
    }

    let mut descriptor = celsius_descriptor();
    descriptor.minimum_recirculation_temperature = Some(temperature::to_byte(30.0));
    descriptor.maximum_recirculation_temperature = Some(temperature::to_byte(60.0));
    let request =
        ControlRequest::recirculation_temperature_control(device_id(), 1, 1, &descriptor, 45.0)
            .unwrap();
    assert_eq!(request.bytes()[19], 0x07);
    assert_eq!(request.bytes()[20], 90);
}

#[test]
fn fahrenheit_setpoints_encode_whole_degrees() {
    let mut descriptor = celsius_descriptor();
    descriptor.temperature_unit = TemperatureUnit::Fahrenheit;
    descriptor.minimum_water_temperature = 100;
    descriptor.maximum_water_temperature = 140;

    let request =
        ControlRequest::water_temperature_control(device_id(), 1, 1, &descriptor, 120.0).unwrap();
    assert_eq!(request.bytes()[20], 120);

    match ControlRequest::water_temperature_control(device_id(), 1, 1, &descriptor, 150.0) {
        Err(ValidationError::SetpointOutOfRange { min, max, .. }) => {
            assert_eq!(min, 100.0);
            assert_eq!(max, 140.0);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn operation_mode_power_on_is_byte_exact() {
    let command = OperationModeCommand::power_on(device_id());
    let frame = command.bytes();

    #[rustfmt::skip]
    let expected: Vec<u8> = vec![
        // sequence, command, data length, count
        0x00, 0x83, 0x15, 0x00,
        // device id
        0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF,
        // command sequence, mode=POWER_ON, values
        0x01, 0x02, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];

    assert_eq!(frame.len(), OPERATION_LENGTH);
    assert_eq!(frame, expected);
}

#[test]
fn operation_mode_setpoints_validate_against_range() {
    let range = temperature::SetpointRange::new(
        temperature::to_byte(10.0),
        temperature::to_byte(30.0),
    );

    let command = OperationModeCommand::inside_heat(device_id(), range, 21.5).unwrap();
    let frame = command.bytes();
    assert_eq!(frame[13], 0x05); // INSIDE_HEAT
    assert_eq!(frame[18], 43); // 21.5 C

    match OperationModeCommand::inside_heat(device_id(), range, 35.0) {
        Err(ValidationError::SetpointOutOfRange { max, .. }) => assert_eq!(max, 30.0),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn operation_mode_heat_level_and_reserve_values() {
    use navilink_bridge::navilink::packet::HeatLevel;

    let level = OperationModeCommand::heat_level(device_id(), HeatLevel::Medium);
    assert_eq!(level.bytes()[13], 14);
    assert_eq!(level.bytes()[18], 2);

    let repeat = OperationModeCommand::repeat_reserve(device_id(), 3, 45);
    assert_eq!(repeat.bytes()[13], 7);
    assert_eq!(&repeat.bytes()[16..19], &[0, 3, 45]);

    let circle = OperationModeCommand::circle_reserve(device_id(), [1, 2, 3]);
    assert_eq!(circle.bytes()[13], 8);
    assert_eq!(&circle.bytes()[16..19], &[1, 2, 3]);
}
