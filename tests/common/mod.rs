#![allow(dead_code)]

/// Synthetic frames for the decode tests. Offsets follow the wire layout:
/// 12-byte common header, then the per-control-type payload.
pub struct Factory;

pub const GATEWAY_HEX: &str = "0123456789abcdef";

impl Factory {
    pub fn device_id_bytes() -> [u8; 8] {
        [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]
    }

    pub fn header(control_type: u8, sw_major: u8, sw_minor: u8) -> Vec<u8> {
        let mut data = Self::device_id_bytes().to_vec();
        data.push(0x01); // country code
        data.push(control_type);
        data.push(sw_major);
        data.push(sw_minor);
        data
    }

    fn channel_record(channel: u8, sorting: u8) -> Vec<u8> {
        // sorting, count, unit, water min/max, heating min/max, on-demand,
        // heating control, wwsd, high temperature, warm water
        vec![channel, sorting, 1, 1, 80, 120, 80, 160, 1, 1, 0x0D, 0, 1]
    }

    /// Channel information frame with a device on channel 1 only. Record
    /// width follows the firmware version in the header.
    pub fn channel_information(sw_major: u8, sw_minor: u8) -> Vec<u8> {
        Self::channel_information_with_sorting(sw_major, sw_minor, 9)
    }

    pub fn channel_information_with_sorting(sw_major: u8, sw_minor: u8, sorting: u8) -> Vec<u8> {
        let wide = u16::from(sw_major) * 100 + u16::from(sw_minor) > 1500;
        let mut data = Self::header(1, sw_major, sw_minor);
        data.push(1); // channel 1 in use
        for channel in 1..=3u8 {
            let mut record = Self::channel_record(channel, if channel == 1 { sorting } else { 0 });
            if wide {
                record.extend_from_slice(&[60, 120]); // recirculation limits
            }
            data.extend(record);
        }
        data
    }

    /// State frame for an NPN water heater. `day_counts` sets the declared
    /// entry count of each of the 7 day slots; entries are generated as
    /// hour 6+n, minute 15, alternating ON/OFF. Counts past the 10-triple
    /// slot capacity are declared but not written, for malformed-count tests.
    pub fn state(day_counts: [u8; 7], total_len: usize) -> Vec<u8> {
        let mut data = Self::header(2, 15, 1);
        data.extend_from_slice(&[0xE9, 0x03]); // controller version 1001
        data.extend_from_slice(&[0xFA, 0x00]); // panel version 250
        data.extend_from_slice(&[9, 1, 1, 1]); // NPN, 1 device, channel 1, device 1
        data.extend_from_slice(&[0, 0]); // no error
        data.extend_from_slice(&[1, 50]); // operating device 1, calorimeter 25%
        data.extend_from_slice(&[100, 0]); // instant gas use
        data.extend_from_slice(&[0x88, 0x13, 0, 0]); // accumulated gas 5000
        data.extend_from_slice(&[97, 96]); // hot water setting 48.5, current 48.0
        data.extend_from_slice(&[85, 0]); // flow rate 8.5 LPM
        data.push(40); // inlet 20.0
        data.extend_from_slice(&[90, 70, 65]); // heat setting, supply, return
        data.extend_from_slice(&[1, 2, 2, 1]); // power ON, heat OFF, on-demand OFF, weekly ON
        data.push(7); // day sequence count
        assert_eq!(data.len(), 43);

        for (slot, &count) in day_counts.iter().enumerate() {
            let mut block = [0u8; 32];
            block[0] = slot as u8 + 1; // Sunday-first day tags
            block[1] = count;
            for n in 0..usize::from(count).min(10) {
                block[2 + n * 3] = 6 + n as u8;
                block[2 + n * 3 + 1] = 15;
                block[2 + n * 3 + 2] = if n % 2 == 0 { 1 } else { 2 };
            }
            data.extend_from_slice(&block);
        }
        assert_eq!(data.len(), 267);

        if total_len >= 271 {
            data.extend_from_slice(&[98, 42, 50, 45]); // average temperatures
        }
        if total_len >= 273 {
            data.extend_from_slice(&[110, 108]); // recirculation setting/current
        }
        while data.len() < total_len {
            data.push(0);
        }
        data
    }

    pub fn trend_sample(with_dhw: bool) -> Vec<u8> {
        let mut data = Self::header(3, 15, 1);
        data.extend_from_slice(&[0xE9, 0x03, 0xFA, 0x00]);
        data.extend_from_slice(&[9, 1, 1, 1]);
        data.extend_from_slice(&[0x39, 0x30, 0x00]); // model info 12345
        data.extend_from_slice(&1500u32.to_le_bytes()); // operated time
        data.extend_from_slice(&5000u32.to_le_bytes()); // gas sum
        data.extend_from_slice(&12000u32.to_le_bytes()); // hot water sum
        data.extend_from_slice(&300u32.to_le_bytes()); // central heating time
        assert_eq!(data.len(), 39);
        if with_dhw {
            data.extend_from_slice(&450u32.to_le_bytes());
        }
        data
    }

    /// Trend month/year frame declaring `declared` sequences while carrying
    /// `actual` 22-byte entries.
    pub fn trend_cycle(control_type: u8, declared: u8, actual: usize) -> Vec<u8> {
        let mut data = Self::header(control_type, 15, 1);
        data.extend_from_slice(&[0xE9, 0x03, 0xFA, 0x00]);
        data.extend_from_slice(&[9, 1, 1, 1]);
        data.push(declared);
        assert_eq!(data.len(), 21);

        for n in 0..actual {
            data.push(n as u8 + 1); // day or month index
            data.extend_from_slice(&[0x39, 0x30, 0x00]); // model info
            data.extend_from_slice(&(100 + n as u32).to_le_bytes()); // gas
            data.extend_from_slice(&(200 + n as u32).to_le_bytes()); // hot water
            data.extend_from_slice(&(10 + n as u16).to_le_bytes()); // operated count
            data.extend_from_slice(&(2 + n as u16).to_le_bytes()); // on-demand count
            data.extend_from_slice(&(5 + n as u16).to_le_bytes()); // heat
            data.push(50); // outdoor max 25.0
            data.push(10); // outdoor min 5.0
            data.extend_from_slice(&(7 + n as u16).to_le_bytes()); // dhw
        }
        data
    }
}
