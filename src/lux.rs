//! Count-to-lux conversion.
//!
//! The resolution (lux per count) depends on the configured gain and
//! integration time. The integration time codes on the wire are not
//! monotonic with the table column order, so the mapping is a lookup,
//! not a formula.

use crate::register::BitFlags;
use crate::{Gain, IntegrationTime, ToRegisterValue};

pub const GAIN_COUNT: usize = 4;
pub const IT_COUNT: usize = 6;

/// Resolution in lx/count per gain and integration time slot, from the
/// application note "Designing the VEML7700 Into an Application".
#[rustfmt::skip]
pub(crate) const RESOLUTION_MAP: [[f32; IT_COUNT]; GAIN_COUNT] = [
    // 100ms   200ms   400ms   800ms   25ms    50ms
    [0.0576, 0.0288, 0.0144, 0.0072, 0.2304, 0.1152], // x1
    [0.0288, 0.0144, 0.0072, 0.0036, 0.1152, 0.0576], // x2
    [0.4608, 0.2304, 0.1152, 0.0576, 1.8432, 0.9216], // x1/8
    [0.2304, 0.1152, 0.0576, 0.0288, 0.9216, 0.4608], // x1/4
];

/// Maps a raw 4-bit integration time code to its column in the resolution
/// table. Total over all inputs: undefined codes fall back to the 100ms
/// column rather than indexing out of bounds.
pub fn time_to_index(code: u8) -> usize {
    match code & 0b1111 {
        code @ 0b0000..=0b0011 => code as usize,
        0b1100 => 4,
        0b1000 => 5,
        _ => 0,
    }
}

/// Resolution in lx/count for the given gain and integration time.
pub fn resolution(gain: Gain, integration_time: IntegrationTime) -> f32 {
    let gain_index = (gain.register_value() & BitFlags::ALS_CONF_GAIN_MASK) as usize;
    RESOLUTION_MAP[gain_index][time_to_index(integration_time.register_value() as u8)]
}

/// Converts raw counts to lux for the given gain and integration time.
///
/// Never fails: out-of-range gain codes are masked and unknown integration
/// time codes default to the 100ms column.
pub fn compute_lux(counts: u16, gain: Gain, integration_time: IntegrationTime) -> f32 {
    resolution(gain, integration_time) * counts as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_to_index_matches_wire_codes() {
        assert_eq!(time_to_index(0b0000), 0); // 100ms
        assert_eq!(time_to_index(0b0001), 1); // 200ms
        assert_eq!(time_to_index(0b0010), 2); // 400ms
        assert_eq!(time_to_index(0b0011), 3); // 800ms
        assert_eq!(time_to_index(0b1100), 4); // 25ms
        assert_eq!(time_to_index(0b1000), 5); // 50ms
    }

    #[test]
    fn time_to_index_is_total_over_4bit_codes() {
        for code in 0u8..=0b1111 {
            let index = time_to_index(code);
            assert!(index < IT_COUNT, "code {code:#06b} mapped to {index}");
        }
        // codes beyond 4 bits are masked down first
        assert_eq!(time_to_index(0xFC), time_to_index(0x0C));
    }

    #[test]
    fn resolution_covers_all_combinations() {
        let gains = [Gain::X1, Gain::X2, Gain::X1_8, Gain::X1_4];
        let times = [
            IntegrationTime::Ms100,
            IntegrationTime::Ms200,
            IntegrationTime::Ms400,
            IntegrationTime::Ms800,
            IntegrationTime::Ms25,
            IntegrationTime::Ms50,
        ];

        for (gain_index, gain) in gains.iter().enumerate() {
            for (it_index, time) in times.iter().enumerate() {
                assert_eq!(
                    resolution(*gain, *time),
                    RESOLUTION_MAP[gain_index][it_index],
                    "gain {gain:?}, integration time {time:?}"
                );
            }
        }
    }

    #[test]
    fn compute_lux_x1_100ms() {
        let lux = compute_lux(1000, Gain::X1, IntegrationTime::Ms100);
        assert!((lux - 57.6).abs() < 1e-3, "got {lux}");
    }

    #[test]
    fn compute_lux_zero_counts() {
        assert_eq!(compute_lux(0, Gain::X1_8, IntegrationTime::Ms800), 0.0);
    }
}
