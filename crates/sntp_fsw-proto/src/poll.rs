// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Poll interval derived from how fast the local clock drifts.
//!
//! A clock with a frequency tolerance of `f` ppm drifts `f` microseconds per
//! second, so it stays within `a` milliseconds of true time for
//! `a * 1000 / f` seconds. The interval returned is the largest power of two
//! not exceeding that bound, matching the NTP convention of poll exponents.

use crate::status::Status;

/// Largest power-of-two poll interval, in seconds, that keeps a clock with
/// `clock_freq_tolerance_ppm` within `desired_accuracy_ms` of the server.
///
/// Fails with [`Status::BadParameter`] if either input is zero and with
/// [`Status::ZeroPollInterval`] if the clock would need polling more often
/// than once a second.
pub fn calculate_poll_interval(
    clock_freq_tolerance_ppm: u16,
    desired_accuracy_ms: u16,
) -> Result<u32, Status> {
    if clock_freq_tolerance_ppm == 0 || desired_accuracy_ms == 0 {
        return Err(Status::BadParameter);
    }
    let exact = u32::from(desired_accuracy_ms) * 1000 / u32::from(clock_freq_tolerance_ppm);
    if exact == 0 {
        return Err(Status::ZeroPollInterval);
    }
    Ok(1 << exact.ilog2())
}

/// The poll exponent (log2 seconds) for a poll interval from
/// [`calculate_poll_interval`].
pub fn poll_exponent(interval_secs: u32) -> Option<i8> {
    (interval_secs != 0).then(|| interval_secs.ilog2() as i8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inputs_are_bad_parameters() {
        assert_eq!(calculate_poll_interval(0, 100), Err(Status::BadParameter));
        assert_eq!(calculate_poll_interval(100, 0), Err(Status::BadParameter));
    }

    #[test]
    fn sub_second_interval_is_zero_poll_interval() {
        // 1 ms of accuracy at 2000 ppm lasts half a second.
        assert_eq!(
            calculate_poll_interval(2000, 1),
            Err(Status::ZeroPollInterval)
        );
    }

    #[test]
    fn rounds_down_to_power_of_two() {
        // 500 ms at 200 ppm: exactly 2500 s, rounded down to 2048.
        assert_eq!(calculate_poll_interval(200, 500), Ok(2048));
        // 1 ms at 1000 ppm: exactly one second.
        assert_eq!(calculate_poll_interval(1000, 1), Ok(1));
        assert_eq!(calculate_poll_interval(1, u16::MAX), Ok(1 << 25));
    }

    #[test]
    fn exponent_matches_interval() {
        assert_eq!(poll_exponent(2048), Some(11));
        assert_eq!(poll_exponent(1), Some(0));
        assert_eq!(poll_exponent(0), None);
    }
}
