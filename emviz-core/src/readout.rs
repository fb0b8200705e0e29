//! Fixed-precision readouts shown next to each visualization.
use std::f64::consts::TAU;

/// Values that would print as `-0.00` print as `0.00` instead.
fn suppress_negative_zero(value: f64, decimals: i32) -> f64 {
    let half_step = 0.5 * 10f64.powi(-decimals);
    if value.abs() < half_step {
        0.0
    } else {
        value
    }
}

/// `"12.3 V"`
pub fn format_voltage(volts: f64) -> String {
    format!("{:.1} V", suppress_negative_zero(volts, 1))
}

/// `"Power Factor: 0.71"`
pub fn format_power_factor(pf: f64) -> String {
    format!("Power Factor: {:.2}", suppress_negative_zero(pf, 2))
}

/// Whole degrees in `[0, 360)`, e.g. `"180°"`.
pub fn format_degrees(radians: f64) -> String {
    let degrees = radians.rem_euclid(TAU).to_degrees().round();
    let degrees = if degrees >= 360.0 { 0.0 } else { degrees };
    format!("{degrees:.0}°")
}

/// Signed, two decimals: `"+0.50"`, `"-1.00"`.
pub fn format_signed(value: f64) -> String {
    format!("{:+.2}", suppress_negative_zero(value, 2))
}

/// `"Flux: 50%"`
pub fn format_flux(intensity: f64) -> String {
    format!("Flux: {:.0}%", intensity.clamp(0.0, 1.0) * 100.0)
}

/// `"1.40 rad/s"`
pub fn format_angular_velocity(omega: f64) -> String {
    format!("{:.2} rad/s", suppress_negative_zero(omega, 2))
}

/// `"8.0%"`
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", suppress_negative_zero(fraction * 100.0, 1))
}
