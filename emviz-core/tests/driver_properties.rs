use std::f64::consts::{PI, TAU};

use emviz_core::{
    Channel, Driver, ManualTimeSource, Visualization, VisualizationConfig, Waveform,
};

fn times() -> impl Iterator<Item = f64> {
    (0..600).map(|k| k as f64 / 60.0)
}

#[test]
fn every_card_samples_finite_values() {
    for v in Visualization::ALL {
        let params = v.default_parameters();
        for t in times() {
            let sample = params.sample(t);
            for (channel, value) in sample.channels() {
                assert!(value.is_finite(), "{v}: {channel} = {value} at t={t}");
            }
            for marker in sample.markers() {
                assert!(marker.position.iter().all(|c| c.is_finite()));
            }
        }
    }
}

#[test]
fn every_card_has_readouts() {
    for v in Visualization::ALL {
        let sample = v.default_parameters().sample(1.0);
        let lines = v.readouts(&sample);
        assert!(!lines.is_empty(), "{v} has no readout");
        assert!(lines.iter().all(|l| !l.is_empty()));
    }
}

#[test]
fn generator_scenario_through_the_driver() {
    let source = ManualTimeSource::new(42.0);
    let driver = Driver::with_defaults(Visualization::AcGenerator, source.clone());

    source.set(42.5);
    let sample = driver.sample();
    assert!((sample.value(Channel::AngleRad) - PI / 2.0).abs() < 1e-9);
    assert!((sample.value(Channel::Voltage) - 12.0).abs() < 1e-9);

    source.set(43.0);
    assert!(driver.sample().value(Channel::Voltage).abs() < 1e-9);
}

#[test]
fn paused_driver_repeats_the_same_sample() {
    let source = ManualTimeSource::new(0.0);
    let mut driver = Driver::with_defaults(Visualization::Transformer, source.clone());
    source.set(0.4);
    driver.clock_mut().pause();
    let frozen = driver.sample();
    source.advance(10.0);
    assert_eq!(driver.sample(), frozen);
}

#[test]
fn channels_are_continuous_in_time() {
    // Unwrapped angles and smooth waveforms move only a little between
    // closely spaced samples. The net-vector angle wraps at ±π and the
    // rectified voltage has kinks, but neither jumps in value.
    let dt = 1e-4;
    for v in Visualization::ALL {
        let params = v.default_parameters();
        for t in times() {
            let a = params.sample(t);
            let b = params.sample(t + dt);
            for (channel, value) in a.channels() {
                let delta = (b.value(channel) - value).abs();
                let delta = if channel == Channel::NetVectorAngle {
                    delta.min(TAU - delta)
                } else if channel == Channel::FlowPhase {
                    delta.min(1.0 - delta)
                } else {
                    delta
                };
                assert!(delta < 0.05, "{v}: {channel} jumped by {delta} at t={t}");
            }
        }
    }
}

#[test]
fn configured_speed_changes_the_period() {
    let config =
        VisualizationConfig::from_toml_str("[ac_generator]\nangular_speed = \"60 rpm\"\n").unwrap();
    let params = config.parameters(Visualization::AcGenerator);
    let quarter = params.sample(0.25);
    assert!((quarter.value(Channel::Voltage) - 12.0).abs() < 1e-9);
}
