//! emviz core - waveform driver for electrical-machine visualizations
//!
//! Turns elapsed simulation time into the quantities each machine scene
//! animates (rotor angles, phase currents, induced voltage, flux glow,
//! particle positions), plus the transform and camera helpers a renderer
//! needs to draw them. Everything here is stateless apart from the clock.

pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod path;
pub mod projection;
pub mod readout;
pub mod sample;
pub mod transform;
pub mod units;
pub mod visualization;
pub mod waveform;

// Re-export commonly used types
pub use clock::{ManualTimeSource, SimulationClock, SystemTimeSource, TimeSource};
pub use config::VisualizationConfig;
pub use error::{ConfigError, ParameterError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use path::{ParametricPath, Path};
pub use projection::{Camera, ProjectionMode, ScreenPoint};
pub use sample::{Channel, Marker, Polarity, WaveformSample};
pub use transform::{RotationState, Transform};
pub use units::AngularSpeed;
pub use visualization::{Driver, Visualization};
pub use waveform::{Waveform, WaveformParameters};
