//! humanizer-core: Real-time MIDI velocity humanizing

pub mod config;
mod error;
pub mod humanize;
pub mod midi;
pub mod processor;
pub mod sequence;

pub use config::HumanizerConfig;
pub use error::{HumanizerError, Result};
pub use humanize::{OverflowPolicy, VelocityHumanizer, VELOCITY_HEADROOM_CEILING};
pub use midi::{classify, MidiEvent, MidiMessageKind, NoteEvent};
pub use processor::{CycleReport, HumanizerProcessor, MidiProcessor, ParamSpec, HUMANIZER_PARAMS};
pub use sequence::{capacity_for, event_footprint, EventSequence};
