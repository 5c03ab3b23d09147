//! Plugin instance lifecycle: instantiate, activate, run, deactivate, cleanup

use humanizer_core::{
    CycleReport, EventSequence, HumanizerConfig, HumanizerProcessor, MidiEvent, MidiProcessor,
};
use tracing::{error, info};

use crate::error::{HostError, Result};
use crate::features::{Feature, HostFeatures};
use crate::urid::{HumanizerUris, Urid};

pub const PLUGIN_URI: &str = "urn:humanizer:velocity";

/// Static description of a plugin exposed to hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub uri: &'static str,
    pub name: &'static str,
}

static DESCRIPTOR: PluginDescriptor = PluginDescriptor {
    uri: PLUGIN_URI,
    name: "Velocity Humanizer",
};

/// Plugin table lookup; the humanizer is the only entry
pub fn descriptor(index: u32) -> Option<&'static PluginDescriptor> {
    match index {
        0 => Some(&DESCRIPTOR),
        _ => None,
    }
}

/// A timed event as delivered on the host's input port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomEvent<'a> {
    pub frames: u32,
    pub body_type: Urid,
    pub body: &'a [u8],
}

/// One humanizer instance bound to a host
#[derive(Debug)]
pub struct HumanizerPlugin {
    uris: HumanizerUris,
    processor: HumanizerProcessor,
}

impl HumanizerPlugin {
    /// Create an instance. Fails if the host does not offer `urid:map` or
    /// the config is out of range.
    pub fn instantiate(features: &[Feature<'_>], config: &HumanizerConfig) -> Result<Self> {
        let host = HostFeatures::negotiate(features)
            .inspect_err(|e| error!(%e, "cannot instantiate humanizer"))?;
        let uris = HumanizerUris::map(host.urid_map)?;
        let processor = HumanizerProcessor::new(config)?;

        info!(
            uri = PLUGIN_URI,
            probability = config.jitter_probability,
            amplitude = config.jitter_amplitude,
            "humanizer instantiated"
        );

        Ok(Self { uris, processor })
    }

    pub fn uris(&self) -> &HumanizerUris {
        &self.uris
    }

    pub fn processor(&self) -> &HumanizerProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut HumanizerProcessor {
        &mut self.processor
    }

    pub fn configure(&mut self, config: &HumanizerConfig) -> Result<()> {
        self.processor.configure(config)?;
        Ok(())
    }

    pub fn activate(&mut self) {
        self.processor.set_active(true);
        info!("humanizer activated");
    }

    pub fn deactivate(&mut self) {
        self.processor.set_active(false);
        info!("humanizer deactivated");
    }

    pub fn is_active(&self) -> bool {
        self.processor.is_active()
    }

    /// Process one cycle. Only MIDI-typed events reach the humanizer;
    /// anything else on the input port is skipped.
    pub fn run(&mut self, input: &[AtomEvent<'_>], output: &mut EventSequence) -> CycleReport {
        let midi_event = self.uris.midi_event;
        let mut events = input
            .iter()
            .filter(|event| event.body_type == midi_event)
            .map(|event| MidiEvent::new(event.frames, event.body));
        self.processor.process_cycle(&mut events, output)
    }
}

impl Drop for HumanizerPlugin {
    fn drop(&mut self) {
        info!("humanizer cleaned up");
    }
}
