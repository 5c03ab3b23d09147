//! Per-cycle MIDI processing

use tracing::debug;

use crate::config::HumanizerConfig;
use crate::error::{HumanizerError, Result};
use crate::humanize::VelocityHumanizer;
use crate::midi::MidiEvent;
use crate::sequence::EventSequence;

pub const PROBABILITY_PARAM: &str = "probability";
pub const AMPLITUDE_PARAM: &str = "amplitude";

/// Descriptor for a tunable processor parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

impl ParamSpec {
    pub const fn new(name: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self { name, default, min, max }
    }
}

pub const HUMANIZER_PARAMS: [ParamSpec; 2] = [
    ParamSpec::new(PROBABILITY_PARAM, 50.0, 0.0, 100.0),
    ParamSpec::new(AMPLITUDE_PARAM, 10.0, 0.0, 127.0),
];

/// Outcome of one processing cycle.
///
/// Nothing is logged from inside a cycle; a truncated cycle is only visible
/// here and through [`EventSequence::has_overflowed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Events appended to the output
    pub written: usize,
    /// Input events left out because the output was full
    pub dropped: usize,
}

impl CycleReport {
    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }
}

/// Trait for MIDI processors driven by a host once per cycle
pub trait MidiProcessor: Send {
    fn name(&self) -> &str;
    fn configure(&mut self, config: &HumanizerConfig) -> Result<()>;
    fn process_cycle<'a>(
        &mut self,
        input: &mut dyn Iterator<Item = MidiEvent<'a>>,
        output: &mut EventSequence,
    ) -> CycleReport;
    fn set_active(&mut self, active: bool);
    fn is_active(&self) -> bool;
    fn params(&self) -> &[ParamSpec];
    fn param(&self, name: &str) -> Result<f32>;
    fn set_param(&mut self, name: &str, value: f32) -> Result<()>;
}

/// Humanizes Note-On/Off velocities and forwards everything else
#[derive(Debug, Clone, Default)]
pub struct HumanizerProcessor {
    humanizer: VelocityHumanizer,
}

impl HumanizerProcessor {
    pub fn new(config: &HumanizerConfig) -> Result<Self> {
        Ok(Self {
            humanizer: VelocityHumanizer::new(config)?,
        })
    }

    pub fn activate(&mut self) {
        self.humanizer.activate();
    }

    pub fn deactivate(&mut self) {
        self.humanizer.deactivate();
    }

    pub fn humanizer(&self) -> &VelocityHumanizer {
        &self.humanizer
    }

    /// Run one cycle over any ordered event source
    pub fn process<'a, I>(&mut self, input: I, output: &mut EventSequence) -> CycleReport
    where
        I: IntoIterator<Item = MidiEvent<'a>>,
    {
        self.process_cycle(&mut input.into_iter(), output)
    }
}

impl MidiProcessor for HumanizerProcessor {
    fn name(&self) -> &str {
        "Humanizer"
    }

    fn configure(&mut self, config: &HumanizerConfig) -> Result<()> {
        self.humanizer.apply_config(config)?;
        debug!(
            probability = config.jitter_probability,
            amplitude = config.jitter_amplitude,
            overflow = ?config.overflow,
            "humanizer configured"
        );
        Ok(())
    }

    fn process_cycle<'a>(
        &mut self,
        input: &mut dyn Iterator<Item = MidiEvent<'a>>,
        output: &mut EventSequence,
    ) -> CycleReport {
        output.clear();
        let mut report = CycleReport::default();

        while let Some(event) = input.next() {
            let appended = match event.note() {
                Some(note) => {
                    let velocity = self.humanizer.humanize(note.velocity());
                    let humanized = note.with_velocity(velocity);
                    output.append(MidiEvent::new(event.frames, humanized.as_bytes()))
                }
                None => output.append(event),
            };

            if !appended {
                report.dropped = 1 + input.count();
                break;
            }
            report.written += 1;
        }

        report
    }

    fn set_active(&mut self, active: bool) {
        self.humanizer.set_active(active);
    }

    fn is_active(&self) -> bool {
        self.humanizer.is_active()
    }

    fn params(&self) -> &[ParamSpec] {
        &HUMANIZER_PARAMS
    }

    fn param(&self, name: &str) -> Result<f32> {
        match name {
            PROBABILITY_PARAM => Ok(f32::from(self.humanizer.jitter_probability())),
            AMPLITUDE_PARAM => Ok(f32::from(self.humanizer.jitter_amplitude())),
            _ => Err(HumanizerError::UnknownParam(name.to_string())),
        }
    }

    fn set_param(&mut self, name: &str, value: f32) -> Result<()> {
        let spec = HUMANIZER_PARAMS
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| HumanizerError::UnknownParam(name.to_string()))?;
        let value = value.clamp(spec.min, spec.max).round() as u8;
        match spec.name {
            PROBABILITY_PARAM => self.humanizer.set_jitter_probability(value),
            _ => self.humanizer.set_jitter_amplitude(value),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::capacity_for;

    fn processor(probability: u8) -> HumanizerProcessor {
        let config = HumanizerConfig {
            jitter_probability: probability,
            seed: Some(42),
            ..Default::default()
        };
        let mut processor = HumanizerProcessor::new(&config).unwrap();
        processor.activate();
        processor
    }

    #[test]
    fn test_clamps_loud_note_without_jitter() {
        let mut processor = processor(0);
        let mut output = EventSequence::with_capacity(256);
        let input = [MidiEvent::new(0, &[0x90, 60, 120])];

        let report = processor.process(input, &mut output);

        assert_eq!(report, CycleReport { written: 1, dropped: 0 });
        assert_eq!(output.get(0), Some(MidiEvent::new(0, &[0x90, 60, 107])));
    }

    #[test]
    fn test_control_change_passes_through() {
        let mut processor = processor(100);
        let mut output = EventSequence::with_capacity(256);
        let input = [MidiEvent::new(17, &[0xB0, 74, 127])];

        processor.process(input, &mut output);

        assert_eq!(output.len(), 1);
        assert_eq!(output.get(0), Some(MidiEvent::new(17, &[0xB0, 74, 127])));
    }

    #[test]
    fn test_truncates_when_output_full() {
        let mut processor = processor(50);
        let mut output = EventSequence::with_capacity(capacity_for(1, 3));
        let input = [
            MidiEvent::new(0, &[0x90, 60, 100]),
            MidiEvent::new(4, &[0x90, 62, 100]),
            MidiEvent::new(8, &[0x90, 64, 100]),
        ];

        let report = processor.process(input, &mut output);

        assert_eq!(report, CycleReport { written: 1, dropped: 2 });
        assert!(report.is_truncated());
        assert!(output.has_overflowed());
        assert_eq!(output.len(), 1);
        let first = output.get(0).unwrap();
        assert_eq!(first.frames, 0);
        assert_eq!(&first.message[..2], &[0x90, 60]);

        // next cycle starts from a clean buffer
        let report = processor.process([MidiEvent::new(0, &[0xF8])], &mut output);
        assert_eq!(report, CycleReport { written: 1, dropped: 0 });
    }

    #[test]
    fn test_order_and_shape_preserved() {
        let mut processor = processor(100);
        let sysex = [0xF0, 0x43, 0x10, 0x4C, 0xF7];
        let input = [
            MidiEvent::new(0, &[0x90, 60, 100]),
            MidiEvent::new(0, &[0xB0, 1, 64]),
            MidiEvent::new(2, &[0x80, 60, 64]),
            MidiEvent::new(5, &sysex),
            MidiEvent::new(5, &[0x9F, 36]),
            MidiEvent::new(9, &[0xE0, 0, 64]),
            MidiEvent::new(12, &[0x91, 72, 127]),
        ];
        let mut output = EventSequence::with_capacity(1024);

        let report = processor.process(input, &mut output);
        assert_eq!(report.written, input.len());

        for (before, after) in input.iter().zip(output.iter()) {
            assert_eq!(before.frames, after.frames);
            assert_eq!(before.message.len(), after.message.len());
            match before.note() {
                Some(_) => {
                    assert_eq!(&before.message[..2], &after.message[..2]);
                    assert!(after.message[2] <= 127);
                }
                None => assert_eq!(before.message, after.message),
            }
        }
    }

    #[test]
    fn test_inactive_output_is_identical() {
        let mut processor = processor(100);
        processor.deactivate();
        let input = [
            MidiEvent::new(0, &[0x90, 60, 120]),
            MidiEvent::new(3, &[0x80, 60, 127]),
            MidiEvent::new(3, &[0x90, 61, 1]),
        ];
        let mut output = EventSequence::with_capacity(1024);

        processor.process(input, &mut output);

        let events: Vec<_> = output.iter().collect();
        assert_eq!(events, input);
    }

    #[test]
    fn test_zero_probability_never_changes_velocity() {
        let mut processor = processor(0);
        let mut output = EventSequence::with_capacity(1024);
        for _ in 0..200 {
            let input = [MidiEvent::new(0, &[0x90, 48, 90]), MidiEvent::new(1, &[0x80, 48, 40])];
            processor.process(input, &mut output);
            let velocities: Vec<u8> = output.iter().map(|e| e.message[2]).collect();
            assert_eq!(velocities, vec![90, 40]);
        }
    }

    #[test]
    fn test_note_off_is_humanized_too() {
        let mut processor = processor(0);
        let mut output = EventSequence::with_capacity(256);
        processor.process([MidiEvent::new(0, &[0x85, 30, 127])], &mut output);
        assert_eq!(output.get(0), Some(MidiEvent::new(0, &[0x85, 30, 107])));
    }

    #[test]
    fn test_set_active_toggles() {
        let mut processor = HumanizerProcessor::default();
        assert!(!processor.is_active());
        processor.set_active(true);
        assert!(processor.is_active());
        processor.set_active(false);
        assert!(!processor.is_active());
    }

    #[test]
    fn test_params_round_and_clamp() {
        let mut processor = HumanizerProcessor::default();
        assert_eq!(processor.params().len(), 2);
        processor.set_param("probability", 150.0).unwrap();
        processor.set_param("amplitude", 3.6).unwrap();
        assert_eq!(processor.param("probability").unwrap(), 100.0);
        assert_eq!(processor.param("amplitude").unwrap(), 4.0);
    }

    #[test]
    fn test_unknown_param_is_error() {
        let mut processor = HumanizerProcessor::default();
        assert!(matches!(
            processor.set_param("timing", 1.0),
            Err(HumanizerError::UnknownParam(_))
        ));
        assert!(processor.param("timing").is_err());
    }

    #[test]
    fn test_configure_through_trait_object() {
        let mut processor: Box<dyn MidiProcessor> = Box::new(HumanizerProcessor::default());
        let config = HumanizerConfig {
            jitter_probability: 0,
            jitter_amplitude: 3,
            ..Default::default()
        };
        processor.configure(&config).unwrap();
        assert_eq!(processor.name(), "Humanizer");
        assert_eq!(processor.param("probability").unwrap(), 0.0);
        assert_eq!(processor.param("amplitude").unwrap(), 3.0);

        processor.set_active(true);
        let mut output = EventSequence::with_capacity(256);
        let report = processor.process_cycle(&mut [MidiEvent::new(0, &[0x90, 1, 110])].into_iter(), &mut output);
        assert_eq!(report.written, 1);
        assert_eq!(output.get(0).map(|e| e.message[2]), Some(107));
    }
}
