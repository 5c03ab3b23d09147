//! MIDI event model and status classification

/// Status nibble of a Note-Off message
pub const NOTE_OFF: u8 = 0x80;
/// Status nibble of a Note-On message
pub const NOTE_ON: u8 = 0x90;

/// Message category as far as the humanizer cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessageKind {
    NoteOn,
    NoteOff,
    Other,
}

impl MidiMessageKind {
    pub fn is_note(&self) -> bool {
        matches!(self, Self::NoteOn | Self::NoteOff)
    }
}

/// Classify a status byte by its high nibble.
///
/// Every byte maps to a category: data bytes, system messages and unknown
/// statuses all land in [`MidiMessageKind::Other`].
pub const fn classify(status: u8) -> MidiMessageKind {
    match status & 0xF0 {
        NOTE_ON => MidiMessageKind::NoteOn,
        NOTE_OFF => MidiMessageKind::NoteOff,
        _ => MidiMessageKind::Other,
    }
}

/// A timed MIDI message borrowed from a cycle buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent<'a> {
    /// Frame offset within the current cycle
    pub frames: u32,
    /// Raw message bytes, status first
    pub message: &'a [u8],
}

impl<'a> MidiEvent<'a> {
    pub const fn new(frames: u32, message: &'a [u8]) -> Self {
        Self { frames, message }
    }

    pub fn status(&self) -> Option<u8> {
        self.message.first().copied()
    }

    /// Category of this event. Note messages that are not exactly three
    /// bytes long carry no usable velocity and count as `Other`.
    pub fn kind(&self) -> MidiMessageKind {
        self.note().map_or(MidiMessageKind::Other, |note| note.kind())
    }

    /// Copy out the note message, if this event is a well-formed Note-On/Off.
    pub fn note(&self) -> Option<NoteEvent> {
        match *self.message {
            [status, note, velocity] if classify(status).is_note() => {
                Some(NoteEvent::new(status, note, velocity))
            }
            _ => None,
        }
    }
}

/// Owned three-byte Note-On/Off message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    bytes: [u8; 3],
}

impl NoteEvent {
    pub const fn new(status: u8, note: u8, velocity: u8) -> Self {
        Self { bytes: [status, note, velocity] }
    }

    pub const fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(NOTE_ON | (channel & 0x0F), note, velocity)
    }

    pub const fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(NOTE_OFF | (channel & 0x0F), note, velocity)
    }

    pub fn kind(&self) -> MidiMessageKind {
        classify(self.bytes[0])
    }

    pub fn status(&self) -> u8 {
        self.bytes[0]
    }

    pub fn channel(&self) -> u8 {
        self.bytes[0] & 0x0F
    }

    pub fn note(&self) -> u8 {
        self.bytes[1]
    }

    pub fn velocity(&self) -> u8 {
        self.bytes[2]
    }

    /// Same status and note, new velocity
    pub const fn with_velocity(self, velocity: u8) -> Self {
        Self::new(self.bytes[0], self.bytes[1], velocity)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
