//! Fixed-capacity event sequence used as the per-cycle output buffer
//!
//! Capacity is accounted in bytes the same way a host atom sequence is: an
//! 8-byte sequence header, then for each event a 16-byte event header plus
//! the message bytes, padded to an 8-byte boundary. Storage is reserved up
//! front so appending inside a cycle never reallocates.

use crate::midi::MidiEvent;

/// Bytes taken by the sequence header before the first event
pub const SEQUENCE_HEADER_SIZE: usize = 8;
/// Bytes taken by each event header (timestamp + body header)
pub const EVENT_HEADER_SIZE: usize = 16;

const ALIGNMENT: usize = 8;

/// Round `size` up to the next 8-byte boundary
pub const fn pad_size(size: usize) -> usize {
    (size + ALIGNMENT - 1) & !(ALIGNMENT - 1)
}

/// Bytes an event with a `message_len`-byte body takes in a sequence
pub const fn event_footprint(message_len: usize) -> usize {
    pad_size(EVENT_HEADER_SIZE + message_len)
}

/// Byte capacity that holds exactly `events` messages of `message_len` bytes
pub const fn capacity_for(events: usize, message_len: usize) -> usize {
    SEQUENCE_HEADER_SIZE + events * event_footprint(message_len)
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    frames: u32,
    start: usize,
    len: usize,
}

/// Output sequence with a declared byte capacity
#[derive(Debug, Clone)]
pub struct EventSequence {
    capacity: usize,
    size: usize,
    data: Vec<u8>,
    slots: Vec<Slot>,
    overflowed: bool,
}

impl EventSequence {
    pub fn with_capacity(capacity: usize) -> Self {
        let body = capacity.saturating_sub(SEQUENCE_HEADER_SIZE);
        Self {
            capacity,
            size: SEQUENCE_HEADER_SIZE,
            data: Vec::with_capacity(body),
            slots: Vec::with_capacity(body / EVENT_HEADER_SIZE),
            overflowed: false,
        }
    }

    /// Reset to an empty sequence (header only)
    pub fn clear(&mut self) {
        self.data.clear();
        self.slots.clear();
        self.size = SEQUENCE_HEADER_SIZE;
        self.overflowed = false;
    }

    /// Append a copy of `event`.
    ///
    /// Returns `false` without writing anything when the remaining capacity
    /// cannot hold the event, and remembers the overflow until the next clear.
    pub fn append(&mut self, event: MidiEvent<'_>) -> bool {
        let total = EVENT_HEADER_SIZE + event.message.len();
        if self.remaining() < total {
            self.overflowed = true;
            return false;
        }

        let start = self.data.len();
        self.data.extend_from_slice(event.message);
        self.slots.push(Slot {
            frames: event.frames,
            start,
            len: event.message.len(),
        });
        self.size += pad_size(total);
        true
    }

    /// Declared capacity in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes in use, header included
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.size)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether an append was refused since the last clear
    pub fn has_overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn get(&self, index: usize) -> Option<MidiEvent<'_>> {
        self.slots.get(index).map(|slot| self.event(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = MidiEvent<'_>> + '_ {
        self.slots.iter().map(|slot| self.event(slot))
    }

    fn event(&self, slot: &Slot) -> MidiEvent<'_> {
        MidiEvent::new(slot.frames, &self.data[slot.start..slot.start + slot.len])
    }
}
