//! URI to integer identifier mapping

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Mutex, PoisonError};

use crate::error::{HostError, Result};

pub const URID_MAP_URI: &str = "http://lv2plug.in/ns/ext/urid#map";
pub const MIDI_EVENT_URI: &str = "http://lv2plug.in/ns/ext/midi#MidiEvent";

/// Host-assigned identifier for a URI; never zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Urid(NonZeroU32);

impl Urid {
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

/// Identifier mapping service provided by the host.
///
/// Mapping the same URI twice must return the same id. `None` means the host
/// could not intern the URI.
pub trait UridMap: Send + Sync {
    fn map(&self, uri: &str) -> Option<Urid>;
}

/// In-process mapping table
#[derive(Debug, Default)]
pub struct MemoryUridMap {
    table: Mutex<HashMap<String, Urid>>,
}

impl MemoryUridMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UridMap for MemoryUridMap {
    fn map(&self, uri: &str) -> Option<Urid> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(&urid) = table.get(uri) {
            return Some(urid);
        }
        let next = u32::try_from(table.len() + 1).ok().and_then(Urid::new)?;
        table.insert(uri.to_string(), next);
        Some(next)
    }
}

/// URIs the humanizer needs, interned once at instantiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanizerUris {
    pub midi_event: Urid,
}

impl HumanizerUris {
    pub fn map(map: &dyn UridMap) -> Result<Self> {
        Ok(Self {
            midi_event: map_uri(map, MIDI_EVENT_URI)?,
        })
    }
}

fn map_uri(map: &dyn UridMap, uri: &'static str) -> Result<Urid> {
    map.map(uri).ok_or(HostError::UnmappedUri(uri))
}
