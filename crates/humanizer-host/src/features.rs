//! Host feature negotiation

use std::fmt;

use crate::error::{HostError, Result};
use crate::urid::{URID_MAP_URI, UridMap};

/// A capability offered by the host at instantiation
#[derive(Clone, Copy)]
pub enum Feature<'a> {
    UridMap(&'a dyn UridMap),
    /// Any feature the humanizer does not use, by URI
    Other(&'a str),
}

impl Feature<'_> {
    pub fn uri(&self) -> &str {
        match self {
            Self::UridMap(_) => URID_MAP_URI,
            Self::Other(uri) => uri,
        }
    }
}

impl fmt::Debug for Feature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Feature").field(&self.uri()).finish()
    }
}

/// The features the humanizer requires, located in the host's list
#[derive(Clone, Copy)]
pub struct HostFeatures<'a> {
    pub urid_map: &'a dyn UridMap,
}

impl<'a> HostFeatures<'a> {
    pub fn negotiate(features: &[Feature<'a>]) -> Result<Self> {
        let urid_map = features
            .iter()
            .find_map(|feature| match feature {
                Feature::UridMap(map) => Some(*map),
                Feature::Other(_) => None,
            })
            .ok_or(HostError::MissingFeature(URID_MAP_URI))?;
        Ok(Self { urid_map })
    }
}
