//! humanizer-host: Host binding layer for the velocity humanizer

mod error;
pub mod features;
pub mod logging;
pub mod plugin;
pub mod urid;

pub use error::{HostError, Result};
pub use features::{Feature, HostFeatures};
pub use plugin::{descriptor, AtomEvent, HumanizerPlugin, PluginDescriptor, PLUGIN_URI};
pub use urid::{HumanizerUris, MemoryUridMap, Urid, UridMap};
