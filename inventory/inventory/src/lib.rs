//! Hardware inventory of a cluster floor: the element tree with its per-rack aggregates, the indices used
//! by the state and job feeds, and the rankspec format those feeds use to address ranked hardware.

pub mod color;
pub mod element;
pub mod feed;
pub mod file;
pub mod hardware_set;
pub mod job;
pub mod layout;
pub mod options;
pub mod rankspec;
pub mod session;
pub mod state;

#[cfg(feature = "testing")]
pub mod testing;

pub use color::Color;
pub use element::{ElementKey, HardwareElement, RackCounters};
pub use hardware_set::{HardwareSet, InventoryError, InventoryObserver, RackSet};
pub use job::{Job, JobHandle, JobId, JobInfo, JobPalette, JobSet, JobState, JobUpdate};
pub use layout::{FloorLayout, LayoutView};
pub use options::InventoryOptions;
pub use rankspec::RankSpec;
pub use session::Session;
pub use state::HardwareState;

#[cfg(test)]
mod tests;
