//! Breaking-change detection between two versions of a Protocol Buffers API.
//!
//! Load an original and an updated [`Snapshot`], run a [`Detector`] over them
//! and inspect the resulting [`FindingContainer`]:
//!
//! ```no_run
//! use proto_compat::{Detector, DetectorConfig, Snapshot};
//!
//! # fn main() -> proto_compat::Result<()> {
//! let original = Snapshot::load("original.desc", &[])?;
//! let update = Snapshot::load("update.desc", &[])?;
//! let config = DetectorConfig::default();
//! let findings = Detector::new(&original, &update, &config).detect();
//! for message in findings.human_readable_messages() {
//!     println!("{message}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod compat;
pub mod config;
pub mod descriptor;
pub mod detector;
pub mod error;
pub mod findings;
pub mod logging;
pub mod registry;
pub mod snapshot;
pub mod version;

pub use config::{DetectorConfig, UnresolvedTypePolicy};
pub use detector::Detector;
pub use error::{CompatError, Result};
pub use findings::{ChangeType, Finding, FindingCategory, FindingContainer, Location};
pub use snapshot::Snapshot;

/// Compares two snapshots with `config` and returns the findings.
pub fn detect_breaking_changes(
    original: &Snapshot,
    update: &Snapshot,
    config: &DetectorConfig,
) -> FindingContainer {
    Detector::new(original, update, config).detect()
}
