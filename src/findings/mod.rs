//! Finding model: categories, severities, records and their container.

pub mod category;
pub mod container;
pub mod finding;

pub use category::{ChangeType, FindingCategory};
pub use container::FindingContainer;
pub use finding::{Finding, Location};
