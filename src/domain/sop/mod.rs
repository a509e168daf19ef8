//! SOP domain module.
//!
//! The Standard Operating Procedure tree (Task → Step → Hazard) that a
//! worker follows. Work sessions hold a reference to an SOP by id and use
//! it read-only for validation and step navigation.

mod hazard;
mod navigation;
mod procedure;
mod validation;

pub use hazard::{Hazard, HazardSeverity};
pub use navigation::StepLocation;
pub use procedure::{Sop, Step, Task};
pub use validation::SopDefect;
