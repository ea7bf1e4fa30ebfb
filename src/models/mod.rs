pub mod enums;

mod appointment;
mod care_plan;
mod diagnosis;
mod encounter;
mod pain;
mod patient;
mod procedure;
mod provider;

pub use appointment::*;
pub use care_plan::*;
pub use diagnosis::*;
pub use encounter::*;
pub use pain::*;
pub use patient::*;
pub use procedure::*;
pub use provider::*;
