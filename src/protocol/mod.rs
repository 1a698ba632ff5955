//! The collection protocol as data: which parameters are gathered, in what
//! order, in which units, and how far a conversation has got.

pub mod collection;
pub mod parameters;
pub mod units;

pub use collection::{CollectionState, ParameterCollector};
pub use parameters::{Parameter, Unit, parameters_schema};
pub use units::{CM_PER_INCH, CM_PER_MM, UnitCheck, UnitPolicy};
