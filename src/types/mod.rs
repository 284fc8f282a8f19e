//! Type definitions

pub mod location;
pub mod messages;
pub mod segment;
pub mod trip;

pub use location::*;
pub use messages::*;
pub use segment::*;
pub use trip::*;
