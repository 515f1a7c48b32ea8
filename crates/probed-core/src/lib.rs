// ABOUTME: Core library for probed, holding the wire types shared by the server and its tests.
// ABOUTME: Defines the JSON response envelope and the unit-suffixed duration grammar.

pub mod duration;
pub mod envelope;

pub use duration::{DurationError, parse_duration};
pub use envelope::Envelope;
