pub mod notes;
pub mod rest;

pub use notes::{Note, NoteError, NoteLibrary};
pub use rest::{RestDistribution, RestError, BEAT};
