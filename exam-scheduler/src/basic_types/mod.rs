//! The plain data types shared by the graph builder, the encoders, the decoder and the
//! validator.
mod course;
mod room;
mod schedule;
mod slot;
mod student;

pub use course::*;
pub use room::*;
pub use schedule::*;
pub use slot::*;
pub use student::*;
