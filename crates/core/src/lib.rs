#![forbid(unsafe_code)]

pub mod countdown;
pub mod error;
pub mod grader;
pub mod model;
pub mod sampler;
pub mod time;

pub use error::Error;
pub use time::Clock;
