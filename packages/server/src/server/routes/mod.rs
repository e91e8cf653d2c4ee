// HTTP routes
pub mod health;
pub mod notion;
pub mod poll;

pub use health::*;
pub use notion::*;
pub use poll::*;
