// Domain modules
pub mod tasks;
