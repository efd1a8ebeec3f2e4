pub mod persistence;
pub mod time;
