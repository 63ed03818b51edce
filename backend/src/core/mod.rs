//! Core simulation primitives (time and phase management)

pub mod time;
