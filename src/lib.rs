//! Hold-a-side-button mouse gestures for Linux.
//!
//! [`gesture`] holds the detector and is free of I/O. [`device`], [`dispatch`], [`config`] and
//! [`runtime`] wire it to evdev and external commands.

pub mod config;
pub mod device;
pub mod dispatch;
pub mod gesture;
pub mod logging;
pub mod runtime;
pub mod trace;
