//! Handwave Linux Platform Integration
//!
//! Platform-specific implementations for Linux:
//! - **uinput:** Virtual pointer and keyboard for event injection
//! - **Display Detection:** Monitor enumeration through DRM sysfs
//! - **Permissions:** Capability detection and user guidance

pub mod display;
pub mod permissions;
pub mod uinput;

pub use display::*;
pub use uinput::UinputSink;
