//! Permission detection and guidance for Linux.
//!
//! Injection needs write access to `/dev/uinput` and the screen size needs a
//! connected monitor or a configured override.

use std::ffi::CString;

use crate::uinput::{uinput_diagnostic, UINPUT_PATH};

/// A system capability that Handwave may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check all capabilities and report status.
pub fn check_capabilities() -> Vec<Capability> {
    vec![
        check_uinput_access(),
        check_monitor_detection(),
        check_display_session(),
    ]
}

/// Whether the required capabilities are all present.
pub fn all_required_available(capabilities: &[Capability]) -> bool {
    capabilities.iter().all(|c| c.available || !c.required)
}

fn check_uinput_access() -> Capability {
    let available = is_writable(UINPUT_PATH);

    Capability {
        name: "Virtual Input Device".to_string(),
        description: "Write access to /dev/uinput for pointer and key injection".to_string(),
        available,
        required: true,
        fix_instructions: (!available).then(uinput_diagnostic),
    }
}

fn check_monitor_detection() -> Capability {
    let count = crate::display::detect_monitors()
        .map(|m| m.len())
        .unwrap_or(0);
    let available = count > 0;

    Capability {
        name: "Monitor Detection".to_string(),
        description: format!("Connected monitors found through DRM ({count})"),
        available,
        // A configured screen size replaces detection.
        required: false,
        fix_instructions: if available {
            None
        } else {
            Some("Set display.width and display.height in the config file".to_string())
        },
    }
}

fn check_display_session() -> Capability {
    let server = crate::display::detect_display_server();
    let available = server != handwave_platform_core::DisplayServer::Unknown;

    Capability {
        name: "Graphical Session".to_string(),
        description: format!("Desktop session receiving the injected input ({server:?})"),
        available,
        required: false,
        fix_instructions: if available {
            None
        } else {
            Some(
                "Run from a graphical desktop session (GNOME, KDE, etc.)".to_string(),
            )
        },
    }
}

fn is_writable(path: &str) -> bool {
    let Ok(c_path) = CString::new(path) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("Handwave System Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}
