//! Check system capabilities.

use handwave_common::config::AppConfig;
use handwave_platform_core::DisplayServer;
use handwave_platform_linux::permissions::{
    all_required_available, check_capabilities, print_capability_report,
};
use handwave_platform_linux::{detect_display_server, detect_monitors, resolve_display};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Handwave System Check");
    println!("{}", "=".repeat(50));

    // Display server
    match detect_display_server() {
        DisplayServer::Wayland => println!("[OK] Display server: Wayland"),
        DisplayServer::X11 => println!("[OK] Display server: X11"),
        DisplayServer::Unknown => println!("[WARN] Display server: Unknown"),
    }

    // Monitors
    match detect_monitors() {
        Ok(monitors) => {
            println!("[OK] Monitors detected: {}", monitors.len());
            for m in &monitors {
                println!(
                    "     {} {}x{} at +{}+{} {}",
                    m.name,
                    m.width,
                    m.height,
                    m.x,
                    m.y,
                    if m.primary { "(primary)" } else { "" }
                );
            }
        }
        Err(e) => println!("[WARN] Monitor detection failed: {e}"),
    }

    match resolve_display(&config.display) {
        Ok(display) => println!(
            "[OK] Pointer area: {}x{}",
            display.width, display.height
        ),
        Err(e) => println!("[MISSING] Pointer area: {e}"),
    }

    // Permissions
    let capabilities = check_capabilities();
    println!();
    print_capability_report(&capabilities);

    println!();
    if all_required_available(&capabilities) {
        println!("All required capabilities are available. Handwave is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}
