//! Application entry point for the fractal tree viewer.
//!
//! This binary sets up logging and eframe/egui, then delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use fractal_core::config::Config;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Logging goes through `env_logger`, filtered by `RUST_LOG` and falling
/// back to `warn`. The main window is titled `"Fractal Tree"`.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop, or
///   the default configuration is rejected.
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Fractal Tree",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(Config::default())?))),
    )
}
