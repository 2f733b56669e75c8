//=========================================================================
// Bridge Demo
//
// Opens a window and logs every call the core would receive.
//
// Usage:
//   RUST_LOG=debug cargo run --bin bridge_demo
//   TOUCH_BRIDGE_STORAGE=/some/dir cargo run --bin bridge_demo
//
//=========================================================================

use log::{error, info};
use touch_bridge::core::sink::LogSink;
use touch_bridge::{BridgeBuilder, RenderMode};

const STORAGE_ENV: &str = "TOUCH_BRIDGE_STORAGE";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let storage = std::env::var_os(STORAGE_ENV)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    info!("Storage path: {}", storage.display());

    let result = BridgeBuilder::new()
        .with_storage_path(storage)
        .with_render_mode(RenderMode::OnDemand)
        .with_window_title("Touch Bridge Demo")
        .build(LogSink::new())
        .run();

    if let Err(e) = result {
        error!("Bridge failed: {}", e);
        std::process::exit(1);
    }
}
