/// Example showing different logging configurations
///
/// Run with: cargo run --example logging_config
use log::LevelFilter;
use std::path::PathBuf;
use wisp::logging::{LogConfig, LogFeatures};

fn main() {
    println!("=== Wisp Logging Configuration Examples ===\n");

    // Example 1: Minimal logging (errors/warnings only)
    println!("1. Minimal logging (errors/warnings only):");
    let minimal = LogConfig::minimal();
    println!("   enabled: {}", minimal.enabled);
    println!("   level: {:?}", minimal.level);
    println!("   features.navigation: {}", minimal.features.navigation);
    println!("   features.api_calls: {}\n", minimal.features.api_calls);

    // Example 2: Verbose logging (all features)
    println!("2. Verbose logging (all features):");
    let verbose = LogConfig::verbose();
    println!("   enabled: {}", verbose.enabled);
    println!("   level: {:?}", verbose.level);
    println!("   features.optimistic: {}", verbose.features.optimistic);
    println!("   features.key_events: {}\n", verbose.features.key_events);

    // Example 3: Default configuration
    println!("3. Default configuration:");
    let default = LogConfig::default();
    println!("   enabled: {}", default.enabled);
    println!("   level: {:?}", default.level);
    println!("   clear_on_startup: {}", default.clear_on_startup);
    println!("   log_file: {:?}\n", default.log_file);

    // Example 4: Custom configuration
    println!("4. Custom configuration (only the optimistic-update trail):");
    let custom = LogConfig {
        enabled: true,
        log_file: PathBuf::from("custom_debug.log"),
        clear_on_startup: false, // Append to existing log
        features: LogFeatures {
            navigation: false,
            api_calls: false,
            optimistic: true,
            key_events: false,
        },
        level: LevelFilter::Debug,
    };
    println!("   enabled: {}", custom.enabled);
    println!("   log_file: {:?}", custom.log_file);
    println!("   features.optimistic: {}\n", custom.features.optimistic);

    println!("To use any of these configurations in your app:");
    println!("  let log_config = logging::LogConfig::default(); // or minimal(), verbose()");
    println!("  logging::init_logging(&log_config)?;");
}
