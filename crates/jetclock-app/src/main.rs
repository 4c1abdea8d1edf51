mod app_state;
mod cli;

use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use jetclock_config::JetclockConfig;

const DEFAULT_DIRECTIVE: &str = "jetclock=info";

fn main() {
    let args = cli::parse();

    // Load before logging starts so `logging.level` can pick the filter;
    // the outcome is logged once the subscriber is up.
    let loaded = jetclock_config::load_config(args.config.as_deref());

    let directive = args.log_level.clone().unwrap_or_else(|| {
        loaded
            .as_ref()
            .map(|c| c.logging.level.directive())
            .unwrap_or(DEFAULT_DIRECTIVE)
            .to_string()
    });
    let mut filter = EnvFilter::from_default_env();
    if let Ok(d) = directive.parse().or_else(|_| DEFAULT_DIRECTIVE.parse()) {
        filter = filter.add_directive(d);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("JetClock v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!(path = %path.display(), "Using config override");
    }
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        JetclockConfig::default()
    });
    config.plugins.autoload.extend(args.plugins);

    if args.print_config {
        println!("{}", jetclock_config::config_to_json(&config));
        return;
    }

    let event_loop = match EventLoop::new() {
        Ok(el) => el,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let mut app = app_state::JetclockApp::new(config);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
