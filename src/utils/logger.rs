use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor the config file sets one.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "helix_swarm=debug,info"
    } else {
        "helix_swarm=info"
    }
}

/// Installs the global subscriber for the `swarm` binary. The library itself
/// only emits events.
pub fn init_cli_logger(verbose: bool, configured: Option<&str>, json: bool) {
    let fallback = match configured {
        Some(directive) if !verbose => directive.to_string(),
        _ => default_filter(verbose).to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.compact())
            .init();
    }
}
