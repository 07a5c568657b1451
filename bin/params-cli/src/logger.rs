use hive_router_params_config::log::{LogFormat, LoggingConfig};
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

pub fn configure_logging(config: &LoggingConfig) {
    let directive = config.env_filter_directive();
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|err| {
        eprintln!("invalid log filter '{directive}': {err}, falling back to 'info'");
        EnvFilter::new("info")
    });

    // Both layers write to stderr, stdout only carries the printed params.
    let layer = match config.format {
        LogFormat::Text => tracing_tree::HierarchicalLayer::new(2)
            .with_bracketed_fields(true)
            .with_deferred_spans(false)
            .with_wraparound(25)
            .with_indent_lines(true)
            .with_timer(tracing_tree::time::Uptime::default())
            .with_thread_names(false)
            .with_thread_ids(false)
            .with_targets(false)
            .boxed(),
        LogFormat::Json => fmt::Layer::<Registry>::default()
            .json()
            .with_writer(std::io::stderr)
            .with_timer(UtcTime::rfc_3339())
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();
}
