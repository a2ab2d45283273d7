use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive from `QUIZ_LOG`, then `RUST_LOG`, else `warn`.
fn log_directive() -> String {
    std::env::var("QUIZ_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string())
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// the quiz prompts on stdout.
pub fn init_tracing() {
    let directive = log_directive();
    let env_filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
