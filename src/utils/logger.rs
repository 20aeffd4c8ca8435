use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "lambda_forwarder=info";

fn filter_for(level: Option<&str>, verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    match (level, verbose) {
        (_, true) => EnvFilter::new("lambda_forwarder=debug,info"),
        (Some(level), false) => EnvFilter::new(format!("lambda_forwarder={}", level)),
        (None, false) => EnvFilter::new(DEFAULT_FILTER),
    }
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter_for(None, verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

pub fn init_lambda_logger(level: Option<&str>) {
    tracing_subscriber::registry()
        .with(filter_for(level, false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .without_time() // CloudWatch stamps every line already
                .json(),
        )
        .init();
}
