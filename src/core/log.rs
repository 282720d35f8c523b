use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. A valid `RUST_LOG` replaces the filter
/// selected by `verbose`.
pub fn init_logging(verbose: bool) {
    subscriber(verbose, EnvFilter::try_from_default_env().ok()).init();
}

fn subscriber(verbose: bool, env_filter: Option<EnvFilter>) -> impl Subscriber + Send + Sync {
    let (level_filter, level) = if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::OFF, "off")
    };
    // Skipped when RUST_LOG is set.
    let app_filter = env_filter
        .is_none()
        .then(|| Targets::new().with_target("dcasim", level_filter));
    let env_filter = env_filter.unwrap_or_else(|| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_filter)
        .with(env_filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    fn enabled(subscriber: impl Subscriber + Send + Sync + 'static) -> (bool, bool) {
        tracing::subscriber::with_default(subscriber, || {
            (
                tracing::enabled!(target: "dcasim", Level::DEBUG),
                tracing::enabled!(target: "reqwest", Level::DEBUG),
            )
        })
    }

    #[test]
    fn quiet_by_default() {
        assert_eq!(enabled(subscriber(false, None)), (false, false));
    }

    #[test]
    fn verbose_enables_only_the_app() {
        assert_eq!(enabled(subscriber(true, None)), (true, false));
    }

    #[test]
    fn rust_log_overrides_verbose_flag() {
        let env = EnvFilter::new("debug");
        assert_eq!(enabled(subscriber(false, Some(env))), (true, true));

        let env = EnvFilter::new("reqwest=debug");
        assert_eq!(enabled(subscriber(true, Some(env))), (false, true));
    }
}
