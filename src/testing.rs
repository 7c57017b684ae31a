//! Helpers shared by unit test modules.

use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Layer that runs `check` for every event and records its answer.
struct EventCheck<F> {
    check: F,
    results: Arc<Mutex<Vec<bool>>>,
}

impl<S, F> Layer<S> for EventCheck<F>
where
    S: Subscriber,
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
        self.results.lock().unwrap().push((self.check)());
    }
}

/// Installs a thread-local subscriber that evaluates `check` on each event.
///
/// Events are only seen on the current thread, so callers should run on a
/// current-thread runtime.
pub(crate) fn check_on_event<F>(check: F) -> (DefaultGuard, Arc<Mutex<Vec<bool>>>)
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    let results = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCheck {
        check,
        results: results.clone(),
    });
    (tracing::subscriber::set_default(subscriber), results)
}
