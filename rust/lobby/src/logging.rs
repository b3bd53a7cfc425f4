use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "info,jetons_lobby=debug";

/// One captured log event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Collects log events in memory so tests can assert on them.
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.guard().clone()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    pub fn into_layer<S>(self) -> TestLayer<S>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        TestLayer {
            subscriber: self,
            _phantom: PhantomData,
        }
    }
}

pub struct TestLayer<S> {
    subscriber: TestLogSubscriber,
    _phantom: PhantomData<S>,
}

impl<S> Layer<S> for TestLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.subscriber.guard().push(LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Human-readable logs to stdout, filtered by `RUST_LOG`.
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// One JSON object per log line, for log shippers.
pub fn init_json_logging() -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// Installs a process-wide capturing subscriber (once) and returns it
/// cleared. If another global subscriber was installed first nothing is
/// captured.
pub fn init_test_logging() -> TestLogSubscriber {
    static SUBSCRIBER: OnceLock<TestLogSubscriber> = OnceLock::new();
    static REGISTERED: OnceLock<()> = OnceLock::new();

    let subscriber = SUBSCRIBER.get_or_init(TestLogSubscriber::new);

    REGISTERED.get_or_init(|| {
        let layer = subscriber.clone().into_layer::<Registry>();
        let registry = Registry::default().with(layer);
        if tracing::subscriber::set_global_default(registry).is_err() {
            eprintln!("a global tracing subscriber is already set; logs will not be captured");
        }
    });

    subscriber.clear();
    subscriber.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, error, info, warn};

    fn capture<F: FnOnce()>(f: F) -> Vec<LogEntry> {
        let subscriber = TestLogSubscriber::new();
        let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());
        tracing::subscriber::with_default(registry, f);
        subscriber.entries()
    }

    #[test]
    fn captures_levels_in_order() {
        let entries = capture(|| {
            debug!("dealing");
            info!("hand started");
            warn!("action after timeout");
            error!("timeout fold failed");
        });
        let levels: Vec<Level> = entries.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR]);
        assert!(entries[1].message.contains("hand started"));
    }

    #[test]
    fn captures_structured_fields() {
        let entries = capture(|| {
            info!(session_id = "room-1", hand_number = 3u64, "hand finished");
        });
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field("session_id"), Some("room-1"));
        assert_eq!(entries[0].field("hand_number"), Some("3"));
    }

    #[test]
    fn clear_forgets_entries() {
        let subscriber = TestLogSubscriber::new();
        let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());
        tracing::subscriber::with_default(registry, || info!("one"));
        assert_eq!(subscriber.entries().len(), 1);
        subscriber.clear();
        assert!(subscriber.entries().is_empty());
    }
}
