//! Tracing setup and the dashboard log forwarder

use std::fmt::{self, Write as _};

use chrono::Utc;
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::{
    config::LoggingConfig,
    services::notifications::{Notification, NotificationHub},
};

const CRATE_TARGET: &str = "visitrack_server";

/// Collects an event's message and its other fields as `key=value`
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Forwards INFO and above events from this crate to dashboards as `log`
/// notifications
pub struct DashboardLogLayer {
    hub: NotificationHub,
}

impl DashboardLogLayer {
    pub fn new(hub: NotificationHub) -> Self {
        Self { hub }
    }
}

impl<S: Subscriber> Layer<S> for DashboardLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > Level::INFO || !meta.target().starts_with(CRATE_TARGET) {
            return;
        }
        if self.hub.connection_count() == 0 {
            return;
        }

        let mut line = LineVisitor::default();
        event.record(&mut line);

        self.hub.broadcast(&Notification::Log {
            level: meta.level().to_string(),
            target: meta.target().to_string(),
            message: format!("{}{}", line.message, line.fields),
            timestamp: Utc::now(),
        });
    }
}

/// Install the global subscriber. The returned guard flushes the file writer
/// and must live as long as the process.
pub fn init_tracing(config: &LoggingConfig, hub: &NotificationHub) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{}={},tower_http=debug", CRATE_TARGET, config.level).into());

    let console = if config.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let (file, guard) = match config.directory.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "visitrack.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let dashboard = config
        .forward_to_dashboard
        .then(|| DashboardLogLayer::new(hub.clone()));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .with(dashboard)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[tokio::test]
    async fn test_forwards_crate_info_events_only() {
        let hub = NotificationHub::new();
        let (_, mut rx) = hub.add();
        rx.recv().await.unwrap(); // handshake

        let subscriber = tracing_subscriber::registry().with(DashboardLogLayer::new(hub.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "visitrack_server::services::visits", visit_id = 4, "Visit registered");
            tracing::debug!(target: "visitrack_server::services::visits", "too verbose");
            tracing::info!(target: "hyper::proto", "not ours");
        });

        let msg: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(msg["type"], "log");
        assert_eq!(msg["level"], "INFO");
        assert_eq!(msg["message"], "Visit registered visit_id=4");
        assert!(rx.try_recv().is_err());
    }
}
