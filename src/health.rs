use crate::{channel::repository::ChannelRepository, http::ApiResponder};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponseBody {
    pub status: String,
    pub dependency_connected: bool,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponder for HealthResponseBody {
    fn unit() -> &'static str {
        "health report"
    }
    fn article() -> &'static str {
        "A"
    }
}

/// Reports whether the channel store can be reached. Never fails: an
/// unreachable store only flips `dependency_connected`.
pub struct HealthReporter<C: ChannelRepository> {
    channel_repo: C,
}

impl<C: ChannelRepository> HealthReporter<C> {
    pub fn new(channel_repo: C) -> Self {
        Self { channel_repo }
    }

    pub async fn report(&self) -> HealthResponseBody {
        let dependency_connected = self.channel_repo.ping().await;
        if !dependency_connected {
            tracing::warn!("Health check reports the channel store as disconnected");
        }

        HealthResponseBody {
            status: "ok".into(),
            dependency_connected,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{
        memory_repository::InMemoryChannelRepository,
        unavailable_repository::UnavailableChannelRepository,
    };

    #[tokio::test]
    async fn test_report_in_memory() {
        let reporter = HealthReporter::new(InMemoryChannelRepository::new());
        let before = Utc::now();

        let report = reporter.report().await;

        assert_eq!(report.status, "ok");
        assert!(report.dependency_connected);
        assert!(report.timestamp >= before);
    }

    #[tokio::test]
    async fn test_report_unreachable_store() {
        let report = HealthReporter::new(UnavailableChannelRepository).report().await;

        assert_eq!(report.status, "ok");
        assert!(!report.dependency_connected);
    }

    #[test]
    fn test_report_shape() {
        let body = HealthResponseBody {
            status: "ok".into(),
            dependency_connected: false,
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value["dependencyConnected"], false);
        assert!(value["timestamp"].is_string());
    }
}
