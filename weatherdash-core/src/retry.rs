use std::time::Duration;

use crate::{
    model::{FetchOutcome, Query},
    service::WeatherService,
};

/// Exponential backoff settings for [`fetch_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first call; zero is treated as one.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_delay }
    }

    /// A single attempt and no backoff.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay before attempt `attempt + 1`, where `attempt` starts at 1.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exp)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Call [`WeatherService::fetch_weather`] until it succeeds, fails with a
/// non-transient kind, or the attempts run out.
pub async fn fetch_with_retry(
    service: &WeatherService,
    query: &Query,
    policy: RetryPolicy,
) -> FetchOutcome {
    let mut attempt = 1;

    loop {
        match service.fetch_weather(query).await {
            Err(err) if err.kind.is_transient() && attempt < policy.max_attempts() => {
                let delay = policy.delay_after(attempt);
                tracing::info!(%query, attempt, kind = %err.kind, ?delay, "retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        error::ErrorKind,
        service::tests::{MockProvider, Scripted, ok},
    };
    use tokio::time::Instant;

    fn service(provider: std::sync::Arc<MockProvider>) -> WeatherService {
        WeatherService::new(provider, &Config::default())
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));

        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
    }

    #[test]
    fn zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_with_backoff() {
        let provider = MockProvider::with(vec![
            Scripted::Respond(503, String::new()),
            Scripted::Fail,
            ok("Lisbon"),
        ]);
        let svc = service(provider.clone());
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        let started = Instant::now();
        let record = fetch_with_retry(&svc, &Query::place("Lisbon"), policy)
            .await
            .expect("third attempt succeeds");

        assert_eq!(record.location_name, "Lisbon");
        assert_eq!(provider.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let provider = MockProvider::with(vec![
            Scripted::Respond(429, String::new()),
            Scripted::Respond(429, String::new()),
        ]);
        let svc = service(provider.clone());

        let err = fetch_with_retry(
            &svc,
            &Query::place("Lisbon"),
            RetryPolicy::new(2, Duration::from_millis(10)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::RateLimited);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let provider = MockProvider::with(vec![Scripted::Respond(404, String::new())]);
        let svc = service(provider.clone());

        let err = fetch_with_retry(&svc, &Query::place("Atlantis"), RetryPolicy::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn invalid_input_is_not_retried() {
        let provider = MockProvider::with(vec![]);
        let svc = service(provider.clone());

        let err = fetch_with_retry(&svc, &Query::place("  "), RetryPolicy::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert_eq!(provider.calls(), 0);
    }
}
