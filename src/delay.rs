use async_trait::async_trait;
use std::time::Duration;

/// Pause between API calls. The merger never sleeps directly so tests can
/// substitute an implementation that returns immediately.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sleep;

#[async_trait]
impl Delay for Sleep {
    async fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn sleep_waits_at_least_the_requested_duration() {
        let started = Instant::now();
        Sleep.wait(Duration::from_millis(20)).await;
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn zero_duration_returns_immediately() {
        let started = Instant::now();
        Sleep.wait(Duration::ZERO).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
