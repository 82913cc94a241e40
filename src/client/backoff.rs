use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug)]
pub struct RetryBackoff {
    backoff_factor: f64,
    max_delay: Duration,
    max_retries: u32,
    jitter: bool,
    current_attempt: u32,
}

#[derive(Debug)]
pub struct MaxRetriesExceeded;

impl std::fmt::Display for MaxRetriesExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Maximum retry attempts exceeded")
    }
}

impl std::error::Error for MaxRetriesExceeded {}

impl RetryBackoff {
    /// `backoff_factor` is the first delay in seconds; each retry doubles it
    pub fn new(backoff_factor: f64, max_retries: u32, jitter: bool) -> Self {
        Self {
            backoff_factor: backoff_factor.max(0.0),
            max_delay: Duration::from_secs(30),
            max_retries,
            jitter,
            current_attempt: 0,
        }
    }

    /// Base delay for the next attempt without jitter, or `None` when exhausted
    pub fn next_delay(&self) -> Option<Duration> {
        if self.current_attempt >= self.max_retries {
            return None;
        }

        let secs = self.backoff_factor * 2_f64.powi(self.current_attempt as i32);
        Some(Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64())))
    }

    pub async fn sleep(&mut self) -> Result<(), MaxRetriesExceeded> {
        let base = self.next_delay().ok_or(MaxRetriesExceeded)?;

        let jitter = if self.jitter && !base.is_zero() {
            Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..base.as_secs_f64() / 2.0))
        } else {
            Duration::ZERO
        };
        let delay = base + jitter;

        log::warn!(
            "⏳ Retry attempt {} of {} in {:.3}s",
            self.current_attempt + 1,
            self.max_retries,
            delay.as_secs_f64()
        );

        sleep(delay).await;
        self.current_attempt += 1;
        Ok(())
    }

    pub fn attempts(&self) -> u32 {
        self.current_attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double() {
        let backoff = RetryBackoff::new(0.5, 3, false);
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(500)));

        let delays: Vec<_> = (0..4)
            .map(|attempt| {
                RetryBackoff {
                    current_attempt: attempt,
                    ..RetryBackoff::new(1.0, 3, false)
                }
                .next_delay()
            })
            .collect();

        assert_eq!(
            delays,
            vec![
                Some(Duration::from_secs(1)),
                Some(Duration::from_secs(2)),
                Some(Duration::from_secs(4)),
                None
            ]
        );
    }

    #[tokio::test]
    async fn test_exhausts_after_max_retries() {
        let mut backoff = RetryBackoff::new(0.0, 2, true);

        assert!(backoff.sleep().await.is_ok());
        assert!(backoff.sleep().await.is_ok());
        assert!(backoff.sleep().await.is_err());
        assert_eq!(backoff.attempts(), 2);
    }

    #[test]
    fn test_delay_capped() {
        let backoff = RetryBackoff {
            current_attempt: 1,
            ..RetryBackoff::new(20.0, 4, false)
        };

        // 20s * 2 = 40s, capped at 30s
        assert_eq!(backoff.next_delay(), Some(Duration::from_secs(30)));
    }
}
