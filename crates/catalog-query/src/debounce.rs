//! Quiet-period debouncing for free-text search input.
//!
//! Values pushed faster than the quiet period coalesce: the receiver yields
//! only the last value of each burst, once input has been quiet for the
//! whole period.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Default quiet period before a search is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// Create a connected sender/receiver pair with the given quiet period.
pub fn debounce<T>(quiet: Duration) -> (DebounceSender<T>, Debouncer<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DebounceSender { tx }, Debouncer { quiet, rx })
}

/// Input side. Cheap to clone.
#[derive(Debug)]
pub struct DebounceSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for DebounceSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> DebounceSender<T> {
    /// Push a new value. Returns false once the receiver is gone.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Output side.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Debouncer<T> {
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Wait for the next settled value.
    ///
    /// Returns `None` once every sender is dropped and nothing is pending.
    /// A burst cut short by the senders closing is flushed immediately.
    pub async fn settled(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;
        loop {
            match timeout(self.quiet, self.rx.recv()).await {
                Ok(Some(next)) => latest = next,
                Ok(None) | Err(_) => return Some(latest),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_fast_keystrokes_settle_once() {
        let (tx, mut rx) = debounce::<String>(DEFAULT_DEBOUNCE);

        let typist = tokio::spawn(async move {
            for prefix in ["w", "wh", "whe", "whey"] {
                tx.push(prefix.to_string());
                sleep(Duration::from_millis(100)).await;
            }
            // stay connected past the quiet period
            sleep(Duration::from_secs(2)).await;
        });

        let start = Instant::now();
        let mut settled = Vec::new();
        while let Some(query) = rx.settled().await {
            settled.push(query);
        }
        typist.await.unwrap();

        assert_eq!(settled, vec!["whey".to_string()]);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_after_quiet_period() {
        let (tx, mut rx) = debounce::<&str>(DEFAULT_DEBOUNCE);
        let start = Instant::now();

        tx.push("bcaa");
        let value = rx.settled().await;

        assert_eq!(value, Some("bcaa"));
        assert!(start.elapsed() >= DEFAULT_DEBOUNCE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_settle_separately() {
        let (tx, mut rx) = debounce::<&str>(Duration::from_millis(300));

        let typist = tokio::spawn(async move {
            tx.push("whe");
            tx.push("whey");
            sleep(Duration::from_secs(1)).await;
            tx.push("casein");
        });

        assert_eq!(rx.settled().await, Some("whey"));
        assert_eq!(rx.settled().await, Some("casein"));
        assert_eq!(rx.settled().await, None);
        typist.await.unwrap();
    }
}
