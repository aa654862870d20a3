use tokio::time::{Duration, Instant};

/// Warm-start bias: a fresh budget may fire its first batch after only 20%
/// of a period instead of waiting out a full one.
const WARM_START_FRACTION: f64 = 0.8;

/// One worker's slice of the global rate limit.
///
/// Works like a leaky bucket keyed on batch fullness: admitting an
/// under-filled batch pulls the next window proportionally closer to now, so
/// a burst arriving shortly after a quiet stretch is not forced to wait a
/// full period. Average throughput still converges to `max_requests` per
/// `period`.
#[derive(Debug)]
pub struct RateBudget {
    max_requests: usize,
    period: Duration,
    last_update: Instant,
}

impl RateBudget {
    pub fn new(max_requests: usize, period: Duration) -> Self {
        let now = Instant::now();
        let last_update = now
            .checked_sub(period.mul_f64(WARM_START_FRACTION))
            .unwrap_or(now);
        Self {
            max_requests,
            period,
            last_update,
        }
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Slice off the batch the current window allows, or an empty slice while
    /// the window is still closed.
    pub fn admit<'a>(&mut self, pending: &'a [String]) -> &'a [String] {
        if self.max_requests == 0 || self.last_update.elapsed() <= self.period {
            return &pending[..0];
        }

        let len = pending.len().min(self.max_requests);
        let batch = &pending[..len];

        let frac_unused = 1.0 - (len as f64 / self.max_requests as f64);
        let now = Instant::now();
        self.last_update = now
            .checked_sub(self.period.mul_f64(frac_unused))
            .unwrap_or(now);

        batch
    }

    /// Time left until the window reopens; zero once admitting.
    pub fn time_until_open(&self) -> Duration {
        self.period.saturating_sub(self.last_update.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::advance;

    use super::*;

    fn symbols(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("SYM{i:02}")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn waits_out_the_window_before_admitting() {
        let mut budget = RateBudget::new(10, Duration::from_secs(5));
        let pending = symbols(4);

        // Warm start leaves 20% of the period to go.
        assert!(budget.admit(&pending).is_empty());
        advance(Duration::from_millis(900)).await;
        assert!(budget.admit(&pending).is_empty());
        advance(Duration::from_millis(200)).await;
        assert_eq!(budget.admit(&pending).len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn gate_ignores_pending_size_while_waiting() {
        let mut budget = RateBudget::new(2, Duration::from_secs(5));
        let pending = symbols(50);
        assert!(budget.admit(&pending).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn underfilled_batch_pulls_the_next_window_closer() {
        let period = Duration::from_secs(5);
        let mut budget = RateBudget::new(10, period);
        advance(Duration::from_millis(1100)).await;

        let pending = symbols(4);
        assert_eq!(budget.admit(&pending).len(), 4);

        // frac_unused = 1 - 4/10, so only 40% of a period remains.
        assert_eq!(budget.time_until_open(), Duration::from_secs(2));

        advance(Duration::from_secs(2)).await;
        assert!(budget.admit(&pending).is_empty(), "boundary is exclusive");
        advance(Duration::from_millis(1)).await;
        assert_eq!(budget.admit(&pending).len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn full_batch_waits_a_whole_period() {
        let period = Duration::from_secs(5);
        let mut budget = RateBudget::new(10, period);
        advance(Duration::from_millis(1100)).await;

        let pending = symbols(25);
        assert_eq!(budget.admit(&pending).len(), 10);
        assert_eq!(budget.time_until_open(), period);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_pending_resets_the_window_to_now() {
        let period = Duration::from_secs(5);
        let mut budget = RateBudget::new(10, period);
        advance(Duration::from_millis(1100)).await;

        // An empty admission leaves frac_unused at 1.0, so the window is
        // immediately one full period old again.
        assert!(budget.admit(&[]).is_empty());
        advance(Duration::from_millis(1)).await;
        assert_eq!(budget.admit(&symbols(3)).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_allowance_never_admits() {
        let mut budget = RateBudget::new(0, Duration::from_millis(10));
        advance(Duration::from_secs(60)).await;
        assert!(budget.admit(&symbols(5)).is_empty());
    }
}
