//! Outbound search pacing and API-key rotation.
//!
//! One `Pacer` is shared by every concurrent hunt; the counter and the
//! key cursor sit behind a single mutex so two runs cannot under-count
//! the window between them.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Delay schedule and window configuration.
#[derive(Debug, Clone)]
pub struct PacerConfig {
    /// Length of the rolling request window.
    pub window: Duration,
    /// Delay while at or under 10 requests in the window.
    pub baseline: Duration,
    /// Delay for requests 11-20.
    pub short: Duration,
    /// Delay for requests 21-30.
    pub medium: Duration,
    /// Delay past 30 requests.
    pub longest: Duration,
    /// Cool-down after a provider rate-limit response. Longer than
    /// `longest`.
    pub cooldown: Duration,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            baseline: Duration::from_secs(1),
            short: Duration::from_secs(2),
            medium: Duration::from_secs(4),
            longest: Duration::from_secs(8),
            cooldown: Duration::from_secs(30),
        }
    }
}

/// What `acquire` hands back for one outbound call.
#[derive(Debug, Clone)]
pub struct Permit {
    /// How long to sleep before issuing the call.
    pub delay: Duration,
    /// The API key to use for this call.
    pub api_key: String,
    /// Position of this call within the current window (1-based).
    pub requests_in_window: u32,
}

struct PacerState {
    window_started: Instant,
    count: u32,
    key_cursor: usize,
}

/// Stepped rate limiter with round-robin key rotation.
pub struct Pacer {
    config: PacerConfig,
    keys: Vec<String>,
    state: Mutex<PacerState>,
}

impl Pacer {
    /// Create a pacer over a non-empty key list.
    pub fn new(config: PacerConfig, keys: Vec<String>) -> Self {
        assert!(!keys.is_empty(), "pacer requires at least one API key");
        Self {
            config,
            keys,
            state: Mutex::new(PacerState {
                window_started: Instant::now(),
                count: 0,
                key_cursor: 0,
            }),
        }
    }

    /// Register one outbound call: reset the window if it has elapsed,
    /// count the call, pick the delay step, and rotate to the next key.
    ///
    /// The caller sleeps `Permit::delay` before calling the provider.
    pub fn acquire(&self) -> Permit {
        let mut state = self.state.lock().expect("pacer mutex poisoned");

        let now = Instant::now();
        if now.duration_since(state.window_started) >= self.config.window {
            state.window_started = now;
            state.count = 0;
        }
        state.count += 1;

        let delay = match state.count {
            0..=10 => self.config.baseline,
            11..=20 => self.config.short,
            21..=30 => self.config.medium,
            _ => self.config.longest,
        };

        // Key rotation is independent of the delay schedule.
        let api_key = self.keys[state.key_cursor % self.keys.len()].clone();
        state.key_cursor = (state.key_cursor + 1) % self.keys.len();

        Permit {
            delay,
            api_key,
            requests_in_window: state.count,
        }
    }

    /// Cool-down to apply after a provider rate-limit response.
    pub fn cooldown(&self) -> Duration {
        self.config.cooldown
    }

    /// Number of configured API keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PacerConfig {
        PacerConfig {
            window: Duration::from_secs(60),
            baseline: Duration::from_millis(10),
            short: Duration::from_millis(20),
            medium: Duration::from_millis(40),
            longest: Duration::from_millis(80),
            cooldown: Duration::from_millis(300),
        }
    }

    #[test]
    fn delay_steps_follow_the_schedule() {
        let pacer = Pacer::new(test_config(), vec!["k".into()]);

        let mut delays = Vec::new();
        for _ in 0..31 {
            delays.push(pacer.acquire().delay);
        }

        assert_eq!(delays[0], Duration::from_millis(10));
        assert_eq!(delays[9], Duration::from_millis(10));
        assert_eq!(delays[10], Duration::from_millis(20));
        assert_eq!(delays[19], Duration::from_millis(20));
        assert_eq!(delays[20], Duration::from_millis(40));
        assert_eq!(delays[29], Duration::from_millis(40));
        // The 31st call in one window incurs the longest delay.
        assert_eq!(delays[30], Duration::from_millis(80));
    }

    #[test]
    fn window_elapse_resets_the_counter() {
        let mut config = test_config();
        config.window = Duration::from_millis(30);
        let pacer = Pacer::new(config, vec!["k".into()]);

        for _ in 0..31 {
            pacer.acquire();
        }
        assert_eq!(pacer.acquire().delay, Duration::from_millis(80));

        std::thread::sleep(Duration::from_millis(40));

        let permit = pacer.acquire();
        assert_eq!(permit.requests_in_window, 1);
        assert_eq!(permit.delay, Duration::from_millis(10));
    }

    #[test]
    fn keys_rotate_round_robin_on_every_call() {
        let pacer = Pacer::new(test_config(), vec!["a".into(), "b".into(), "c".into()]);

        let keys: Vec<String> = (0..7).map(|_| pacer.acquire().api_key).collect();
        assert_eq!(keys, vec!["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn rotation_is_independent_of_delay_steps() {
        let pacer = Pacer::new(test_config(), vec!["a".into(), "b".into()]);

        // Walk deep into the medium band; rotation must keep alternating.
        let mut last = String::new();
        for i in 0..25 {
            let permit = pacer.acquire();
            if i > 0 {
                assert_ne!(permit.api_key, last);
            }
            last = permit.api_key;
        }
    }

    #[test]
    #[should_panic(expected = "at least one API key")]
    fn empty_key_list_panics() {
        Pacer::new(test_config(), Vec::new());
    }

    #[test]
    fn cooldown_exceeds_longest_step() {
        let config = PacerConfig::default();
        assert!(config.cooldown > config.longest);
    }
}
