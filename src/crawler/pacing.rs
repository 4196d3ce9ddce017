//! Politeness pauses between requests

use crate::config::{PacingConfig, SearchConfig};
use async_trait::async_trait;
use std::time::Duration;

/// Points in a harvest where the driver yields time to remote hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// After each external link is handled
    AfterLink,
    /// After each source page's links are handled
    AfterSourcePage,
    /// Before each search result page after the first
    BetweenSearchPages,
}

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, pause: Pause);
}

/// Sleeps for a fixed duration per pause kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPacer {
    pub after_link: Duration,
    pub after_page: Duration,
    pub between_search_pages: Duration,
}

impl FixedPacer {
    pub fn from_config(pacing: &PacingConfig, search: &SearchConfig) -> Self {
        Self {
            after_link: Duration::from_millis(pacing.after_link_ms),
            after_page: Duration::from_millis(pacing.after_page_ms),
            between_search_pages: search.pause(),
        }
    }

    pub fn delay_for(&self, pause: Pause) -> Duration {
        match pause {
            Pause::AfterLink => self.after_link,
            Pause::AfterSourcePage => self.after_page,
            Pause::BetweenSearchPages => self.between_search_pages,
        }
    }
}

#[async_trait]
impl Pacer for FixedPacer {
    async fn pause(&self, pause: Pause) {
        let delay = self.delay_for(pause);
        if delay.is_zero() {
            return;
        }
        tracing::trace!("Pausing {:?} for {:?}", pause, delay);
        tokio::time::sleep(delay).await;
    }
}

/// Never waits; used by tests and dry runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn pause(&self, _pause: Pause) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_defaults_map_to_two_seconds() {
        let pacer = FixedPacer::from_config(&PacingConfig::default(), &SearchConfig::default());
        assert_eq!(pacer.delay_for(Pause::AfterLink), Duration::from_secs(2));
        assert_eq!(pacer.delay_for(Pause::AfterSourcePage), Duration::from_secs(2));
        assert_eq!(pacer.delay_for(Pause::BetweenSearchPages), Duration::from_secs(2));
    }

    #[test]
    fn test_each_pause_uses_its_own_setting() {
        let pacing = PacingConfig {
            after_link_ms: 5,
            after_page_ms: 50,
        };
        let search = SearchConfig {
            pause_ms: 500,
            ..SearchConfig::default()
        };
        let pacer = FixedPacer::from_config(&pacing, &search);
        assert_eq!(pacer.delay_for(Pause::AfterLink), Duration::from_millis(5));
        assert_eq!(pacer.delay_for(Pause::AfterSourcePage), Duration::from_millis(50));
        assert_eq!(
            pacer.delay_for(Pause::BetweenSearchPages),
            Duration::from_millis(500)
        );
    }

    #[tokio::test]
    async fn test_fixed_pacer_sleeps() {
        let pacer = FixedPacer {
            after_link: Duration::from_millis(30),
            after_page: Duration::ZERO,
            between_search_pages: Duration::ZERO,
        };

        let start = Instant::now();
        pacer.pause(Pause::AfterLink).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_no_pacing_returns_immediately() {
        let start = Instant::now();
        NoPacing.pause(Pause::AfterSourcePage).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
