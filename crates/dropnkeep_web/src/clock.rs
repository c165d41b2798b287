//! Browser timer behind the core `Clock`.

use dropnkeep_core::Clock;
use gloo_timers::future::TimeoutFuture;
use std::time::Duration;
use web_sys::Performance;

/// `performance.now()` for time, `setTimeout` for delays.
pub struct WebClock {
    performance: Option<Performance>,
}

impl WebClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|window| window.performance()),
        }
    }
}

impl Default for WebClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WebClock {
    fn now(&self) -> Duration {
        let millis = self
            .performance
            .as_ref()
            .map_or_else(js_sys::Date::now, Performance::now);
        Duration::from_secs_f64(millis.max(0.0) / 1000.0)
    }

    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}
