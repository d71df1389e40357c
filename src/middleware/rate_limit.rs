use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

// Fixed one-second window. Exam generation and marking are expensive model
// calls, so the ceiling is low and shared across all callers.
#[derive(Debug)]
struct Window {
    opened: Instant,
    served: u32,
}

#[derive(Clone, Debug)]
pub struct RateLimiter {
    rps: u32,
    window: Arc<Mutex<Window>>,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Self {
        Self {
            rps: rps.max(1),
            window: Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                served: 0,
            })),
        }
    }

    fn allow(&self) -> bool {
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        if now.duration_since(window.opened) >= Duration::from_secs(1) {
            window.opened = now;
            window.served = 0;
        }
        if window.served < self.rps {
            window.served += 1;
            true
        } else {
            false
        }
    }
}

pub async fn rps_middleware(
    State(limiter): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.allow() {
        return (StatusCode::TOO_MANY_REQUESTS, "rate_limit_exceeded").into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_is_enforced_within_a_window() {
        let limiter = RateLimiter::new(2);
        assert!(limiter.allow());
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }

    #[test]
    fn zero_rps_still_serves_one_request() {
        let limiter = RateLimiter::new(0);
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }
}
