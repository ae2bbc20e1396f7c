//! Production implementation of NavContext using Tokio.

use crate::NavContext;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

/// Production context backed by the Tokio timer.
///
/// Monotonic time comes from `tokio::time::Instant`, so tests running with
/// a paused clock observe the same time the tick loop does.
pub struct TokioContext {
    /// Start time for monotonic duration calculations
    start: Instant,
}

impl TokioContext {
    /// Creates a new TokioContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
    
    /// Creates an Arc-wrapped context for sharing across tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NavContext for TokioContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
    
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
    
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
    
    fn spawn<F>(&self, name: &str, future: F) -> JoinHandle<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        trace!(task = name, "spawning");
        tokio::spawn(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[tokio::test(start_paused = true)]
    async fn test_tokio_context_time() {
        let ctx = TokioContext::new();
        let t1 = ctx.now();
        ctx.sleep(Duration::from_millis(50)).await;
        let t2 = ctx.now();
        
        assert!(t2 > t1);
        assert!(t2 - t1 >= Duration::from_millis(50));
    }
    
    #[test]
    fn test_tokio_context_wall_clock() {
        let ctx = TokioContext::new();
        let wall = ctx.wall_clock().unwrap();
        
        // Any sane host clock is well past 2020-01-01
        assert!(wall > Duration::from_secs(1_577_836_800));
    }
    
    #[tokio::test(start_paused = true)]
    async fn test_tokio_context_spawn_is_cancelable() {
        let ctx = TokioContext::shared();
        let handle = ctx.spawn("forever", async {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });
        
        handle.abort();
        let err = handle.await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
