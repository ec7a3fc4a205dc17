//! Analysis collaborator interface and its bounded worker pool
//!
//! The analyzer is modeled as an opaque synchronous call; the pool runs it
//! on blocking threads behind a fixed number of semaphore permits. Excess
//! callers queue on the semaphore rather than spawning unbounded outbound
//! calls, so a slow analysis backend cannot swamp the process. Each call
//! carries a timeout and a cancellation token.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use billbox_core::FeeReport;

use crate::error::{AnalysisFailure, PipelineError};

pub trait FeeAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<FeeReport, AnalysisFailure>;
}

pub struct AnalysisPool {
    analyzer: Arc<dyn FeeAnalyzer>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl AnalysisPool {
    pub fn new(analyzer: Arc<dyn FeeAnalyzer>, workers: usize, timeout: Duration) -> Self {
        Self {
            analyzer,
            permits: Arc::new(Semaphore::new(workers.max(1))),
            timeout,
        }
    }

    /// Run one analysis call, blocking the caller until the result, the
    /// per-call timeout, or cancellation.
    ///
    /// A timed-out or cancelled call keeps its permit until the blocking
    /// analyzer thread actually returns; the pool-size bound on in-flight
    /// calls holds either way.
    pub async fn analyze(
        &self,
        text: String,
        cancel: &CancellationToken,
    ) -> Result<FeeReport, PipelineError> {
        let permit = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(PipelineError::Cancelled),
            permit = self.permits.clone().acquire_owned() => permit
                .map_err(|_| PipelineError::Analysis(AnalysisFailure("analysis pool closed".into())))?,
        };

        let analyzer = Arc::clone(&self.analyzer);
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            analyzer.analyze(&text)
        });

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("analysis call cancelled by caller");
                Err(PipelineError::Cancelled)
            }
            joined = tokio::time::timeout(self.timeout, task) => match joined {
                Err(_) => Err(PipelineError::AnalysisTimeout(self.timeout)),
                Ok(Err(join_err)) => Err(PipelineError::Analysis(AnalysisFailure(format!(
                    "analysis task failed: {join_err}"
                )))),
                Ok(Ok(result)) => result.map_err(PipelineError::Analysis),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test analyzer that tracks how many calls run at once.
    struct CountingAnalyzer {
        current: AtomicUsize,
        peak: AtomicUsize,
        delay: Duration,
    }

    impl CountingAnalyzer {
        fn new(delay: Duration) -> Self {
            Self {
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                delay,
            }
        }
    }

    impl FeeAnalyzer for CountingAnalyzer {
        fn analyze(&self, _text: &str) -> Result<FeeReport, AnalysisFailure> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(FeeReport::default())
        }
    }

    struct FailingAnalyzer;

    impl FeeAnalyzer for FailingAnalyzer {
        fn analyze(&self, _text: &str) -> Result<FeeReport, AnalysisFailure> {
            Err(AnalysisFailure("backend unavailable".into()))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pool_bounds_concurrency() {
        let analyzer = Arc::new(CountingAnalyzer::new(Duration::from_millis(50)));
        let pool = Arc::new(AnalysisPool::new(
            analyzer.clone(),
            2,
            Duration::from_secs(10),
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = Arc::clone(&pool);
            handles.push(tokio::spawn(async move {
                pool.analyze("text".into(), &CancellationToken::new()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(
            analyzer.peak.load(Ordering::SeqCst) <= 2,
            "at most pool-size calls may be in flight"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pool_timeout() {
        let analyzer = Arc::new(CountingAnalyzer::new(Duration::from_millis(500)));
        let pool = AnalysisPool::new(analyzer, 1, Duration::from_millis(20));

        let result = pool.analyze("text".into(), &CancellationToken::new()).await;
        assert!(matches!(result, Err(PipelineError::AnalysisTimeout(_))));
    }

    #[tokio::test]
    async fn test_pool_cancellation() {
        let analyzer = Arc::new(CountingAnalyzer::new(Duration::from_millis(0)));
        let pool = AnalysisPool::new(analyzer, 1, Duration::from_secs(10));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = pool.analyze("text".into(), &cancel).await;
        assert!(matches!(result, Err(PipelineError::Cancelled)));
    }

    #[tokio::test]
    async fn test_pool_surfaces_analyzer_failure() {
        let pool = AnalysisPool::new(Arc::new(FailingAnalyzer), 1, Duration::from_secs(10));
        let result = pool.analyze("text".into(), &CancellationToken::new()).await;
        assert!(matches!(result, Err(PipelineError::Analysis(_))));
    }
}
