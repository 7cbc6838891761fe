use futures::{Stream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use tradeai_core::api::error::ApiError;

/// 轮询结果流，每个元素对应一次抓取
pub type PollStream<T> = Pin<Box<dyn Stream<Item = Result<T, ApiError>> + Send>>;

/// # Summary
/// 轮询任务句柄。
///
/// # Invariants
/// - `cancel` 或 `Drop` 之后，对应的 `PollStream` 不再产出任何元素并随即结束。
pub struct PollHandle {
    name: String,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 停止轮询，可重复调用
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            debug!("Poller {} cancelled", self.name);
        }
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 轮询周期下限，`tokio::time::interval` 不接受零周期
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// 定时轮询器
pub struct Poller;

impl Poller {
    /// # Summary
    /// 启动一个后台轮询任务。
    ///
    /// # Logic
    /// 1. 首次抓取立即发生，之后每隔 `every` 抓取一次。
    /// 2. 每次抓取都等待上一次完成，同一轮询器至多一个请求在途。
    /// 3. 抓取耗时超过周期时跳过错过的 tick，而不是补发。
    /// 4. 抓取失败同样作为元素送出，轮询继续。
    /// 5. 通道容量为 1，消费方不读取时任务阻塞等待，不会堆积结果。
    ///
    /// # Arguments
    /// * `name`: 日志中使用的名称。
    /// * `every`: 轮询周期，小于 `MIN_PERIOD` 时按 `MIN_PERIOD` 处理。
    /// * `fetch`: 每个 tick 调用一次的抓取函数。
    ///
    /// # Returns
    /// `(PollHandle, PollStream<T>)`。
    pub fn spawn<T, F, Fut>(name: &str, every: Duration, mut fetch: F) -> (PollHandle, PollStream<T>)
    where
        T: Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let cancelled = Arc::new(AtomicBool::new(false));
        let label = name.to_string();
        let every = if every < MIN_PERIOD {
            warn!("Poller {} period {:?} too short, using {:?}", name, every, MIN_PERIOD);
            MIN_PERIOD
        } else {
            every
        };

        let task = tokio::spawn(async move {
            info!("Poller {} started, every {:?}", label, every);
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let result = fetch().await;
                if tx.send(result).await.is_err() {
                    debug!("Poller {} receiver dropped", label);
                    break;
                }
            }
            info!("Poller {} stopped", label);
        });

        let flag = cancelled.clone();
        let stream = ReceiverStream::new(rx)
            .take_while(move |_| futures::future::ready(!flag.load(Ordering::Acquire)));

        let handle = PollHandle {
            name: name.to_string(),
            cancelled,
            task,
        };
        (handle, Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_first_tick_is_immediate() {
        let (_handle, mut stream) =
            Poller::spawn("immediate", Duration::from_secs(3600), || async { Ok(7u32) });

        let first = timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("first tick should not wait a full period");
        assert_eq!(first.unwrap().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_zero_period_is_clamped() {
        let (handle, mut stream) = Poller::spawn("zero", Duration::ZERO, || async { Ok(1u8) });

        for _ in 0..3 {
            let item = timeout(Duration::from_secs(1), stream.next())
                .await
                .expect("zero period should still tick");
            assert_eq!(item.unwrap().unwrap(), 1);
        }
        assert!(!handle.task.is_finished());
    }

    #[tokio::test]
    async fn test_at_most_one_fetch_in_flight() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (in_c, peak_c) = (in_flight.clone(), peak.clone());
        let (handle, mut stream) = Poller::spawn("slow", Duration::from_millis(5), move || {
            let (in_c, peak_c) = (in_c.clone(), peak_c.clone());
            async move {
                let now = in_c.fetch_add(1, Ordering::SeqCst) + 1;
                peak_c.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                in_c.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        });

        for _ in 0..4 {
            stream.next().await.unwrap().unwrap();
        }
        handle.cancel();
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_do_not_stop_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let (_handle, mut stream) = Poller::spawn("flaky", Duration::from_millis(5), move || {
            let n = c.fetch_add(1, Ordering::SeqCst);
            async move {
                if n % 2 == 0 {
                    Err(ApiError::Transport("down".to_string()))
                } else {
                    Ok(n)
                }
            }
        });

        assert!(stream.next().await.unwrap().is_err());
        assert_eq!(stream.next().await.unwrap().unwrap(), 1);
        assert!(stream.next().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_cancel_ends_stream() {
        let (handle, mut stream) =
            Poller::spawn("cancel", Duration::from_millis(5), || async { Ok(()) });
        stream.next().await.unwrap().unwrap();

        handle.cancel();
        assert!(handle.is_cancelled());
        let next = timeout(Duration::from_secs(1), stream.next()).await.unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn test_drop_handle_ends_stream() {
        let (handle, mut stream) =
            Poller::spawn("drop", Duration::from_millis(5), || async { Ok(()) });
        drop(handle);
        let next = timeout(Duration::from_secs(1), stream.next()).await.unwrap();
        assert!(next.is_none());
    }
}
