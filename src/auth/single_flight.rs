//! Single-flight deduplication for an async computation
//!
//! At most one execution is in flight at a time. The first caller becomes
//! the leader and starts the computation; concurrent callers await the same
//! shared future and observe the same output. The slot is cleared once the
//! computation settles, so a later caller starts a fresh one.

use std::future::Future;
use std::sync::Mutex;

use futures::future::{BoxFuture, FutureExt, Shared};

pub struct SingleFlight<T: Clone> {
    slot: Mutex<Option<Shared<BoxFuture<'static, T>>>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Join the in-flight computation, or start one via `start` if none is
    /// pending. All joined callers receive a clone of the same output.
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (fut, leader) = {
            let mut slot = self.slot.lock().unwrap();
            match slot.as_ref() {
                Some(pending) => (pending.clone(), false),
                None => {
                    let fut = start().boxed().shared();
                    *slot = Some(fut.clone());
                    (fut, true)
                }
            }
        };

        let out = fut.await;
        if leader {
            *self.slot.lock().unwrap() = None;
        }
        out
    }

    /// A computation is currently pending.
    pub fn in_flight(&self) -> bool {
        self.slot.lock().unwrap().is_some()
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_callers_share_one_execution() {
        let flight = Arc::new(SingleFlight::<u64>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let flight = flight.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                flight
                    .run(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        42
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!flight.in_flight());
    }

    #[tokio::test]
    async fn failures_are_shared_too() {
        let flight = Arc::new(SingleFlight::<Result<u64, String>>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let flight = flight.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                flight
                    .run(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Err("boom".to_string())
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Err("boom".to_string()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slot_clears_after_settle() {
        let flight = SingleFlight::<u64>::new();
        let calls = AtomicUsize::new(0);

        for expected in [1, 2] {
            let out = flight
                .run(|| {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    async move { n as u64 }
                })
                .await;
            assert_eq!(out, expected);
            assert!(!flight.in_flight());
        }
    }
}
