use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default synchronization period. One tick samples the player position,
/// corrects it and refreshes the derived projections; the contract of the
/// tick callback itself is rate-independent.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

/// Cancellable repeating task driving the playback tick.
///
/// The callback runs once per period on a dedicated thread until
/// [`Ticker::stop`] is called or the ticker is dropped. Only this callback
/// may drive the session tick: a single writer for the playback cursor.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// use engine::ticker::Ticker;
///
/// let ticks = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&ticks);
/// let ticker = Ticker::spawn(Duration::from_millis(10), move || {
///     counter.fetch_add(1, Ordering::Relaxed);
/// });
/// std::thread::sleep(Duration::from_millis(50));
/// ticker.stop();
/// assert!(ticks.load(Ordering::Relaxed) >= 1);
/// ```
#[derive(Debug)]
pub struct Ticker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Starts the repeating task.
    pub fn spawn(period: Duration, mut on_tick: impl FnMut() + Send + 'static) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || {
            while flag.load(Ordering::Relaxed) {
                on_tick();
                thread::sleep(period);
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stops the task and waits for the in-flight tick to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::Ticker;

    #[test]
    fn ticks_at_least_once_and_stops_cleanly() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&ticks);

        let ticker = Ticker::spawn(Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        std::thread::sleep(Duration::from_millis(30));
        ticker.stop();

        let after_stop = ticks.load(Ordering::Relaxed);
        assert!(after_stop >= 1, "tick callback never ran");

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(
            ticks.load(Ordering::Relaxed),
            after_stop,
            "callback ran after stop"
        );
    }
}
