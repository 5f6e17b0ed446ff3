use crate::logging::{Status, status_line};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 线程安全的计数器 + 节流进度输出（跨所有线程最多每 5 秒一条）。
/// `per_host_elapsed` 对应 Run State 里的 host→seconds 映射（§3），由成功完成的
/// worker 各自上报一次，供后续的统计汇总/日志使用，而不只是在日志行里打印完就丢弃。
pub struct Stats {
    total: u64,
    success_count: AtomicU64,
    throttle: Mutex<Instant>,
    per_host_elapsed: Mutex<HashMap<String, f64>>,
}

impl Stats {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            success_count: AtomicU64::new(0),
            throttle: Mutex::new(Instant::now()),
            per_host_elapsed: Mutex::new(HashMap::new()),
        }
    }

    /// 记录一台主机的成功完成，连同其总耗时（秒）写入 `per_host_elapsed`。
    pub fn record_success(&self, host: &str, elapsed_secs: f64) {
        self.success_count.fetch_add(1, Ordering::SeqCst);
        self.per_host_elapsed.lock().unwrap().insert(host.to_string(), elapsed_secs);
    }

    pub fn success_count(&self) -> u64 {
        self.success_count.load(Ordering::SeqCst)
    }

    pub fn fail_count(&self) -> u64 {
        self.total.saturating_sub(self.success_count())
    }

    /// 指定主机记录的耗时（秒），尚未成功时为 `None`。
    pub fn elapsed_for(&self, host: &str) -> Option<f64> {
        self.per_host_elapsed.lock().unwrap().get(host).copied()
    }

    /// 若自上次输出以来已超过 5 秒，则打印一条进度行；否则静默返回。
    pub fn maybe_report(&self, round: u64) {
        let mut last = self.throttle.lock().unwrap();
        if last.elapsed() >= Duration::from_secs(5) {
            *last = Instant::now();
            drop(last);
            status_line(
                Status::Info,
                None,
                &format!(
                    "round {} — {}/{} hosts complete",
                    round,
                    self.success_count(),
                    self.total
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_track_successes() {
        let s = Stats::new(3);
        assert_eq!(s.fail_count(), 3);
        s.record_success("10.0.0.1", 1.5);
        s.record_success("10.0.0.2", 2.5);
        assert_eq!(s.success_count(), 2);
        assert_eq!(s.fail_count(), 1);
    }

    #[test]
    fn per_host_elapsed_is_recorded() {
        let s = Stats::new(2);
        assert_eq!(s.elapsed_for("10.0.0.1"), None);
        s.record_success("10.0.0.1", 3.25);
        assert_eq!(s.elapsed_for("10.0.0.1"), Some(3.25));
        assert_eq!(s.elapsed_for("10.0.0.2"), None);
    }
}
