use crate::config::{PingConfig, RetryConfig, SshConfig};
use crate::logging::{Status, status_line};
use crate::probe::reachable;
use crate::ssh_session::{connect_session, echo_test};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// ping → SSH 就绪阶梯（§4.B）：只在成功时返回，从不失败。
///
/// 外层每隔 `ping.interval` 秒探测一次；一旦 ping 成功，进入一轮最多
/// `ssh_attempts_per_round` 次的 SSH 握手尝试（间隔 `ssh_attempt_interval` 秒）；
/// 若整轮 SSH 尝试均失败，回退到 ping 阶段重新等待（主机可能正在重启）。
pub fn wait_ready(host: &str, ssh: &SshConfig, ping: &PingConfig, retry: &RetryConfig, cancel: &AtomicBool) {
    let ping_timeout = Duration::from_secs(ping.timeout);
    let ping_interval = Duration::from_secs(ping.interval);
    let mut ping_failures: u64 = 0;

    loop {
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        if !reachable(host, ping_timeout) {
            ping_failures += 1;
            if ping_failures % 10 == 0 {
                status_line(
                    Status::Info,
                    Some(host),
                    &format!("still unreachable after {} ping attempts", ping_failures),
                );
            }
            std::thread::sleep(ping_interval);
            continue;
        }

        for attempt in 0..retry.ssh_attempts_per_round {
            if cancel.load(Ordering::SeqCst) {
                return;
            }
            match connect_session(host, ssh).and_then(|s| echo_test(&s).map(|_| s)) {
                Ok(_) => return,
                Err(e) => {
                    status_line(
                        Status::Warning,
                        Some(host),
                        &format!("ssh probe attempt {}/{} failed: {}", attempt + 1, retry.ssh_attempts_per_round, e),
                    );
                    std::thread::sleep(Duration::from_secs(retry.ssh_attempt_interval));
                }
            }
        }
        // Every SSH attempt in this round failed; the host likely rebooted. Go back to ping.
    }
}
