use std::time::Duration;

/// 单次 ping 探测；任何 OS 错误或超时都视为不可达（非致命）。
pub fn reachable(host: &str, timeout: Duration) -> bool {
    let timeout_secs = timeout.as_secs().max(1).to_string();
    #[cfg(target_os = "windows")]
    let (cmd, count_flag, timeout_flag) = ("ping", "-n", "-w");
    #[cfg(not(target_os = "windows"))]
    let (cmd, count_flag, timeout_flag) = ("ping", "-c", "-W");

    #[cfg(target_os = "windows")]
    let timeout_value = (timeout.as_millis().max(1)).to_string();
    #[cfg(not(target_os = "windows"))]
    let timeout_value = timeout_secs;

    std::process::Command::new(cmd)
        .arg(count_flag)
        .arg("1")
        .arg(timeout_flag)
        .arg(timeout_value)
        .arg(host)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_is_reachable() {
        assert!(reachable("127.0.0.1", Duration::from_secs(1)));
    }

    #[test]
    fn garbage_host_is_unreachable() {
        assert!(!reachable("256.256.256.256.invalid", Duration::from_millis(500)));
    }
}
