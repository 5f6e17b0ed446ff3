pub mod interactive;
pub mod native;
pub mod subprocess;

use crate::config::SshConfig;
use crate::error::DeployError;
use crate::logging::{Status, status_line};
use std::path::Path;

/// 为 OpenSSH 的 `[user@]host[:path]` target 语法给 IPv6 地址加方括号，
/// 否则地址里的 `:` 会被当成 host/path 分隔符解析，`sftp`/`ssh` 连去错误的主机。
/// IPv4 地址和主机名不含 `:`，原样返回。
pub fn bracket_host(host: &str) -> String {
    if host.contains(':') { format!("[{}]", host) } else { host.to_string() }
}

/// 三种 SFTP 传输后端的公共能力：尝试一次上传，成功返回 true。
/// 任何失败（库缺失、连接失败、校验失败、超时）都应当返回 false 而不是 panic，
/// 让调用方落到下一个后端。
pub trait TransportBackend {
    fn name(&self) -> &'static str;
    fn send(&self, host: &str, ssh: &SshConfig, local: &Path, remote: &str) -> bool;
}

/// 按 §4.C 的固定优先级 {交互式 expect 驱动, 原生库, 非交互子进程} 依次尝试。
/// 全部失败时返回 `DeployError::TransportFailed`，其 `is_retriable()` 恒为 true——
/// 调用方（`worker::deploy_one`）据此决定睡眠后重试同一文件，而不是放弃该主机。
pub fn send_with_fallback(
    host: &str,
    ssh: &SshConfig,
    local: &Path,
    remote: &str,
) -> Result<(), DeployError> {
    let backends: [&dyn TransportBackend; 3] =
        [&interactive::InteractiveSftp, &native::NativeSftp, &subprocess::SubprocessSftp];
    for backend in backends {
        if backend.send(host, ssh, local, remote) {
            return Ok(());
        }
        status_line(
            Status::Warning,
            Some(host),
            &format!("transport backend '{}' failed for {}, trying next", backend.name(), remote),
        );
    }
    Err(DeployError::TransportFailed(remote.to_string()))
}

#[cfg(test)]
mod tests {
    use super::bracket_host;

    #[test]
    fn ipv6_host_is_bracketed() {
        assert_eq!(bracket_host("fde0::1"), "[fde0::1]");
    }

    #[test]
    fn ipv4_host_is_left_untouched() {
        assert_eq!(bracket_host("10.0.0.1"), "10.0.0.1");
    }
}
