use super::TransportBackend;
use crate::config::SshConfig;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

/// 非交互 sftp 子进程后端：通过标准输入管道发送 `put`/`quit` 批处理命令。
/// 无法走密码提示交互（通常依赖免密方案），但作为最后一道兜底仍按 exit code 判定成功。
pub struct SubprocessSftp;

impl TransportBackend for SubprocessSftp {
    fn name(&self) -> &'static str {
        "subprocess-sftp"
    }

    fn send(&self, host: &str, ssh: &SshConfig, local: &Path, remote: &str) -> bool {
        run(host, ssh, local, remote).unwrap_or(false)
    }
}

fn run(host: &str, ssh: &SshConfig, local: &Path, remote: &str) -> anyhow::Result<bool> {
    let mut child = Command::new("sftp")
        .arg("-oStrictHostKeyChecking=no")
        .arg("-oBatchMode=no")
        .arg("-oConnectTimeout=10")
        .arg("-P")
        .arg(ssh.port.to_string())
        .arg(format!("{}@{}", ssh.user, super::bracket_host(host)))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(stdin) = child.stdin.as_mut() {
        writeln!(stdin, "put {} {}", local.display(), remote)?;
        writeln!(stdin, "quit")?;
    }

    let status = wait_with_timeout(&mut child, Duration::from_secs(30))?;
    Ok(status)
}

fn wait_with_timeout(child: &mut std::process::Child, timeout: Duration) -> anyhow::Result<bool> {
    let start = std::time::Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status.success());
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            return Ok(false);
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}
