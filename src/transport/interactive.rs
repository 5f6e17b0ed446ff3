use super::TransportBackend;
use crate::config::SshConfig;
use expectrl::{Eof, Session};
use std::path::Path;
use std::time::Duration;

/// 交互式 expect 驱动的 sftp 后端。生成系统 `sftp` 子进程，驱动其
/// `Password:` / `sftp>` 提示词对话：`rm`（忽略错误）→ `put` → `quit`。
pub struct InteractiveSftp;

impl TransportBackend for InteractiveSftp {
    fn name(&self) -> &'static str {
        "interactive-sftp"
    }

    fn send(&self, host: &str, ssh: &SshConfig, local: &Path, remote: &str) -> bool {
        drive(host, ssh, local, remote).unwrap_or(false)
    }
}

fn drive(host: &str, ssh: &SshConfig, local: &Path, remote: &str) -> anyhow::Result<bool> {
    let cmd = format!(
        "sftp -oHostKeyAlgorithms=ssh-rsa -oStrictHostKeyChecking=no -oConnectTimeout=10 -P {} {}@{}",
        ssh.port,
        ssh.user,
        super::bracket_host(host)
    );
    let mut session = Session::spawn(cmd)?;
    session.set_expect_timeout(Some(Duration::from_secs(10)));

    session.expect("Password:")?;
    session.send_line(&ssh.password)?;
    session.expect("sftp>")?;

    // best-effort removal of any stale in-flight file; errors are ignored.
    session.send_line(&format!("rm {}", remote))?;
    session.expect("sftp>")?;

    let local_str = local.to_string_lossy().replace(' ', "\\ ");
    session.send_line(&format!("put {} {}", local_str, remote))?;
    session.expect("sftp>")?;

    session.send_line("quit")?;
    session.expect(Eof)?;

    let status = session.get_process().wait()?;
    Ok(status.success())
}
