use anyhow::{Context, Result, anyhow};
use ssh2::Session;
use std::net::TcpStream;
use std::time::Duration;

use crate::config::SshConfig;

/// 建立一个经密码认证的 SSH 会话；握手预算 ≤5s（由连接超时体现）。
pub fn connect_session(host: &str, cfg: &SshConfig) -> Result<Session> {
    let addr = format!("{}:{}", host, cfg.port);
    let tcp = TcpStream::connect(&addr).with_context(|| format!("tcp connect {}", addr))?;
    tcp.set_read_timeout(Some(Duration::from_secs(5)))?;
    tcp.set_write_timeout(Some(Duration::from_secs(5)))?;

    let mut session = Session::new().map_err(|e| anyhow!("ssh session create failed: {}", e))?;
    session.set_tcp_stream(tcp);
    session.set_timeout(5_000);
    session.handshake().map_err(|e| anyhow!("ssh handshake failed for {}: {}", host, e))?;
    session
        .userauth_password(&cfg.user, &cfg.password)
        .map_err(|e| anyhow!("ssh auth failed for {}: {}", host, e))?;
    if !session.authenticated() {
        return Err(anyhow!("ssh auth failed for {}", host));
    }
    Ok(session)
}

/// 在已建立的会话上执行 `echo test`，要求 3 秒内返回 exit status 0。
pub fn echo_test(session: &Session) -> Result<()> {
    session.set_timeout(3_000);
    let mut channel = session.channel_session()?;
    channel.exec("echo test")?;
    let mut out = String::new();
    use std::io::Read;
    channel.read_to_string(&mut out)?;
    channel.wait_close()?;
    if channel.exit_status()? != 0 {
        return Err(anyhow!("echo test exited non-zero"));
    }
    Ok(())
}

/// 执行一条简单 shell 命令并返回 (exit_status, stdout)。
pub fn exec(session: &Session, cmd: &str) -> Result<(i32, String)> {
    let mut channel = session.channel_session()?;
    channel.exec(cmd)?;
    let mut out = String::new();
    use std::io::Read;
    channel.read_to_string(&mut out)?;
    channel.wait_close()?;
    let status = channel.exit_status()?;
    Ok((status, out))
}
