use super::TransportBackend;
use crate::config::SshConfig;
use crate::ssh_session::connect_session;
use std::io::{Read, Write};
use std::path::Path;

/// 原生 SFTP 客户端库后端。上传后通过 `stat.size` 与本地字节数比较完成校验。
pub struct NativeSftp;

impl TransportBackend for NativeSftp {
    fn name(&self) -> &'static str {
        "native-sftp"
    }

    fn send(&self, host: &str, ssh: &SshConfig, local: &Path, remote: &str) -> bool {
        upload(host, ssh, local, remote).unwrap_or(false)
    }
}

fn upload(host: &str, ssh: &SshConfig, local: &Path, remote: &str) -> anyhow::Result<bool> {
    let session = connect_session(host, ssh)?;
    let sftp = session.sftp()?;

    ensure_remote_dir_all(&sftp, Path::new(remote).parent().unwrap_or(Path::new("/")))?;

    let local_size = std::fs::metadata(local)?.len();
    let mut local_file = std::fs::File::open(local)?;
    let mut remote_file = sftp.create(Path::new(remote))?;
    let mut buf = [0u8; 32 * 1024];
    loop {
        let n = local_file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        remote_file.write_all(&buf[..n])?;
    }
    drop(remote_file);

    let stat = sftp.stat(Path::new(remote))?;
    let remote_size = stat.size.unwrap_or(0);
    Ok(remote_size == local_size)
}

/// 递归创建远端目录，容忍"已存在"这类竞争。
fn ensure_remote_dir_all(sftp: &ssh2::Sftp, dir: &Path) -> anyhow::Result<()> {
    let mut cur = std::path::PathBuf::from("/");
    for component in dir.components() {
        if let std::path::Component::Normal(part) = component {
            cur.push(part);
            if sftp.stat(&cur).is_err() {
                match sftp.mkdir(&cur, 0o755) {
                    Ok(()) => {}
                    Err(_) if sftp.stat(&cur).is_ok() => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }
    Ok(())
}
