use anyhow::Result;
use sha2::{Digest, Sha256};
use ssh2::Session;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 以 4 KiB 分块流式计算本地文件的 SHA-256。
pub fn local_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// 通过 `sha256sum <remote>` 获取远端文件哈希（取首个空白分隔的 token）。
pub fn remote_sha256(session: &Session, remote_path: &str) -> Result<String> {
    let (status, out) = crate::ssh_session::exec(session, &format!("sha256sum {}", remote_path))?;
    if status != 0 {
        anyhow::bail!("sha256sum exited with status {}", status);
    }
    out.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("empty sha256sum output"))
}

/// 通过 SFTP stat 获取远端文件大小。
pub fn remote_size(sftp: &ssh2::Sftp, remote_path: &str) -> Result<u64> {
    let stat = sftp.stat(Path::new(remote_path))?;
    stat.size.ok_or_else(|| anyhow::anyhow!("remote stat has no size for {}", remote_path))
}

pub fn local_size(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_sha256_matches_known_vector() {
        let dir = std::env::temp_dir().join(format!("bmt_verify_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hello.txt");
        std::fs::write(&path, b"hello world").unwrap();
        let hash = local_sha256(&path).unwrap();
        assert_eq!(hash, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
