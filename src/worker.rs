use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::DeployError;
use crate::logging::{Status, status_line};
use crate::manifest::{HostEntry, ManifestEntry};
use crate::readiness::wait_ready;
use crate::ssh_session::connect_session;
use crate::transport::send_with_fallback;
use crate::{postaction, verify};

/// 单台主机的完整部署流程（§4.F）：就绪等待 → 逐文件上传+校验 → （move 模式）后置动作。
/// 只在该主机的全部清单条目都成功后返回；不存在"部分成功"状态。
pub struct HostWorker<'a> {
    pub host: HostEntry,
    pub manifest: &'a [ManifestEntry],
    pub local_dir: &'a Path,
    pub config: &'a Config,
    pub move_mode: bool,
    pub cancel: &'a AtomicBool,
}

impl<'a> HostWorker<'a> {
    /// 阻塞直至该主机全部文件部署成功，或进程收到取消信号提前返回 false。
    pub fn run(&self) -> (bool, f64) {
        let start = Instant::now();
        let host = self.host.0.as_str();

        wait_ready(host, &self.config.ssh, &self.config.ping, &self.config.retry, self.cancel);
        if self.cancel.load(Ordering::SeqCst) {
            return (false, start.elapsed().as_secs_f64());
        }

        status_line(Status::Running, Some(host), "host ready, starting transfer");

        for entry in self.manifest {
            let local_path = self.local_dir.join(&entry.filename);
            if !local_path.exists() {
                status_line(
                    Status::Warning,
                    Some(host),
                    &format!("local file missing, skipping entry: {}", entry.filename),
                );
                continue;
            }

            if !self.deploy_one(host, entry, &local_path) {
                // Only way out without success is a cancellation request.
                return (false, start.elapsed().as_secs_f64());
            }
        }

        status_line(Status::Success, Some(host), "all manifest entries deployed");
        (true, start.elapsed().as_secs_f64())
    }

    /// 单个文件的无限重试循环：上传→校验 失败则 5 秒后重试同一文件；
    /// move 模式下的远端动作失败则 2 秒后重试整条文件（重新上传 + 重新 move）。
    ///
    /// 每一步失败都产生一个 `DeployError`；在这个域里它们全部是 `is_retriable()`
    /// 的（§9 把无限重试当作一等公民，不存在"放弃该文件"的出口），所以这里的
    /// `debug_assert!` 只是把分类器钉在调用点上，而不是引入一条从未走到的分支。
    fn deploy_one(&self, host: &str, entry: &ManifestEntry, local_path: &Path) -> bool {
        let staged = entry.remote_staged_path();
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return false;
            }

            if let Err(e) = send_with_fallback(host, &self.config.ssh, local_path, &staged) {
                self.retry_after(host, &e, Duration::from_secs(5));
                continue;
            }

            if let Err(e) = self.verify(host, local_path, &staged) {
                self.retry_after(host, &e, Duration::from_secs(5));
                continue;
            }

            if !self.move_mode {
                return true;
            }

            let move_result = connect_session(host, &self.config.ssh)
                .map_err(|e| DeployError::PostActionFailed(e.to_string()))
                .and_then(|session| {
                    postaction::finalize_move(&session, &staged, &entry.filename)
                        .map_err(|e| DeployError::PostActionFailed(e.to_string()))
                });
            match move_result {
                Ok(()) => return true,
                Err(e) => {
                    self.retry_after(host, &e, Duration::from_secs(2));
                    continue;
                }
            }
        }
    }

    /// 记录一条告警并按错误分类决定的退避时长休眠；非可重试错误不应当出现在这个循环里，
    /// 调试构建下用 `debug_assert!` 捕获建模错误。
    fn retry_after(&self, host: &str, error: &DeployError, backoff: Duration) {
        debug_assert!(error.is_retriable(), "deploy_one retry loop only handles retriable errors");
        status_line(Status::Warning, Some(host), &format!("{}, retrying in {:?}", error, backoff));
        std::thread::sleep(backoff);
    }

    /// 尽力而为的完整性校验：优先哈希对比，SSH 不可用时退化为大小对比，
    /// 二者都拿不到时信任传输后端的退出码证据。
    fn verify(&self, host: &str, local_path: &Path, remote_path: &str) -> Result<(), DeployError> {
        let local_hash = match verify::local_sha256(local_path) {
            Ok(h) => h,
            Err(_) => return Ok(()),
        };
        let matches = match connect_session(host, &self.config.ssh) {
            Ok(session) => match verify::remote_sha256(&session, remote_path) {
                Ok(remote_hash) => local_hash == remote_hash,
                Err(_) => match session.sftp().and_then(|sftp| {
                    Ok((verify::remote_size(&sftp, remote_path), verify::local_size(local_path)))
                }) {
                    Ok((Ok(rs), Ok(ls))) => rs == ls,
                    _ => true,
                },
            },
            Err(_) => true,
        };
        if matches {
            Ok(())
        } else {
            Err(DeployError::VerificationMismatch(remote_path.to_string()))
        }
    }
}
