use anyhow::{Result, bail};
use ssh2::Session;

use crate::ssh_session::exec;

/// move 模式下的远端后置动作（§4.E）：
/// 1. `mv <remote>.BMT <remote>`（仅替换末尾 `.BMT` 后缀，见 REDESIGN FLAGS）。
/// 2. 通过 `ps | grep <filename> | grep -v grep | awk '{print $1}'` 找到候选 PID 并逐一 `kill -9`。
///
/// 步骤 1 失败返回 Err，调用方负责休眠 2 秒并重试整条文件（重新上传 + 重新 move）。
/// 步骤 2 中单个 PID 的 kill 失败只记录日志，不视为整体失败。
pub fn finalize_move(session: &Session, staged_remote: &str, filename: &str) -> Result<()> {
    let final_remote = strip_trailing_bmt(staged_remote);
    let (status, _) = exec(session, &format!("mv {} {}", staged_remote, final_remote))?;
    if status != 0 {
        bail!("remote mv failed for {}", staged_remote);
    }

    let (_, out) =
        exec(session, &format!("ps | grep {} | grep -v grep | awk '{{print $1}}'", filename))?;
    for pid in out.split_whitespace() {
        if pid.chars().all(|c| c.is_ascii_digit()) {
            let _ = exec(session, &format!("kill -9 {}", pid));
        }
    }
    Ok(())
}

/// 仅剥离末尾的 `.BMT` 后缀，而非全局子串替换，避免病态文件名（路径中其他位置恰好
/// 含有字面量 `.BMT`）被错误地改写。
fn strip_trailing_bmt(path: &str) -> String {
    path.strip_suffix(".BMT").unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_trailing_suffix() {
        assert_eq!(strip_trailing_bmt("/opt/app/svc.BMT"), "/opt/app/svc");
        assert_eq!(strip_trailing_bmt("/opt/.BMT-backup/svc.BMT"), "/opt/.BMT-backup/svc");
        // No trailing suffix: left untouched rather than corrupted by substring replace.
        assert_eq!(strip_trailing_bmt("/opt/.BMT-backup/svc"), "/opt/.BMT-backup/svc");
    }
}
