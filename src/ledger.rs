use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 追加式完成名单：`complete.txt`，写入前去重，运行开始时清空。
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn clear(&self) -> std::io::Result<()> {
        std::fs::write(&self.path, "")
    }

    /// 追加主机名；若已存在则跳过，避免重复行。
    pub fn append(&self, host: &str) -> std::io::Result<()> {
        let existing = self.read_all().unwrap_or_default();
        if existing.contains(host) {
            return Ok(());
        }
        use std::io::Write;
        let mut f = std::fs::OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(f, "{}", host)
    }

    pub fn read_all(&self) -> std::io::Result<HashSet<String>> {
        let text = std::fs::read_to_string(&self.path).unwrap_or_default();
        Ok(text.lines().map(str::to_string).collect())
    }
}

pub fn default_path() -> PathBuf {
    Path::new("complete.txt").to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_dedups_and_clear_empties() {
        let path =
            std::env::temp_dir().join(format!("bmt_ledger_test_{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let ledger = Ledger::new(path.clone());
        ledger.clear().unwrap();
        ledger.append("10.0.0.1").unwrap();
        ledger.append("10.0.0.1").unwrap();
        ledger.append("10.0.0.2").unwrap();
        let all = ledger.read_all().unwrap();
        assert_eq!(all.len(), 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        let _ = std::fs::remove_file(&path);
    }
}
