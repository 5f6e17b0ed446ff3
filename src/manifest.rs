use crate::error::DeployError;

pub const DEFAULT_REMOTE_DIR: &str = "/usr/local/bin/";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostEntry(pub String);

impl std::fmt::Display for HostEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub filename: String,
    pub remote_dir: String,
}

impl ManifestEntry {
    pub fn remote_final_path(&self) -> String {
        format!("{}{}", self.remote_dir, self.filename)
    }

    /// `<remote_dir><filename>.BMT` — the in-flight upload target.
    pub fn remote_staged_path(&self) -> String {
        format!("{}{}.BMT", self.remote_dir, self.filename)
    }
}

/// 解析 `config/ip.txt`：每行一个主机，`#` 开头或空行忽略。
pub fn parse_hosts(text: &str) -> Vec<HostEntry> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| HostEntry(l.to_string()))
        .collect()
}

/// 解析 `config/file.txt`：`filename=/remote/dir/` 或裸 `filename`（默认 /usr/local/bin/）。
/// 单行解析失败时返回 Err，调用方负责记录告警并跳过该行，而不是让整个文件解析失败。
pub fn parse_manifest(text: &str) -> (Vec<ManifestEntry>, Vec<DeployError>) {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_manifest_line(line) {
            Ok(e) => entries.push(e),
            Err(e) => warnings.push(e),
        }
    }
    (entries, warnings)
}

fn parse_manifest_line(line: &str) -> Result<ManifestEntry, DeployError> {
    let (filename, dir) = match line.split_once('=') {
        Some((name, dir)) => (name.trim(), dir.trim()),
        None => (line, DEFAULT_REMOTE_DIR),
    };
    if filename.is_empty() {
        return Err(DeployError::ManifestLine(format!("empty filename in line: {}", line)));
    }
    let dir = if dir.is_empty() { DEFAULT_REMOTE_DIR } else { dir };
    let remote_dir = if dir.ends_with('/') { dir.to_string() } else { format!("{}/", dir) };
    Ok(ManifestEntry { filename: filename.to_string(), remote_dir })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts_skip_blank_and_comment_lines() {
        let hosts = parse_hosts("10.0.0.1\n# comment\n\n10.0.0.2\n");
        assert_eq!(hosts, vec![HostEntry("10.0.0.1".into()), HostEntry("10.0.0.2".into())]);
    }

    #[test]
    fn manifest_bare_name_defaults_dir() {
        let (entries, warnings) = parse_manifest("hello.bin\n");
        assert!(warnings.is_empty());
        assert_eq!(entries[0].filename, "hello.bin");
        assert_eq!(entries[0].remote_dir, DEFAULT_REMOTE_DIR);
    }

    #[test]
    fn manifest_explicit_dir_normalizes_trailing_slash() {
        let (entries, _) = parse_manifest("svc=/opt/app\n");
        assert_eq!(entries[0].remote_dir, "/opt/app/");
    }

    #[test]
    fn manifest_empty_filename_is_a_warning_not_fatal() {
        let (entries, warnings) = parse_manifest("=/tmp/\ngood.bin\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn remote_paths_use_bmt_suffix() {
        let e = ManifestEntry { filename: "svc".into(), remote_dir: "/opt/".into() };
        assert_eq!(e.remote_staged_path(), "/opt/svc.BMT");
        assert_eq!(e.remote_final_path(), "/opt/svc");
    }
}
