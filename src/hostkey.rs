/// 预先清理 known_hosts 中与 `[host]:port` 匹配的陈旧条目（设备重新烧录后主机密钥会变化）。
/// 成功、"not found" 均视为可接受；从不阻断启动。
pub fn sanitize(host: &str, port: u16) -> bool {
    let target = format!("[{}]:{}", host, port);
    std::process::Command::new("ssh-keygen")
        .arg("-R")
        .arg(&target)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// 对整批主机执行清理；单台失败不影响其余主机。
pub fn sanitize_all(hosts: &[crate::manifest::HostEntry], port: u16) {
    for h in hosts {
        sanitize(&h.0, port);
    }
}
