/// Repository-wide structured errors for the deployment core.
#[derive(Debug, Clone)]
pub enum DeployError {
    /// 本地配置文件缺失或为空（ip.txt / file.txt / file/ 目录）
    MissingInput(String),
    /// config.json 解析失败
    ConfigParse(String),
    /// 主机清单 / 文件清单中某一行无法解析，仅作为告警跳过
    ManifestLine(String),
    /// 本地文件缺失，对应清单条目被跳过
    LocalFileMissing(String),
    /// ping 不可达
    Unreachable(String),
    /// SSH 会话建立失败
    SshHandshakeFailed(String),
    /// SSH 认证失败
    SshAuthFailed(String),
    /// 传输后端全部失败
    TransportFailed(String),
    /// 校验（大小/哈希）不一致
    VerificationMismatch(String),
    /// move 模式下的远端重命名/kill 动作失败
    PostActionFailed(String),
    /// 通知发送失败（从不致命）
    NotifyFailed(String),
    /// 其他 IO 错误
    Io(String),
}

impl std::fmt::Display for DeployError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use DeployError::*;
        match self {
            MissingInput(s) => write!(f, "缺少必要输入: {}", s),
            ConfigParse(s) => write!(f, "配置解析失败: {}", s),
            ManifestLine(s) => write!(f, "清单行解析失败（已跳过）: {}", s),
            LocalFileMissing(s) => write!(f, "本地文件缺失（已跳过该条目）: {}", s),
            Unreachable(h) => write!(f, "主机不可达: {}", h),
            SshHandshakeFailed(h) => write!(f, "SSH 握手失败: {}", h),
            SshAuthFailed(h) => write!(f, "SSH 认证失败: {}", h),
            TransportFailed(s) => write!(f, "传输失败（全部后端）: {}", s),
            VerificationMismatch(s) => write!(f, "校验不一致: {}", s),
            PostActionFailed(s) => write!(f, "远端后置动作失败: {}", s),
            NotifyFailed(s) => write!(f, "通知发送失败: {}", s),
            Io(s) => write!(f, "IO 错误: {}", s),
        }
    }
}

impl std::error::Error for DeployError {}

impl DeployError {
    /// 是否应当重试（而非放弃当前主机/文件）。校验失败等价于传输失败，按可重试处理。
    pub fn is_retriable(&self) -> bool {
        use DeployError::*;
        match self {
            Unreachable(_)
            | SshHandshakeFailed(_)
            | SshAuthFailed(_)
            | TransportFailed(_)
            | VerificationMismatch(_)
            | PostActionFailed(_)
            | Io(_) => true,
            MissingInput(_) | ConfigParse(_) | ManifestLine(_) | LocalFileMissing(_)
            | NotifyFailed(_) => false,
        }
    }
}
