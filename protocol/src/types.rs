use core::fmt;
use std::collections::BTreeMap;

/// Exit code reported when a process ended without a usable status
pub const UNKNOWN_EXIT_STATUS: u32 = 255;

/// Environment variables handed to every frontend process
pub mod env {
    pub const FRONTEND_OPT_PREFIX: &str = "GATEWAY_FRONTEND_OPT_";
    pub const SESSION_ID: &str = "GATEWAY_SESSION_ID";
    pub const WORKERS: &str = "GATEWAY_WORKERS";
    pub const EXPORTED_PRODUCT: &str = "GATEWAY_EXPORTEDPRODUCT";
}

/// Capability identifiers negotiated between frontends and the bridge
pub mod caps {
    pub const FRONTEND_INPUTS: &str = "gateway.frontend.inputs";
    pub const RETURN_MAP: &str = "gateway.frontend.returnmap";
    pub const REF_ARRAY: &str = "gateway.frontend.refarray";
    pub const READ_DIR: &str = "gateway.frontend.readdir";
    pub const STAT_FILE: &str = "gateway.frontend.statfile";
    pub const EVALUATE: &str = "gateway.frontend.evaluate";
    pub const CONTAINER: &str = "gateway.frontend.container";
    pub const EXEC_PROCESS: &str = "gateway.frontend.container.exec";
    pub const ATTESTATIONS: &str = "gateway.frontend.attestations";
    pub const WARNINGS: &str = "gateway.frontend.warnings";
    pub const SOURCE_META: &str = "gateway.frontend.sourcemeta";

    /// Everything this bridge implements
    pub const FRONTEND_API: &[&str] = &[
        FRONTEND_INPUTS,
        RETURN_MAP,
        REF_ARRAY,
        READ_DIR,
        STAT_FILE,
        EVALUATE,
        CONTAINER,
        EXEC_PROCESS,
        ATTESTATIONS,
        WARNINGS,
        SOURCE_META,
    ];

    /// Build graph features passed through to the engine
    pub const LLB: &[&str] = &[
        "source.image",
        "source.local",
        "source.git",
        "source.http",
        "exec.meta.base",
        "exec.mount.bind",
        "exec.mount.cache",
        "exec.mount.secret",
        "exec.mount.ssh",
        "file.base",
        "constraints",
        "platform",
        "meta.description",
    ];
}

/// Image config labels the session driver looks at
pub mod labels {
    pub const NETWORK_NONE: &str = "gateway.frontend.network.none";
    pub const CAPS: &str = "gateway.frontend.caps";
}

/// Where the frontend finds its own build definition
pub const METADATA_MOUNT_PATH: &str = "/run/config/gateway/metadata";
pub const METADATA_FILE_NAME: &str = "frontend.bin";

/// Error classes, numbered like gRPC status codes
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum Code {
    Ok,
    Canceled,
    Unknown,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    ResourceExhausted,
}

/// Result ids registered while reporting a failed solve, so the frontend
/// can still inspect the partial state
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SolveErrorDetail {
    pub input_ids: Vec<String>,
    pub mount_ids: Vec<String>,
    pub subject: Option<String>,
}

/// Error carried over the wire
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct Status {
    pub code: Code,
    pub message: String,
    pub solve: Option<SolveErrorDetail>,
}

impl Status {
    pub fn new<S: Into<String>>(code: Code, message: S) -> Self {
        Status {
            code,
            message: message.into(),
            solve: None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for Status {}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Platform {
    pub os: String,
    pub architecture: String,
    pub variant: String,
    pub os_version: String,
    pub os_features: Vec<String>,
}

/// Serialized build graph; opaque to the bridge
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Definition {
    pub def: Vec<Vec<u8>>,
    pub metadata: BTreeMap<String, String>,
}

impl Definition {
    /// Single-op graph pulling an image by reference
    pub fn image(reference: &str) -> Self {
        Definition {
            def: vec![format!("docker-image://{}", reference).into_bytes()],
            metadata: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SourceOp {
    pub identifier: String,
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SourcePolicy {
    pub rules: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct CacheOptionsEntry {
    pub kind: String,
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct FileRange {
    pub offset: i64,
    pub length: i64,
}

/// File metadata, in the shape of a tar header
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Stat {
    pub path: String,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: i64,
    pub mod_time: i64,
    pub linkname: String,
    pub devmajor: i64,
    pub devminor: i64,
    pub xattrs: BTreeMap<String, Vec<u8>>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct WorkerRecord {
    pub id: String,
    pub labels: BTreeMap<String, String>,
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct ApiCap {
    pub id: String,
    pub enabled: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum NetMode {
    Unset,
    Host,
    None,
}

impl Default for NetMode {
    fn default() -> Self {
        NetMode::Unset
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum SecurityMode {
    Sandbox,
    Insecure,
}

impl Default for SecurityMode {
    fn default() -> Self {
        SecurityMode::Sandbox
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum MountType {
    Bind,
    Secret,
    Ssh,
    Cache,
    Tmpfs,
}

impl Default for MountType {
    fn default() -> Self {
        MountType::Bind
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum CacheSharing {
    Shared,
    Private,
    Locked,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct CacheOpt {
    pub id: String,
    pub sharing: CacheSharing,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SecretOpt {
    pub id: String,
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
    pub optional: bool,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SshOpt {
    pub id: String,
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
    pub optional: bool,
}

/// Mount requested for a new container; `result_id` names a previously
/// returned result to mount, or is empty for scratch
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Mount {
    pub dest: String,
    pub selector: String,
    pub readonly: bool,
    pub mount_type: MountType,
    pub result_id: String,
    pub cache_opt: Option<CacheOpt>,
    pub secret_opt: Option<SecretOpt>,
    pub ssh_opt: Option<SshOpt>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct HostIp {
    pub host: String,
    pub ip: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct WorkerConstraints {
    pub filter: Vec<String>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Meta {
    pub args: Vec<String>,
    pub env: Vec<String>,
    pub cwd: String,
    pub user: String,
    pub remove_mount_stubs_recursive: bool,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SecretEnv {
    pub id: String,
    pub name: String,
    pub optional: bool,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct WinSize {
    pub rows: u32,
    pub cols: u32,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub line: i32,
    pub character: i32,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SourceInfo {
    pub filename: String,
    pub data: Vec<u8>,
    pub definition: Option<Definition>,
    pub language: String,
}
