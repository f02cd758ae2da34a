use crate::types::*;
use std::collections::BTreeMap;

/// Identifies one call or stream multiplexed over a connection
pub type StreamId = u32;

/// Everything sent over the pipe, in either direction
///
/// Each unary call occupies one stream: the frontend sends `Call` and the
/// bridge answers with exactly one `Reply` on the same stream. An exec
/// stream starts with `ExecOpen`, then both sides exchange `Exec` frames
/// until one of them sends `ExecEnd`.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum Frame {
    Call {
        stream: StreamId,
        request: Request,
    },
    Reply {
        stream: StreamId,
        result: Result<Response, Status>,
    },
    ExecOpen {
        stream: StreamId,
    },
    Exec {
        stream: StreamId,
        message: ExecMessage,
    },
    ExecEnd {
        stream: StreamId,
        status: Option<Status>,
    },
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum Request {
    ResolveImageConfig(ResolveImageConfigRequest),
    ResolveSourceMeta(ResolveSourceMetaRequest),
    Solve(SolveRequest),
    ReadFile(ReadFileRequest),
    ReadDir(ReadDirRequest),
    StatFile(StatFileRequest),
    Evaluate(EvaluateRequest),
    Ping,
    Return(ReturnRequest),
    Inputs,
    NewContainer(NewContainerRequest),
    ReleaseContainer(ReleaseContainerRequest),
    Warn(WarnRequest),
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::ResolveImageConfig(_) => "ResolveImageConfig",
            Request::ResolveSourceMeta(_) => "ResolveSourceMeta",
            Request::Solve(_) => "Solve",
            Request::ReadFile(_) => "ReadFile",
            Request::ReadDir(_) => "ReadDir",
            Request::StatFile(_) => "StatFile",
            Request::Evaluate(_) => "Evaluate",
            Request::Ping => "Ping",
            Request::Return(_) => "Return",
            Request::Inputs => "Inputs",
            Request::NewContainer(_) => "NewContainer",
            Request::ReleaseContainer(_) => "ReleaseContainer",
            Request::Warn(_) => "Warn",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum Response {
    ResolveImageConfig(ResolveImageConfigResponse),
    ResolveSourceMeta(ResolveSourceMetaResponse),
    Solve(SolveResponse),
    ReadFile(ReadFileResponse),
    ReadDir(ReadDirResponse),
    StatFile(StatFileResponse),
    Evaluate,
    Pong(PongResponse),
    Return,
    Inputs(InputsResponse),
    NewContainer,
    ReleaseContainer,
    Warn,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum ResolverType {
    Registry,
    OciLayout,
}

impl Default for ResolverType {
    fn default() -> Self {
        ResolverType::Registry
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ResolveImageConfigRequest {
    pub reference: String,
    pub platform: Option<Platform>,
    pub resolve_mode: String,
    pub log_name: String,
    pub resolver_type: ResolverType,
    pub session_id: String,
    pub store_id: String,
    pub source_policies: Vec<SourcePolicy>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ResolveImageConfigResponse {
    pub reference: String,
    pub digest: String,
    pub config: Vec<u8>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ResolveSourceMetaRequest {
    pub source: Option<SourceOp>,
    pub platform: Option<Platform>,
    pub log_name: String,
    pub resolve_mode: String,
    pub source_policies: Vec<SourcePolicy>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ResolveSourceImageResponse {
    pub digest: String,
    pub config: Vec<u8>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ResolveSourceMetaResponse {
    pub source: SourceOp,
    pub image: Option<ResolveSourceImageResponse>,
}

/// A sub-build submitted by the frontend
///
/// `None` entries in `cache_imports` or `source_policies` are rejected.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SolveRequest {
    pub definition: Option<Definition>,
    pub frontend: String,
    pub frontend_opt: BTreeMap<String, String>,
    pub frontend_inputs: BTreeMap<String, Definition>,
    pub allow_result_return: bool,
    pub allow_result_array_ref: bool,
    pub is_final: bool,
    pub exporter_attr: Vec<u8>,
    pub cache_imports: Vec<Option<CacheOptionsEntry>>,
    pub evaluate: bool,
    pub source_policies: Vec<Option<SourcePolicy>>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SolveResponse {
    /// Default result id, only for clients without `allow_result_return`
    pub reference: String,
    pub result: Option<ResultMessage>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Ref {
    pub id: String,
    pub def: Option<Definition>,
}

/// The four ways a result can name its references
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum ResultRefs {
    RefDeprecated(String),
    RefsDeprecated(BTreeMap<String, String>),
    Ref(Ref),
    Refs(BTreeMap<String, Ref>),
}

impl Default for ResultRefs {
    fn default() -> Self {
        ResultRefs::RefDeprecated(String::new())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum AttestationKind {
    InToto,
    Bundle,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct Attestation {
    pub kind: AttestationKind,
    pub metadata: BTreeMap<String, Vec<u8>>,
    pub reference: Option<Ref>,
    pub path: String,
    pub in_toto_predicate_type: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ResultMessage {
    pub refs: ResultRefs,
    pub metadata: BTreeMap<String, Vec<u8>>,
    pub attestations: BTreeMap<String, Vec<Attestation>>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ReadFileRequest {
    pub reference: String,
    pub file_path: String,
    pub range: Option<FileRange>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ReadFileResponse {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ReadDirRequest {
    pub reference: String,
    pub dir_path: String,
    pub include_pattern: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ReadDirResponse {
    pub entries: Vec<Stat>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct StatFileRequest {
    pub reference: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct StatFileResponse {
    pub stat: Stat,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct EvaluateRequest {
    pub reference: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct PongResponse {
    pub frontend_api_caps: Vec<ApiCap>,
    pub llb_caps: Vec<ApiCap>,
    pub workers: Vec<WorkerRecord>,
}

/// Terminal call; exactly one of `result` or `error` must be set
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ReturnRequest {
    pub result: Option<ResultMessage>,
    pub error: Option<Status>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct InputsResponse {
    pub definitions: BTreeMap<String, Definition>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct NewContainerRequest {
    pub container_id: String,
    pub mounts: Vec<Mount>,
    pub network: NetMode,
    pub platform: Option<Platform>,
    pub constraints: Option<WorkerConstraints>,
    pub extra_hosts: Vec<HostIp>,
    pub hostname: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ReleaseContainerRequest {
    pub container_id: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct WarnRequest {
    pub digest: String,
    pub level: i64,
    pub short: Vec<u8>,
    pub detail: Vec<Vec<u8>>,
    pub url: String,
    pub info: Option<SourceInfo>,
    pub ranges: Vec<Option<Range>>,
}

/// One message on an exec stream, routed by `process_id`
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct ExecMessage {
    pub process_id: String,
    pub input: ExecInput,
}

impl ExecMessage {
    pub fn new<S: Into<String>>(process_id: S, input: ExecInput) -> Self {
        ExecMessage {
            process_id: process_id.into(),
            input,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum ExecInput {
    /// frontend to bridge: start a process in an existing container
    Init(InitMessage),
    /// both ways: data for one numbered stream, or its end
    File(FdMessage),
    /// frontend to bridge
    Resize(WinSize),
    /// frontend to bridge, by name (`KILL`, `SIGTERM`, ...)
    Signal(SignalMessage),
    /// bridge to frontend, always before any output of the process
    Started,
    /// bridge to frontend
    Exit(ExitMessage),
    /// bridge to frontend, once all I/O for the process has finished
    Done,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct InitMessage {
    pub container_id: String,
    pub meta: Meta,
    pub fds: Vec<u32>,
    pub tty: bool,
    pub security: SecurityMode,
    pub secret_env: Vec<SecretEnv>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct FdMessage {
    pub fd: u32,
    pub eof: bool,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct SignalMessage {
    pub name: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ExitMessage {
    pub code: u32,
    pub error: Option<Status>,
}
