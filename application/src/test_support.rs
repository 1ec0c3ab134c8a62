//! Hand-written port doubles shared by the use case tests.

use crate::config::Credential;
use crate::ports::analysis_service::{
    AnalysisService, RawResponse, SubmitInstruction, SubmitPayload, TransportError,
};
use crate::ports::pacer::Pacer;
use crate::ports::resource_source::ResourceSource;
use async_trait::async_trait;
use captionkit_domain::JobHandle;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory resources with a read counter
#[derive(Default)]
pub(crate) struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
    reads: AtomicUsize,
}

impl MemorySource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(mut self, path: &str, bytes: &[u8]) -> Self {
        self.files.insert(PathBuf::from(path), bytes.to_vec());
        self
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ResourceSource for MemorySource {
    fn size(&self, path: &Path) -> io::Result<Option<u64>> {
        Ok(self.files.get(path).map(|b| b.len() as u64))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

/// Counts pauses instead of sleeping
#[derive(Default)]
pub(crate) struct CountingPacer {
    pauses: AtomicUsize,
}

impl CountingPacer {
    pub(crate) fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self, _duration: Duration) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

/// One scripted reply
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(u16, String),
    Transport(String),
}

impl Reply {
    pub(crate) fn ok(body: &str) -> Self {
        Reply::Body(200, body.to_string())
    }

    pub(crate) fn status(status: u16, body: &str) -> Self {
        Reply::Body(status, body.to_string())
    }

    pub(crate) fn transport(detail: &str) -> Self {
        Reply::Transport(detail.to_string())
    }

    fn into_result(self) -> Result<RawResponse, TransportError> {
        match self {
            Reply::Body(status, body) => Ok(RawResponse::new(status, body)),
            Reply::Transport(detail) => Err(TransportError::Connection(detail)),
        }
    }
}

/// Analysis service that answers from per-instruction and per-handle scripts.
///
/// A script's last reply repeats once the others are used up; an unscripted
/// poll answers `processing`.
#[derive(Default)]
pub(crate) struct ScriptedService {
    submits: Mutex<HashMap<String, VecDeque<Reply>>>,
    polls: Mutex<HashMap<String, VecDeque<Reply>>>,
    account: Mutex<Option<Reply>>,
    submit_calls: AtomicUsize,
    poll_calls: Mutex<Vec<String>>,
    poll_latency: Option<Duration>,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_poll_latency(mut self, latency: Duration) -> Self {
        self.poll_latency = Some(latency);
        self
    }

    /// Script the submit reply for a role name or prompt text
    pub(crate) fn on_submit(&self, instruction: &str, reply: Reply) {
        self.submits
            .lock()
            .unwrap()
            .entry(instruction.to_string())
            .or_default()
            .push_back(reply);
    }

    pub(crate) fn on_poll(&self, handle: &str, replies: Vec<Reply>) {
        self.polls
            .lock()
            .unwrap()
            .insert(handle.to_string(), replies.into());
    }

    pub(crate) fn on_account(&self, reply: Reply) {
        *self.account.lock().unwrap() = Some(reply);
    }

    pub(crate) fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn poll_calls(&self) -> usize {
        self.poll_calls.lock().unwrap().len()
    }

    pub(crate) fn poll_calls_for(&self, handle: &str) -> usize {
        self.poll_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.as_str() == handle)
            .count()
    }

    fn next(script: &mut VecDeque<Reply>) -> Option<Reply> {
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        }
    }
}

#[async_trait]
impl AnalysisService for ScriptedService {
    async fn submit(
        &self,
        _credential: &Credential,
        payload: &SubmitPayload,
    ) -> Result<RawResponse, TransportError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let key = match &payload.instruction {
            SubmitInstruction::Role(role) => role.clone(),
            SubmitInstruction::Prompt(prompt) => prompt.clone(),
        };
        let reply = self
            .submits
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(Self::next)
            .unwrap_or_else(|| Reply::status(500, r#"{"error": "unscripted submit"}"#));
        reply.into_result()
    }

    async fn poll(
        &self,
        _credential: &Credential,
        handle: &JobHandle,
    ) -> Result<RawResponse, TransportError> {
        self.poll_calls
            .lock()
            .unwrap()
            .push(handle.as_str().to_string());
        let reply = self
            .polls
            .lock()
            .unwrap()
            .get_mut(handle.as_str())
            .and_then(Self::next)
            .unwrap_or_else(|| Reply::ok(r#"{"status": "processing"}"#));
        if let Some(latency) = self.poll_latency {
            tokio::time::sleep(latency).await;
        }
        reply.into_result()
    }

    async fn account(&self, _credential: &Credential) -> Result<RawResponse, TransportError> {
        self.account
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Reply::ok(r#"{"credits": 0}"#))
            .into_result()
    }
}
