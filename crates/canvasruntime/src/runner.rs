use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use canvascore::{
    EventEmitter, FailureKind, ImageFormat, NodeId, Payload, ResponseKind, TaskError, TaskState,
    ToolDescriptor, ToolResponse, ToolTransport,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tokio_util::sync::CancellationToken;

/// Shortest progress tick a runner will use
pub const MIN_PROGRESS_TICK: Duration = Duration::from_millis(1);

/// Timing knobs for task execution
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Image runs that have not resolved by then fail with a timeout
    pub image_timeout: Duration,
    pub progress_tick: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            image_timeout: Duration::from_secs(35),
            progress_tick: Duration::from_secs(1),
        }
    }
}

/// Drives the remote call behind one node.
///
/// The runner is the only writer of its node's [`TaskState`]. Dropping it
/// cancels the node's token: timers stop and any result still in flight is
/// discarded instead of applied.
pub struct TaskRunner {
    node_id: NodeId,
    tool: ToolDescriptor,
    transport: Arc<dyn ToolTransport>,
    state: Arc<watch::Sender<TaskState>>,
    cancellation: CancellationToken,
    events: EventEmitter,
    config: RunnerConfig,
}

impl TaskRunner {
    pub fn new(
        node_id: NodeId,
        tool: ToolDescriptor,
        transport: Arc<dyn ToolTransport>,
        events: EventEmitter,
        config: RunnerConfig,
    ) -> Self {
        let (state, _) = watch::channel(TaskState::default());
        Self {
            node_id,
            tool,
            transport,
            state: Arc::new(state),
            cancellation: CancellationToken::new(),
            events,
            config,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn tool(&self) -> &ToolDescriptor {
        &self.tool
    }

    pub fn state(&self) -> TaskState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.state.subscribe()
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Start a run with `input`.
    ///
    /// Static tools settle immediately without touching the transport.
    /// Everything else moves to `Running` and resolves on a spawned task;
    /// the returned handle can be awaited for completion.
    pub fn execute(&self, input: &str) -> Result<TaskHandle, TaskError> {
        if input.is_empty() {
            return Err(TaskError::EmptyInput);
        }
        if self.cancellation.is_cancelled() {
            return Err(TaskError::Cancelled);
        }
        if self.state.borrow().is_running() {
            return Err(TaskError::Busy);
        }

        if self.tool.response_kind == ResponseKind::Static {
            tracing::info!("Node {} ({}) is static, skipping request", self.node_id, self.tool.id);
            self.state
                .send_replace(TaskState::succeeded(Payload::Text(self.tool.static_notice())));
            self.events.succeeded(0);
            return Ok(TaskHandle::settled(self.node_id.clone()));
        }

        self.state.send_replace(TaskState::running());
        self.events.started(self.tool.id.clone());
        tracing::info!("Node {} running {} -> {}", self.node_id, self.tool.id, self.tool.endpoint);

        let run = Run {
            node_id: self.node_id.clone(),
            tool: self.tool.clone(),
            transport: Arc::clone(&self.transport),
            state: Arc::clone(&self.state),
            cancellation: self.cancellation.clone(),
            events: self.events.clone(),
            config: self.config.clone(),
        };
        let join = tokio::spawn(run.drive(input.to_string()));

        Ok(TaskHandle {
            node_id: self.node_id.clone(),
            join: Some(join),
        })
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

/// Completion handle for one execution
pub struct TaskHandle {
    node_id: NodeId,
    join: Option<JoinHandle<()>>,
}

impl TaskHandle {
    fn settled(node_id: NodeId) -> Self {
        Self { node_id, join: None }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |j| j.is_finished())
    }

    /// Wait until the run has settled or been discarded.
    pub async fn finished(self) {
        if let Some(join) = self.join {
            if let Err(e) = join.await {
                tracing::error!("Task for node {} panicked: {}", self.node_id, e);
            }
        }
    }
}

/// State moved into the spawned task for a single run
struct Run {
    node_id: NodeId,
    tool: ToolDescriptor,
    transport: Arc<dyn ToolTransport>,
    state: Arc<watch::Sender<TaskState>>,
    cancellation: CancellationToken,
    events: EventEmitter,
    config: RunnerConfig,
}

impl Run {
    async fn drive(self, content: String) {
        let started = Instant::now();
        let request = self.transport.invoke(&self.tool.endpoint, &content);

        let outcome = if self.tool.response_kind == ResponseKind::Image {
            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => return self.discard(),
                result = request => result,
                _ = sleep(self.config.image_timeout) => Err(TaskError::GenerationTimeout {
                    seconds: self.config.image_timeout.as_secs(),
                }),
                never = self.tick_progress(started) => match never {},
            }
        } else {
            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => return self.discard(),
                result = request => result,
            }
        };

        if self.cancellation.is_cancelled() {
            return self.discard();
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        match outcome.and_then(|response| decode_payload(self.tool.response_kind, response)) {
            Ok(payload) => {
                tracing::info!("Node {} completed in {}ms", self.node_id, duration_ms);
                self.state.send_replace(TaskState::succeeded(payload));
                self.events.succeeded(duration_ms);
            }
            Err(e) => {
                tracing::warn!("Node {} failed: {}", self.node_id, e);
                let failed = TaskState::failed(&e);
                let message = failed.payload.as_str().unwrap_or_default().to_string();
                self.state.send_replace(failed);
                self.events.failed(FailureKind::of(&e), message);
            }
        }
    }

    /// Publish elapsed seconds once per tick. Only ends by being dropped.
    async fn tick_progress(&self, started: Instant) -> Infallible {
        let tick = self.config.progress_tick.max(MIN_PROGRESS_TICK);
        let mut interval = interval_at(started + tick, tick);
        loop {
            interval.tick().await;
            let elapsed = started.elapsed().as_secs();
            self.state.send_modify(|s| s.elapsed_seconds = elapsed);
            self.events.progress(elapsed);
        }
    }

    fn discard(&self) {
        tracing::debug!("Node {} was removed, discarding its result", self.node_id);
    }
}

/// Turn a tool's `result` field into the payload its kind expects.
fn decode_payload(kind: ResponseKind, response: ToolResponse) -> Result<Payload, TaskError> {
    match kind {
        ResponseKind::Text | ResponseKind::Static => Ok(Payload::Text(response.result)),
        ResponseKind::Audio => decode_base64(&response.result).map(Payload::Binary),
        ResponseKind::Image => {
            let bytes = decode_base64(&response.result)?;
            if ImageFormat::sniff(&bytes).is_none() {
                return Err(TaskError::InvalidPayload(
                    "image data does not carry a known image signature".to_string(),
                ));
            }
            Ok(Payload::Binary(bytes))
        }
    }
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, TaskError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| TaskError::InvalidPayload(format!("result is not valid base64: {}", e)))
}
