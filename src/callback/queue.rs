use super::error::DispatchError;
use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where built invocations are submitted.
///
/// `submit` only enqueues: it must not run the invocation inline and must not
/// block, so producers on any thread can call it.
pub trait ExecutionContext: Send + Sync {
    fn submit(&self, invocation: String) -> Result<(), DispatchError>;

    /// Enqueue every invocation, in order, or none of them.
    ///
    /// The default submits one by one; contexts that can fail part way
    /// (bounded queues) override it to reserve room for the whole batch.
    fn submit_all(&self, invocations: Vec<String>) -> Result<(), DispatchError> {
        for invocation in invocations {
            self.submit(invocation)?;
        }
        Ok(())
    }
}

impl<T: ExecutionContext + ?Sized> ExecutionContext for Arc<T> {
    fn submit(&self, invocation: String) -> Result<(), DispatchError> {
        (**self).submit(invocation)
    }

    fn submit_all(&self, invocations: Vec<String>) -> Result<(), DispatchError> {
        (**self).submit_all(invocations)
    }
}

/// The scripting engine: runs one invocation string.
///
/// Called from the queue worker only, one invocation at a time, on tokio's
/// blocking pool so a slow engine never stalls the runtime.
pub trait ScriptRunner: Send + 'static {
    fn run(&mut self, invocation: &str) -> Result<()>;
}

impl<F> ScriptRunner for F
where
    F: FnMut(&str) -> Result<()> + Send + 'static,
{
    fn run(&mut self, invocation: &str) -> Result<()> {
        self(invocation)
    }
}

#[derive(Clone)]
enum QueueSender {
    Unbounded(mpsc::UnboundedSender<String>),
    Bounded(mpsc::Sender<String>),
}

enum QueueReceiver {
    Unbounded(mpsc::UnboundedReceiver<String>),
    Bounded(mpsc::Receiver<String>),
}

impl QueueReceiver {
    async fn recv(&mut self) -> Option<String> {
        match self {
            QueueReceiver::Unbounded(rx) => rx.recv().await,
            QueueReceiver::Bounded(rx) => rx.recv().await,
        }
    }

    fn close(&mut self) {
        match self {
            QueueReceiver::Unbounded(rx) => rx.close(),
            QueueReceiver::Bounded(rx) => rx.close(),
        }
    }
}

/// Producer handle of the script queue: a FIFO channel drained by a single
/// worker task. Cheap to clone; every clone feeds the same worker.
#[derive(Clone)]
pub struct ScriptQueue {
    sender: QueueSender,
}

/// Owns the worker task draining a [`ScriptQueue`]
pub struct QueueWorker {
    stop_tx: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<usize>>,
}

impl ScriptQueue {
    /// Start the worker task. `capacity == 0` means unbounded.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R: ScriptRunner>(capacity: usize, runner: R) -> (ScriptQueue, QueueWorker) {
        let (sender, receiver) = if capacity == 0 {
            let (tx, rx) = mpsc::unbounded_channel();
            (QueueSender::Unbounded(tx), QueueReceiver::Unbounded(rx))
        } else {
            let (tx, rx) = mpsc::channel(capacity);
            (QueueSender::Bounded(tx), QueueReceiver::Bounded(rx))
        };

        let (stop_tx, stop_rx) = oneshot::channel();
        let join_handle = tokio::spawn(run_worker(receiver, stop_rx, runner));

        info!(capacity = capacity, "Script queue started");

        (
            ScriptQueue { sender },
            QueueWorker {
                stop_tx: Some(stop_tx),
                join_handle: Some(join_handle),
            },
        )
    }

    /// True once the worker has stopped accepting invocations
    pub fn is_closed(&self) -> bool {
        match &self.sender {
            QueueSender::Unbounded(tx) => tx.is_closed(),
            QueueSender::Bounded(tx) => tx.is_closed(),
        }
    }
}

impl ExecutionContext for ScriptQueue {
    fn submit(&self, invocation: String) -> Result<(), DispatchError> {
        match &self.sender {
            QueueSender::Unbounded(tx) => tx
                .send(invocation)
                .map_err(|_| DispatchError::QueueClosed),
            QueueSender::Bounded(tx) => tx.try_send(invocation).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DispatchError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => DispatchError::QueueClosed,
            }),
        }
    }

    fn submit_all(&self, invocations: Vec<String>) -> Result<(), DispatchError> {
        match &self.sender {
            QueueSender::Unbounded(tx) => {
                for invocation in invocations {
                    tx.send(invocation).map_err(|_| DispatchError::QueueClosed)?;
                }
                Ok(())
            }
            QueueSender::Bounded(tx) => {
                if invocations.is_empty() {
                    return Ok(());
                }
                let permits = tx.try_reserve_many(invocations.len()).map_err(|e| match e {
                    mpsc::error::TrySendError::Full(_) => DispatchError::QueueFull,
                    mpsc::error::TrySendError::Closed(_) => DispatchError::QueueClosed,
                })?;
                for (permit, invocation) in permits.zip(invocations) {
                    permit.send(invocation);
                }
                Ok(())
            }
        }
    }
}

impl QueueWorker {
    /// Close the queue, run whatever was already enqueued, and wait for the
    /// worker to exit. Returns the total number of invocations run.
    pub async fn shutdown(mut self) -> Result<usize> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        match self.join_handle.take() {
            Some(join_handle) => join_handle
                .await
                .map_err(|e| anyhow!("script queue worker join: {}", e)),
            None => Ok(0),
        }
    }
}

impl Drop for QueueWorker {
    fn drop(&mut self) {
        // Worker drains what is queued and exits on its own
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

async fn run_worker<R: ScriptRunner>(
    mut receiver: QueueReceiver,
    mut stop_rx: oneshot::Receiver<()>,
    runner: R,
) -> usize {
    let runner = Arc::new(Mutex::new(runner));
    let mut executed = 0;

    loop {
        tokio::select! {
            biased;

            next = receiver.recv() => match next {
                Some(invocation) => {
                    execute(&runner, invocation).await;
                    executed += 1;
                }
                None => break,
            },

            // Stop requested (or the worker handle was dropped)
            _ = &mut stop_rx => {
                receiver.close();
                while let Some(invocation) = receiver.recv().await {
                    execute(&runner, invocation).await;
                    executed += 1;
                }
                break;
            }
        }
    }

    info!(executed = executed, "Script queue stopped");
    executed
}

/// Run one invocation on the blocking pool and wait for it, keeping FIFO order
async fn execute<R: ScriptRunner>(runner: &Arc<Mutex<R>>, invocation: String) {
    debug!(invocation = %invocation, "Running script invocation");

    let runner = Arc::clone(runner);
    let outcome = tokio::task::spawn_blocking(move || {
        // A panicking runner poisons the lock; keep using it for later invocations
        let mut runner = runner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let result = runner.run(&invocation);
        (invocation, result)
    })
    .await;

    match outcome {
        Ok((_, Ok(()))) => {}
        Ok((invocation, Err(e))) => {
            warn!(error = %e, invocation = %invocation, "Script invocation failed");
        }
        Err(e) => warn!(error = %e, "Script invocation panicked"),
    }
}
