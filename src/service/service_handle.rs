use futures::future::select_all;
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use anyhow::Result;
use tracing::{error, info};

/// Holds running service tasks and the shutdown channel they observe.
pub struct ServiceHandle {
    shutdown_tx: watch::Sender<bool>,
    join_handles: Vec<JoinHandle<anyhow::Result<()>>>,
}

impl ServiceHandle {
    /// Create a new ServiceHandle together with a receiver for the first task.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        let handle = ServiceHandle { shutdown_tx: tx, join_handles: vec![] };
        (handle, rx)
    }

    /// Spawn a service task onto the runtime and track it.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.join_handles.push(tokio::spawn(task));
    }

    /// Return a receiver for additional tasks.
    pub fn shutdown_rx(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Block until SIGINT/SIGTERM or until any task exits, then shut down.
    pub async fn run_until_shutdown(mut self) -> Result<()> {
        if self.join_handles.is_empty() {
            return Ok(());
        }

        enum Exit {
            Signal,
            TaskDone(Vec<JoinHandle<anyhow::Result<()>>>),
        }

        let mut pending = select_all(std::mem::take(&mut self.join_handles));
        let exit = tokio::select! {
            _ = shutdown_signal() => Exit::Signal,
            (res, _, rest) = &mut pending => {
                log_task_result(res);
                Exit::TaskDone(rest)
            }
        };

        self.join_handles = match exit {
            Exit::Signal => {
                info!("termination signal received");
                pending.into_inner()
            }
            Exit::TaskDone(rest) => rest,
        };
        self.shutdown().await
    }

    /// Signal shutdown to all tasks and await them sequentially.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        for h in self.join_handles {
            log_task_result(h.await);
        }
        Ok(())
    }
}

fn log_task_result(res: std::result::Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match res {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("service task returned error: {:?}", e),
        Err(e) => error!("task join error: {:?}", e),
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
