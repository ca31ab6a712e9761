//! Рабочий поток, многократно выполняющий тело цикла.
//!
//! Основное применение: периодический [`Transporter::tick_all`] на отдельном
//! потоке ([`Worker::ticking`]).

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::{settings::DEFAULT_WORKER_NAME, Settings},
    error::{WorkerError, WorkerResult},
    signals::{Locked, Transporter},
};

type Body = Box<dyn FnMut() + Send>;

/// Поток, вызывающий тело цикла, пока его не попросят остановиться.
///
/// Не запущенный поток считается завершённым. Повторный `start` без
/// остановки возвращает [`WorkerError::AlreadyRunning`]; `start` после
/// `stop(false)` дожидается предыдущего потока и запускает новый.
/// При уничтожении выполняется `stop(true)`.
pub struct Worker {
    name: String,
    body: Arc<Mutex<Body>>,
    state: Arc<WorkerState>,
    handle: Option<JoinHandle<()>>,
}

struct WorkerState {
    stopping: AtomicBool,
    finished: AtomicBool,
}

/// Отмечает поток завершённым, в том числе при панике тела.
struct FinishGuard(Arc<WorkerState>);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.0.finished.store(true, Ordering::Release);
    }
}

impl Worker {
    pub fn new(body: impl FnMut() + Send + 'static) -> Self {
        Self {
            name: DEFAULT_WORKER_NAME.to_string(),
            body: Arc::new(Mutex::new(Box::new(body))),
            state: Arc::new(WorkerState {
                stopping: AtomicBool::new(true),
                finished: AtomicBool::new(true),
            }),
            handle: None,
        }
    }

    /// Имя потока ОС.
    pub fn with_name(
        mut self,
        name: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self
    }

    /// Поток, который вызывает `transporter.tick_all()` и спит `interval`.
    pub fn ticking(
        transporter: Transporter<Locked>,
        interval: Duration,
    ) -> Self {
        Self::new(move || {
            transporter.tick_all();
            thread::sleep(interval);
        })
    }

    pub fn from_settings(
        transporter: Transporter<Locked>,
        settings: &Settings,
    ) -> Self {
        Self::ticking(transporter, settings.tick_interval())
            .with_name(settings.worker_name.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&mut self) -> WorkerResult<()> {
        if self.handle.is_some() {
            if !self.is_finished() && !self.is_stopping() {
                warn!(worker = %self.name, "start rejected, worker is already running");
                return Err(WorkerError::AlreadyRunning(self.name.clone()));
            }
            self.stop(true);
        }

        self.state.finished.store(false, Ordering::Release);
        self.state.stopping.store(false, Ordering::Release);

        let body = Arc::clone(&self.body);
        let state = Arc::clone(&self.state);
        let spawned = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || {
                let _guard = FinishGuard(Arc::clone(&state));
                let mut body = body.lock();
                while !state.stopping.load(Ordering::Acquire) {
                    (*body)();
                }
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                info!(worker = %self.name, "worker started");
                Ok(())
            }
            Err(err) => {
                self.state.stopping.store(true, Ordering::Release);
                self.state.finished.store(true, Ordering::Release);
                Err(WorkerError::Spawn(err))
            }
        }
    }

    /// Просит поток остановиться после текущей итерации. С `blocking`
    /// дожидается его завершения.
    pub fn stop(
        &mut self,
        blocking: bool,
    ) {
        if !self.state.stopping.swap(true, Ordering::AcqRel) {
            debug!(worker = %self.name, blocking, "worker stop requested");
        }
        if blocking {
            self.join();
        }
    }

    /// Дожидается завершения потока, если он был запущен.
    pub fn join(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.join().is_err() {
            warn!(worker = %self.name, "worker body panicked");
        }
        self.state.finished.store(true, Ordering::Release);
        info!(worker = %self.name, "worker stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_none() || self.state.finished.load(Ordering::Acquire)
    }

    pub fn is_stopping(&self) -> bool {
        self.state.stopping.load(Ordering::Acquire)
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop(true);
    }
}

impl fmt::Debug for Worker {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("stopping", &self.is_stopping())
            .field("finished", &self.is_finished())
            .finish()
    }
}
