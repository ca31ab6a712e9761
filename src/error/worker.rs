use std::io;

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Ошибки управления рабочим потоком.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Повторный запуск без предварительной остановки.
    #[error("worker '{0}' is already running")]
    AlreadyRunning(String),

    /// ОС не смогла создать поток.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}
