//! Подменяемый реестр живых слушателей для интеграционных тестов.
//!
//! Делегирует настоящему `Transporter` и считает вызовы каждого метода.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use beamcast::{ListenerId, ListenerRef, Liveness, Transporter};

#[derive(Default)]
pub struct CountingLiveness {
    inner: Transporter,
    /// Фиксированный ответ `is_registered`, если задан.
    answer: Option<bool>,
    registered: AtomicUsize,
    unregistered: AtomicUsize,
    checks: AtomicUsize,
}

impl CountingLiveness {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Реестр, который на любой вопрос о жизни слушателя отвечает `answer`.
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer),
            ..Self::default()
        })
    }

    pub fn registered(&self) -> usize {
        self.registered.load(Ordering::SeqCst)
    }

    pub fn unregistered(&self) -> usize {
        self.unregistered.load(Ordering::SeqCst)
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl Liveness for CountingLiveness {
    fn register(
        &self,
        listener: ListenerRef,
    ) {
        self.registered.fetch_add(1, Ordering::SeqCst);
        self.inner.register(listener);
    }

    fn unregister(
        &self,
        id: ListenerId,
    ) {
        self.unregistered.fetch_add(1, Ordering::SeqCst);
        self.inner.unregister(id);
    }

    fn is_registered(
        &self,
        id: ListenerId,
    ) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.answer
            .unwrap_or_else(|| self.inner.is_registered(id))
    }

    fn snapshot_live(&self) -> Vec<ListenerRef> {
        self.inner.snapshot_live()
    }
}
