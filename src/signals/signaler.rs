use std::{collections::BTreeMap, sync::Arc};

use tracing::{debug, trace};

use super::{Listener, ListenerRef, Liveness, Locked, RegistryLock, Signal, SyncMode, Transporter};
use crate::Value;

/// Издатель: таблица интересов `signal -> listeners`.
///
/// Повторное подключение того же слушателя к тому же сигналу сохраняется
/// отдельной записью и приводит к повторной доставке.
pub struct Signaler<M: SyncMode = Locked, L = Transporter<M>> {
    liveness: Option<L>,
    interests: Arc<InterestTable<M>>,
}

/// Таблица интересов, которую могут делить несколько издателей.
pub(super) type InterestTable<M> =
    <M as SyncMode>::Lock<BTreeMap<Signal, Vec<ListenerRef<M>>>>;

impl<M: SyncMode, L: Liveness<M>> Signaler<M, L> {
    /// Издатель, доставляющий только слушателям, живым в `liveness`.
    pub fn new(liveness: &L) -> Self
    where
        L: Clone,
    {
        Self::with_interests(liveness, Arc::new(RegistryLock::new(BTreeMap::new())))
    }

    /// Издатель поверх существующей таблицы интересов.
    pub(super) fn with_interests(
        liveness: &L,
        interests: Arc<InterestTable<M>>,
    ) -> Self
    where
        L: Clone,
    {
        Self {
            liveness: Some(liveness.clone()),
            interests,
        }
    }

    /// Издатель без реестра живых слушателей.
    ///
    /// Проверить, жив ли адресат, он не может, поэтому `notify` ничего не
    /// доставляет. Таблица интересов при этом ведётся как обычно.
    pub fn detached() -> Self {
        Self {
            liveness: None,
            interests: Arc::new(RegistryLock::new(BTreeMap::new())),
        }
    }

    /// Подключает `listener` к `signal`. Нулевая ссылка игнорируется.
    pub fn connect(
        &self,
        signal: Signal,
        listener: &ListenerRef<M>,
    ) {
        if listener.is_null() {
            trace!(signal, "connect ignored, null listener");
            return;
        }

        self.interests.write(|interests| {
            let entries = interests.entry(signal).or_default();
            entries.retain(ListenerRef::is_alive);
            entries.push(listener.clone());
        });
        debug!(signal, listener = %listener.id(), "connected");
    }

    /// Удаляет все записи сигнала, кому бы они ни принадлежали.
    pub fn disconnect_signal(
        &self,
        signal: Signal,
    ) -> usize {
        let removed = self
            .interests
            .write(|interests| interests.remove(&signal).map_or(0, |entries| entries.len()));
        debug!(signal, removed, "signal disconnected");
        removed
    }

    /// Удаляет все записи слушателя по всем сигналам.
    pub fn disconnect_listener(
        &self,
        listener: &ListenerRef<M>,
    ) -> usize {
        let removed = self.interests.write(|interests| {
            let mut removed = 0;
            interests.retain(|_, entries| {
                let before = entries.len();
                entries.retain(|entry| entry != listener);
                removed += before - entries.len();
                !entries.is_empty()
            });
            removed
        });
        debug!(listener = %listener.id(), removed, "listener disconnected");
        removed
    }

    /// Удаляет только записи, совпадающие и по сигналу, и по слушателю.
    pub fn disconnect(
        &self,
        signal: Signal,
        listener: &ListenerRef<M>,
    ) -> usize {
        let removed = self.interests.write(|interests| {
            let Some(entries) = interests.get_mut(&signal) else {
                return 0;
            };
            let before = entries.len();
            entries.retain(|entry| entry != listener);
            let removed = before - entries.len();
            if entries.is_empty() {
                interests.remove(&signal);
            }
            removed
        });
        debug!(signal, listener = %listener.id(), removed, "disconnected");
        removed
    }

    pub fn disconnect_all(&self) {
        self.interests.write(BTreeMap::clear);
        debug!("all interests disconnected");
    }

    /// Снимок текущих записей `(signal, listener)` в порядке сигналов.
    ///
    /// Уничтоженные слушатели в снимок не попадают.
    pub fn active_interests(&self) -> Vec<(Signal, ListenerRef<M>)> {
        let entries: Vec<(Signal, ListenerRef<M>)> = self.interests.read(|interests| {
            interests
                .iter()
                .flat_map(|(signal, entries)| {
                    entries.iter().map(move |entry| (*signal, entry.clone()))
                })
                .collect()
        });

        entries
            .into_iter()
            .filter(|(_, entry)| {
                entry.is_alive()
                    && self
                        .liveness
                        .as_ref()
                        .is_none_or(|liveness| liveness.is_registered(entry.id()))
            })
            .collect()
    }

    /// Кладёт копию `value` в очередь каждого живого слушателя, подключённого
    /// к `signal`. Возвращает число доставок.
    ///
    /// Проверка жизни и постановка в очередь выполняются под разными
    /// блокировками; слушатель, уничтожаемый ровно между ними, может
    /// получить сообщение, которое уже никто не обработает.
    pub fn notify(
        &self,
        signal: Signal,
        value: impl Into<Value>,
    ) -> usize {
        let value = value.into();
        let targets: Vec<ListenerRef<M>> = self
            .interests
            .read(|interests| interests.get(&signal).cloned().unwrap_or_default());

        let mut delivered = 0;
        for target in &targets {
            if !self.is_live(target) {
                trace!(signal, listener = %target.id(), "skipped, listener not live");
                continue;
            }
            if let Some(listener) = target.upgrade() {
                listener.receive(signal, value.clone());
                delivered += 1;
            }
        }
        delivered
    }

    fn is_live(
        &self,
        listener: &ListenerRef<M>,
    ) -> bool {
        self.liveness
            .as_ref()
            .is_some_and(|liveness| liveness.is_registered(listener.id()))
    }
}
