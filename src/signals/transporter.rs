use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use tracing::{debug, trace};

use super::{
    signaler::InterestTable, Listener, ListenerId, ListenerRef, Liveness, Locked, RegistryLock, Signaler, SyncMode,
    Unsynchronized,
};

/// Реестр живых слушателей.
///
/// Клон `Transporter` указывает на тот же реестр. Слушатели попадают сюда
/// при создании [`Receiver`](super::Receiver) и удаляются при его
/// уничтожении; издатели сверяются с реестром перед каждой доставкой.
///
/// Реестр сам является издателем: [`Transporter::signaler`] выдаёт ручки на
/// одну общую таблицу интересов.
pub struct Transporter<M: SyncMode = Locked> {
    inner: Arc<Registry<M>>,
}

struct Registry<M: SyncMode> {
    listeners: M::Lock<HashMap<ListenerId, ListenerRef<M>>>,
    interests: Arc<InterestTable<M>>,
}

impl Transporter<Locked> {
    /// Реестр с блокировками, пригодный для нескольких потоков.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transporter<Unsynchronized> {
    /// Реестр без блокировок для работы в одном потоке.
    pub fn unsynchronized() -> Self {
        Self::default()
    }
}

impl<M: SyncMode> Transporter<M> {
    /// Разгребает очереди всех зарегистрированных слушателей.
    ///
    /// Работает по снимку реестра: слушатели, созданные обработчиками во
    /// время обхода, ждут следующего тика, а уничтоженные по ходу
    /// пропускаются. Возвращает общее число обработанных сообщений.
    pub fn tick_all(&self) -> usize {
        let snapshot = self.snapshot_live();
        let mut processed = 0;

        for listener in &snapshot {
            if !self.is_registered(listener.id()) {
                trace!(listener = %listener.id(), "skipped, unregistered during tick");
                continue;
            }
            if let Some(target) = listener.upgrade() {
                processed += target.drain();
            }
        }

        if processed > 0 {
            debug!(processed, listeners = snapshot.len(), "tick finished");
        }
        processed
    }

    /// Издатель самого реестра. Все ручки, выданные одним реестром (и его
    /// клонами), работают с одной таблицей интересов.
    pub fn signaler(&self) -> Signaler<M, Self> {
        Signaler::with_interests(self, Arc::clone(&self.inner.interests))
    }

    /// Количество зарегистрированных слушателей.
    pub fn len(&self) -> usize {
        self.inner.listeners.read(HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M: SyncMode> Liveness<M> for Transporter<M> {
    fn register(
        &self,
        listener: ListenerRef<M>,
    ) {
        if listener.is_null() {
            return;
        }
        self.inner.listeners.write(|listeners| {
            listeners.insert(listener.id(), listener);
        });
    }

    fn unregister(
        &self,
        id: ListenerId,
    ) {
        self.inner.listeners.write(|listeners| {
            listeners.remove(&id);
        });
    }

    fn is_registered(
        &self,
        id: ListenerId,
    ) -> bool {
        self.inner
            .listeners
            .read(|listeners| listeners.contains_key(&id))
    }

    fn snapshot_live(&self) -> Vec<ListenerRef<M>> {
        self.inner
            .listeners
            .read(|listeners| listeners.values().cloned().collect())
    }
}

impl<M: SyncMode> Default for Transporter<M> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Registry {
                listeners: RegistryLock::new(HashMap::new()),
                interests: Arc::new(RegistryLock::new(BTreeMap::new())),
            }),
        }
    }
}

impl<M: SyncMode> Clone for Transporter<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: SyncMode> fmt::Debug for Transporter<M> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Transporter")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        signals::{Handler, Receiver, Signal},
        Value,
    };

    #[derive(Default)]
    struct Count(usize);

    impl Handler for Count {
        fn on_message(
            &mut self,
            _signal: Signal,
            _value: Value,
        ) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_clone_shares_registry() {
        let transporter = Transporter::new();
        let other = transporter.clone();
        let _receiver = Receiver::new(&transporter, ());
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_tick_all_drains_every_listener() {
        let transporter = Transporter::new();
        let r1 = Receiver::new(&transporter, Count::default());
        let r2 = Receiver::new(&transporter, Count::default());

        r1.receive(1, 1);
        r1.receive(1, 2);
        r2.receive(2, 3);

        assert_eq!(transporter.tick_all(), 3);
        assert_eq!(r1.with_handler(|h| h.0), 2);
        assert_eq!(r2.with_handler(|h| h.0), 1);
        assert_eq!(transporter.tick_all(), 0);
    }

    /// Тест проверяет, что ручки издателя одного реестра делят таблицу
    /// интересов: подключение через одну видно и доставляется через другую.
    #[test]
    fn test_signaler_handles_share_interests() {
        let transporter = Transporter::new();
        let receiver = Receiver::new(&transporter, Count::default());

        transporter.signaler().connect(1, &receiver.listener());
        assert_eq!(transporter.signaler().active_interests().len(), 1);
        assert_eq!(transporter.clone().signaler().notify(1, 5), 1);

        assert_eq!(transporter.tick_all(), 1);
        assert_eq!(receiver.with_handler(|h| h.0), 1);

        transporter.signaler().disconnect_all();
        assert!(transporter.signaler().active_interests().is_empty());
    }

    #[test]
    fn test_null_ref_is_not_registered() {
        let transporter = Transporter::new();
        transporter.register(ListenerRef::null());
        assert!(transporter.is_empty());
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let transporter = Transporter::new();
        let receiver = Receiver::new(&transporter, ());
        let snapshot = transporter.snapshot_live();
        drop(receiver);

        assert_eq!(snapshot.len(), 1);
        assert!(transporter.snapshot_live().is_empty());
        assert!(!snapshot[0].is_alive());
    }
}
