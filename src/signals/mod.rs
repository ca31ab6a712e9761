//! Типизированная in-process рассылка сигналов.
//!
//! Издатель ([`Signaler`]) хранит таблицу интересов `signal -> listeners`.
//! Каждый слушатель ([`Receiver`]) владеет приватной FIFO-очередью и
//! обработчиком [`Handler`], который вызывается при `drain`. Реестр живых
//! слушателей ([`Transporter`]) сверяется перед каждой доставкой и умеет
//! разгрести очереди всех зарегистрированных слушателей за один `tick_all`.
//!
//! Режим синхронизации задаётся параметром типа ([`Locked`] или
//! [`Unsynchronized`]) и одинаков для всех объектов одной системы.

mod endpoint;
mod mailbox;
mod mode;
mod receiver;
mod signaler;
mod transporter;

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Weak,
    },
};

pub use endpoint::Endpoint;
pub use mailbox::{Envelope, ListenerCore, Mailbox};
pub use mode::{HandlerCell, IntoListener, Locked, RegistryLock, SyncMode, Unsynchronized};
pub use receiver::Receiver;
pub use signaler::Signaler;
pub use transporter::Transporter;

use crate::Value;

/// Непрозрачный числовой идентификатор сигнала.
pub type Signal = u32;

/// Уникальный идентификатор слушателя в пределах процесса.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Объект, способный принимать сообщения в свою очередь и разгребать её.
///
/// Реестры хранят слушателей только как `Weak`, поэтому уничтоженный
/// слушатель никогда не получит вызов.
pub trait Listener {
    fn id(&self) -> ListenerId;

    /// Кладёт `(signal, value)` в хвост очереди. Всегда успешно.
    fn receive(
        &self,
        signal: Signal,
        value: Value,
    );

    /// Разгребает очередь до пустой и возвращает число обработанных
    /// сообщений.
    fn drain(&self) -> usize;

    /// Количество сообщений, ожидающих обработки.
    fn pending(&self) -> usize;
}

/// Пользовательский обработчик сообщений слушателя.
pub trait Handler {
    /// Вызывается по одному разу на каждое сообщение из очереди, в порядке
    /// поступления. По умолчанию ничего не делает.
    fn on_message(
        &mut self,
        _signal: Signal,
        _value: Value,
    ) {
    }
}

impl Handler for () {}

/// Слабая ссылка на слушателя, под которой его знают издатели и реестр
/// живых слушателей.
///
/// Нулевая ссылка ([`ListenerRef::null`]) никуда не указывает; `connect`
/// молча её игнорирует.
pub struct ListenerRef<M: SyncMode = Locked> {
    id: ListenerId,
    target: Option<Weak<M::DynListener>>,
}

/// Реестр живых слушателей.
///
/// Через этот интерфейс и издатель, и слушатель узнают, жив ли адресат.
/// В тестах его можно подменить собственной реализацией.
pub trait Liveness<M: SyncMode = Locked> {
    fn register(
        &self,
        listener: ListenerRef<M>,
    );

    fn unregister(
        &self,
        id: ListenerId,
    );

    fn is_registered(
        &self,
        id: ListenerId,
    ) -> bool;

    /// Копия текущего набора зарегистрированных слушателей.
    fn snapshot_live(&self) -> Vec<ListenerRef<M>>;
}

impl ListenerId {
    pub const NULL: ListenerId = ListenerId(0);

    /// Выдаёт следующий идентификатор. Нуль зарезервирован за
    /// [`ListenerId::NULL`].
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<M: SyncMode> ListenerRef<M> {
    /// Ссылка на слушателя, живущего в `Arc`.
    pub fn new<T>(listener: &Arc<T>) -> Self
    where
        T: Listener + IntoListener<M>,
    {
        Self {
            id: listener.id(),
            target: Some(<T as IntoListener<M>>::into_listener(Arc::downgrade(
                listener,
            ))),
        }
    }

    pub fn null() -> Self {
        Self {
            id: ListenerId::NULL,
            target: None,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn is_null(&self) -> bool {
        self.target.is_none()
    }

    /// `true`, пока объект слушателя не уничтожен.
    pub fn is_alive(&self) -> bool {
        self.target.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Сильная ссылка на слушателя, если он ещё жив.
    pub fn upgrade(&self) -> Option<Arc<M::DynListener>> {
        self.target.as_ref().and_then(Weak::upgrade)
    }
}

impl<M: SyncMode> Clone for ListenerRef<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            target: self.target.clone(),
        }
    }
}

impl<M: SyncMode> fmt::Debug for ListenerRef<M> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ListenerRef")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<M: SyncMode> PartialEq for ListenerRef<M> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.id == other.id
    }
}

impl<M: SyncMode> Eq for ListenerRef<M> {}

impl<M: SyncMode, T: Liveness<M> + ?Sized> Liveness<M> for Arc<T> {
    fn register(
        &self,
        listener: ListenerRef<M>,
    ) {
        (**self).register(listener)
    }

    fn unregister(
        &self,
        id: ListenerId,
    ) {
        (**self).unregister(id)
    }

    fn is_registered(
        &self,
        id: ListenerId,
    ) -> bool {
        (**self).is_registered(id)
    }

    fn snapshot_live(&self) -> Vec<ListenerRef<M>> {
        (**self).snapshot_live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_ids_are_unique_and_non_null() {
        let a = ListenerId::next();
        let b = ListenerId::next();
        assert_ne!(a, b);
        assert!(!a.is_null());
        assert!(ListenerId::NULL.is_null());
    }

    #[test]
    fn test_null_ref_is_dead() {
        let null: ListenerRef = ListenerRef::null();
        assert!(null.is_null());
        assert!(!null.is_alive());
        assert!(null.upgrade().is_none());
        assert_eq!(null.id(), ListenerId::NULL);
    }

    #[test]
    fn test_ref_dies_with_listener() {
        let core: Arc<ListenerCore<()>> = Arc::new(ListenerCore::new(()));
        let listener = ListenerRef::<Locked>::new(&core);
        assert!(listener.is_alive());
        assert_eq!(listener.id(), core.id());

        drop(core);
        assert!(!listener.is_alive());
        assert!(listener.upgrade().is_none());
    }
}
