use std::sync::Arc;

use tracing::debug;

use super::{
    Handler, IntoListener, Listener, ListenerCore, ListenerId, ListenerRef, Liveness, Locked,
    Signal, SyncMode, Transporter,
};
use crate::Value;

/// Слушатель с собственной очередью и обработчиком `H`.
///
/// При создании с реестром живых слушателей регистрируется в нём, при
/// уничтожении снимается с регистрации (ровно один раз). Созданный через
/// [`Receiver::detached`] слушатель не зарегистрирован нигде и издатели до
/// него не доставляют, но `receive`/`drain` работают.
pub struct Receiver<H, M: SyncMode = Locked, L: Liveness<M> = Transporter<M>> {
    core: Arc<ListenerCore<H, M>>,
    liveness: Option<L>,
}

impl<H, M, L> Receiver<H, M, L>
where
    H: Handler,
    M: SyncMode,
    L: Liveness<M>,
    ListenerCore<H, M>: IntoListener<M>,
{
    /// Создаёт слушателя и регистрирует его в `liveness`.
    pub fn new(
        liveness: &L,
        handler: H,
    ) -> Self
    where
        L: Clone,
    {
        let receiver = Self {
            core: Arc::new(ListenerCore::new(handler)),
            liveness: Some(liveness.clone()),
        };
        liveness.register(receiver.listener());
        debug!(listener = %receiver.id(), "listener registered");
        receiver
    }

    /// Слушатель без реестра живых слушателей.
    pub fn detached(handler: H) -> Self {
        Self {
            core: Arc::new(ListenerCore::new(handler)),
            liveness: None,
        }
    }

    /// Ссылка, под которой слушателя подключают к издателям.
    pub fn listener(&self) -> ListenerRef<M> {
        ListenerRef::new(&self.core)
    }
}

impl<H, M, L> Receiver<H, M, L>
where
    H: Handler,
    M: SyncMode,
    L: Liveness<M>,
{
    pub fn id(&self) -> ListenerId {
        self.core.id()
    }

    /// Кладёт сообщение напрямую в очередь, минуя издателя.
    pub fn receive(
        &self,
        signal: Signal,
        value: impl Into<Value>,
    ) {
        self.core.receive(signal, value.into());
    }

    /// Вызывает `on_message` для каждого сообщения в очереди, пока она не
    /// опустеет. Возвращает число обработанных сообщений.
    pub fn drain(&self) -> usize {
        self.core.drain()
    }

    pub fn pending(&self) -> usize {
        self.core.pending()
    }

    /// Доступ к состоянию обработчика.
    ///
    /// Нельзя вызывать из `on_message` этого же слушателя.
    pub fn with_handler<R>(
        &self,
        f: impl FnOnce(&H) -> R,
    ) -> R {
        self.core.with_handler(f)
    }

    /// `true`, если слушатель сейчас числится в реестре живых.
    pub fn is_registered(&self) -> bool {
        self.liveness
            .as_ref()
            .is_some_and(|liveness| liveness.is_registered(self.id()))
    }
}

impl<H, M: SyncMode, L: Liveness<M>> Drop for Receiver<H, M, L> {
    fn drop(&mut self) {
        if let Some(liveness) = self.liveness.take() {
            liveness.unregister(self.core.id);
            debug!(listener = %self.core.id, "listener unregistered");
        }
    }
}
