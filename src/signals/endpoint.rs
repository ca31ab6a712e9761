use super::{
    Handler, IntoListener, ListenerCore, ListenerId, ListenerRef, Liveness, Locked, Receiver,
    Signal, Signaler, SyncMode, Transporter,
};
use crate::Value;

/// Объект, который одновременно публикует сигналы и слушает их.
///
/// Издатель и слушатель сверяются с одним и тем же реестром живых.
pub struct Endpoint<H, M: SyncMode = Locked, L: Liveness<M> = Transporter<M>> {
    signaler: Signaler<M, L>,
    receiver: Receiver<H, M, L>,
}

impl<H, M, L> Endpoint<H, M, L>
where
    H: Handler,
    M: SyncMode,
    L: Liveness<M> + Clone,
    ListenerCore<H, M>: IntoListener<M>,
{
    pub fn new(
        liveness: &L,
        handler: H,
    ) -> Self {
        Self {
            signaler: Signaler::new(liveness),
            receiver: Receiver::new(liveness, handler),
        }
    }

    pub fn listener(&self) -> ListenerRef<M> {
        self.receiver.listener()
    }
}

impl<H, M, L> Endpoint<H, M, L>
where
    H: Handler,
    M: SyncMode,
    L: Liveness<M>,
{
    pub fn id(&self) -> ListenerId {
        self.receiver.id()
    }

    pub fn signaler(&self) -> &Signaler<M, L> {
        &self.signaler
    }

    pub fn receiver(&self) -> &Receiver<H, M, L> {
        &self.receiver
    }

    pub fn connect(
        &self,
        signal: Signal,
        listener: &ListenerRef<M>,
    ) {
        self.signaler.connect(signal, listener);
    }

    pub fn notify(
        &self,
        signal: Signal,
        value: impl Into<Value>,
    ) -> usize {
        self.signaler.notify(signal, value)
    }

    pub fn drain(&self) -> usize {
        self.receiver.drain()
    }

    pub fn pending(&self) -> usize {
        self.receiver.pending()
    }

    pub fn with_handler<R>(
        &self,
        f: impl FnOnce(&H) -> R,
    ) -> R {
        self.receiver.with_handler(f)
    }
}
