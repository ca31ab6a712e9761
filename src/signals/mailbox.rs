use std::collections::VecDeque;

use tracing::{debug, trace};

use super::{Handler, HandlerCell, Listener, ListenerId, Locked, RegistryLock, Signal, SyncMode};
use crate::Value;

/// Сообщение в очереди слушателя.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub signal: Signal,
    pub value: Value,
}

/// Приватная FIFO-очередь слушателя.
///
/// Каждая операция берёт блокировку очереди только на время самой операции.
pub struct Mailbox<M: SyncMode = Locked> {
    queue: M::Lock<VecDeque<Envelope>>,
}

/// Слушатель: идентификатор, очередь и обработчик.
///
/// Обработчик вызывается без удержания блокировки очереди, поэтому из
/// `on_message` можно слать сообщения, в том числе самому себе.
pub struct ListenerCore<H, M: SyncMode = Locked> {
    pub(super) id: ListenerId,
    mailbox: Mailbox<M>,
    handler: M::Cell<H>,
}

impl<M: SyncMode> Mailbox<M> {
    pub fn new() -> Self {
        Self {
            queue: RegistryLock::new(VecDeque::new()),
        }
    }

    pub fn push(
        &self,
        envelope: Envelope,
    ) {
        self.queue.write(|queue| queue.push_back(envelope));
    }

    pub fn pop(&self) -> Option<Envelope> {
        self.queue.write(VecDeque::pop_front)
    }

    pub fn len(&self) -> usize {
        self.queue.read(VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M: SyncMode> Default for Mailbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, M: SyncMode> ListenerCore<H, M> {
    pub fn new(handler: H) -> Self {
        Self {
            id: ListenerId::next(),
            mailbox: Mailbox::new(),
            handler: HandlerCell::new(handler),
        }
    }

    /// Доступ к состоянию обработчика на чтение.
    pub fn with_handler<R>(
        &self,
        f: impl FnOnce(&H) -> R,
    ) -> R {
        self.handler.with(f)
    }
}

impl<H: Handler, M: SyncMode> Listener for ListenerCore<H, M> {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn receive(
        &self,
        signal: Signal,
        value: Value,
    ) {
        trace!(listener = %self.id, signal, "enqueue");
        self.mailbox.push(Envelope { signal, value });
    }

    /// Разгребает очередь до пустой.
    ///
    /// Если обработчик занят другим вызовом `drain`, возвращает 0: сообщения
    /// достанутся активному вызову. Тот после освобождения обработчика ещё раз
    /// проверяет очередь, так что сообщение, положенное между последним `pop`
    /// и освобождением, не зависает.
    fn drain(&self) -> usize {
        let mut total = 0;
        loop {
            let processed = self.handler.try_with_mut(|handler| {
                let mut processed = 0;
                while let Some(Envelope { signal, value }) = self.mailbox.pop() {
                    handler.on_message(signal, value);
                    processed += 1;
                }
                processed
            });

            let Some(processed) = processed else {
                if total == 0 {
                    trace!(listener = %self.id, "drain skipped, handler busy");
                }
                break;
            };
            total += processed;

            if self.mailbox.is_empty() {
                break;
            }
        }

        if total > 0 {
            debug!(listener = %self.id, processed = total, "drained mailbox");
        }
        total
    }

    fn pending(&self) -> usize {
        self.mailbox.len()
    }
}
