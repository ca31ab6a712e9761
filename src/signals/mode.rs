//! Режим синхронизации реестров.
//!
//! Режим выбирается один раз для всей системы параметром типа:
//! - [`Locked`]: каждый реестр защищён своим `parking_lot::RwLock`, обработчик
//!   слушателя в `parking_lot::Mutex`. Типы `Send + Sync`.
//! - [`Unsynchronized`]: `RefCell` без блокировок. Типы не `Sync`, так что
//!   компилятор не даёт вынести их за пределы одного потока.
//!
//! Доступ к содержимому идёт только через замыкания, поэтому ни одна
//! блокировка не переживает операцию над реестром.

use std::{cell::RefCell, sync::Weak};

use parking_lot::{Mutex, RwLock};

use super::Listener;

/// Реестр с разделяемым чтением и эксклюзивной записью.
pub trait RegistryLock<T> {
    fn new(value: T) -> Self
    where
        Self: Sized;

    fn read<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> R;

    fn write<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> R;
}

/// Эксклюзивная ячейка для состояния обработчика.
pub trait HandlerCell<T> {
    fn new(value: T) -> Self
    where
        Self: Sized;

    /// Выполняет `f`, если ячейка свободна; `None`, если она уже занята
    /// (повторный вход или параллельный `drain`).
    fn try_with_mut<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R>;

    /// Чтение состояния. Нельзя вызывать из `on_message` того же слушателя.
    fn with<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> R;
}

/// Стратегия синхронизации.
pub trait SyncMode: Sized + 'static {
    type Lock<T>: RegistryLock<T>;
    type Cell<T>: HandlerCell<T>;
    /// Стёртый тип слушателя, который хранят реестры.
    type DynListener: ?Sized + Listener;
}

/// Каждый реестр под собственным reader/writer lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct Locked;

/// Без блокировок, только один поток.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsynchronized;

impl SyncMode for Locked {
    type Lock<T> = RwLock<T>;
    type Cell<T> = Mutex<T>;
    type DynListener = dyn Listener + Send + Sync;
}

impl SyncMode for Unsynchronized {
    type Lock<T> = RefCell<T>;
    type Cell<T> = RefCell<T>;
    type DynListener = dyn Listener;
}

/// Превращает конкретного слушателя в стёртый тип режима `M`.
pub trait IntoListener<M: SyncMode> {
    fn into_listener(this: Weak<Self>) -> Weak<M::DynListener>;
}

impl<L: Listener + Send + Sync + 'static> IntoListener<Locked> for L {
    fn into_listener(this: Weak<Self>) -> Weak<dyn Listener + Send + Sync> {
        this
    }
}

impl<L: Listener + 'static> IntoListener<Unsynchronized> for L {
    fn into_listener(this: Weak<Self>) -> Weak<dyn Listener> {
        this
    }
}

////////////////////////////////////////////////////////////////////////////////
// Locked
////////////////////////////////////////////////////////////////////////////////

impl<T> RegistryLock<T> for RwLock<T> {
    fn new(value: T) -> Self {
        RwLock::new(value)
    }

    fn read<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> R {
        f(&RwLock::read(self))
    }

    fn write<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        f(&mut RwLock::write(self))
    }
}

impl<T> HandlerCell<T> for Mutex<T> {
    fn new(value: T) -> Self {
        Mutex::new(value)
    }

    fn try_with_mut<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        self.try_lock().map(|mut guard| f(&mut guard))
    }

    fn with<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> R {
        f(&self.lock())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Unsynchronized
////////////////////////////////////////////////////////////////////////////////

impl<T> RegistryLock<T> for RefCell<T> {
    fn new(value: T) -> Self {
        RefCell::new(value)
    }

    fn read<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> R {
        f(&self.borrow())
    }

    fn write<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        f(&mut self.borrow_mut())
    }
}

impl<T> HandlerCell<T> for RefCell<T> {
    fn new(value: T) -> Self {
        RefCell::new(value)
    }

    fn try_with_mut<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        self.try_borrow_mut().ok().map(|mut cell| f(&mut cell))
    }

    fn with<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> R {
        f(&self.borrow())
    }
}
