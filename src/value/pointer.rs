use std::{any::Any, fmt, sync::Arc};

/// Capability an externally defined type implements to be embedded in a
/// [`Value`](super::Value).
///
/// `clone_pointer` must return an independent instance: copies of a value
/// own their clone and drop it on their own schedule, whatever the
/// ownership of the original.
pub trait ArbitraryPointer: Any + fmt::Debug + Send + Sync {
    /// Produces an independent copy of this object.
    fn clone_pointer(&self) -> Box<dyn ArbitraryPointer>;

    /// Upcast used for downcasting back to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// An embedded object together with its ownership.
///
/// `Owned` instances are dropped with the value holding them. `Borrowed`
/// instances stay alive as long as the caller keeps its own `Arc`.
#[derive(Debug)]
pub enum Pointer {
    Owned(Box<dyn ArbitraryPointer>),
    Borrowed(Arc<dyn ArbitraryPointer>),
}

impl Pointer {
    /// Returns the embedded object.
    pub fn get(&self) -> &dyn ArbitraryPointer {
        match self {
            Pointer::Owned(boxed) => boxed.as_ref(),
            Pointer::Borrowed(shared) => shared.as_ref(),
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Pointer::Owned(_))
    }

    /// Address of the embedded instance, used for identity comparison.
    ///
    /// Zero-sized implementors may share an address.
    pub fn addr(&self) -> usize {
        (self.get() as *const dyn ArbitraryPointer).cast::<()>() as usize
    }

    /// Returns the embedded object as `T` if it is one.
    pub fn downcast_ref<T: ArbitraryPointer>(&self) -> Option<&T> {
        self.get().as_any().downcast_ref::<T>()
    }
}

impl Clone for Pointer {
    /// Always clones the embedded instance; the copy owns its clone.
    fn clone(&self) -> Self {
        Pointer::Owned(self.get().clone_pointer())
    }
}
