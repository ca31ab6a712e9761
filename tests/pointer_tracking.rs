//! Время жизни объектов, встроенных в Value.
//!
//! Каждый `TrackedPointer` учитывается в глобальном счётчике и держит
//! собственного слушателя, поэтому тесты идут последовательно.

use std::{
    any::Any,
    fmt,
    sync::{
        atomic::{AtomicIsize, Ordering},
        Arc,
    },
};

use beamcast::{ArbitraryPointer, Locked, Receiver, Value, ValueList};
use serial_test::serial;

mod mocks;
use mocks::CountingLiveness;

static LIVE_POINTERS: AtomicIsize = AtomicIsize::new(0);

fn live() -> isize {
    LIVE_POINTERS.load(Ordering::SeqCst)
}

struct TrackedPointer {
    liveness: Arc<CountingLiveness>,
    receiver: Receiver<(), Locked, Arc<CountingLiveness>>,
}

impl TrackedPointer {
    fn new(liveness: &Arc<CountingLiveness>) -> Self {
        LIVE_POINTERS.fetch_add(1, Ordering::SeqCst);
        Self {
            liveness: Arc::clone(liveness),
            receiver: Receiver::new(liveness, ()),
        }
    }
}

impl Drop for TrackedPointer {
    fn drop(&mut self) {
        LIVE_POINTERS.fetch_sub(1, Ordering::SeqCst);
    }
}

impl fmt::Debug for TrackedPointer {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("TrackedPointer")
            .field("listener", &self.receiver.id())
            .finish()
    }
}

impl ArbitraryPointer for TrackedPointer {
    fn clone_pointer(&self) -> Box<dyn ArbitraryPointer> {
        Box::new(TrackedPointer::new(&self.liveness))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Тест проверяет, что значения с заимствованными объектами их не
/// уничтожают.
#[test]
#[serial]
fn test_borrowed_pointers_survive_values() {
    let liveness = CountingLiveness::new();
    let base = live();
    let first: Arc<dyn ArbitraryPointer> = Arc::new(TrackedPointer::new(&liveness));
    let second: Arc<dyn ArbitraryPointer> = Arc::new(TrackedPointer::new(&liveness));
    {
        let v1 = Value::borrowed_pointer(Arc::clone(&first));
        let v2 = Value::borrowed_pointer(Arc::clone(&second));
        assert_ne!(v1, v2);
        assert!(!v1.is_owning());
    }
    assert_eq!(live() - base, 2);

    drop((first, second));
    assert_eq!(live(), base);
    assert_eq!(liveness.registered(), 2);
    assert_eq!(liveness.unregistered(), 2);
}

/// Тест проверяет, что два значения, заимствующие один и тот же объект,
/// равны друг другу и не уничтожают его.
#[test]
#[serial]
fn test_two_values_borrow_same_instance() {
    let liveness = CountingLiveness::new();
    let base = live();
    let first: Arc<dyn ArbitraryPointer> = Arc::new(TrackedPointer::new(&liveness));
    let second: Arc<dyn ArbitraryPointer> = Arc::new(TrackedPointer::new(&liveness));
    {
        let v1 = Value::borrowed_pointer(Arc::clone(&first));
        let v2 = Value::borrowed_pointer(Arc::clone(&first));
        assert_eq!(v1, v2);
        assert!(!v1.is_owning());
        assert!(!v2.is_owning());
        assert_eq!(live() - base, 2);
    }
    assert_eq!(live() - base, 2);
    assert_eq!(Arc::strong_count(&first), 1);

    drop((first, second));
    assert_eq!(live(), base);
}

/// Тест проверяет, что копия заимствованного объекта владеет своим клоном.
#[test]
#[serial]
fn test_copy_of_borrowed_pointer_owns_clone() {
    let liveness = CountingLiveness::new();
    let base = live();
    let shared: Arc<dyn ArbitraryPointer> = Arc::new(TrackedPointer::new(&liveness));
    let other: Arc<dyn ArbitraryPointer> = Arc::new(TrackedPointer::new(&liveness));
    {
        let original = Value::borrowed_pointer(Arc::clone(&shared));
        let copy = original.clone();
        assert_eq!(live() - base, 3);
        assert!(copy.is_owning());
        assert_ne!(copy, original);
        assert!(copy.downcast_ref::<TrackedPointer>().is_some());
    }
    assert_eq!(live() - base, 2);
    assert_eq!(liveness.registered() - liveness.unregistered(), 2);
    drop((shared, other));
}

/// Тест проверяет, что собственный объект уничтожается вместе со значением,
/// а его копия живёт отдельно.
#[test]
#[serial]
fn test_owned_pointer_and_copy() {
    let liveness = CountingLiveness::new();
    let base = live();
    let kept: Arc<dyn ArbitraryPointer> = Arc::new(TrackedPointer::new(&liveness));
    {
        let owned = Value::owned_pointer(TrackedPointer::new(&liveness));
        let copy = owned.clone();
        assert_eq!(live() - base, 3);
        assert!(owned.is_owning());
        assert!(copy.is_owning());
    }
    assert_eq!(live() - base, 1);
    drop(kept);
    assert_eq!(live(), base);
}

#[test]
#[serial]
fn test_owned_pointers_are_dropped_with_values() {
    let liveness = CountingLiveness::new();
    let base = live();
    {
        let list = ValueList::new()
            .with(Value::owned_pointer(TrackedPointer::new(&liveness)))
            .with(Value::owned_pointer(TrackedPointer::new(&liveness)));
        let value = Value::from(list);
        assert_eq!(value.as_value_list().len(), 2);
        // as_value_list копирует элементы
        assert_eq!(live() - base, 2);
    }
    assert_eq!(live(), base);
    assert_eq!(liveness.registered(), 4);
    assert_eq!(liveness.unregistered(), 4);
}
