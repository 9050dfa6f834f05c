use crate::core::errors::{Result, SimError};
use indexmap::IndexMap;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Shared mutable numeric buffer published through the resource exchange.
///
/// A publisher keeps one clone and mutates the buffer in place each step;
/// subscribers keep their own clones and see every write without further
/// exchange traffic. Scalars travel as length-1 buffers. Borrows are
/// runtime-checked, which is sufficient because the kernel is single-threaded
/// and no borrow is held across a lifecycle call.
#[derive(Debug, Clone)]
pub struct ResourceHandle {
    inner: Rc<RefCell<Vec<f64>>>,
}

impl ResourceHandle {
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    pub fn scalar(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Zero-filled buffer of the given length.
    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn read(&self) -> Ref<'_, Vec<f64>> {
        self.inner.borrow()
    }

    pub fn write(&self) -> RefMut<'_, Vec<f64>> {
        self.inner.borrow_mut()
    }

    /// Copy of the current contents, for consumers that need a detached row.
    pub fn snapshot(&self) -> Vec<f64> {
        self.inner.borrow().clone()
    }
}

/// Startup-time publish/subscribe wiring between modules.
///
/// Keys are namespaced `"<PublisherKind>:<field>"`. Each key is published by
/// exactly one module; publishing a key twice is a fatal wiring error.
/// Iteration order is publication order, so subscription passes are
/// deterministic.
#[derive(Default)]
pub struct ResourceExchange {
    resources: IndexMap<String, ResourceHandle>,
}

impl ResourceExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key → handle pair. Fails fast on a duplicate key.
    pub fn publish(&mut self, key: &str, handle: ResourceHandle) -> Result<()> {
        if self.resources.contains_key(key) {
            return Err(SimError::DuplicateResource(key.to_string()));
        }
        self.resources.insert(key.to_string(), handle);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ResourceHandle> {
        self.resources.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.resources.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// All published pairs, in publication order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceHandle)> + '_ {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }
}
