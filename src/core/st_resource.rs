use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded, reference-counted handle with interior mutability.
///
/// Every clone points at the same value. The editor runs on one thread, so the
/// handle is built on `Rc<RefCell<T>>` and never crosses a thread boundary.
///
/// # Examples
///
/// ```ignore
/// let panel = StResource::new(PanelState::default());
/// let seen_by_renderer = panel.clone();
///
/// panel.get_mut().material_view = true;
/// assert!(seen_by_renderer.get().material_view);
/// ```
///
/// # Panics
/// - [`StResource::get`] panics while a mutable borrow is alive
/// - [`StResource::get_mut`] panics while any borrow is alive
pub struct StResource<T> {
    resource: Rc<RefCell<T>>,
}

impl<T> StResource<T> {
    /// Wraps `resource` in a new shared handle.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RefCell::new(resource)),
        }
    }

    /// Borrows the value immutably.
    pub fn get(&self) -> Ref<'_, T> {
        self.resource.borrow()
    }

    /// Borrows the value mutably.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.resource.borrow_mut()
    }
}

impl<T: Default> Default for StResource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
