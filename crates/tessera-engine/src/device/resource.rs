/// GPU object with an explicit release step.
pub trait Release {
    fn release(self);
}

impl Release for wgpu::Buffer {
    fn release(self) {
        self.destroy();
    }
}

impl Release for wgpu::RenderPipeline {
    fn release(self) {
        drop(self);
    }
}

/// Scoped owner of a GPU object.
///
/// The object is released exactly once: by the first call to [`Owned::release`]
/// or, failing that, on drop. This covers early returns during initialization
/// as well as normal teardown.
pub struct Owned<T: Release> {
    label: &'static str,
    inner: Option<T>,
}

impl<T: Release> Owned<T> {
    pub fn new(label: &'static str, value: T) -> Self {
        Self {
            label,
            inner: Some(value),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Borrows the object; `None` once released.
    pub fn get(&self) -> Option<&T> {
        self.inner.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.inner.is_some()
    }

    /// Releases the object. Returns `false` if it was already released.
    pub fn release(&mut self) -> bool {
        match self.inner.take() {
            Some(value) => {
                log::debug!("releasing {}", self.label);
                value.release();
                true
            }
            None => false,
        }
    }
}

impl<T: Release> Drop for Owned<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Release> std::fmt::Debug for Owned<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Owned")
            .field("label", &self.label)
            .field("live", &self.is_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct Counted(Rc<Cell<u32>>);

    impl Release for Counted {
        fn release(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn release_runs_once() {
        let count = Rc::new(Cell::new(0));
        let mut owned = Owned::new("counted", Counted(count.clone()));

        assert!(owned.release());
        assert!(!owned.release());
        assert!(!owned.is_live());
        drop(owned);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn drop_releases_unreleased_object() {
        let count = Rc::new(Cell::new(0));
        {
            let _owned = Owned::new("counted", Counted(count.clone()));
        }
        assert_eq!(count.get(), 1);
    }
}
