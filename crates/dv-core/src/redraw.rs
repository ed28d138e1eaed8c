//! Redraw callback registry
//!
//! Views that update in place (opacity, stroke, label visibility) register a
//! zero-argument callback here. Each callback captures the shared state it
//! reads, so the registry itself knows nothing about views.

/// Handle returned by [`RedrawRegistry::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RedrawHandle(u64);

/// Trait for incremental redraw callbacks
pub trait RedrawCallback: Send + Sync {
    fn redraw(&mut self);
}

/// Helper struct for creating redraw callbacks from closures
pub struct ClosureRedraw<F> {
    callback: F,
}

impl<F> RedrawCallback for ClosureRedraw<F>
where
    F: FnMut() + Send + Sync,
{
    fn redraw(&mut self) {
        (self.callback)();
    }
}

/// Create a redraw callback from a closure
pub fn redraw_from_fn<F>(f: F) -> Box<dyn RedrawCallback>
where
    F: FnMut() + Send + Sync + 'static,
{
    Box::new(ClosureRedraw { callback: f })
}

/// Ordered list of redraw callbacks
#[derive(Default)]
pub struct RedrawRegistry {
    callbacks: Vec<(RedrawHandle, Box<dyn RedrawCallback>)>,
    next_handle: u64,
}

impl RedrawRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback; it runs after every callback registered before it
    pub fn register(&mut self, callback: Box<dyn RedrawCallback>) -> RedrawHandle {
        let handle = RedrawHandle(self.next_handle);
        self.next_handle += 1;
        self.callbacks.push((handle, callback));
        handle
    }

    pub fn unregister(&mut self, handle: RedrawHandle) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(h, _)| *h != handle);
        self.callbacks.len() != before
    }

    /// Invoke every callback in registration order
    pub fn notify_all(&mut self) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback.redraw();
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for RedrawRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedrawRegistry")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
