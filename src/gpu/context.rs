//! Host window/context seam.
//!
//! The scene never owns a window. The host implements [`HostContext`] and
//! the scene brackets every block of GL work in a [`ContextGuard`], which
//! makes the context current on creation and releases it when dropped, on
//! every exit path including `?` returns.

/// Operations the host windowing backend provides for its GL context.
pub trait HostContext {
    /// Make the GL context current on this thread.
    fn make_current(&self);

    /// Release the GL context from this thread.
    fn release(&self);

    /// Present the back buffer.
    fn swap_buffers(&self);

    /// Set the buffer swap interval (0 = immediate, 1 = vsync).
    fn set_swap_interval(&self, interval: i32) {
        let _ = interval;
    }
}

/// Scoped context acquisition.
#[must_use = "the context is released as soon as the guard is dropped"]
pub struct ContextGuard<'a> {
    host: &'a dyn HostContext,
}

impl<'a> ContextGuard<'a> {
    /// Make `host`'s context current until the guard is dropped.
    pub fn acquire(host: &'a dyn HostContext) -> Self {
        host.make_current();
        Self { host }
    }

    /// Present the back buffer while the context is held.
    pub fn swap_buffers(&self) {
        self.host.swap_buffers();
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.host.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::headless::HeadlessHost;

    fn failing_work(host: &HeadlessHost) -> Result<(), String> {
        let _guard = ContextGuard::acquire(host);
        Err("shader failed".to_owned())?;
        Ok(())
    }

    #[test]
    fn guard_releases_on_drop() {
        let host = HeadlessHost::new();
        {
            let guard = ContextGuard::acquire(&host);
            guard.swap_buffers();
            assert_eq!(host.acquired(), 1);
            assert_eq!(host.released(), 0);
        }
        assert_eq!(host.released(), 1);
        assert_eq!(host.swaps(), 1);
    }

    #[test]
    fn guard_releases_on_error_path() {
        let host = HeadlessHost::new();
        assert!(failing_work(&host).is_err());
        assert_eq!(host.acquired(), 1);
        assert_eq!(host.released(), 1);
    }
}
