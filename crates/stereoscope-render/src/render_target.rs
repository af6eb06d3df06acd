//! Per-eye render targets and native handle caching.
//!
//! Each eye target follows `Created -> (invalidation) -> NotCreated ->
//! recreate -> Created`. Recreation only happens at the per-frame checkpoint
//! [`StereoTargets::prepare_frame`], which runs before any eye is rendered.
//! Native handles are cached and re-queried only after the target was
//! recreated or observed as not created.

use stereoscope_core::{Eye, NativeHandle};

use crate::error::RenderResult;

/// Lifecycle state of an eye target as last observed by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    NotCreated,
    Created,
}

/// An offscreen color + depth surface for one eye.
pub trait EyeTarget {
    /// Returns whether the underlying GPU resources currently exist and are valid.
    fn is_created(&self) -> bool;

    /// (Re)creates the GPU resources.
    fn create(&mut self) -> RenderResult<()>;

    /// Releases the GPU resources. Afterwards `is_created` returns false.
    fn release(&mut self);

    /// Queries the native handle of the current color surface.
    fn native_handle(&self) -> Option<NativeHandle>;

    /// Size in pixels.
    fn size(&self) -> (u32, u32);
}

/// The pair of eye targets, owned exclusively by the render/submit pipeline.
#[derive(Debug)]
pub struct StereoTargets<T: EyeTarget> {
    targets: [T; 2],
    states: [TargetState; 2],
    cached_handles: [Option<NativeHandle>; 2],
    recreations: u64,
    handle_queries: u64,
}

impl<T: EyeTarget> StereoTargets<T> {
    /// Wraps two eye targets. Neither is created until the first checkpoint.
    pub fn new(left: T, right: T) -> Self {
        Self {
            targets: [left, right],
            states: [TargetState::NotCreated; 2],
            cached_handles: [None; 2],
            recreations: 0,
            handle_queries: 0,
        }
    }

    /// Returns one eye target.
    pub fn target(&self, eye: Eye) -> &T {
        &self.targets[eye.index()]
    }

    /// Returns the state of one eye target as of the last checkpoint or acquisition.
    pub fn state(&self, eye: Eye) -> TargetState {
        self.states[eye.index()]
    }

    /// Per-eye size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.targets[0].size()
    }

    /// Total number of recreations performed after invalidation.
    pub fn recreations(&self) -> u64 {
        self.recreations
    }

    /// Total number of native handle queries issued.
    pub fn handle_queries(&self) -> u64 {
        self.handle_queries
    }

    /// Frame checkpoint: recreates any target that is not created.
    ///
    /// Must be called once per frame before rendering. Returns the number of
    /// targets (re)created.
    pub fn prepare_frame(&mut self) -> RenderResult<usize> {
        let mut created = 0;
        for eye in Eye::BOTH {
            let i = eye.index();
            if self.targets[i].is_created() {
                continue;
            }
            let was_created = self.states[i] == TargetState::Created;
            self.states[i] = TargetState::NotCreated;
            self.cached_handles[i] = None;

            self.targets[i].create()?;
            self.states[i] = TargetState::Created;
            created += 1;

            if was_created {
                self.recreations += 1;
                log::info!("Recreated invalidated {} eye target", eye.name());
            } else {
                log::debug!("Created {} eye target", eye.name());
            }
        }
        Ok(created)
    }

    /// Returns the native handle for an eye, using the cache when valid.
    ///
    /// Call after rendering, immediately before submission. Returns `None`
    /// if the target is not created; a stale handle is never returned.
    pub fn acquire_native_handle(&mut self, eye: Eye) -> Option<NativeHandle> {
        let i = eye.index();
        if !self.targets[i].is_created() {
            self.states[i] = TargetState::NotCreated;
            self.cached_handles[i] = None;
            return None;
        }
        if let Some(handle) = self.cached_handles[i] {
            return Some(handle);
        }
        self.handle_queries += 1;
        let handle = self.targets[i].native_handle().filter(|h| !h.is_null())?;
        self.cached_handles[i] = Some(handle);
        Some(handle)
    }

    /// Acquires both handles, left first, or `None` if either is unavailable.
    pub fn acquire_native_handles(&mut self) -> Option<[NativeHandle; 2]> {
        let left = self.acquire_native_handle(Eye::Left);
        let right = self.acquire_native_handle(Eye::Right);
        Some([left?, right?])
    }

    /// Releases one target, e.g. in response to a display event.
    ///
    /// It is recreated at the next [`prepare_frame`](Self::prepare_frame).
    pub fn invalidate(&mut self, eye: Eye) {
        self.targets[eye.index()].release();
    }

    /// Releases both targets.
    pub fn invalidate_all(&mut self) {
        for eye in Eye::BOTH {
            self.invalidate(eye);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// CPU-side target that hands out a new handle for every creation.
    #[derive(Debug, Default)]
    pub(crate) struct FakeTarget {
        pub created: bool,
        pub generation: u64,
        pub queries: std::cell::Cell<u64>,
    }

    impl EyeTarget for FakeTarget {
        fn is_created(&self) -> bool {
            self.created
        }

        fn create(&mut self) -> RenderResult<()> {
            self.created = true;
            self.generation += 1;
            Ok(())
        }

        fn release(&mut self) {
            self.created = false;
        }

        fn native_handle(&self) -> Option<NativeHandle> {
            self.queries.set(self.queries.get() + 1);
            self.created.then_some(NativeHandle(self.generation * 10))
        }

        fn size(&self) -> (u32, u32) {
            (1216, 768)
        }
    }

    fn targets() -> StereoTargets<FakeTarget> {
        StereoTargets::new(FakeTarget::default(), FakeTarget::default())
    }

    #[test]
    fn test_first_checkpoint_creates_both() {
        let mut t = targets();
        assert_eq!(t.prepare_frame().unwrap(), 2);
        assert_eq!(t.state(Eye::Left), TargetState::Created);
        assert_eq!(t.recreations(), 0);
        assert_eq!(t.prepare_frame().unwrap(), 0);
    }

    #[test]
    fn test_handle_cached_across_frames() {
        let mut t = targets();
        t.prepare_frame().unwrap();
        let first = t.acquire_native_handle(Eye::Left).unwrap();
        for _ in 0..5 {
            t.prepare_frame().unwrap();
            assert_eq!(t.acquire_native_handle(Eye::Left), Some(first));
        }
        assert_eq!(t.target(Eye::Left).queries.get(), 1);
    }

    #[test]
    fn test_invalidated_target_requeries_handle() {
        let mut t = targets();
        t.prepare_frame().unwrap();
        let stale = t.acquire_native_handle(Eye::Right).unwrap();

        t.invalidate(Eye::Right);
        assert_eq!(t.prepare_frame().unwrap(), 1);
        assert_eq!(t.recreations(), 1);

        let fresh = t.acquire_native_handle(Eye::Right).unwrap();
        assert_ne!(fresh, stale);
        assert_eq!(t.target(Eye::Right).queries.get(), 2);
    }

    #[test]
    fn test_invalidation_after_checkpoint_yields_no_handle() {
        let mut t = targets();
        t.prepare_frame().unwrap();
        t.acquire_native_handles().unwrap();

        t.invalidate(Eye::Left);
        assert_eq!(t.acquire_native_handle(Eye::Left), None);
        assert_eq!(t.acquire_native_handles(), None);
        assert_eq!(t.state(Eye::Left), TargetState::NotCreated);
    }

    #[test]
    fn test_invalidate_all() {
        let mut t = targets();
        t.prepare_frame().unwrap();
        t.invalidate_all();
        assert_eq!(t.prepare_frame().unwrap(), 2);
        assert_eq!(t.recreations(), 2);
    }
}
