/// Parameter hand-off between a control thread and the render loop.
///
/// The control plane (a settings panel, a scripting console) mutates
/// parameters whenever it likes; the render loop takes one snapshot at the
/// start of each frame and shades the whole frame from that copy.
///
/// ```text
/// UI thread → update() → [RwLock<ShadingParameters>] → snapshot() → evaluator
/// ```

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::params::ShadingParameters;

/// Frame-granular shared parameter store.
pub struct SharedParameters {
    current: RwLock<ShadingParameters>,
    /// Bumped on every update so the render side can skip unchanged frames.
    revision: AtomicU64,
}

/// Parameters captured for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameParameters {
    pub revision: u64,
    pub params: ShadingParameters,
}

impl SharedParameters {
    #[must_use]
    pub fn new(params: ShadingParameters) -> Self {
        Self {
            current: RwLock::new(params),
            revision: AtomicU64::new(0),
        }
    }

    /// Mutate the parameters. Visible to the next `snapshot()`.
    pub fn update<F: FnOnce(&mut ShadingParameters)>(&self, f: F) {
        let mut guard = self.current.write();
        f(&mut guard);
        self.revision.fetch_add(1, Ordering::Release);
    }

    /// Replace every parameter at once.
    pub fn replace(&self, params: ShadingParameters) {
        self.update(|p| *p = params);
    }

    /// Copy the current parameters for the coming frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameParameters {
        let guard = self.current.read();
        FrameParameters {
            revision: self.revision.load(Ordering::Acquire),
            params: *guard,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}

impl Default for SharedParameters {
    fn default() -> Self {
        Self::new(ShadingParameters::default())
    }
}
