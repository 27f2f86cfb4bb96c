use std::sync::Arc;

use parking_lot::RwLock;

use crate::laser::VirtualLaser;

/// Handle to the one laser instance a server owns.
///
/// Each closure runs under a single lock acquisition, so an operation is atomic
/// as a whole and a read observes one consistent instrument state.
#[derive(Debug, Clone, Default)]
pub struct SharedLaser {
    inner: Arc<RwLock<VirtualLaser>>,
}

impl SharedLaser {
    pub fn new(laser: VirtualLaser) -> Self {
        Self {
            inner: Arc::new(RwLock::new(laser)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&VirtualLaser) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut VirtualLaser) -> R) -> R {
        f(&mut self.inner.write())
    }
}
