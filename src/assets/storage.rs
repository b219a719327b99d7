use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap};
use uuid::Uuid;

/// Anything stored in an [`AssetStorage`] carries a stable identity.
pub trait Asset {
    fn uuid(&self) -> Uuid;
}

/// Handle-addressed asset container with a UUID index.
///
/// Single-owner and unsynchronized: the projector reads it through `&`, asset
/// construction code edits it through `&mut`.
#[derive(Debug)]
pub struct AssetStorage<H: Key, T> {
    map: SlotMap<H, T>,
    lookup: FxHashMap<Uuid, H>,
}

impl<H: Key, T> Default for AssetStorage<H, T> {
    fn default() -> Self {
        Self {
            map: SlotMap::with_key(),
            lookup: FxHashMap::default(),
        }
    }
}

impl<H: Key, T: Asset> AssetStorage<H, T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an asset and returns a fresh handle.
    ///
    /// Always inserts, even when another stored asset carries the same UUID
    /// (a modified clone, for example). The UUID index keeps pointing at the
    /// first asset registered under it.
    pub fn add(&mut self, asset: impl Into<T>) -> H {
        let asset = asset.into();
        let uuid = asset.uuid();
        let handle = self.map.insert(asset);
        self.lookup.entry(uuid).or_insert(handle);
        handle
    }

    /// Adds an asset unless one with the same UUID is already stored, in which
    /// case the existing handle is returned and `asset` is dropped.
    pub fn add_with_uuid(&mut self, asset: impl Into<T>) -> H {
        let asset = asset.into();
        let uuid = asset.uuid();
        if let Some(&handle) = self.lookup.get(&uuid) {
            log::debug!("Asset {uuid} already stored, reusing its handle");
            return handle;
        }
        let handle = self.map.insert(asset);
        self.lookup.insert(uuid, handle);
        handle
    }

    #[inline]
    #[must_use]
    pub fn get(&self, handle: H) -> Option<&T> {
        self.map.get(handle)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.map.get_mut(handle)
    }

    #[must_use]
    pub fn get_by_uuid(&self, uuid: &Uuid) -> Option<&T> {
        self.map.get(*self.lookup.get(uuid)?)
    }

    #[must_use]
    pub fn get_handle_by_uuid(&self, uuid: &Uuid) -> Option<H> {
        self.lookup.get(uuid).copied()
    }

    /// Removes an asset. Nodes still referencing the handle are skipped by
    /// the projector from then on.
    pub fn remove(&mut self, handle: H) -> Option<T> {
        let asset = self.map.remove(handle)?;
        let uuid = asset.uuid();
        if self.lookup.get(&uuid) == Some(&handle) {
            self.lookup.remove(&uuid);
        }
        Some(asset)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> {
        self.map.iter()
    }
}
