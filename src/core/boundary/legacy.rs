//=========================================================================
// Legacy Engine Adapter
//=========================================================================
//
// First-generation engines only exposed `init(archive_path)`, `resize`,
// a status-less `update` and two-finger `scroll`. `LegacyAdapter` lifts
// that shape into the full `EngineBoundary` so the lifecycle controller
// never needs to know which generation it is driving.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::{AssetSource, EngineBoundary, Status, STATUS_OK};

/// Status returned when a legacy engine is given a source it cannot load.
pub const STATUS_UNSUPPORTED_SOURCE: Status = -1;

//=== LegacyEngine ========================================================

/// Call shape of first-generation engines.
pub trait LegacyEngine: Send {
    fn init(&mut self, archive_path: &Path) -> Status;

    fn resize(&mut self, width: i32, height: i32);

    fn update(&mut self);

    fn scroll(&mut self, dt: i64, dx1: f32, dy1: f32, dx2: f32, dy2: f32);
}

//=== LegacyAdapter =======================================================

/// Presents a [`LegacyEngine`] as a full [`EngineBoundary`].
///
/// Entry points the legacy shape lacks succeed trivially (`restore`) or
/// are dropped with a trace log (activation, pointers, keys).
pub struct LegacyAdapter<L: LegacyEngine> {
    inner: L,
}

impl<L: LegacyEngine> LegacyAdapter<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: LegacyEngine> EngineBoundary for LegacyAdapter<L> {
    fn init(&mut self, source: &AssetSource) -> Status {
        match source {
            AssetSource::Archive(path) | AssetSource::Directory(path) => self.inner.init(path),
            AssetSource::Handle(_) => {
                warn!(target: "lifecycle", "Legacy engine cannot load from an asset handle");
                STATUS_UNSUPPORTED_SOURCE
            }
        }
    }

    fn restore(&mut self) -> Status {
        STATUS_OK
    }

    fn resize(&mut self, width: i32, height: i32) {
        self.inner.resize(width, height);
    }

    fn update(&mut self) -> Status {
        self.inner.update();
        STATUS_OK
    }

    fn shutdown(&mut self) {
        trace!(target: "lifecycle", "Legacy engine has no shutdown entry point");
    }

    fn activated(&mut self) {}

    fn deactivated(&mut self) {}

    fn pointer_down(&mut self, id: i32, _x: f32, _y: f32) {
        trace!(target: "input", "Legacy engine ignores pointer #{} down", id);
    }

    fn pointer_up(&mut self, id: i32, _x: f32, _y: f32) {
        trace!(target: "input", "Legacy engine ignores pointer #{} up", id);
    }

    fn pointer_move(&mut self, _id: i32, _x: f32, _y: f32) {}

    fn scroll(&mut self, dt: i64, dx1: f32, dy1: f32, dx2: f32, dy2: f32) {
        self.inner.scroll(dt, dx1, dy1, dx2, dy2);
    }

    fn key_down(&mut self, _key: i32) {}

    fn key_up(&mut self, _key: i32) {}
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Default)]
    struct FirstGeneration {
        init_path: Option<PathBuf>,
        updates: usize,
        scrolls: Vec<(i64, f32, f32, f32, f32)>,
        size: Option<(i32, i32)>,
    }

    impl LegacyEngine for FirstGeneration {
        fn init(&mut self, archive_path: &Path) -> Status {
            self.init_path = Some(archive_path.to_path_buf());
            STATUS_OK
        }

        fn resize(&mut self, width: i32, height: i32) {
            self.size = Some((width, height));
        }

        fn update(&mut self) {
            self.updates += 1;
        }

        fn scroll(&mut self, dt: i64, dx1: f32, dy1: f32, dx2: f32, dy2: f32) {
            self.scrolls.push((dt, dx1, dy1, dx2, dy2));
        }
    }

    #[test]
    fn archive_path_reaches_legacy_init() {
        let mut adapter = LegacyAdapter::new(FirstGeneration::default());
        let status = adapter.init(&AssetSource::Archive(PathBuf::from("/data/app.apk")));

        assert_eq!(status, STATUS_OK);
        assert_eq!(adapter.inner().init_path, Some(PathBuf::from("/data/app.apk")));
    }

    #[test]
    fn handle_source_is_unsupported() {
        let mut value = 0u8;
        let handle = super::super::AssetHandle::new(&mut value as *mut u8 as *mut _).unwrap();
        let mut adapter = LegacyAdapter::new(FirstGeneration::default());

        assert_eq!(adapter.init(&AssetSource::Handle(handle)), STATUS_UNSUPPORTED_SOURCE);
        assert!(adapter.inner().init_path.is_none());
    }

    #[test]
    fn update_never_requests_exit() {
        let mut adapter = LegacyAdapter::new(FirstGeneration::default());
        assert_eq!(adapter.update(), STATUS_OK);
        assert_eq!(adapter.update(), STATUS_OK);
        assert_eq!(adapter.inner().updates, 2);
    }

    #[test]
    fn restore_always_succeeds() {
        let mut adapter = LegacyAdapter::new(FirstGeneration::default());
        assert_eq!(adapter.restore(), STATUS_OK);
    }

    #[test]
    fn scroll_and_resize_pass_through() {
        let mut adapter = LegacyAdapter::new(FirstGeneration::default());
        adapter.resize(320, 240);
        adapter.scroll(16, 1.0, 2.0, 0.0, 0.0);
        adapter.pointer_down(0, 0.5, 0.5);

        let inner = adapter.into_inner();
        assert_eq!(inner.size, Some((320, 240)));
        assert_eq!(inner.scrolls, vec![(16, 1.0, 2.0, 0.0, 0.0)]);
    }
}
