use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::AudioError;
use crate::playback::signal::{Voice, VoiceInfo};

use super::{ActiveOutput, OutputBackend};

/// Frames rendered when a voice is opened, so a broken source fails early
const PRIME_FRAMES: usize = 256;

#[derive(Default)]
struct OfflineState {
    active: AtomicUsize,
    opened: AtomicUsize,
    last: Mutex<Option<VoiceInfo>>,
}

/// Backend that plays nothing and tracks handle lifecycles.
///
/// Used for headless builds, the CLI and tests. Clones share counters, so a
/// test can keep one clone and hand the other to a playback engine.
#[derive(Clone, Default)]
pub struct OfflineBackend {
    state: Arc<OfflineState>,
}

impl OfflineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles currently alive
    pub fn active_outputs(&self) -> usize {
        self.state.active.load(Ordering::SeqCst)
    }

    /// Handles opened over the backend's lifetime
    pub fn opened_outputs(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    pub fn last_voice(&self) -> Option<VoiceInfo> {
        self.state
            .last
            .lock()
            .map(|last| *last)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

impl OutputBackend for OfflineBackend {
    fn open(&self, mut voice: Voice) -> Result<Box<dyn ActiveOutput>, AudioError> {
        let mut scratch = vec![0.0f32; PRIME_FRAMES * 2];
        voice.render(&mut scratch, 2);

        let info = voice.info();
        {
            let mut last = self
                .state
                .last
                .lock()
                .map_err(|_| AudioError::LockPoisoned {
                    component: "offline_backend".to_string(),
                })?;
            *last = Some(info);
        }

        self.state.opened.fetch_add(1, Ordering::SeqCst);
        self.state.active.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(OfflineOutput {
            info,
            state: Arc::clone(&self.state),
        }))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

struct OfflineOutput {
    info: VoiceInfo,
    state: Arc<OfflineState>,
}

impl ActiveOutput for OfflineOutput {
    fn info(&self) -> VoiceInfo {
        self.info
    }
}

impl Drop for OfflineOutput {
    fn drop(&mut self) {
        self.state.active.fetch_sub(1, Ordering::SeqCst);
    }
}
