use lithovision_image::Image;
use lithovision_io::{functional, IoError};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::mpsc;

/// Blocking byte source for slab textures.
///
/// Implementations resolve a catalog `texture_ref` into encoded image bytes
/// (disk read, HTTP fetch, cache lookup). Decoding is handled by the loader.
pub trait TextureSource: Send + Sync + 'static {
    /// Fetch the encoded texture bytes behind the given reference.
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, IoError>;
}

/// Texture source reading files below a root directory.
#[derive(Debug, Clone)]
pub struct FileTextureSource {
    root: PathBuf,
}

impl FileTextureSource {
    /// Create a source rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureSource for FileTextureSource {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, IoError> {
        let path = self.root.join(reference);
        if !path.exists() {
            return Err(IoError::FileDoesNotExist(path));
        }
        Ok(std::fs::read(path)?)
    }
}

/// Outcome of a settled texture fetch, as seen by the presentation thread.
#[derive(Debug, PartialEq, Eq)]
pub enum TextureEvent {
    /// The texture for the latest selection is decoded and ready.
    Loaded,
    /// The fetch for the latest selection failed.
    Failed(String),
    /// A fetch from a superseded selection completed and was discarded.
    Stale {
        /// The generation the discarded fetch belonged to.
        generation: u64,
    },
}

struct Completion {
    generation: u64,
    result: Result<Image<u8, 4>, IoError>,
}

enum Slot {
    Idle,
    Pending,
    Ready(Image<u8, 4>),
    Failed(String),
}

/// Asynchronous slab texture loader with lost-update protection.
///
/// Each [`request`](Self::request) bumps a monotonically increasing
/// generation counter and runs fetch-plus-decode on a blocking worker. When
/// a completion is polled its generation is compared against the current
/// one: a mismatch means the selection changed while the fetch was in
/// flight, so the decoded buffer is dropped and never composited. Applying
/// whichever fetch completes last would be a lost-update race.
pub struct TextureLoader {
    source: Arc<dyn TextureSource>,
    generation: u64,
    slot: Slot,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl TextureLoader {
    /// Create a loader over the given texture source.
    pub fn new(source: Arc<dyn TextureSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            generation: 0,
            slot: Slot::Idle,
            tx,
            rx,
        }
    }

    /// Request the texture behind `reference`, superseding any fetch still
    /// in flight. Must be called from within a tokio runtime.
    pub fn request(&mut self, reference: &str) {
        self.generation += 1;
        self.slot = Slot::Pending;

        let generation = self.generation;
        let source = self.source.clone();
        let reference = reference.to_owned();
        let tx = self.tx.clone();

        log::debug!("texture fetch gen={generation} ref={reference}");
        tokio::task::spawn_blocking(move || {
            let result = source
                .fetch(&reference)
                .and_then(|bytes| functional::decode_image_bytes_rgba8(&bytes));
            // receiver dropped means the loader is gone, nothing to do
            let _ = tx.send(Completion { generation, result });
        });
    }

    /// Drop the current texture and invalidate any fetch still in flight.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.slot = Slot::Idle;
    }

    /// The decoded texture for the latest request, if it has arrived.
    pub fn texture(&self) -> Option<&Image<u8, 4>> {
        match &self.slot {
            Slot::Ready(texture) => Some(texture),
            _ => None,
        }
    }

    /// The failure message for the latest request, if it failed.
    pub fn failure(&self) -> Option<&str> {
        match &self.slot {
            Slot::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Whether a fetch for the latest request is still in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self.slot, Slot::Pending)
    }

    /// Process one settled fetch without blocking, if any has arrived.
    pub fn try_poll(&mut self) -> Option<TextureEvent> {
        match self.rx.try_recv() {
            Ok(completion) => Some(self.accept(completion)),
            Err(_) => None,
        }
    }

    /// Wait for the next settled fetch and process it.
    pub async fn next_event(&mut self) -> TextureEvent {
        match self.rx.recv().await {
            Some(completion) => self.accept(completion),
            // the loader owns a sender, so the channel can never close
            None => unreachable!("completion channel closed"),
        }
    }

    fn accept(&mut self, completion: Completion) -> TextureEvent {
        if completion.generation != self.generation {
            // superseded mid-flight: release the buffer, never composite it
            log::debug!(
                "discarding stale texture gen={} current={}",
                completion.generation,
                self.generation
            );
            return TextureEvent::Stale {
                generation: completion.generation,
            };
        }

        match completion.result {
            Ok(texture) => {
                self.slot = Slot::Ready(texture);
                TextureEvent::Loaded
            }
            Err(e) => {
                log::error!("texture fetch failed: {e}");
                let message = e.to_string();
                self.slot = Slot::Failed(message.clone());
                TextureEvent::Failed(message)
            }
        }
    }
}
