//! Terminal-bridge resource ownership.
//!
//! [`ResourceCache`] is the only place a [`TerminalHandle`] lives. The cache
//! never talks to the network: releasing an entry hands the handle back so
//! the caller can schedule the remote teardown.

use std::collections::HashMap;

/// Produces handles for sessions. The frontend implements this with the
/// embed URL of the session's terminal endpoint.
pub trait TerminalBridge: Send {
    fn open(&self, session_id: &str) -> TerminalHandle;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    fn sign(self) -> i32 {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

/// Synthetic wheel event dispatched into the embedded viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelGesture {
    pub delta_y: i32,
}

/// Vertical distance of one scroll nudge.
pub const SCROLL_NUDGE: i32 = 1200;

/// A live embedded terminal for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalHandle {
    session_id: String,
    url: String,
    gestures: Vec<WheelGesture>,
}

impl TerminalHandle {
    pub fn new(session_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            url: url.into(),
            gestures: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn dispatch_scroll(&mut self, direction: ScrollDirection) {
        self.gestures.push(WheelGesture {
            delta_y: direction.sign() * SCROLL_NUDGE,
        });
    }

    /// Drain gestures queued since the last call.
    pub fn take_gestures(&mut self) -> Vec<WheelGesture> {
        std::mem::take(&mut self.gestures)
    }
}

/// Session id → live handle; at most one entry per session.
pub struct ResourceCache {
    handles: HashMap<String, TerminalHandle>,
    bridge: Box<dyn TerminalBridge>,
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("handles", &self.handles)
            .finish_non_exhaustive()
    }
}

impl ResourceCache {
    pub fn new(bridge: Box<dyn TerminalBridge>) -> Self {
        Self {
            handles: HashMap::new(),
            bridge,
        }
    }

    /// Cached handle for `session_id`, opening one on first use.
    pub fn acquire(&mut self, session_id: &str) -> &mut TerminalHandle {
        self.handles
            .entry(session_id.to_string())
            .or_insert_with(|| self.bridge.open(session_id))
    }

    /// Remove the entry. `Some` means a live resource existed and its remote
    /// side must be torn down.
    pub fn release(&mut self, session_id: &str) -> Option<TerminalHandle> {
        self.handles.remove(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.handles.contains_key(session_id)
    }

    pub fn get(&self, session_id: &str) -> Option<&TerminalHandle> {
        self.handles.get(session_id)
    }

    pub fn get_mut(&mut self, session_id: &str) -> Option<&mut TerminalHandle> {
        self.handles.get_mut(session_id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Ids with a live handle, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.handles.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Bridge that counts how many handles it has opened.
    #[derive(Clone, Default)]
    pub struct CountingBridge {
        pub opened: Arc<AtomicUsize>,
    }

    impl CountingBridge {
        pub fn opened(&self) -> usize {
            self.opened.load(Ordering::SeqCst)
        }
    }

    impl TerminalBridge for CountingBridge {
        fn open(&self, session_id: &str) -> TerminalHandle {
            self.opened.fetch_add(1, Ordering::SeqCst);
            TerminalHandle::new(session_id, format!("http://bridge/terminal/{session_id}/"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::CountingBridge;
    use super::*;

    #[test]
    fn acquire_reuses_the_cached_handle() {
        let bridge = CountingBridge::default();
        let mut cache = ResourceCache::new(Box::new(bridge.clone()));

        cache.acquire("s1").dispatch_scroll(ScrollDirection::Down);
        let handle = cache.acquire("s1");
        assert_eq!(handle.url(), "http://bridge/terminal/s1/");
        assert_eq!(handle.take_gestures(), vec![WheelGesture { delta_y: 1200 }]);
        assert_eq!(bridge.opened(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn release_hands_back_only_live_entries() {
        let mut cache = ResourceCache::new(Box::new(CountingBridge::default()));
        cache.acquire("s1");

        assert!(cache.release("s1").is_some());
        assert!(cache.release("s1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn scroll_up_is_negative() {
        let mut handle = TerminalHandle::new("s1", "u");
        handle.dispatch_scroll(ScrollDirection::Up);
        handle.dispatch_scroll(ScrollDirection::Up);
        assert_eq!(
            handle.take_gestures(),
            vec![WheelGesture { delta_y: -1200 }; 2]
        );
        assert!(handle.take_gestures().is_empty());
    }
}
