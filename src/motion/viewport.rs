use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use super::MotionError;

/// Element bounds relative to the top of the viewport, in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub top: f64,
    pub bottom: f64,
}

impl ElementRect {
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

static NEXT_OBSERVER: AtomicU64 = AtomicU64::new(1);

impl ObserverId {
    pub fn next() -> Self {
        ObserverId(NEXT_OBSERVER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Receives the element bounds and the viewport height.
pub type ObserveFn = Box<dyn FnMut(ElementRect, f64) + Send>;

/// Viewport observation collaborator.
///
/// `observe` delivers one sample straight away and then one per scroll or
/// resize until `unobserve`.
pub trait Viewport: Send + Sync {
    type Target: Clone + Send + Sync + 'static;

    fn observe(&self, target: &Self::Target, f: ObserveFn) -> Result<ObserverId, MotionError>;

    /// Unknown ids are ignored.
    fn unobserve(&self, id: ObserverId);
}

struct Observer {
    target: &'static str,
    f: Arc<Mutex<ObserveFn>>,
}

struct ManualPage {
    height: f64,
    scroll: f64,
    // element tops in page coordinates
    elements: HashMap<&'static str, (f64, f64)>,
    observers: HashMap<ObserverId, Observer>,
}

/// Simulated page for tests: elements are laid out at fixed page offsets
/// and scrolling notifies every observer.
#[derive(Clone)]
pub struct ManualViewport {
    page: Arc<Mutex<ManualPage>>,
}

impl ManualViewport {
    pub fn new(height: f64) -> Self {
        Self {
            page: Arc::new(Mutex::new(ManualPage {
                height,
                scroll: 0.0,
                elements: HashMap::new(),
                observers: HashMap::new(),
            })),
        }
    }

    /// Places an element at page offset `top` with the given height.
    pub fn place(&self, name: &'static str, top: f64, height: f64) {
        self.page
            .lock()
            .expect("should be able to lock page")
            .elements
            .insert(name, (top, height));
    }

    pub fn active_observers(&self) -> usize {
        self.page
            .lock()
            .expect("should be able to lock page")
            .observers
            .len()
    }

    fn rect_of(page: &ManualPage, name: &str) -> Option<ElementRect> {
        page.elements
            .get(name)
            .map(|(top, height)| ElementRect::new(top - page.scroll, top - page.scroll + height))
    }

    pub fn scroll_to(&self, scroll: f64) {
        let (notify, height) = {
            let mut page = self.page.lock().expect("should be able to lock page");
            page.scroll = scroll;
            let mut notify = page
                .observers
                .iter()
                .filter_map(|(id, o)| {
                    Self::rect_of(&page, o.target).map(|r| (id.0, r, o.f.clone()))
                })
                .collect::<Vec<_>>();
            notify.sort_by_key(|(id, _, _)| *id);
            (notify, page.height)
        };
        for (_, rect, f) in notify {
            (f.lock().expect("should be able to lock observer"))(rect, height);
        }
    }
}

impl Viewport for ManualViewport {
    type Target = &'static str;

    fn observe(&self, target: &Self::Target, f: ObserveFn) -> Result<ObserverId, MotionError> {
        let id = ObserverId::next();
        let f = Arc::new(Mutex::new(f));
        let first = {
            let mut page = self.page.lock().expect("should be able to lock page");
            let rect = Self::rect_of(&page, target).ok_or(MotionError::MissingTarget)?;
            page.observers.insert(
                id,
                Observer {
                    target: *target,
                    f: f.clone(),
                },
            );
            (rect, page.height)
        };
        (f.lock().expect("should be able to lock observer"))(first.0, first.1);
        Ok(id)
    }

    fn unobserve(&self, id: ObserverId) {
        self.page
            .lock()
            .expect("should be able to lock page")
            .observers
            .remove(&id);
    }
}
