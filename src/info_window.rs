use crate::engine::{EnginePopupOptions, PopupEngine, RenderingEngine};
use crate::events::{engine_listener, EngineTarget, EventSource, Handler, Subscription};
use crate::geometry::LatLng;
use crate::map::Map;
use crate::marker::Marker;
use crate::vocabulary::{EventBinding, InstanceKind};
use std::rc::Rc;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InfoWindowOptions {
    /// HTML content
    pub content: Option<String>,
    pub position: Option<LatLng>,
    /// Widths in pixels
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
}

fn pixels(width: f64) -> String {
    format!("{}px", width)
}

/// A popup bubble drawn by the rendering engine
#[derive(Debug)]
pub struct InfoWindow {
    engine: Rc<dyn PopupEngine>,
}

impl InfoWindow {
    pub fn new(engine: &dyn RenderingEngine, options: InfoWindowOptions) -> InfoWindow {
        InfoWindow {
            engine: engine.create_popup(&EnginePopupOptions {
                html: options.content,
                lng_lat: options
                    .position
                    .filter(LatLng::is_finite)
                    .map(|position| position.to_lng_lat()),
                min_width: options.min_width.map(pixels),
                max_width: options.max_width.map(pixels),
            }),
        }
    }

    /// Show the window on `map`, over `anchor` when one is given.
    ///
    /// Without an anchor the window opens at its own position; if it has none
    /// nothing is shown.
    pub fn open(&self, map: &Map, anchor: Option<&Marker>) {
        if let Some(position) = anchor.and_then(Marker::get_position) {
            self.engine.set_lng_lat(position.to_lng_lat());
        }
        if self.engine.get_lng_lat().is_none() {
            log::debug!("info window has no position, not opening");
            return;
        }
        self.engine.add_to(map.engine());
    }

    pub fn close(&self) {
        if self.engine.is_open() {
            self.engine.remove();
        }
    }

    pub fn is_open(&self) -> bool {
        self.engine.is_open()
    }

    pub fn set_content(&self, content: &str) {
        self.engine.set_html(content);
    }

    pub fn get_position(&self) -> Option<LatLng> {
        self.engine.get_lng_lat().map(LatLng::from_lng_lat)
    }

    pub fn set_position(&self, position: &LatLng) {
        if position.is_finite() {
            self.engine.set_lng_lat(position.to_lng_lat());
        }
    }

    pub fn set_max_width(&self, max_width: f64) {
        self.engine.set_max_width(&pixels(max_width));
    }
}

impl EventSource for InfoWindow {
    fn kind(&self) -> InstanceKind {
        InstanceKind::InfoWindow
    }

    fn subscribe(
        &self,
        binding: &'static EventBinding,
        handler: Handler,
        once: bool,
    ) -> Subscription {
        Subscription::engine(
            EngineTarget::Popup(self.engine.clone()),
            binding.target,
            engine_listener(binding, handler),
            once,
        )
    }
}
