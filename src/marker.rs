use crate::engine::{
    DomEvent, DomListener, EngineEvent, EngineListener, EngineMarkerOptions, MarkerEngine,
    RenderingEngine,
};
use crate::events::{
    engine_listener, EngineTarget, EventArgs, EventSource, Handler, MapMouseEvent, RawEvent,
    Subscription,
};
use crate::geometry::LatLng;
use crate::map::Map;
use crate::vocabulary::{EventBinding, InstanceKind, Payload, Wiring};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerOptions {
    pub position: Option<LatLng>,
    pub map: Option<Map>,
    pub draggable: bool,
    pub opacity: Option<f64>,
    /// Tooltip text, read by the engine when the marker is created
    pub title: Option<String>,
    /// Image URL drawn instead of the default pin
    pub icon: Option<String>,
}

/// A marker drawn by the rendering engine.
///
/// A marker is only shown while it has both a position and a map.
#[derive(Debug)]
pub struct Marker {
    engine: Rc<dyn MarkerEngine>,
    map: RefCell<Option<Map>>,
    has_position: Cell<bool>,
    opacity: Cell<f64>,
    title: Option<String>,
}

/// The marker's current position as seen from a listener
fn position_of(marker: &Weak<dyn MarkerEngine>) -> LatLng {
    marker
        .upgrade()
        .map(|marker| LatLng::from_lng_lat(marker.get_lng_lat()))
        .unwrap_or_else(LatLng::nan)
}

impl Marker {
    pub fn new(engine: &dyn RenderingEngine, options: MarkerOptions) -> Marker {
        let position = options.position.filter(LatLng::is_finite);
        let marker = Marker {
            engine: engine.create_marker(&EngineMarkerOptions {
                lng_lat: position.map(|position| position.to_lng_lat()),
                draggable: options.draggable,
                opacity: options.opacity,
                title: options.title.clone(),
                image: options.icon,
                color: None,
            }),
            map: RefCell::new(options.map),
            has_position: Cell::new(position.is_some()),
            opacity: Cell::new(options.opacity.unwrap_or(1.0)),
            title: options.title,
        };
        marker.sync_attachment();
        marker
    }

    fn sync_attachment(&self) {
        match &*self.map.borrow() {
            Some(map) if self.has_position.get() => self.engine.add_to(map.engine()),
            _ => self.engine.remove(),
        }
    }

    /// The current position, following any drag
    pub fn get_position(&self) -> Option<LatLng> {
        if self.has_position.get() {
            Some(LatLng::from_lng_lat(self.engine.get_lng_lat()))
        } else {
            None
        }
    }

    pub fn set_position(&self, position: Option<LatLng>) {
        match position.filter(LatLng::is_finite) {
            Some(position) => {
                self.engine.set_lng_lat(position.to_lng_lat());
                self.has_position.set(true);
            }
            None => self.has_position.set(false),
        }
        self.sync_attachment();
    }

    pub fn get_map(&self) -> Option<Map> {
        self.map.borrow().clone()
    }

    /// Attach to `map`, or detach with `None`
    pub fn set_map(&self, map: Option<&Map>) {
        *self.map.borrow_mut() = map.cloned();
        self.sync_attachment();
    }

    pub fn get_draggable(&self) -> bool {
        self.engine.is_draggable()
    }

    pub fn set_draggable(&self, draggable: bool) {
        self.engine.set_draggable(draggable);
    }

    pub fn get_opacity(&self) -> f64 {
        self.opacity.get()
    }

    pub fn set_opacity(&self, opacity: f64) {
        self.opacity.set(opacity);
        self.engine.set_opacity(opacity);
    }

    pub fn get_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn element_listener(&self, binding: &EventBinding, handler: Handler) -> DomListener {
        let marker = Rc::downgrade(&self.engine);
        let stop_propagation = binding.stop_propagation;
        Rc::new(move |event: &Rc<DomEvent>| {
            if stop_propagation {
                event.stop_propagation();
            }
            handler(&EventArgs::Mouse(MapMouseEvent {
                dom_event: RawEvent::Dom(event.clone()),
                lat_lng: position_of(&marker),
            }));
        })
    }

    /// Drag events carry the marker's position rather than the pointer's
    fn drag_listener(&self, handler: Handler) -> EngineListener {
        let marker = Rc::downgrade(&self.engine);
        Rc::new(move |event: &EngineEvent| {
            let dom_event = match &event.original_event {
                Some(original) => RawEvent::Dom(original.clone()),
                None => RawEvent::Engine(event.clone()),
            };
            handler(&EventArgs::Mouse(MapMouseEvent {
                dom_event,
                lat_lng: position_of(&marker),
            }));
        })
    }
}

impl EventSource for Marker {
    fn kind(&self) -> InstanceKind {
        InstanceKind::Marker
    }

    fn subscribe(
        &self,
        binding: &'static EventBinding,
        handler: Handler,
        once: bool,
    ) -> Subscription {
        match (binding.wiring, binding.payload) {
            (Wiring::Element, _) => Subscription::element(
                self.engine.element(),
                binding.target,
                self.element_listener(binding, handler),
                once,
            ),
            (Wiring::Engine, Payload::Mouse) => Subscription::engine(
                EngineTarget::Marker(self.engine.clone()),
                binding.target,
                self.drag_listener(handler),
                once,
            ),
            (Wiring::Engine, Payload::None) => Subscription::engine(
                EngineTarget::Marker(self.engine.clone()),
                binding.target,
                engine_listener(binding, handler),
                once,
            ),
        }
    }
}
