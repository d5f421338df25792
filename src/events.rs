//! Event translation: `add_listener`, `add_listener_once` and `remove_listener`.
//!
//! Registration is dispatched on the instance's [`InstanceKind`] through the
//! [`EventSource`] trait. Each kind decides how a binding from
//! [`crate::vocabulary`] is wired and hands back a [`Subscription`] describing
//! exactly which primitive to call to undo it. The handle returned to client
//! code owns that subscription; nothing else keeps track of live listeners.
//!
//! Unsupported event names are ignored rather than rejected. The registration
//! functions return `None` in that case so callers can tell.
use crate::engine::{
    DomElement, DomEvent, DomListener, EngineEvent, EngineListener, MapEngine, MarkerEngine,
    PopupEngine,
};
use crate::geometry::LatLng;
use crate::vocabulary::{self, EventBinding, InstanceKind};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// The raw event carried by a [`MapMouseEvent`], passed through untouched
#[derive(Clone, Debug)]
pub enum RawEvent {
    Dom(Rc<DomEvent>),
    Engine(EngineEvent),
}

/// The translated payload of pointer events
#[derive(Clone, Debug)]
pub struct MapMouseEvent {
    pub dom_event: RawEvent,
    pub lat_lng: LatLng,
}

impl MapMouseEvent {
    /// Translate a pointer event emitted by the engine map
    pub(crate) fn from_engine(event: &EngineEvent) -> MapMouseEvent {
        let lat_lng = event
            .lng_lat
            .map(LatLng::from_lng_lat)
            .unwrap_or_else(LatLng::nan);
        let dom_event = match &event.original_event {
            Some(original) => RawEvent::Dom(original.clone()),
            None => RawEvent::Engine(event.clone()),
        };
        MapMouseEvent { dom_event, lat_lng }
    }
}

/// What a handler is invoked with
#[derive(Clone, Debug)]
pub enum EventArgs {
    None,
    Mouse(MapMouseEvent),
}

impl EventArgs {
    pub fn mouse(&self) -> Option<&MapMouseEvent> {
        match self {
            EventArgs::Mouse(event) => Some(event),
            EventArgs::None => None,
        }
    }
}

pub type Handler = Rc<dyn Fn(&EventArgs)>;

/// The engine object an engine-wired subscription lives on
#[derive(Clone)]
pub enum EngineTarget {
    Map(Rc<dyn MapEngine>),
    Marker(Rc<dyn MarkerEngine>),
    Popup(Rc<dyn PopupEngine>),
}

impl EngineTarget {
    fn register(&self, event: &str, listener: EngineListener, once: bool) {
        match (self, once) {
            (EngineTarget::Map(map), false) => map.on(event, listener),
            (EngineTarget::Map(map), true) => map.once(event, listener),
            (EngineTarget::Marker(marker), false) => marker.on(event, listener),
            (EngineTarget::Marker(marker), true) => marker.once(event, listener),
            (EngineTarget::Popup(popup), false) => popup.on(event, listener),
            (EngineTarget::Popup(popup), true) => popup.once(event, listener),
        }
    }

    fn unregister(&self, event: &str, listener: &EngineListener) {
        match self {
            EngineTarget::Map(map) => map.off(event, listener),
            EngineTarget::Marker(marker) => marker.off(event, listener),
            EngineTarget::Popup(popup) => popup.off(event, listener),
        }
    }
}

/// A live subscription and the means to reverse it
pub enum Subscription {
    Engine {
        target: EngineTarget,
        event: &'static str,
        listener: EngineListener,
    },
    Element {
        element: Rc<dyn DomElement>,
        event: &'static str,
        listener: DomListener,
    },
}

impl Subscription {
    /// Register `listener` through the engine object's native API
    pub fn engine(
        target: EngineTarget,
        event: &'static str,
        listener: EngineListener,
        once: bool,
    ) -> Subscription {
        target.register(event, listener.clone(), once);
        Subscription::Engine {
            target,
            event,
            listener,
        }
    }

    /// Register `listener` directly on an element
    pub fn element(
        element: Rc<dyn DomElement>,
        event: &'static str,
        listener: DomListener,
        once: bool,
    ) -> Subscription {
        element.add_event_listener(event, listener.clone(), once);
        Subscription::Element {
            element,
            event,
            listener,
        }
    }

    fn cancel(self) {
        match self {
            Subscription::Engine {
                target,
                event,
                listener,
            } => target.unregister(event, &listener),
            Subscription::Element {
                element,
                event,
                listener,
            } => element.remove_event_listener(event, &listener),
        }
    }
}

/// An object whose source-API events can be translated onto the engine
pub trait EventSource {
    fn kind(&self) -> InstanceKind;

    /// Wire `handler` for `binding`, which is guaranteed to come from this
    /// kind's event table.
    fn subscribe(&self, binding: &'static EventBinding, handler: Handler, once: bool)
        -> Subscription;
}

/// Wrap a handler for an engine-wired binding on a map or popup
pub(crate) fn engine_listener(binding: &EventBinding, handler: Handler) -> EngineListener {
    match binding.payload {
        vocabulary::Payload::None => Rc::new(move |_: &EngineEvent| handler(&EventArgs::None)),
        vocabulary::Payload::Mouse => Rc::new(move |event: &EngineEvent| {
            handler(&EventArgs::Mouse(MapMouseEvent::from_engine(event)))
        }),
    }
}

/// The handle returned by [`add_listener`] and [`add_listener_once`].
///
/// Removing the same handle more than once is a no-op. A once-handle stops
/// being active as soon as its handler has run.
pub struct MapsEventListener {
    kind: InstanceKind,
    event: &'static str,
    subscription: RefCell<Option<Subscription>>,
    fired: Rc<Cell<bool>>,
}

impl MapsEventListener {
    pub fn kind(&self) -> InstanceKind {
        self.kind
    }

    pub fn event(&self) -> &'static str {
        self.event
    }

    pub fn is_active(&self) -> bool {
        self.subscription.borrow().is_some() && !self.fired.get()
    }

    /// Undo the subscription; returns whether anything was removed
    pub fn remove(&self) -> bool {
        let subscription = self.subscription.borrow_mut().take();
        match subscription {
            // the engine dropped a fired once-listener on its own
            Some(_) if self.fired.get() => false,
            Some(subscription) => {
                subscription.cancel();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for MapsEventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapsEventListener")
            .field("kind", &self.kind)
            .field("event", &self.event)
            .field("active", &self.is_active())
            .finish()
    }
}

fn register<S, F>(instance: &S, event: &str, handler: F, once: bool) -> Option<MapsEventListener>
where
    S: EventSource + ?Sized,
    F: Fn(&EventArgs) + 'static,
{
    let kind = instance.kind();
    let binding = match vocabulary::lookup(kind, event) {
        Some(binding) => binding,
        None => {
            log::debug!("ignoring unsupported {:?} event `{}`", kind, event);
            return None;
        }
    };
    let fired = Rc::new(Cell::new(false));
    let handler: Handler = if once {
        let flag = fired.clone();
        Rc::new(move |args: &EventArgs| {
            flag.set(true);
            handler(args)
        })
    } else {
        Rc::new(handler)
    };
    let subscription = instance.subscribe(binding, handler, once);
    Some(MapsEventListener {
        kind,
        event: binding.source,
        subscription: RefCell::new(Some(subscription)),
        fired,
    })
}

/// Subscribe `handler` to `event` on `instance`.
///
/// Returns `None`, registering nothing, when `event` is not supported for the
/// instance's kind.
pub fn add_listener<S, F>(instance: &S, event: &str, handler: F) -> Option<MapsEventListener>
where
    S: EventSource + ?Sized,
    F: Fn(&EventArgs) + 'static,
{
    register(instance, event, handler, false)
}

/// Like [`add_listener`], but the engine invokes `handler` at most once and
/// drops the registration itself afterwards.
pub fn add_listener_once<S, F>(instance: &S, event: &str, handler: F) -> Option<MapsEventListener>
where
    S: EventSource + ?Sized,
    F: Fn(&EventArgs) + 'static,
{
    register(instance, event, handler, true)
}

/// Reverse a subscription. Returns whether anything was removed, which is
/// `false` for a once-listener that has already fired.
pub fn remove_listener(listener: &MapsEventListener) -> bool {
    listener.remove()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::lng_lat;
    use crate::info_window::{InfoWindow, InfoWindowOptions};
    use crate::map::{Map, MapOptions};
    use crate::marker::{Marker, MarkerOptions};
    use crate::testing::HeadlessEngine;
    use std::cell::{Cell, RefCell};

    fn map(engine: &HeadlessEngine) -> Map {
        Map::new(engine, "map", MapOptions::default())
    }

    #[test]
    fn map_click_translates_payload() {
        let engine = HeadlessEngine::default();
        let map = map(&engine);
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let handle = add_listener(&map, "click", move |args: &EventArgs| {
            *sink.borrow_mut() = args.mouse().cloned();
        });
        assert!(handle.is_some());

        let dom = Rc::new(DomEvent::new("click"));
        engine
            .map(0)
            .fire(&EngineEvent::pointer("click", lng_lat(11.5, 48.1), dom.clone()));

        let event = seen.borrow().clone().unwrap();
        assert_eq!(event.lat_lng, LatLng::new(48.1, 11.5));
        match event.dom_event {
            RawEvent::Dom(raw) => assert!(Rc::ptr_eq(&raw, &dom)),
            RawEvent::Engine(_) => panic!("expected the original element event"),
        }
    }

    #[test]
    fn no_payload_events_receive_none() {
        let engine = HeadlessEngine::default();
        let map = map(&engine);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        add_listener(&map, "zoom_changed", move |args: &EventArgs| {
            assert!(args.mouse().is_none());
            counter.set(counter.get() + 1);
        })
        .unwrap();
        engine.map(0).fire(&EngineEvent::new("zoom"));
        engine.map(0).fire(&EngineEvent::new("zoom"));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn unsupported_event_is_ignored() {
        let engine = HeadlessEngine::default();
        let map = map(&engine);
        assert!(add_listener(&map, "closeclick", |_: &EventArgs| {}).is_none());
        assert!(add_listener_once(&map, "no_such_event", |_: &EventArgs| {}).is_none());
        assert_eq!(engine.map(0).listener_count(), 0);
    }

    #[test]
    fn once_fires_a_single_time() {
        let engine = HeadlessEngine::default();
        let map = map(&engine);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let handle = add_listener_once(&map, "idle", move |_: &EventArgs| {
            counter.set(counter.get() + 1)
        })
        .unwrap();
        engine.map(0).fire(&EngineEvent::new("idle"));
        engine.map(0).fire(&EngineEvent::new("idle"));
        assert_eq!(calls.get(), 1);
        assert_eq!(engine.map(0).listener_count(), 0);
        assert!(!handle.is_active());
        assert!(!remove_listener(&handle));
    }

    #[test]
    fn remove_twice_is_a_no_op() {
        let engine = HeadlessEngine::default();
        let map = map(&engine);
        let handle = add_listener(&map, "click", |_: &EventArgs| {}).unwrap();
        assert_eq!(engine.map(0).listener_count(), 1);
        assert!(remove_listener(&handle));
        assert_eq!(engine.map(0).listener_count(), 0);
        assert!(!remove_listener(&handle));
        assert!(!handle.is_active());
    }

    #[test]
    fn handlers_fire_in_registration_order() {
        let engine = HeadlessEngine::default();
        let map = map(&engine);
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..3 {
            let order = order.clone();
            add_listener(&map, "dragend", move |_: &EventArgs| order.borrow_mut().push(tag));
        }
        engine.map(0).fire(&EngineEvent::new("dragend"));
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn marker_click_uses_element_and_stops_propagation() {
        let engine = HeadlessEngine::default();
        let marker = Marker::new(
            &engine,
            MarkerOptions {
                position: Some(LatLng::new(1.0, 2.0)),
                ..Default::default()
            },
        );
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let handle = add_listener(&marker, "click", move |args: &EventArgs| {
            *sink.borrow_mut() = args.mouse().cloned();
        })
        .unwrap();
        assert_eq!(handle.kind(), InstanceKind::Marker);

        let headless = engine.marker(0);
        assert_eq!(headless.listener_count(), 0);
        assert_eq!(headless.element.listener_count(), 1);

        let dom = Rc::new(DomEvent::new("click"));
        headless.element.dispatch("click", &dom);
        assert!(dom.is_propagation_stopped());
        assert_eq!(seen.borrow().as_ref().unwrap().lat_lng, LatLng::new(1.0, 2.0));

        remove_listener(&handle);
        assert_eq!(headless.element.listener_count(), 0);
    }

    #[test]
    fn marker_contextmenu_does_not_stop_propagation() {
        let engine = HeadlessEngine::default();
        let marker = Marker::new(&engine, MarkerOptions::default());
        add_listener(&marker, "contextmenu", |_: &EventArgs| {}).unwrap();
        let dom = Rc::new(DomEvent::new("contextmenu"));
        engine.marker(0).element.dispatch("contextmenu", &dom);
        assert!(!dom.is_propagation_stopped());
    }

    #[test]
    fn marker_once_on_element() {
        let engine = HeadlessEngine::default();
        let marker = Marker::new(&engine, MarkerOptions::default());
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        add_listener_once(&marker, "dblclick", move |_: &EventArgs| {
            counter.set(counter.get() + 1)
        })
        .unwrap();
        let headless = engine.marker(0);
        let element = &headless.element;
        element.dispatch("dblclick", &Rc::new(DomEvent::new("dblclick")));
        element.dispatch("dblclick", &Rc::new(DomEvent::new("dblclick")));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn marker_drag_reports_marker_position() {
        let engine = HeadlessEngine::default();
        let marker = Marker::new(
            &engine,
            MarkerOptions {
                position: Some(LatLng::new(0.0, 0.0)),
                draggable: true,
                ..Default::default()
            },
        );
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        add_listener(&marker, "dragend", move |args: &EventArgs| {
            *sink.borrow_mut() = args.mouse().map(|event| event.lat_lng);
        })
        .unwrap();
        let headless = engine.marker(0);
        headless.lng_lat.set(lng_lat(5.0, 6.0));
        headless.fire(&EngineEvent::new("dragend"));
        assert_eq!(*seen.borrow(), Some(LatLng::new(6.0, 5.0)));
    }

    #[test]
    fn info_window_closeclick() {
        let engine = HeadlessEngine::default();
        let info_window = InfoWindow::new(&engine, InfoWindowOptions::default());
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let handle = add_listener(&info_window, "closeclick", move |_: &EventArgs| {
            counter.set(counter.get() + 1)
        })
        .unwrap();
        assert_eq!(handle.event(), "closeclick");
        engine.popup(0).fire(&EngineEvent::new("close"));
        assert_eq!(calls.get(), 1);
        assert!(add_listener(&info_window, "click", |_: &EventArgs| {}).is_none());
    }
}
