//! In-memory stand-ins for the rendering engine and the location backend.
use crate::async_impl::{LocationBackend, ServiceContext};
use crate::engine::{
    lng_lat, DomElement, DomEvent, DomListener, EngineControl, EngineEvent, EngineListener,
    EngineMapOptions, EngineMarkerOptions, EnginePopupOptions, Evented, LngLat, LngLatBounds,
    MapEngine, MarkerEngine, PopupEngine, RenderingEngine,
};
use crate::error::LocationError;
use crate::shared::location::{
    CalculateRouteRequest, CalculateRouteResponse, GetPlaceRequest, GetPlaceResponse, Place,
    PlaceGeometry, SearchPlaceIndexForPositionRequest, SearchPlaceIndexForSuggestionsRequest,
    SearchPlaceIndexForSuggestionsResponse, SearchPlaceIndexForTextRequest,
    SearchPlaceIndexResponse, SearchResult, SuggestionResult,
};
use async_trait::async_trait;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

struct Entry<T: ?Sized> {
    event: String,
    listener: Rc<T>,
    once: bool,
}

/// Listeners keyed by event name, removed by pointer identity
struct ListenerSet<T: ?Sized> {
    entries: RefCell<Vec<Entry<T>>>,
}

impl<T: ?Sized> Default for ListenerSet<T> {
    fn default() -> Self {
        ListenerSet {
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<T: ?Sized> ListenerSet<T> {
    fn add(&self, event: &str, listener: Rc<T>, once: bool) {
        self.entries.borrow_mut().push(Entry {
            event: event.to_string(),
            listener,
            once,
        });
    }

    fn remove(&self, event: &str, listener: &Rc<T>) {
        let target = Rc::as_ptr(listener) as *const u8;
        self.entries.borrow_mut().retain(|entry| {
            !(entry.event == event && Rc::as_ptr(&entry.listener) as *const u8 == target)
        });
    }

    /// Listeners to invoke for `event`; once-listeners are dropped here
    fn take(&self, event: &str) -> Vec<Rc<T>> {
        let mut entries = self.entries.borrow_mut();
        let matching: Vec<Rc<T>> = entries
            .iter()
            .filter(|entry| entry.event == event)
            .map(|entry| entry.listener.clone())
            .collect();
        entries.retain(|entry| !(entry.event == event && entry.once));
        matching
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

type EngineListeners = ListenerSet<dyn Fn(&EngineEvent)>;

macro_rules! evented {
    ($name:ident) => {
        impl Evented for $name {
            fn on(&self, event: &str, listener: EngineListener) {
                self.listeners.add(event, listener, false);
            }

            fn once(&self, event: &str, listener: EngineListener) {
                self.listeners.add(event, listener, true);
            }

            fn off(&self, event: &str, listener: &EngineListener) {
                self.listeners.remove(event, listener);
            }
        }

        impl $name {
            /// Emit `event` as the engine would
            pub fn fire(&self, event: &EngineEvent) {
                for listener in self.listeners.take(&event.kind) {
                    listener(event);
                }
            }

            pub fn listener_count(&self) -> usize {
                self.listeners.len()
            }
        }
    };
}

pub struct HeadlessMap {
    pub options: EngineMapOptions,
    listeners: EngineListeners,
    pub center: Cell<LngLat>,
    pub zoom: Cell<f64>,
    pub bearing: Cell<f64>,
    pub pitch: Cell<f64>,
    pub bounds: Cell<LngLatBounds>,
    pub controls: RefCell<Vec<(EngineControl, &'static str)>>,
    pub sources: RefCell<HashMap<String, Value>>,
    pub layers: RefCell<Vec<Value>>,
    pub fitted: RefCell<Vec<LngLatBounds>>,
}

impl HeadlessMap {
    fn new(options: &EngineMapOptions) -> HeadlessMap {
        let center = options.center;
        HeadlessMap {
            options: options.clone(),
            listeners: EngineListeners::default(),
            center: Cell::new(center),
            zoom: Cell::new(options.zoom),
            bearing: Cell::new(options.bearing),
            pitch: Cell::new(options.pitch),
            bounds: Cell::new(LngLatBounds::new(
                lng_lat(center.x - 1.0, center.y - 1.0),
                lng_lat(center.x + 1.0, center.y + 1.0),
            )),
            controls: RefCell::new(options.controls.clone()),
            sources: RefCell::new(HashMap::new()),
            layers: RefCell::new(Vec::new()),
            fitted: RefCell::new(Vec::new()),
        }
    }

    pub fn layer_ids(&self) -> Vec<String> {
        self.layers
            .borrow()
            .iter()
            .filter_map(|layer| layer["id"].as_str().map(str::to_string))
            .collect()
    }
}

evented!(HeadlessMap);

impl MapEngine for HeadlessMap {
    fn get_center(&self) -> LngLat {
        self.center.get()
    }

    fn set_center(&self, center: LngLat) {
        self.center.set(center);
    }

    fn get_zoom(&self) -> f64 {
        self.zoom.get()
    }

    fn set_zoom(&self, zoom: f64) {
        self.zoom.set(zoom);
    }

    fn get_bearing(&self) -> f64 {
        self.bearing.get()
    }

    fn set_bearing(&self, bearing: f64) {
        self.bearing.set(bearing);
    }

    fn get_pitch(&self) -> f64 {
        self.pitch.get()
    }

    fn set_pitch(&self, pitch: f64) {
        self.pitch.set(pitch);
    }

    fn get_bounds(&self) -> LngLatBounds {
        self.bounds.get()
    }

    fn fit_bounds(&self, bounds: &LngLatBounds, _padding: f64) {
        self.bounds.set(*bounds);
        self.center.set(bounds.center());
        self.fitted.borrow_mut().push(*bounds);
    }

    fn pan_to(&self, center: LngLat) {
        self.center.set(center);
    }

    fn add_control(&self, control: EngineControl, position: &'static str) {
        self.controls.borrow_mut().push((control, position));
    }

    fn add_source(&self, id: &str, source: Value) {
        self.sources.borrow_mut().insert(id.to_string(), source);
    }

    fn remove_source(&self, id: &str) {
        self.sources.borrow_mut().remove(id);
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.borrow().contains_key(id)
    }

    fn add_layer(&self, layer: Value) {
        self.layers.borrow_mut().push(layer);
    }

    fn remove_layer(&self, id: &str) {
        self.layers
            .borrow_mut()
            .retain(|layer| layer["id"].as_str() != Some(id));
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers
            .borrow()
            .iter()
            .any(|layer| layer["id"].as_str() == Some(id))
    }
}

#[derive(Default)]
pub struct HeadlessElement {
    listeners: ListenerSet<dyn Fn(&Rc<DomEvent>)>,
}

impl HeadlessElement {
    pub fn dispatch(&self, kind: &str, event: &Rc<DomEvent>) {
        for listener in self.listeners.take(kind) {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl DomElement for HeadlessElement {
    fn add_event_listener(&self, kind: &str, listener: DomListener, once: bool) {
        self.listeners.add(kind, listener, once);
    }

    fn remove_event_listener(&self, kind: &str, listener: &DomListener) {
        self.listeners.remove(kind, listener);
    }
}

pub struct HeadlessMarker {
    pub options: EngineMarkerOptions,
    listeners: EngineListeners,
    pub lng_lat: Cell<LngLat>,
    pub draggable: Cell<bool>,
    pub opacity: Cell<f64>,
    pub element: Rc<HeadlessElement>,
    pub attached: Cell<bool>,
}

evented!(HeadlessMarker);

impl MarkerEngine for HeadlessMarker {
    fn get_lng_lat(&self) -> LngLat {
        self.lng_lat.get()
    }

    fn set_lng_lat(&self, lng_lat: LngLat) {
        self.lng_lat.set(lng_lat);
    }

    fn is_draggable(&self) -> bool {
        self.draggable.get()
    }

    fn set_draggable(&self, draggable: bool) {
        self.draggable.set(draggable);
    }

    fn set_opacity(&self, opacity: f64) {
        self.opacity.set(opacity);
    }

    fn element(&self) -> Rc<dyn DomElement> {
        self.element.clone()
    }

    fn add_to(&self, _map: &Rc<dyn MapEngine>) {
        self.attached.set(true);
    }

    fn remove(&self) {
        self.attached.set(false);
    }
}

pub struct HeadlessPopup {
    pub options: EnginePopupOptions,
    listeners: EngineListeners,
    pub html: RefCell<String>,
    pub lng_lat: Cell<Option<LngLat>>,
    pub max_width: RefCell<Option<String>>,
    pub open: Cell<bool>,
}

evented!(HeadlessPopup);

impl PopupEngine for HeadlessPopup {
    fn set_html(&self, html: &str) {
        *self.html.borrow_mut() = html.to_string();
    }

    fn get_lng_lat(&self) -> Option<LngLat> {
        self.lng_lat.get()
    }

    fn set_lng_lat(&self, lng_lat: LngLat) {
        self.lng_lat.set(Some(lng_lat));
    }

    fn set_max_width(&self, max_width: &str) {
        *self.max_width.borrow_mut() = Some(max_width.to_string());
    }

    fn add_to(&self, _map: &Rc<dyn MapEngine>) {
        self.open.set(true);
    }

    fn remove(&self) {
        if self.open.replace(false) {
            self.fire(&EngineEvent::new("close"));
        }
    }

    fn is_open(&self) -> bool {
        self.open.get()
    }
}

/// Records every object it creates so tests can reach the engine side
#[derive(Default)]
pub struct HeadlessEngine {
    maps: RefCell<Vec<Rc<HeadlessMap>>>,
    markers: RefCell<Vec<Rc<HeadlessMarker>>>,
    popups: RefCell<Vec<Rc<HeadlessPopup>>>,
}

impl HeadlessEngine {
    pub fn map(&self, index: usize) -> Rc<HeadlessMap> {
        self.maps.borrow()[index].clone()
    }

    pub fn marker(&self, index: usize) -> Rc<HeadlessMarker> {
        self.markers.borrow()[index].clone()
    }

    pub fn popup(&self, index: usize) -> Rc<HeadlessPopup> {
        self.popups.borrow()[index].clone()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.borrow().len()
    }

    /// Markers currently attached to a map
    pub fn attached_markers(&self) -> usize {
        self.markers
            .borrow()
            .iter()
            .filter(|marker| marker.attached.get())
            .count()
    }
}

impl RenderingEngine for HeadlessEngine {
    fn create_map(&self, options: &EngineMapOptions) -> Rc<dyn MapEngine> {
        let map = Rc::new(HeadlessMap::new(options));
        self.maps.borrow_mut().push(map.clone());
        map
    }

    fn create_marker(&self, options: &EngineMarkerOptions) -> Rc<dyn MarkerEngine> {
        let marker = Rc::new(HeadlessMarker {
            options: options.clone(),
            listeners: EngineListeners::default(),
            lng_lat: Cell::new(options.lng_lat.unwrap_or_else(|| lng_lat(0.0, 0.0))),
            draggable: Cell::new(options.draggable),
            opacity: Cell::new(options.opacity.unwrap_or(1.0)),
            element: Rc::new(HeadlessElement::default()),
            attached: Cell::new(false),
        });
        self.markers.borrow_mut().push(marker.clone());
        marker
    }

    fn create_popup(&self, options: &EnginePopupOptions) -> Rc<dyn PopupEngine> {
        let popup = Rc::new(HeadlessPopup {
            options: options.clone(),
            listeners: EngineListeners::default(),
            html: RefCell::new(options.html.clone().unwrap_or_default()),
            lng_lat: Cell::new(options.lng_lat),
            max_width: RefCell::new(options.max_width.clone()),
            open: Cell::new(false),
        });
        self.popups.borrow_mut().push(popup.clone());
        popup
    }
}

/// A backend call as the fake backend received it
#[derive(Clone, Debug, PartialEq)]
pub enum BackendCall {
    Position(SearchPlaceIndexForPositionRequest),
    Text(SearchPlaceIndexForTextRequest),
    Suggestions(SearchPlaceIndexForSuggestionsRequest),
    GetPlace(GetPlaceRequest),
    Route(CalculateRouteRequest),
}

/// A scripted location backend
#[derive(Default)]
pub struct FakeBackend {
    calls: RefCell<Vec<BackendCall>>,
    pub text_results: RefCell<Vec<SearchResult>>,
    pub position_results: RefCell<Vec<SearchResult>>,
    pub suggestions: RefCell<Vec<SuggestionResult>>,
    pub places: RefCell<HashMap<String, Place>>,
    pub route: RefCell<Option<CalculateRouteResponse>>,
    /// Reject every call
    pub fail: Cell<bool>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn context(self: &Rc<Self>) -> ServiceContext {
        let backend: Rc<dyn LocationBackend> = self.clone();
        ServiceContext::new(backend, "test.index", "test.calculator")
    }

    fn record(&self, operation: &'static str, call: BackendCall) -> Result<(), LocationError> {
        self.calls.borrow_mut().push(call);
        if self.fail.get() {
            return Err(LocationError::Rejected {
                operation,
                message: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

/// A record with a label and a point
pub fn place(label: &str, lng: f64, lat: f64) -> Place {
    Place {
        label: Some(label.to_string()),
        geometry: PlaceGeometry {
            point: Some([lng, lat]),
            bounding_box: None,
        },
        ..Default::default()
    }
}

pub fn search_result(place_id: &str, place: Place) -> SearchResult {
    SearchResult {
        place,
        place_id: Some(place_id.to_string()),
        distance: None,
        relevance: Some(1.0),
    }
}

#[async_trait(?Send)]
impl LocationBackend for FakeBackend {
    async fn search_place_index_for_position(
        &self,
        request: &SearchPlaceIndexForPositionRequest,
    ) -> Result<SearchPlaceIndexResponse, LocationError> {
        self.record("SearchPlaceIndexForPosition", BackendCall::Position(request.clone()))?;
        Ok(SearchPlaceIndexResponse {
            results: self.position_results.borrow().clone(),
        })
    }

    async fn search_place_index_for_text(
        &self,
        request: &SearchPlaceIndexForTextRequest,
    ) -> Result<SearchPlaceIndexResponse, LocationError> {
        self.record("SearchPlaceIndexForText", BackendCall::Text(request.clone()))?;
        Ok(SearchPlaceIndexResponse {
            results: self.text_results.borrow().clone(),
        })
    }

    async fn search_place_index_for_suggestions(
        &self,
        request: &SearchPlaceIndexForSuggestionsRequest,
    ) -> Result<SearchPlaceIndexForSuggestionsResponse, LocationError> {
        self.record("SearchPlaceIndexForSuggestions", BackendCall::Suggestions(request.clone()))?;
        Ok(SearchPlaceIndexForSuggestionsResponse {
            results: self.suggestions.borrow().clone(),
        })
    }

    async fn get_place(
        &self,
        request: &GetPlaceRequest,
    ) -> Result<GetPlaceResponse, LocationError> {
        self.record("GetPlace", BackendCall::GetPlace(request.clone()))?;
        match self.places.borrow().get(&request.place_id) {
            Some(place) => Ok(GetPlaceResponse {
                place: place.clone(),
            }),
            None => Err(LocationError::Rejected {
                operation: "GetPlace",
                message: format!("no place `{}`", request.place_id),
            }),
        }
    }

    async fn calculate_route(
        &self,
        request: &CalculateRouteRequest,
    ) -> Result<CalculateRouteResponse, LocationError> {
        self.record("CalculateRoute", BackendCall::Route(request.clone()))?;
        Ok(self.route.borrow().clone().unwrap_or_default())
    }
}
