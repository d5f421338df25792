//! Static translation tables between the source API's vocabulary and the
//! rendering engine's.
//!
//! Two tables live here: control positions, and per-kind event bindings. An
//! event binding records everything the dispatcher in [`crate::events`] needs:
//! the engine event name, whether the handler receives a mouse payload, and
//! whether the event is wired through the engine's `on`/`off` or directly on a
//! marker's element.
use serde::{Deserialize, Serialize};

/// Named positions for map UI controls
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlPosition {
    TopLeft,
    TopCenter,
    TopRight,
    LeftTop,
    LeftCenter,
    LeftBottom,
    RightTop,
    RightCenter,
    RightBottom,
    BottomLeft,
    BottomCenter,
    BottomRight,
    BlockStartInlineStart,
    BlockStartInlineCenter,
    BlockStartInlineEnd,
    InlineStartBlockStart,
    InlineStartBlockCenter,
    InlineStartBlockEnd,
    InlineEndBlockStart,
    InlineEndBlockCenter,
    InlineEndBlockEnd,
    BlockEndInlineStart,
    BlockEndInlineCenter,
    BlockEndInlineEnd,
}

pub const TOP_LEFT: &str = "top-left";
pub const TOP_RIGHT: &str = "top-right";
pub const BOTTOM_LEFT: &str = "bottom-left";
pub const BOTTOM_RIGHT: &str = "bottom-right";

impl ControlPosition {
    /// The engine's position token, or `None` for centered positions the
    /// engine cannot place a control at.
    ///
    /// Logical positions assume a left-to-right, top-to-bottom layout.
    pub fn to_engine(self) -> Option<&'static str> {
        use ControlPosition::*;
        match self {
            TopLeft | LeftTop | BlockStartInlineStart | InlineStartBlockStart => Some(TOP_LEFT),
            TopRight | RightTop | BlockStartInlineEnd | InlineEndBlockStart => Some(TOP_RIGHT),
            BottomLeft | LeftBottom | BlockEndInlineStart | InlineStartBlockEnd => {
                Some(BOTTOM_LEFT)
            }
            BottomRight | RightBottom | BlockEndInlineEnd | InlineEndBlockEnd => {
                Some(BOTTOM_RIGHT)
            }
            TopCenter | LeftCenter | RightCenter | BottomCenter | BlockStartInlineCenter
            | InlineStartBlockCenter | InlineEndBlockCenter | BlockEndInlineCenter => None,
        }
    }

    /// The canonical source position for an engine token
    pub fn from_engine(token: &str) -> Option<ControlPosition> {
        match token {
            TOP_LEFT => Some(ControlPosition::TopLeft),
            TOP_RIGHT => Some(ControlPosition::TopRight),
            BOTTOM_LEFT => Some(ControlPosition::BottomLeft),
            BOTTOM_RIGHT => Some(ControlPosition::BottomRight),
            _ => None,
        }
    }
}

/// The kinds of object the event dispatcher knows how to wire
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InstanceKind {
    Map,
    Marker,
    InfoWindow,
}

/// What a translated handler receives
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    None,
    Mouse,
}

/// Which subscription primitive an event goes through
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Wiring {
    /// The engine object's own `on`/`once`/`off`
    Engine,
    /// `add_event_listener`/`remove_event_listener` on the marker element
    Element,
}

/// One row of an event table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventBinding {
    pub source: &'static str,
    pub target: &'static str,
    pub payload: Payload,
    pub wiring: Wiring,
    /// Stop the raw event before it reaches the map underneath
    pub stop_propagation: bool,
}

const fn engine(source: &'static str, target: &'static str, payload: Payload) -> EventBinding {
    EventBinding {
        source,
        target,
        payload,
        wiring: Wiring::Engine,
        stop_propagation: false,
    }
}

const fn element(source: &'static str, target: &'static str, stop: bool) -> EventBinding {
    EventBinding {
        source,
        target,
        payload: Payload::Mouse,
        wiring: Wiring::Element,
        stop_propagation: stop,
    }
}

pub const CLICK: &str = "click";
pub const DBLCLICK: &str = "dblclick";
pub const CONTEXTMENU: &str = "contextmenu";
pub const MOUSEMOVE: &str = "mousemove";
pub const MOUSEOUT: &str = "mouseout";
pub const MOUSEOVER: &str = "mouseover";
pub const DRAG: &str = "drag";
pub const DRAGSTART: &str = "dragstart";
pub const DRAGEND: &str = "dragend";
pub const BOUNDS_CHANGED: &str = "bounds_changed";
pub const CENTER_CHANGED: &str = "center_changed";
pub const HEADING_CHANGED: &str = "heading_changed";
pub const TILT_CHANGED: &str = "tilt_changed";
pub const ZOOM_CHANGED: &str = "zoom_changed";
pub const IDLE: &str = "idle";
pub const CLOSECLICK: &str = "closeclick";
pub const CLOSE: &str = "close";

static MAP_EVENTS: [EventBinding; 15] = [
    engine(CLICK, "click", Payload::Mouse),
    engine(DBLCLICK, "dblclick", Payload::Mouse),
    engine(CONTEXTMENU, "contextmenu", Payload::Mouse),
    engine(MOUSEMOVE, "mousemove", Payload::Mouse),
    engine(MOUSEOUT, "mouseout", Payload::Mouse),
    engine(MOUSEOVER, "mouseover", Payload::Mouse),
    engine(DRAG, "drag", Payload::None),
    engine(DRAGSTART, "dragstart", Payload::None),
    engine(DRAGEND, "dragend", Payload::None),
    engine(BOUNDS_CHANGED, "moveend", Payload::None),
    engine(CENTER_CHANGED, "move", Payload::None),
    engine(HEADING_CHANGED, "rotate", Payload::None),
    engine(TILT_CHANGED, "pitch", Payload::None),
    engine(ZOOM_CHANGED, "zoom", Payload::None),
    engine(IDLE, "idle", Payload::None),
];

static MARKER_EVENTS: [EventBinding; 8] = [
    element(CLICK, "click", true),
    element(DBLCLICK, "dblclick", true),
    element(CONTEXTMENU, "contextmenu", false),
    element(MOUSEOVER, "mouseenter", false),
    element(MOUSEOUT, "mouseleave", false),
    engine(DRAG, "drag", Payload::Mouse),
    engine(DRAGSTART, "dragstart", Payload::Mouse),
    engine(DRAGEND, "dragend", Payload::Mouse),
];

static INFO_WINDOW_EVENTS: [EventBinding; 2] = [
    engine(CLOSECLICK, "close", Payload::None),
    engine(CLOSE, "close", Payload::None),
];

/// Every event supported on `kind`
pub fn supported_events(kind: InstanceKind) -> &'static [EventBinding] {
    match kind {
        InstanceKind::Map => &MAP_EVENTS,
        InstanceKind::Marker => &MARKER_EVENTS,
        InstanceKind::InfoWindow => &INFO_WINDOW_EVENTS,
    }
}

/// Look up a source event name for `kind`
pub fn lookup(kind: InstanceKind, source: &str) -> Option<&'static EventBinding> {
    supported_events(kind)
        .iter()
        .find(|binding| binding.source == source)
}

/// The first source event name bound to an engine event for `kind`
pub fn source_event(kind: InstanceKind, target: &str) -> Option<&'static str> {
    supported_events(kind)
        .iter()
        .find(|binding| binding.target == target)
        .map(|binding| binding.source)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn corner_positions_round_trip() {
        for position in [
            ControlPosition::TopLeft,
            ControlPosition::TopRight,
            ControlPosition::BottomLeft,
            ControlPosition::BottomRight,
        ] {
            let token = position.to_engine().unwrap();
            assert_eq!(ControlPosition::from_engine(token), Some(position));
        }
    }

    #[test]
    fn side_positions_fold_into_corners() {
        assert_eq!(ControlPosition::LeftTop.to_engine(), Some(TOP_LEFT));
        assert_eq!(ControlPosition::RightBottom.to_engine(), Some(BOTTOM_RIGHT));
        assert_eq!(
            ControlPosition::InlineEndBlockStart.to_engine(),
            Some(TOP_RIGHT)
        );
        assert_eq!(ControlPosition::TopCenter.to_engine(), None);
        assert_eq!(ControlPosition::from_engine("center"), None);
    }

    #[test]
    fn positions_use_source_names_on_the_wire() {
        let json = serde_json::to_string(&ControlPosition::RightBottom).unwrap();
        assert_eq!(json, "\"RIGHT_BOTTOM\"");
    }

    #[test]
    fn map_event_classification() {
        let click = lookup(InstanceKind::Map, "click").unwrap();
        assert_eq!(click.payload, Payload::Mouse);
        assert_eq!(click.wiring, Wiring::Engine);
        let zoom = lookup(InstanceKind::Map, "zoom_changed").unwrap();
        assert_eq!(zoom.target, "zoom");
        assert_eq!(zoom.payload, Payload::None);
        assert_eq!(lookup(InstanceKind::Map, "tilt_changed").unwrap().target, "pitch");
        assert!(lookup(InstanceKind::Map, "closeclick").is_none());
    }

    #[test]
    fn marker_pointer_events_go_through_the_element() {
        for name in ["click", "dblclick", "contextmenu"] {
            let binding = lookup(InstanceKind::Marker, name).unwrap();
            assert_eq!(binding.wiring, Wiring::Element);
            assert_eq!(binding.payload, Payload::Mouse);
        }
        assert!(lookup(InstanceKind::Marker, "click").unwrap().stop_propagation);
        assert!(lookup(InstanceKind::Marker, "dblclick").unwrap().stop_propagation);
        assert!(!lookup(InstanceKind::Marker, "contextmenu").unwrap().stop_propagation);
        assert_eq!(
            lookup(InstanceKind::Marker, "dragend").unwrap().wiring,
            Wiring::Engine
        );
    }

    #[test]
    fn reverse_lookup() {
        assert_eq!(source_event(InstanceKind::Map, "rotate"), Some("heading_changed"));
        assert_eq!(source_event(InstanceKind::InfoWindow, "close"), Some("closeclick"));
        assert_eq!(source_event(InstanceKind::Marker, "mouseenter"), Some("mouseover"));
        assert_eq!(source_event(InstanceKind::Map, "render"), None);
    }
}
