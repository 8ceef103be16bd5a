// Pointer and window events coming in from whatever hosts the fractal
//
// Hosts hand over screen positions plus which marker, if any, the event
// landed on. Scripts loaded from json name markers by index or leave it to
// a hit test against the current marker positions.

use cgmath::{point2, Point2};
use json::JsonValue;
use log::warn;

use super::error::FractalError;
use super::roots::{RootId, RootState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { target : Option<RootId>, x : f64, y : f64 },
    PointerMove { x : f64, y : f64 },
    PointerUp,
    PointerCancel,
    DoubleClick { target : Option<RootId>, x : f64, y : f64 },
    Resize { width : u32, height : u32 }
}

impl RootState {
    // Apply one input event.
    //
    // Only a resize to an unusable size is an error, everything else that
    // doesn't make sense in the current state is ignored.
    pub fn handle_event(&mut self, event : &InputEvent) -> Result<(), FractalError> {
        match *event {
            InputEvent::PointerDown { target: Some(id), x, y } => {
                self.begin_drag(id, point2(x, y));
            },
            InputEvent::PointerDown { target: None, .. } => {},
            InputEvent::PointerMove { x, y } => {
                self.update_drag(point2(x, y));
            },
            InputEvent::PointerUp => self.end_drag(),
            InputEvent::PointerCancel => self.cancel_drag(),
            InputEvent::DoubleClick { target: Some(id), .. } => {
                self.remove_root(id);
            },
            InputEvent::DoubleClick { target: None, x, y } => {
                self.add_root_at(point2(x, y));
            },
            InputEvent::Resize { width, height } => self.resize(width, height)?
        }
        Ok(())
    }
}

// How a scripted event picks its marker
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptTarget {
    Index(usize),
    HitTest
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptEvent {
    PointerDown { target : ScriptTarget, position : Point2<f64> },
    PointerMove { position : Point2<f64> },
    PointerUp,
    PointerCancel,
    DoubleClick { target : ScriptTarget, position : Point2<f64> },
    Resize { width : u32, height : u32 }
}

fn parse_position(input : &JsonValue) -> Option<Point2<f64>> {
    Some(point2(input["x"].as_f64()?, input["y"].as_f64()?))
}

fn parse_target(input : &JsonValue) -> ScriptTarget {
    input["root"].as_usize().map(ScriptTarget::Index).unwrap_or(ScriptTarget::HitTest)
}

impl ScriptEvent {
    pub fn from_json(input : &JsonValue) -> Option<ScriptEvent> {
        match input["type"].as_str()? {
            "pointer_down" => Some(ScriptEvent::PointerDown {
                target : parse_target(input),
                position : parse_position(input)?
            }),
            "pointer_move" => Some(ScriptEvent::PointerMove { position: parse_position(input)? }),
            "pointer_up" => Some(ScriptEvent::PointerUp),
            "pointer_cancel" => Some(ScriptEvent::PointerCancel),
            "double_click" => Some(ScriptEvent::DoubleClick {
                target : parse_target(input),
                position : parse_position(input)?
            }),
            "resize" => Some(ScriptEvent::Resize {
                width : input["width"].as_u32()?,
                height : input["height"].as_u32()?
            }),
            _ => None
        }
    }

    // Turn into an input event against the markers as they are right now.
    pub fn resolve(&self, state : &RootState, hit_radius : f64) -> InputEvent {
        let find = |target : ScriptTarget, position : Point2<f64>| match target {
            ScriptTarget::Index(i) => state.roots().get(i).map(|root| root.id),
            ScriptTarget::HitTest => state.marker_at(position, hit_radius)
        };
        match *self {
            ScriptEvent::PointerDown { target, position } => InputEvent::PointerDown {
                target : find(target, position),
                x : position.x,
                y : position.y
            },
            ScriptEvent::PointerMove { position } => InputEvent::PointerMove { x: position.x, y: position.y },
            ScriptEvent::PointerUp => InputEvent::PointerUp,
            ScriptEvent::PointerCancel => InputEvent::PointerCancel,
            ScriptEvent::DoubleClick { target, position } => InputEvent::DoubleClick {
                target : find(target, position),
                x : position.x,
                y : position.y
            },
            ScriptEvent::Resize { width, height } => InputEvent::Resize { width, height }
        }
    }
}

pub fn parse_events(input : &JsonValue) -> Vec<ScriptEvent> {
    input.members().enumerate().filter_map(
        |(i, value)| {
            let event = ScriptEvent::from_json(value);
            if event.is_none() {
                warn!("Skipping malformed event {}: {}", i, value.dump());
            }
            event
        }
    ).collect()
}
