// Make an image out of newton raphson root finding for a polynomial given
// by its roots
//
// The roots live in a root state which can be poked with pointer events
// the same way an interactive front end would. Each pixel is coloured by
// the root it converges to and how long that took.

use std::io::{Error, ErrorKind};

use image::RgbImage;
use json::JsonValue;
use log::{debug, info};

pub mod classify;
pub mod colour;
pub mod complex;
pub mod error;
pub mod frame;
pub mod input;
pub mod markers;
pub mod polynomial;
pub mod render;
pub mod roots;
pub mod viewport;

use frame::{FrameSlot, FrameUniforms};
use input::{parse_events, ScriptEvent};
use markers::MarkerLayer;
use render::{render_frame, RenderSettings};
use roots::{RootState, RootStateSettings};

// Extra slack around a marker when hit testing scripted pointer events
const HIT_SLACK : f64 = 2.0;

// A root state wired up to a frame slot and marker layer, plus the
// scripted events to feed it.
pub struct Session {
    state : RootState,
    frames : FrameSlot,
    markers : MarkerLayer,
    settings : RenderSettings,
    events : Vec<ScriptEvent>
}

impl Session {
    pub fn from_json(input : &JsonValue) -> std::io::Result<Session> {
        let root_settings = RootStateSettings::from_json(input)?;
        let settings = RenderSettings::from_json(input);
        let mut state = RootState::new(&root_settings)?;
        let frames = FrameSlot::new();
        let markers = MarkerLayer::new();
        state.set_consumer(Box::new(frames.clone()));
        state.set_view(Box::new(markers.clone()));
        let events = parse_events(&input["events"]);
        info!(
            "Session with {} roots and {} scripted events",
            state.roots().len(),
            events.len()
        );
        Ok(Session { state, frames, markers, settings, events })
    }

    pub fn events(&self) -> &[ScriptEvent] {
        &self.events
    }

    pub fn state(&self) -> &RootState {
        &self.state
    }

    pub fn apply(&mut self, event : &ScriptEvent) -> std::io::Result<()> {
        let hit_radius = self.settings.marker_radius as f64 + HIT_SLACK;
        let input = event.resolve(&self.state, hit_radius);
        debug!("Applying {:?}", input);
        self.state.handle_event(&input)?;
        Ok(())
    }

    pub fn apply_all(&mut self) -> std::io::Result<()> {
        let events = self.events.clone();
        for event in events.iter() {
            self.apply(event)?;
        }
        Ok(())
    }

    fn latest_frame(&self) -> std::io::Result<std::sync::Arc<frame::FrameState>> {
        self.frames.latest().ok_or(
            Error::new(ErrorKind::InvalidData, "Nothing has been published to render")
        )
    }

    // Render the most recently published frame.
    pub fn render(&self) -> std::io::Result<RgbImage> {
        let frame = self.latest_frame()?;
        debug!("Rendering after {} published frames", self.frames.published_count());
        let mut img = render_frame(&frame, &self.settings.classifier, self.settings.mode)?;
        if self.settings.markers {
            self.markers.draw(&mut img, self.settings.marker_radius);
        }
        Ok(img)
    }

    // Byte layout a gpu shader would be handed for the latest frame
    pub fn uniforms(&self) -> std::io::Result<FrameUniforms> {
        let frame = self.latest_frame()?;
        Ok(FrameUniforms::from_frame(&frame))
    }
}

pub fn generate(input : &JsonValue) -> std::io::Result<RgbImage> {
    info!("Generating newton raphson image");
    let mut session = Session::from_json(input)?;
    session.apply_all()?;
    session.render()
}

pub fn final_uniforms(input : &JsonValue) -> std::io::Result<Vec<u8>> {
    let mut session = Session::from_json(input)?;
    session.apply_all()?;
    Ok(session.uniforms()?.as_bytes().to_vec())
}
