// Replay a scripted interaction one event at a time
//
// Renders the starting state and then a frame after each event, so a drag
// scripted as a run of pointer moves comes out as an animation.

use image::RgbImage;
use json::JsonValue;
use log::info;

use crate::newton_raphson::Session;

pub fn make_frames(input : &JsonValue) -> std::io::Result<Vec<RgbImage>> {
    let base = &input["base"];
    // Only render every nth event, the final state is always included
    let every = input["frame_every"].as_usize().unwrap_or(1).max(1);
    let mut session = Session::from_json(base)?;
    let events = session.events().to_vec();
    let mut frames = vec!(session.render()?);
    for (i, event) in events.iter().enumerate() {
        session.apply(event)?;
        if (i + 1) % every == 0 || i + 1 == events.len() {
            info!("Rendering frame after event {} of {}", i + 1, events.len());
            frames.push(session.render()?);
        }
    }
    Ok(frames)
}
