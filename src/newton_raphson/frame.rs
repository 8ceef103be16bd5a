// Snapshot of everything a renderer needs for one frame
//
// Built in one go after every mutation of the root state and never changed
// afterwards, so a render tick either sees the whole of an update or none
// of it.

use std::sync::{Arc, Mutex};

use bytemuck::{Pod, Zeroable};
use image::Rgb;

use super::complex::Complex64;
use super::viewport::{CoordinateMapper, Viewport};
use super::error::FractalError;

// Upper bound on the roots a frame can carry, fixed by the uniform layout
pub const MAX_FRAME_ROOTS : usize = 16;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    pub resolution : (u32, u32),
    pub aspect_ratio : f64,
    pub zoom : f64,
    pub centre : Complex64,
    pub roots : Vec<Complex64>,
    pub colours : Vec<Rgb<f32>>
}

impl FrameState {
    // Roots past the cap are dropped together with their colours
    pub fn new(
        resolution : (u32, u32),
        viewport : &Viewport,
        roots : Vec<Complex64>,
        colours : Vec<Rgb<f32>>
    ) -> FrameState {
        let count = roots.len().min(colours.len()).min(MAX_FRAME_ROOTS);
        let mut roots = roots;
        let mut colours = colours;
        roots.truncate(count);
        colours.truncate(count);
        FrameState {
            resolution,
            aspect_ratio : viewport.aspect_ratio,
            zoom : viewport.zoom,
            centre : viewport.centre,
            roots,
            colours
        }
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport { zoom: self.zoom, centre: self.centre, aspect_ratio: self.aspect_ratio }
    }

    pub fn mapper(&self) -> Result<CoordinateMapper, FractalError> {
        CoordinateMapper::new(
            &self.viewport(),
            self.resolution.0 as f64,
            self.resolution.1 as f64
        )
    }
}

// Receives every published frame.
pub trait FrameConsumer {
    fn publish(&mut self, frame : Arc<FrameState>);
}

// Holds the most recently published frame.
//
// Clones share the same slot so one handle can be given to the root state
// and another kept by whatever draws.
#[derive(Clone, Default)]
pub struct FrameSlot {
    latest : Arc<Mutex<Option<Arc<FrameState>>>>,
    published : Arc<Mutex<usize>>
}

impl FrameSlot {
    pub fn new() -> FrameSlot {
        FrameSlot::default()
    }

    pub fn latest(&self) -> Option<Arc<FrameState>> {
        self.latest.lock().ok().and_then(|latest| latest.clone())
    }

    pub fn published_count(&self) -> usize {
        self.published.lock().map(|count| *count).unwrap_or(0)
    }
}

impl FrameConsumer for FrameSlot {
    fn publish(&mut self, frame : Arc<FrameState>) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(frame);
        }
        if let Ok(mut count) = self.published.lock() {
            *count += 1;
        }
    }
}

// std140 style layout, every vector padded out to 16 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub resolution : [f32; 2],
    pub aspect_ratio : f32,
    pub zoom : f32,
    pub centre : [f32; 2],
    pub root_count : u32,
    pub _padding : u32,
    pub roots : [[f32; 4]; MAX_FRAME_ROOTS],
    pub colours : [[f32; 4]; MAX_FRAME_ROOTS]
}

impl FrameUniforms {
    pub fn from_frame(frame : &FrameState) -> FrameUniforms {
        let mut uniforms = FrameUniforms::zeroed();
        uniforms.resolution = [frame.resolution.0 as f32, frame.resolution.1 as f32];
        uniforms.aspect_ratio = frame.aspect_ratio as f32;
        uniforms.zoom = frame.zoom as f32;
        uniforms.centre = [frame.centre.re as f32, frame.centre.im as f32];
        uniforms.root_count = frame.root_count() as u32;
        for (slot, root) in uniforms.roots.iter_mut().zip(frame.roots.iter()) {
            *slot = [root.re as f32, root.im as f32, 0.0, 0.0];
        }
        for (slot, colour) in uniforms.colours.iter_mut().zip(frame.colours.iter()) {
            *slot = [colour.0[0], colour.0[1], colour.0[2], 1.0];
        }
        uniforms
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::complex::complex;
    use super::super::colour::generate_colours;

    fn sample_frame(count : usize) -> FrameState {
        let roots = (0..count).map(|i| complex(i as f64, -(i as f64))).collect();
        FrameState::new((640, 480), &Viewport::default(), roots, generate_colours(count))
    }

    #[test]
    fn test_uniform_layout_size() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 544);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
        let frame = sample_frame(3);
        assert_eq!(FrameUniforms::from_frame(&frame).as_bytes().len(), 544);
    }

    #[test]
    fn test_uniforms_carry_roots_and_colours() {
        let frame = sample_frame(3);
        let uniforms = FrameUniforms::from_frame(&frame);
        assert_eq!(uniforms.root_count, 3);
        assert_eq!(uniforms.resolution, [640.0, 480.0]);
        assert_eq!(uniforms.roots[2], [2.0, -2.0, 0.0, 0.0]);
        assert_eq!(uniforms.colours[0][3], 1.0);
        // Unused slots stay zeroed
        assert_eq!(uniforms.roots[3], [0.0; 4]);
        assert_eq!(uniforms.colours[15], [0.0; 4]);
    }

    #[test]
    fn test_frame_is_capped() {
        let roots = (0..20).map(|i| complex(i as f64, 0.0)).collect();
        let frame = FrameState::new((10, 10), &Viewport::default(), roots, generate_colours(20));
        assert_eq!(frame.root_count(), MAX_FRAME_ROOTS);
        assert_eq!(frame.colours.len(), MAX_FRAME_ROOTS);
    }

    #[test]
    fn test_slot_keeps_latest() {
        let mut slot = FrameSlot::new();
        let reader = slot.clone();
        assert!(reader.latest().is_none());
        slot.publish(Arc::new(sample_frame(2)));
        slot.publish(Arc::new(sample_frame(4)));
        assert_eq!(reader.latest().map(|frame| frame.root_count()), Some(4));
        assert_eq!(reader.published_count(), 2);
    }
}
