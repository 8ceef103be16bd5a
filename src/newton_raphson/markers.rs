// On screen handles for the roots
//
// The root state owns no drawing, it just tells a view when a marker should
// appear, move, change colour or go away. MarkerLayer is the view used when
// writing images, it remembers every marker and stamps them over a frame.

use std::sync::{Arc, Mutex};

use cgmath::Point2;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};

use super::colour::to_rgb8;
use super::roots::RootId;

pub trait MarkerView {
    fn created(&mut self, id : RootId, screen : Point2<f64>, colour : Rgb<f32>);
    fn moved(&mut self, id : RootId, screen : Point2<f64>);
    fn recoloured(&mut self, id : RootId, colour : Rgb<f32>);
    fn removed(&mut self, id : RootId);
    fn drag_state(&mut self, id : RootId, dragging : bool);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id : RootId,
    pub screen : Point2<f64>,
    pub colour : Rgb<f32>,
    pub dragging : bool
}

// Shared so the root state can drive one handle while the renderer draws
// from another
#[derive(Clone, Default)]
pub struct MarkerLayer {
    markers : Arc<Mutex<Vec<Marker>>>
}

impl MarkerLayer {
    pub fn new() -> MarkerLayer {
        MarkerLayer::default()
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.markers.lock().map(|markers| markers.clone()).unwrap_or_default()
    }

    fn update<F>(&self, id : RootId, change : F)
        where F : FnOnce(&mut Marker)
    {
        if let Ok(mut markers) = self.markers.lock() {
            if let Some(marker) = markers.iter_mut().find(|marker| marker.id == id) {
                change(marker);
            }
        }
    }

    // Draw every marker, later markers on top.
    //
    // A marker is a disc in its root's colour inside a ring, black when
    // idle and white while it is being dragged.
    pub fn draw(&self, img : &mut RgbImage, radius : i32) {
        for marker in self.markers() {
            let centre = (marker.screen.x.round() as i32, marker.screen.y.round() as i32);
            let (ring, size) = if marker.dragging {
                (Rgb([255, 255, 255]), radius + 2)
            } else {
                (Rgb([0, 0, 0]), radius)
            };
            draw_filled_circle_mut(img, centre, size, to_rgb8(marker.colour));
            draw_hollow_circle_mut(img, centre, size, ring);
        }
    }
}

impl MarkerView for MarkerLayer {
    fn created(&mut self, id : RootId, screen : Point2<f64>, colour : Rgb<f32>) {
        if let Ok(mut markers) = self.markers.lock() {
            markers.retain(|marker| marker.id != id);
            markers.push(Marker { id, screen, colour, dragging: false });
        }
    }

    fn moved(&mut self, id : RootId, screen : Point2<f64>) {
        self.update(id, |marker| marker.screen = screen);
    }

    fn recoloured(&mut self, id : RootId, colour : Rgb<f32>) {
        self.update(id, |marker| marker.colour = colour);
    }

    fn removed(&mut self, id : RootId) {
        if let Ok(mut markers) = self.markers.lock() {
            markers.retain(|marker| marker.id != id);
        }
    }

    fn drag_state(&mut self, id : RootId, dragging : bool) {
        self.update(id, |marker| marker.dragging = dragging);
    }
}

#[cfg(test)]
mod tests {
    use cgmath::point2;

    use super::*;
    use super::super::roots::{RootState, RootStateSettings};

    fn layer_for_state() -> (RootState, MarkerLayer) {
        let settings = RootStateSettings { canvas: (100, 100), ..RootStateSettings::default() };
        let mut state = RootState::new(&settings).unwrap();
        let layer = MarkerLayer::new();
        state.set_view(Box::new(layer.clone()));
        (state, layer)
    }

    #[test]
    fn test_layer_mirrors_roots() {
        let (state, layer) = layer_for_state();
        let markers = layer.markers();
        assert_eq!(markers.len(), state.roots().len());
        for (marker, root) in markers.iter().zip(state.roots()) {
            assert_eq!(marker.id, root.id);
            assert_eq!(marker.colour, root.colour);
            assert_eq!(Some(marker.screen), state.screen_position(root.id));
        }
    }

    #[test]
    fn test_recoloured_on_count_change() {
        let (mut state, layer) = layer_for_state();
        let before = layer.markers()[0].colour;
        state.add_root_at(point2(10.0, 10.0));
        let after = layer.markers();
        assert_eq!(after.len(), 4);
        // First hue is always zero so only the others move
        assert_eq!(after[0].colour, before);
        for (marker, root) in after.iter().zip(state.roots()) {
            assert_eq!(marker.colour, root.colour);
        }
    }

    #[test]
    fn test_draw_stamps_marker_colour() {
        let (state, layer) = layer_for_state();
        let mut img = RgbImage::new(100, 100);
        layer.draw(&mut img, 4);
        let first = &state.roots()[0];
        let p = state.screen_position(first.id).unwrap();
        let pixel = img.get_pixel(p.x.round() as u32, p.y.round() as u32);
        assert_eq!(*pixel, to_rgb8(first.colour));
        // Far corner untouched
        assert_eq!(*img.get_pixel(0, 99), Rgb([0, 0, 0]));
    }
}
