// The authoritative list of roots and the viewport they are seen through
//
// Every change goes through here: adding and removing roots, dragging one
// around, zooming and resizing. After each change the whole state is
// published to the registered frame consumer as a fresh snapshot, and the
// marker view is told which markers appeared, moved or went away.

use std::io::{Error, ErrorKind};
use std::sync::Arc;

use cgmath::{vec2, InnerSpace, Point2, Vector2};
use image::Rgb;
use json::JsonValue;
use log::debug;
use rand::SeedableRng;

use super::colour::generate_colours;
use super::complex::{complex, is_finite, Complex64};
use super::error::FractalError;
use super::frame::{FrameConsumer, FrameState, MAX_FRAME_ROOTS};
use super::markers::MarkerView;
use super::viewport::{validate_canvas, CoordinateMapper, Viewport, ViewportUpdate};

pub const MIN_ROOTS : usize = 2;
pub const MAX_ROOTS : usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Root {
    pub id : RootId,
    pub position : Complex64,
    pub colour : Rgb<f32>
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub root_id : RootId,
    pub pointer_offset : Vector2<f64>
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RootPolicy {
    pub min_roots : usize,
    pub max_roots : usize
}

impl Default for RootPolicy {
    fn default() -> RootPolicy {
        RootPolicy { min_roots: MIN_ROOTS, max_roots: MAX_ROOTS }
    }
}

impl RootPolicy {
    // The frame layout can't carry more than 16 roots and a polynomial
    // needs at least one
    pub fn new(min_roots : usize, max_roots : usize) -> RootPolicy {
        let max_roots = max_roots.clamp(1, MAX_FRAME_ROOTS);
        RootPolicy { min_roots: min_roots.clamp(1, max_roots), max_roots }
    }
}

// Extra roots when the defaults fall short of a configured minimum
const PADDING_SEED : u64 = 0;
const PADDING_RADIUS : f64 = 1.5;

pub fn default_roots() -> Vec<Complex64> {
    let s = 3.0_f64.sqrt() / 2.0;
    vec!(complex(1.0, 0.0), complex(-0.5, s), complex(-0.5, -s))
}

fn random_in_disc<Rng>(rng : &mut Rng) -> Vector2<f64>
where Rng : rand::Rng
{
    let x = rng.gen::<f64>();
    let y = rng.gen::<f64>();
    let base = 2.0*vec2(x - 0.5, y - 0.5);
    if base.magnitude2() < 1.0 {
        base
    } else {
        random_in_disc(rng)
    }
}

// Scatter `count` roots in a disc of the given radius about the origin.
//
// The same seed always gives the same roots.
pub fn random_roots(count : usize, seed : u64, radius : f64) -> Vec<Complex64> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(
        |_| {
            let offset = random_in_disc(&mut rng) * radius;
            complex(offset.x, offset.y)
        }
    ).collect()
}

fn parse_root(input : &JsonValue) -> Option<Complex64> {
    if input.is_array() {
        let re = input[0].as_f64()?;
        let im = input[1].as_f64().unwrap_or(0.0);
        Some(complex(re, im))
    } else {
        let re = input["re"].as_f64()?;
        let im = input["im"].as_f64().unwrap_or(0.0);
        Some(complex(re, im))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RootStateSettings {
    pub policy : RootPolicy,
    pub initial_roots : Option<Vec<Complex64>>,
    pub viewport : Viewport,
    pub canvas : (u32, u32),
    pub keep_grab_offset : bool
}

impl Default for RootStateSettings {
    fn default() -> RootStateSettings {
        RootStateSettings {
            policy : RootPolicy::default(),
            initial_roots : None,
            viewport : Viewport::default(),
            canvas : (1024, 1024),
            keep_grab_offset : false
        }
    }
}

impl RootStateSettings {
    pub fn from_json(input : &JsonValue) -> std::io::Result<RootStateSettings> {
        let res_x = input["resolution_x"].as_u32().unwrap_or(1024);
        let res_y = input["resolution_y"].as_u32().unwrap_or(1024);
        if res_x == 0 || res_y == 0 {
            return Err(Error::new(ErrorKind::InvalidData, "Resolution must be non zero"));
        }
        let zoom = input["zoom"].as_f64().unwrap_or(1.0);
        let centre_x = input["centre_x"].as_f64().unwrap_or(0.0);
        let centre_y = input["centre_y"].as_f64().unwrap_or(0.0);
        let viewport = Viewport::new(zoom, complex(centre_x, centre_y), res_x as f64 / res_y as f64)?;
        let policy = RootPolicy::new(
            input["min_roots"].as_usize().unwrap_or(MIN_ROOTS),
            input["max_roots"].as_usize().unwrap_or(MAX_ROOTS)
        );
        let initial_roots = if input["roots"].is_array() {
            let roots : Option<Vec<Complex64>> = input["roots"].members().map(parse_root).collect();
            Some(roots.ok_or(Error::new(ErrorKind::InvalidData, "Malformed root"))?)
        } else if input["random_roots"].is_object() {
            let random = &input["random_roots"];
            Some(random_roots(
                random["count"].as_usize().unwrap_or(3),
                random["seed"].as_u64().unwrap_or(0),
                random["radius"].as_f64().unwrap_or(1.5)
            ))
        } else {
            None
        };
        Ok(RootStateSettings {
            policy,
            initial_roots,
            viewport,
            canvas : (res_x, res_y),
            keep_grab_offset : input["keep_grab_offset"].as_bool().unwrap_or(false)
        })
    }
}

pub struct RootState {
    roots : Vec<Root>,
    viewport : Viewport,
    canvas : (u32, u32),
    mapper : CoordinateMapper,
    policy : RootPolicy,
    keep_grab_offset : bool,
    drag : Option<DragSession>,
    next_id : u64,
    consumer : Option<Box<dyn FrameConsumer>>,
    view : Option<Box<dyn MarkerView>>
}

impl RootState {
    pub fn new(settings : &RootStateSettings) -> Result<RootState, FractalError> {
        let (w, h) = settings.canvas;
        validate_canvas(w as f64, h as f64)?;
        let viewport = Viewport { aspect_ratio: w as f64 / h as f64, ..settings.viewport };
        let mapper = CoordinateMapper::new(&viewport, w as f64, h as f64)?;
        let mut state = RootState {
            roots : Vec::new(),
            viewport,
            canvas : settings.canvas,
            mapper,
            policy : settings.policy,
            keep_grab_offset : settings.keep_grab_offset,
            drag : None,
            next_id : 0,
            consumer : None,
            view : None
        };
        state.initialize(settings.initial_roots.as_deref());
        Ok(state)
    }

    // Replace every root, falling back to the cube roots of unity when no
    // usable set is given.
    pub fn initialize(&mut self, initial : Option<&[Complex64]>) {
        let mut positions : Vec<Complex64> = initial
            .map(|roots| roots.iter().copied().filter(|z| is_finite(*z)).collect())
            .unwrap_or_else(default_roots);
        if positions.len() < self.policy.min_roots {
            debug!("Only {} usable initial roots, using the defaults", positions.len());
            positions = default_roots();
        }
        if positions.len() < self.policy.min_roots {
            let missing = self.policy.min_roots - positions.len();
            debug!("Scattering {} extra roots to reach the minimum", missing);
            positions.extend(random_roots(missing, PADDING_SEED, PADDING_RADIUS));
        }
        positions.truncate(self.policy.max_roots);
        let old_ids : Vec<RootId> = self.roots.iter().map(|root| root.id).collect();
        if let Some(view) = self.view.as_mut() {
            for id in old_ids {
                view.removed(id);
            }
        }
        self.drag = None;
        self.roots.clear();
        for position in positions {
            let id = RootId(self.next_id);
            self.next_id += 1;
            self.roots.push(Root { id, position, colour: Rgb([1.0, 1.0, 1.0]) });
        }
        self.recolour();
        for i in 0..self.roots.len() {
            self.notify_created(i);
        }
        self.publish();
    }

    pub fn set_consumer(&mut self, consumer : Box<dyn FrameConsumer>) {
        self.consumer = Some(consumer);
        self.publish();
    }

    pub fn set_view(&mut self, view : Box<dyn MarkerView>) {
        self.view = Some(view);
        for i in 0..self.roots.len() {
            self.notify_created(i);
        }
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    pub fn root(&self, id : RootId) -> Option<&Root> {
        self.roots.iter().find(|root| root.id == id)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn canvas(&self) -> (u32, u32) {
        self.canvas
    }

    pub fn dragging(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn screen_position(&self, id : RootId) -> Option<Point2<f64>> {
        self.root(id).map(|root| self.mapper.to_screen(root.position))
    }

    pub fn frame_state(&self) -> FrameState {
        FrameState::new(
            self.canvas,
            &self.viewport,
            self.roots.iter().map(|root| root.position).collect(),
            self.roots.iter().map(|root| root.colour).collect()
        )
    }

    pub fn add_root_at(&mut self, screen : Point2<f64>) -> Option<RootId> {
        if !screen.x.is_finite() || !screen.y.is_finite() {
            debug!("Ignoring add at non finite point {:?}", screen);
            return None;
        }
        let position = self.mapper.to_complex(screen);
        self.add_root(position)
    }

    pub fn add_root(&mut self, position : Complex64) -> Option<RootId> {
        if self.roots.len() >= self.policy.max_roots {
            debug!("Already at {} roots, not adding another", self.roots.len());
            return None;
        }
        if !is_finite(position) {
            debug!("Ignoring non finite root {}", position);
            return None;
        }
        let id = RootId(self.next_id);
        self.next_id += 1;
        self.roots.push(Root { id, position, colour: Rgb([1.0, 1.0, 1.0]) });
        self.recolour();
        self.notify_created(self.roots.len() - 1);
        self.publish();
        Some(id)
    }

    pub fn remove_root(&mut self, id : RootId) -> bool {
        if self.roots.len() <= self.policy.min_roots {
            debug!("Only {} roots left, not removing {:?}", self.roots.len(), id);
            return false;
        }
        let index = match self.roots.iter().position(|root| root.id == id) {
            Some(index) => index,
            None => {
                debug!("No root {:?} to remove", id);
                return false;
            }
        };
        self.roots.remove(index);
        if self.drag.map(|drag| drag.root_id) == Some(id) {
            self.drag = None;
        }
        if let Some(view) = self.view.as_mut() {
            view.removed(id);
        }
        self.recolour();
        self.publish();
        true
    }

    pub fn begin_drag(&mut self, id : RootId, pointer : Point2<f64>) -> bool {
        if self.drag.is_some() {
            debug!("Already dragging, ignoring drag of {:?}", id);
            return false;
        }
        let marker = match self.screen_position(id) {
            Some(marker) => marker,
            None => {
                debug!("No root {:?} to drag", id);
                return false;
            }
        };
        let pointer_offset = if self.keep_grab_offset {
            marker - pointer
        } else {
            vec2(0.0, 0.0)
        };
        self.drag = Some(DragSession { root_id: id, pointer_offset });
        if let Some(view) = self.view.as_mut() {
            view.drag_state(id, true);
        }
        true
    }

    pub fn update_drag(&mut self, pointer : Point2<f64>) -> bool {
        let session = match self.drag {
            Some(session) => session,
            None => return false
        };
        if !pointer.x.is_finite() || !pointer.y.is_finite() {
            debug!("Ignoring drag to non finite point {:?}", pointer);
            return false;
        }
        let index = match self.roots.iter().position(|root| root.id == session.root_id) {
            Some(index) => index,
            None => {
                // Root went away mid drag
                self.drag = None;
                return false;
            }
        };
        let target = pointer + session.pointer_offset;
        self.roots[index].position = self.mapper.to_complex(target);
        if let Some(view) = self.view.as_mut() {
            view.moved(session.root_id, self.mapper.to_screen(self.roots[index].position));
        }
        self.publish();
        true
    }

    pub fn end_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            if let Some(view) = self.view.as_mut() {
                view.drag_state(session.root_id, false);
            }
        }
    }

    // Same as ending the drag, the root stays wherever it was last moved to
    pub fn cancel_drag(&mut self) {
        self.end_drag();
    }

    pub fn set_viewport(&mut self, update : &ViewportUpdate) -> Result<(), FractalError> {
        let viewport = self.viewport.apply(update)?;
        self.mapper = CoordinateMapper::new(&viewport, self.canvas.0 as f64, self.canvas.1 as f64)?;
        self.viewport = viewport;
        self.notify_all_moved();
        self.publish();
        Ok(())
    }

    pub fn resize(&mut self, width : u32, height : u32) -> Result<(), FractalError> {
        validate_canvas(width as f64, height as f64)?;
        let viewport = self.viewport.apply(&ViewportUpdate {
            aspect_ratio : Some(width as f64 / height as f64),
            ..ViewportUpdate::default()
        })?;
        self.mapper = CoordinateMapper::new(&viewport, width as f64, height as f64)?;
        self.viewport = viewport;
        self.canvas = (width, height);
        self.notify_all_moved();
        self.publish();
        Ok(())
    }

    // Topmost root whose marker lies within `radius` pixels of `point`.
    pub fn marker_at(&self, point : Point2<f64>, radius : f64) -> Option<RootId> {
        self.roots.iter().rev().find(
            |root| (self.mapper.to_screen(root.position) - point).magnitude() <= radius
        ).map(|root| root.id)
    }

    fn recolour(&mut self) {
        let colours = generate_colours(self.roots.len());
        for (root, colour) in self.roots.iter_mut().zip(colours) {
            root.colour = colour;
        }
        if let Some(view) = self.view.as_mut() {
            for root in self.roots.iter() {
                view.recoloured(root.id, root.colour);
            }
        }
    }

    fn notify_created(&mut self, index : usize) {
        let root = &self.roots[index];
        let screen = self.mapper.to_screen(root.position);
        if let Some(view) = self.view.as_mut() {
            view.created(root.id, screen, root.colour);
        }
    }

    fn notify_all_moved(&mut self) {
        if let Some(view) = self.view.as_mut() {
            for root in self.roots.iter() {
                view.moved(root.id, self.mapper.to_screen(root.position));
            }
        }
    }

    fn publish(&mut self) {
        if self.consumer.is_none() {
            return;
        }
        let frame = Arc::new(self.frame_state());
        debug!("Publishing frame with {} roots", frame.root_count());
        if let Some(consumer) = self.consumer.as_mut() {
            consumer.publish(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{assert_abs_diff_eq, point2};

    use super::*;
    use super::super::frame::FrameSlot;
    use super::super::markers::MarkerLayer;
    use super::super::viewport::{complex_to_screen, screen_to_complex};

    fn origin_point() -> Point2<f64> {
        point2(0.0, 0.0)
    }

    fn state_with_slot() -> (RootState, FrameSlot) {
        let settings = RootStateSettings { canvas: (400, 400), ..RootStateSettings::default() };
        let mut state = RootState::new(&settings).unwrap();
        let slot = FrameSlot::new();
        state.set_consumer(Box::new(slot.clone()));
        (state, slot)
    }

    #[test]
    fn test_starts_with_cube_roots_of_unity() {
        let (state, slot) = state_with_slot();
        assert_eq!(state.roots().len(), 3);
        assert_abs_diff_eq!(state.roots()[0].position.re, 1.0);
        let frame = slot.latest().unwrap();
        assert_eq!(frame.root_count(), 3);
        assert_eq!(frame.colours, generate_colours(3));
    }

    #[test]
    fn test_too_few_initial_roots_use_defaults() {
        let settings = RootStateSettings {
            initial_roots : Some(vec!(complex(0.5, 0.5))),
            ..RootStateSettings::default()
        };
        let state = RootState::new(&settings).unwrap();
        assert_eq!(state.roots().len(), 3);
    }

    #[test]
    fn test_defaults_are_padded_to_minimum() {
        let settings = RootStateSettings {
            policy : RootPolicy::new(5, 16),
            ..RootStateSettings::default()
        };
        let mut state = RootState::new(&settings).unwrap();
        assert_eq!(state.roots().len(), 5);
        assert_abs_diff_eq!(state.roots()[0].position.re, 1.0);
        // Sitting at the floor so nothing can be removed
        let id = state.roots()[4].id;
        assert!(!state.remove_root(id));
        assert!(state.add_root(complex(0.1, 0.1)).is_some());
        assert!(state.remove_root(id));
        assert_eq!(state.roots().len(), 5);
    }

    #[test]
    fn test_aspect_ratio_follows_canvas() {
        let settings = RootStateSettings { canvas: (800, 400), ..RootStateSettings::default() };
        let state = RootState::new(&settings).unwrap();
        assert_abs_diff_eq!(state.viewport().aspect_ratio, 2.0);
        // A unit circle stays round on screen
        let right = complex_to_screen(complex(1.0, 0.0), 800.0, 400.0, state.viewport()).unwrap();
        let up = complex_to_screen(complex(0.0, 1.0), 800.0, 400.0, state.viewport()).unwrap();
        assert_abs_diff_eq!(right.x - 400.0, 200.0 - up.y, epsilon = 1e-9);
    }

    #[test]
    fn test_add_root_maps_point_and_recolours() {
        let (mut state, slot) = state_with_slot();
        let p = point2(300.0, 100.0);
        let id = state.add_root_at(p).unwrap();
        let expected = screen_to_complex(p, 400.0, 400.0, state.viewport()).unwrap();
        assert_eq!(state.root(id).unwrap().position, expected);
        assert_eq!(state.roots().len(), 4);
        let frame = slot.latest().unwrap();
        assert_eq!(frame.root_count(), 4);
        assert_eq!(frame.colours, generate_colours(4));
        assert_eq!(frame.roots[3], expected);
    }

    #[test]
    fn test_add_at_capacity_is_ignored() {
        let (mut state, slot) = state_with_slot();
        for i in 0..13 {
            assert!(state.add_root(complex(i as f64 * 0.1, 1.0)).is_some());
        }
        assert_eq!(state.roots().len(), MAX_ROOTS);
        let published = slot.published_count();
        assert!(state.add_root_at(point2(10.0, 10.0)).is_none());
        assert_eq!(state.roots().len(), MAX_ROOTS);
        assert_eq!(slot.published_count(), published);
    }

    #[test]
    fn test_remove_at_floor_is_ignored() {
        let (mut state, _slot) = state_with_slot();
        let first = state.roots()[0].id;
        let second = state.roots()[1].id;
        assert!(state.remove_root(first));
        assert_eq!(state.roots().len(), 2);
        assert!(!state.remove_root(second));
        assert_eq!(state.roots().len(), 2);
    }

    #[test]
    fn test_remove_keeps_order_and_ids() {
        let (mut state, slot) = state_with_slot();
        let ids : Vec<RootId> = state.roots().iter().map(|root| root.id).collect();
        state.add_root(complex(2.0, 2.0));
        assert!(state.remove_root(ids[1]));
        let remaining : Vec<RootId> = state.roots().iter().map(|root| root.id).collect();
        assert_eq!(remaining[0], ids[0]);
        assert_eq!(remaining[1], ids[2]);
        assert_eq!(slot.latest().unwrap().colours, generate_colours(3));
    }

    #[test]
    fn test_remove_unknown_root_is_ignored() {
        let (mut state, _slot) = state_with_slot();
        state.add_root(complex(2.0, 2.0));
        assert!(!state.remove_root(RootId(999)));
        assert_eq!(state.roots().len(), 4);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let (mut state, _slot) = state_with_slot();
        let added = state.add_root(complex(2.0, 2.0)).unwrap();
        assert!(state.remove_root(added));
        let again = state.add_root(complex(2.0, 2.0)).unwrap();
        assert_ne!(added, again);
    }

    #[test]
    fn test_drag_moves_only_the_dragged_root() {
        let (mut state, slot) = state_with_slot();
        let id = state.roots()[1].id;
        let before : Vec<Root> = state.roots().to_vec();
        let p0 = state.screen_position(id).unwrap();
        assert!(state.begin_drag(id, p0));
        let p1 = point2(50.0, 320.0);
        assert!(state.update_drag(p1));
        let expected = screen_to_complex(p1, 400.0, 400.0, state.viewport()).unwrap();
        for (old, new) in before.iter().zip(state.roots()) {
            assert_eq!(old.id, new.id);
            assert_eq!(old.colour, new.colour);
            if new.id == id {
                assert_eq!(new.position, expected);
            } else {
                assert_eq!(new.position, old.position);
            }
        }
        assert_eq!(slot.latest().unwrap().roots[1], expected);
    }

    #[test]
    fn test_every_drag_update_publishes() {
        let (mut state, slot) = state_with_slot();
        let id = state.roots()[0].id;
        state.begin_drag(id, origin_point());
        let start = slot.published_count();
        for i in 0..5 {
            state.update_drag(point2(10.0 * i as f64, 20.0));
        }
        assert_eq!(slot.published_count(), start + 5);
    }

    #[test]
    fn test_drag_offset_when_kept() {
        let settings = RootStateSettings {
            canvas : (400, 400),
            keep_grab_offset : true,
            ..RootStateSettings::default()
        };
        let mut state = RootState::new(&settings).unwrap();
        let id = state.roots()[0].id;
        let marker = state.screen_position(id).unwrap();
        // Grab five pixels left of the marker then move the pointer 40 down
        state.begin_drag(id, marker - vec2(5.0, 0.0));
        state.update_drag(marker + vec2(-5.0, 40.0));
        let now = state.screen_position(id).unwrap();
        assert_abs_diff_eq!(now.x, marker.x, epsilon = 1e-6);
        assert_abs_diff_eq!(now.y, marker.y + 40.0, epsilon = 1e-6);
    }

    #[test]
    fn test_only_one_drag_at_a_time() {
        let (mut state, _slot) = state_with_slot();
        let a = state.roots()[0].id;
        let b = state.roots()[1].id;
        assert!(state.begin_drag(a, origin_point()));
        assert!(!state.begin_drag(b, origin_point()));
        assert_eq!(state.dragging().map(|drag| drag.root_id), Some(a));
        state.end_drag();
        assert!(state.dragging().is_none());
        assert!(!state.update_drag(point2(1.0, 1.0)));
    }

    #[test]
    fn test_cancel_keeps_last_position() {
        let (mut state, _slot) = state_with_slot();
        let id = state.roots()[2].id;
        state.begin_drag(id, origin_point());
        state.update_drag(point2(123.0, 45.0));
        let moved = state.root(id).unwrap().position;
        state.cancel_drag();
        assert!(state.dragging().is_none());
        assert_eq!(state.root(id).unwrap().position, moved);
    }

    #[test]
    fn test_drag_of_removed_root_is_dropped() {
        let (mut state, _slot) = state_with_slot();
        state.add_root(complex(2.0, 2.0));
        let id = state.roots()[3].id;
        state.begin_drag(id, origin_point());
        assert!(state.remove_root(id));
        assert!(state.dragging().is_none());
        assert!(!state.update_drag(point2(5.0, 5.0)));
        assert!(!state.begin_drag(id, origin_point()));
    }

    #[test]
    fn test_set_viewport_keeps_roots() {
        let (mut state, slot) = state_with_slot();
        let before : Vec<Complex64> = state.roots().iter().map(|root| root.position).collect();
        state.set_viewport(&ViewportUpdate { zoom: Some(3.0), ..ViewportUpdate::default() }).unwrap();
        let after : Vec<Complex64> = state.roots().iter().map(|root| root.position).collect();
        assert_eq!(before, after);
        assert_eq!(slot.latest().unwrap().zoom, 3.0);
        let bad = state.set_viewport(&ViewportUpdate { zoom: Some(f64::NAN), ..ViewportUpdate::default() });
        assert!(bad.is_err());
        assert_eq!(state.viewport().zoom, 3.0);
    }

    #[test]
    fn test_resize_updates_aspect_ratio() {
        let (mut state, slot) = state_with_slot();
        state.resize(800, 400).unwrap();
        assert_eq!(state.canvas(), (800, 400));
        assert_abs_diff_eq!(state.viewport().aspect_ratio, 2.0);
        let frame = slot.latest().unwrap();
        assert_eq!(frame.resolution, (800, 400));
        assert!(state.resize(0, 400).is_err());
        assert_eq!(state.canvas(), (800, 400));
    }

    #[test]
    fn test_marker_at_hits_topmost() {
        let (mut state, _slot) = state_with_slot();
        let first = state.roots()[0].id;
        let p = state.screen_position(first).unwrap();
        assert_eq!(state.marker_at(p + vec2(3.0, 0.0), 6.0), Some(first));
        let on_top = state.add_root_at(p).unwrap();
        assert_eq!(state.marker_at(p, 6.0), Some(on_top));
        assert_eq!(state.marker_at(point2(-100.0, -100.0), 6.0), None);
    }

    #[test]
    fn test_view_follows_mutations() {
        let (mut state, _slot) = state_with_slot();
        let layer = MarkerLayer::new();
        state.set_view(Box::new(layer.clone()));
        assert_eq!(layer.markers().len(), 3);
        let id = state.add_root_at(point2(20.0, 20.0)).unwrap();
        assert_eq!(layer.markers().len(), 4);
        assert_eq!(layer.markers()[3].colour, state.root(id).unwrap().colour);
        state.begin_drag(id, point2(20.0, 20.0));
        assert!(layer.markers()[3].dragging);
        state.update_drag(point2(60.0, 70.0));
        assert_abs_diff_eq!(layer.markers()[3].screen.x, 60.0, epsilon = 1e-9);
        state.end_drag();
        assert!(!layer.markers()[3].dragging);
        state.remove_root(id);
        assert_eq!(layer.markers().len(), 3);
    }

    #[test]
    fn test_random_roots_are_seeded() {
        let a = random_roots(5, 42, 1.5);
        assert_eq!(a, random_roots(5, 42, 1.5));
        assert_ne!(a, random_roots(5, 43, 1.5));
        assert!(a.iter().all(|z| z.norm() <= 1.5));
    }

    #[test]
    fn test_settings_from_json() {
        let input = json::parse(r#"{
            "resolution_x": 200, "resolution_y": 100,
            "zoom": 2.0, "centre_x": 0.5,
            "roots": [[1, 0], [-1, 0], {"re": 0, "im": 1}],
            "max_roots": 40
        }"#).unwrap();
        let settings = RootStateSettings::from_json(&input).unwrap();
        assert_eq!(settings.canvas, (200, 100));
        assert_eq!(settings.viewport.aspect_ratio, 2.0);
        assert_eq!(settings.viewport.centre, complex(0.5, 0.0));
        assert_eq!(settings.initial_roots.unwrap()[2], complex(0.0, 1.0));
        assert_eq!(settings.policy.max_roots, MAX_FRAME_ROOTS);
        let bad = json::parse(r#"{ "roots": [[1, 0], "nope"] }"#).unwrap();
        assert!(RootStateSettings::from_json(&bad).is_err());
    }
}
