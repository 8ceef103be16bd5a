// Colouring of classified pixels
//
// Each root gets a hue spaced evenly around the colour wheel. Pixels are
// either painted flat in their root's colour or shaded by how long they took
// to converge, with a little per pixel dither so the shading doesn't band.

use image::Rgb;
use json::JsonValue;

use super::classify::{Classification, ClassifierSettings};

pub const PALETTE_SATURATION : f32 = 0.8;
pub const PALETTE_LIGHTNESS : f32 = 0.6;

const FLAT_BLEND : f32 = 0.8;
const NEUTRAL_GREY : f32 = 0.5;
const MIN_LIGHTNESS : f64 = 0.2;
const MIN_SATURATION : f64 = 0.3;
// How much of the lightness the slowest pixels lose
const SHADE_DEPTH : f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColourMode {
    Flat,
    Smooth
}

impl ColourMode {
    pub fn from_json(input : &JsonValue) -> ColourMode {
        match input.as_str() {
            Some("flat") => ColourMode::Flat,
            _ => ColourMode::Smooth
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue : f64,
    pub saturation : f64,
    pub lightness : f64
}

fn mod2(val : f64) -> f64 {
    (val / 2.0).fract() * 2.0
}

pub fn hsl_to_rgb(hsl : Hsl) -> Rgb<f32> {
    let hue = hsl.hue.rem_euclid(360.0);
    let c = (1.0 - (2.0 * hsl.lightness - 1.0).abs()) * hsl.saturation;
    let x = c * (1.0 - (mod2(hue / 60.0) - 1.0).abs());
    let m = hsl.lightness - c / 2.0;
    let (r, g, b) = if hue < 60.0 {
        (c, x, 0.0)
    } else if hue < 120.0 {
        (x, c, 0.0)
    } else if hue < 180.0 {
        (0.0, c, x)
    } else if hue < 240.0 {
        (0.0, x, c)
    } else if hue < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    Rgb([(r + m) as f32, (g + m) as f32, (b + m) as f32])
}

pub fn rgb_to_hsl(colour : Rgb<f32>) -> Hsl {
    let r = colour.0[0] as f64;
    let g = colour.0[1] as f64;
    let b = colour.0[2] as f64;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    let delta = max - min;
    if delta < 1e-9 {
        return Hsl { hue: 0.0, saturation: 0.0, lightness };
    }
    let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    Hsl { hue: 60.0 * sector, saturation, lightness }
}

// Evenly spread colours for `count` roots.
//
// Pure in `count`, the whole palette is rebuilt whenever the number of
// roots changes.
pub fn generate_colours(count : usize) -> Vec<Rgb<f32>> {
    (0..count).map(
        |i| hsl_to_rgb(Hsl {
            hue : 360.0 * i as f64 / count as f64,
            saturation : PALETTE_SATURATION as f64,
            lightness : PALETTE_LIGHTNESS as f64
        })
    ).collect()
}

// Deterministic hash of a pixel position into [0, 1).
//
// Only used to dither the smooth shading.
pub fn pixel_noise(x : f64, y : f64) -> f64 {
    let v = (x * 12.9898 + y * 78.233).sin() * 43758.5453;
    v - v.floor()
}

fn flat_colour(classification : &Classification, colours : &[Rgb<f32>]) -> Rgb<f32> {
    match classification.root.and_then(|index| colours.get(index)) {
        Some(colour) => Rgb(colour.0.map(
            |c| c * FLAT_BLEND + NEUTRAL_GREY * (1.0 - FLAT_BLEND)
        )),
        None => Rgb([0.0, 0.0, 0.0])
    }
}

fn smooth_colour(
    classification : &Classification,
    colours : &[Rgb<f32>],
    pixel : (f64, f64),
    settings : &ClassifierSettings
) -> Rgb<f32> {
    let base = match classification.root.and_then(|index| colours.get(index)) {
        Some(colour) => *colour,
        None => return Rgb([1.0, 1.0, 1.0])
    };
    let hsl = rgb_to_hsl(base);
    let smooth_iter = classification.iterations as f64
        - 32.0_f64.powf(-classification.residual / settings.convergence_epsilon)
        - pixel_noise(pixel.0, pixel.1);
    let t = if settings.max_iterations == 0 {
        0.0
    } else {
        (smooth_iter / settings.max_iterations as f64).clamp(0.0, 1.0)
    };
    hsl_to_rgb(Hsl {
        hue : hsl.hue,
        saturation : hsl.saturation.max(MIN_SATURATION),
        lightness : (hsl.lightness * (1.0 - SHADE_DEPTH * t)).max(MIN_LIGHTNESS)
    })
}

pub fn colour_pixel(
    classification : &Classification,
    colours : &[Rgb<f32>],
    pixel : (f64, f64),
    settings : &ClassifierSettings,
    mode : ColourMode
) -> Rgb<f32> {
    match mode {
        ColourMode::Flat => flat_colour(classification, colours),
        ColourMode::Smooth => smooth_colour(classification, colours, pixel, settings)
    }
}

pub fn to_rgb8(colour : Rgb<f32>) -> Rgb<u8> {
    Rgb(colour.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}
