// CPU rendition of the per pixel fractal shader
//
// Reads nothing but one frame snapshot so rows can be shaded in parallel.

use cgmath::point2;
use image::{Rgb, RgbImage};
use json::JsonValue;
use rayon::prelude::*;

use super::classify::{classify, ClassifierSettings};
use super::colour::{colour_pixel, to_rgb8, ColourMode};
use super::error::FractalError;
use super::frame::FrameState;
use super::polynomial::RootPolynomial;
use super::viewport::CoordinateMapper;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    pub classifier : ClassifierSettings,
    pub mode : ColourMode,
    pub markers : bool,
    pub marker_radius : i32
}

impl Default for RenderSettings {
    fn default() -> RenderSettings {
        RenderSettings {
            classifier : ClassifierSettings::default(),
            mode : ColourMode::Smooth,
            markers : true,
            marker_radius : 6
        }
    }
}

impl RenderSettings {
    pub fn from_json(input : &JsonValue) -> RenderSettings {
        RenderSettings {
            classifier : ClassifierSettings::from_json(input),
            mode : ColourMode::from_json(&input["colouring"]),
            markers : input["markers"].as_bool().unwrap_or(true),
            marker_radius : input["marker_radius"].as_i32().unwrap_or(6)
        }
    }
}

pub fn shade_pixel(
    pixel : (f64, f64),
    frame : &FrameState,
    mapper : &CoordinateMapper,
    settings : &ClassifierSettings,
    mode : ColourMode
) -> Rgb<u8> {
    let seed = mapper.to_complex(point2(pixel.0, pixel.1));
    let polynomial = RootPolynomial::new(&frame.roots);
    let classification = classify(seed, &polynomial, settings);
    to_rgb8(colour_pixel(&classification, &frame.colours, pixel, settings, mode))
}

// Shade every pixel of the frame, sampling at pixel centres.
pub fn render_frame(
    frame : &FrameState,
    settings : &ClassifierSettings,
    mode : ColourMode
) -> Result<RgbImage, FractalError> {
    let mapper = frame.mapper()?;
    let (width, height) = frame.resolution;
    let row_len = width as usize * 3;
    let mut buffer = vec![0_u8; row_len * height as usize];
    buffer.par_chunks_mut(row_len).enumerate().for_each(
        |(j, row)| {
            for i in 0..width as usize {
                let pixel = (i as f64 + 0.5, j as f64 + 0.5);
                let colour = shade_pixel(pixel, frame, &mapper, settings, mode);
                row[i * 3..i * 3 + 3].copy_from_slice(&colour.0);
            }
        }
    );
    RgbImage::from_raw(width, height, buffer).ok_or(FractalError::InvalidCanvas {
        width : width as f64,
        height : height as f64
    })
}
