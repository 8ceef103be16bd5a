// Mapping between screen pixels and the complex plane
//
// The shorter screen axis always spans [-2, 2] before zooming, the longer
// axis is stretched by the aspect ratio so circles stay circles whatever
// shape the window has. Zoom is applied about the centre which stays fixed.

use cgmath::{point2, Point2};

use super::complex::{complex, is_finite, Complex64};
use super::error::FractalError;

const BASE_HALF_SPAN : f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub zoom : f64,
    pub centre : Complex64,
    pub aspect_ratio : f64
}

// Partial viewport change, unset fields are left alone
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportUpdate {
    pub zoom : Option<f64>,
    pub centre : Option<Complex64>,
    pub aspect_ratio : Option<f64>
}

impl Default for Viewport {
    fn default() -> Viewport {
        Viewport { zoom: 1.0, centre: complex(0.0, 0.0), aspect_ratio: 1.0 }
    }
}

impl Viewport {
    pub fn new(zoom : f64, centre : Complex64, aspect_ratio : f64) -> Result<Viewport, FractalError> {
        let viewport = Viewport { zoom, centre, aspect_ratio };
        viewport.validate()?;
        Ok(viewport)
    }

    pub fn validate(&self) -> Result<(), FractalError> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(FractalError::InvalidViewport(
                format!("zoom must be positive and finite, got {}", self.zoom)
            ));
        }
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(FractalError::InvalidViewport(
                format!("aspect ratio must be positive and finite, got {}", self.aspect_ratio)
            ));
        }
        if !is_finite(self.centre) {
            return Err(FractalError::InvalidViewport(
                format!("centre must be finite, got {}", self.centre)
            ));
        }
        Ok(())
    }

    // Merge the set fields of `update` into a copy of this viewport.
    //
    // The merged viewport is validated, on failure `self` is unaffected.
    pub fn apply(&self, update : &ViewportUpdate) -> Result<Viewport, FractalError> {
        let merged = Viewport {
            zoom : update.zoom.unwrap_or(self.zoom),
            centre : update.centre.unwrap_or(self.centre),
            aspect_ratio : update.aspect_ratio.unwrap_or(self.aspect_ratio)
        };
        merged.validate()?;
        Ok(merged)
    }

    // Half extents of the unzoomed view on each axis
    fn half_span(&self) -> (f64, f64) {
        if self.aspect_ratio >= 1.0 {
            (BASE_HALF_SPAN * self.aspect_ratio, BASE_HALF_SPAN)
        } else {
            (BASE_HALF_SPAN, BASE_HALF_SPAN / self.aspect_ratio)
        }
    }
}

// A validated viewport bound to a canvas size.
//
// Construction does all the checking so the per pixel mapping can't fail.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateMapper {
    viewport : Viewport,
    width : f64,
    height : f64,
    half_span : (f64, f64)
}

pub fn validate_canvas(width : f64, height : f64) -> Result<(), FractalError> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(FractalError::InvalidCanvas { width, height });
    }
    Ok(())
}

impl CoordinateMapper {
    pub fn new(viewport : &Viewport, width : f64, height : f64) -> Result<CoordinateMapper, FractalError> {
        viewport.validate()?;
        validate_canvas(width, height)?;
        Ok(CoordinateMapper {
            viewport : *viewport,
            width,
            height,
            half_span : viewport.half_span()
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn to_complex(&self, screen : Point2<f64>) -> Complex64 {
        let u = screen.x / self.width;
        let v = screen.y / self.height;
        // Screen y runs down, imaginary runs up
        let base = complex(
            (2.0 * u - 1.0) * self.half_span.0,
            (1.0 - 2.0 * v) * self.half_span.1
        );
        let centre = self.viewport.centre;
        (base - centre) / self.viewport.zoom + centre
    }

    pub fn to_screen(&self, z : Complex64) -> Point2<f64> {
        let centre = self.viewport.centre;
        let base = (z - centre) * self.viewport.zoom + centre;
        let u = (base.re / self.half_span.0 + 1.0) / 2.0;
        let v = (1.0 - base.im / self.half_span.1) / 2.0;
        point2(u * self.width, v * self.height)
    }
}

pub fn screen_to_complex(
    screen : Point2<f64>,
    canvas_width : f64,
    canvas_height : f64,
    viewport : &Viewport
) -> Result<Complex64, FractalError> {
    if !screen.x.is_finite() || !screen.y.is_finite() {
        return Err(FractalError::InvalidInput(format!("screen point {:?} is not finite", screen)));
    }
    Ok(CoordinateMapper::new(viewport, canvas_width, canvas_height)?.to_complex(screen))
}

pub fn complex_to_screen(
    z : Complex64,
    canvas_width : f64,
    canvas_height : f64,
    viewport : &Viewport
) -> Result<Point2<f64>, FractalError> {
    if !is_finite(z) {
        return Err(FractalError::InvalidInput(format!("complex point {} is not finite", z)));
    }
    Ok(CoordinateMapper::new(viewport, canvas_width, canvas_height)?.to_screen(z))
}
