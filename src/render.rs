use kurbo::{BezPath, Ellipse, Point, Rect, Vec2};

use crate::{
    core::Canvas,
    error::VisageResult,
    model::{FaceParams, keys},
};

// Layout constants for a 540x360 reference canvas; everything scales
// off the canvas height so other sizes keep the proportions.
const EYE_SPACING_FRAC: f64 = 0.28;
const EYE_RX_FRAC: f64 = 0.11;
const EYE_RY_FRAC: f64 = 0.16;
const PUPIL_R_FRAC: f64 = 0.07;
const MOUTH_Y_FRAC: f64 = 0.22;
const MOUTH_HALF_WIDTH_FRAC: f64 = 0.18;
const MOUTH_OPEN_FRAC: f64 = 0.04;

/// Draws one facial pose onto an explicit surface.
///
/// The surface type is the implementor's business; the core only ever
/// hands over the canvas dimensions and the parameter set. Hosts wrap
/// whatever 2D context they have.
pub trait FaceRenderer {
    fn draw(&mut self, canvas: Canvas, params: &FaceParams) -> VisageResult<()>;
}

/// One eye: outline, pupil, and optional lid covers.
#[derive(Clone, Debug, PartialEq)]
pub struct EyeShape {
    pub outline: Ellipse,
    pub pupil: Ellipse,
    pub upper_lid: Option<Lid>,
    pub lower_lid: Option<Lid>,
}

/// A lid cover: an axis-aligned rect plus the rotation (radians, about
/// the eye center) the renderer applies when filling it.
#[derive(Clone, Debug, PartialEq)]
pub struct Lid {
    pub cover: Rect,
    pub angle_rad: f64,
}

/// Vector geometry for one facial pose. Rasterization is the host's
/// job; this is the shared intermediate both native and web surfaces
/// consume.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceScene {
    pub left_eye: EyeShape,
    pub right_eye: EyeShape,
    pub mouth: BezPath,
}

impl FaceScene {
    pub fn build(canvas: Canvas, params: &FaceParams) -> Self {
        let center = canvas.center();
        let unit = f64::from(canvas.height);
        let spacing = unit * EYE_SPACING_FRAC;

        let eye_y = center.y - unit * 0.08;
        let left = build_eye(Point::new(center.x - spacing, eye_y), unit, params, -1.0);
        let right = build_eye(Point::new(center.x + spacing, eye_y), unit, params, 1.0);
        let mouth = build_mouth(center, unit, params);

        Self {
            left_eye: left,
            right_eye: right,
            mouth,
        }
    }
}

fn build_eye(center: Point, unit: f64, params: &FaceParams, side: f64) -> EyeShape {
    let openness = params.get_or(keys::EYE_OPENNESS, 1.0).max(0.0);
    let pupil_size = params.get_or(keys::PUPIL_SIZE, 0.7).max(0.0);
    let pupil_angle = params.get_or(keys::PUPIL_ANGLE, 0.0).to_radians();
    let upper_angle = params.get_or(keys::UPPER_EYELID_ANGLE, 0.0).to_radians();
    let upper_cov = params.get_or(keys::UPPER_EYELID_COVERAGE, 0.0).clamp(0.0, 1.0);
    let lower_cov = params.get_or(keys::LOWER_EYELID_COVERAGE, 0.0).clamp(0.0, 1.0);

    let rx = unit * EYE_RX_FRAC;
    let ry = unit * EYE_RY_FRAC * openness;
    let outline = Ellipse::new(center, Vec2::new(rx, ry), 0.0);

    let pupil_r = unit * PUPIL_R_FRAC * pupil_size;
    // The pupil squashes along its tilt axis rather than translating,
    // which reads as gaze without ever escaping the outline.
    let pupil = Ellipse::new(center, Vec2::new(pupil_r, pupil_r * 0.85), pupil_angle);

    let eye_bounds = Rect::new(center.x - rx, center.y - ry, center.x + rx, center.y + ry);
    // Lid angles mirror across the face midline.
    let upper_lid = (upper_cov > 0.0).then(|| Lid {
        cover: Rect::new(
            eye_bounds.x0,
            eye_bounds.y0,
            eye_bounds.x1,
            eye_bounds.y0 + eye_bounds.height() * upper_cov,
        ),
        angle_rad: upper_angle * side,
    });
    let lower_lid = (lower_cov > 0.0).then(|| Lid {
        cover: Rect::new(
            eye_bounds.x0,
            eye_bounds.y1 - eye_bounds.height() * lower_cov,
            eye_bounds.x1,
            eye_bounds.y1,
        ),
        angle_rad: 0.0,
    });

    EyeShape {
        outline,
        pupil,
        upper_lid,
        lower_lid,
    }
}

fn build_mouth(center: Point, unit: f64, params: &FaceParams) -> BezPath {
    let curve = params.get_or(keys::MOUTH_CURVE, 0.0);
    let height = params.get_or(keys::MOUTH_HEIGHT, 0.0).max(0.0);
    let width = params.get_or(keys::MOUTH_WIDTH, 1.0).max(0.0);

    let y = center.y + unit * MOUTH_Y_FRAC;
    let half_w = unit * MOUTH_HALF_WIDTH_FRAC * width;
    let left = Point::new(center.x - half_w, y);
    let right = Point::new(center.x + half_w, y);
    // mouthCurve is in the same pixel-ish units the presets use
    // (smile up to ~40, frown down to ~-18); positive curves upward.
    let upper_ctrl = Point::new(center.x, y - curve);
    let open = unit * MOUTH_OPEN_FRAC * height;

    let mut path = BezPath::new();
    path.move_to(left);
    path.quad_to(upper_ctrl, right);
    if open > 0.0 {
        let lower_ctrl = Point::new(center.x, y - curve + open);
        path.quad_to(lower_ctrl, left);
        path.close_path();
    }
    path
}

/// A [`FaceRenderer`] that records what it was asked to draw: the built
/// scene and a draw counter. Hosts use it to diff scenes between
/// frames; the tests use it to observe the driver.
#[derive(Debug, Default)]
pub struct ScenePainter {
    last_scene: Option<FaceScene>,
    draw_count: u64,
}

impl ScenePainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_scene(&self) -> Option<&FaceScene> {
        self.last_scene.as_ref()
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }
}

impl FaceRenderer for ScenePainter {
    fn draw(&mut self, canvas: Canvas, params: &FaceParams) -> VisageResult<()> {
        self.last_scene = Some(FaceScene::build(canvas, params));
        self.draw_count += 1;
        Ok(())
    }
}
