// Width the original artwork was laid out against; every distance in the
// game is authored at this width and scaled by `Viewport::ratio()`
pub const REFERENCE_WIDTH: f32 = 805.0;

// Canvas aspect is fixed at 852x393
const MAX_CANVAS_WIDTH: f32 = 852.0;
const CANVAS_ASPECT: f32 = 393.0 / 852.0;
const WIDE_WINDOW: f32 = 900.0;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn new_from_x_y(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect::new(Point { x, y }, Size { width, height })
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Full 2D AABB test, see `boxes_intersect`
    pub fn intersects(&self, other: &Rect) -> bool {
        boxes_intersect(
            self.x(),
            self.y(),
            self.width(),
            self.height(),
            other.x(),
            other.y(),
            other.width(),
            other.height(),
        )
    }
}

/// Horizontal interval overlap
/// - all entities share the same ground band, so layout only ever
///   compares x extents
/// - strict comparison : touching edges do NOT overlap
pub fn overlaps(ax: f32, aw: f32, bx: f32, bw: f32) -> bool {
    ax < bx + bw && ax + aw > bx
}

/// Same as `overlaps` but both intervals are pushed apart by `buffer`
/// ELI5:
/// ┌──────────── buffer ──┬──── b ────┬── buffer ────────────┐
/// │  a may not start in here ... or end in here              │
/// └──────────────────────────────────────────────────────────┘
pub fn overlaps_with_buffer(ax: f32, aw: f32, bx: f32, bw: f32, buffer: f32) -> bool {
    ax < bx + bw + buffer && ax + aw + buffer > bx
}

/// Full axis aligned bounding box intersection, used for live collisions
/// between the ball and rocks/droplets where the jump arc makes the
/// vertical extent matter
#[allow(clippy::too_many_arguments)]
pub fn boxes_intersect(
    ax: f32,
    ay: f32,
    aw: f32,
    ah: f32,
    bx: f32,
    by: f32,
    bw: f32,
    bh: f32,
) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

/// Canvas dimensions in pixels
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: REFERENCE_WIDTH,
            height: 393.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    /// Scale factor from authored units to canvas pixels
    pub fn ratio(&self) -> f32 {
        self.width / REFERENCE_WIDTH
    }

    /// Size the canvas for the page
    /// - wide windows get 3/4 of the window, capped at 852
    /// - narrow windows (phones) get the full window width
    pub fn fit(window_width: f32) -> Self {
        let width = if window_width >= WIDE_WINDOW {
            (window_width * 0.75).min(MAX_CANVAS_WIDTH)
        } else {
            window_width
        };
        Viewport {
            width,
            height: (width * CANVAS_ASPECT).round(),
        }
    }
}
