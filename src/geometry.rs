//! Core geometry types: Pos, Size, Rect, Insets, Axis.
//!
//! Coordinates are `f64` in backend units. Layout code keeps every value it
//! produces on whole units (see [`Size::ceil`]), so adjacent child rects share
//! edges exactly.
//!
//! [`Rect::align`] is the one placement primitive used by every container and
//! by leaf views negotiating their own size.

use std::ops::{Add, Neg, Sub};

use crate::alignment::Alignment;

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// Layout axis of a sequential container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Axis::Vertical)
    }

    /// The perpendicular axis.
    #[inline]
    pub const fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

// ---------------------------------------------------------------------------
// Pos
// ---------------------------------------------------------------------------

/// A point, or a displacement between two points.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Pos {
    pub x: f64,
    pub y: f64,
}

impl Pos {
    pub const ZERO: Pos = Pos { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component along `axis`.
    #[inline]
    pub fn get(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

impl Add for Pos {
    type Output = Pos;
    #[inline]
    fn add(self, rhs: Pos) -> Pos {
        Pos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pos {
    type Output = Pos;
    #[inline]
    fn sub(self, rhs: Pos) -> Pos {
        Pos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Pos {
    type Output = Pos;
    #[inline]
    fn neg(self) -> Pos {
        Pos::new(-self.x, -self.y)
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A width/height pair. Also used as a maximum-size hint, where a zero
/// component means "unlimited" on that axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Build a size from main-axis and cross-axis lengths.
    #[inline]
    pub fn from_axis(axis: Axis, main: f64, cross: f64) -> Self {
        match axis {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    #[inline]
    pub fn get(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    #[inline]
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }

    #[inline]
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    /// True when either dimension is zero or negative.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Clamp each component to the matching component of `max`, skipping
    /// components of `max` that are zero (unlimited). Never negative.
    pub fn limited_to(self, max: Size) -> Size {
        let mut out = self;
        if max.width > 0.0 {
            out.width = out.width.min(max.width);
        }
        if max.height > 0.0 {
            out.height = out.height.min(max.height);
        }
        out.non_negative()
    }

    /// Raise components of `self` to at least the non-zero components of `min`.
    pub fn maximized_with(self, min: Size) -> Size {
        self.max(min)
    }

    /// Round both components up to whole units.
    #[inline]
    pub fn ceil(self) -> Size {
        Size::new(self.width.ceil(), self.height.ceil())
    }

    #[inline]
    pub fn non_negative(self) -> Size {
        Size::new(self.width.max(0.0), self.height.max(0.0))
    }

    #[inline]
    pub fn scaled(self, factor: f64) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

impl Add for Size {
    type Output = Size;
    #[inline]
    fn add(self, rhs: Size) -> Size {
        Size::new(self.width + rhs.width, self.height + rhs.height)
    }
}

impl Sub for Size {
    type Output = Size;
    #[inline]
    fn sub(self, rhs: Size) -> Size {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

// ---------------------------------------------------------------------------
// Insets
// ---------------------------------------------------------------------------

/// Per-side distances, used for cell margins and container margins.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const ZERO: Insets = Insets { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };

    #[inline]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    #[inline]
    pub const fn all(value: f64) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    /// `vertical` for top/bottom, `horizontal` for left/right.
    #[inline]
    pub const fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self { top: vertical, right: horizontal, bottom: vertical, left: horizontal }
    }

    /// `left + right`.
    #[inline]
    pub fn width(self) -> f64 {
        self.left + self.right
    }

    /// `top + bottom`.
    #[inline]
    pub fn height(self) -> f64 {
        self.top + self.bottom
    }

    /// Total extent as a size.
    #[inline]
    pub fn size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Inset on the starting edge of `axis` (left or top).
    #[inline]
    pub fn leading(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Sum of both edges along `axis`.
    #[inline]
    pub fn total(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width(),
            Axis::Vertical => self.height(),
        }
    }
}

impl Add for Insets {
    type Output = Insets;
    #[inline]
    fn add(self, rhs: Insets) -> Insets {
        Insets {
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
            left: self.left + rhs.left,
        }
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A rectangle given by its top-left corner and size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A rect of `size` at the origin.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self { x: 0.0, y: 0.0, width: size.width, height: size.height }
    }

    #[inline]
    pub const fn from_pos_size(pos: Pos, size: Size) -> Self {
        Self { x: pos.x, y: pos.y, width: size.width, height: size.height }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub const fn pos(self) -> Pos {
        Pos { x: self.x, y: self.y }
    }

    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    #[inline]
    pub fn center(self) -> Pos {
        Pos::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.size().is_empty()
    }

    /// Start coordinate along `axis`.
    #[inline]
    pub fn start(self, axis: Axis) -> f64 {
        self.pos().get(axis)
    }

    /// Exclusive end coordinate along `axis`.
    #[inline]
    pub fn end(self, axis: Axis) -> f64 {
        self.start(axis) + self.size().get(axis)
    }

    /// Replace the span of this rect along `axis` with `[start, start + len)`.
    pub fn with_span(self, axis: Axis, start: f64, len: f64) -> Rect {
        match axis {
            Axis::Horizontal => Rect::new(start, self.y, len, self.height),
            Axis::Vertical => Rect::new(self.x, start, self.width, len),
        }
    }

    /// Whether the point lies inside the rect (right/bottom edges exclusive).
    #[inline]
    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x < self.right() && pos.y >= self.y && pos.y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rect.
    #[inline]
    pub fn contains_rect(self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether the two rects share a non-zero area.
    #[inline]
    pub fn overlaps(self, other: Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Intersection of two rects, or [`Rect::ZERO`] if they do not overlap.
    pub fn intersection(self, other: Rect) -> Rect {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        if x2 <= x1 || y2 <= y1 {
            Rect::ZERO
        } else {
            Rect::new(x1, y1, x2 - x1, y2 - y1)
        }
    }

    /// Smallest rect containing both.
    pub fn union(self, other: Rect) -> Rect {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    #[inline]
    pub fn translated(self, delta: Pos) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Grow outward by `insets`.
    pub fn expanded(self, insets: Insets) -> Rect {
        Rect::new(
            self.x - insets.left,
            self.y - insets.top,
            self.width + insets.width(),
            self.height + insets.height(),
        )
    }

    /// Shrink inward by `insets`. Width and height are clamped at zero.
    pub fn inset(self, insets: Insets) -> Rect {
        Rect::new(
            self.x + insets.left,
            self.y + insets.top,
            (self.width - insets.width()).max(0.0),
            (self.height - insets.height()).max(0.0),
        )
    }

    /// Place a box of `size` inside this rect according to `alignment`,
    /// after subtracting `margin`.
    ///
    /// Equivalent to [`align_limited`](Self::align_limited) with no maximum.
    pub fn align(self, size: Size, alignment: Alignment, margin: Insets) -> Rect {
        self.align_limited(size, alignment, margin, Size::ZERO)
    }

    /// Place a box of `size` inside this rect.
    ///
    /// Steps, in order:
    /// 1. `margin` is subtracted from every side, unless
    ///    [`Alignment::MARGIN_IS_OFFSET`] is set, in which case the margin is
    ///    applied as a displacement after placement.
    /// 2. Sizing: expand bits fill the axis, shrink bits cap the axis at the
    ///    available length. With [`Alignment::PROPORTIONAL`] the box is scaled
    ///    uniformly instead, preserving its aspect ratio.
    /// 3. Non-zero components of `max_size` cap the result, which is never
    ///    negative.
    /// 4. Anchoring: left/top, right/bottom or centered (offset floored).
    ///    Out bits place the box just outside the matching edge.
    pub fn align_limited(self, size: Size, alignment: Alignment, margin: Insets, max_size: Size) -> Rect {
        let offset_margin = alignment.contains(Alignment::MARGIN_IS_OFFSET);
        let area = if offset_margin { self } else { self.inset(margin) };

        let mut out = if alignment.contains(Alignment::PROPORTIONAL) {
            proportional_size(size, area.size(), alignment)
        } else {
            let mut s = size;
            for axis in [Axis::Horizontal, Axis::Vertical] {
                let avail = area.size().get(axis);
                if alignment.is_expand(axis) {
                    s.set(axis, avail);
                } else if alignment.is_shrink(axis) && s.get(axis) > avail {
                    s.set(axis, avail);
                }
            }
            s
        };
        out = out.limited_to(max_size);

        let x = anchor(area.x, area.width, out.width, alignment, Axis::Horizontal);
        let y = anchor(area.y, area.height, out.height, alignment, Axis::Vertical);
        let mut placed = Rect::from_pos_size(Pos::new(x, y), out);
        if offset_margin {
            placed = placed.translated(Pos::new(margin.left - margin.right, margin.top - margin.bottom));
        }
        placed
    }
}

/// Uniform scale of `size` into `avail` for proportional alignment.
fn proportional_size(size: Size, avail: Size, alignment: Alignment) -> Size {
    if size.is_empty() {
        return size;
    }
    let fx = avail.width / size.width;
    let fy = avail.height / size.height;
    let mut factor: Option<f64> = None;
    let expand_h = alignment.is_expand(Axis::Horizontal);
    let expand_v = alignment.is_expand(Axis::Vertical);
    if expand_h || expand_v {
        factor = Some(match (expand_h, expand_v) {
            (true, true) => fx.min(fy),
            (true, false) => fx,
            _ => fy,
        });
    }
    let shrink_h = alignment.is_shrink(Axis::Horizontal) && fx < 1.0;
    let shrink_v = alignment.is_shrink(Axis::Vertical) && fy < 1.0;
    if shrink_h || shrink_v {
        let s = match (shrink_h, shrink_v) {
            (true, true) => fx.min(fy),
            (true, false) => fx,
            _ => fy,
        };
        factor = Some(factor.map_or(s, |f| f.min(s)));
    }
    match factor {
        Some(f) => size.scaled(f),
        None => size,
    }
}

/// Start coordinate of a span of `len` inside `[start, start + avail)`.
fn anchor(start: f64, avail: f64, len: f64, alignment: Alignment, axis: Axis) -> f64 {
    let (lead, center, trail, out) = match axis {
        Axis::Horizontal => (Alignment::LEFT, Alignment::HOR_CENTER, Alignment::RIGHT, Alignment::HOR_OUT),
        Axis::Vertical => (Alignment::TOP, Alignment::VERT_CENTER, Alignment::BOTTOM, Alignment::VERT_OUT),
    };
    if alignment.contains(out) {
        if alignment.contains(lead) {
            return start - len;
        }
        if alignment.contains(trail) {
            return start + avail;
        }
    }
    if alignment.contains(lead) {
        start
    } else if alignment.contains(trail) {
        start + avail - len
    } else if alignment.contains(center) {
        start + ((avail - len) / 2.0).floor()
    } else {
        start
    }
}

// ===========================================================================
// Tests
// ===========================================================================
