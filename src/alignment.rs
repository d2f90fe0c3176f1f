//! Alignment flags: anchor position plus sizing modifiers.
//!
//! An [`Alignment`] combines at most one horizontal anchor (`LEFT`,
//! `HOR_CENTER`, `RIGHT`) and one vertical anchor (`TOP`, `VERT_CENTER`,
//! `BOTTOM`) with orthogonal modifier bits. Alignments have a text form of
//! space-separated names, e.g. `"left vertcenter horexpand"`, parsed with a
//! logos lexer.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use logos::Logos;

use crate::error::AlignmentParseError;
use crate::geometry::Axis;

bitflags! {
    /// Anchor and sizing flags for placing a box inside a rect.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Alignment: u32 {
        const LEFT = 1 << 0;
        const HOR_CENTER = 1 << 1;
        const RIGHT = 1 << 2;
        const TOP = 1 << 3;
        const VERT_CENTER = 1 << 4;
        const BOTTOM = 1 << 5;
        const HOR_EXPAND = 1 << 6;
        const VERT_EXPAND = 1 << 7;
        const HOR_SHRINK = 1 << 8;
        const VERT_SHRINK = 1 << 9;
        /// Place outside the rect's left/right edge instead of inside it.
        const HOR_OUT = 1 << 10;
        /// Place outside the rect's top/bottom edge instead of inside it.
        const VERT_OUT = 1 << 11;
        /// Scale uniformly when expanding or shrinking.
        const PROPORTIONAL = 1 << 12;
        /// Apply the margin as a displacement after placement.
        const MARGIN_IS_OFFSET = 1 << 13;

        const CENTER = Self::HOR_CENTER.bits() | Self::VERT_CENTER.bits();
        const EXPAND = Self::HOR_EXPAND.bits() | Self::VERT_EXPAND.bits();
        const SHRINK = Self::HOR_SHRINK.bits() | Self::VERT_SHRINK.bits();
        const OUT = Self::HOR_OUT.bits() | Self::VERT_OUT.bits();
        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();

        const HORIZONTAL = Self::LEFT.bits()
            | Self::HOR_CENTER.bits()
            | Self::RIGHT.bits()
            | Self::HOR_EXPAND.bits()
            | Self::HOR_SHRINK.bits()
            | Self::HOR_OUT.bits();
        const VERTICAL = Self::TOP.bits()
            | Self::VERT_CENTER.bits()
            | Self::BOTTOM.bits()
            | Self::VERT_EXPAND.bits()
            | Self::VERT_SHRINK.bits()
            | Self::VERT_OUT.bits();
    }
}

/// Individual flag names in text order. Composite flags are never printed.
const NAMES: &[(Alignment, &str)] = &[
    (Alignment::LEFT, "left"),
    (Alignment::HOR_CENTER, "horcenter"),
    (Alignment::RIGHT, "right"),
    (Alignment::TOP, "top"),
    (Alignment::VERT_CENTER, "vertcenter"),
    (Alignment::BOTTOM, "bottom"),
    (Alignment::HOR_EXPAND, "horexpand"),
    (Alignment::VERT_EXPAND, "vertexpand"),
    (Alignment::HOR_SHRINK, "horshrink"),
    (Alignment::VERT_SHRINK, "vertshrink"),
    (Alignment::HOR_OUT, "horout"),
    (Alignment::VERT_OUT, "vertout"),
    (Alignment::PROPORTIONAL, "proportional"),
    (Alignment::MARGIN_IS_OFFSET, "marginisoffset"),
];

impl Alignment {
    fn axis_mask(axis: Axis) -> Alignment {
        match axis {
            Axis::Horizontal => Alignment::HORIZONTAL,
            Axis::Vertical => Alignment::VERTICAL,
        }
    }

    /// Only the bits that concern `axis`.
    pub fn only(self, axis: Axis) -> Alignment {
        self & Self::axis_mask(axis)
    }

    /// `self` with every bit of `other` cleared.
    pub fn subtracted(self, other: Alignment) -> Alignment {
        self.difference(other)
    }

    /// Left and right anchors swapped.
    pub fn flipped_horizontal(self) -> Alignment {
        let mut out = self.subtracted(Alignment::LEFT | Alignment::RIGHT);
        if self.contains(Alignment::LEFT) {
            out |= Alignment::RIGHT;
        }
        if self.contains(Alignment::RIGHT) {
            out |= Alignment::LEFT;
        }
        out
    }

    /// Top and bottom anchors swapped.
    pub fn flipped_vertical(self) -> Alignment {
        let mut out = self.subtracted(Alignment::TOP | Alignment::BOTTOM);
        if self.contains(Alignment::TOP) {
            out |= Alignment::BOTTOM;
        }
        if self.contains(Alignment::BOTTOM) {
            out |= Alignment::TOP;
        }
        out
    }

    /// Whether the expand bit for `axis` is set.
    pub fn is_expand(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Alignment::HOR_EXPAND),
            Axis::Vertical => self.contains(Alignment::VERT_EXPAND),
        }
    }

    /// Whether the shrink bit for `axis` is set.
    pub fn is_shrink(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Alignment::HOR_SHRINK),
            Axis::Vertical => self.contains(Alignment::VERT_SHRINK),
        }
    }

    /// Anchored at the trailing edge (right or bottom) of `axis`.
    pub fn is_trailing(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Alignment::RIGHT),
            Axis::Vertical => self.contains(Alignment::BOTTOM),
        }
    }

    /// Centered on `axis`, without a leading or trailing anchor.
    pub fn is_centered(self, axis: Axis) -> bool {
        let (lead, center, trail) = match axis {
            Axis::Horizontal => (Alignment::LEFT, Alignment::HOR_CENTER, Alignment::RIGHT),
            Axis::Vertical => (Alignment::TOP, Alignment::VERT_CENTER, Alignment::BOTTOM),
        };
        self.contains(center) && !self.intersects(lead | trail)
    }

    /// The leading anchor (left or top) for `axis`.
    pub fn leading(axis: Axis) -> Alignment {
        match axis {
            Axis::Horizontal => Alignment::LEFT,
            Axis::Vertical => Alignment::TOP,
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(*flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// Alignment name token.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r|,]+")]
enum Token {
    #[token("left")]
    Left,
    #[token("horcenter")]
    HorCenter,
    #[token("right")]
    Right,
    #[token("top")]
    Top,
    #[token("vertcenter")]
    VertCenter,
    #[token("bottom")]
    Bottom,
    #[token("horexpand")]
    HorExpand,
    #[token("vertexpand")]
    VertExpand,
    #[token("horshrink")]
    HorShrink,
    #[token("vertshrink")]
    VertShrink,
    #[token("horout")]
    HorOut,
    #[token("vertout")]
    VertOut,
    #[token("proportional")]
    Proportional,
    #[token("marginisoffset")]
    MarginIsOffset,
    #[token("center")]
    Center,
    #[token("expand")]
    Expand,
    #[token("shrink")]
    Shrink,
    #[token("out")]
    Out,
    #[token("none")]
    Empty,

    /// Any other word; rejected by the parser.
    #[regex(r"[A-Za-z_][A-Za-z0-9_-]*", priority = 1)]
    Word,
}

impl Token {
    fn flags(self) -> Option<Alignment> {
        Some(match self {
            Token::Left => Alignment::LEFT,
            Token::HorCenter => Alignment::HOR_CENTER,
            Token::Right => Alignment::RIGHT,
            Token::Top => Alignment::TOP,
            Token::VertCenter => Alignment::VERT_CENTER,
            Token::Bottom => Alignment::BOTTOM,
            Token::HorExpand => Alignment::HOR_EXPAND,
            Token::VertExpand => Alignment::VERT_EXPAND,
            Token::HorShrink => Alignment::HOR_SHRINK,
            Token::VertShrink => Alignment::VERT_SHRINK,
            Token::HorOut => Alignment::HOR_OUT,
            Token::VertOut => Alignment::VERT_OUT,
            Token::Proportional => Alignment::PROPORTIONAL,
            Token::MarginIsOffset => Alignment::MARGIN_IS_OFFSET,
            Token::Center => Alignment::CENTER,
            Token::Expand => Alignment::EXPAND,
            Token::Shrink => Alignment::SHRINK,
            Token::Out => Alignment::OUT,
            Token::Empty => Alignment::empty(),
            Token::Word => return None,
        })
    }
}

impl FromStr for Alignment {
    type Err = AlignmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lexer = Token::lexer(s);
        let mut out = Alignment::empty();
        while let Some(token) = lexer.next() {
            let flags = token
                .ok()
                .and_then(Token::flags)
                .ok_or_else(|| AlignmentParseError::UnknownName(lexer.slice().to_owned()))?;
            out |= flags;
        }
        Ok(out)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
