//! Integer screen geometry and the cover-fit used to place media on the display.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    pub fn rect(self) -> Rect {
        Rect::new(0, 0, self.w, self.h)
    }

    pub fn center(self) -> (i32, i32) {
        (self.w / 2, self.h / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Same size, moved so that its center lands on `(cx, cy)`.
    pub fn with_center(&self, (cx, cy): (i32, i32)) -> Rect {
        Rect::new(cx - self.w / 2, cy - self.h / 2, self.w, self.h)
    }

    /// Scales both sides by `factor` (floored) keeping the center in place.
    pub fn scaled_about_center(&self, factor: f64) -> Rect {
        let w = (self.w as f64 * factor).floor() as i32;
        let h = (self.h as f64 * factor).floor() as i32;
        Rect::new(0, 0, w, h).with_center(self.center())
    }

    /// Intersection with `other`. Disjoint rects give an empty rect at `self`'s origin.
    pub fn clip(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return Rect::new(self.x, self.y, 0, 0);
        }
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// Centered rectangle that covers `display` while keeping the aspect ratio of `media`.
///
/// The dominant axis matches the display exactly; the other one overflows and is
/// expected to be cropped. Works in integer arithmetic so results are floored and
/// exact ratios never lose a pixel.
pub fn fit(media: Size, display: Size) -> Rect {
    let (mw, mh) = (media.w.max(1) as i64, media.h.max(1) as i64);
    let (dw, dh) = (display.w as i64, display.h as i64);

    // mw / mh > dw / dh, cross-multiplied
    let (w, h) = if mw * dh > mh * dw {
        (dh * mw / mh, dh)
    } else {
        (dw, dw * mh / mw)
    };

    Rect::new(0, 0, w as i32, h as i32).with_center(display.center())
}
