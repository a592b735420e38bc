use serde_derive::{Deserialize, Serialize};

/// Axis-aligned box with the origin at its left-top corner, sizes in pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl BBox {
    #[inline]
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline(always)]
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    #[inline(always)]
    pub fn cx(&self) -> f32 {
        self.x + self.w / 2.
    }

    #[inline(always)]
    pub fn cy(&self) -> f32 {
        self.y + self.h / 2.
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn iou(&self, other: &BBox) -> f32 {
        let i_xmin = self.x.max(other.x);
        let i_xmax = self.right().min(other.right());
        let i_ymin = self.y.max(other.y);
        let i_ymax = self.bottom().min(other.bottom());
        let i_area = (i_xmax - i_xmin).max(0.) * (i_ymax - i_ymin).max(0.);

        let union = self.area() + other.area() - i_area;
        if union <= 0. {
            return 0.;
        }

        i_area / union
    }
}
