mod maxrects;
mod rect;

pub use maxrects::{MaxRectsBin, Placement, Score};
pub use rect::{Point, Rect};
