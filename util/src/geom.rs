use glam::{ivec2, IVec2};

/// 8 directions, clock face order.
pub const DIR_8: [IVec2; 8] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([1, 1]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 1]),
    IVec2::from_array([-1, 0]),
    IVec2::from_array([-1, -1]),
];

/// 4 directions, clock face order.
pub const DIR_4: [IVec2; 4] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 0]),
];

pub trait VecExt: Sized + Default {
    /// Absolute size of vector in chessboard metric, the number of king
    /// moves needed to cover it.
    fn chess_len(&self) -> i32;

    /// Squared Euclidean length.
    fn len2(&self) -> i32;

    /// Vec points to one of the eight surrounding cells.
    fn is_adjacent(&self) -> bool {
        self.chess_len() == 1
    }

    /// Whether the vector reaches no further than `radius` in Euclidean
    /// metric.
    fn within_radius(&self, radius: i32) -> bool {
        self.len2() <= radius * radius
    }

    /// Clamp the vector into a single 8-direction step.
    fn to_dir8(&self) -> Self;
}

impl VecExt for IVec2 {
    fn chess_len(&self) -> i32 {
        self[0].abs().max(self[1].abs())
    }

    fn len2(&self) -> i32 {
        self[0] * self[0] + self[1] * self[1]
    }

    fn to_dir8(&self) -> Self {
        ivec2(self[0].signum(), self[1].signum())
    }
}

/// Iterate the cells on a line from `a` towards `b`.
///
/// The start point is included, the end point is not.
pub fn bresenham_line(
    a: impl Into<IVec2>,
    b: impl Into<IVec2>,
) -> impl Iterator<Item = IVec2> {
    let (a, b): (IVec2, IVec2) = (a.into(), b.into());

    let d = b - a;
    let step = d.signum();
    let d = d.abs() * ivec2(1, -1);
    let mut p = a;
    let mut err = d.x + d.y;

    std::iter::from_fn(move || {
        if p == b {
            None
        } else {
            let ret = p;

            let e2 = 2 * err;
            if e2 >= d.y {
                err += d.y;
                p.x += step.x;
            }
            if e2 <= d.x {
                err += d.x;
                p.y += step.y;
            }
            Some(ret)
        }
    })
}
