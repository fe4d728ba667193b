//! Exact integer predicates over grid segments.
//!
//! Every predicate works on lattice coordinates, so no tolerance is involved:
//! a zero orientation is exactly collinear.

use super::types::Point;

/// Signed twice-area of the triangle `p, q, r`.
///
/// Positive and negative values encode the turn direction; zero means the
/// three points are collinear.
pub fn orientation(p: Point, q: Point, r: Point) -> i64 {
    let (px, py) = (i64::from(p.x), i64::from(p.y));
    let (qx, qy) = (i64::from(q.x), i64::from(q.y));
    let (rx, ry) = (i64::from(r.x), i64::from(r.y));
    (qx - px) * (ry - py) - (qy - py) * (rx - px)
}

/// Checks whether `q` lies within the bounding box of segment `p`–`r`.
///
/// Only meaningful once `q` is known to be collinear with `p` and `r`.
fn within_box(p: Point, q: Point, r: Point) -> bool {
    p.x.min(r.x) <= q.x && q.x <= p.x.max(r.x) && p.y.min(r.y) <= q.y && q.y <= p.y.max(r.y)
}

/// Checks whether `q` lies on segment `p`–`r` without being one of its endpoints.
fn strictly_inside(p: Point, q: Point, r: Point) -> bool {
    q != p && q != r && orientation(p, r, q) == 0 && within_box(p, q, r)
}

/// Checks whether segments `a1`–`a2` and `b1`–`b2` properly intersect.
///
/// True when the segments strictly cross, when an endpoint of one lies in the
/// interior of the other, or when both are collinear and overlap over more
/// than a single point. Sharing one endpoint is not an intersection.
pub fn proper_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    let opposite = |l: i64, r: i64| (l > 0 && r < 0) || (l < 0 && r > 0);
    if opposite(o1, o2) && opposite(o3, o4) {
        return true;
    }

    if strictly_inside(a1, b1, a2)
        || strictly_inside(a1, b2, a2)
        || strictly_inside(b1, a1, b2)
        || strictly_inside(b1, a2, b2)
    {
        return true;
    }

    // Collinear segments whose endpoints all coincide pairwise (identical
    // segments) slip through the interior test above.
    if o1 == 0 && o2 == 0 {
        let same = (a1 == b1 && a2 == b2) || (a1 == b2 && a2 == b1);
        return same && a1 != a2;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_orientation_sign() {
        assert!(orientation(p(0, 0), p(1, 0), p(1, 1)) > 0);
        assert!(orientation(p(0, 0), p(1, 0), p(1, -1)) < 0);
        assert_eq!(orientation(p(0, 0), p(1, 1), p(3, 3)), 0);
    }

    #[test]
    fn test_diagonals_cross() {
        assert!(proper_intersect(p(1, 1), p(2, 2), p(2, 1), p(1, 2)));
    }

    #[test]
    fn test_shared_endpoint_is_not_intersection() {
        assert!(!proper_intersect(p(0, 0), p(1, 0), p(1, 0), p(1, 1)));
        assert!(!proper_intersect(p(0, 0), p(1, 0), p(1, 0), p(2, 0)));
    }

    #[test]
    fn test_collinear_overlap() {
        assert!(proper_intersect(p(0, 0), p(2, 0), p(1, 0), p(3, 0)));
        assert!(proper_intersect(p(0, 0), p(2, 0), p(0, 0), p(1, 0)));
        assert!(proper_intersect(p(0, 0), p(1, 0), p(1, 0), p(0, 0)));
    }

    #[test]
    fn test_endpoint_touching_interior() {
        // (2,1) is the midpoint of the vertical double-step segment.
        assert!(proper_intersect(p(1, 1), p(2, 1), p(2, 0), p(2, 2)));
    }

    #[test]
    fn test_disjoint() {
        assert!(!proper_intersect(p(0, 0), p(1, 0), p(0, 1), p(1, 1)));
        assert!(!proper_intersect(p(0, 0), p(1, 0), p(2, 0), p(3, 0)));
    }
}
