//! Minimal 3D point helpers for catalog derivation and placement snapping

/// A point or direction in scene units
pub type Point3 = [f64; 3];

pub fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: Point3, s: f64) -> Point3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn midpoint(a: Point3, b: Point3) -> Point3 {
    scale(add(a, b), 0.5)
}

pub fn distance(a: Point3, b: Point3) -> f64 {
    let d = sub(a, b);
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}

/// Unit vector, or the input unchanged when it has zero length
pub fn normalize(a: Point3) -> Point3 {
    let len = distance(a, [0.0; 3]);
    if len == 0.0 {
        a
    } else {
        scale(a, 1.0 / len)
    }
}

/// Mean of a non-empty point set
pub fn centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return [0.0; 3];
    }
    let sum = points.iter().fold([0.0; 3], |acc, p| add(acc, *p));
    scale(sum, 1.0 / points.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_and_distance() {
        let m = midpoint([0.0, 0.0, 0.0], [2.0, 4.0, 6.0]);
        assert_eq!(m, [1.0, 2.0, 3.0]);
        assert!((distance([0.0, 0.0, 0.0], [3.0, 4.0, 0.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_is_identity() {
        assert_eq!(normalize([0.0; 3]), [0.0; 3]);
        let n = normalize([0.0, 3.0, 4.0]);
        assert!((n[1] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_centroid() {
        let c = centroid(&[[1.0, 0.0, 0.0], [-1.0, 2.0, 0.0]]);
        assert_eq!(c, [0.0, 1.0, 0.0]);
        assert_eq!(centroid(&[]), [0.0; 3]);
    }
}
