use nalgebra::Vector3;

/// Area of one triangle and the gradient of that area with respect to each
/// of its three vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleArea {
    pub area: f64,
    pub gradients: [Vector3<f64>; 3],
}

/// Measures triangle `(a, b, c)` from its edge vectors `ab = b - a` and
/// `ac = c - a`.
///
/// Returns `None` when the edges are collinear and the normal is undefined.
pub fn triangle_area(ab: &Vector3<f64>, ac: &Vector3<f64>) -> Option<TriangleArea> {
    let normal = ab.cross(ac);
    let twice_area = normal.norm();
    if !twice_area.is_finite() || twice_area <= 0.0 {
        return None;
    }
    let unit_normal = normal / twice_area;
    let bc = ac - ab;

    Some(TriangleArea {
        area: 0.5 * twice_area,
        gradients: [
            0.5 * unit_normal.cross(&bc),
            -0.5 * unit_normal.cross(ac),
            0.5 * unit_normal.cross(ab),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn vectors_approx_equal(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        (a - b).norm() < TOLERANCE
    }

    #[test]
    fn right_triangle_has_half_unit_area() {
        let result = triangle_area(&Vector3::x(), &Vector3::y()).unwrap();
        assert!((result.area - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn right_triangle_gradients_point_away_from_opposite_edge() {
        let result = triangle_area(&Vector3::x(), &Vector3::y()).unwrap();
        assert!(vectors_approx_equal(
            &result.gradients[0],
            &Vector3::new(-0.5, -0.5, 0.0)
        ));
        assert!(vectors_approx_equal(
            &result.gradients[1],
            &Vector3::new(0.5, 0.0, 0.0)
        ));
        assert!(vectors_approx_equal(
            &result.gradients[2],
            &Vector3::new(0.0, 0.5, 0.0)
        ));
    }

    #[test]
    fn gradients_sum_to_zero() {
        let ab = Vector3::new(0.3, -1.2, 0.7);
        let ac = Vector3::new(1.1, 0.4, -0.2);
        let result = triangle_area(&ab, &ac).unwrap();
        let sum: Vector3<f64> = result.gradients.iter().sum();
        assert!(sum.norm() < TOLERANCE);
    }

    #[test]
    fn gradients_match_finite_differences() {
        let a = Vector3::new(0.1, 0.2, -0.3);
        let b = Vector3::new(1.3, 0.1, 0.2);
        let c = Vector3::new(0.4, 1.1, 0.5);
        let area_of = |a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>| {
            triangle_area(&(b - a), &(c - a)).unwrap().area
        };
        let result = triangle_area(&(b - a), &(c - a)).unwrap();
        let h = 1e-6;

        for axis in 0..3 {
            let mut step = Vector3::zeros();
            step[axis] = h;
            let numeric = [
                (area_of(a + step, b, c) - area_of(a - step, b, c)) / (2.0 * h),
                (area_of(a, b + step, c) - area_of(a, b - step, c)) / (2.0 * h),
                (area_of(a, b, c + step) - area_of(a, b, c - step)) / (2.0 * h),
            ];
            for vertex in 0..3 {
                assert!((result.gradients[vertex][axis] - numeric[vertex]).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn collinear_edges_have_no_area() {
        let ab = Vector3::new(1.0, 1.0, 0.0);
        assert!(triangle_area(&ab, &(2.0 * ab)).is_none());
    }
}
