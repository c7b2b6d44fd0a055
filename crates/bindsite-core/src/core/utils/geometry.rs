use nalgebra::Point3;

#[inline]
pub fn euclidean_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance(a, b)
}

/// Squared Euclidean distance; avoids the square root in hot comparison loops.
#[inline]
pub fn squared_euclidean_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance_squared(a, b)
}

pub fn is_finite_point(point: &Point3<f64>) -> bool {
    point.coords.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn euclidean_distance_of_axis_aligned_points() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert!((euclidean_distance(&a, &b) - 5.0).abs() < EPSILON);
        assert!((squared_euclidean_distance(&a, &b) - 25.0).abs() < EPSILON);
    }

    #[test]
    fn distances_are_symmetric() {
        let a = Point3::new(1.5, -2.25, 7.0);
        let b = Point3::new(-3.0, 0.5, 2.125);
        assert_eq!(euclidean_distance(&a, &b), euclidean_distance(&b, &a));
        assert_eq!(
            squared_euclidean_distance(&a, &b),
            squared_euclidean_distance(&b, &a)
        );
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = Point3::new(12.0, 13.0, 14.0);
        assert_eq!(euclidean_distance(&a, &a), 0.0);
    }

    #[test]
    fn finite_check_rejects_nan_and_infinity() {
        assert!(is_finite_point(&Point3::new(1.0, 2.0, 3.0)));
        assert!(!is_finite_point(&Point3::new(f64::NAN, 2.0, 3.0)));
        assert!(!is_finite_point(&Point3::new(1.0, f64::INFINITY, 3.0)));
    }
}
