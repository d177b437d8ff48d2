//! Great-circle distance between coordinates.
//!
//! Uses the haversine formula on a spherical Earth. Accurate to well within
//! a percent at city scale, which is all nearby-stop search needs.

use crate::domain::Position;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates, in meters.
///
/// Inputs are not validated. NaN in either coordinate yields NaN.
///
/// # Example
///
/// ```
/// use stop_finder::distance::distance;
/// use stop_finder::domain::Position;
///
/// let a = Position::new(22.30, 114.17);
/// assert_eq!(distance(a, a), 0.0);
/// ```
pub fn distance(a: Position, b: Position) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lon - a.lon).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(lat: f64, lon: f64) -> Position {
        Position::new(lat, lon)
    }

    #[test]
    fn same_point_is_zero() {
        assert_eq!(distance(pos(22.30, 114.17), pos(22.30, 114.17)), 0.0);
        assert_eq!(distance(pos(0.0, 0.0), pos(0.0, 0.0)), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance(pos(22.0, 114.0), pos(23.0, 114.0));
        let expected = 111_320.0;
        assert!(
            (d - expected).abs() / expected < 0.005,
            "1 degree latitude was {d} m"
        );
    }

    #[test]
    fn city_scale_distance() {
        // 0.01 degrees in both directions near Mong Kok.
        let d = distance(pos(22.30, 114.17), pos(22.31, 114.18));
        assert!((1400.0..1600.0).contains(&d), "got {d} m");
    }

    #[test]
    fn antipodal_points() {
        let d = distance(pos(0.0, 0.0), pos(0.0, 180.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((d - half_circumference).abs() < 1.0);
    }

    #[test]
    fn nan_propagates() {
        assert!(distance(pos(f64::NAN, 0.0), pos(0.0, 0.0)).is_nan());
        assert!(distance(pos(0.0, 0.0), pos(0.0, f64::NAN)).is_nan());
    }

    #[test]
    fn out_of_range_still_computes() {
        let d = distance(pos(95.0, 200.0), pos(0.0, 0.0));
        assert!(d.is_finite());
        assert!(d >= 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate() -> impl Strategy<Value = Position> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Position::new(lat, lon))
    }

    proptest! {
        /// distance(A, B) == distance(B, A)
        #[test]
        fn symmetric(a in coordinate(), b in coordinate()) {
            let ab = distance(a, b);
            let ba = distance(b, a);
            prop_assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0));
        }

        /// distance(A, A) == 0
        #[test]
        fn identity(a in coordinate()) {
            prop_assert!(distance(a, a).abs() < 1e-6);
        }

        /// Never negative and never more than half the circumference.
        #[test]
        fn bounded(a in coordinate(), b in coordinate()) {
            let d = distance(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_M + 1e-6);
        }

        /// Moving further along a meridian never gets closer.
        #[test]
        fn monotonic_along_meridian(
            lat in -80.0f64..80.0,
            lon in -180.0f64..180.0,
            near in 0.0f64..5.0,
            extra in 0.0f64..5.0,
        ) {
            let origin = Position::new(lat, lon);
            let d_near = distance(origin, Position::new(lat + near, lon));
            let d_far = distance(origin, Position::new(lat + near + extra, lon));
            prop_assert!(d_near <= d_far + 1e-6);
        }
    }
}
