/// Converts rectangular (x, y) into polar (r, theta) with theta in degrees.
///
/// r = sqrt(x^2 + y^2)
/// theta = atan2(y, x), which lands in (-180, 180] and is then shifted into [0, 360)
///
/// NaN components produce NaN results. When x and y are both zero, of either sign, the
/// angle is 0.
pub fn polar_degrees(x: f64, y: f64) -> (f64, f64) {
    let r = x.hypot(y);
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let theta = y.atan2(x).to_degrees();
    (r, normalize_degrees(theta))
}

/// Converts rectangular (x, y) into polar (r, theta) with theta in radians, left unnormalized
pub fn polar_radians(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), y.atan2(x))
}

/// Shifts an angle from (-180, 180] into [0, 360). Only negative angles are moved.
pub fn normalize_degrees(theta: f64) -> f64 {
    if theta < 0.0 {
        let shifted = theta + 360.0;
        // Tiny negative angles round up to exactly 360
        if shifted >= 360.0 {
            0.0
        } else {
            shifted
        }
    } else {
        // Also folds -0.0 into 0.0
        theta + 0.0
    }
}
