/// Mean of the finite values in the slice, skipping NaN. Returns NaN when nothing is left.
pub fn nan_mean(data: &[f64]) -> f64 {
    let (sum, count) = data
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Returns the smallest and largest non NaN values of the slice
pub fn min_max(data: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    data.iter().for_each(|v| {
        if v.is_nan() {
            return;
        }

        if *v > max {
            max = *v;
        }

        if *v < min {
            min = *v;
        }
    });

    (min, max)
}
