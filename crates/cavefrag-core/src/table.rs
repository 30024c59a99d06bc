//! Lookups over calibration breakpoint tables.
//!
//! The empirical models are defined by fixed `(x, y)` breakpoints. The
//! tables themselves live next to the model that owns them; this module
//! only provides the two lookup rules they use.

/// Piecewise-linear interpolation over breakpoints sorted by ascending `x`.
///
/// Inputs at or below the first breakpoint return its `y`; inputs at or
/// above the last breakpoint return the last `y`. An empty table yields 0.
///
/// ```
/// use cavefrag_core::table::interpolate;
/// let t = [(0.0, 0.0), (10.0, 1.0)];
/// assert_eq!(interpolate(&t, 5.0), 0.5);
/// assert_eq!(interpolate(&t, -3.0), 0.0);
/// assert_eq!(interpolate(&t, 42.0), 1.0);
/// ```
pub fn interpolate(table: &[(f64, f64)], x: f64) -> f64 {
    let (Some(&(x0, y0)), Some(&(xn, yn))) = (table.first(), table.last()) else {
        return 0.0;
    };
    if x <= x0 {
        return y0;
    }
    if x >= xn {
        return yn;
    }
    for pair in table.windows(2) {
        let (xa, ya) = pair[0];
        let (xb, yb) = pair[1];
        if xa <= x && x <= xb {
            let t = (x - xa) / (xb - xa);
            return ya + t * (yb - ya);
        }
    }
    yn
}

/// Step lookup: the `y` of the first breakpoint whose threshold is
/// `>= x`, or `None` if `x` exceeds every threshold.
///
/// ```
/// use cavefrag_core::table::step_up;
/// let t = [(5.0, 0.9), (10.0, 0.8)];
/// assert_eq!(step_up(&t, 5.0), Some(0.9));
/// assert_eq!(step_up(&t, 7.0), Some(0.8));
/// assert_eq!(step_up(&t, 11.0), None);
/// ```
pub fn step_up(table: &[(f64, f64)], x: f64) -> Option<f64> {
    table
        .iter()
        .find(|&&(threshold, _)| x <= threshold)
        .map(|&(_, y)| y)
}
