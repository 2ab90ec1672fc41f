/// Natural logarithm, `0` unless `v > 0`.
pub fn log(v: f64) -> f64 {
    if v > 0.0 {
        v.ln()
    } else {
        0.0
    }
}

pub fn floor(v: f64) -> f64 {
    v.floor()
}

pub fn ceil(v: f64) -> f64 {
    v.ceil()
}

/// Uniform in `[0, 1)`; the argument is ignored.
pub fn random(_v: f64) -> f64 {
    rand::random::<f64>()
}

pub fn abs(v: f64) -> f64 {
    v.abs()
}

/// `-1`, `0` or `1`. Unlike [`f64::signum`], zero maps to zero.
pub fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        v
    }
}

/// Square root, `0` unless `v >= 0`.
pub fn sqrt(v: f64) -> f64 {
    if v >= 0.0 {
        v.sqrt()
    } else {
        0.0
    }
}
