//! Circular and hyperbolic functions. The inverse circular functions only
//! accept arguments strictly inside `(-1, 1)`.

fn in_unit_interval(v: f64) -> bool {
    -1.0 < v && v < 1.0
}

pub fn sin(v: f64) -> f64 {
    v.sin()
}

pub fn cos(v: f64) -> f64 {
    v.cos()
}

pub fn tan(v: f64) -> f64 {
    v.tan()
}

pub fn asin(v: f64) -> f64 {
    if in_unit_interval(v) {
        v.asin()
    } else {
        0.0
    }
}

pub fn acos(v: f64) -> f64 {
    if in_unit_interval(v) {
        v.acos()
    } else {
        0.0
    }
}

pub fn atan(v: f64) -> f64 {
    if in_unit_interval(v) {
        v.atan()
    } else {
        0.0
    }
}

pub fn sinh(v: f64) -> f64 {
    v.sinh()
}

pub fn cosh(v: f64) -> f64 {
    v.cosh()
}

pub fn tanh(v: f64) -> f64 {
    v.tanh()
}
