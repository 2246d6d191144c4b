pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// `sin` remapped from `-1..=1` into `0..=1`.
pub(crate) fn unit_sin(x: f64) -> f64 {
    0.5 + 0.5 * x.sin()
}

/// `cos` remapped from `-1..=1` into `0..=1`.
pub(crate) fn unit_cos(x: f64) -> f64 {
    0.5 + 0.5 * x.cos()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
