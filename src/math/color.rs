use image::Rgba;

/// Largest possible distance between two colors, `sqrt(4 * 255^2)`
pub const MAX_COLOR_DISTANCE: f64 = 510.0;

/// Euclidean distance between two colors over all four channels
///
/// Range: `[0, MAX_COLOR_DISTANCE]`
pub fn color_distance(a: Rgba<u8>, b: Rgba<u8>) -> f64 {
    let squared: i32 = a
        .0
        .iter()
        .zip(b.0.iter())
        .map(|(&ca, &cb)| {
            let delta = i32::from(ca) - i32::from(cb);
            delta * delta
        })
        .sum();
    f64::from(squared).sqrt()
}

/// Move `from` toward `to` by at most `max_step`
///
/// Closes the gap completely when it is no larger than `max_step`.
pub fn step_toward(from: u8, to: u8, max_step: u8) -> u8 {
    let gap = i16::from(to) - i16::from(from);
    let limit = i16::from(max_step);
    let step = gap.clamp(-limit, limit);
    (i16::from(from) + step).clamp(0, 255) as u8
}
