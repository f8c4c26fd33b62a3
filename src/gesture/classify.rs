use super::Gesture;

/// Displacement in device units below which a press/release cycle is a tap.
pub const DEFAULT_THRESHOLD: u32 = 100;

/// Maps accumulated displacement to a gesture.
///
/// Below `threshold` on both axes is a tap. Otherwise the strictly larger axis wins and an
/// exact tie goes to the vertical axis.
pub fn classify(ax: i64, ay: i64, threshold: u32) -> Gesture {
    let threshold = threshold as u64;
    let abs_x = ax.unsigned_abs();
    let abs_y = ay.unsigned_abs();

    if abs_x < threshold && abs_y < threshold {
        Gesture::Tap
    } else if abs_x > abs_y {
        if ax > 0 {
            Gesture::Right
        } else {
            Gesture::Left
        }
    } else if ay > 0 {
        Gesture::Down
    } else {
        Gesture::Up
    }
}

#[cfg(test)]
mod tests;
