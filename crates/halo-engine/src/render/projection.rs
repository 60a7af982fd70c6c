/// Column-major orthographic projection mapping the box
/// `[left, right] × [bottom, top] × [near, far]` to clip space
/// (`x, y ∈ [-1, 1]`, `z ∈ [0, 1]`).
///
/// Passing `bottom = height, top = 0` yields the usual top-left-origin pixel space.
pub fn orthographic_off_center(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> [[f32; 4]; 4] {
    let rw = 1.0 / (right - left);
    let rh = 1.0 / (top - bottom);
    let rd = 1.0 / (far - near);

    [
        [2.0 * rw, 0.0, 0.0, 0.0],
        [0.0, 2.0 * rh, 0.0, 0.0],
        [0.0, 0.0, rd, 0.0],
        [-(left + right) * rw, -(top + bottom) * rh, -near * rd, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(m: &[[f32; 4]; 4], x: f32, y: f32) -> (f32, f32) {
        (
            m[0][0] * x + m[1][0] * y + m[3][0],
            m[0][1] * x + m[1][1] * y + m[3][1],
        )
    }

    #[test]
    fn pixel_corners_map_to_clip_corners() {
        let m = orthographic_off_center(0.0, 800.0, 600.0, 0.0, 0.0, 1.0);
        assert_eq!(apply(&m, 0.0, 0.0), (-1.0, 1.0));
        assert_eq!(apply(&m, 800.0, 600.0), (1.0, -1.0));
        assert_eq!(apply(&m, 400.0, 300.0), (0.0, 0.0));
    }
}
