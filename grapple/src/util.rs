use cgmath::{InnerSpace, Vector3, vec3};

/// Move `current` toward `target` by at most `max_delta`, landing exactly on
/// the target instead of overshooting it.
pub fn move_towards(current: Vector3<f32>, target: Vector3<f32>, max_delta: f32) -> Vector3<f32> {
    let delta = target - current;
    let distance = delta.magnitude();
    if distance <= max_delta || distance <= f32::EPSILON {
        return target;
    }
    current + delta / distance * max_delta
}

/// Unit vector, or zero for a degenerate input
pub fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let len2 = v.magnitude2();
    if len2 <= f32::EPSILON * f32::EPSILON {
        vec3(0.0, 0.0, 0.0)
    } else {
        v / len2.sqrt()
    }
}

/// Remove the axis components a surface normal points along, so motion slides
/// along the surface instead of into it.
pub fn strip_normal_axes(v: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    vec3(
        v.x * (1.0 - normal.x.abs()),
        v.y * (1.0 - normal.y.abs()),
        v.z * (1.0 - normal.z.abs()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_is_bounded() {
        let moved = move_towards(vec3(0.0, 0.0, 0.0), vec3(10.0, 0.0, 0.0), 2.5);
        assert_eq!(moved, vec3(2.5, 0.0, 0.0));
    }

    #[test]
    fn test_move_towards_never_overshoots() {
        let moved = move_towards(vec3(0.0, 1.0, 0.0), vec3(0.0, 1.5, 0.0), 3.0);
        assert_eq!(moved, vec3(0.0, 1.5, 0.0));
    }

    #[test]
    fn test_normalize_or_zero() {
        assert_eq!(normalize_or_zero(vec3(0.0, 0.0, 0.0)), vec3(0.0, 0.0, 0.0));
        assert_eq!(normalize_or_zero(vec3(0.0, -4.0, 0.0)), vec3(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_strip_normal_axes_slides_along_wall() {
        let slid = strip_normal_axes(vec3(0.5, 0.2, -0.3), vec3(-1.0, 0.0, 0.0));
        assert_eq!(slid, vec3(0.0, 0.2, -0.3));
    }
}
