use cgmath::{Quaternion, Vector3, vec3};
use rapier3d::{
    na::{self, UnitQuaternion},
    prelude::*,
};

use crate::pose::Pose;

pub fn nvec_to_cgmath(vec: Vector<Real>) -> Vector3<f32> {
    vec3(vec.x, vec.y, vec.z)
}

pub fn npoint_to_cgvec(point: Point<Real>) -> Vector3<f32> {
    vec3(point.x, point.y, point.z)
}

pub fn vec_to_npoint(vec: Vector3<f32>) -> Point<Real> {
    point![vec.x, vec.y, vec.z]
}

pub fn vec_to_nvec(vec: Vector3<f32>) -> Vector<Real> {
    vector![vec.x, vec.y, vec.z]
}

pub fn nquat_to_quat(quat: UnitQuaternion<f32>) -> Quaternion<f32> {
    Quaternion {
        v: vec3(quat.i, quat.j, quat.k),
        s: quat.w,
    }
}

pub fn quat_to_nquat(facing: Quaternion<f32>) -> UnitQuaternion<f32> {
    let nquat = na::Quaternion::new(facing.s, facing.v.x, facing.v.y, facing.v.z);
    UnitQuaternion::from_quaternion(nquat)
}

pub fn pose_to_isometry(pose: &Pose) -> Isometry<Real> {
    Isometry::from_parts(vec_to_nvec(pose.position).into(), quat_to_nquat(pose.rotation))
}

pub fn isometry_to_pose(isometry: &Isometry<Real>) -> Pose {
    Pose::new(
        nvec_to_cgmath(isometry.translation.vector),
        nquat_to_quat(isometry.rotation),
    )
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, InnerSpace, Rotation3};

    use super::*;

    #[test]
    fn test_pose_survives_isometry() {
        let pose = Pose::new(vec3(1.0, -2.0, 3.5), Quaternion::from_angle_y(Deg(30.0)));
        let back = isometry_to_pose(&pose_to_isometry(&pose));

        assert!((back.position - pose.position).magnitude() < 1e-5);
        assert!((back.forward() - pose.forward()).magnitude() < 1e-5);
    }

    #[test]
    fn test_point_and_vector_agree() {
        let v = vec3(0.5, 1.5, -4.0);
        assert_eq!(npoint_to_cgvec(vec_to_npoint(v)), v);
        assert_eq!(nvec_to_cgmath(vec_to_nvec(v)), v);
    }
}
