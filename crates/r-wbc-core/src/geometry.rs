//! ---
//! wbc_section: "04-control-core"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Conversions between wire geometry and nalgebra types."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use r_wbc_msg::{Point, Pose, Quaternion};

/// Normalised rotation from a wire quaternion.
pub fn to_unit_quaternion(q: &Quaternion) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Wire quaternion from a rotation.
pub fn from_unit_quaternion(q: &UnitQuaternion<f64>) -> Quaternion {
    let coords = &q.quaternion().coords;
    Quaternion::new(coords.x, coords.y, coords.z, coords.w)
}

pub fn to_isometry(pose: &Pose) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(pose.position.x, pose.position.y, pose.position.z),
        to_unit_quaternion(&pose.orientation),
    )
}

pub fn from_isometry(iso: &Isometry3<f64>) -> Pose {
    let t = &iso.translation.vector;
    Pose::new(Point::new(t.x, t.y, t.z), from_unit_quaternion(&iso.rotation))
}

/// Fixed-axis roll/pitch/yaw to quaternion, yaw applied last.
pub fn quaternion_from_rpy(roll: f64, pitch: f64, yaw: f64) -> Quaternion {
    from_unit_quaternion(&UnitQuaternion::from_euler_angles(roll, pitch, yaw))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn yaw_quarter_turn() {
        let q = quaternion_from_rpy(0.0, 0.0, FRAC_PI_2);
        let half = (FRAC_PI_2 / 2.0).sin();
        assert!(approx(q.x, 0.0));
        assert!(approx(q.y, 0.0));
        assert!(approx(q.z, half));
        assert!(approx(q.w, (FRAC_PI_2 / 2.0).cos()));
    }

    #[test]
    fn pose_isometry_conversion_is_lossless() {
        let pose = Pose::new(
            Point::new(0.3, -0.2, 1.1),
            quaternion_from_rpy(0.1, 0.2, 0.3),
        );
        let back = from_isometry(&to_isometry(&pose));
        assert!(approx(back.position.x, 0.3));
        assert!(approx(back.position.z, 1.1));
        assert!(approx(back.orientation.w, pose.orientation.w));
        assert!(approx(back.orientation.z, pose.orientation.z));
    }
}
