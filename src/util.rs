use nalgebra::Vector3;

// 전반사(total internal reflection)로 굴절 방향이 없을 때 대신 쓰던 방향
pub const TIR_PLACEHOLDER: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);

pub fn reflect(incident: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

// 스넬의 법칙. 전반사라서 굴절 빔이 존재하지 않으면 None
pub fn refract(
    incident: &Vector3<f32>,
    normal: &Vector3<f32>,
    refractive_index: f32,
) -> Option<Vector3<f32>> {
    let mut cos_i = -incident.dot(normal).clamp(-1.0, 1.0);
    let mut eta_i = 1.0;
    let mut eta_t = refractive_index;
    let mut n = *normal;

    // 빔이 물체 안쪽에서 나가는 중이면 법선을 뒤집고 매질을 서로 바꿈
    if cos_i < 0.0 {
        cos_i = -cos_i;
        n = -n;
        std::mem::swap(&mut eta_i, &mut eta_t);
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }

    Some(incident * eta + n * (eta * cos_i - k.sqrt()))
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::Vector3;

    use super::{reflect, refract};

    #[test]
    fn reflect_mirrors_about_normal() {
        let incident = Vector3::new(1.0, -1.0, 0.0).normalize();
        let normal = Vector3::y();
        let reflected = reflect(&incident, &normal);
        assert_relative_eq!(reflected, Vector3::new(1.0, 1.0, 0.0).normalize(), epsilon = 1e-6);
        assert_relative_eq!(reflected.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn reflect_head_on_reverses() {
        let incident = -Vector3::z();
        let reflected = reflect(&incident, &Vector3::z());
        assert_relative_eq!(reflected, Vector3::z());
    }

    #[test]
    fn refract_matched_index_passes_straight() {
        let incident = Vector3::new(0.3, -1.0, 0.2).normalize();
        let refracted = refract(&incident, &Vector3::y(), 1.0).unwrap();
        assert_relative_eq!(refracted, incident, epsilon = 1e-6);
    }

    #[test]
    fn refract_follows_snell_entering() {
        let incident = Vector3::new(1.0, -1.0, 0.0).normalize();
        let refracted = refract(&incident, &Vector3::y(), 1.5).unwrap();

        let sin_i = incident.x.abs();
        let sin_t = refracted.normalize().x.abs();
        assert_relative_eq!(sin_i, 1.5 * sin_t, epsilon = 1e-5);
        // 경계를 통과해서 아래로 계속 진행
        assert!(refracted.y < 0.0);
    }

    #[test]
    fn refract_exiting_flips_normal() {
        // 구 안에서 바깥쪽 법선과 같은 방향으로 나가는 빔
        let incident = Vector3::new(0.2, 1.0, 0.0).normalize();
        let refracted = refract(&incident, &Vector3::y(), 1.5).unwrap().normalize();

        let sin_i = incident.x.abs();
        let sin_t = refracted.x.abs();
        assert_relative_eq!(1.5 * sin_i, sin_t, epsilon = 1e-5);
        assert!(refracted.y > 0.0);
    }

    #[test]
    fn refract_total_internal_reflection() {
        // 유리(1.5) 안쪽에서 임계각(약 41.8도)보다 누운 각도로 나가려는 빔
        let incident = Vector3::new(1.0, 0.5, 0.0).normalize();
        assert!(refract(&incident, &Vector3::y(), 1.5).is_none());
    }

    #[test]
    fn refract_normal_incidence_keeps_direction() {
        let incident = -Vector3::y();
        let refracted = refract(&incident, &Vector3::y(), 1.5).unwrap();
        assert_abs_diff_eq!(refracted.normalize(), incident, epsilon = 1e-6);
    }
}
