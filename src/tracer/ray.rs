use nalgebra::{Point3, Unit, Vector3};

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Unit<Vector3<f32>>) -> Self {
        Self { origin, direction }
    }

    // 빔 시작점에서 distance 만큼 떨어진 점
    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction.as_ref() * distance
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Unit, Vector3};

    use super::Ray;

    #[test]
    fn at() {
        let ray = Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::z_axis());
        assert_relative_eq!(ray.at(0.0), Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(ray.at(2.5), Point3::new(1.0, 2.0, 5.5));
    }

    #[test]
    fn at_follows_normalized_direction() {
        let direction = Unit::new_normalize(Vector3::new(3.0, 0.0, -4.0));
        let ray = Ray::new(Point3::origin(), direction);
        assert_relative_eq!(ray.at(5.0), Point3::new(3.0, 0.0, -4.0), epsilon = 1e-5);
    }
}
