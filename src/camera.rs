use log::debug;
use nalgebra::{Point3, Unit, Vector3};
use rayon::prelude::*;

use crate::config::RenderConfig;
use crate::tracer::ray::Ray;

// 원점에서 -z 방향을 바라보는 고정 카메라
pub struct Camera {
    pub position: Point3<f32>,
    pub rays: Vec<Unit<Vector3<f32>>>,
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(config: &RenderConfig) -> Self {
        let mut to_return = Self {
            position: Point3::origin(),
            rays: vec![],
            width: config.width,
            height: config.height,
        };

        to_return.reevaluate_rays(config.fov_degrees, config.aspect_ratio());

        to_return
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn primary_ray(&self, x: u32, y: u32) -> Ray {
        let index = (y * self.width + x) as usize;
        Ray::new(self.position, self.rays[index])
    }

    fn reevaluate_rays(&mut self, fov_degrees: f32, aspect: f32) {
        let width = self.width;
        let height = self.height;
        // 화면 중심에서 가장자리까지의 길이
        let half_extent = (fov_degrees.to_radians() / 2.0).tan();

        self.rays = (0..width * height)
            .into_par_iter()
            .map(|index| {
                let y = index / width;
                let x = index % width;

                let screen_x = (2.0 * (x as f32 + 0.5) / width as f32 - 1.0) * half_extent * aspect;
                let screen_y = -(2.0 * (y as f32 + 0.5) / height as f32 - 1.0) * half_extent;

                Unit::new_normalize(Vector3::new(screen_x, screen_y, -1.0))
            })
            .collect();

        debug!("Generated {} primary rays ({}x{})", self.rays.len(), width, height);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::Camera;
    use crate::config::RenderConfig;

    fn camera(width: u32, height: u32) -> Camera {
        Camera::new(&RenderConfig {
            width,
            height,
            ..Default::default()
        })
    }

    #[test]
    fn one_ray_per_pixel() {
        let camera = camera(16, 12);
        assert_eq!(camera.rays.len(), 16 * 12);
        for ray in &camera.rays {
            assert_relative_eq!(ray.norm(), 1.0, epsilon = 1e-6);
            assert!(ray.z < 0.0);
        }
    }

    #[test]
    fn center_pixel_looks_forward() {
        // 홀수 해상도라 가운데 픽셀 중심이 정확히 화면 중앙
        let camera = camera(3, 3);
        let ray = camera.primary_ray(1, 1);
        assert_relative_eq!(ray.direction.into_inner(), -Vector3::z(), epsilon = 1e-6);
        assert_eq!(ray.origin, nalgebra::Point3::origin());
    }

    #[test]
    fn corners_follow_fov_and_aspect() {
        let camera = camera(4, 2);
        // 90도 시야각: tan(45도) = 1
        let top_left = camera.primary_ray(0, 0).direction;
        let expected = Vector3::new(-0.75 * 2.0, 0.5, -1.0).normalize();
        assert_relative_eq!(top_left.into_inner(), expected, epsilon = 1e-5);

        let bottom_right = camera.primary_ray(3, 1).direction;
        let expected = Vector3::new(0.75 * 2.0, -0.5, -1.0).normalize();
        assert_relative_eq!(bottom_right.into_inner(), expected, epsilon = 1e-5);
    }

    #[test]
    fn row_major_indexing() {
        let camera = camera(8, 4);
        assert_eq!(camera.primary_ray(5, 2).direction, camera.rays[5 + 2 * 8]);
    }
}
