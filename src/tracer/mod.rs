use std::time::Instant;

use log::{debug, info};
use nalgebra::{Point3, Unit, Vector3};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::camera::Camera;
use crate::config::{RenderConfig, TotalInternalReflection};
use crate::tracer::ray::Ray;
use crate::tracer::scene::{Material, Scene, Sphere};
use crate::tracer::texture::Image;
use crate::util::{reflect, refract, TIR_PLACEHOLDER};
use crate::Result;

pub mod ray;
pub mod scene;
pub mod texture;

const CHECKER_ODD: Vector3<f32> = Vector3::new(0.3, 0.3, 0.3);
const CHECKER_EVEN: Vector3<f32> = Vector3::new(0.3, 0.2, 0.1);
// 빔이 바닥과 거의 평행하면 나눗셈이 터지니 건너뜀
const PLANE_PARALLEL_EPSILON: f32 = 1e-3;

pub struct Tracer {
    config: RenderConfig,
    camera: Camera,
}

impl Tracer {
    pub fn new(config: RenderConfig) -> Self {
        let camera = Camera::new(&config);
        Self { config, camera }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn render(&self, scene: &Scene) -> Result<Image> {
        let started = Instant::now();
        let image = match self.config.threads {
            Some(threads) => {
                let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
                debug!("Rendering on a dedicated pool of {} threads", threads);
                pool.install(|| self.render_rows(scene))
            }
            None => {
                debug!("Rendering on the global pool ({} threads)", rayon::current_num_threads());
                self.render_rows(scene)
            }
        };

        info!(
            "Rendered {}x{} in {} ms",
            image.width(),
            image.height(),
            started.elapsed().as_millis()
        );

        Ok(image)
    }

    fn render_rows(&self, scene: &Scene) -> Image {
        let mut image = Image::new(self.camera.width(), self.camera.height());
        let width = self.camera.width() as usize;

        // 한 줄씩 나눠서 처리. 각 작업은 자기 줄에만 씀
        image
            .pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, color) in row.iter_mut().enumerate() {
                    *color = self.per_pixel(scene, x as u32, y as u32);
                }
            });

        image
    }

    // DirectX의 RayGen 쉐이더와 같음
    pub fn per_pixel(&self, scene: &Scene, x: u32, y: u32) -> Vector3<f32> {
        let ray = self.camera.primary_ray(x, y);
        self.cast_ray(&ray, scene, 0).color
    }

    // depth가 max_depth를 넘으면 교차 검사 없이 배경색
    pub fn cast_ray(&self, ray: &Ray, scene: &Scene, depth: usize) -> RadianceResult {
        let background = self.config.background_color;
        if depth > self.config.max_depth {
            return RadianceResult::new(background, 0, 0);
        }

        let Some(hit) = self.trace_ray(ray, scene) else {
            return RadianceResult::new(background, 1, depth);
        };

        let mut result = RadianceResult::new(Vector3::zeros(), 1, depth);
        let eps = self.config.bias_epsilon;
        let normal = hit.normal.as_ref();
        let material = &hit.material;

        let reflection_direction = Unit::new_normalize(reflect(ray.direction.as_ref(), normal));
        let reflection_origin = hit.position + normal * eps;
        let reflection = self.cast_ray(
            &Ray::new(reflection_origin, reflection_direction),
            scene,
            depth + 1,
        );
        result.absorb(&reflection);

        let refraction = match self.refraction_direction(ray, &hit) {
            Some(direction) => {
                // 굴절 빔이 실제로 나아가는 쪽으로 시작점을 옮김
                let origin = if direction.dot(normal) < 0.0 {
                    hit.position - normal * eps
                } else {
                    hit.position + normal * eps
                };
                let refraction = self.cast_ray(&Ray::new(origin, direction), scene, depth + 1);
                result.absorb(&refraction);
                refraction.color
            }
            None => Vector3::zeros(),
        };

        let (diffuse, specular) = self.direct_light(ray, &hit, scene);

        result.color = material.diffuse_color * (diffuse * material.albedo.x)
            + Vector3::repeat(specular * material.albedo.y)
            + reflection.color * material.albedo.z
            + refraction * material.albedo.w;

        result
    }

    fn refraction_direction(&self, ray: &Ray, hit: &HitPayload) -> Option<Unit<Vector3<f32>>> {
        let refracted = refract(
            ray.direction.as_ref(),
            hit.normal.as_ref(),
            hit.material.refractive_index,
        );

        match (refracted, self.config.total_internal_reflection) {
            (Some(direction), _) => Some(Unit::new_normalize(direction)),
            (None, TotalInternalReflection::Placeholder) => Some(Unit::new_normalize(TIR_PLACEHOLDER)),
            (None, TotalInternalReflection::Omit) => None,
        }
    }

    // 광원마다 그림자 검사 후 (diffuse, specular) 세기 누적
    fn direct_light(&self, ray: &Ray, hit: &HitPayload, scene: &Scene) -> (f32, f32) {
        let normal = hit.normal.as_ref();
        let material = &hit.material;
        let shadow_origin = hit.position + normal * self.config.bias_epsilon;

        scene
            .lights
            .iter()
            .fold((0.0, 0.0), |(diffuse, specular), light| {
                let to_light = light.position - hit.position.coords;
                let light_distance = to_light.norm();
                let light_direction = Unit::new_normalize(to_light);

                let probe = Ray::new(shadow_origin, light_direction);
                if let Some(blocker) = self.trace_ray(&probe, scene) {
                    if (blocker.position - shadow_origin).norm() < light_distance {
                        return (diffuse, specular);
                    }
                }

                let lambert = light_direction.dot(normal).max(0.0);
                let highlight = reflect(light_direction.as_ref(), normal)
                    .dot(ray.direction.as_ref())
                    .max(0.0)
                    .powf(material.specular_exponent);

                (
                    diffuse + light.intensity * lambert,
                    specular + light.intensity * highlight,
                )
            })
    }

    pub fn trace_ray(&self, ray: &Ray, scene: &Scene) -> Option<HitPayload> {
        let mut closest: Option<(&Sphere, f32)> = None;
        for sphere in &scene.spheres {
            let Some(distance) = sphere.intersect(ray) else {
                continue;
            };

            if closest.map_or(true, |(_, previous_distance)| distance < previous_distance) {
                closest = Some((sphere, distance));
            }
        }

        let sphere_distance = closest.map_or(f32::MAX, |(_, distance)| distance);
        self.trace_plane(ray, sphere_distance)
            .or_else(|| closest.map(|(sphere, distance)| Self::closest_hit(ray, distance, sphere)))
            .filter(|hit| hit.distance < self.config.visibility_cutoff)
    }

    pub fn closest_hit(ray: &Ray, distance: f32, sphere: &Sphere) -> HitPayload {
        let position = ray.at(distance);
        let normal = Unit::new_normalize(position.coords - sphere.center);

        HitPayload {
            distance,
            position,
            normal,
            material: sphere.material,
        }
    }

    // 바닥은 구보다 가까울 때만 맞음
    fn trace_plane(&self, ray: &Ray, nearest: f32) -> Option<HitPayload> {
        let direction = ray.direction.as_ref();
        if direction.y.abs() <= PLANE_PARALLEL_EPSILON {
            return None;
        }

        let distance = -(ray.origin.y - self.config.plane_height) / direction.y;
        let position = ray.at(distance);
        if distance <= 0.0
            || distance >= nearest
            || !self.config.plane_bounds.contains(position.x, position.z)
        {
            return None;
        }

        Some(HitPayload {
            distance,
            position,
            normal: Vector3::y_axis(),
            material: Material {
                diffuse_color: checker_color(&position),
                ..Default::default()
            },
        })
    }
}

fn checker_color(position: &Point3<f32>) -> Vector3<f32> {
    let parity = (0.5 * position.x + 1000.0).floor() as i64 + (0.5 * position.z).floor() as i64;
    if parity & 1 == 1 {
        CHECKER_ODD
    } else {
        CHECKER_EVEN
    }
}

// HitPayload는 빛의 경로에 대한 정보만 담고 색상은 나중에 계산함
#[derive(Clone, Copy, Debug)]
pub struct HitPayload {
    pub distance: f32,
    pub position: Point3<f32>,
    pub normal: Unit<Vector3<f32>>,
    pub material: Material,
}

#[derive(Clone, Copy, Debug)]
pub struct RadianceResult {
    pub color: Vector3<f32>,
    // 교차 검사를 한 쉐이딩 빔 수. 그림자 빔은 세지 않음
    pub ray_count: usize,
    pub deepest: usize,
}

impl RadianceResult {
    fn new(color: Vector3<f32>, ray_count: usize, deepest: usize) -> Self {
        Self {
            color,
            ray_count,
            deepest,
        }
    }

    fn absorb(&mut self, child: &RadianceResult) {
        self.ray_count += child.ray_count;
        self.deepest = self.deepest.max(child.deepest);
    }
}
