use std::collections::HashMap;
use std::fs;
use std::path::Path;

use nalgebra::{Vector3, Vector4};
use serde::Deserialize;

use crate::tracer::ray::Ray;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Material {
    pub refractive_index: f32,
    // diffuse, specular, reflection, refraction 가중치. 합이 1일 필요는 없음
    pub albedo: Vector4<f32>,
    pub diffuse_color: Vector3<f32>,
    pub specular_exponent: f32,
}

impl Material {
    pub fn new(
        refractive_index: f32,
        albedo: Vector4<f32>,
        diffuse_color: Vector3<f32>,
        specular_exponent: f32,
    ) -> Self {
        Self {
            refractive_index,
            albedo,
            diffuse_color,
            specular_exponent,
        }
    }

    pub fn ivory() -> Self {
        Self::new(1.0, Vector4::new(0.6, 0.3, 0.1, 0.0), Vector3::new(0.4, 0.4, 0.3), 50.0)
    }

    pub fn glass() -> Self {
        Self::new(1.5, Vector4::new(0.0, 0.5, 0.1, 0.8), Vector3::new(0.6, 0.7, 0.8), 125.0)
    }

    pub fn red_rubber() -> Self {
        Self::new(1.0, Vector4::new(0.9, 0.1, 0.0, 0.0), Vector3::new(0.3, 0.1, 0.1), 10.0)
    }

    pub fn mirror() -> Self {
        Self::new(1.0, Vector4::new(0.0, 10.0, 0.8, 0.0), Vector3::new(1.0, 1.0, 1.0), 1425.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            refractive_index: 1.0,
            albedo: Vector4::new(1.0, 0.0, 0.0, 0.0),
            diffuse_color: Vector3::zeros(),
            specular_exponent: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct LightSource {
    pub position: Vector3<f32>,
    pub intensity: f32,
}

impl LightSource {
    pub fn new(position: Vector3<f32>, intensity: f32) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3<f32>,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Vector3<f32>, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    // 빔이 구와 만나는 가장 가까운 양수 거리. direction은 단위 벡터여야 함
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        // L: 빔 시작점에서 구 중심까지, tca: L을 빔 방향에 사영한 길이
        let l = self.center - ray.origin.coords;
        let tca = l.dot(ray.direction.as_ref());
        // 구 중심과 빔 사이 최단 거리의 제곱
        let d2 = l.dot(&l) - tca * tca;
        let r2 = self.radius * self.radius;
        if d2 > r2 {
            return None;
        }

        let thc = (r2 - d2).sqrt();
        let mut distance = tca - thc;
        // 시작점이 구 안에 있으면 나가는 점을 씀
        if distance < 0.0 {
            distance = tca + thc;
        }
        if distance < 0.0 {
            return None;
        }

        Some(distance)
    }
}

#[derive(Debug)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub lights: Vec<LightSource>,
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>, lights: Vec<LightSource>) -> Self {
        Self { spheres, lights }
    }

    pub fn reference() -> Self {
        let spheres = vec![
            Sphere::new(Vector3::new(-3.0, 0.0, -16.0), 2.0, Material::ivory()),
            Sphere::new(Vector3::new(-1.0, -1.5, -12.0), 2.0, Material::glass()),
            Sphere::new(Vector3::new(1.5, -0.5, -18.0), 3.0, Material::red_rubber()),
            Sphere::new(Vector3::new(7.0, 5.0, -18.0), 4.0, Material::mirror()),
        ];
        let lights = vec![
            LightSource::new(Vector3::new(-20.0, 20.0, 20.0), 1.5),
            LightSource::new(Vector3::new(30.0, 50.0, -25.0), 1.8),
            LightSource::new(Vector3::new(30.0, 20.0, 30.0), 1.7),
        ];

        Self::new(spheres, lights)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let description: SceneDescription = serde_yaml::from_str(raw)?;
        description.resolve()
    }
}

#[derive(Deserialize)]
struct SphereDescription {
    center: Vector3<f32>,
    radius: f32,
    material: String,
}

// YAML 장면 파일. 재질은 이름으로 정의하고 구에서는 이름으로만 참조함
#[derive(Deserialize)]
struct SceneDescription {
    #[serde(default)]
    materials: HashMap<String, Material>,
    #[serde(default)]
    spheres: Vec<SphereDescription>,
    #[serde(default)]
    lights: Vec<LightSource>,
}

impl SceneDescription {
    fn resolve(self) -> Result<Scene> {
        let materials = self.materials;
        let spheres = self
            .spheres
            .into_iter()
            .map(|sphere| {
                let material = materials.get(&sphere.material).copied().ok_or_else(|| {
                    Error::Scene(format!("unknown material '{}'", sphere.material))
                })?;
                Ok(Sphere::new(sphere.center, sphere.radius, material))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Scene::new(spheres, self.lights))
    }
}
