use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use serde::Deserialize;

use crate::{Error, Result};

// 전반사가 일어났을 때 굴절 빔을 어떻게 처리할지
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalInternalReflection {
    // (1, 0, 0) 고정 방향으로 굴절 빔을 계속 쏨
    #[default]
    Placeholder,
    // 굴절 기여를 0으로 둠
    Omit,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaneBounds {
    pub half_width: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl PlaneBounds {
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x.abs() < self.half_width && z > self.z_min && z < self.z_max
    }
}

impl Default for PlaneBounds {
    fn default() -> Self {
        Self {
            half_width: 10.0,
            z_min: -30.0,
            z_max: -10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fov_degrees: f32,
    pub max_depth: usize,
    pub bias_epsilon: f32,
    pub background_color: Vector3<f32>,
    pub plane_height: f32,
    pub plane_bounds: PlaneBounds,
    pub visibility_cutoff: f32,
    pub total_internal_reflection: TotalInternalReflection,
    pub threads: Option<usize>,
    pub output: PathBuf,
    pub scene: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            fov_degrees: 90.0,
            max_depth: 4,
            bias_epsilon: 1e-3,
            background_color: Vector3::new(0.2, 0.7, 0.8),
            plane_height: -4.0,
            plane_bounds: PlaneBounds::default(),
            visibility_cutoff: 1000.0,
            total_internal_reflection: TotalInternalReflection::default(),
            threads: None,
            output: PathBuf::from("out.ppm"),
            scene: None,
        }
    }
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&raw)?;

        // 장면 경로는 설정 파일 위치 기준. 절대 경로면 join이 그대로 돌려줌
        if let Some(parent) = path.parent() {
            config.scene = config.scene.map(|scene| parent.join(scene));
        }

        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config("width and height must be positive".into()));
        }

        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(Error::Config(format!(
                "fov_degrees must be between 0 and 180, got {}",
                self.fov_degrees
            )));
        }

        if !(self.bias_epsilon.is_finite() && self.bias_epsilon > 0.0) {
            return Err(Error::Config("bias_epsilon must be finite and positive".into()));
        }

        if !(self.visibility_cutoff.is_finite() && self.visibility_cutoff > 0.0) {
            return Err(Error::Config(
                "visibility_cutoff must be finite and positive".into(),
            ));
        }

        if self.plane_bounds.z_min >= self.plane_bounds.z_max {
            return Err(Error::Config("plane_bounds.z_min must be below z_max".into()));
        }

        if self.threads == Some(0) {
            return Err(Error::Config("threads must be at least 1".into()));
        }

        Ok(())
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
