use std::fmt;
use std::path::Path;

use log::info;

use crate::config::RenderConfig;
use crate::tracer::scene::Scene;
use crate::tracer::Tracer;

pub mod camera;
pub mod config;
pub mod tracer;
pub mod util;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Image(image::ImageError),
    Yaml(serde_yaml::Error),
    ThreadPool(rayon::ThreadPoolBuildError),
    Config(String),
    Scene(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(why) => write!(f, "I/O failed: {}", why),
            Error::Image(why) => write!(f, "Writing image failed: {}", why),
            Error::Yaml(why) => write!(f, "Parsing YAML failed: {}", why),
            Error::ThreadPool(why) => write!(f, "Creating thread pool failed: {}", why),
            Error::Config(why) => write!(f, "Invalid config: {}", why),
            Error::Scene(why) => write!(f, "Invalid scene: {}", why),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(why) => Some(why),
            Error::Image(why) => Some(why),
            Error::Yaml(why) => Some(why),
            Error::ThreadPool(why) => Some(why),
            Error::Config(_) | Error::Scene(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(why: std::io::Error) -> Self {
        Error::Io(why)
    }
}

impl From<image::ImageError> for Error {
    fn from(why: image::ImageError) -> Self {
        Error::Image(why)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(why: serde_yaml::Error) -> Self {
        Error::Yaml(why)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(why: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(why)
    }
}

// 설정 파일이 없으면 기본 설정과 기준 장면으로 렌더링
pub fn run(config_path: Option<&Path>) -> Result<()> {
    // 로거 초기화
    env_logger::init();

    let config = match config_path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            RenderConfig::load(path)?
        }
        None => {
            info!("No config given, using defaults");
            RenderConfig::default()
        }
    };

    render_to_file(&config)
}

pub fn render_to_file(config: &RenderConfig) -> Result<()> {
    config.validate()?;

    let scene = match &config.scene {
        Some(path) => {
            info!("Loading scene from {}", path.display());
            Scene::load(path)?
        }
        None => Scene::reference(),
    };
    info!(
        "Scene has {} spheres and {} lights",
        scene.spheres.len(),
        scene.lights.len()
    );

    let tracer = Tracer::new(config.clone());
    let image = tracer.render(&scene)?;
    image.save(&config.output)?;
    info!("Saved {}", config.output.display());

    Ok(())
}
