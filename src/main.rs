use camera_lab::main::LabDevices;
use clap::Parser;
use config::{CameraSource, Config, LoggerBackend, ModelBackend};
use device_camera::impl_fake::DeviceCameraFake;
use device_camera::impl_image_folder::DeviceCameraImageFolder;
use device_camera::interface::DeviceCamera;
use image_classifier::impl_color_prototype::ColorPrototypeLoader;
use image_classifier::impl_fake::{ImageClassifierFake, ModelLoaderFake};
use image_classifier::interface::ModelLoader;
use library::logger::impl_console::LoggerConsole;
use library::logger::impl_tracing::{self, LoggerTracing};
use library::logger::interface::Logger;
use online_classifier::impl_knn::KnnClassifierFactory;
use shell::app::{ShellApp, APP_TITLE};
use shell::route::Route;
use std::path::PathBuf;
use std::sync::Arc;

mod camera_lab;
mod config;
mod design_system;
mod device_camera;
mod error;
mod image_classifier;
mod library;
mod online_classifier;
mod shell;

#[derive(Debug, Parser)]
#[command(name = "camera-lab", about = "Classify camera frames or train your own two-class model")]
struct Args {
    /// TOML config file. Missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Page to open: "/" or "/training".
    #[arg(long, default_value = "/")]
    route: String,
    #[arg(long, value_enum)]
    camera: Option<CameraSource>,
    /// Directory of png/jpeg files served by the folder camera.
    #[arg(long)]
    images: Option<PathBuf>,
    #[arg(long, value_enum)]
    model: Option<ModelBackend>,
    #[arg(long, value_enum)]
    log: Option<LoggerBackend>,
}

fn load_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(camera) = args.camera {
        config.camera.source = camera;
    }
    if let Some(images) = &args.images {
        config.camera.images_dir = Some(images.clone());
    }
    if let Some(model) = args.model {
        config.model.backend = model;
    }
    if let Some(log) = args.log {
        config.logger.backend = log;
    }
    Ok(config)
}

fn build_logger(
    config: &Config,
) -> Result<Arc<dyn Logger + Send + Sync>, Box<dyn std::error::Error>> {
    match config.logger.backend {
        LoggerBackend::Console => Ok(Arc::new(LoggerConsole::new(config.logger_timezone()))),
        LoggerBackend::Tracing => {
            impl_tracing::init(&config.logger.filter)
                .map_err(|error| -> Box<dyn std::error::Error> { error })?;
            Ok(Arc::new(LoggerTracing::new()))
        }
    }
}

fn build_devices(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<LabDevices, Box<dyn std::error::Error>> {
    let camera: Arc<dyn DeviceCamera + Send + Sync> = match config.camera.source {
        CameraSource::Fake => Arc::new(DeviceCameraFake::new(logger.clone())),
        CameraSource::Folder => {
            let dir = config
                .camera
                .images_dir
                .clone()
                .ok_or("the folder camera needs --images or camera.images_dir")?;
            Arc::new(DeviceCameraImageFolder::new(
                dir,
                config.folder_interval(),
                logger.clone(),
            ))
        }
    };

    let model_loader: Arc<dyn ModelLoader> = match config.model.backend {
        ModelBackend::Color => Arc::new(ColorPrototypeLoader::new(logger.clone())),
        ModelBackend::Fake => Arc::new(ModelLoaderFake::new(
            Arc::new(ImageClassifierFake::new()),
            logger.clone(),
        )),
    };

    Ok(LabDevices {
        camera,
        model_loader,
        classifier_factory: Arc::new(KnnClassifierFactory::new(config.model.knn_k)),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args)?;
    let logger = build_logger(&config)?;
    let devices = build_devices(&config, logger.clone())?;
    let route = Route::from_path(&args.route);

    let _ = logger.info(&format!("Config: {:?}", config));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([config.ui.window_width, config.ui.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        native_options,
        Box::new(move |cc| Box::new(ShellApp::new(cc, route, config, logger, devices))),
    )?;

    Ok(())
}
