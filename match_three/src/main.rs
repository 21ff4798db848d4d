//! Match Three bootstrap
//!
//! Brings up the window, renderer and board textures through `app_context`,
//! draws them, and exits with a status that names the stage that failed.

use app_context::foundation::logging;
use app_context::prelude::*;
use app_context::config::ConfigError;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_FRAMES: &str = "1";

#[derive(Debug)]
struct LaunchOptions {
    config_path: Option<String>,
    assets_root: Option<PathBuf>,
    textures: Vec<(String, PathBuf)>,
    frames: u64,
    accelerated: bool,
}

impl LaunchOptions {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches.get_one::<String>("config").cloned(),
            assets_root: matches.get_one::<PathBuf>("assets").cloned(),
            textures: matches
                .get_many::<(String, PathBuf)>("texture")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            frames: matches.get_one::<u64>("frames").copied().unwrap_or(1),
            accelerated: !matches.get_flag("no-accel"),
        }
    }
}

fn command() -> Command {
    Command::new("match_three")
        .about("Brings up the Match Three window, renderer and textures")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Context configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Directory texture sources are resolved against"),
        )
        .arg(
            Arg::new("texture")
                .short('t')
                .long("texture")
                .value_name("ID=PATH")
                .value_parser(parse_texture)
                .action(ArgAction::Append)
                .help("Add a texture to the manifest (repeatable)"),
        )
        .arg(
            Arg::new("frames")
                .short('f')
                .long("frames")
                .value_name("COUNT")
                .value_parser(value_parser!(u64))
                .default_value(DEFAULT_FRAMES)
                .help("Frames to draw before exiting (headless only)"),
        )
        .arg(
            Arg::new("no-accel")
                .long("no-accel")
                .action(ArgAction::SetTrue)
                .help("Report no hardware acceleration (headless only)"),
        )
}

fn parse_texture(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((id, path)) if !id.is_empty() && !path.is_empty() => {
            Ok((id.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected ID=PATH, got '{value}'")),
    }
}

fn load_config(options: &LaunchOptions) -> Result<ContextConfig, ConfigError> {
    let mut config = match &options.config_path {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            ContextConfig::load_from_file(path)?
        }
        None => ContextConfig::default(),
    };

    if let Some(root) = &options.assets_root {
        config.textures.set_root(Some(root.clone()));
    }
    for (id, path) in &options.textures {
        config.textures.push(id.as_str(), path.clone())?;
    }

    Ok(config)
}

#[cfg_attr(feature = "sdl", allow(dead_code))]
fn draw_frames(ctx: &mut Context<'_, HeadlessPlatform>, frames: u64) -> Result<u64, PlatformError> {
    let (canvas, textures) = ctx.parts_mut();
    for _ in 0..frames {
        canvas.set_draw_color([0, 0, 0, 255]);
        canvas.clear();
        for (_, texture) in textures.iter() {
            canvas.copy(texture, 0, 0)?;
        }
        canvas.present();
    }
    Ok(canvas.frames_presented())
}

#[cfg(not(feature = "sdl"))]
fn launch(
    config: &ContextConfig,
    options: &LaunchOptions,
) -> Result<Result<u64, PlatformError>, ContextError> {
    let mut platform = HeadlessPlatform::new().with_acceleration(options.accelerated);
    app_context::run(config, &mut platform, |ctx| draw_frames(ctx, options.frames))
}

#[cfg(feature = "sdl")]
fn launch(
    config: &ContextConfig,
    _options: &LaunchOptions,
) -> Result<Result<u64, PlatformError>, ContextError> {
    use sdl2::event::Event;
    use sdl2::keyboard::Keycode;
    use std::time::Duration;

    let mut platform = SdlPlatform::new();
    app_context::run(config, &mut platform, |ctx| {
        let mut event_pump = ctx.platform().event_pump()?;
        let (canvas, textures) = ctx.parts_mut();
        let mut frames = 0;

        'running: loop {
            for event in event_pump.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => break 'running,
                    _ => {}
                }
            }

            canvas.clear();
            for (_, texture) in textures.iter() {
                canvas.copy(texture, None, None)?;
            }
            canvas.present();
            frames += 1;
            std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
        }

        Ok(frames)
    })
}

fn main() -> ExitCode {
    logging::init();

    let matches = command().get_matches();
    let options = LaunchOptions::from_matches(&matches);
    log::debug!("Launch options: {:?}", options);

    let config = match load_config(&options) {
        Ok(config) => config,
        Err(e) => {
            let err = ContextError::from(e);
            log::error!("{}", err);
            return ExitCode::from(err.exit_code());
        }
    };

    match launch(&config, &options) {
        Ok(Ok(frames)) => {
            log::info!("Exited cleanly after {} frame(s)", frames);
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            log::error!("Frame loop failed: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_argument_parsing() {
        assert_eq!(
            parse_texture("bg=resources/bg.png"),
            Ok(("bg".to_string(), PathBuf::from("resources/bg.png")))
        );
        assert!(parse_texture("bg").is_err());
        assert!(parse_texture("=bg.png").is_err());
        assert!(parse_texture("bg=").is_err());
    }

    #[test]
    fn test_options_from_command_line() {
        let matches = command().get_matches_from([
            "match_three",
            "--assets",
            "resources",
            "-t",
            "bg=bg.png",
            "--texture",
            "gem=gem.png",
            "--frames",
            "3",
            "--no-accel",
        ]);
        let options = LaunchOptions::from_matches(&matches);
        assert_eq!(options.assets_root, Some(PathBuf::from("resources")));
        assert_eq!(options.textures.len(), 2);
        assert_eq!(options.frames, 3);
        assert!(!options.accelerated);

        let config = load_config(&options).unwrap();
        let ids: Vec<&str> = config.textures.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["bg", "gem"]);
        assert_eq!(config.textures.root(), Some(std::path::Path::new("resources")));
    }

    #[test]
    fn test_duplicate_texture_is_a_config_error() {
        let matches =
            command().get_matches_from(["match_three", "-t", "bg=a.png", "-t", "bg=b.png"]);
        let options = LaunchOptions::from_matches(&matches);
        let err = ContextError::from(load_config(&options).unwrap_err());
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_sample_config_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/context.toml");
        let config = ContextConfig::load_from_file(path).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.textures.contains("bg"));
        assert!(config.flags.renderer.contains(RendererFlags::PRESENT_VSYNC));
    }

    #[test]
    fn test_headless_frames_with_empty_manifest() {
        let mut platform = HeadlessPlatform::new();
        let frames = app_context::run(&ContextConfig::default(), &mut platform, |ctx| {
            draw_frames(ctx, 4)
        })
        .unwrap()
        .unwrap();
        assert_eq!(frames, 4);
    }

    #[test]
    fn test_headless_without_acceleration_reports_renderer_failure() {
        let mut platform = HeadlessPlatform::new().with_acceleration(false);
        let err = app_context::run(&ContextConfig::default(), &mut platform, |ctx| {
            draw_frames(ctx, 1)
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
