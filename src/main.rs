use clap::{App, Arg};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use plate_tester::error::PlateError;
use plate_tester::navigation::Direction;
use plate_tester::{
    render, utils, CommandDetector, HarnessConfig, ImageResult, Navigator, PlateTester,
    SidecarDetector, TextDetector,
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = App::new("plate-tester")
                    .version("0.1.0")
                    .about("Checks OCR text detections for license plate candidates")
                    .arg(Arg::with_name("INPUT")
                        .help("image file or directory of images")
                        .required(true)
                        .index(1))
                    .arg(Arg::with_name("config")
                        .long("config")
                        .takes_value(true)
                        .help("TOML file overriding the default thresholds"))
                    .arg(Arg::with_name("command")
                        .long("command")
                        .takes_value(true)
                        .help("text detection program, called with the image path; \
                               by default stored <image>.json results are read"))
                    .arg(Arg::with_name("out")
                        .long("out")
                        .takes_value(true)
                        .help("directory for images with the regions outlined"))
                    .arg(Arg::with_name("font")
                        .long("font")
                        .takes_value(true)
                        .help("TTF font used to write the best guess onto outlined images"))
                    .arg(Arg::with_name("reverse")
                        .long("reverse")
                        .help("walk the directory backwards"))
                    .get_matches();
    let input = PathBuf::from(matches.value_of("INPUT").ok_or("input is required")?);

    let config = match matches.value_of("config") {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    let detector: Box<dyn TextDetector> = match matches.value_of("command") {
        Some(command) => Box::new(CommandDetector::from_command_line(command, config.detector_timeout())?),
        None => Box::new(SidecarDetector),
    };
    let mut tester = PlateTester::new(detector, config);
    if let Some(font) = matches.value_of("font") {
        tester = tester.with_font(render::load_font(font)?);
    }
    let out_dir = matches.value_of("out").map(PathBuf::from);
    if let Some(dir) = &out_dir {
        fs::create_dir_all(dir)?;
    }

    if input.is_dir() {
        let files = utils::collect_images(&input, &tester.config().extensions)?;
        let direction = if matches.is_present("reverse") { Direction::Backward } else { Direction::Forward };
        walk(Navigator::new(tester, files), direction, out_dir.as_deref())
    } else {
        let result = tester.process_file(&input)?;
        println!("{}", result);
        if let Some(dir) = &out_dir {
            save_outlined(&tester, &input, &result, dir)?;
        }
        Ok(())
    }
}

fn walk<D: TextDetector>(navigator: Navigator<D>, direction: Direction, out_dir: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let total = navigator.len();
    let mut guessed = 0;
    for _ in 0..total {
        match navigator.step(direction) {
            Ok(Some((path, result))) => {
                println!("== {}\n{}", path.display(), result);
                if result.has_guess() {
                    guessed += 1;
                }
                if let Some(dir) = out_dir {
                    if let Err(e) = save_outlined(navigator.tester(), &path, &result, dir) {
                        warn!(path = %path.display(), error = %e, "could not write outlined image");
                    }
                }
            }
            Ok(None) => break,
            Err(e) => warn!(error = %e, "skipping image"),
        }
    }
    println!("total_amount: {}, with_best_guess: {}", total, guessed);
    Ok(())
}

fn save_outlined<D: TextDetector>(tester: &PlateTester<D>, path: &Path, result: &ImageResult, dir: &Path) -> Result<(), PlateError> {
    let img = tester.render(path, result)?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    img.save(dir.join(format!("{}_annotated.png", stem)))?;
    Ok(())
}
