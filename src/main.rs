use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;

use raycast::scene::Scene;
use raycast::error::RenderError;
use raycast::consts::{ INPUT_INVALID, EXIT_USAGE };

/// Renders a scene of spheres, planes and point lights to a binary PPM image.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Width of the output image, in pixels
    #[clap(value_parser = parse_dimension)]
    width: usize,

    /// Height of the output image, in pixels
    #[clap(value_parser = parse_dimension)]
    height: usize,

    /// Scene description (`.json` files are read as JSON)
    #[clap(value_parser)]
    input: PathBuf,

    /// Output PPM file
    #[clap(value_parser)]
    output: PathBuf,

    /// Render scanlines in parallel
    #[clap(long)]
    parallel: bool,

    /// Override the scene's ambient light term
    #[clap(long, value_parser)]
    ambient: Option<f64>,

    /// Override the scene's specular shininess exponent
    #[clap(long, value_parser)]
    shininess: Option<f64>,
}

fn parse_dimension(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("\"{}\" is not a positive integer", s)),
    }
}

fn run(args: &Args) -> Result<(), RenderError> {
    RenderError::check_size(args.width, args.height)?;

    let mut scene = Scene::load(&args.input)?;

    if let Some(ambient) = args.ambient {
        scene.world.shading.ambient = ambient;
    }
    if let Some(shininess) = args.shininess {
        scene.world.shading.shininess = shininess;
    }

    log::info!("Rendering {}x{} pixels ({})", args.width, args.height,
        if args.parallel { "parallel" } else { "single-threaded" });
    let start = Instant::now();

    let canvas = scene.render(args.width, args.height, args.parallel);
    log::info!("Rendered in {:?}", start.elapsed());

    canvas.save(&args.output).map_err(|source| RenderError::Write {
        path: args.output.clone(),
        source,
    })?;

    log::info!("Saved render to {}", args.output.display());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    // Argument errors are reported before any file is touched.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            eprint!("{}", e);
            eprintln!("Error: invalid invocation. (err no. {})", INPUT_INVALID);
            process::exit(EXIT_USAGE);
        },
        Err(e) => e.exit(),
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {} (err no. {})", e, e.code());
        process::exit(e.exit_status());
    }
}
