extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate image;
extern crate juliaset;
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate rand;

use clap::{crate_authors, crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::{err_msg, Error};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use juliaset::{ComplexPlane, Field, IncrementalRenderer, JuliaRenderer, Pixel, PlaneMapper};
use log::{debug, info};
use num::{clamp, Complex};
use rand::Rng;
use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const PLOT: &str = "plot";
const LIVE: &str = "live";
const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const CONSTANT: &str = "constant";
const FIT_ASPECT: &str = "fit-aspect";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const FRAMES: &str = "frames";

fn plane_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name(SIZE)
            .required(false)
            .long(SIZE)
            .short("s")
            .takes_value(true)
            .default_value("800x800")
            .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
            .help("Size of output image"),
        Arg::with_name(LEFTLOWER)
            .required(false)
            .long(LEFTLOWER)
            .short("l")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("-1.5,-1.5")
            .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
            .help("Left lower corner of the complex plane"),
        Arg::with_name(RIGHTUPPER)
            .required(false)
            .long(RIGHTUPPER)
            .short("r")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("1.5,1.5")
            .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
            .help("Right upper corner of the complex plane"),
        Arg::with_name(CONSTANT)
            .required(false)
            .long(CONSTANT)
            .short("c")
            .takes_value(true)
            .allow_hyphen_values(true)
            .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse julia constant"))
            .help("Julia constant as re,im (random in [-3, 3] if omitted)"),
        Arg::with_name(FIT_ASPECT)
            .long(FIT_ASPECT)
            .short("a")
            .help("Stretch the real axis by the image's width/height ratio"),
    ]
}

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("julia")
        .version(crate_version!())
        .author(crate_authors!())
        .about("Julia set escape-time renderer")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name(PLOT)
                .about("Render one field and save it as a grayscale image")
                .args(&plane_args())
                .arg(
                    Arg::with_name(OUTPUT)
                        .required(true)
                        .long(OUTPUT)
                        .short("o")
                        .takes_value(true)
                        .help("Output file"),
                )
                .arg(
                    Arg::with_name(THREADS)
                        .required(false)
                        .long(THREADS)
                        .short("t")
                        .takes_value(true)
                        .validator(move |s| {
                            validate_range(
                                &s,
                                1,
                                max_threads,
                                "Could not parse thread count",
                                &format!("Thread count must be between 1 and {}", max_threads),
                            )
                        })
                        .help("Number of threads to use in solver (default: one per CPU)"),
                )
                .arg(
                    Arg::with_name(ITERATIONS)
                        .required(false)
                        .long(ITERATIONS)
                        .short("i")
                        .takes_value(true)
                        .default_value("256")
                        .validator(move |s| {
                            validate_range(
                                &s,
                                1,
                                1_000_000,
                                "Could not parse iteration count",
                                "Iteration count must be between 1 and 1000000",
                            )
                        })
                        .help("Maximum number of iterations per pixel"),
                ),
        )
        .subcommand(
            SubCommand::with_name(LIVE)
                .about("Render the frames of the set filling in as the cap grows")
                .args(&plane_args())
                .arg(
                    Arg::with_name(OUTPUT)
                        .required(true)
                        .long(OUTPUT)
                        .short("o")
                        .takes_value(true)
                        .help("Output directory for the frames"),
                )
                .arg(
                    Arg::with_name(FRAMES)
                        .required(false)
                        .long(FRAMES)
                        .short("f")
                        .takes_value(true)
                        .default_value("50")
                        .validator(move |s| {
                            validate_range(
                                &s,
                                1,
                                10_000,
                                "Could not parse frame count",
                                "Frame count must be between 1 and 10000",
                            )
                        })
                        .help("Number of frames; frame i is capped at i iterations"),
                ),
        )
        .get_matches()
}

fn random_constant() -> Complex<f64> {
    let mut rng = rand::thread_rng();
    Complex::new(rng.gen_range(-3.0, 3.0), rng.gen_range(-3.0, 3.0))
}

fn renderer(matches: &ArgMatches) -> Result<JuliaRenderer, Error> {
    let (width, height): (usize, usize) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair(s, 'x'))
        .ok_or_else(|| err_msg("Error parsing image dimensions"))?;
    let leftlower = matches
        .value_of(LEFTLOWER)
        .and_then(parse_complex)
        .ok_or_else(|| err_msg("Error parsing left lower point"))?;
    let rightupper = matches
        .value_of(RIGHTUPPER)
        .and_then(parse_complex)
        .ok_or_else(|| err_msg("Error parsing right upper point"))?;
    let c = match matches.value_of(CONSTANT) {
        Some(s) => parse_complex(s).ok_or_else(|| err_msg("Error parsing julia constant"))?,
        None => random_constant(),
    };

    let mut plane = ComplexPlane(leftlower, rightupper);
    if matches.is_present(FIT_ASPECT) {
        plane = plane.fit_aspect(width, height);
    }
    let plane = PlaneMapper::new(width, height, plane.0, plane.1)?;
    info!("julia constant c = {}", c);
    Ok(JuliaRenderer::with_plane(plane, c))
}

/// The field turned into a row-major grayscale raster, scaled so the
/// largest count is white.
fn grayscale(field: &Field) -> Vec<u8> {
    let (width, height) = field.dimensions();
    let maxi = u64::from(field.max_value().max(1));
    let mut pixels = vec![0 as u8; width * height];
    for (Pixel(x, y), count) in field.iter() {
        pixels[y * width + x] = clamp((u64::from(count) * 255) / maxi, 0, 255) as u8;
    }
    pixels
}

fn write_image(outfile: &Path, pixels: &[u8], bounds: (usize, usize)) -> Result<(), std::io::Error> {
    let output = File::create(outfile)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::Gray(8))?;
    Ok(())
}

fn plot(matches: &ArgMatches) -> Result<(), Error> {
    let julia = renderer(matches)?;
    let threads = match matches.value_of(THREADS) {
        Some(s) => usize::from_str(s).map_err(|_| err_msg("Could not parse thread count"))?,
        None => num_cpus::get(),
    };
    let iterations = matches
        .value_of(ITERATIONS)
        .and_then(|s| u32::from_str(s).ok())
        .ok_or_else(|| err_msg("Could not parse iteration count"))?;
    let outfile = matches
        .value_of(OUTPUT)
        .ok_or_else(|| err_msg("No output file given"))?;

    let field = julia.render_threaded_with_progress(iterations, threads, &mut |p: f64| {
        debug!("{:.0}% of columns done", p)
    })?;
    info!("Image generated successfully");
    write_image(Path::new(outfile), &grayscale(&field), field.dimensions())?;
    debug!("wrote {}", outfile);
    Ok(())
}

fn live(matches: &ArgMatches) -> Result<(), Error> {
    let julia = renderer(matches)?;
    let frames = matches
        .value_of(FRAMES)
        .and_then(|s| u32::from_str(s).ok())
        .ok_or_else(|| err_msg("Could not parse frame count"))?;
    let outdir = Path::new(
        matches
            .value_of(OUTPUT)
            .ok_or_else(|| err_msg("No output directory given"))?,
    );

    fs::create_dir_all(outdir)?;
    for (cap, field) in IncrementalRenderer::new(julia).frames(frames).enumerate() {
        let outfile = outdir.join(format!("frame-{:03}.pgm", cap));
        write_image(&outfile, &grayscale(&field), field.dimensions())?;
        debug!("wrote {}", outfile.display());
    }
    info!("Generated {} frames in {}", frames, outdir.display());
    Ok(())
}

fn run() -> Result<(), Error> {
    let matches = args();
    match matches.subcommand() {
        (PLOT, Some(sub)) => plot(sub),
        (LIVE, Some(sub)) => live(sub),
        (other, _) => Err(err_msg(format!("Unknown command {}", other))),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
