// Load a json file that describes the roots, view and any scripted
// interaction, then render the newton fractal for it

use std::io::{Error, Read, ErrorKind};
use std::fs::{File, create_dir_all, write};
use std::env;
use std::path::Path;

use image::RgbImage;
use log::info;

use json::JsonValue;

mod newton_raphson;
mod animation;

fn make_directory_for_image(path_str : &str) -> std::io::Result<()> {
    let path = Path::new(path_str);
    if let Some(dir) = path.parent() {
        create_dir_all(dir)
    } else {
        Ok(())
    }
}

fn make_image(input : &JsonValue) -> std::io::Result<RgbImage> {
    let algorithm = input["algorithm"].as_str().unwrap_or("newton-raphson");
    match algorithm {
        "newton-raphson" => newton_raphson::generate(input),
        _ => Err(Error::new(ErrorKind::InvalidData, "Unknown algorithm"))
    }
}

fn save_image(image : &RgbImage, path : &str) -> std::io::Result<()> {
    make_directory_for_image(path)?;
    image.save(path).map_err(
        |_| Error::new(ErrorKind::InvalidData, "Couldn't write image")
    )
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    // Get file to use else default
    let in_filename = env::args().nth(1).unwrap_or("input.json".to_string());
    let out_filename = env::args().nth(2).unwrap_or("output.png".to_string());
    info!("Loading input file: {}", in_filename);
    let mut file = File::open(in_filename)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    info!("Parsing input file");
    let input = json::parse(&contents).map_err(
        |_| Error::new(ErrorKind::InvalidData, "Couldn't parse input")
    )?;
    let algorithm = input["algorithm"].as_str().unwrap_or("newton-raphson");
    let out_filename_base = out_filename.strip_suffix(".png").unwrap_or(&out_filename);
    if algorithm == "animation" {
        let frames = animation::make_frames(&input)?;
        for (i, frame) in frames.iter().enumerate() {
            info!("Frame {} of {}", i+1, frames.len());
            save_image(frame, &format!("{}/{}.png", out_filename_base, i))?;
        }
    } else {
        let image = make_image(&input)?;
        info!("Writing output to {}", out_filename);
        save_image(&image, &out_filename)?;
        if input["dump_uniforms"].as_bool().unwrap_or(false) {
            let uniforms_filename = format!("{}.uniforms", out_filename_base);
            info!("Writing frame uniforms to {}", uniforms_filename);
            write(uniforms_filename, newton_raphson::final_uniforms(&input)?)?;
        }
    };
    Ok(())
}
