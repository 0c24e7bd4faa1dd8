pub mod decrypt;
pub mod encrypt;
pub mod keygen;

use anyhow::{Context, Result};
use colored::Colorize;
use paillier_image::Settings;
use paillier_image::raster::{CompressedRaster, Raster, pgm};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("loading settings from '{}'", path.display())),
        None => Ok(Settings::default()),
    }
}

pub fn read_raster(path: &Path) -> Result<Raster> {
    let file = File::open(path).with_context(|| format!("opening '{}'", path.display()))?;
    pgm::read(&mut BufReader::new(file)).with_context(|| format!("reading '{}'", path.display()))
}

pub fn read_compressed_raster(path: &Path) -> Result<CompressedRaster> {
    let file = File::open(path).with_context(|| format!("opening '{}'", path.display()))?;
    pgm::read_compressed(&mut BufReader::new(file))
        .with_context(|| format!("reading compressed '{}'", path.display()))
}

pub fn write_raster(path: &Path, raster: &Raster) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating '{}'", path.display()))?;
    pgm::write(&mut BufWriter::new(file), raster)
        .with_context(|| format!("writing '{}'", path.display()))
}

pub fn write_compressed_raster(path: &Path, compressed: &CompressedRaster) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating '{}'", path.display()))?;
    pgm::write_compressed(&mut BufWriter::new(file), compressed)
        .with_context(|| format!("writing '{}'", path.display()))
}

pub fn report_written(what: &str, path: &Path) {
    println!("{} {} written to '{}'", "ok:".green().bold(), what, path.display());
}
