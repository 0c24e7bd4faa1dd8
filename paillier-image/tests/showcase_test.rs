use paillier_image::codec::{CodecOptions, EncodingMode};
use paillier_image::errors::PaillierError;
use paillier_image::image::{
    PackedImage, compress, decompress, decrypt_image, encrypt_image, generate_key_pair,
};
use paillier_image::raster::pgm;
use paillier_image::{Dimensions, PackingLimits, Raster, SearchLimits};

use std::io::Cursor;
use std::sync::Once;

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .try_init();
    });
}

fn gradient(dims: Dimensions) -> Vec<u8> {
    (0..dims.width * dims.height)
        .map(|i| ((i * 255) / (dims.width * dims.height - 1)) as u8)
        .collect()
}

#[test]
fn showcase_pgm_with_histogram_expansion() -> Result<(), PaillierError> {
    init_logging();

    let pair = generate_key_pair(251, 241)?;
    let dims = Dimensions::new(8, 6);
    let original = Raster::from_pixels(dims, &gradient(dims))?;

    let mut plain_file = Vec::new();
    pgm::write(&mut plain_file, &original)?;

    // encrypt side: read the plain image, write the encrypted one
    let options = CodecOptions::try_with(EncodingMode::Whole, true, SearchLimits::default())?;
    let plain = pgm::read(&mut Cursor::new(&plain_file))?;
    let encrypted = encrypt_image(&plain.pixels()?, plain.dims(), pair.pub_key(), &options)?;

    let mut encrypted_file = Vec::new();
    pgm::write(&mut encrypted_file, &encrypted.to_raster()?)?;
    dbg!(encrypted.sample_width, encrypted_file.len());

    // decrypt side
    let read_back = pgm::read(&mut Cursor::new(&encrypted_file))?;
    assert_eq!(read_back.sample_width(), encrypted.sample_width);
    let decrypted = decrypt_image(read_back.samples(), read_back.dims(), pair.priv_key(), &options)?;

    assert_eq!(decrypted, original);

    Ok(())
}

#[test]
fn showcase_compressed_pgm() -> Result<(), PaillierError> {
    init_logging();

    let pair = generate_key_pair(11, 13)?;
    let dims = Dimensions::new(5, 4);
    let pixels = gradient(dims);
    let known_zero_bits = 5;

    let options = CodecOptions::try_with(
        EncodingMode::OptimizedR { known_zero_bits },
        true,
        SearchLimits::default(),
    )?;
    let encrypted = encrypt_image(&pixels, dims, pair.pub_key(), &options)?;
    let packed = compress(
        &encrypted.samples,
        encrypted.dims,
        known_zero_bits,
        encrypted.sample_width,
        &PackingLimits::default(),
    )?;
    // 20 samples of 11 bits fit 14 words of 16 bits
    assert_eq!(packed.words.len(), 14);

    let mut file = Vec::new();
    pgm::write_compressed(&mut file, &packed.to_compressed_raster()?)?;

    let compressed = pgm::read_compressed(&mut Cursor::new(&file))?;
    assert_eq!(compressed.original, dims);
    let packed_back = PackedImage::from_compressed_raster(compressed, known_zero_bits);
    assert_eq!(packed_back, packed);

    let samples = decompress(&packed_back, encrypted.sample_width, &PackingLimits::default())?;
    let decrypted = decrypt_image(&samples, packed_back.original, pair.priv_key(), &options)?;

    // n = 143 < 256, so histogram reduction may land one level below
    for (restored, pixel) in decrypted.pixels()?.iter().zip(&pixels) {
        assert!(pixel.abs_diff(*restored) <= 1, "{} restored as {}", pixel, restored);
    }

    Ok(())
}
