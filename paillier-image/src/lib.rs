//! # Paillier Image
//!
//! Paillier encryption of grayscale images, one pixel at a time, over 64-bit moduli.
//!
//! Keys are derived from two small primes, pixels are encrypted into whole or split
//! ciphertext samples, and streams whose low ciphertext bits were forced to zero can be
//! bit-packed into a smaller raster.

pub mod bitpack;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod errors;
pub mod image;
pub mod keypair;
pub mod raster;
pub mod ring;

pub use cipher::{PaillierCipher, Profile, SampleWidth};
pub use codec::{CodecOptions, EncodingMode, PixelCodec};
pub use config::{PackingLimits, SearchLimits, Settings};
pub use errors::{PaillierError, Result};
pub use image::{
    EncryptedImage, PackedImage, compress, decompress, decrypt_image, encrypt_image,
    generate_key_pair,
};
pub use keypair::{Key, KeyPair, PrivateKey, PublicKey, load_key};
pub use raster::{CompressedRaster, Dimensions, Raster};
