mod image_codec_port;

pub use image_codec_port::ImageCodecPort;
