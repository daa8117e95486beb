pub mod media_converter;
