pub mod ffmpeg_command_converter;
pub mod ffmpeg_library_converter;
