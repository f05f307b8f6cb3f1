pub mod byte_reader;
pub mod fs_size_calculator;
pub mod image_builder;
