pub mod repositories;
pub mod second_factor;
