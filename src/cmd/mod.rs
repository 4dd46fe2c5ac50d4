pub mod drive;
pub mod optimize;
