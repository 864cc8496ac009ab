use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error(
        "snapshot is {found_width}x{found_height} but the region is {expected_width}x{expected_height}"
    )]
    SizeMismatch {
        expected_width: usize,
        expected_height: usize,
        found_width: usize,
        found_height: usize,
    },

    #[error("a {width}x{height} region does not fit in memory")]
    TooLarge { width: usize, height: usize },
}
