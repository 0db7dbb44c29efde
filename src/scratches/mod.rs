mod scratch_index;

pub use scratch_index::{STRUCTURE_FILE_NAME, ScratchIndex, ScratchIndexError};
