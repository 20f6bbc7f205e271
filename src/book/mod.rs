mod derive;
mod model;
mod validate;

pub use model::{format_duration, Book, Chapter, Mode, TempArtifacts, Track, INPUT_TYPES};
pub use validate::sanitize;
