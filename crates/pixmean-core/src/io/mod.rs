pub mod codec;
pub mod probe;
pub mod source;

pub use codec::{Codec, ImageCodec};
pub use probe::probe_dimensions;
pub use source::list_source_files;
