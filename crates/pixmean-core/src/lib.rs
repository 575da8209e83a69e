pub mod consts;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod raster;
pub mod stack;
