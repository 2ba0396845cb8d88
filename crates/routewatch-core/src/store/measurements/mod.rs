//! Row I/O for `route_info`.

mod read;
mod write;
