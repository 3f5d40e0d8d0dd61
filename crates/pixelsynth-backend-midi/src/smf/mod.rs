//! Standard MIDI File writer.
//!
//! Produces format-0 files: one `MThd` header chunk followed by one `MTrk`
//! chunk. All multi-byte integers are big-endian.
//!
//! # Track Layout
//!
//! ```text
//! 00 FF 51 03 tt tt tt      set tempo (microseconds per quarter)
//! <delta> 9n kk vv          note on, channel n
//! <delta> 9n kk 00          note off (note on with velocity 0)
//! ...
//! 00 FF 2F 00               end of track
//! ```
//!
//! Delta times are variable-length quantities (see [`write_vlq`]).

mod event;
mod header;
mod track;
mod vlq;
mod writer;

pub use event::*;
pub use header::*;
pub use track::*;
pub use vlq::*;
pub use writer::*;
