//! Caption emitters: [`rcwt`] (Raw Captions With Time) and [`stl`] (EBU-STL, EBU Tech 3264).
//!
//! Both emitters consume [`crate::line::Line`]s in timecode order and hold their running state
//! (header-written flag, counters, the currently-open subtitle) as instance fields, so a fresh
//! emitter always starts clean and two emitters never share state.

pub mod rcwt;
pub mod stl;
