//! pictap – Pointer-gesture trigger layer for picture overlays.
//!
//! Binds on-screen pictures to scripted game events, fired by one of ten
//! pointer-gesture kinds (click, right-click, long-press, hover-in/out,
//! release, repeat, continuous-press, wheel-click, double-click).
//!
//! The crate sits between the host engine's raw pointer driver and its
//! scripted-event interpreter. Both ends are trait seams: the driver feeds
//! [`pointer::PointerSample`]s into a [`pointer::PointerTracker`], the
//! rendering tree exposes picture geometry through [`picture::PictureView`],
//! and a [`scene::TouchScene`] classifies every picture once per frame and
//! hands at most one `(event, picture)` call to the
//! [`scene::EventInterpreter`].

pub mod classifier;
pub mod command;
pub mod config;
pub mod picture;
pub mod pointer;
pub mod replay;
pub mod scene;
pub mod trigger;
