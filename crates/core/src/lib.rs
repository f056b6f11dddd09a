//! Desk layout editor core.
//!
//! Everything in this crate is synchronous and in-memory: the desk model,
//! the placement rules, the layout canvas that owns a room's working set,
//! pointer drag tracking, the derived desk item view, and the add/edit desk
//! forms. Remote persistence lives in `deskplan-gateway`.

pub mod canvas;
pub mod desk;
pub mod drag;
pub mod error;
pub mod form;
pub mod item;
pub mod modal;
pub mod placement;
pub mod room;
pub mod types;
