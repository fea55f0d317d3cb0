//! # Cardwright I/O
//!
//! Bulk layout import: maps JSON or TOML tables of
//! `name → {x, y, width, height, h_align?, v_align?, scale?}` entries into a
//! named [`LayoutDef`](cardwright_core::LayoutDef) map, reporting (never
//! silently dropping) entries that do not convert.

pub mod layout_import;

pub use layout_import::{layouts_from_json, layouts_from_toml, ImportError, LayoutImport};
