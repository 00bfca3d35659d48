//! minecraftimg library crate.
//!
//! Client for an image-to-Minecraft-blocks conversion service: image
//! selection, submission lifecycle, and ownership of the in-memory handles
//! backing the preview and the result.

pub mod cli;
pub mod config;
pub mod i18n;
pub mod resource;
pub mod selection;
pub mod shell;
pub mod submission;
