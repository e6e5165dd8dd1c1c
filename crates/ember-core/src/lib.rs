#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
pub mod configs;
pub mod downloads;
pub mod events;
pub mod instance;
pub mod repository;

pub mod error;

pub mod fs;
pub mod game_paths;
pub mod platform;

pub mod consts;

pub use consts::*;
pub use error::{Error, Result};
