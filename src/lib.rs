/*  Copyright (C) 2025 Saúl Valdelvira
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, version 3.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>. */

//! Lazily initialized, thread-safe singletons
//!
//! Every holder in this crate owns at most one instance of a value,
//! built on first access, no matter how many threads race for it.
//!
//! - [LazySingletonHolder]: double-checked initialization. After the
//!   instance exists, an access is a single atomic load.
//! - [SynchronizedHolder]: takes a lock on every access.
//! - [LazyLock]: `static` value built on first dereference.
#![cfg_attr(feature = "alloc", doc = "- [SharedHolder]: hands out reference counted [Arc] handles.")]
//!
//! They're all built on [OnceLock] and a spinning [Mutex], so the crate
//! works in `no_std` enviroments.
//!
//! # Examples
//! ## LazySingletonHolder
//! ```
//! use singletonrs::{LazySingletonHolder, GameSettings};
//!
//! static SETTINGS: LazySingletonHolder<GameSettings> =
//!     LazySingletonHolder::new(GameSettings::new);
//!
//! let threads = (0..10).map(|_| {
//!     std::thread::spawn(|| {
//!         SETTINGS.get_instance() as *const GameSettings as usize
//!     })
//! }).collect::<Vec<_>>();
//!
//! let addrs = threads.into_iter()
//!                    .map(|t| t.join().unwrap())
//!                    .collect::<Vec<_>>();
//!
//! /* Every thread got the same instance */
//! assert!(addrs.iter().all(|a| *a == addrs[0]));
//! ```
//!
//! ## Fallible construction
//! ```
//! use singletonrs::LazySingletonHolder;
//!
//! let holder = LazySingletonHolder::new(|| "8080".parse::<u16>());
//!
//! let port = holder.try_get_instance().unwrap();
//! assert_eq!(*port, 8080);
//! ```

#![no_std]

/// Logs through `tracing` when the feature is enabled, and
/// expands to nothing otherwise
macro_rules! trace {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::$level!($($arg)*);
    };
}

pub mod spin;

pub mod mutex;
pub use mutex::Mutex;

pub mod error;
pub use error::{InitError, InitResult};

mod once;
pub use once::OnceLock;

mod holder;
pub use holder::LazySingletonHolder;

mod synchronized;
pub use synchronized::SynchronizedHolder;

mod lazy;
pub use lazy::LazyLock;

#[cfg(feature = "alloc")]
mod arc;
#[cfg(feature = "alloc")]
pub use arc::Arc;

#[cfg(feature = "alloc")]
mod shared;
#[cfg(feature = "alloc")]
pub use shared::{SharedHolder, SharedRef};

pub mod settings;
pub use settings::{Difficulty, GameSettings, SettingsSnapshot};
