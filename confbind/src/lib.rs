//! Low-level utilities for the `confbind` configuration-binding library.
//!
//! This crate is the platform-facing foundation the rest of the library
//! builds on. It provides:
//!
//! - [`SystemAccess`]: an indirection over system properties and environment
//!   variables, so callers can bind against a [`RealSystem`] in production
//!   and an in-memory [`SystemSnapshot`] in tests.
//! - [`expand_user_home`]: expansion of a leading `~` marker in path or URL
//!   strings, preserving any `file:`/`jar:file:` scheme prefix.
//! - [`persist`]: write-then-rename persistence of property data, falling
//!   back to an in-place overwrite on platforms without reliable atomic
//!   rename semantics.
//! - [`pack_entry`]: packaging of property data as a single named entry in a
//!   ZIP container.
//!
//! Both writers share the line-oriented `key=value` serialization in
//! [`write_props`]/[`parse_props`], which round-trips every mapping it
//! writes.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use confbind::{PropertyMap, RealSystem, persist};
//!
//! # fn main() -> confbind::BindResult<()> {
//! let mut data = PropertyMap::new();
//! data.insert("server.port".to_owned(), "8080".to_owned());
//! persist(Path::new("conf/app.properties"), &data, &RealSystem)?;
//! # Ok(())
//! # }
//! ```

mod archive;
mod error;
mod expand;
mod props;
mod store;
mod system;

pub use archive::pack_entry;
pub use error::{BindError, BindResult};
pub use expand::expand_user_home;
pub use props::{PropertyMap, load_props, parse_props, to_bytes, write_props};
pub use store::persist;
pub use system::{OS_NAME, RealSystem, SystemAccess, SystemSnapshot, USER_DIR, USER_HOME};
