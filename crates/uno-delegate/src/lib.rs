//! Method delegation for office automation wrappers.
//!
//! Wrapper types around office objects mostly consist of methods that hand
//! the call to some other object and maybe massage the result. This crate
//! provides that as a decorator over a small dynamic object model:
//!
//! - [`Class`] / [`Object`] (`object.rs`): classes with mutable method
//!   tables and single inheritance, instances with attributes
//! - [`Delegation`] (`delegate.rs`): installs forwarding methods for a set
//!   of names, targeting the base class, an instance attribute (late bound)
//!   or a fixed object, with an optional result transform
//! - [`wrap_similar`]: builds each named method from a user factory
//! - [`delegate_binary_ops!`] (`ops.rs`): the compile-time counterpart for
//!   plain Rust newtypes
//!
//! # Example
//!
//! ```rust
//! use uno_delegate::{args, Class, Delegation, InstallMode, UnoValue};
//!
//! let root = Class::new("Root")
//!     .method("__add__", |_, args| Ok(UnoValue::Hyper(1 + args.hyper(0)?)));
//!
//! let sub = Delegation::new(InstallMode::Overwrite, ["__add__"])
//!     .via_superclass()
//!     .decorate(Class::with_base("Sub", &root));
//!
//! let s = sub.instantiate();
//! assert_eq!(s.call("__add__", &args![1])?, UnoValue::Hyper(2));
//! # Ok::<(), uno_delegate::DelegateError>(())
//! ```

pub mod delegate;
pub mod error;
pub mod object;
pub mod ops;
pub mod value;

pub use delegate::{wrap_similar, Delegation, Forwarder, InstallMode, Target, Transform};
pub use error::{DelegateError, Result};
pub use object::{Args, Class, Method, Object};
pub use value::{UnoException, UnoValue};
