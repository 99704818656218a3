//! Class decorators that install forwarding methods.
//!
//! A [`Delegation`] names a set of methods and says where each call should
//! go: to the base class, to an object held in an instance attribute
//! (looked up on every call), or to a fixed object. The raw result can be
//! passed through a transform before it is returned.
//!
//! ```
//! use uno_delegate::{args, Class, Delegation, InstallMode, UnoValue};
//!
//! let number = Class::new("Number")
//!     .method("__add__", |_, args| Ok(UnoValue::Hyper(1 + args.hyper(0)?)));
//!
//! let sign = Delegation::new(InstallMode::Overwrite, ["__add__"])
//!     .with_transform(|r| {
//!         let positive = r.as_hyper().is_some_and(|n| n >= 0);
//!         Ok(UnoValue::from(if positive { "positive" } else { "negative" }))
//!     })
//!     .via_attribute("_object")
//!     .decorate(Class::new("Sign"));
//!
//! let s = sign.instantiate().with_attr("_object", number.instantiate());
//! assert_eq!(s.call("__add__", &args![-10]).unwrap(), UnoValue::from("negative"));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::{DelegateError, Result};
use crate::object::{Args, Class, Method, Object};
use crate::value::UnoValue;

/// Post-processing applied to the result of every forwarded call.
pub type Transform = Arc<dyn Fn(UnoValue) -> Result<UnoValue> + Send + Sync>;

/// Whether methods the class already defines are replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Skip names present in the class's own method table.
    Additive,
    /// Install every name, replacing existing definitions.
    Overwrite,
}

/// Where forwarded calls go.
#[derive(Debug, Clone)]
pub enum Target {
    /// The base class's implementation of the same method.
    Superclass,
    /// The object stored in the named attribute at call time.
    ///
    /// A plain value in the attribute is not a receiver; the call fails with
    /// [`DelegateError::NotAnObject`] instead of dispatching on the value.
    Attribute(String),
    /// An object fixed when the class is decorated.
    Fixed(Object),
}

/// Configuration of a forwarding decorator.
#[derive(Clone)]
pub struct Delegation {
    mode: InstallMode,
    method_names: Vec<String>,
    transform: Option<Transform>,
    target: Option<Target>,
}

impl Delegation {
    pub fn new<I, S>(mode: InstallMode, method_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode,
            method_names: method_names.into_iter().map(Into::into).collect(),
            transform: None,
            target: None,
        }
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(UnoValue) -> Result<UnoValue> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Forward to the object held in attribute `name`, read on every call.
    pub fn via_attribute(mut self, name: impl Into<String>) -> Self {
        self.target = Some(Target::Attribute(name.into()));
        self
    }

    /// Forward to `delegate` regardless of instance state.
    pub fn via_fixed(mut self, delegate: Object) -> Self {
        self.target = Some(Target::Fixed(delegate));
        self
    }

    /// Forward to the base class implementation.
    pub fn via_superclass(mut self) -> Self {
        self.target = Some(Target::Superclass);
        self
    }

    pub fn mode(&self) -> InstallMode {
        self.mode
    }

    pub fn method_names(&self) -> &[String] {
        &self.method_names
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// True when neither a transform nor a target was configured.
    pub fn is_noop(&self) -> bool {
        self.transform.is_none() && self.target.is_none()
    }

    /// Install the forwarding methods on `class` and return it.
    ///
    /// Existence of the forwarded methods is not checked here; a missing
    /// method surfaces as [`DelegateError::MethodNotFound`] when called.
    pub fn decorate(&self, class: Class) -> Class {
        if self.is_noop() {
            tracing::debug!("delegation on {} has nothing to install", class.name());
            return class;
        }

        let target = self.target.clone().unwrap_or(Target::Superclass);
        for name in &self.method_names {
            if self.mode == InstallMode::Additive && class.defines(name) {
                tracing::trace!("{}.{} already defined, keeping it", class.name(), name);
                continue;
            }

            let forwarder = Forwarder::new(&class, &target, name);
            let transform = self.transform.clone();
            tracing::trace!("installing {}.{} -> {:?}", class.name(), name, forwarder);
            class.define(
                name.clone(),
                Method::new(move |this, args| {
                    let raw = forwarder.forward(this, args)?;
                    match &transform {
                        Some(transform) => transform(raw),
                        None => Ok(raw),
                    }
                }),
            );
        }
        class
    }
}

impl fmt::Debug for Delegation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegation")
            .field("mode", &self.mode)
            .field("method_names", &self.method_names)
            .field("transform", &self.transform.is_some())
            .field("target", &self.target)
            .finish()
    }
}

#[derive(Debug, Clone)]
enum Resolution {
    Base { class: String, base: Option<Class> },
    Attribute(String),
    Fixed(Object),
}

/// Forwards a call for one method name to its resolved receiver.
#[derive(Debug, Clone)]
pub struct Forwarder {
    method: String,
    resolution: Resolution,
}

impl Forwarder {
    fn new(class: &Class, target: &Target, method: &str) -> Self {
        let resolution = match target {
            Target::Superclass => Resolution::Base {
                class: class.name().to_string(),
                base: class.base().cloned(),
            },
            Target::Attribute(name) => Resolution::Attribute(name.clone()),
            Target::Fixed(delegate) => Resolution::Fixed(delegate.clone()),
        };
        Self {
            method: method.to_string(),
            resolution,
        }
    }

    pub fn method_name(&self) -> &str {
        &self.method
    }

    /// Call the method on the resolved receiver with `args`.
    ///
    /// Errors from the receiver are returned as they are.
    pub fn forward(&self, this: &Object, args: &Args) -> Result<UnoValue> {
        match &self.resolution {
            Resolution::Base { class, base } => {
                let method = base
                    .as_ref()
                    .and_then(|base| base.lookup(&self.method))
                    .ok_or_else(|| DelegateError::MethodNotFound {
                        class: format!("super({class})"),
                        method: self.method.clone(),
                    })?;
                method.invoke(this, args)
            }
            Resolution::Attribute(name) => {
                let value = this.get_attr(name)?;
                let delegate = value.as_object().ok_or_else(|| DelegateError::NotAnObject {
                    name: name.clone(),
                    found: value.kind(),
                })?;
                delegate.call(&self.method, args)
            }
            Resolution::Fixed(delegate) => delegate.call(&self.method, args),
        }
    }
}

/// Decorator that builds each named method with `factory`.
///
/// The factory receives the method name and a [`Forwarder`] that targets
/// the object in `attribute` when given, otherwise the base class. Every
/// name is installed, replacing existing definitions.
pub fn wrap_similar<F, I, S>(
    factory: F,
    method_names: I,
    attribute: Option<&str>,
) -> impl Fn(Class) -> Class
where
    F: Fn(&str, Forwarder) -> Method,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let method_names: Vec<String> = method_names.into_iter().map(Into::into).collect();
    let target = match attribute {
        Some(name) => Target::Attribute(name.to_string()),
        None => Target::Superclass,
    };
    move |class: Class| {
        for name in &method_names {
            let forwarder = Forwarder::new(&class, &target, name);
            class.define(name.clone(), factory(name.as_str(), forwarder));
        }
        class
    }
}
