//! A small dynamic object model: classes with mutable method tables,
//! single inheritance, and instances with late-bound attributes.
//!
//! A [`Class`] is a shared handle. Defining a method on it is visible to
//! every existing and future instance, which is what lets a decorator
//! rewrite a type after it has been declared.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{DelegateError, Result};
use crate::value::UnoValue;

type MethodFn = dyn Fn(&Object, &Args) -> Result<UnoValue> + Send + Sync;

/// A callable installed in a class's method table.
///
/// The first argument is the receiver (`self` of the call).
#[derive(Clone)]
pub struct Method(Arc<MethodFn>);

impl Method {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Object, &Args) -> Result<UnoValue> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn invoke(&self, this: &Object, args: &Args) -> Result<UnoValue> {
        (self.0)(this, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(..)")
    }
}

/// Positional and keyword arguments of a call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<UnoValue>,
    keyword: BTreeMap<String, UnoValue>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<UnoValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<UnoValue>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn positional(&self) -> &[UnoValue] {
        &self.positional
    }

    pub fn keywords(&self) -> &BTreeMap<String, UnoValue> {
        &self.keyword
    }

    pub fn keyword(&self, name: &str) -> Option<&UnoValue> {
        self.keyword.get(name)
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Positional argument `index`, or [`DelegateError::MissingArgument`].
    pub fn get(&self, index: usize) -> Result<&UnoValue> {
        self.positional
            .get(index)
            .ok_or(DelegateError::MissingArgument(index))
    }

    /// Positional argument `index` as an integer.
    pub fn hyper(&self, index: usize) -> Result<i64> {
        let value = self.get(index)?;
        value.as_hyper().ok_or(DelegateError::TypeMismatch {
            expected: "hyper",
            actual: value.kind(),
        })
    }
}

impl From<Vec<UnoValue>> for Args {
    fn from(positional: Vec<UnoValue>) -> Self {
        Self {
            positional,
            keyword: BTreeMap::new(),
        }
    }
}

/// Build positional [`Args`] from a list of values.
///
/// ```
/// use uno_delegate::{args, UnoValue};
///
/// let a = args![1, "two"];
/// assert_eq!(a.positional(), &[UnoValue::Long(1), UnoValue::from("two")]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::from(vec![$($crate::UnoValue::from($value)),+])
    };
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

struct ClassInner {
    name: String,
    base: Option<Class>,
    methods: RwLock<HashMap<String, Method>>,
    attributes: RwLock<HashMap<String, UnoValue>>,
}

/// A type with a mutable method table and an optional base class.
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

impl Class {
    /// Declare a class without a base.
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    /// Declare a class deriving from `base`.
    pub fn with_base(name: impl Into<String>, base: &Class) -> Self {
        Self::build(name.into(), Some(base.clone()))
    }

    fn build(name: String, base: Option<Class>) -> Self {
        Self(Arc::new(ClassInner {
            name,
            base,
            methods: RwLock::new(HashMap::new()),
            attributes: RwLock::new(HashMap::new()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn base(&self) -> Option<&Class> {
        self.0.base.as_ref()
    }

    /// Install `method` under `name`, returning the method it replaced.
    pub fn define(&self, name: impl Into<String>, method: Method) -> Option<Method> {
        write(&self.0.methods).insert(name.into(), method)
    }

    /// Builder form of [`Class::define`].
    pub fn method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Object, &Args) -> Result<UnoValue> + Send + Sync + 'static,
    {
        self.define(name, Method::new(f));
        self
    }

    /// Whether `name` is in this class's own method table (bases excluded).
    pub fn defines(&self, name: &str) -> bool {
        read(&self.0.methods).contains_key(name)
    }

    /// Resolve `name` through this class and then its bases.
    pub fn lookup(&self, name: &str) -> Option<Method> {
        let mut class = Some(self);
        while let Some(c) = class {
            if let Some(method) = read(&c.0.methods).get(name) {
                return Some(method.clone());
            }
            class = c.base();
        }
        None
    }

    /// Names in the own method table, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.0.methods).keys().cloned().collect();
        names.sort();
        names
    }

    /// Set a class-level attribute, shared by all instances.
    pub fn set_class_attr(&self, name: impl Into<String>, value: impl Into<UnoValue>) {
        write(&self.0.attributes).insert(name.into(), value.into());
    }

    /// Resolve a class-level attribute through this class and its bases.
    pub fn class_attr(&self, name: &str) -> Option<UnoValue> {
        let mut class = Some(self);
        while let Some(c) = class {
            if let Some(value) = read(&c.0.attributes).get(name) {
                return Some(value.clone());
            }
            class = c.base();
        }
        None
    }

    /// Create an instance with no instance attributes.
    pub fn instantiate(&self) -> Object {
        Object::new(self)
    }

    /// Whether both handles refer to the same class.
    pub fn ptr_eq(&self, other: &Class) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this class is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut class = Some(self);
        while let Some(c) = class {
            if c.ptr_eq(other) {
                return true;
            }
            class = c.base();
        }
        false
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.0.name)
            .field("base", &self.base().map(Class::name))
            .finish()
    }
}

struct ObjectInner {
    class: Class,
    attributes: RwLock<HashMap<String, UnoValue>>,
}

/// An instance of a [`Class`]. Cloning shares the instance.
#[derive(Clone)]
pub struct Object(Arc<ObjectInner>);

impl Object {
    pub fn new(class: &Class) -> Self {
        Self(Arc::new(ObjectInner {
            class: class.clone(),
            attributes: RwLock::new(HashMap::new()),
        }))
    }

    pub fn class(&self) -> &Class {
        &self.0.class
    }

    /// Read an attribute: instance attributes first, then class attributes.
    pub fn get_attr(&self, name: &str) -> Result<UnoValue> {
        if let Some(value) = read(&self.0.attributes).get(name) {
            return Ok(value.clone());
        }
        self.class()
            .class_attr(name)
            .ok_or_else(|| DelegateError::AttributeNotFound {
                class: self.class().name().to_string(),
                name: name.to_string(),
            })
    }

    /// Set an instance attribute, returning the previous instance value.
    pub fn set_attr(
        &self,
        name: impl Into<String>,
        value: impl Into<UnoValue>,
    ) -> Option<UnoValue> {
        write(&self.0.attributes).insert(name.into(), value.into())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_ok()
    }

    /// Builder form of [`Object::set_attr`].
    pub fn with_attr(self, name: impl Into<String>, value: impl Into<UnoValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Invoke method `name` on this object.
    pub fn call(&self, name: &str, args: &Args) -> Result<UnoValue> {
        let method = self
            .class()
            .lookup(name)
            .ok_or_else(|| DelegateError::MethodNotFound {
                class: self.class().name().to_string(),
                method: name.to_string(),
            })?;
        tracing::trace!("{}.{}({:?})", self.class().name(), name, args.positional());
        method.invoke(self, args)
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class().name())
            .finish_non_exhaustive()
    }
}
