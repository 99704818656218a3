//! List, map and iterator views over UNO container interfaces.
//!
//! The container traits below mirror `com.sun.star.container.*`; the
//! environment implements them for its remote objects. The adapters give
//! those objects index/key/iteration semantics and translate the UNO
//! exceptions that correspond to "no such index" and "no such key".

use uno_delegate::UnoException;

use crate::error::{AdapterError, Result};

pub const INDEX_OUT_OF_BOUNDS: &str = "com.sun.star.lang.IndexOutOfBoundsException";
pub const NO_SUCH_ELEMENT: &str = "com.sun.star.container.NoSuchElementException";

/// `com.sun.star.container.XIndexAccess`
pub trait IndexAccess {
    type Element;

    fn count(&self) -> usize;
    fn get_by_index(&self, index: usize) -> std::result::Result<Self::Element, UnoException>;
}

/// `com.sun.star.container.XIndexReplace`
pub trait IndexReplace: IndexAccess {
    fn replace_by_index(
        &mut self,
        index: usize,
        element: Self::Element,
    ) -> std::result::Result<(), UnoException>;
}

/// `com.sun.star.container.XNameAccess`
pub trait NameAccess {
    type Element;

    fn element_names(&self) -> Vec<String>;
    fn get_by_name(&self, name: &str) -> std::result::Result<Self::Element, UnoException>;
    fn has_by_name(&self, name: &str) -> bool;
}

/// `com.sun.star.container.XNameReplace`
pub trait NameReplace: NameAccess {
    fn replace_by_name(
        &mut self,
        name: &str,
        element: Self::Element,
    ) -> std::result::Result<(), UnoException>;
}

/// `com.sun.star.container.XEnumeration`
pub trait Enumeration {
    type Element;

    fn has_more_elements(&self) -> bool;
    fn next_element(&mut self) -> std::result::Result<Self::Element, UnoException>;
}

/// `com.sun.star.container.XEnumerationAccess`
pub trait EnumerationAccess {
    type Enumeration: Enumeration;

    fn create_enumeration(&self) -> Self::Enumeration;
}

fn index_error(index: usize, exc: UnoException) -> AdapterError {
    if exc.type_name == INDEX_OUT_OF_BOUNDS {
        AdapterError::IndexOutOfRange(index)
    } else {
        AdapterError::Uno(exc)
    }
}

fn name_error(name: &str, exc: UnoException) -> AdapterError {
    if exc.type_name == NO_SUCH_ELEMENT {
        AdapterError::KeyNotFound(name.to_string())
    } else {
        AdapterError::Uno(exc)
    }
}

/// Adapter kinds, chosen from the interfaces an object supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    EnumerationAccess,
    IndexAccess,
    NameAccess,
}

impl ContainerKind {
    /// Pick the adapter for the first supported `com.sun.star.container`
    /// interface in `type_names`.
    pub fn detect<S: AsRef<str>>(type_names: &[S]) -> Result<Self> {
        for type_name in type_names {
            let parts: Vec<&str> = type_name.as_ref().split('.').collect();
            let (Some(&"container"), Some(interface)) = (parts.get(3), parts.get(4)) else {
                continue;
            };
            let kind = match *interface {
                "XEnumerationAccess" => ContainerKind::EnumerationAccess,
                "XIndexAccess" => ContainerKind::IndexAccess,
                "XNameAccess" => ContainerKind::NameAccess,
                _ => continue,
            };
            tracing::debug!("{} selects {:?}", type_name.as_ref(), kind);
            return Ok(kind);
        }
        Err(AdapterError::BadContainerType(
            type_names.iter().map(|t| t.as_ref().to_string()).collect(),
        ))
    }
}

/// Indexed view of an `XIndexAccess` object.
#[derive(Debug, Clone)]
pub struct IndexList<C> {
    object: C,
}

impl<C: IndexAccess> IndexList<C> {
    pub fn new(object: C) -> Self {
        Self { object }
    }

    pub fn len(&self) -> usize {
        self.object.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Result<C::Element> {
        self.object
            .get_by_index(index)
            .map_err(|e| index_error(index, e))
    }

    /// Elements in index order.
    pub fn iter(&self) -> impl Iterator<Item = Result<C::Element>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    pub fn inner(&self) -> &C {
        &self.object
    }

    pub fn into_inner(self) -> C {
        self.object
    }
}

impl<C: IndexReplace> IndexList<C> {
    pub fn set(&mut self, index: usize, element: C::Element) -> Result<()> {
        self.object
            .replace_by_index(index, element)
            .map_err(|e| index_error(index, e))
    }
}

/// Map view of an `XNameAccess` object. Iteration yields the keys.
#[derive(Debug, Clone)]
pub struct NameMap<C> {
    object: C,
}

impl<C: NameAccess> NameMap<C> {
    pub fn new(object: C) -> Self {
        Self { object }
    }

    pub fn get(&self, key: &str) -> Result<C::Element> {
        self.object.get_by_name(key).map_err(|e| name_error(key, e))
    }

    pub fn keys(&self) -> Vec<String> {
        self.object.element_names()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.object.has_by_name(key)
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Result<Vec<C::Element>> {
        self.keys().iter().map(|k| self.get(k)).collect()
    }

    pub fn items(&self) -> Result<Vec<(String, C::Element)>> {
        self.keys()
            .into_iter()
            .map(|k| {
                let value = self.get(&k)?;
                Ok((k, value))
            })
            .collect()
    }

    pub fn iter(&self) -> std::vec::IntoIter<String> {
        self.keys().into_iter()
    }

    pub fn inner(&self) -> &C {
        &self.object
    }

    pub fn into_inner(self) -> C {
        self.object
    }
}

impl<C: NameReplace> NameMap<C> {
    pub fn set(&mut self, key: &str, value: C::Element) -> Result<()> {
        self.object
            .replace_by_name(key, value)
            .map_err(|e| name_error(key, e))
    }
}

impl<'a, C: NameAccess> IntoIterator for &'a NameMap<C> {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over an `XEnumeration`.
#[derive(Debug)]
pub struct Elements<E> {
    enumeration: E,
}

impl<E: Enumeration> Iterator for Elements<E> {
    type Item = Result<E::Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.enumeration.has_more_elements() {
            return None;
        }
        Some(self.enumeration.next_element().map_err(AdapterError::from))
    }
}

/// Iterable view of an `XEnumerationAccess` object.
///
/// Each call to [`EnumerationIter::iter`] starts a fresh enumeration.
#[derive(Debug, Clone)]
pub struct EnumerationIter<C> {
    object: C,
}

impl<C: EnumerationAccess> EnumerationIter<C> {
    pub fn new(object: C) -> Self {
        Self { object }
    }

    pub fn iter(&self) -> Elements<C::Enumeration> {
        Elements {
            enumeration: self.object.create_enumeration(),
        }
    }

    pub fn into_inner(self) -> C {
        self.object
    }
}

impl<'a, C: EnumerationAccess> IntoIterator for &'a EnumerationIter<C> {
    type Item = Result<<C::Enumeration as Enumeration>::Element>;
    type IntoIter = Elements<C::Enumeration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
