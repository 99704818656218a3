//! `com.sun.star.beans.PropertyValue` sequences.

use uno_delegate::UnoValue;

/// A named value, as passed in the argument sequences of UNO calls such
/// as `loadComponentFromURL` or `storeToURL`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    pub name: String,
    pub value: UnoValue,
}

impl PropertyValue {
    pub fn new(name: impl Into<String>, value: impl Into<UnoValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Build a property sequence from name/value pairs, keeping their order.
pub fn properties<I, K, V>(pairs: I) -> Vec<PropertyValue>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<UnoValue>,
{
    pairs
        .into_iter()
        .map(|(name, value)| PropertyValue::new(name, value))
        .collect()
}

/// First value named `name` in a property sequence.
pub fn find_property<'a>(props: &'a [PropertyValue], name: &str) -> Option<&'a UnoValue> {
    props.iter().find(|p| p.name == name).map(|p| &p.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_properties_keep_order() {
        let props = properties([
            ("Hidden", UnoValue::Bool(true)),
            ("FilterName", "Calc MS Excel 2007 XML".into()),
        ]);
        assert_eq!(props.len(), 2);
        assert_eq!(props[0], PropertyValue::new("Hidden", true));
        assert_eq!(props[1].name, "FilterName");
        assert_eq!(
            find_property(&props, "FilterName").and_then(UnoValue::as_string),
            Some("Calc MS Excel 2007 XML")
        );
        assert_eq!(find_property(&props, "Overwrite"), None);
    }
}
