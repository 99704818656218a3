//! Behaviour of the forwarding decorator across its three target modes.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use uno_delegate::{args, Class, DelegateError, Delegation, InstallMode, Object, UnoValue};

/// `__add__(other) = 1 + other`, `__sub__(other) = 1 - other`.
fn root() -> Class {
    Class::new("Root")
        .method("__add__", |_, args| Ok(UnoValue::Hyper(1 + args.hyper(0)?)))
        .method("__sub__", |_, args| Ok(UnoValue::Hyper(1 - args.hyper(0)?)))
}

fn offset(name: &str, by: i64) -> Object {
    Class::new(name)
        .method("__add__", move |_, args| Ok(UnoValue::Hyper(by + args.hyper(0)?)))
        .instantiate()
}

fn sign(result: UnoValue) -> uno_delegate::Result<UnoValue> {
    let n = result.as_hyper().ok_or(DelegateError::TypeMismatch {
        expected: "hyper",
        actual: result.kind(),
    })?;
    Ok(UnoValue::from(if n >= 0 { "positive" } else { "negative" }))
}

#[test]
fn test_sign_wrapper_over_attribute() {
    let class = Delegation::new(InstallMode::Overwrite, ["__add__", "__sub__"])
        .with_transform(sign)
        .via_attribute("_object")
        .decorate(Class::new("Wrapper"));
    let instance = class.instantiate().with_attr("_object", root().instantiate());

    assert_eq!(instance.call("__add__", &args![1]).unwrap(), UnoValue::from("positive"));
    assert_eq!(instance.call("__add__", &args![-10]).unwrap(), UnoValue::from("negative"));
    assert_eq!(instance.call("__sub__", &args![4]).unwrap(), UnoValue::from("negative"));
    assert_eq!(instance.call("__sub__", &args![0]).unwrap(), UnoValue::from("positive"));
}

#[test]
fn test_superclass_fallback_without_transform() {
    let sub = Delegation::new(InstallMode::Overwrite, ["__add__"])
        .via_superclass()
        .decorate(Class::with_base("Sub", &root()));
    assert!(sub.defines("__add__"));
    assert_eq!(sub.instantiate().call("__add__", &args![1]).unwrap(), UnoValue::Hyper(2));
}

#[test]
fn test_unconfigured_decoration_is_identity() {
    let class = Class::with_base("Sub", &root());
    let decorated =
        Delegation::new(InstallMode::Additive, ["__add__", "__sub__"]).decorate(class.clone());
    assert!(decorated.ptr_eq(&class));
    assert!(decorated.method_names().is_empty());
}

#[test]
fn test_additive_keeps_existing_method() {
    let class = Class::new("Own").method("__add__", |_, _| Ok(UnoValue::from("own")));
    let class = Delegation::new(InstallMode::Additive, ["__add__", "__sub__"])
        .via_fixed(root().instantiate())
        .decorate(class);
    let instance = class.instantiate();

    assert_eq!(instance.call("__add__", &args![5]).unwrap(), UnoValue::from("own"));
    assert_eq!(instance.call("__sub__", &args![5]).unwrap(), UnoValue::Hyper(-4));
}

#[test]
fn test_additive_installs_over_inherited_method() {
    let sub = Class::with_base("Sub", &root());
    let sub = Delegation::new(InstallMode::Additive, ["__add__"])
        .via_fixed(offset("Ten", 10))
        .decorate(sub);
    assert_eq!(sub.instantiate().call("__add__", &args![1]).unwrap(), UnoValue::Hyper(11));
}

#[test]
fn test_overwrite_replaces_existing_method() {
    let class = Class::new("Own").method("__add__", |_, _| Ok(UnoValue::from("own")));
    let class = Delegation::new(InstallMode::Overwrite, ["__add__"])
        .via_fixed(root().instantiate())
        .decorate(class);
    assert_eq!(class.instantiate().call("__add__", &args![5]).unwrap(), UnoValue::Hyper(6));
}

#[test]
fn test_attribute_is_late_bound() {
    let class = Delegation::new(InstallMode::Overwrite, ["__add__"])
        .via_attribute("_object")
        .decorate(Class::new("Wrapper"));
    let instance = class.instantiate().with_attr("_object", offset("One", 1));
    assert_eq!(instance.call("__add__", &args![1]).unwrap(), UnoValue::Hyper(2));

    instance.set_attr("_object", offset("Hundred", 100));
    assert_eq!(instance.call("__add__", &args![1]).unwrap(), UnoValue::Hyper(101));
}

#[test]
fn test_fixed_delegate_ignores_instance_state() {
    let class = Delegation::new(InstallMode::Overwrite, ["__add__"])
        .via_fixed(offset("One", 1))
        .decorate(Class::new("Wrapper"));
    let instance = class.instantiate().with_attr("_object", offset("Hundred", 100));
    assert_eq!(instance.call("__add__", &args![1]).unwrap(), UnoValue::Hyper(2));
}

#[test]
fn test_class_attribute_delegate() {
    let class = Delegation::new(InstallMode::Overwrite, ["__sub__"])
        .via_attribute("_obj")
        .decorate(Class::new("Wrapper"));
    class.set_class_attr("_obj", root().instantiate());
    assert_eq!(class.instantiate().call("__sub__", &args![3]).unwrap(), UnoValue::Hyper(-2));
}

#[test]
fn test_delegate_errors_propagate_unchanged() {
    let divider = Class::new("Divider").method("__truediv__", |_, args| {
        let divisor = args.hyper(0)?;
        if divisor == 0 {
            return Err(DelegateError::raise("ZeroDivisionError", "division by zero"));
        }
        Ok(UnoValue::Hyper(100 / divisor))
    });
    let class = Delegation::new(InstallMode::Overwrite, ["__truediv__", "__floordiv__"])
        .with_transform(|raw| Ok(raw))
        .via_fixed(divider.instantiate())
        .decorate(Class::new("Wrapper"));
    let instance = class.instantiate();

    assert_eq!(
        instance.call("__truediv__", &args![0]).unwrap_err(),
        DelegateError::raise("ZeroDivisionError", "division by zero")
    );
    assert_eq!(
        instance.call("__truediv__", &args!["x"]).unwrap_err(),
        DelegateError::TypeMismatch {
            expected: "hyper",
            actual: "string"
        }
    );
    assert_eq!(
        instance.call("__floordiv__", &args![2]).unwrap_err(),
        DelegateError::MethodNotFound {
            class: "Divider".into(),
            method: "__floordiv__".into()
        }
    );
}

#[test]
fn test_decoration_visible_to_existing_instances() {
    let class = Class::new("Wrapper");
    let instance = class.instantiate().with_attr("_object", root().instantiate());
    Delegation::new(InstallMode::Overwrite, ["__add__"])
        .via_attribute("_object")
        .decorate(class);
    assert_eq!(instance.call("__add__", &args![2]).unwrap(), UnoValue::Hyper(3));
}

proptest! {
    #[test]
    fn prop_identity_transform_returns_raw_result(x in -1_000_000i64..1_000_000) {
        let delegate = Class::new("Affine")
            .method("apply", |_, args| Ok(UnoValue::Hyper(3 * args.hyper(0)? + 1)))
            .instantiate();
        let class = Delegation::new(InstallMode::Overwrite, ["apply"])
            .via_fixed(delegate)
            .decorate(Class::new("Wrapper"));
        let result = class.instantiate().call("apply", &args![x]).unwrap();
        prop_assert_eq!(result, UnoValue::Hyper(3 * x + 1));
    }

    #[test]
    fn prop_transform_applies_to_result_only(x in -1_000_000i64..1_000_000) {
        let class = Delegation::new(InstallMode::Overwrite, ["__add__"])
            .with_transform(|r| Ok(UnoValue::Hyper(r.as_hyper().unwrap_or_default() * 2)))
            .via_attribute("_object")
            .decorate(Class::new("Doubler"));
        let instance = class.instantiate().with_attr("_object", root().instantiate());
        let result = instance.call("__add__", &args![x]).unwrap();
        prop_assert_eq!(result, UnoValue::Hyper(2 * (1 + x)));
    }

    #[test]
    fn prop_every_name_is_forwarded(
        names in prop::collection::btree_set("[a-z]{1,8}", 1..6),
        x in -1000i64..1000,
    ) {
        let mut delegate = Class::new("Lengths");
        for name in &names {
            let len = name.len() as i64;
            delegate = delegate.method(name.clone(), move |_, args| {
                Ok(UnoValue::Hyper(len + args.hyper(0)?))
            });
        }
        let class = Delegation::new(InstallMode::Additive, names.iter().cloned())
            .via_fixed(delegate.instantiate())
            .decorate(Class::new("Wrapper"));
        let instance = class.instantiate();
        for name in &names {
            let result = instance.call(name, &args![x]).unwrap();
            prop_assert_eq!(result, UnoValue::Hyper(name.len() as i64 + x));
        }
    }
}
