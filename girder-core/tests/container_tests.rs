use girder_core::{Container, Error, Injectable};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Debug, PartialEq)]
struct Greeter {
    greeting: String,
}

#[derive(Debug, Default, PartialEq)]
struct Settings {
    verbose: bool,
}

struct Home {
    greeter: Greeter,
    settings: Settings,
}

impl Injectable for Home {
    fn inject(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            greeter: container.resolve()?,
            settings: container.resolve_or_default()?,
        })
    }
}

#[test]
fn test_set_and_get() {
    let container = Container::new();
    container.set("test", || "test_value");

    assert_eq!(container.get::<&str>("test").unwrap(), "test_value");
}

#[test]
fn test_get_unknown_binding() {
    let container = Container::new();
    match container.get::<String>("unknown_binding") {
        Err(Error::BindingNotFound(key)) => assert_eq!(key, "unknown_binding"),
        other => panic!("expected BindingNotFound, got {:?}", other),
    }
}

#[test]
fn test_later_set_overrides() {
    let container = Container::new();
    container.set("test", || "original_value");
    container.set("test", || "new_value");

    assert_eq!(container.get::<&str>("test").unwrap(), "new_value");
    assert_eq!(container.len(), 1);
}

#[test]
fn test_factory_called_each_time() {
    let container = Container::new();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    container.set("counter", move || counter.fetch_add(1, Ordering::SeqCst) + 1);

    assert_eq!(container.get::<usize>("counter").unwrap(), 1);
    assert_eq!(container.get::<usize>("counter").unwrap(), 2);
}

#[test]
fn test_shared_handle_through_factory() {
    let container = Container::new();
    let shared = Arc::new(Greeter {
        greeting: "hi".into(),
    });
    let handle = shared.clone();
    container.set("greeter", move || handle.clone());

    let a = container.get::<Arc<Greeter>>("greeter").unwrap();
    let b = container.get::<Arc<Greeter>>("greeter").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &shared));
}

#[test]
fn test_build_with_dependencies() {
    let container = Container::new();
    container.bind(|| Greeter {
        greeting: "hello".into(),
    });

    let home = container.build::<Home>().unwrap();
    assert_eq!(home.greeter.greeting, "hello");
    assert_eq!(home.settings, Settings::default());
}

#[test]
fn test_build_uses_bound_default_type() {
    let container = Container::new();
    container.bind(|| Greeter {
        greeting: "hello".into(),
    });
    container.bind(|| Settings { verbose: true });

    assert!(container.build::<Home>().unwrap().settings.verbose);
}

#[test]
fn test_build_missing_dependency() {
    let container = Container::new();

    match container.build::<Home>() {
        Err(Error::UnresolvableDependency { target, dependency }) => {
            assert!(target.ends_with("Home"));
            assert!(dependency.ends_with("Greeter"));
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("build should fail"),
    }
}

#[test]
fn test_set_with_resolves_recursively() {
    let container = Container::new();
    container.set("name", || String::from("girder"));
    container.set_with("greeting", |c| {
        let name: String = c.get("name")?;
        Ok(format!("hello {}", name))
    });

    assert_eq!(container.get::<String>("greeting").unwrap(), "hello girder");
}

#[test]
fn test_has_keys_and_clear() {
    let container = Container::new();
    assert!(container.is_empty());

    container.set("b", || 1u8);
    container.bind(|| Settings::default());

    assert!(container.has("b"));
    assert!(container.has(Container::type_key::<Settings>()));
    assert_eq!(container.keys().len(), 2);

    container.clear();
    assert!(!container.has("b"));
    assert!(container.is_empty());
}

#[test]
fn test_clones_share_bindings() {
    let container = Container::new();
    let clone = container.clone();
    clone.set("late", || 7i32);

    assert_eq!(container.get::<i32>("late").unwrap(), 7);
}
