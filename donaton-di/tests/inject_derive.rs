#![allow(missing_docs)]
#![allow(dead_code)]

use donaton_di::{abstraction, Container, Inject, error::Error};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex
};

trait UserRepository: Send + Sync {
    fn count(&self) -> usize;
}

trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

trait Archive: Send + Sync {}

#[derive(Default)]
struct InMemoryUsers(Mutex<Vec<String>>);

impl UserRepository for InMemoryUsers {
    fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

#[derive(Default)]
struct RecordingNotifier(Mutex<Vec<String>>);

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.0.lock().unwrap().push(message.into());
    }
}

abstraction!(dyn UserRepository => InMemoryUsers);
abstraction!(dyn Notifier => RecordingNotifier);

#[derive(Inject)]
struct AccountService {
    users: Arc<dyn UserRepository>,
    notifier: Option<Arc<dyn Notifier>>,
    #[inject(default = Arc::new(3))]
    retries: Arc<u32>,
    #[inject(skip)]
    attempts: AtomicUsize,
}

#[derive(Inject)]
struct Signup(Arc<AccountService>, Arc<dyn UserRepository>);

#[derive(Inject)]
struct Archiver {
    archive: Arc<dyn Archive>,
}

#[derive(Inject)]
struct Reporter {
    #[inject(default = Arc::new(RecordingNotifier::default()))]
    notifier: Arc<dyn Notifier>,
}

#[derive(Inject)]
struct Nested {
    archiver: Arc<Archiver>,
}

#[derive(Inject)]
struct Lenient {
    #[inject(default)]
    archiver: Option<Arc<Archiver>>,
}

fn container() -> Container {
    let container = Container::new();
    container.bind_singleton::<dyn UserRepository, InMemoryUsers>();
    container.bind::<AccountService, AccountService>();
    container
}

#[test]
fn it_auto_wires_fields() {
    let container = container();

    let service = container.resolve::<AccountService>().unwrap();
    let users = container.resolve::<dyn UserRepository>().unwrap();

    assert!(Arc::ptr_eq(&service.users, &users));
    assert!(service.notifier.is_none());
    assert_eq!(*service.retries, 3);
    assert_eq!(service.attempts.load(Ordering::SeqCst), 0);
}

#[test]
fn it_resolves_bound_optional_and_defaulted_fields() {
    let container = container();
    container.bind_singleton::<dyn Notifier, RecordingNotifier>();
    container.bind_instance(Arc::new(5_u32));

    let service = container.resolve::<AccountService>().unwrap();

    assert!(service.notifier.is_some());
    assert_eq!(*service.retries, 5);
}

#[test]
fn it_auto_wires_tuple_structs_in_order() {
    let container = container();
    container.bind::<Signup, Signup>();

    let signup = container.resolve::<Signup>().unwrap();

    assert!(Arc::ptr_eq(&signup.0.users, &signup.1));
    assert_eq!(signup.1.count(), 0);
}

#[test]
fn it_reports_unresolvable_field() {
    let container = Container::new();
    container.bind::<Archiver, Archiver>();

    let err = container.resolve::<Archiver>().err().unwrap();

    match err {
        Error::UnresolvableDependency { dependency, implementation } => {
            assert!(dependency.contains("Archive"));
            assert!(implementation.ends_with("Archiver"));
        },
        _ => panic!("Expected UnresolvableDependency error")
    }
}

#[test]
fn it_uses_default_expression_for_unbound_field() {
    let container = Container::new();
    container.bind::<Reporter, Reporter>();

    let reporter = container.resolve::<Reporter>().unwrap();
    reporter.notifier.notify("hello");

    assert!(!container.is_bound::<dyn Notifier>());
}

#[test]
fn it_propagates_nested_failure_unchanged() {
    let container = Container::new();
    container.bind::<Archiver, Archiver>();
    container.bind::<Nested, Nested>();

    let err = container.resolve::<Nested>().err().unwrap();

    match err {
        Error::UnresolvableDependency { implementation, .. } => assert!(implementation.ends_with("Archiver")),
        _ => panic!("Expected UnresolvableDependency error")
    }
}

#[test]
fn it_falls_back_when_nested_dependency_is_unresolvable() {
    let container = Container::new();
    container.bind::<Archiver, Archiver>();
    container.bind::<Lenient, Lenient>();

    let lenient = container.resolve::<Lenient>().unwrap();

    assert!(lenient.archiver.is_none());
}
