//! Chain of abstractions currently being constructed on this thread

use crate::error::Error;
use std::{any::TypeId, cell::RefCell};

/// Identifies an abstraction within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathKey {
    pub(crate) registry: usize,
    pub(crate) key: TypeId,
}

thread_local! {
    static IN_PROGRESS: RefCell<Vec<(PathKey, &'static str)>> = const { RefCell::new(Vec::new()) };
}

/// Marks an abstraction as under construction on the current thread until dropped.
///
/// The chain is per thread, not per container handle, so a factory that resolves
/// through a captured container still closes the cycle.
#[derive(Debug)]
pub(crate) struct ResolutionPath {
    key: PathKey,
}

impl ResolutionPath {
    /// Pushes `key` onto the chain of the current thread
    ///
    /// # Errors
    /// [`Error::CyclicDependency`] if `key` is already being constructed on this thread
    pub(crate) fn enter(key: PathKey, name: &'static str) -> Result<Self, Error> {
        IN_PROGRESS.with_borrow_mut(|chain| {
            if let Some(start) = chain.iter().position(|(entry, _)| *entry == key) {
                let mut cycle = chain[start..]
                    .iter()
                    .map(|(_, name)| *name)
                    .collect::<Vec<_>>();
                cycle.push(name);
                return Err(Error::CyclicDependency(cycle));
            }
            chain.push((key, name));
            Ok(Self { key })
        })
    }
}

impl Drop for ResolutionPath {
    fn drop(&mut self) {
        IN_PROGRESS.with_borrow_mut(|chain| {
            if let Some(index) = chain.iter().rposition(|(entry, _)| *entry == self.key) {
                chain.remove(index);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{PathKey, ResolutionPath};
    use crate::error::Error;
    use std::any::TypeId;

    struct A;
    struct B;
    struct C;

    fn key<T: 'static>(registry: usize) -> PathKey {
        PathKey { registry, key: TypeId::of::<T>() }
    }

    #[test]
    fn it_releases_key_when_dropped() {
        let first = ResolutionPath::enter(key::<A>(1), "A").unwrap();
        drop(first);

        assert!(ResolutionPath::enter(key::<A>(1), "A").is_ok());
    }

    #[test]
    fn it_extracts_cycle_from_first_occurrence() {
        let _c = ResolutionPath::enter(key::<C>(1), "C").unwrap();
        let _a = ResolutionPath::enter(key::<A>(1), "A").unwrap();
        let _b = ResolutionPath::enter(key::<B>(1), "B").unwrap();

        let err = ResolutionPath::enter(key::<A>(1), "A").unwrap_err();

        match err {
            Error::CyclicDependency(chain) => assert_eq!(chain, vec!["A", "B", "A"]),
            _ => panic!("Expected CyclicDependency error")
        }
    }

    #[test]
    fn it_extracts_self_cycle() {
        let _a = ResolutionPath::enter(key::<A>(1), "A").unwrap();

        match ResolutionPath::enter(key::<A>(1), "A") {
            Err(Error::CyclicDependency(chain)) => assert_eq!(chain, vec!["A", "A"]),
            _ => panic!("Expected CyclicDependency error")
        }
    }

    #[test]
    fn it_separates_registries() {
        let _a = ResolutionPath::enter(key::<A>(1), "A").unwrap();

        assert!(ResolutionPath::enter(key::<A>(2), "A").is_ok());
    }

    #[test]
    fn it_separates_threads() {
        let _a = ResolutionPath::enter(key::<A>(1), "A").unwrap();

        let other = std::thread::spawn(|| ResolutionPath::enter(key::<A>(1), "A").is_ok())
            .join()
            .unwrap();

        assert!(other);
    }
}
