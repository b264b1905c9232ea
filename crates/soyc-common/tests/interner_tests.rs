use super::{MAX_LOCAL_INDEX, ShardedInterner};
use crate::Atom;
use std::sync::Arc;

#[test]
fn interning_is_idempotent() {
    let interner = ShardedInterner::new();
    let a1 = interner.intern("hello");
    let a2 = interner.intern("hello");
    let b = interner.intern("world");

    assert_eq!(a1, a2);
    assert_ne!(a1, b);
    assert_eq!(&*interner.resolve(a1), "hello");
    assert_eq!(&*interner.resolve(b), "world");
}

#[test]
fn empty_string_is_the_none_atom() {
    let interner = ShardedInterner::new();
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
    assert_eq!(&*interner.resolve(Atom::NONE), "");
}

#[test]
fn common_strings_are_preinterned() {
    let interner = ShardedInterner::new();
    assert!(interner.is_empty());
    interner.intern_common();
    let before = interner.len();
    interner.intern("list");
    assert_eq!(interner.len(), before);
}

#[test]
fn concurrent_interning_agrees() {
    let interner = Arc::new(ShardedInterner::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let interner = Arc::clone(&interner);
            std::thread::spawn(move || {
                (0..64)
                    .map(|i| interner.intern(&format!("name{i}")))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<Atom>> = handles
        .into_iter()
        .map(|h| h.join().expect("interning thread panicked"))
        .collect();
    for other in &results[1..] {
        assert_eq!(&results[0], other);
    }
}

#[test]
fn poisoned_shard_still_interns() {
    let interner = Arc::new(ShardedInterner::new());
    let before = interner.intern("before");
    let shard = ShardedInterner::shard_for("after");

    let poisoner = Arc::clone(&interner);
    let result = std::thread::spawn(move || {
        let _guard = poisoner.shards[shard].state.write();
        panic!("writer died holding the lock");
    })
    .join();
    assert!(result.is_err());
    assert!(interner.shards[shard].state.is_poisoned());

    let after = interner.intern("after");
    assert!(!after.is_none());
    assert_eq!(interner.intern("after"), after);
    assert_eq!(&*interner.resolve(after), "after");
    assert_eq!(&*interner.resolve(before), "before");
}

#[test]
fn last_local_index_fits_in_an_atom() {
    let atom = ShardedInterner::make_atom(MAX_LOCAL_INDEX as usize, 5);
    assert_eq!(ShardedInterner::split_atom(atom), (5, MAX_LOCAL_INDEX as usize));
}

#[test]
#[should_panic(expected = "is full")]
fn full_shard_panics_instead_of_returning_none() {
    ShardedInterner::make_atom(MAX_LOCAL_INDEX as usize + 1, 5);
}
