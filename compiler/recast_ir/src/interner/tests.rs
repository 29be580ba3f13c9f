use super::*;

#[test]
fn test_intern_and_lookup() {
    let interner = StringInterner::new();

    let hello = interner.intern("hello");
    let world = interner.intern("world");
    let hello2 = interner.intern("hello");

    assert_eq!(hello, hello2);
    assert_ne!(hello, world);

    assert_eq!(interner.lookup(hello), "hello");
    assert_eq!(interner.lookup(world), "world");
}

#[test]
fn test_empty_string() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn test_get_does_not_intern() {
    let interner = StringInterner::new();
    let before = interner.len();
    assert_eq!(interner.get("neverSeenBefore"), None);
    assert_eq!(interner.len(), before);

    let name = interner.intern("neverSeenBefore");
    assert_eq!(interner.get("neverSeenBefore"), Some(name));
}

#[test]
fn test_keywords_pre_interned() {
    let interner = StringInterner::new();
    assert!(interner.get("System").is_some());
    assert!(interner.get("var").is_some());
    assert!(!interner.is_empty());
}

#[test]
fn test_concurrent_interning() {
    let interner = StringInterner::new();
    let names: Vec<Vec<Name>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..64)
                        .map(|i| interner.intern(&format!("ident{i}")))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_default())
            .collect()
    });

    for other in &names[1..] {
        assert_eq!(&names[0], other);
    }
}
