use std::cell::Cell;
use std::rc::Rc;

use quickpurple_core::collation::Collation;
use quickpurple_core::index::{build_index, IndexBuilder};

/// Counts its own drops so tests can observe when an entry is freed.
struct DropProbe {
    drops: Rc<Cell<usize>>,
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn probe(drops: &Rc<Cell<usize>>) -> Rc<DropProbe> {
    Rc::new(DropProbe {
        drops: Rc::clone(drops),
    })
}

fn collation() -> Rc<Collation> {
    Rc::new(Collation::for_locale("en").unwrap())
}

#[test]
fn two_word_name_is_referenced_twice() {
    let drops = Rc::new(Cell::new(0));
    let john = probe(&drops);
    let index = build_index(collation(), vec![("John Smith", Rc::clone(&john))]);

    assert_eq!(index.references_to(&john), 2);
    assert_eq!(index.tokens().collect::<Vec<_>>(), vec!["john", "smith"]);
    assert_eq!(Rc::strong_count(&john), 3);

    drop(john);
    assert_eq!(drops.get(), 0);
    assert_eq!(index.release(), 2);
    assert_eq!(drops.get(), 1);
}

#[test]
fn entry_without_tokens_is_freed_during_build() {
    let drops = Rc::new(Cell::new(0));
    let index = build_index(
        collation(),
        vec![("", probe(&drops)), (" \t\r\n", probe(&drops)), ("Bob", probe(&drops))],
    );

    assert_eq!(drops.get(), 2);
    assert_eq!(index.len(), 1);
    drop(index);
    assert_eq!(drops.get(), 3);
}

#[test]
fn entry_with_several_names_lives_until_last_association_goes() {
    let drops = Rc::new(Cell::new(0));
    let status = probe(&drops);
    let index = build_index(
        collation(),
        vec![
            ("me@example.org", Rc::clone(&status)),
            ("XMPP", Rc::clone(&status)),
            ("Extended away", Rc::clone(&status)),
        ],
    );
    let weak = Rc::downgrade(&status);
    drop(status);

    assert_eq!(index.len(), 4);
    assert!(weak.upgrade().is_some());
    drop(index);
    assert!(weak.upgrade().is_none());
    assert_eq!(drops.get(), 1);
}

#[test]
fn tokens_are_casefolded_and_collated() {
    let index = build_index(
        collation(),
        vec![
            ("Zoë", Rc::new(0)),
            ("ÉMILE", Rc::new(1)),
            ("adam", Rc::new(2)),
            ("Straße", Rc::new(3)),
        ],
    );

    assert_eq!(
        index.tokens().collect::<Vec<_>>(),
        vec!["adam", "émile", "strasse", "zoë"]
    );
}

#[test]
fn builder_appends_incrementally_and_sorts_once() {
    let mut builder = IndexBuilder::new(collation());
    let chat = Rc::new("chat");
    let contact = Rc::new("contact");
    assert_eq!(builder.append("Rust Users", &chat), 2);
    assert_eq!(builder.append("Alice", &contact), 1);
    assert_eq!(builder.len(), 3);

    let index = builder.finish();
    assert_eq!(
        index.tokens().collect::<Vec<_>>(),
        vec!["alice", "rust", "users"]
    );
    assert_eq!(index.references_to(&chat), 2);
}
