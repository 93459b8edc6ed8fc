//! End-to-end behavior across fragment construction, compilation, and matching.

use std::sync::Arc;
use std::thread;

use indoc::indoc;

use crate::{Automaton, Fragment, Matcher, Pattern, Symbol, SymbolCache};

#[derive(Hash, PartialEq, Eq)]
struct S;

impl Symbol<char> for S {
    fn definition(&self) -> Fragment<char> {
        Fragment::cat([Fragment::exact('x'), Fragment::symbol(S).optional()])
    }
}

/// `List := List & ',' & Item | Item`
#[derive(Hash, PartialEq, Eq)]
struct List;

impl Symbol<char> for List {
    fn definition(&self) -> Fragment<char> {
        Fragment::alt([
            Fragment::cat([Fragment::symbol(List), Fragment::exact(','), Fragment::symbol(Item)]),
            Fragment::symbol(Item),
        ])
    }
}

#[derive(Hash, PartialEq, Eq)]
struct Item;

impl Symbol<char> for Item {
    fn definition(&self) -> Fragment<char> {
        Fragment::range('a', 'z').one_or_more()
    }
}

fn goats(n: usize) -> impl Iterator<Item = char> {
    std::iter::repeat_n('🐐', n)
}

#[test]
fn optional_copies_then_required_copies() {
    let goat = Fragment::exact('🐐');
    let pattern = Pattern::new(Fragment::cat([
        goat.clone().optional().times(69),
        goat.times(69),
    ]));
    let automaton = pattern.compile();
    let matcher = Matcher::new(&automaton);

    assert!(matcher.matches(goats(69)));
    assert!(!matcher.matches(goats(68)));
    assert!(matcher.matches(goats(138)));
    assert!(!matcher.matches(goats(139)));
}

#[test]
fn unbounded_pairs_over_long_input() {
    let goat = Fragment::exact('🐐');
    let pattern = Pattern::new(Fragment::cat([goat.clone(), goat.optional()]).repeat(0, None));

    assert!(pattern.matches(goats(100_000)));
}

#[test]
fn nested_optionals_under_plus() {
    let pattern = Pattern::new(Fragment::exact('a').optional().optional().one_or_more());

    assert!(pattern.matches("".chars()));
}

#[test]
fn right_recursive_rule_compiles_identically_twice() {
    let symbols = SymbolCache::new();
    let pattern = Pattern::with_symbols(Fragment::symbol(S), &symbols);

    assert!(pattern.matches("xxx".chars()));
    assert!(!pattern.matches("xxy".chars()));

    let first = Automaton::compile(&Fragment::symbol(S), &symbols);
    let second = Automaton::compile(&Fragment::symbol(S), &symbols);
    assert_eq!(first.dump(), second.dump());
    assert_eq!(symbols.len(), 1);
    assert!(Arc::ptr_eq(&symbols.compile(S), &symbols.compile(S)));
    insta::assert_snapshot!(first.dump(), @r"
    entry: S2
    S0: MATCH
    S1: DEAD
    S2: <S> → S0
    ");
}

#[test]
fn ascii_letter() {
    let pattern = Pattern::new(Fragment::alt([
        Fragment::range('A', 'Z'),
        Fragment::range('a', 'z'),
    ]));

    for letter in ('A'..='Z').chain('a'..='z') {
        assert!(pattern.matches([letter]), "{letter}");
    }
    for other in ['0', '9', '@', '[', '`', '{'] {
        assert!(!pattern.matches([other]), "{other}");
    }
    assert!(!pattern.matches("ab".chars()));
}

#[test]
fn idempotent_queries() {
    let pattern = Pattern::new(Fragment::symbol(S).exclude(Fragment::text("xx")));
    let automaton = pattern.compile();
    let matcher = Matcher::new(&automaton);

    for input in ["x", "xx", "xxx", "xy"] {
        let first = matcher.run(input.chars());
        assert_eq!(matcher.run(input.chars()), first, "{input}");
        assert_eq!(pattern.run(input.chars()), first, "{input}");
    }
}

#[test]
fn longest_prefix_grows_with_input() {
    let pattern = Pattern::new(
        Fragment::cat([Fragment::exact('a'), Fragment::exact('b').optional()]).one_or_more(),
    );
    let input: Vec<char> = "abaababbx".chars().collect();

    let mut previous = 0;
    for end in 0..=input.len() {
        let longest = pattern
            .longest_matching_prefix(&input[..end])
            .map_or(0, <[char]>::len);
        assert!(longest >= previous);
        previous = longest;
    }
    assert_eq!(previous, 7);
}

#[test]
fn right_recursion_over_long_input() {
    let automaton = Pattern::new(Fragment::symbol(S)).compile();
    let matcher = Matcher::new(&automaton);

    for n in [2_000, 100_000] {
        let outcome = matcher
            .try_run(std::iter::repeat_n('x', n))
            .expect("no call is pruned");
        assert!(outcome.matched);
    }
}

#[test]
fn left_recursive_list() {
    let pattern = Pattern::new(Fragment::symbol(List));

    assert!(pattern.matches("a".chars()));
    assert!(pattern.matches("ab,cd".chars()));
    assert!(pattern.matches("ab,cd,efg".chars()));
    assert!(!pattern.matches("ab,".chars()));
    assert!(!pattern.matches(",ab".chars()));
    assert_eq!(pattern.run("ab,cd;".chars()).longest_prefix, Some(5));
}

#[test]
fn repeated_attempts_do_not_accumulate() {
    let symbols = SymbolCache::new();
    let pattern = Pattern::with_symbols(Fragment::symbol(S).one_or_more(), &symbols);
    let entry = symbols.compile(S);
    let references = Arc::strong_count(&entry);

    for n in 1..200 {
        assert!(pattern.matches(std::iter::repeat_n('x', n)));
    }

    assert_eq!(symbols.len(), 1);
    assert_eq!(Arc::strong_count(&entry), references);
}

#[test]
fn concurrent_patterns_share_rules() {
    let symbols = SymbolCache::new();
    let pattern = Pattern::with_symbols(Fragment::symbol(S), &symbols);

    thread::scope(|scope| {
        for n in 1..=8 {
            let pattern = &pattern;
            scope.spawn(move || {
                assert!(pattern.matches(std::iter::repeat_n('x', n)));
            });
        }
    });

    assert_eq!(symbols.len(), 1);
}

#[test]
fn anything_but_forbidden() {
    let pattern = Pattern::new(Fragment::any().one_or_more().exclude(Fragment::text("forbidden")));

    assert!(!pattern.matches("forbidden".chars()));
    assert!(pattern.matches("forbidde".chars()));
    assert!(pattern.matches("forbiddenx".chars()));
    assert!(pattern.matches("xforbidden".chars()));
}

#[test]
fn exclusion_under_repetition() {
    let pattern = Pattern::new(
        Fragment::exact('a')
            .one_or_more()
            .exclude(Fragment::text("aa"))
            .one_or_more(),
    );

    assert!(pattern.matches("aa".chars()));
    assert!(pattern.matches("aaaa".chars()));
}

#[test]
fn graph_dump() {
    let pattern = Pattern::new(Fragment::cat([
        Fragment::exact('a'),
        Fragment::exact('b').zero_or_more(),
    ]));

    let expected = indoc! {"
        entry: S4
        S0: MATCH
        S1: DEAD
        S2: ε → S3, S0
        S3: 'b' → S2
        S4: 'a' → S2
    "};
    assert_eq!(pattern.compile().dump(), expected);
}
