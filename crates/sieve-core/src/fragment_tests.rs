use crate::fragment::repeat_bound;
use crate::{ExpressionClass, Fragment, Predicate, Symbol};

fn a() -> Fragment<char> {
    Fragment::exact('a')
}

fn show(fragment: &Fragment<char>) -> String {
    format!("{fragment:?}")
}

#[derive(Hash, PartialEq, Eq)]
struct Word;

/// `Keyword := "if" | "for"`
#[derive(Hash, PartialEq, Eq)]
struct Keyword;

impl Symbol<char> for Keyword {
    fn definition(&self) -> Fragment<char> {
        Fragment::alt([Fragment::text("if"), Fragment::text("for")])
    }
}

/// `Identifier := Word ÷ Keyword`
#[derive(Hash, PartialEq, Eq)]
struct Identifier;

impl Symbol<char> for Identifier {
    fn definition(&self) -> Fragment<char> {
        Fragment::symbol(Word).exclude(Fragment::symbol(Keyword))
    }
}

/// `Args := Identifier & (',' & Args)?`
#[derive(Hash, PartialEq, Eq)]
struct Args;

impl Symbol<char> for Args {
    fn definition(&self) -> Fragment<char> {
        Fragment::cat([
            Fragment::symbol(Identifier),
            Fragment::cat([Fragment::exact(','), Fragment::symbol(Args)]).optional(),
        ])
    }
}

/// `Call := Word & '(' & Args & ')'`
#[derive(Hash, PartialEq, Eq)]
struct Call;

impl Symbol<char> for Call {
    fn definition(&self) -> Fragment<char> {
        Fragment::cat([
            Fragment::symbol(Word),
            Fragment::exact('('),
            Fragment::symbol(Args),
            Fragment::exact(')'),
        ])
    }
}

impl Symbol<char> for Word {
    fn definition(&self) -> Fragment<char> {
        Fragment::range('a', 'z').one_or_more()
    }
}

#[test]
fn primitives() {
    insta::assert_snapshot!(show(&Fragment::never()), @"∅");
    insta::assert_snapshot!(show(&Fragment::empty()), @"ε");
    insta::assert_snapshot!(show(&Fragment::any()), @".");
    insta::assert_snapshot!(show(&Fragment::range('a', 'z')), @"'a'..='z'");
    insta::assert_snapshot!(show(&Fragment::symbol(Word)), @"<Word>");
}

#[test]
fn predicate_atom_shows_its_name() {
    let digit = Fragment::atom(Predicate::<char>::new("digit", |c| c.is_ascii_digit()));

    insta::assert_snapshot!(show(&digit), @"digit");
}

#[test]
fn catenation_collapses_single_part() {
    insta::assert_snapshot!(show(&Fragment::text("a")), @"'a'");
    insta::assert_snapshot!(show(&Fragment::text("ab")), @"('a' & 'b')");
    insta::assert_snapshot!(show(&Fragment::cat(Vec::<Fragment<char>>::new())), @"ε");
}

#[test]
fn alternation_collapses_single_choice() {
    let b = Fragment::exact('b');

    insta::assert_snapshot!(show(&Fragment::alt([a()])), @"'a'");
    insta::assert_snapshot!(show(&Fragment::alt([a(), b])), @"('a' | 'b')");
}

#[test]
#[should_panic(expected = "at least one choice")]
fn alternation_of_nothing_panics() {
    let _ = Fragment::alt(Vec::<Fragment<char>>::new());
}

#[test]
fn quantifiers() {
    insta::assert_snapshot!(show(&a().optional()), @"'a'?");
    insta::assert_snapshot!(show(&a().zero_or_more()), @"'a'*");
    insta::assert_snapshot!(show(&a().one_or_more()), @"'a'+");
    insta::assert_snapshot!(show(&Fragment::text("ab").optional()), @"('a' & 'b')?");
}

#[test]
fn bounded_repeat_nests_optional_tail() {
    insta::assert_snapshot!(show(&a().repeat(2, Some(5))), @"('a' & 'a' & ('a' & ('a' & 'a'?)?)?)");
    insta::assert_snapshot!(show(&a().repeat(0, Some(3))), @"('a' & ('a' & 'a'?)?)?");
    insta::assert_snapshot!(show(&a().repeat(0, Some(1))), @"'a'?");
    insta::assert_snapshot!(show(&a().repeat(2, Some(2))), @"('a' & 'a')");
}

#[test]
fn unbounded_repeat() {
    insta::assert_snapshot!(show(&a().repeat(0, None)), @"'a'*");
    insta::assert_snapshot!(show(&a().repeat(1, None)), @"'a'+");
    insta::assert_snapshot!(show(&a().repeat(3, None)), @"('a' & 'a' & 'a'+)");
}

#[test]
fn repeat_clamps_negative_bounds() {
    insta::assert_snapshot!(show(&a().repeat(-4, Some(-1))), @"ε");
    insta::assert_snapshot!(show(&a().repeat(-2, Some(2))), @"('a' & 'a'?)?");
    insta::assert_snapshot!(show(&a().repeat(-1, None)), @"'a'*");
}

#[test]
fn repeat_bounds_saturate() {
    assert_eq!(repeat_bound(-7), 0);
    assert_eq!(repeat_bound(0), 0);
    assert_eq!(repeat_bound(3), 3);
    assert_eq!(
        repeat_bound(i64::MAX) as u128,
        (i64::MAX as u128).min(usize::MAX as u128)
    );
    insta::assert_snapshot!(show(&a().repeat(2, Some(i64::MIN))), @"('a' & 'a')");
}

#[test]
fn inverted_repeat_is_exactly_min_copies() {
    insta::assert_snapshot!(show(&a().repeat(4, Some(2))), @"('a' & 'a' & 'a' & 'a')");
    insta::assert_snapshot!(show(&a().repeat(1, Some(0))), @"'a'");
}

#[test]
fn times() {
    insta::assert_snapshot!(show(&a().times(3)), @"('a' & 'a' & 'a')");
    insta::assert_snapshot!(show(&a().times(0)), @"ε");
}

#[test]
fn exclusion() {
    let fragment = Fragment::any().one_or_more().exclude(Fragment::text("ab"));

    insta::assert_snapshot!(show(&fragment), @"(.+ ÷ ('a' & 'b'))");
}

#[test]
fn expression_class() {
    let regular = Fragment::text("ab").zero_or_more();
    let context_free = Fragment::cat([a(), Fragment::symbol(Word)]);
    let exclusive = Fragment::alt([
        Fragment::symbol(Word),
        Fragment::any().exclude(a()).optional(),
    ]);

    assert_eq!(regular.class(), ExpressionClass::Regular);
    assert_eq!(context_free.class(), ExpressionClass::ContextFree);
    assert_eq!(exclusive.class(), ExpressionClass::Exclusive);
    assert_eq!(Fragment::<char>::never().class(), ExpressionClass::Regular);
    assert!(ExpressionClass::Regular < ExpressionClass::ContextFree);
    assert!(ExpressionClass::ContextFree < ExpressionClass::Exclusive);
}

#[test]
fn class_looks_through_rules() {
    assert_eq!(Fragment::symbol(Word).class(), ExpressionClass::ContextFree);
    assert_eq!(Fragment::symbol(Identifier).class(), ExpressionClass::Exclusive);
    assert_eq!(Fragment::symbol(Call).class(), ExpressionClass::Exclusive);
    assert_eq!(Call.class(), ExpressionClass::Exclusive);
    assert_eq!(Args.class(), ExpressionClass::Exclusive);
    assert_eq!(Keyword.class(), ExpressionClass::Regular);
}

#[test]
fn clones_share_structure() {
    let fragment = Fragment::text("abc");
    let copy = fragment.clone();

    let (Fragment::Catenation(left), Fragment::Catenation(right)) = (&fragment, &copy) else {
        panic!("expected catenations");
    };
    assert!(std::sync::Arc::ptr_eq(left, right));
}
