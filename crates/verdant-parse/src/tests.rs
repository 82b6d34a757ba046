use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use verdant_syntax::{Builder, Grammar, Leaf, Point, Range, Symbol, SymbolInfo, Tree};

use crate::{
    EngineOutcome, Error, GrammarEngine, HaltReason, Interrupt, Language, Parser, ParserOptions,
    SourceText, Suspended,
};

const WORD: Symbol = Symbol::from_raw(1);
const DOCUMENT: Symbol = Symbol::from_raw(2);

static SYMBOLS: [SymbolInfo; 3] =
    [SymbolInfo::auxiliary("end"), SymbolInfo::named("word"), SymbolInfo::named("document")];
static FIELDS: [&str; 1] = [""];

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(|| Grammar::new("words", 14, &SYMBOLS, &FIELDS));
static FUTURE_GRAMMAR: LazyLock<Grammar> =
    LazyLock::new(|| Grammar::new("future-words", 99, &SYMBOLS, &FIELDS));

thread_local! {
    static RESUMES: Cell<usize> = const { Cell::new(0) };
}

/// Splits the input into whitespace-separated words, one checkpoint per word.
struct Words;

struct FutureWords;

#[derive(Default)]
struct Progress {
    words: Vec<(u32, u32)>,
    next: usize,
}

impl GrammarEngine for Words {
    fn grammar(&self) -> &'static Grammar {
        &GRAMMAR
    }

    fn parse(
        &self,
        source: &SourceText<'_>,
        _old_tree: Option<&Tree>,
        resume: Option<Suspended>,
        interrupt: &mut Interrupt,
    ) -> EngineOutcome {
        let mut progress = match resume.and_then(|state| state.downcast::<Progress>().ok()) {
            Some(progress) => {
                RESUMES.with(|resumes| resumes.set(resumes.get() + 1));
                *progress
            }
            None => Progress::default(),
        };

        let chars = source.chars();
        let mut i = progress.next;
        while i < chars.len() {
            if chars[i].ch.is_whitespace() {
                i += 1;
                continue;
            }
            if interrupt.check() {
                progress.next = i;
                return EngineOutcome::Halted(Box::new(progress));
            }

            let first = chars[i];
            let mut end = first.end();
            i += 1;
            while i < chars.len() && !chars[i].ch.is_whitespace() && chars[i].range == first.range {
                end = chars[i].end();
                i += 1;
            }
            progress.words.push((first.byte, end));
        }

        let mut builder = Builder::new(self.grammar());
        builder.start_node(DOCUMENT, None);
        for (start, end) in progress.words {
            builder.leaf(Leaf {
                symbol: WORD,
                field: None,
                start: source.length_at(start),
                end: source.length_at(end),
                lookahead_bytes: 1,
                extra: false,
            });
        }
        builder.finish_node();

        let end = source.length_at(source.end_of_input());
        EngineOutcome::Complete(builder.finish(end, source.included_ranges().to_vec()))
    }
}

impl GrammarEngine for FutureWords {
    fn grammar(&self) -> &'static Grammar {
        &FUTURE_GRAMMAR
    }

    fn parse(
        &self,
        source: &SourceText<'_>,
        old_tree: Option<&Tree>,
        resume: Option<Suspended>,
        interrupt: &mut Interrupt,
    ) -> EngineOutcome {
        Words.parse(source, old_tree, resume, interrupt)
    }
}

static WORDS: Words = Words;
static FUTURE_WORDS: FutureWords = FutureWords;

fn words() -> Language {
    Language::new(&WORDS)
}

fn words_parser() -> Parser {
    let mut parser = Parser::new();
    parser.set_language(words()).unwrap();
    parser
}

fn word_ranges(tree: &Tree) -> Vec<(u32, u32)> {
    tree.root_node().children().map(|word| (word.start_byte(), word.end_byte())).collect()
}

fn many_words(count: usize) -> String {
    (0..count).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

fn resumes() -> usize {
    RESUMES.with(Cell::get)
}

#[test]
fn parse_without_language_fails() {
    let mut parser = Parser::new();
    assert_eq!(parser.parse("a b", None).unwrap_err(), Error::NoGrammar);
    assert!(parser.language().is_none());
}

#[test]
fn incompatible_version_keeps_previous_language() {
    let mut parser = words_parser();
    let error = parser.set_language(Language::new(&FUTURE_WORDS)).unwrap_err();

    assert_eq!(error, Error::VersionMismatch { version: 99, min: 13, max: 14 });
    assert_eq!(parser.language(), Some(words()));
    assert!(parser.parse("still works", None).is_ok());
}

#[test]
fn invalid_included_ranges_are_rejected() {
    let mut parser = words_parser();
    let text = "0123456789abcdefghij";
    let valid = [Range::of_bytes(text, 2..4)];
    parser.set_included_ranges(&valid).unwrap();

    let overlapping = [Range::of_bytes(text, 10..20), Range::of_bytes(text, 5..15)];
    assert_eq!(parser.set_included_ranges(&overlapping), Err(Error::InvalidRanges { index: 1 }));
    assert_eq!(parser.included_ranges(), valid);

    let inverted = [Range::new(8, 4, Point::new(0, 8), Point::new(0, 4))];
    assert_eq!(parser.set_included_ranges(&inverted), Err(Error::InvalidRanges { index: 0 }));
    assert_eq!(parser.included_ranges(), valid);

    parser.set_included_ranges(&[]).unwrap();
    assert_eq!(parser.included_ranges(), [Range::WHOLE_DOCUMENT]);
}

#[test]
fn included_ranges_limit_the_input() {
    let mut parser = words_parser();
    let text = "skip <%ab cd%> skip <%ef%>";
    parser
        .set_included_ranges(&[Range::of_bytes(text, 7..12), Range::of_bytes(text, 22..24)])
        .unwrap();

    let tree = parser.parse(text, None).unwrap();
    assert_eq!(word_ranges(&tree), [(7, 9), (10, 12), (22, 24)]);
    assert_eq!(tree.included_ranges().len(), 2);
}

#[test]
fn utf16_offsets_are_in_bytes() {
    let mut parser = words_parser();
    let text: Vec<u16> = "ab  cd".encode_utf16().collect();
    let tree = parser.parse_utf16(&text, None).unwrap();

    assert_eq!(word_ranges(&tree), [(0, 4), (8, 12)]);
    let cd = tree.root_node().child(1).unwrap();
    assert_eq!(String::from_utf16_lossy(cd.utf16_text(&text)), "cd");
    assert_eq!(cd.end_point(), Point::new(0, 12));
}

#[test]
fn cancellation_flag_halts_and_resumes() {
    let flag = Arc::new(AtomicUsize::new(1));
    let mut parser = words_parser();
    parser.set_cancellation_flag(Some(flag.clone()));

    let text = many_words(20);
    assert_eq!(parser.parse(&text, None).unwrap_err(), Error::Cancelled(HaltReason::Flag));

    flag.store(0, Ordering::Relaxed);
    let tree = parser.parse(&text, None).unwrap();
    assert_eq!(tree.root_node().child_count(), 20);
    assert_eq!(resumes(), 1);
}

#[test]
fn timeout_halts_and_resume_keeps_progress() {
    let mut parser = words_parser();
    parser.set_timeout(Duration::from_nanos(1));
    assert_eq!(parser.timeout(), Duration::from_nanos(1));

    let text = many_words(500);
    let error = parser.parse(&text, None).unwrap_err();
    assert_eq!(error, Error::Cancelled(HaltReason::Timeout));
    assert!(error.is_cancelled());

    parser.set_timeout(Duration::ZERO);
    let tree = parser.parse(&text, None).unwrap();
    assert_eq!(tree.root_node().child_count(), 500);
    assert_eq!(resumes(), 1);
}

#[test]
fn reset_discards_halted_parse() {
    let flag = Arc::new(AtomicUsize::new(1));
    let mut parser = words_parser();
    parser.set_cancellation_flag(Some(flag.clone()));

    let text = many_words(5);
    assert!(parser.parse(&text, None).is_err());

    parser.reset();
    flag.store(0, Ordering::Relaxed);
    assert_eq!(parser.parse(&text, None).unwrap().root_node().child_count(), 5);
    assert_eq!(resumes(), 0);
}

#[test]
fn different_input_starts_over() {
    let flag = Arc::new(AtomicUsize::new(1));
    let mut parser = words_parser();
    parser.set_cancellation_flag(Some(flag.clone()));
    assert!(parser.parse("one two", None).is_err());

    flag.store(0, Ordering::Relaxed);
    assert_eq!(word_ranges(&parser.parse("three", None).unwrap()), [(0, 5)]);
    assert_eq!(resumes(), 0);
}

#[test]
fn options_configure_a_parser() {
    let flag = Arc::new(AtomicUsize::new(0));
    let text = "a b c";
    let options = ParserOptions {
        timeout: Duration::from_secs(5),
        included_ranges: vec![Range::of_bytes(text, 2..5)],
        cancellation_flag: Some(flag),
    };
    let mut parser = Parser::with_options(words(), options).unwrap();

    assert!(parser.cancellation_flag().is_some());
    assert_eq!(word_ranges(&parser.parse(text, None).unwrap()), [(2, 3), (4, 5)]);

    let invalid = ParserOptions {
        included_ranges: vec![Range::of_bytes(text, 3..4), Range::of_bytes(text, 0..1)],
        ..ParserOptions::default()
    };
    assert_eq!(
        Parser::with_options(words(), invalid).err(),
        Some(Error::InvalidRanges { index: 1 })
    );
}

#[test]
fn empty_document_has_childless_root() {
    let mut parser = words_parser();
    let tree = parser.parse("", None).unwrap();
    assert_eq!(tree.root_node().to_sexp(), "(document)");
    assert_eq!(tree.root_node().end_byte(), 0);
}
