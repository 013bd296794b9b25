use std::collections::HashMap;

use cxxparse_core::lang::keywords;
use cxxparse_core::lang::operators;
use cxxparse_core::lang::punctuation;
use cxxparse_core::lang::registry::{Availability, Dialect};

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            keywords::as_str(info.id),
            info.canonical,
            "keyword as_str mismatch for {:?}",
            info.id
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn keyword_table_is_ordered_by_id_and_spelling() {
    for (idx, info) in keywords::KEYWORDS.iter().enumerate() {
        assert_eq!(info.id as usize, idx, "keyword {:?} is out of place", info.id);
    }
    // `from_str` binary-searches the table.
    for pair in keywords::KEYWORDS.windows(2) {
        assert!(
            pair[0].canonical < pair[1].canonical,
            "keywords not sorted: {} before {}",
            pair[0].canonical,
            pair[1].canonical
        );
    }
}

#[test]
fn cpp_only_keywords_are_identifiers_in_c() {
    for info in keywords::KEYWORDS {
        let in_c = keywords::from_str_in(info.canonical, Dialect::C);
        let in_cpp = keywords::from_str_in(info.canonical, Dialect::Cpp);
        assert_eq!(in_cpp, Some(info.id));
        match info.availability {
            Availability::Both => assert_eq!(in_c, Some(info.id), "{} should be reserved in C", info.canonical),
            Availability::CppOnly => assert_eq!(in_c, None, "{} should not be reserved in C", info.canonical),
        }
    }
    assert!(keywords::is_cpp_only(keywords::KeywordId::Namespace));
    assert!(!keywords::is_cpp_only(keywords::KeywordId::Typedef));
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();

    for (idx, info) in operators::OPERATORS.iter().enumerate() {
        assert_eq!(info.id as usize, idx, "operator {:?} is out of place", info.id);
        assert_eq!(
            operators::from_str(info.spelling),
            Some(info.id),
            "operator spelling not resolvable: {}",
            info.spelling
        );
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.spelling, prev, info.id);
        }
        if info.assignment {
            assert_eq!(info.precedence, Some(2), "assignment {:?} must share one precedence", info.id);
        }
    }
}

#[test]
fn punctuation_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, punctuation::PunctuationId> = HashMap::new();

    for (idx, info) in punctuation::PUNCTUATION.iter().enumerate() {
        assert_eq!(info.id as usize, idx, "punctuation {:?} is out of place", info.id);
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        assert_eq!(punctuation::as_str(info.id), info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate punctuation spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
        assert!(
            operators::from_str(info.canonical).is_none(),
            "{} is registered as both punctuation and operator",
            info.canonical
        );
    }
}
