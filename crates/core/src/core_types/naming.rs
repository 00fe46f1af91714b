//! Ingredient name grammar
//!
//! A *simple name* is one or more words, each an upper-case letter followed by
//! lower-case letters or apostrophes. A lone word needs at least three
//! letters, words of a longer name at least two. The words `mixed`, `with`,
//! `heated` and `cooled` are reserved in any casing.
//!
//! On top of that sit the composite forms:
//! - *combined*: an optional `Heated`/`Cooled` adjective and a simple name
//! - *mixed*: `A mixed with B`, `A mixed with B and C`, `A mixed with B, C and D`
//! - *total*: `Special (Mixed)`
//!
//! # Usage
//! ```
//! use alchemy_core::core_types::naming;
//!
//! assert!(naming::is_valid_simple_name("Rat’s Eye Fluid"));
//! assert!(!naming::is_valid_simple_name("Channel 5"));
//! assert!(naming::is_valid_mixed_name("Garlic mixed with Imp Gas, Mercurial Acid and Water"));
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Words no simple name may contain, compared case-insensitively
pub const RESERVED_WORDS: [&str; 4] = ["mixed", "with", "heated", "cooled"];

/// Adjectives allowed in front of a simple name in a combined name
pub const TEMPERATURE_ADJECTIVES: [&str; 2] = ["Heated", "Cooled"];

const MIXED_WITH: &str = "mixed with";
const AND: &str = " and ";

static WORD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[A-Z][a-z'’]*$").ok());

fn is_valid_word(word: &str) -> bool {
    WORD.as_ref().is_some_and(|re| re.is_match(word))
}

fn letter_count(word: &str) -> usize {
    word.chars().filter(|c| c.is_alphabetic()).count()
}

/// Whether `name` is a valid simple name (surrounding whitespace ignored)
pub fn is_valid_simple_name(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    let min_letters = match words.len() {
        0 => return false,
        1 => 3,
        _ => 2,
    };
    words.iter().all(|word| {
        is_valid_word(word)
            && letter_count(word) >= min_letters
            && !RESERVED_WORDS
                .iter()
                .any(|reserved| word.eq_ignore_ascii_case(reserved))
    })
}

/// Whether `name` is a simple name with an optional temperature adjective
pub fn is_valid_combined_name(name: &str) -> bool {
    if is_valid_simple_name(name) {
        return true;
    }
    match name.trim().split_once(' ') {
        Some((adjective, rest)) => {
            TEMPERATURE_ADJECTIVES.contains(&adjective) && is_valid_simple_name(rest)
        }
        None => false,
    }
}

/// `B and C` with both sides combined names
fn is_valid_and_pair(part: &str) -> bool {
    let sides: Vec<&str> = part.split(AND).collect();
    sides.len() == 2 && sides.iter().all(|side| is_valid_combined_name(side.trim()))
}

/// Whether `name` is a combined name or a mixture listing
///
/// A listing has exactly one `mixed with`. Every comma-separated element
/// after it is a combined name, except that the last element of a list of
/// two or more must read `X and Y`.
pub fn is_valid_mixed_name(name: &str) -> bool {
    if is_valid_combined_name(name) {
        return true;
    }
    let parts: Vec<&str> = name.split(MIXED_WITH).collect();
    let [head, tail] = parts.as_slice() else {
        return false;
    };
    if !is_valid_combined_name(head.trim()) {
        return false;
    }
    let elements: Vec<&str> = tail.split(',').collect();
    let Some((last, rest)) = elements.split_last() else {
        return false;
    };
    if rest.is_empty() {
        return is_valid_combined_name(last.trim()) || is_valid_and_pair(last);
    }
    rest.iter().all(|element| is_valid_combined_name(element.trim())) && is_valid_and_pair(last)
}

/// Whether `name` reads `Special (Mixed)`
///
/// The special part is a combined name and the bracketed part a mixed name.
pub fn is_valid_total_name(name: &str) -> bool {
    let name = name.trim();
    let Some(inner) = name.strip_suffix(')') else {
        return false;
    };
    let Some((special, mixed)) = inner.split_once('(') else {
        return false;
    };
    if mixed.contains(['(', ')']) || special.contains(')') {
        return false;
    }
    is_valid_combined_name(special.trim()) && is_valid_mixed_name(mixed.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_names() {
        for name in [
            "Rat’s Eye Fluid",
            "Rat's Eye Fluid",
            "Coke",
            "Coaled Coke",
            "Hot",
            "Hot ",
            "Channel Five",
            "Channel Fi Zero",
            "Cokemixed",
        ] {
            assert!(is_valid_simple_name(name), "{name} should be valid");
        }
        for name in [
            "",
            "Ht",
            "Channel 5",
            "ChanNel",
            "Channel five Zero",
            "Channel F Zero",
            "Chan_nel Five Zero",
            "%Hot",
            "Coke mixed with Beer",
            "Coke Mixed Beer",
            "Heated Coke",
        ] {
            assert!(!is_valid_simple_name(name), "{name} should be invalid");
        }
    }

    #[test]
    fn test_combined_names() {
        assert!(is_valid_combined_name("Heated Red Eye Special"));
        assert!(is_valid_combined_name("Cooled Water"));
        assert!(is_valid_combined_name("Water"));
        assert!(!is_valid_combined_name("Red Heated Eye Special"));
        assert!(!is_valid_combined_name("Heated red Eye Special"));
        assert!(!is_valid_combined_name("CoKe"));
        assert!(!is_valid_combined_name("Heated"));
    }

    #[test]
    fn test_mixed_names() {
        for name in [
            "Heated Coke mixed with Beer, Cooled Water , Vodka, Martini, Cider and Tomato Juice",
            "Heated Coke mixed with Beer",
            "Heated Coke",
            "Garlic mixed with Imp Gas, Mercurial Acid and Water",
            "Garlic mixed with Imp Gas and Water",
        ] {
            assert!(is_valid_mixed_name(name), "{name} should be valid");
        }
        for name in [
            "Heated Coke mixed with Beer mixed with Water",
            "Heated Coke mixed with Beer, Cooled Water , Vodka, martini, Cider and Tomato Juice",
            "Heated Coke mixed with Beer, Cooled Water , Vodka, Martini, Cider, Tomato Juice",
            "Coke, Beer and Water",
        ] {
            assert!(!is_valid_mixed_name(name), "{name} should be invalid");
        }
    }

    #[test]
    fn test_total_names() {
        assert!(is_valid_total_name(
            "Heated Red Eye Special (Heated Coke mixed with Beer, Cooled Water , Vodka, \
             Martini, Cider and Tomato Juice)"
        ));
        assert!(is_valid_total_name("Coke (Thee)"));
        assert!(!is_valid_total_name("Coke (Thee) (Beer)"));
        assert!(!is_valid_total_name("CoKe (Thee)"));
        assert!(!is_valid_total_name("Coke (mixed with)"));
        assert!(!is_valid_total_name("Thee (Po)"));
        assert!(!is_valid_total_name("Coke Thee"));
    }
}
