//! Comparators for `sort_by`.

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use std::cmp::Ordering;

/// What a sort extractor may return for an element.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! number_keys {
    ($($t:ty),*) => {
        $(impl From<$t> for SortKey {
            fn from(value: $t) -> Self {
                Self::Number(value as f64)
            }
        })*
    };
}

number_keys!(i32, i64, u8, u16, u32, u64, usize, f32, f64);

/// Builds a comparator ordering elements by the key `extractor` returns.
///
/// Two numeric keys compare numerically. Anything else compares as text
/// under English collation, ignoring case but not accents; the locale is
/// fixed and never taken from the environment. Equal keys compare `Equal`,
/// so a stable sort keeps their input order.
///
/// ```ignore
/// guilds.sort_by(by_key(|guild: &Guild| guild.name.clone()));
/// ```
pub fn by_key<T, K, F>(extractor: F) -> impl Fn(&T, &T) -> Ordering
where
    F: Fn(&T) -> K,
    K: Into<SortKey>,
{
    move |a, b| compare(&extractor(a).into(), &extractor(b).into())
}

fn compare(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
        _ => collate(&a.text(), &b.text()),
    }
}

fn english_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    // secondary strength: accents matter, case doesn't
    options.strength = Some(Strength::Secondary);
    match Collator::try_new(&locale!("en").into(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::error!("no english collation data: {e}");
            None
        }
    }
}

thread_local! {
    static COLLATOR: Option<Collator> = english_collator();
}

fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => fold_case(a).cmp(fold_case(b)),
    })
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}
