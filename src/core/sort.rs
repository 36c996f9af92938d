//! Sort engine: stable, collation-style ordering on one field

use crate::core::query::{SortDirection, SortSpec};
use crate::core::record::UserRecord;
use std::cmp::Ordering;

/// Order `records` by the sort field in `sort`
///
/// The sort is stable in both directions: records with equal keys keep their
/// input order. Records missing the field sort first when ascending.
pub fn sort_records(mut records: Vec<UserRecord>, sort: &SortSpec) -> Vec<UserRecord> {
    let field = sort.field;
    match sort.direction {
        SortDirection::Ascending => records
            .sort_by(|a, b| compare_values(a.field_value(field), b.field_value(field))),
        SortDirection::Descending => records
            .sort_by(|a, b| compare_values(b.field_value(field), a.field_value(field))),
    }
    records
}

fn compare_values(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => collate(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Locale-style string comparison
///
/// Letters compare by base letter first, ignoring case and accents, so
/// "adams" < "Baker" < "émile" < "fred". Ties are broken by accent
/// ("emile" < "émile"), then by case with lower case first ("ivan" < "Ivan"),
/// and code points decide anything left.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| lowercase(a).cmp(lowercase(b)))
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

fn lowercase(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    lowercase(s).map(base_letter)
}

/// Strip the diacritic from a lower-case Latin or Cyrillic letter
fn base_letter(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        'ё' => 'е',
        other => other,
    }
}

fn case_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}
