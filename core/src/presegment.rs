//! Pre-segmentation transforms that run before the main search expansion
//! (§4.4). Each appends derived passes to the pool; originals are retained
//! so the search can weigh both against each other.

use crate::dictionary::Dictionary;
use crate::pass::Pass;
use crate::split::Split;

const BREAK_CHARS: &[char] = &[
    ' ', '-', '_', '.', '!', '?', '@', '$', '&', '*', ',', '[', ']', '(', ')', '{', '}', ';', ':',
    '%', '^', '~',
];

fn find_char_subsequence(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&start| haystack[start..start + needle.len()] == *needle)
}

fn ordinal_suffix(last_digit: char, last_two_digits: &str) -> Option<&'static str> {
    if matches!(last_two_digits, "11" | "12" | "13") {
        return Some("th");
    }
    match last_digit {
        '0' | '4' | '5' | '6' | '7' | '8' | '9' => Some("th"),
        '1' => Some("st"),
        '2' => Some("nd"),
        '3' => Some("rd"),
        _ => None,
    }
}

/// Splits passes containing digits into digit/non-digit segments, protecting
/// "special number" terms (e.g. `3d`, `80s`, `401k`) and merging ordinal
/// suffixes (`101` + `st` -> `101st`) onto the preceding numeric segment.
pub fn split_on_numbers(dictionary: &Dictionary, passes: &mut Vec<Pass>) {
    let mut new_passes = Vec::new();
    for pass in passes.iter_mut() {
        let display = pass.display_text().to_string();
        let chars: Vec<char> = display.chars().collect();
        if chars.len() <= 1 {
            continue;
        }
        if !chars.iter().any(|c| c.is_ascii_digit()) {
            continue;
        }

        let mut char_is_number: Vec<bool> = chars.iter().map(|c| c.is_ascii_digit()).collect();
        for term in dictionary.special_numbers() {
            let needle: Vec<char> = term.compressed().chars().collect();
            if let Some(start) = find_char_subsequence(&chars, &needle) {
                for flag in char_is_number.iter_mut().skip(start).take(needle.len()) {
                    *flag = false;
                }
            }
        }

        let mut segments: Vec<String> = Vec::new();
        let mut numeric_segments: Vec<bool> = Vec::new();
        let mut is_number = char_is_number[0];
        let mut start_index = 0usize;
        for i in 1..chars.len() {
            if char_is_number[i] != is_number {
                segments.push(chars[start_index..i].iter().collect());
                numeric_segments.push(char_is_number[start_index..i].iter().any(|&b| b));
                start_index = i;
                is_number = char_is_number[i];
            }
        }
        segments.push(chars[start_index..].iter().collect());
        numeric_segments.push(char_is_number[start_index..].iter().any(|&b| b));

        for i in 0..segments.len().saturating_sub(1) {
            if !numeric_segments[i] {
                continue;
            }
            let seg_chars: Vec<char> = segments[i].chars().collect();
            let last_digit = *seg_chars.last().unwrap();
            let last_two: String = if seg_chars.len() > 1 {
                seg_chars[seg_chars.len() - 2..].iter().collect()
            } else {
                String::new()
            };
            let Some(suffix) = ordinal_suffix(last_digit, &last_two) else {
                continue;
            };
            if segments[i + 1].starts_with(suffix) {
                let taken: String = segments[i + 1].chars().take(2).collect();
                let remaining: String = segments[i + 1].chars().skip(2).collect();
                segments[i].push_str(&taken);
                segments[i + 1] = remaining;
            }
        }

        let mut splits = Vec::new();
        for (segment, numeric) in segments.into_iter().zip(numeric_segments) {
            if segment.is_empty() {
                continue;
            }
            if numeric {
                match dictionary.find_term(&segment) {
                    Some(term) => splits.push(Split::from_term(&term)),
                    None => splits.push(Split::new_matched(segment)),
                }
            } else {
                splits.push(Split::new(segment));
            }
        }
        new_passes.push(Pass::from_splits(display, splits));
    }
    passes.extend(new_passes);
}

/// Preserves "a-1"-style prefixes: a single alpha character, a dash, then a
/// digit-leading segment get fused into one unit before the search would
/// otherwise treat the dash as a break character.
pub fn preserve_a1(dictionary: &Dictionary, passes: &mut Vec<Pass>) {
    let mut new_passes = Vec::new();
    for pass in passes.iter() {
        let splits = pass.splits();
        if splits.len() < 2 {
            continue;
        }
        let first_text = splits[0].text();
        let mut first_chars = first_text.chars();
        let (Some(c0), Some(c1), None) = (first_chars.next(), first_chars.next(), first_chars.next()) else {
            continue;
        };
        if !c0.is_alphabetic() || c1 != '-' {
            continue;
        }
        let second_starts_digit = splits[1].text().chars().next().is_some_and(|c| c.is_ascii_digit());
        if !second_starts_digit {
            continue;
        }

        let combined = format!("{}{}", first_text, splits[1].text());
        let mut new_splits = Vec::with_capacity(splits.len() - 1);
        match dictionary.find_term(&combined) {
            Some(term) => new_splits.push(Split::from_term(&term)),
            None => new_splits.push(Split::new_matched(combined)),
        }
        new_splits.extend(splits[2..].iter().cloned());
        new_passes.push(Pass::from_splits(pass.input().to_string(), new_splits));
    }
    passes.extend(new_passes);
}

/// Breaks unmatched splits containing break characters (space, dash,
/// underscore, punctuation) into their non-empty whitespace-joined tokens.
pub fn split_on_break_chars(passes: &mut Vec<Pass>) {
    let mut new_passes = Vec::new();
    for pass in passes.iter() {
        let needs_split = pass
            .splits()
            .iter()
            .any(|s| !s.matched() && s.text().chars().any(|c| BREAK_CHARS.contains(&c)));
        if !needs_split {
            continue;
        }

        let mut new_splits = Vec::new();
        for s in pass.splits() {
            if s.matched() || !s.text().chars().any(|c| BREAK_CHARS.contains(&c)) {
                new_splits.push(s.clone());
                continue;
            }
            let mut normalized = s.text().to_string();
            for c in BREAK_CHARS {
                normalized = normalized.replace(*c, " ");
            }
            for item in normalized.split(' ') {
                if !item.is_empty() {
                    new_splits.push(Split::new(item));
                }
            }
        }
        new_passes.push(Pass::from_splits(pass.input().to_string(), new_splits));
    }
    passes.extend(new_passes);
}
