//! Detects the part number of split movie releases from file names.

use crate::utils::file_system::try_without_extension;
use regex::Regex;
use std::path::Path;

/// Stacking markers such as `cd1`, `Part 2` or `disc-3`.
const NUMBERED_PART: &str =
    r"(?i)(?:^|[ _.\-(\[])(?:cd|dvd|p(?:ar)?t|dis[ck])[ _.\-]*([0-9]+)(?:$|[ _.\-)\]])";

/// Stacking markers with a letter, such as `pt.b`.
const LETTERED_PART: &str =
    r"(?i)(?:^|[ _.\-(\[])(?:cd|dvd|p(?:ar)?t|dis[ck])[ _.\-]*([a-d])(?:$|[ _.\-)\]])";

/// Returns the part number encoded in the file stem of `path`, if any.
///
/// Letters `a` to `d` count as parts 1 to 4. A numbered marker too large
/// for a part number yields `None`.
pub fn part_number(path: impl AsRef<Path>) -> Option<u32> {
    let stem = try_without_extension(path).ok()?;

    let part = match capture(NUMBERED_PART, &stem) {
        Some(digits) => {
            let Ok(number) = digits.parse::<u32>() else {
                log::warn!("Ignoring oversized part marker {digits:?} in {stem:?}");
                return None;
            };
            number
        }
        None => {
            let letter = capture(LETTERED_PART, &stem)?.chars().next()?;
            u32::from(letter.to_ascii_lowercase())
                .checked_sub(u32::from('a'))?
                .checked_add(1)?
        }
    };

    log::debug!("Detected part {part} in {stem:?}");
    Some(part)
}

fn capture<'a>(pattern: &str, stem: &'a str) -> Option<&'a str> {
    let re = Regex::new(pattern).ok()?;
    re.captures(stem)
        .and_then(|captures| captures.get(1))
        .map(|marker| marker.as_str())
}
