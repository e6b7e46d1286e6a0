// RTTM - Merge several files and group lines by a key column
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Recording id column of an RTTM line
pub const RECORDING_COLUMN: usize = 1;

/// Read every line of `files` and regroup them by the value of the
/// space-separated field `column`.
///
/// Groups are emitted in ascending (byte-wise) order of their key; lines
/// inside a group keep their original order across and within files. Lines
/// without that field are grouped under the empty key. Every returned line
/// ends with a newline.
pub fn sort_and_cat<P: AsRef<Path>>(files: &[P], column: usize) -> Result<Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for file in files {
        let text = fs::read_to_string(file.as_ref())?;
        for line in text.lines() {
            let key = line
                .trim()
                .split(' ')
                .nth(column)
                .unwrap_or_default()
                .to_string();
            groups.entry(key).or_default().push(format!("{}\n", line));
        }
    }

    Ok(groups.into_values().flatten().collect())
}
