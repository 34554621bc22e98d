use crate::error::SessionError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which pages of a document a signature is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageSelector {
    #[default]
    All,
    /// 0-based page indices.
    Only(Vec<usize>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSelectorError {
    #[error("Page selection is empty")]
    Empty,
    #[error("Invalid page index '{0}'")]
    InvalidIndex(String),
    #[error("Invalid page range '{0}': the start must not exceed the end")]
    InvalidRange(String),
}

impl PageSelector {
    pub fn single(index: usize) -> Self {
        PageSelector::Only(vec![index])
    }

    /// Resolves the selection against a document with `count` pages.
    ///
    /// The result is sorted and free of duplicates, so no page is stamped
    /// twice in one apply. Any index past the end fails the whole selection.
    pub fn resolve(&self, count: usize) -> Result<Vec<usize>, SessionError> {
        match self {
            PageSelector::All => Ok((0..count).collect()),
            PageSelector::Only(indices) => {
                if let Some(&index) = indices.iter().find(|&&i| i >= count) {
                    return Err(SessionError::PageIndexOutOfRange { index, count });
                }
                let unique: BTreeSet<usize> = indices.iter().copied().collect();
                Ok(unique.into_iter().collect())
            }
        }
    }
}

impl FromStr for PageSelector {
    type Err = ParseSelectorError;

    /// Parses `all` or a comma list of indices and inclusive ranges, such as
    /// `0,2,4-6`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseSelectorError::Empty);
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(PageSelector::All);
        }

        let mut indices = Vec::new();
        for part in s.split(',').map(str::trim) {
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_index(start)?;
                    let end = parse_index(end)?;
                    if start > end {
                        return Err(ParseSelectorError::InvalidRange(part.to_string()));
                    }
                    indices.extend(start..=end);
                }
                None => indices.push(parse_index(part)?),
            }
        }
        Ok(PageSelector::Only(indices))
    }
}

fn parse_index(s: &str) -> Result<usize, ParseSelectorError> {
    let s = s.trim();
    s.parse()
        .map_err(|_| ParseSelectorError::InvalidIndex(s.to_string()))
}

impl fmt::Display for PageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSelector::All => f.write_str("all"),
            PageSelector::Only(indices) => {
                for (i, index) in indices.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", index)?;
                }
                Ok(())
            }
        }
    }
}
