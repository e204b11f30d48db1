//! The assembled parse pipeline over many stylesheets.
//!
//! For each sheet: extract blocks, normalize indentation, parse, resolve.
//! Per-block failures become [`ErrorRecord`]s keyed by the block's source
//! name and never abort sibling blocks, so one malformed theme leaves every
//! other theme's settings intact.

use crate::extract::extract_blocks;
use crate::indent::normalize_indentation;
use crate::model::{ErrorRecord, Section};
use crate::parse::parse_document;
use crate::resolve::resolve_section;

/// Everything one pipeline run produced: the surviving sections in source
/// order, plus one error record per failed block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub sections: Vec<Section>,
    pub errors: Vec<ErrorRecord>,
}

impl ParseOutcome {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Runs the full extract → normalize → parse → resolve pipeline over the
/// given stylesheet texts.
///
/// Duplicate section ids across blocks keep the first occurrence and
/// record an error for each later one.
pub fn parse_stylesheets<'a, I>(sheets: I) -> ParseOutcome
where
    I: IntoIterator<Item = &'a str>,
{
    let mut outcome = ParseOutcome::default();

    for sheet in sheets {
        for block in extract_blocks(sheet) {
            let normalized = normalize_indentation(&block.body);

            let doc = match parse_document(&normalized, &block.source) {
                Ok(doc) => doc,
                Err(err) => {
                    outcome.errors.push(ErrorRecord {
                        name: block.source.clone(),
                        error: err.to_string(),
                    });
                    continue;
                }
            };

            let section = match resolve_section(&doc) {
                Ok(Some(section)) => section,
                Ok(None) => continue,
                Err(err) => {
                    outcome.errors.push(ErrorRecord {
                        name: block.source.clone(),
                        error: err.to_string(),
                    });
                    continue;
                }
            };

            if outcome.sections.iter().any(|s| s.id == section.id) {
                outcome.errors.push(ErrorRecord {
                    name: block.source.clone(),
                    error: format!("duplicate section id '{}'", section.id),
                });
                continue;
            }

            outcome.sections.push(section);
        }
    }

    log::debug!(
        "parsed {} section(s), {} error(s)",
        outcome.sections.len(),
        outcome.errors.len()
    );

    outcome
}
