use crate::analyzer::classifier::Classifier;
use crate::config::SourceConfig;
use crate::model::{
    AdRecord, CATEGORY_COLUMN, MergedDataset, PipelineError, STRATEGY_COLUMN, SourceTable,
    TableError,
};
use crate::normalizer::bind_column;
use crate::parser::TableReader;
use std::collections::HashSet;
use tracing::{info, warn};

/// Loads every configured source in order. Missing or unreadable files are skipped
/// with a warning; a file that decodes neither as UTF-8 nor as GBK aborts.
pub fn load_sources<R: TableReader>(
    sources: &[SourceConfig],
    reader: &R,
) -> Result<Vec<SourceTable>, PipelineError> {
    let mut loaded = Vec::new();
    for source in sources {
        match reader.read(&source.path) {
            Ok(table) => {
                info!("Loaded {}: {} records", source.category, table.len());
                loaded.push(SourceTable {
                    category: source.category.clone(),
                    table,
                });
            }
            Err(TableError::MissingInput(path)) => {
                warn!("Source for {} not found, skipping: {}", source.category, path.display());
            }
            Err(e @ TableError::DecodeFailure(_)) => return Err(e.into()),
            Err(e) => {
                warn!("Source for {} unreadable, skipping: {}", source.category, e);
            }
        }
    }
    Ok(loaded)
}

/// Concatenates the tables in the given order, keeps the first row per headline and
/// classifies the survivors.
pub fn aggregate<C: Classifier>(
    sources: Vec<SourceTable>,
    headline_aliases: &[String],
    classifier: &C,
) -> Result<MergedDataset, PipelineError> {
    if sources.is_empty() {
        return Err(PipelineError::NoSources);
    }

    let mut columns: Vec<String> = Vec::new();
    let mut bound = Vec::new();
    for source in sources {
        let Some(headline_col) = bind_column(&source.table.headers, headline_aliases) else {
            warn!(
                "{}: {}, table skipped",
                source.category,
                PipelineError::SchemaMismatch(headline_aliases.join(" | "))
            );
            continue;
        };
        // position of each source column in the merged column list
        let layout: Vec<Option<usize>> = source
            .table
            .headers
            .iter()
            .map(|h| {
                if h == CATEGORY_COLUMN || h == STRATEGY_COLUMN {
                    return None;
                }
                Some(match columns.iter().position(|c| c == h) {
                    Some(i) => i,
                    None => {
                        columns.push(h.clone());
                        columns.len() - 1
                    }
                })
            })
            .collect();
        bound.push((source, headline_col, layout));
    }

    if bound.is_empty() {
        return Err(PipelineError::NoSources);
    }

    let mut seen: HashSet<Option<String>> = HashSet::new();
    let mut records = Vec::new();
    let mut duplicates = 0usize;

    for (source, headline_col, layout) in &bound {
        for (i, row) in source.table.rows.iter().enumerate() {
            let headline = source.table.raw_cell(i, *headline_col).map(str::to_string);
            if !seen.insert(headline.clone()) {
                duplicates += 1;
                continue;
            }

            let mut fields = vec![String::new(); columns.len()];
            for (cell, slot) in row.iter().zip(layout) {
                if let Some(idx) = slot {
                    fields[*idx] = cell.clone();
                }
            }

            records.push(AdRecord {
                strategy: classifier.classify(headline.as_deref()),
                headline,
                category: source.category.clone(),
                fields,
            });
        }
    }

    info!(
        "Merged {} records ({} duplicate headlines dropped)",
        records.len(),
        duplicates
    );

    if records.is_empty() {
        return Err(PipelineError::EmptyResult("merge"));
    }

    Ok(MergedDataset { columns, records })
}
