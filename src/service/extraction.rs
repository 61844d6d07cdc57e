//! Listing-page extraction: one canonical tool record per `<tbody>` block
//!
//! The listing document is parsed in two phases. The synchronous phase walks
//! the DOM and collects raw block data; the asynchronous phase resolves
//! indirect annotation labels through the configured [`LabelResolver`].
//! Structural problems abort the run before any output is written; a failed
//! label lookup only drops that single annotation.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::model::{AnnotationTerm, ToolRecord};
use crate::retriever::LabelResolver;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("failed to read listing document: {0}")]
    Io(#[from] std::io::Error),

    #[error("listing document carries no tool counter")]
    CounterMissing,

    #[error("tool counter is not a number: {0:?}")]
    CounterUnreadable(String),

    #[error("listing declares {declared} tools but contains {actual} blocks")]
    CountMismatch { declared: usize, actual: usize },

    #[error("malformed tool block {index}: {reason}")]
    MalformedBlock { index: usize, reason: &'static str },

    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// How an annotation row matched its EDAM concept.
enum AnnotationMatch {
    /// The row's indicator cell reads "label": the match cell text is the
    /// concept's own label and can be used directly.
    Label(String),
    /// Any other indicator (broader/narrower match). The label must be
    /// resolved through the ontology browser; the indicator text is kept
    /// for diagnostics.
    Indirect(String),
}

struct AnnotationRow {
    matched: AnnotationMatch,
    uri: String,
}

struct RawTool {
    dom_id: Option<String>,
    name: String,
    description: String,
    topic: Vec<AnnotationRow>,
    operation: Vec<AnnotationRow>,
}

struct ListingSelectors {
    counter: Selector,
    block: Selector,
    heading: Selector,
    paragraph: Selector,
    topic_rows: Selector,
    operation_rows: Selector,
    type_cell: Selector,
    match_cell: Selector,
    link: Selector,
}

impl ListingSelectors {
    fn new() -> Self {
        Self {
            counter: Selector::parse("dd").unwrap(),
            block: Selector::parse("tbody").unwrap(),
            heading: Selector::parse("h3").unwrap(),
            paragraph: Selector::parse("p").unwrap(),
            topic_rows: Selector::parse("tr.row.topic").unwrap(),
            operation_rows: Selector::parse("tr.row.operation").unwrap(),
            type_cell: Selector::parse("td.type").unwrap(),
            match_cell: Selector::parse("td.match").unwrap(),
            link: Selector::parse("a").unwrap(),
        }
    }
}

/// Extracts canonical tool records from a rendered listing document.
pub struct ExtractionService<R> {
    resolver: R,
    selectors: ListingSelectors,
}

impl<R: LabelResolver> ExtractionService<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            selectors: ListingSelectors::new(),
        }
    }

    /// Extract all declared tool records from a listing file.
    pub async fn extract_file(
        &self,
        path: &Path,
        tool_type: &str,
    ) -> Result<Vec<ToolRecord>, ExtractionError> {
        let html = fs::read_to_string(path)?;
        self.extract_document(&html, tool_type).await
    }

    /// Extract all declared tool records from listing markup.
    pub async fn extract_document(
        &self,
        html: &str,
        tool_type: &str,
    ) -> Result<Vec<ToolRecord>, ExtractionError> {
        let raw_tools = self.parse_listing(html)?;

        let mut records = Vec::with_capacity(raw_tools.len());
        for raw in raw_tools {
            tracing::info!(
                tool = %raw.name,
                block = raw.dom_id.as_deref().unwrap_or("-"),
                "Extracting tool"
            );

            let topic = self.resolve_terms(raw.topic).await;
            let operation = self.resolve_terms(raw.operation).await;

            records.push(ToolRecord::new(
                tool_type,
                raw.name,
                raw.description,
                topic,
                operation,
            ));
        }

        Ok(records)
    }

    /// Synchronous DOM walk. The parsed document does not outlive this call,
    /// so the async resolution phase never holds non-Send parser state.
    fn parse_listing(&self, html: &str) -> Result<Vec<RawTool>, ExtractionError> {
        let document = Html::parse_document(html);

        // The block count comes from the second-to-last <dd> of the page's
        // summary list, not from counting blocks.
        let counters: Vec<_> = document.select(&self.selectors.counter).collect();
        if counters.len() < 2 {
            return Err(ExtractionError::CounterMissing);
        }
        let counter_text: String = counters[counters.len() - 2].text().collect();
        let declared: usize = counter_text
            .trim()
            .parse()
            .map_err(|_| ExtractionError::CounterUnreadable(counter_text.trim().to_string()))?;

        let blocks: Vec<_> = document.select(&self.selectors.block).collect();

        let mut tools = Vec::with_capacity(declared);
        for index in 0..declared {
            let block = blocks.get(index).ok_or(ExtractionError::CountMismatch {
                declared,
                actual: blocks.len(),
            })?;
            tools.push(self.parse_block(index, block)?);
        }

        Ok(tools)
    }

    fn parse_block(
        &self,
        index: usize,
        block: &ElementRef<'_>,
    ) -> Result<RawTool, ExtractionError> {
        let malformed = |reason| ExtractionError::MalformedBlock { index, reason };

        let dom_id = block.value().attr("id").map(str::to_string);

        // The name is the heading's second content node; the first is the
        // anchor the listing renders in front of it.
        let heading = block
            .select(&self.selectors.heading)
            .next()
            .ok_or_else(|| malformed("missing heading"))?;
        let name_node = heading
            .children()
            .nth(1)
            .ok_or_else(|| malformed("heading has no name node"))?;
        let name = match name_node.value() {
            Node::Text(text) => text.text.to_string(),
            _ => ElementRef::wrap(name_node)
                .map(|el| el.text().collect::<String>())
                .ok_or_else(|| malformed("heading name node is not text"))?,
        };

        let description = block
            .select(&self.selectors.paragraph)
            .next()
            .map(|p| p.text().collect::<String>())
            .ok_or_else(|| malformed("missing description paragraph"))?;

        let topic = self.parse_rows(index, block, &self.selectors.topic_rows)?;
        let operation = self.parse_rows(index, block, &self.selectors.operation_rows)?;

        Ok(RawTool {
            dom_id,
            name,
            description,
            topic,
            operation,
        })
    }

    fn parse_rows(
        &self,
        index: usize,
        block: &ElementRef<'_>,
        rows: &Selector,
    ) -> Result<Vec<AnnotationRow>, ExtractionError> {
        let malformed = |reason| ExtractionError::MalformedBlock { index, reason };

        let mut parsed = Vec::new();
        for row in block.select(rows) {
            let kind: String = row
                .select(&self.selectors.type_cell)
                .next()
                .map(|td| td.text().collect())
                .ok_or_else(|| malformed("annotation row without match-type cell"))?;

            let uri = row
                .select(&self.selectors.link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string)
                .ok_or_else(|| malformed("annotation row without concept link"))?;

            let matched = if kind == "label" {
                let label = row
                    .select(&self.selectors.match_cell)
                    .next()
                    .map(|td| td.text().collect())
                    .ok_or_else(|| malformed("label row without match cell"))?;
                AnnotationMatch::Label(label)
            } else {
                AnnotationMatch::Indirect(kind)
            };

            parsed.push(AnnotationRow { matched, uri });
        }

        Ok(parsed)
    }

    /// Resolve rows into terms, preserving row order and duplicates. A row
    /// whose preferred-label lookup fails is dropped from the group.
    async fn resolve_terms(&self, rows: Vec<AnnotationRow>) -> Vec<AnnotationTerm> {
        let mut terms = Vec::with_capacity(rows.len());
        for row in rows {
            match row.matched {
                AnnotationMatch::Label(term) => terms.push(AnnotationTerm {
                    term,
                    uri: row.uri,
                }),
                AnnotationMatch::Indirect(kind) => {
                    match self.resolver.preferred_label(&row.uri).await {
                        Ok(term) => terms.push(AnnotationTerm {
                            term,
                            uri: row.uri,
                        }),
                        Err(error) => {
                            tracing::debug!(
                                uri = %row.uri,
                                match_type = %kind,
                                error = %error,
                                "Dropping annotation without resolvable label"
                            );
                        }
                    }
                }
            }
        }
        terms
    }
}

/// Write the record array as strict JSON.
pub fn write_records(path: &Path, records: &[ToolRecord]) -> Result<(), ExtractionError> {
    let file = fs::File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), records)?;
    Ok(())
}
