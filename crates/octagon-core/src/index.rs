//! Listing page extraction: one alphabetical index page in, detail links out.

use url::Url;

use crate::error::AppError;
use crate::models::FighterLink;
use crate::traits::{Document, Element};

pub const ROW_SELECTOR: &str = "tr.b-statistics__table-row";
pub const CELL_SELECTOR: &str = "td";
pub const LINK_SELECTOR: &str = "td a";

/// The two independent emptiness predicates of a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSignals {
    /// At least one body row has two or more cells.
    pub has_rows: bool,
    /// At least one body row yielded a resolvable detail link.
    pub has_links: bool,
}

/// Everything the walker needs from one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexPage {
    pub links: Vec<FighterLink>,
    pub has_rows: bool,
}

impl IndexPage {
    pub fn signals(&self) -> PageSignals {
        PageSignals {
            has_rows: self.has_rows,
            has_links: !self.links.is_empty(),
        }
    }
}

/// Extract fighter detail links from a listing page.
///
/// The first row is the table header and is skipped. Anchors are resolved
/// against `base_url`; anchors without a usable `href` are skipped.
pub fn extract_links<D: Document>(doc: &D, base_url: &str) -> Result<IndexPage, AppError> {
    let base = Url::parse(base_url)
        .map_err(|e| AppError::InvalidUrl(format!("{base_url}: {e}")))?;

    let mut page = IndexPage::default();

    for row in doc.select(ROW_SELECTOR)?.iter().skip(1) {
        if row.select(CELL_SELECTOR)?.len() >= 2 {
            page.has_rows = true;
        }

        let Some(anchor) = row.select_first(LINK_SELECTOR)? else {
            continue;
        };
        let Some(href) = anchor.attr("href") else {
            tracing::debug!("Skipping anchor without href");
            continue;
        };
        match base.join(href.trim()) {
            Ok(url) => page.links.push(FighterLink(url.into())),
            Err(e) => tracing::debug!(%href, error = %e, "Skipping unresolvable link"),
        }
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockDocument, MockNode};

    const BASE: &str = "http://ufcstats.com/statistics/fighters";

    #[test]
    fn collects_links_in_document_order() {
        let doc = MockDocument::index_page(&[
            "http://ufcstats.com/fighter-details/aaa",
            "http://ufcstats.com/fighter-details/bbb",
        ]);

        let page = extract_links(&doc, BASE).unwrap();

        assert!(page.has_rows);
        assert_eq!(
            page.links,
            vec![
                FighterLink("http://ufcstats.com/fighter-details/aaa".into()),
                FighterLink("http://ufcstats.com/fighter-details/bbb".into()),
            ]
        );
        assert_eq!(
            page.signals(),
            PageSignals {
                has_rows: true,
                has_links: true
            }
        );
    }

    #[test]
    fn resolves_relative_hrefs_against_base() {
        let doc = MockDocument::index_page(&["/fighter-details/ccc", "ddd"]);

        let page = extract_links(&doc, BASE).unwrap();

        assert_eq!(page.links[0].as_str(), "http://ufcstats.com/fighter-details/ccc");
        assert_eq!(page.links[1].as_str(), "http://ufcstats.com/statistics/ddd");
    }

    #[test]
    fn header_row_is_ignored() {
        // Only a header row, even though it carries cells and a link.
        let header = MockNode::row(vec![MockNode::cell(""), MockNode::cell("")])
            .with_child(LINK_SELECTOR, MockNode::anchor("/fighter-details/header"));
        let doc = MockDocument::new().with_root(ROW_SELECTOR, header);

        let page = extract_links(&doc, BASE).unwrap();

        assert_eq!(page, IndexPage::default());
    }

    #[test]
    fn rows_without_anchors_count_as_rows_but_not_links() {
        let doc = MockDocument::index_page_without_links(3);

        let page = extract_links(&doc, BASE).unwrap();

        assert_eq!(
            page.signals(),
            PageSignals {
                has_rows: true,
                has_links: false
            }
        );
    }

    #[test]
    fn single_cell_rows_do_not_count_as_rows() {
        let row = MockNode::row(vec![MockNode::cell("No fighters")])
            .with_child(LINK_SELECTOR, MockNode::anchor("/fighter-details/eee"));
        let doc = MockDocument::new()
            .with_root(ROW_SELECTOR, MockNode::row(vec![]))
            .with_root(ROW_SELECTOR, row);

        let page = extract_links(&doc, BASE).unwrap();

        assert!(!page.has_rows);
        assert_eq!(page.links.len(), 1);
    }

    #[test]
    fn anchor_without_href_is_skipped() {
        let row = MockNode::row(vec![MockNode::cell("a"), MockNode::cell("b")])
            .with_child(LINK_SELECTOR, MockNode::leaf("Jones"));
        let doc = MockDocument::new()
            .with_root(ROW_SELECTOR, MockNode::row(vec![]))
            .with_root(ROW_SELECTOR, row);

        let page = extract_links(&doc, BASE).unwrap();

        assert!(page.has_rows);
        assert!(page.links.is_empty());
    }

    #[test]
    fn empty_document_has_no_signals() {
        let page = extract_links(&MockDocument::new(), BASE).unwrap();
        assert_eq!(
            page.signals(),
            PageSignals {
                has_rows: false,
                has_links: false
            }
        );
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        let err = extract_links(&MockDocument::new(), "not a url").unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl(_)));
    }
}
